use super::*;

#[test]
fn snap_rounds_to_nearest_frame() {
    assert_eq!(snap_to_frame(1.01, 30.0), 1.0);
    assert_eq!(snap_to_frame(0.02, 30.0), 1.0 / 30.0);
    assert_eq!(snap_to_frame(2.5, 24.0), 60.0 / 24.0);
}

#[test]
fn snap_floors_negative_times_at_zero() {
    assert_eq!(snap_to_frame(-3.0, 30.0), 0.0);
    assert_eq!(snap_to_frame(-0.001, 30.0), 0.0);
    assert_eq!(snap_to_frame(f64::NEG_INFINITY, 30.0), 0.0);
    assert_eq!(snap_to_frame(f64::NAN, 30.0), 0.0);
}

#[test]
fn snap_degrades_gracefully_without_a_rate() {
    assert_eq!(snap_to_frame(1.234, 0.0), 1.234);
    assert_eq!(snap_to_frame(1.234, -5.0), 1.234);
}

#[test]
fn snap_is_idempotent() {
    let rates = [23.976, 24.0, 25.0, 29.97, 30.0, 48.0, 59.94, 60.0, 120.0];
    let mut x = -2.0;
    while x < 50.0 {
        for r in rates {
            let once = snap_to_frame(x, r);
            assert_eq!(snap_to_frame(once, r), once, "x={x} r={r}");
        }
        x += 0.0137;
    }
}

#[test]
fn frame_time_conversions_agree() {
    assert_eq!(time_to_frame(1.0, 30.0), 30);
    assert_eq!(time_to_frame(-1.0, 30.0), 0);
    assert_eq!(frame_to_time(45, 30.0), 1.5);
    assert_eq!(frame_to_time(45, 0.0), 0.0);
}

#[test]
fn overlap_is_half_open() {
    assert!(intervals_overlap(0.0, 5.0, 4.0, 6.0));
    assert!(!intervals_overlap(0.0, 5.0, 5.0, 6.0));
    assert!(!intervals_overlap(5.0, 6.0, 0.0, 5.0));
    assert!(intervals_overlap(0.0, 10.0, 2.0, 3.0));
}

#[test]
fn fps_validates_and_converts() {
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::new(0, 1).is_err());
    let ntsc = Fps::new(30000, 1001).unwrap();
    let secs = ntsc.frames_to_secs(123);
    assert_eq!(ntsc.secs_to_frames_round(secs), 123);
    assert_eq!(Fps::whole(25).unwrap().frame_duration_secs(), 0.04);
    assert_eq!(Fps::default().snap(0.51), 0.5);
}

#[test]
fn fps_frame_lookups_clamp_and_detect_bad_rates() {
    let fps = Fps::whole(10).unwrap();
    assert_eq!(fps.secs_to_frames_floor(0.39), 3);
    assert_eq!(fps.secs_to_frames_floor(-1.0), 0);
    assert_eq!(fps.secs_to_frames_round(0.36), 4);
    assert!(fps.is_valid());
    let broken: Fps = serde_json::from_str(r#"{"num":30,"den":0}"#).unwrap();
    assert!(!broken.is_valid());
}
