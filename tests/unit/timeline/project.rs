use super::*;
use crate::timeline::asset::AssetKind;

fn clip(id: &str, track: usize, start: f64, duration: f64) -> TimelineAsset {
    TimelineAsset::new(id, AssetKind::Video, id, track, start, duration)
        .with_source(format!("https://cdn.example/{id}.mp4"), None)
}

fn basic_project() -> TimelineProject {
    let mut p = TimelineProject::new("p1", "Pilot");
    p.assets = vec![
        clip("a", 0, 0.0, 5.0),
        clip("b", 0, 5.0, 3.0),
        clip("c", 1, 2.0, 10.0),
    ];
    p
}

#[test]
fn duration_is_derived_from_assets() {
    let mut p = basic_project();
    assert_eq!(p.duration(), 12.0);
    p.assets.clear();
    assert_eq!(p.duration(), 0.0);
}

#[test]
fn json_roundtrip() {
    let p = basic_project();
    let s = p.to_json().unwrap();
    let de = TimelineProject::from_json(&s).unwrap();
    assert_eq!(de, p);
    assert!(s.contains("\"aspectRatio\""));
}

#[test]
fn validate_accepts_adjacent_clips() {
    basic_project().validate().unwrap();
}

#[test]
fn validate_rejects_overlap() {
    let mut p = basic_project();
    p.assets.push(clip("d", 0, 7.0, 2.0));
    let err = p.validate().unwrap_err().to_string();
    assert!(err.contains("overlap"), "{err}");
}

#[test]
fn validate_rejects_duplicate_ids_and_missing_tracks() {
    let mut p = basic_project();
    p.assets.push(clip("a", 1, 20.0, 1.0));
    assert!(p.validate().is_err());

    let mut p = basic_project();
    p.assets.push(clip("z", 5, 0.0, 1.0));
    assert!(p.validate().is_err());

    let mut p = basic_project();
    p.frame_rate = Fps { num: 30, den: 0 };
    assert!(p.validate().is_err());
}

#[test]
fn lane_queries() {
    let p = basic_project();
    let lane0: Vec<&str> = p
        .lane_assets(Lane::video(0))
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(lane0, vec!["a", "b"]);
    assert_eq!(p.assets_at(4.0).len(), 2);
    assert_eq!(
        p.first_conflict(Lane::video(0), 4.0, 6.0, &[]).map(|a| a.id.as_str()),
        Some("a")
    );
    assert!(p.first_conflict(Lane::video(0), 4.0, 6.0, &["a", "b"]).is_none());
    assert_eq!(p.clamp_track(TrackKind::Video, 9), 1);
}

#[test]
fn track_counts_cannot_orphan_assets() {
    let mut p = basic_project();
    assert!(p.set_track_counts(1, 2).is_err());
    p.set_track_counts(3, 1).unwrap();
    assert_eq!(p.tracks.lanes().len(), 4);
    assert_eq!(p.tracks.display_row(Lane::audio(0)), 3);
}
