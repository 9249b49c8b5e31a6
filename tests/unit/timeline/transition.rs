use super::*;
use crate::timeline::asset::AssetKind;

fn clip(start: f64, duration: f64) -> TimelineAsset {
    TimelineAsset::new("v1", AssetKind::Video, "shot", 0, start, duration)
        .with_source("https://cdn.example/v1.mp4", None)
}

#[test]
fn cut_is_valid_with_zero_duration() {
    let cut = TransitionSpec::cut();
    assert!(cut.is_cut());
    cut.validate().unwrap();
    assert_eq!(cut.progress_at(&clip(2.0, 4.0), 2.0), None);
}

#[test]
fn named_transition_needs_positive_duration() {
    assert!(
        TransitionSpec::new("crossfade", 0.0, Easing::Linear)
            .validate()
            .is_err()
    );
    assert!(
        TransitionSpec::new("  ", 1.0, Easing::Linear)
            .validate()
            .is_err()
    );
    assert!(
        TransitionSpec::new("crossfade", f64::NAN, Easing::Linear)
            .validate()
            .is_err()
    );
}

#[test]
fn transition_cannot_outlast_its_asset() {
    let spec = TransitionSpec::new("slide-left", 5.0, Easing::EaseOut);
    assert!(spec.validate_for(&clip(0.0, 4.0)).is_err());
    spec.validate_for(&clip(0.0, 5.0)).unwrap();
}

#[test]
fn progress_runs_over_the_seam_window() {
    let spec = TransitionSpec::new("crossfade", 1.0, Easing::Linear);
    let asset = clip(10.0, 4.0);
    assert_eq!(spec.window(&asset), (10.0, 11.0));
    assert_eq!(spec.progress_at(&asset, 9.99), None);
    assert_eq!(spec.progress_at(&asset, 10.0), Some(0.0));
    assert_eq!(spec.progress_at(&asset, 10.5), Some(0.5));
    assert_eq!(spec.progress_at(&asset, 11.0), None);
}
