use super::*;
use crate::timeline::asset::TrackKind;

fn media(kind: AssetKind, duration: Option<f64>) -> UploadedMedia {
    UploadedMedia {
        url: "https://cdn.example/u/beach.mp4".to_string(),
        storage_key: "uploads/p1/beach.mp4".to_string(),
        kind,
        name: None,
        duration,
    }
}

#[test]
fn video_upload_uses_whole_source() {
    let asset = media(AssetKind::Video, Some(12.5)).to_asset(1, 3.0).unwrap();
    assert_eq!(asset.duration, 12.5);
    assert_eq!(asset.source_duration, Some(12.5));
    assert_eq!(asset.trim_end, 0.0);
    assert_eq!(asset.start_time, 3.0);
    assert_eq!(asset.track, 1);
    assert_eq!(asset.track_kind, TrackKind::Video);
    assert_eq!(asset.name, "beach.mp4");
    assert!(asset.id.is_empty());

    let provenance = asset.provenance.unwrap();
    assert_eq!(provenance.origin, AssetOrigin::Upload);
    assert_eq!(provenance.storage_key.as_deref(), Some("uploads/p1/beach.mp4"));
    assert_eq!(provenance.credits_used, 0.0);
}

#[test]
fn images_get_the_default_still_length() {
    let mut m = media(AssetKind::Image, None);
    m.name = Some("Poster".to_string());
    let asset = m.to_asset(0, 0.0).unwrap();
    assert_eq!(asset.duration, DEFAULT_STILL_SECS);
    assert_eq!(asset.source_duration, None);
    assert_eq!(asset.name, "Poster");
}

#[test]
fn music_lands_on_audio_lanes() {
    let asset = media(AssetKind::Music, Some(90.0)).to_asset(0, 0.0).unwrap();
    assert_eq!(asset.track_kind, TrackKind::Audio);
}

#[test]
fn rejects_unusable_uploads() {
    assert!(media(AssetKind::Text, None).to_asset(0, 0.0).is_err());
    assert!(media(AssetKind::Audio, None).to_asset(0, 0.0).is_err());
    assert!(media(AssetKind::Video, Some(0.0)).to_asset(0, 0.0).is_err());

    let mut no_url = media(AssetKind::Image, None);
    no_url.url = "  ".to_string();
    assert!(matches!(
        no_url.to_asset(0, 0.0),
        Err(ReelcutError::Validation(_))
    ));
}
