use super::*;
use crate::timeline::asset::AssetKind;

fn clip() -> TimelineAsset {
    let mut asset = TimelineAsset::new("v1", AssetKind::Video, "shot", 0, 0.0, 10.0)
        .with_source("https://cdn.example/v1.mp4", Some(10.0));
    asset.volume = 0.8;
    asset
}

#[test]
fn static_values_without_keyframes() {
    let asset = clip();
    assert_eq!(evaluate(&asset, AnimProperty::Scale, 3.0), 1.0);
    assert_eq!(evaluate(&asset, AnimProperty::Opacity, 3.0), 1.0);
    assert_eq!(evaluate(&asset, AnimProperty::X, 3.0), 0.0);
    assert_eq!(evaluate(&asset, AnimProperty::Volume, 3.0), 0.8);
}

#[test]
fn add_overwrites_instead_of_duplicating() {
    let mut asset = clip();
    add_keyframe(
        &mut asset,
        2.0,
        PropertyValues::single(AnimProperty::Opacity, 0.5),
        Easing::Linear,
    )
    .unwrap();
    assert_eq!(asset.keyframes.len(), 1);

    let change = add_keyframe(
        &mut asset,
        2.0,
        PropertyValues::single(AnimProperty::Opacity, 0.25),
        Easing::EaseIn,
    )
    .unwrap();
    assert_eq!(asset.keyframes.len(), 1);
    assert_eq!(change.updated, vec![AnimProperty::Opacity]);
    assert_eq!(change.appended, None);
    assert_eq!(asset.keyframes[0].values.opacity, Some(0.25));
    assert_eq!(asset.keyframes[0].easing, Easing::EaseIn);
}

#[test]
fn new_property_at_existing_time_appends_a_separate_key() {
    let mut asset = clip();
    add_keyframe(
        &mut asset,
        1.0,
        PropertyValues::single(AnimProperty::X, 10.0),
        Easing::Linear,
    )
    .unwrap();
    let change = add_keyframe(
        &mut asset,
        1.0,
        PropertyValues::single(AnimProperty::X, 20.0).with(AnimProperty::Y, 5.0),
        Easing::Linear,
    )
    .unwrap();
    assert_eq!(change.updated, vec![AnimProperty::X]);
    assert_eq!(change.appended, Some(1));
    assert_eq!(asset.keyframes.len(), 2);
    assert_eq!(asset.keyframes[0].values.x, Some(20.0));
    assert_eq!(asset.keyframes[1].values.y, Some(5.0));
    assert_eq!(asset.keyframes[1].values.x, None);
}

#[test]
fn add_rejects_out_of_range_and_empty_input() {
    let mut asset = clip();
    assert!(
        add_keyframe(
            &mut asset,
            11.0,
            PropertyValues::single(AnimProperty::X, 1.0),
            Easing::Linear
        )
        .is_err()
    );
    assert!(add_keyframe(&mut asset, 1.0, PropertyValues::default(), Easing::Linear).is_err());
    assert!(
        add_keyframe(
            &mut asset,
            1.0,
            PropertyValues::single(AnimProperty::X, f64::NAN),
            Easing::Linear
        )
        .is_err()
    );
    assert!(asset.keyframes.is_empty());
}

#[test]
fn remove_by_index() {
    let mut asset = clip();
    for t in [0.0, 5.0] {
        add_keyframe(
            &mut asset,
            t,
            PropertyValues::single(AnimProperty::Scale, t),
            Easing::Linear,
        )
        .unwrap();
    }
    let removed = remove_keyframe(&mut asset, 0).unwrap();
    assert_eq!(removed.time, 0.0);
    assert_eq!(asset.keyframes.len(), 1);
    assert!(remove_keyframe(&mut asset, 3).is_err());
}

#[test]
fn evaluation_sorts_clamps_and_interpolates() {
    let mut asset = clip();
    // Inserted out of order on purpose.
    add_keyframe(
        &mut asset,
        6.0,
        PropertyValues::single(AnimProperty::X, 100.0),
        Easing::Linear,
    )
    .unwrap();
    add_keyframe(
        &mut asset,
        2.0,
        PropertyValues::single(AnimProperty::X, 0.0),
        Easing::Linear,
    )
    .unwrap();

    assert_eq!(evaluate(&asset, AnimProperty::X, 0.0), 0.0);
    assert_eq!(evaluate(&asset, AnimProperty::X, 4.0), 50.0);
    assert_eq!(evaluate(&asset, AnimProperty::X, 9.0), 100.0);
    // Other properties are untouched.
    assert_eq!(evaluate(&asset, AnimProperty::Y, 4.0), 0.0);
}

#[test]
fn outgoing_easing_of_earlier_key_is_used() {
    let mut asset = clip();
    add_keyframe(
        &mut asset,
        0.0,
        PropertyValues::single(AnimProperty::Opacity, 0.0),
        Easing::EaseIn,
    )
    .unwrap();
    add_keyframe(
        &mut asset,
        4.0,
        PropertyValues::single(AnimProperty::Opacity, 1.0),
        Easing::Linear,
    )
    .unwrap();
    let mid = evaluate(&asset, AnimProperty::Opacity, 2.0);
    assert!((mid - Easing::EaseIn.apply(0.5)).abs() < 1e-12);
}

#[test]
fn evaluate_all_samples_every_property() {
    let mut asset = clip();
    add_keyframe(
        &mut asset,
        0.0,
        PropertyValues::single(AnimProperty::Rotation, 0.0).with(AnimProperty::Blur, 4.0),
        Easing::Linear,
    )
    .unwrap();
    add_keyframe(
        &mut asset,
        10.0,
        PropertyValues::single(AnimProperty::Rotation, 90.0),
        Easing::Linear,
    )
    .unwrap();
    let props = evaluate_all(&asset, 5.0);
    assert_eq!(props.rotation, 45.0);
    assert_eq!(props.blur, 4.0);
    assert_eq!(props.scale, 1.0);
    assert_eq!(props.volume, 0.8);
}

#[test]
fn split_inserts_boundary_keys_on_both_halves() {
    let mut asset = clip();
    add_keyframe(
        &mut asset,
        0.0,
        PropertyValues::single(AnimProperty::X, 0.0),
        Easing::Linear,
    )
    .unwrap();
    add_keyframe(
        &mut asset,
        10.0,
        PropertyValues::single(AnimProperty::X, 100.0),
        Easing::Linear,
    )
    .unwrap();

    let (left, right) = split_keyframes(&asset, 4.0);
    assert_eq!(left.len(), 2);
    assert_eq!(left[1].time, 4.0);
    assert_eq!(left[1].values.x, Some(40.0));
    assert_eq!(right.len(), 2);
    assert_eq!(right[0].time, 6.0);
    assert_eq!(right[1].time, 0.0);
    assert_eq!(right[1].values.x, Some(40.0));
}

#[test]
fn keyframe_json_is_flat() {
    let kf = TimelineKeyframe::new(
        1.5,
        PropertyValues::single(AnimProperty::Opacity, 0.5),
        Easing::EaseOut,
    );
    let v = serde_json::to_value(&kf).unwrap();
    assert_eq!(v["time"], 1.5);
    assert_eq!(v["opacity"], 0.5);
    assert_eq!(v["easing"], "ease-out");
    assert!(v.get("x").is_none());
}
