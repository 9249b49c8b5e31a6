use super::*;
use crate::animation::ease::Easing;
use crate::timeline::asset::{AssetKind, Playback, Provenance};
use crate::timeline::transition::TransitionSpec;

fn clip(id: &str, track: usize, start: f64, duration: f64) -> TimelineAsset {
    TimelineAsset::new(id, AssetKind::Video, id, track, start, duration)
        .with_source(format!("https://cdn.example/{id}.mp4"), None)
}

fn sourced(id: &str, start: f64, duration: f64, source: f64) -> TimelineAsset {
    TimelineAsset::new(id, AssetKind::Video, id, 0, start, duration)
        .with_source(format!("https://cdn.example/{id}.mp4"), Some(source))
}

fn project(assets: Vec<TimelineAsset>) -> TimelineProject {
    let mut p = TimelineProject::new("p1", "Pilot");
    p.assets = assets;
    p
}

fn get<'a>(p: &'a TimelineProject, id: &str) -> &'a TimelineAsset {
    p.asset(id).unwrap_or_else(|| panic!("missing asset {id}"))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn free_move_clamps_start_and_track() {
    let mut p = project(vec![clip("a", 0, 0.0, 5.0)]);
    let out = move_asset(&mut p, "a", 9, -3.0, EditMode::Normal).unwrap();
    assert_eq!(
        out,
        MoveOutcome::Moved {
            track: 1,
            start_time: 0.0,
            rippled: 0
        }
    );
    assert_eq!(get(&p, "a").track, 1);
}

#[test]
fn normal_move_into_a_neighbour_is_blocked() {
    let mut p = project(vec![clip("a", 0, 0.0, 5.0), clip("b", 0, 8.0, 3.0)]);
    let before = p.clone();
    let out = move_asset(&mut p, "a", 0, 6.0, EditMode::Normal).unwrap();
    assert_eq!(
        out,
        MoveOutcome::Blocked {
            conflict_with: "b".to_string()
        }
    );
    assert_eq!(p, before);
}

#[test]
fn move_rejects_non_finite_target_and_unknown_ids() {
    let mut p = project(vec![clip("a", 0, 0.0, 5.0)]);
    assert!(move_asset(&mut p, "a", 0, f64::NAN, EditMode::Normal).is_err());
    assert!(matches!(
        move_asset(&mut p, "zz", 0, 1.0, EditMode::Normal),
        Err(ReelcutError::NotFound(_))
    ));
}

#[test]
fn ripple_move_lands_on_the_nearer_edge_and_pushes() {
    let mut p = project(vec![
        clip("a", 0, 0.0, 5.0),
        clip("b", 0, 5.0, 3.0),
        clip("c", 0, 10.0, 2.0),
    ]);
    let out = move_asset(&mut p, "c", 0, 4.0, EditMode::ripple()).unwrap();
    assert_eq!(
        out,
        MoveOutcome::Moved {
            track: 0,
            start_time: 5.0,
            rippled: 1
        }
    );
    assert_eq!(get(&p, "a").start_time, 0.0);
    assert_eq!(get(&p, "c").start_time, 5.0);
    assert_eq!(get(&p, "b").start_time, 7.0);
    p.validate().unwrap();
}

#[test]
fn ripple_straddle_tie_goes_to_the_later_edge() {
    let mut p = project(vec![clip("a", 0, 0.0, 4.0), clip("x", 0, 10.0, 1.0)]);
    move_asset(&mut p, "x", 0, 2.0, EditMode::ripple()).unwrap();
    assert_eq!(get(&p, "x").start_time, 4.0);
    assert_eq!(get(&p, "a").start_time, 0.0);
}

#[test]
fn ripple_move_pushes_linked_lanes_by_the_same_delta() {
    let mut p = project(vec![
        clip("a", 0, 0.0, 5.0),
        clip("b", 0, 5.0, 3.0),
        clip("x", 0, 20.0, 2.0),
        clip("e", 1, 2.0, 2.0),
        clip("d", 1, 6.0, 3.0),
    ]);
    let out = move_asset(&mut p, "x", 0, 5.0, EditMode::ripple()).unwrap();
    assert_eq!(
        out,
        MoveOutcome::Moved {
            track: 0,
            start_time: 5.0,
            rippled: 2
        }
    );
    assert_eq!(get(&p, "b").start_time, 7.0);
    assert_eq!(get(&p, "d").start_time, 8.0);
    assert_eq!(get(&p, "e").start_time, 2.0);
    p.validate().unwrap();
}

#[test]
fn unlinked_lanes_do_not_ripple() {
    let mut p = project(vec![
        clip("b", 0, 5.0, 3.0),
        clip("x", 0, 20.0, 2.0),
        clip("d", 1, 6.0, 3.0),
    ]);
    let mode = EditMode::Ripple(RipplePolicy {
        link_video: false,
        link_audio: false,
    });
    move_asset(&mut p, "x", 0, 5.0, mode).unwrap();
    assert_eq!(get(&p, "b").start_time, 7.0);
    assert_eq!(get(&p, "d").start_time, 6.0);
}

#[test]
fn resize_end_normal_blocks_ripple_pushes() {
    let assets = vec![sourced("a", 0.0, 5.0, 20.0), clip("b", 0, 5.0, 3.0)];

    let mut p = project(assets.clone());
    let out = resize_asset(&mut p, "a", ResizeEdge::End, 6.0, EditMode::Normal).unwrap();
    assert!(out.is_blocked());
    assert_eq!(get(&p, "a").duration, 5.0);

    let mut p = project(assets);
    let out = resize_asset(&mut p, "a", ResizeEdge::End, 6.0, EditMode::ripple()).unwrap();
    assert_eq!(
        out,
        ResizeOutcome::Resized {
            start_time: 0.0,
            duration: 6.0,
            rippled: 1
        }
    );
    assert_eq!(get(&p, "a").trim_end, 14.0);
    assert_eq!(get(&p, "b").start_time, 6.0);
    p.validate().unwrap();
}

#[test]
fn ripple_shrink_closes_the_gap() {
    let mut p = project(vec![sourced("a", 0.0, 5.0, 20.0), clip("b", 0, 5.0, 3.0)]);
    resize_asset(&mut p, "a", ResizeEdge::End, 3.0, EditMode::ripple()).unwrap();
    assert_eq!(get(&p, "a").trim_end, 17.0);
    assert_eq!(get(&p, "b").start_time, 3.0);
}

#[test]
fn resize_start_keeps_the_end_and_moves_trim_start() {
    let mut a = sourced("a", 4.0, 4.0, 20.0);
    a.trim_start = 2.0;
    a.trim_end = 14.0;
    let mut p = project(vec![a]);

    resize_asset(&mut p, "a", ResizeEdge::Start, 5.0, EditMode::Normal).unwrap();
    let a = get(&p, "a");
    assert_eq!(a.start_time, 3.0);
    assert_eq!(a.end_time(), 8.0);
    assert_eq!(a.trim_start, 1.0);
    assert_eq!(a.trim_end, 14.0);

    // Only one second of head material left.
    let err = resize_asset(&mut p, "a", ResizeEdge::Start, 8.0, EditMode::Normal).unwrap_err();
    assert!(err.to_string().contains("head"), "{err}");
}

#[test]
fn resize_rejects_bad_durations_and_overlong_tails() {
    let mut p = project(vec![sourced("a", 0.0, 5.0, 20.0)]);
    assert!(resize_asset(&mut p, "a", ResizeEdge::End, 0.0, EditMode::Normal).is_err());
    assert!(resize_asset(&mut p, "a", ResizeEdge::End, f64::INFINITY, EditMode::Normal).is_err());
    assert!(resize_asset(&mut p, "a", ResizeEdge::End, 21.0, EditMode::Normal).is_err());
    resize_asset(&mut p, "a", ResizeEdge::End, 20.0, EditMode::Normal).unwrap();
    assert_eq!(get(&p, "a").trim_end, 0.0);
}

#[test]
fn images_stretch_without_trim_bookkeeping() {
    let img = TimelineAsset::new("i", AssetKind::Image, "still", 0, 0.0, 3.0)
        .with_source("https://cdn.example/i.png", None);
    let mut p = project(vec![img]);
    resize_asset(&mut p, "i", ResizeEdge::End, 30.0, EditMode::Normal).unwrap();
    let i = get(&p, "i");
    assert_eq!((i.trim_start, i.trim_end), (0.0, 0.0));
}

#[test]
fn split_books_every_source_second() {
    let mut a = sourced("a", 2.0, 10.0, 30.0);
    a.trim_start = 1.0;
    a.trim_end = 19.0;
    a.transition = Some(TransitionSpec::new("crossfade", 1.0, Easing::Linear));
    let mut p = project(vec![a]);

    let out = split_asset(&mut p, "a", 6.0).unwrap();
    assert!(p.asset("a").is_none());
    assert_ne!(out.left_id, out.right_id);

    let left = get(&p, &out.left_id);
    let right = get(&p, &out.right_id);
    assert_eq!((left.start_time, left.duration), (2.0, 4.0));
    assert_eq!((right.start_time, right.duration), (6.0, 6.0));
    assert_eq!((left.trim_start, left.trim_end), (1.0, 25.0));
    assert_eq!((right.trim_start, right.trim_end), (5.0, 19.0));
    for half in [left, right] {
        assert!(close(half.trim_start + half.source_span() + half.trim_end, 30.0));
    }
    assert!(left.transition.is_some());
    assert!(right.transition.is_none());
    p.validate().unwrap();
}

#[test]
fn split_of_reversed_fast_clip_swaps_trim_sides() {
    let mut a = sourced("a", 2.0, 10.0, 30.0);
    a.playback = Some(Playback {
        speed: 2.0,
        reversed: true,
    });
    a.trim_start = 4.0;
    a.trim_end = 6.0;
    let mut p = project(vec![a]);

    let out = split_asset(&mut p, "a", 6.0).unwrap();
    let left = get(&p, &out.left_id);
    let right = get(&p, &out.right_id);
    assert_eq!((left.trim_start, left.trim_end), (16.0, 6.0));
    assert_eq!((right.trim_start, right.trim_end), (4.0, 14.0));
    for half in [left, right] {
        assert!(close(half.trim_start + half.source_span() + half.trim_end, 30.0));
    }
}

#[test]
fn split_outside_the_span_is_rejected() {
    let mut p = project(vec![clip("a", 0, 2.0, 4.0)]);
    for at in [2.0, 6.0, 9.0, f64::NAN] {
        assert!(split_asset(&mut p, "a", at).is_err(), "{at}");
    }
    assert_eq!(p.assets.len(), 1);
}

#[test]
fn duplicate_slides_to_the_first_gap_in_normal_mode() {
    let mut p = project(vec![clip("a", 0, 0.0, 5.0), clip("b", 0, 5.0, 3.0)]);
    let id = duplicate_asset(&mut p, "a", EditMode::Normal).unwrap();
    assert_ne!(id, "a");
    assert_eq!(get(&p, &id).start_time, 8.0);
    assert_eq!(get(&p, "b").start_time, 5.0);
    p.validate().unwrap();
}

#[test]
fn duplicate_pushes_in_ripple_mode() {
    let mut p = project(vec![clip("a", 0, 0.0, 5.0), clip("b", 0, 5.0, 3.0)]);
    let id = duplicate_asset(&mut p, "a", EditMode::ripple()).unwrap();
    assert_eq!(get(&p, &id).start_time, 5.0);
    assert_eq!(get(&p, "b").start_time, 10.0);
    p.validate().unwrap();
}

#[test]
fn delete_with_an_unknown_id_removes_nothing() {
    let mut p = project(vec![clip("a", 0, 0.0, 5.0)]);
    let err = delete_assets(&mut p, &["a", "ghost"], EditMode::ripple()).unwrap_err();
    assert!(matches!(err, ReelcutError::Validation(_)));
    assert_eq!(p.assets.len(), 1);
}

#[test]
fn ripple_delete_clamps_on_linked_lanes() {
    let mut p = project(vec![
        clip("a", 0, 0.0, 5.0),
        clip("b", 0, 5.0, 3.0),
        clip("d", 1, 0.0, 6.0),
        clip("e", 1, 6.0, 3.0),
    ]);
    let removed = delete_assets(&mut p, &["a"], EditMode::ripple()).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(get(&p, "b").start_time, 0.0);
    // `d` still ends at 6, so `e` cannot move.
    assert_eq!(get(&p, "e").start_time, 6.0);
    p.validate().unwrap();
}

#[test]
fn ripple_delete_of_spans_on_linked_lanes_closes_every_gap() {
    let mut p = project(vec![
        clip("x", 0, 8.0, 6.0),
        clip("z", 0, 14.0, 6.0),
        clip("y", 1, 10.0, 2.0),
        clip("w", 1, 20.0, 2.0),
    ]);
    let removed = delete_assets(&mut p, &["y", "x"], EditMode::ripple()).unwrap();
    let ids: Vec<&str> = removed.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["x", "y"]);
    // Both spans end before either survivor, so each closes 6 + 2 seconds.
    assert_eq!(get(&p, "z").start_time, 6.0);
    assert_eq!(get(&p, "w").start_time, 12.0);
    p.validate().unwrap();
}

#[test]
fn ripple_delete_of_several_spans_on_one_lane() {
    let mut p = project(vec![
        clip("a", 0, 0.0, 5.0),
        clip("b", 0, 5.0, 3.0),
        clip("c", 0, 10.0, 2.0),
        clip("d", 0, 14.0, 1.0),
    ]);
    delete_assets(&mut p, &["c", "a"], EditMode::ripple()).unwrap();
    assert_eq!(get(&p, "b").start_time, 0.0);
    assert_eq!(get(&p, "d").start_time, 7.0);
    p.validate().unwrap();
}

#[test]
fn insert_assigns_fresh_ids() {
    let mut p = project(vec![clip("a", 0, 0.0, 5.0)]);
    let id = insert_asset(&mut p, clip("a", 1, 0.0, 1.0), EditMode::Normal).unwrap();
    assert_ne!(id, "a");
    let id = insert_asset(&mut p, clip("", 1, 4.0, 1.0), EditMode::Normal).unwrap();
    assert!(!id.is_empty());
    assert_eq!(p.assets.len(), 3);

    let bad = clip("bad", 0, 0.0, -1.0);
    assert!(insert_asset(&mut p, bad, EditMode::Normal).is_err());
}

#[test]
fn group_insert_keeps_offsets_and_takes_the_minimal_shift() {
    let mut p = project(Vec::new());
    let group = vec![clip("", 0, 20.0, 2.0), clip("", 1, 21.0, 2.0)];
    let first = insert_group(&mut p, group.clone(), EditMode::Normal).unwrap();
    let second = insert_group(&mut p, group, EditMode::Normal).unwrap();

    assert_eq!(get(&p, &first[0]).start_time, 20.0);
    assert_eq!(get(&p, &second[0]).start_time, 22.0);
    assert_eq!(get(&p, &second[1]).start_time, 23.0);
    p.validate().unwrap();
}

#[test]
fn group_members_may_not_overlap_each_other() {
    let mut p = project(Vec::new());
    let group = vec![clip("", 0, 0.0, 2.0), clip("", 0, 1.0, 2.0)];
    assert!(insert_group(&mut p, group, EditMode::Normal).is_err());
    assert!(p.assets.is_empty());
}

#[test]
fn composition_replaces_its_sources_atomically() {
    let mut p = project(vec![
        clip("a", 0, 0.0, 5.0),
        clip("b", 0, 5.0, 3.0),
        clip("c", 1, 1.0, 1.0),
    ]);
    let comp = clip("", 1, 99.0, 8.0).with_provenance(Provenance {
        origin: AssetOrigin::Composition,
        credits_used: 40.0,
        ..Provenance::default()
    });
    let id = replace_with_composition(&mut p, &["b", "a"], comp, EditMode::Normal).unwrap();

    let placed = get(&p, &id);
    assert_eq!((placed.track, placed.start_time), (0, 0.0));
    assert_eq!(
        placed.provenance.as_ref().map(|m| m.source_asset_ids.clone()),
        Some(vec!["b".to_string(), "a".to_string()])
    );
    assert!(p.asset("a").is_none() && p.asset("b").is_none());
    assert!(p.asset("c").is_some());

    let before = p.clone();
    let broken = clip("", 0, 0.0, 0.0);
    assert!(replace_with_composition(&mut p, &["c"], broken, EditMode::Normal).is_err());
    assert_eq!(p, before);
}
