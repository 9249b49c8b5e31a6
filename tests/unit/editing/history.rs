use super::*;

fn named(name: &str) -> TimelineProject {
    TimelineProject::new("p", name)
}

#[test]
fn undo_then_redo_round_trips() {
    let mut h = History::new(10);
    h.record("rename", &named("one"));
    let restored = h.undo(&named("two")).unwrap();
    assert_eq!(restored.name, "one");
    assert_eq!(h.redo_label(), Some("rename"));
    let again = h.redo(&restored).unwrap();
    assert_eq!(again.name, "two");
    assert!(h.can_undo());
}

#[test]
fn recording_clears_redo_and_depth_is_capped() {
    let mut h = History::new(2);
    for name in ["a", "b", "c"] {
        h.record(name, &named(name));
    }
    assert_eq!(h.undo_depth(), 2);
    assert_eq!(h.undo_label(), Some("c"));

    h.undo(&named("d"));
    assert!(h.can_redo());
    h.record("e", &named("e"));
    assert!(!h.can_redo());
}

#[test]
fn batches_collapse_into_one_step() {
    let mut h = History::new(10);
    h.begin_batch("drag", &named("start"));
    h.record("nudge", &named("mid"));
    h.end_batch(&named("end"));
    assert_eq!(h.undo_depth(), 1);
    assert_eq!(h.undo(&named("end")).map(|p| p.name), Some("start".to_string()));

    // A batch that changed nothing leaves no entry.
    let mut h = History::new(10);
    h.begin_batch("noop", &named("same"));
    h.end_batch(&named("same"));
    assert!(!h.can_undo());
}

#[test]
fn zero_depth_disables_history() {
    let mut h = History::new(0);
    h.record("x", &named("x"));
    assert!(h.undo(&named("y")).is_none());
}
