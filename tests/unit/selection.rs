use super::*;
use crate::catalog::Catalog;
use crate::foundation::core::TraitId;
use crate::host::NodeKind;
use crate::store::Order;

fn frame(id: &str, name: &str) -> NodeInfo {
    NodeInfo {
        id: TraitId::new(id),
        name: name.to_string(),
        kind: NodeKind::Frame,
    }
}

fn store() -> TraitStore {
    let mut c = Catalog::default();
    c.insert("bg".into(), "red".into(), "1".into());
    c.insert("bg".into(), "none".into(), "2".into());
    c.insert("eyes".into(), "big".into(), "3".into());
    c.insert("eyes".into(), "small".into(), "5".into());
    c.insert("eyes".into(), "none".into(), "4".into());
    TraitStore::new(c, Order::new(vec!["bg".into(), "eyes".into()]), Some(3))
}

#[test]
fn batch_sets_one_trait_per_type() {
    let mut s = store();
    let mut ctl = SelectionController::default();

    let outcome = ctl.on_selection_changed(
        &mut s,
        &[
            frame("1", "trait#bg#red"),
            frame("3", "trait#eyes#big"),
            frame("5", "trait#eyes#small"),
        ],
    );

    assert_eq!(outcome, SelectionOutcome::Applied { changed: 3 });
    assert_eq!(s.selection().len(), 2);
    assert_eq!(s.selection().get(&"eyes".into()), Some(&TraitId::new("5")));
}

#[test]
fn none_frame_removes_selection() {
    let mut s = store();
    let mut ctl = SelectionController::default();
    ctl.on_selection_changed(&mut s, &[frame("1", "trait#bg#red")]);
    ctl.on_selection_changed(&mut s, &[frame("2", "trait#bg#NONE")]);
    assert!(s.selection().is_empty());
}

#[test]
fn empty_event_keeps_previous_selection() {
    let mut s = store();
    let mut ctl = SelectionController::default();
    ctl.on_selection_changed(&mut s, &[frame("1", "trait#bg#red")]);

    let outcome = ctl.on_selection_changed(&mut s, &[]);
    assert_eq!(outcome, SelectionOutcome::Applied { changed: 0 });
    assert_eq!(s.selection().get(&"bg".into()), Some(&TraitId::new("1")));
}

#[test]
fn non_frames_and_untagged_frames_are_ignored() {
    let mut s = store();
    let mut ctl = SelectionController::default();
    let group = NodeInfo {
        kind: NodeKind::Group,
        ..frame("1", "trait#bg#red")
    };
    ctl.on_selection_changed(&mut s, &[group, frame("9", "hero")]);
    assert!(s.selection().is_empty());
}

#[test]
fn replace_with_non_frame_keeps_selection_and_returns_to_idle() {
    let mut s = store();
    let mut ctl = SelectionController::default();
    ctl.on_selection_changed(&mut s, &[frame("3", "trait#eyes#big")]);

    assert_eq!(ctl.begin_replace("eyes".into()), None);
    let text = NodeInfo {
        kind: NodeKind::Text,
        ..frame("7", "caption")
    };
    let outcome = ctl.on_selection_changed(&mut s, &[text]);

    assert_eq!(
        outcome,
        SelectionOutcome::ReplaceRejected {
            layer: "eyes".into(),
            reason: ReplaceRejection::NoFrame,
        }
    );
    assert!(!outcome.needs_render());
    assert_eq!(s.selection().get(&"eyes".into()), Some(&TraitId::new("3")));
    assert_eq!(ctl.state(), &ReplaceState::Idle);
}

#[test]
fn replace_commits_first_frame_then_handler_is_gone() {
    let mut s = store();
    let mut ctl = SelectionController::default();
    ctl.begin_replace("eyes".into());

    let outcome = ctl.on_selection_changed(
        &mut s,
        &[frame("5", "trait#eyes#small"), frame("3", "trait#eyes#big")],
    );
    assert_eq!(outcome, SelectionOutcome::Replaced("eyes".into()));
    assert_eq!(s.selection().get(&"eyes".into()), Some(&TraitId::new("5")));
    assert_eq!(ctl.state(), &ReplaceState::Idle);

    // A later event goes through the ordinary path again.
    let outcome = ctl.on_selection_changed(&mut s, &[frame("1", "trait#bg#red")]);
    assert_eq!(outcome, SelectionOutcome::Applied { changed: 1 });
    assert_eq!(s.selection().get(&"eyes".into()), Some(&TraitId::new("5")));
}

#[test]
fn replace_rejects_frame_from_another_layer() {
    let mut s = store();
    let mut ctl = SelectionController::default();
    ctl.begin_replace("eyes".into());

    let outcome = ctl.on_selection_changed(&mut s, &[frame("1", "trait#bg#red")]);
    assert_eq!(
        outcome,
        SelectionOutcome::ReplaceRejected {
            layer: "eyes".into(),
            reason: ReplaceRejection::WrongLayer,
        }
    );
    assert!(s.selection().is_empty());
}

#[test]
fn replace_with_none_trait_clears_layer() {
    let mut s = store();
    let mut ctl = SelectionController::default();
    ctl.on_selection_changed(&mut s, &[frame("3", "trait#eyes#big")]);
    ctl.begin_replace("eyes".into());

    let outcome = ctl.on_selection_changed(&mut s, &[frame("4", "trait#eyes#none")]);
    assert_eq!(outcome, SelectionOutcome::Replaced("eyes".into()));
    assert!(!s.selection().contains(&"eyes".into()));
}

#[test]
fn second_replace_request_supersedes_first() {
    let mut ctl = SelectionController::default();
    assert_eq!(ctl.begin_replace("bg".into()), None);
    assert_eq!(ctl.begin_replace("eyes".into()), Some("bg".into()));
    assert_eq!(
        ctl.state(),
        &ReplaceState::AwaitingReplacement("eyes".into())
    );
}
