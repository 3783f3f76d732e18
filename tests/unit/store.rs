use super::*;
use crate::foundation::core::TraitName;

fn catalog() -> Catalog {
    let mut c = Catalog::default();
    c.insert("bg".into(), "red".into(), "1".into());
    c.insert("bg".into(), "none".into(), "2".into());
    c.insert("eyes".into(), "big".into(), "3".into());
    c.insert("eyes".into(), "none".into(), "4".into());
    c
}

fn store() -> TraitStore {
    TraitStore::new(
        catalog(),
        Order::new(vec!["bg".into(), "eyes".into()]),
        Some(7),
    )
}

fn frame(id: &str) -> TraitChoice {
    TraitChoice::Frame(TraitId::new(id))
}

#[test]
fn order_saved_form_round_trips() {
    let order = Order::new(vec!["bg".into(), "eyes".into(), "mouth".into()]);
    assert_eq!(order.to_saved(), "bg,eyes,mouth");
    assert_eq!(Order::parse_saved("bg,eyes,mouth"), order);
    assert_eq!(Order::parse_saved("bg,,eyes,"), Order::new(vec!["bg".into(), "eyes".into()]));
    assert!(Order::parse_saved("").is_empty());
}

#[test]
fn order_drops_repeated_types() {
    let order = Order::new(vec!["bg".into(), "eyes".into(), "bg".into()]);
    assert_eq!(order.as_slice(), &[TraitType::new("bg"), TraitType::new("eyes")]);
}

#[test]
fn none_choice_removes_entry_and_is_noop_when_absent() {
    let mut s = store();
    assert!(s.choose(&"bg".into(), frame("1")));
    assert_eq!(s.selection().get(&"bg".into()), Some(&TraitId::new("1")));

    assert!(s.choose(&"bg".into(), TraitChoice::Empty));
    assert!(!s.selection().contains(&"bg".into()));

    assert!(s.choose(&"bg".into(), TraitChoice::Empty));
    assert!(s.selection().is_empty());
}

#[test]
fn choose_rejects_unordered_types_and_uncatalogued_frames() {
    let mut s = store();
    assert!(!s.choose(&"hat".into(), frame("1")));
    assert!(!s.choose(&"bg".into(), frame("3")));
    assert!(s.selection().is_empty());
}

#[test]
fn choose_overwrites_previous_selection_for_type() {
    let mut s = store();
    s.choose(&"bg".into(), frame("1"));
    s.choose(&"bg".into(), frame("2"));
    assert_eq!(s.selection().len(), 1);
    assert_eq!(s.selection().get(&"bg".into()), Some(&TraitId::new("2")));
}

#[test]
fn set_order_drops_unknown_types_and_prunes_selection() {
    let mut s = store();
    s.choose(&"bg".into(), frame("1"));
    s.choose(&"eyes".into(), frame("3"));

    s.set_order(vec!["eyes".into(), "ghost".into(), "eyes".into()]);

    assert_eq!(s.order().as_slice(), &[TraitType::new("eyes")]);
    assert!(!s.selection().contains(&"bg".into()));
    assert!(s.selection().contains(&"eyes".into()));
}

#[test]
fn randomize_all_only_touches_ordered_types() {
    let mut c = catalog();
    c.insert("hat".into(), "cap".into(), "5".into());
    let mut s = TraitStore::new(c, Order::new(vec!["bg".into(), "eyes".into()]), Some(1));

    for _ in 0..32 {
        s.randomize_all();
        assert!(!s.selection().contains(&"hat".into()));
        for (ty, _) in s.selection().iter() {
            assert!(s.order().contains(ty));
        }
    }
}

#[test]
fn randomize_all_with_single_trait_always_selects_it() {
    let mut c = Catalog::default();
    c.insert("bg".into(), "red".into(), "1".into());
    let mut s = TraitStore::new(c, Order::new(vec!["bg".into()]), None);

    for _ in 0..16 {
        s.randomize_all();
        assert_eq!(s.selection().get(&"bg".into()), Some(&TraitId::new("1")));
    }
}

#[test]
fn randomize_picks_every_option_eventually() {
    let mut s = store();
    let mut saw_red = false;
    let mut saw_none = false;
    for _ in 0..200 {
        s.randomize_one(&"bg".into()).unwrap();
        match s.selection().get(&"bg".into()) {
            Some(id) => {
                assert_eq!(s.catalog().name_of(&"bg".into(), id), Some(&TraitName::new("red")));
                saw_red = true;
            }
            None => saw_none = true,
        }
    }
    assert!(saw_red && saw_none);
}

#[test]
fn randomize_is_reproducible_with_seed() {
    let mut a = store();
    let mut b = store();
    for _ in 0..10 {
        a.randomize_all();
        b.randomize_all();
        assert_eq!(a.selection(), b.selection());
    }
}

#[test]
fn randomize_one_rejects_missing_layer() {
    let mut s = store();
    let err = s.randomize_one(&"hat".into()).unwrap_err();
    assert!(matches!(err, WorkbenchError::Validation(_)));
}

#[test]
fn delete_and_clear() {
    let mut s = store();
    s.choose(&"bg".into(), frame("1"));
    s.choose(&"eyes".into(), frame("3"));

    assert!(s.delete_one(&"bg".into()));
    assert!(!s.delete_one(&"bg".into()));
    assert_eq!(s.selection().len(), 1);

    s.clear();
    assert!(s.selection().is_empty());
}
