use std::sync::Arc;

use aldb::error::AldbError;
use aldb::interval::Boundary;
use aldb::selector::Selector;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn week() -> Vec<String> {
    strings(&["mon", "tue", "wed", "thu", "fri", "sat", "sun"])
}

fn months() -> Vec<String> {
    strings(&["jan", "feb", "mar", "may", "apr", "jun", "jul", "aug", "sep", "oct", "nov", "dec"])
}

#[test]
fn one_selects_equal_elements() {
    let selected = Selector::one("foo-bar".to_string())
        .select(&strings(&["foo-bar", "bar-foo", "foo-bar"]))
        .unwrap();
    assert_eq!(selected, strings(&["foo-bar", "foo-bar"]));
}

#[test]
fn set_and_not_keep_input_order() {
    let items = strings(&["a", "b", "c", "d"]);
    let set = Selector::set(strings(&["d", "b", "x"]));
    assert_eq!(set.select(&items).unwrap(), strings(&["b", "d"]));
    let not = Selector::not(strings(&["d", "b", "x"]));
    assert_eq!(not.select(&items).unwrap(), strings(&["a", "c"]));
}

#[test]
fn all_and_none() {
    let items = week();
    assert_eq!(Selector::All.select(&items).unwrap(), items);
    assert!(Selector::<String>::None.select(&items).unwrap().is_empty());
    assert_eq!(Selector::<String>::All.select_indexed(&items).unwrap().len(), 7);
}

#[test]
fn interval_over_strings() {
    let items = strings(&["apple", "banana", "cherry", "date"]);
    let selector = Selector::interval(Boundary::excl("apple".to_string()), Boundary::incl("cherry".to_string()));
    assert_eq!(selector.select(&items).unwrap(), strings(&["banana", "cherry"]));
    let from_c = Selector::interval(Boundary::incl("c".to_string()), Boundary::open());
    assert_eq!(from_c.select(&items).unwrap(), strings(&["cherry", "date"]));
}

#[test]
fn interval_with_custom_comparator() {
    let by_len = Selector::interval_by(
        Boundary::incl("xx".to_string()),
        Boundary::excl("xxxx".to_string()),
        Arc::new(|l: &String, r: &String| l.len().cmp(&r.len())),
    );
    let items = strings(&["a", "bb", "ccc", "dddd"]);
    assert_eq!(by_len.select(&items).unwrap(), strings(&["bb", "ccc"]));
}

#[derive(Debug, Clone, PartialEq)]
struct Opaque(u8);

impl aldb::element::Element for Opaque {
    const KIND: &'static str = "opaque";
    fn parse_element(text: &str) -> aldb::Result<Self> {
        text.parse().map(Opaque).map_err(|e| AldbError::Format(format!("{e}")))
    }
    fn render(&self) -> String {
        self.0.to_string()
    }
}

#[test]
fn interval_without_order_needs_a_comparator() {
    let items = vec![Opaque(1), Opaque(2), Opaque(3)];
    let unordered = Selector::interval(Boundary::incl(Opaque(2)), Boundary::open());
    assert!(matches!(unordered.select(&items), Err(AldbError::ComparatorRequired("opaque"))));

    let ordered = Selector::interval_by(
        Boundary::incl(Opaque(2)),
        Boundary::open(),
        Arc::new(|l: &Opaque, r: &Opaque| l.0.cmp(&r.0)),
    );
    assert_eq!(ordered.select(&items).unwrap(), vec![Opaque(2), Opaque(3)]);
}

#[test]
fn regex_needs_a_full_match() {
    let items = strings(&["foobar", "foobarbaz", "xfoobar", "foo"]);
    let selector = Selector::regex("foo(bar)?").unwrap();
    assert_eq!(selector.select(&items).unwrap(), strings(&["foobar", "foo"]));
    assert!(matches!(
        Selector::<String>::regex("^(unclosed$"),
        Err(AldbError::MalformedSelectorString { .. })
    ));
}

#[test]
fn regex_over_integers_is_wrong_type() {
    let selector = Selector::<i64>::regex("^1$").unwrap();
    assert!(matches!(
        selector.select(&[1, 2]),
        Err(AldbError::WrongType { expected: "string", found: "int64" })
    ));
}

#[test]
fn one_index_counts_from_either_end() {
    let items = strings(&["foo", "bar", "zol"]);
    let last = Selector::<String>::one_index(-1).select_indexed(&items).unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[&-1], "zol");
    let first = Selector::<String>::one_index(0).select(&items).unwrap();
    assert_eq!(first, strings(&["foo"]));
    for out_of_range in [3, -4, 100] {
        assert!(Selector::<String>::one_index(out_of_range).select(&items).unwrap().is_empty());
    }
}

#[test]
fn index_set_is_keyed_by_extended_index() {
    let selection = Selector::<String>::index_set([-3, -2, -1]).select_indexed(&months()).unwrap();
    assert_eq!(selection.len(), 3);
    assert_eq!(selection[&-3], "oct");
    assert_eq!(selection[&-2], "nov");
    assert_eq!(selection[&-1], "dec");
}

#[test]
fn index_set_orders_by_extended_index() {
    let selected = Selector::<String>::index_set([2, -7, 0]).select(&week()).unwrap();
    // -7 and 0 name the same slot, both are kept
    assert_eq!(selected, strings(&["mon", "mon", "wed"]));
}

#[test]
fn index_interval_from_the_end() {
    let selector = Selector::<String>::index_interval(Boundary::incl(-4), Boundary::excl(-2));
    let selection = selector.select_indexed(&week()).unwrap();
    assert_eq!(selection.len(), 2);
    assert_eq!(selection[&-4], "thu");
    assert_eq!(selection[&-3], "fri");
}

#[test]
fn index_interval_spanning_zero_keeps_later_indexes() {
    // [-2, 1] covers -2, -1, 0, 1 over five slots: no collisions
    let selector = Selector::<String>::index_interval(Boundary::incl(-2), Boundary::incl(1));
    let selection = selector.select_indexed(&week()[..5]).unwrap();
    assert_eq!(selection.keys().copied().collect::<Vec<_>>(), vec![-2, -1, 0, 1]);

    // [-3, 1] over three slots: -3 and 0 share slot 0, -2 and 1 share slot 1
    let items = strings(&["a", "b", "c"]);
    let selector = Selector::<String>::index_interval(Boundary::incl(-3), Boundary::incl(1));
    let selection = selector.select_indexed(&items).unwrap();
    assert_eq!(selection.keys().copied().collect::<Vec<_>>(), vec![-1, 0, 1]);
    assert_eq!(selection[&-1], "c");
    assert_eq!(selection[&0], "a");
    assert_eq!(selection[&1], "b");
}

#[test]
fn index_interval_one_sided() {
    let items = week();
    let head = Selector::<String>::index_interval(Boundary::open(), Boundary::excl(2));
    assert_eq!(head.select(&items).unwrap(), strings(&["mon", "tue"]));
    let tail = Selector::<String>::index_interval(Boundary::incl(5), Boundary::open());
    assert_eq!(tail.select(&items).unwrap(), strings(&["sat", "sun"]));
    let beyond = Selector::<String>::index_interval(Boundary::incl(7), Boundary::open());
    assert!(beyond.select(&items).unwrap().is_empty());
    let below = Selector::<String>::index_interval(Boundary::open(), Boundary::incl(-8));
    assert!(below.select(&items).unwrap().is_empty());
    assert!(head.select(&[]).unwrap().is_empty());
}

#[test]
fn value_selectors_have_no_indexed_form() {
    assert!(Selector::one("a".to_string()).select_indexed(&strings(&["a"])).is_none());
    assert!(!Selector::set(strings(&["a"])).is_indexed());
    assert!(Selector::<String>::index_set([0]).is_indexed());
}

#[test]
fn union_keeps_first_appearance_order() {
    let selector = Selector::union([
        Selector::None,
        Selector::one("foo".to_string()),
        Selector::set(strings(&["bar", "zol"])),
        Selector::interval(Boundary::incl("x".to_string()), Boundary::open()),
    ]);
    let items = strings(&[
        "foo", "bar", "zol", "x", "xylophone", "y", "yoga", "zebra", "car", "bird", "word", "", "fish",
    ]);
    assert_eq!(
        selector.select(&items).unwrap(),
        strings(&["foo", "bar", "zol", "x", "xylophone", "y", "yoga", "zebra"])
    );
}

#[test]
fn union_does_not_duplicate() {
    let selector = Selector::union([Selector::set(strings(&["b", "a"])), Selector::All]);
    let items = strings(&["a", "b", "c"]);
    assert_eq!(selector.select(&items).unwrap(), items);
}

#[test]
fn intersection_narrows_step_by_step() {
    let selector = Selector::intersection([
        Selector::not(strings(&["wed"])),
        Selector::<String>::index_interval(Boundary::incl(1), Boundary::incl(3)),
    ]);
    // index interval applies to the already narrowed list
    assert_eq!(selector.select(&week()).unwrap(), strings(&["tue", "thu", "fri"]));
}

#[test]
fn intersection_stops_once_empty() {
    // a sub-selector that would fail is never reached
    let items = vec![Opaque(1)];
    let selector = Selector::intersection([
        Selector::None,
        Selector::interval(Boundary::incl(Opaque(0)), Boundary::open()),
    ]);
    assert!(selector.select(&items).unwrap().is_empty());
}

#[test]
fn integer_elements() {
    let items: Vec<i64> = vec![5, 1, 4, 2, 3];
    let selector = Selector::interval(Boundary::incl(2), Boundary::excl(5));
    assert_eq!(selector.select(&items).unwrap(), vec![4, 2, 3]);
    assert_eq!(Selector::set([3, 5]).select(&items).unwrap(), vec![5, 3]);
}

#[test]
fn positional_select_matches_select_indexed() {
    let days = week();
    for selector in [
        Selector::<String>::one_index(-1),
        Selector::one_index(9),
        Selector::index_set([4, -1, 0, -7]),
        Selector::index_interval(Boundary::incl(-3), Boundary::open()),
        Selector::index_interval(Boundary::open(), Boundary::excl(2)),
    ] {
        let indexed = selector.select_indexed(&days).unwrap();
        assert_eq!(selector.select(&days).unwrap(), indexed.into_values().collect::<Vec<_>>(), "{selector:?}");
    }
    assert!(Selector::<String>::index_set([0, 1]).select(&[]).unwrap().is_empty());
}
