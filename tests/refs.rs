use std::sync::Arc;

use aldb::error::AldbError;
use aldb::grammar::encode;
use aldb::interval::Boundary;
use aldb::refs::{ActivityRef, SeparatedVersionRefSelector, VersionRef, interval_activity_ref_selector};
use aldb::selector::Selector;

fn version_refs() -> Vec<VersionRef> {
    vec![
        VersionRef::new("foo", "12:00"),
        VersionRef::new("foo", "13:00"),
        VersionRef::new("foo", "14:00"),
        VersionRef::new("bar", "14:00"),
        VersionRef::new("zol", "13:00"),
        VersionRef::new("zol", "14:00"),
    ]
}

#[test]
fn previous_and_latest_of_chosen_activities() {
    let selector = SeparatedVersionRefSelector::new(
        Selector::set([ActivityRef::new("foo"), ActivityRef::new("bar")]),
        Selector::index_interval(Boundary::incl(-2), Boundary::incl(-1)),
    );
    let selected = selector.select(&version_refs()).unwrap();
    assert_eq!(
        selected,
        vec![
            VersionRef::new("foo", "13:00"),
            VersionRef::new("foo", "14:00"),
            VersionRef::new("bar", "14:00"),
        ]
    );
}

#[test]
fn versions_are_sorted_before_selection() {
    let refs = vec![
        VersionRef::new("doc", "2024-03"),
        VersionRef::new("doc", "2024-01"),
        VersionRef::new("doc", "2024-02"),
    ];
    let latest = SeparatedVersionRefSelector::new(Selector::All, Selector::one_index(-1));
    assert_eq!(latest.select(&refs).unwrap(), vec![VersionRef::new("doc", "2024-03")]);
}

#[test]
fn activity_interval_compares_ids() {
    let selector = interval_activity_ref_selector(Boundary::incl(ActivityRef::new("b")), Boundary::open());
    let activities = vec![ActivityRef::new("a"), ActivityRef::new("bar"), ActivityRef::new("zol")];
    assert_eq!(
        selector.select(&activities).unwrap(),
        vec![ActivityRef::new("bar"), ActivityRef::new("zol")]
    );
}

#[test]
fn activity_refs_have_no_natural_order() {
    let selector = Selector::interval(Boundary::incl(ActivityRef::new("b")), Boundary::open());
    assert!(matches!(
        selector.select(&[ActivityRef::new("a")]),
        Err(AldbError::ComparatorRequired("activity ref"))
    ));
}

#[test]
fn selector_pairs_travel_as_strings() {
    let json = r#"{"activity_ref_selector":"{foo, bar}","version_id_selector":"[#-2,#-1]"}"#;
    let selector: SeparatedVersionRefSelector = serde_json::from_str(json).unwrap();
    assert_eq!(selector.select(&version_refs()).unwrap().len(), 3);
    assert_eq!(serde_json::to_string(&selector).unwrap(), json);

    let yaml = "activity_ref_selector: '*'\nversion_id_selector: '#-1'\n";
    let latest: SeparatedVersionRefSelector = serde_yaml::from_str(yaml).unwrap();
    let selected = latest.select(&version_refs()).unwrap();
    assert_eq!(
        selected,
        vec![
            VersionRef::new("foo", "14:00"),
            VersionRef::new("bar", "14:00"),
            VersionRef::new("zol", "14:00"),
        ]
    );
}

#[test]
fn decoded_activity_intervals_compare_ids() {
    let json = r#"{"activity_ref_selector":"[bar,foo]","version_id_selector":"*"}"#;
    let selector: SeparatedVersionRefSelector = serde_json::from_str(json).unwrap();
    assert_eq!(
        selector.select(&version_refs()).unwrap(),
        vec![
            VersionRef::new("foo", "12:00"),
            VersionRef::new("foo", "13:00"),
            VersionRef::new("foo", "14:00"),
            VersionRef::new("bar", "14:00"),
        ]
    );
    assert_eq!(serde_json::to_string(&selector).unwrap(), json);

    let built = interval_activity_ref_selector(Boundary::incl(ActivityRef::new("bar")), Boundary::incl(ActivityRef::new("foo")));
    assert_eq!(selector.activity_ref_selector, built);
}

#[test]
fn custom_comparators_have_no_string_form() {
    let reversed = Selector::interval_by(
        Boundary::incl(ActivityRef::new("foo")),
        Boundary::open(),
        Arc::new(|left: &ActivityRef, right: &ActivityRef| right.activity_id.cmp(&left.activity_id)),
    );
    assert!(matches!(encode(&reversed), Err(AldbError::Unencodable(_))));
}

#[test]
fn regex_needs_text() {
    let selector = SeparatedVersionRefSelector::new(Selector::regex("^foo$").unwrap(), Selector::All);
    assert!(matches!(
        selector.select(&version_refs()),
        Err(AldbError::WrongType { expected: "string", found: "activity ref" })
    ));
}
