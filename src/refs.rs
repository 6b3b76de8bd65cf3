//! References to activities and their versions, and selection over them.

// used to print out readable forms of refs
use std::fmt;
use std::sync::Arc;

// fast hashing for grouping by activity
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;
use std::collections::HashMap;
// so the activity id comparator is built once and shared
use lazy_static::lazy_static;
// a selector pair travels as two strings
use serde::{Deserialize, Serialize};
use tracing::debug;

// our own stuff that we need
use crate::element::Element;
use crate::error::{AldbError, Result};
use crate::interval::{Boundary, Comparator};
use crate::selector::Selector;

pub type RefHasher = BuildHasherDefault<SeaHasher>;

const VERSION_SEPARATOR: char = '|';

lazy_static! {
    static ref BY_ACTIVITY_ID: Comparator<ActivityRef> =
        Arc::new(|left: &ActivityRef, right: &ActivityRef| left.activity_id.cmp(&right.activity_id));
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivityRef {
    pub activity_id: String,
}

impl ActivityRef {
    pub fn new(activity_id: impl Into<String>) -> Self {
        Self { activity_id: activity_id.into() }
    }
}

impl fmt::Display for ActivityRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.activity_id)
    }
}

// no natural order; decoded intervals compare by activity id
impl Element for ActivityRef {
    const KIND: &'static str = "activity ref";
    fn parse_element(text: &str) -> Result<Self> {
        Ok(ActivityRef::new(text))
    }
    fn render(&self) -> String {
        self.activity_id.clone()
    }
    fn comparator() -> Option<Comparator<Self>> {
        Some(Arc::clone(&BY_ACTIVITY_ID))
    }
}

/// A version of an activity. Version ids of one activity are expected to
/// increase when sorted lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRef {
    pub activity_ref: ActivityRef,
    pub version_id: String,
}

impl VersionRef {
    pub fn new(activity_id: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            activity_ref: ActivityRef::new(activity_id),
            version_id: version_id.into(),
        }
    }
}

impl fmt::Display for VersionRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.activity_ref, VERSION_SEPARATOR, self.version_id)
    }
}

impl Element for VersionRef {
    const KIND: &'static str = "version ref";
    fn parse_element(text: &str) -> Result<Self> {
        let (activity_id, version_id) = text.split_once(VERSION_SEPARATOR).ok_or_else(|| {
            AldbError::malformed(text, format!("a version ref is written as 'activity{}version'", VERSION_SEPARATOR))
        })?;
        Ok(VersionRef::new(activity_id, version_id))
    }
    fn render(&self) -> String {
        self.to_string()
    }
}

/// An interval over activity refs, ordered by activity id.
pub fn interval_activity_ref_selector(from: Boundary<ActivityRef>, to: Boundary<ActivityRef>) -> Selector<ActivityRef> {
    Selector::interval_by(from, to, Arc::clone(&BY_ACTIVITY_ID))
}

/// Selects version refs in two steps: activities first, then the versions
/// of each selected activity.
///
/// The version selector sees the sorted version ids of one activity at a
/// time, so `[#-2,#-1]` picks the previous and the latest version of every
/// selected activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparatedVersionRefSelector {
    pub activity_ref_selector: Selector<ActivityRef>,
    pub version_id_selector: Selector<String>,
}

impl SeparatedVersionRefSelector {
    pub fn new(activity_ref_selector: Selector<ActivityRef>, version_id_selector: Selector<String>) -> Self {
        Self { activity_ref_selector, version_id_selector }
    }

    /// Returns the selected refs grouped by activity, activities in the order
    /// the activity selector returns them (first appearance for value based
    /// selectors) and versions sorted within each activity.
    pub fn select(&self, version_refs: &[VersionRef]) -> Result<Vec<VersionRef>> {
        let (activities, mut versions) = group_by_activity(version_refs);
        let passed = self.activity_ref_selector.select(&activities)?;
        let mut out = Vec::with_capacity(version_refs.len());
        for activity_ref in passed {
            let mut version_ids = versions.remove(&activity_ref).unwrap_or_default();
            version_ids.sort();
            let picked = self.version_id_selector.select(&version_ids)?;
            out.extend(picked.into_iter().map(|version_id| VersionRef {
                activity_ref: activity_ref.clone(),
                version_id,
            }));
        }
        debug!(activities = activities.len(), selected = out.len(), "version refs selected");
        Ok(out)
    }
}

/// Splits version refs into the distinct activities, in order of first
/// appearance, and the version ids seen for each.
pub fn group_by_activity(
    version_refs: &[VersionRef],
) -> (Vec<ActivityRef>, HashMap<ActivityRef, Vec<String>, RefHasher>) {
    let mut order = Vec::new();
    let mut versions: HashMap<ActivityRef, Vec<String>, RefHasher> = HashMap::default();
    for version_ref in version_refs {
        let ids = versions.entry(version_ref.activity_ref.clone()).or_insert_with(|| {
            order.push(version_ref.activity_ref.clone());
            Vec::new()
        });
        ids.push(version_ref.version_id.clone());
    }
    (order, versions)
}
