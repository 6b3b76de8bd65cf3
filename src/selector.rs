//! Selectors filter an ordered sequence of elements or pick elements by
//! position.
//!
//! All selectors share [`Selector::select`]. The positional ones (and `All`
//! and `None`) also offer [`Selector::select_indexed`], which keys each
//! picked element by its *extended index*: for a sequence of length `n`,
//! indexes run over `[-n, n-1]` and `i - n` names the same slot as `i`.
//! Positional selections come back ordered by extended index.
//!
//! The canonical string form of each variant lives in [`crate::grammar`].

// positional picks are keyed by extended index
use std::collections::BTreeMap;
use std::fmt;
// comparators are shared, not copied
use std::sync::Arc;

// used for regex selectors
use regex::Regex;
use tracing::debug;

// our own stuff that we need
use crate::element::Element;
use crate::error::{AldbError, Result};
use crate::interval::{Boundary, Comparator, Interval};

pub enum Selector<T> {
    All,
    None,
    One(T),
    Set(Vec<T>),
    Not(Vec<T>),
    Interval { from: Boundary<T>, to: Boundary<T>, compare: Option<Comparator<T>> },
    Regex(Pattern),
    OneIndex(i64),
    IndexSet(Vec<i64>),
    IndexInterval { from: Boundary<i64>, to: Boundary<i64> },
    Union(Vec<Selector<T>>),
    Intersection(Vec<Selector<T>>),
}

impl<T: Element> Selector<T> {
    pub fn one(value: T) -> Self {
        Selector::One(value)
    }
    pub fn set(values: impl IntoIterator<Item = T>) -> Self {
        Selector::Set(values.into_iter().collect())
    }
    pub fn not(black_list: impl IntoIterator<Item = T>) -> Self {
        Selector::Not(black_list.into_iter().collect())
    }
    /// An interval over the element's natural order.
    pub fn interval(from: Boundary<T>, to: Boundary<T>) -> Self {
        Selector::Interval { from, to, compare: None }
    }
    pub fn interval_by(from: Boundary<T>, to: Boundary<T>, compare: Comparator<T>) -> Self {
        Selector::Interval { from, to, compare: Some(compare) }
    }
    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(Selector::Regex(Pattern::new(pattern)?))
    }
    pub fn one_index(index: i64) -> Self {
        Selector::OneIndex(index)
    }
    pub fn index_set(indexes: impl IntoIterator<Item = i64>) -> Self {
        Selector::IndexSet(indexes.into_iter().collect())
    }
    pub fn index_interval(from: Boundary<i64>, to: Boundary<i64>) -> Self {
        Selector::IndexInterval { from, to }
    }
    pub fn union(subs: impl IntoIterator<Item = Selector<T>>) -> Self {
        Selector::Union(subs.into_iter().collect())
    }
    pub fn intersection(subs: impl IntoIterator<Item = Selector<T>>) -> Self {
        Selector::Intersection(subs.into_iter().collect())
    }

    /// Whether [`Selector::select_indexed`] is available for this variant.
    pub fn is_indexed(&self) -> bool {
        matches!(
            self,
            Selector::All
                | Selector::None
                | Selector::OneIndex(_)
                | Selector::IndexSet(_)
                | Selector::IndexInterval { .. }
        )
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Selector::Union(_) | Selector::Intersection(_))
    }

    /// Returns the selected elements.
    ///
    /// Value based selectors keep the input order. Positional selectors return
    /// their picks ordered by extended index. Fails with `ComparatorRequired`
    /// for intervals over elements without a natural order and no comparator,
    /// and with `WrongType` for regexes over elements without a text view.
    pub fn select(&self, items: &[T]) -> Result<Vec<T>> {
        let selected = match self {
            Selector::All => items.to_vec(),
            Selector::None => Vec::new(),
            Selector::One(value) => items.iter().filter(|item| *item == value).cloned().collect(),
            Selector::Set(values) => intersection(items, values),
            Selector::Not(black_list) => difference(items, black_list),
            Selector::Interval { from, to, compare } => {
                let interval = Interval::new(from.clone(), to.clone());
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    if interval.contains(item, compare.as_ref())? {
                        out.push(item.clone());
                    }
                }
                out
            }
            Selector::Regex(pattern) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let text = item
                        .text()
                        .ok_or(AldbError::WrongType { expected: "string", found: T::KIND })?;
                    if pattern.is_full_match(text) {
                        out.push(item.clone());
                    }
                }
                out
            }
            Selector::OneIndex(index) => pick_indexes(std::slice::from_ref(index), items).into_values().collect(),
            Selector::IndexSet(indexes) => pick_indexes(indexes, items).into_values().collect(),
            Selector::IndexInterval { from, to } => pick_window(from, to, items).into_values().collect(),
            Selector::Union(subs) => {
                let mut unselected = items.to_vec();
                let mut out = Vec::with_capacity(items.len());
                for sub in subs {
                    let picked = sub.select(&unselected)?;
                    unselected = difference(&unselected, &picked);
                    out.extend(picked);
                }
                // stable, so equal elements keep the order they were picked in
                out.sort_by_key(|item| position(items, item));
                out
            }
            Selector::Intersection(subs) => {
                let mut out = items.to_vec();
                for sub in subs {
                    if out.is_empty() {
                        break;
                    }
                    out = sub.select(&out)?;
                }
                out
            }
        };
        debug!(input = items.len(), selected = selected.len(), "selection done");
        Ok(selected)
    }

    /// Returns the selected elements keyed by extended index, or `None` for
    /// variants that do not select by position.
    pub fn select_indexed(&self, items: &[T]) -> Option<BTreeMap<i64, T>> {
        match self {
            Selector::All => Some(items.iter().cloned().enumerate().map(|(i, item)| (i as i64, item)).collect()),
            Selector::None => Some(BTreeMap::new()),
            Selector::OneIndex(index) => Some(pick_indexes(std::slice::from_ref(index), items)),
            Selector::IndexSet(indexes) => Some(pick_indexes(indexes, items)),
            Selector::IndexInterval { from, to } => Some(pick_window(from, to, items)),
            _ => None,
        }
    }
}

// slices never hold more than isize::MAX elements
fn extended_len<T>(items: &[T]) -> i64 {
    items.len() as i64
}

fn pick_indexes<T: Clone>(indexes: &[i64], items: &[T]) -> BTreeMap<i64, T> {
    let n = extended_len(items);
    indexes
        .iter()
        .filter_map(|index| to_actual_index(*index, n).map(|slot| (*index, items[slot].clone())))
        .collect()
}

fn pick_window<T: Clone>(from: &Boundary<i64>, to: &Boundary<i64>, items: &[T]) -> BTreeMap<i64, T> {
    let n = extended_len(items);
    let Some(interval) = correct_boundaries(from, to, n) else {
        return BTreeMap::new();
    };
    // actual slot -> extended index; a later extended index for the same slot
    // replaces the earlier one
    let mut slots: BTreeMap<usize, i64> = BTreeMap::new();
    for extended in (-n..n).filter(|extended| interval.covers(extended)) {
        if let Some(slot) = to_actual_index(extended, n) {
            slots.insert(slot, extended);
        }
    }
    slots.into_iter().map(|(slot, extended)| (extended, items[slot].clone())).collect()
}

/// Maps an extended index onto a slot of a sequence with `n` elements.
pub fn to_actual_index(extended: i64, n: i64) -> Option<usize> {
    if extended < -n || extended >= n {
        return None;
    }
    let actual = if extended < 0 { extended + n } else { extended };
    usize::try_from(actual).ok()
}

/// Brings index boundaries into the extended range of a sequence with `n`
/// elements and closes both sides. Returns `None` when nothing can be
/// selected.
pub fn correct_boundaries(from: &Boundary<i64>, to: &Boundary<i64>, n: i64) -> Option<Interval<i64>> {
    if n == 0 {
        return None;
    }
    let mut from = from.clone();
    let mut to = to.clone();
    if let Boundary::Closed { value, .. } = from {
        if value < -n {
            // below the extended range, so it doesn't constrain anything
            from = Boundary::Open;
        } else if value >= n {
            return None;
        }
    }
    if let Boundary::Closed { value, .. } = to {
        if value < -n {
            return None;
        }
        if value >= n {
            // above the range of slots, so it doesn't constrain anything
            to = Boundary::Open;
        }
    }
    let (from, to) = match (from, to) {
        (Boundary::Open, Boundary::Open) => (Boundary::incl(0), Boundary::incl(n - 1)),
        (from @ Boundary::Closed { value, .. }, Boundary::Open) => {
            let to = if value < 0 { Boundary::incl(0) } else { Boundary::incl(n - 1) };
            (from, to)
        }
        (Boundary::Open, to @ Boundary::Closed { value, .. }) => {
            let from = if value < 0 { Boundary::incl(-n) } else { Boundary::incl(0) };
            (from, to)
        }
        closed => closed,
    };
    Some(Interval::new(from, to))
}

// ------------- Sequence helpers -------------

/// Elements of `items` that also occur in `keep`, in the order of `items`.
pub fn intersection<T: PartialEq + Clone>(items: &[T], keep: &[T]) -> Vec<T> {
    items.iter().filter(|item| keep.contains(item)).cloned().collect()
}

/// Elements of `items` that don't occur in `drop`, in the order of `items`.
pub fn difference<T: PartialEq + Clone>(items: &[T], drop: &[T]) -> Vec<T> {
    items.iter().filter(|item| !drop.contains(item)).cloned().collect()
}

fn position<T: PartialEq>(items: &[T], item: &T) -> usize {
    items.iter().position(|candidate| candidate == item).unwrap_or(usize::MAX)
}

// ------------- Regex pattern -------------

/// A regular expression that always matches whole strings.
///
/// The pattern is kept in its anchored form (`^…$`, anchors added when
/// missing), which is also its canonical string.
#[derive(Clone)]
pub struct Pattern {
    anchored: Regex,
    full: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let mut anchored = String::with_capacity(pattern.len() + 2);
        if !pattern.starts_with('^') {
            anchored.push('^');
        }
        anchored.push_str(pattern);
        if !pattern.ends_with('$') {
            anchored.push('$');
        }
        let compile = |source: &str| {
            Regex::new(source).map_err(|e| AldbError::malformed(pattern, e.to_string()))
        };
        Ok(Self {
            full: compile(&format!("^(?:{anchored})$"))?,
            anchored: compile(&anchored)?,
        })
    }
    pub fn as_str(&self) -> &str {
        self.anchored.as_str()
    }
    pub fn is_full_match(&self, text: &str) -> bool {
        self.full.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pattern({:?})", self.as_str())
    }
}

// ------------- Trait impls -------------

impl<T: Clone> Clone for Selector<T> {
    fn clone(&self) -> Self {
        match self {
            Selector::All => Selector::All,
            Selector::None => Selector::None,
            Selector::One(value) => Selector::One(value.clone()),
            Selector::Set(values) => Selector::Set(values.clone()),
            Selector::Not(values) => Selector::Not(values.clone()),
            Selector::Interval { from, to, compare } => Selector::Interval {
                from: from.clone(),
                to: to.clone(),
                compare: compare.as_ref().map(Arc::clone),
            },
            Selector::Regex(pattern) => Selector::Regex(pattern.clone()),
            Selector::OneIndex(index) => Selector::OneIndex(*index),
            Selector::IndexSet(indexes) => Selector::IndexSet(indexes.clone()),
            Selector::IndexInterval { from, to } => {
                Selector::IndexInterval { from: from.clone(), to: to.clone() }
            }
            Selector::Union(subs) => Selector::Union(subs.clone()),
            Selector::Intersection(subs) => Selector::Intersection(subs.clone()),
        }
    }
}

// Comparators are only equal when they are the same function object.
impl<T: PartialEq> PartialEq for Selector<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Selector::All, Selector::All) | (Selector::None, Selector::None) => true,
            (Selector::One(l), Selector::One(r)) => l == r,
            (Selector::Set(l), Selector::Set(r)) | (Selector::Not(l), Selector::Not(r)) => l == r,
            (
                Selector::Interval { from: lf, to: lt, compare: lc },
                Selector::Interval { from: rf, to: rt, compare: rc },
            ) => {
                let same_compare = match (lc, rc) {
                    (None, None) => true,
                    (Some(l), Some(r)) => Arc::ptr_eq(l, r),
                    _ => false,
                };
                lf == rf && lt == rt && same_compare
            }
            (Selector::Regex(l), Selector::Regex(r)) => l == r,
            (Selector::OneIndex(l), Selector::OneIndex(r)) => l == r,
            (Selector::IndexSet(l), Selector::IndexSet(r)) => l == r,
            (
                Selector::IndexInterval { from: lf, to: lt },
                Selector::IndexInterval { from: rf, to: rt },
            ) => lf == rf && lt == rt,
            (Selector::Union(l), Selector::Union(r))
            | (Selector::Intersection(l), Selector::Intersection(r)) => l == r,
            _ => false,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Selector::All => write!(f, "All"),
            Selector::None => write!(f, "None"),
            Selector::One(value) => f.debug_tuple("One").field(value).finish(),
            Selector::Set(values) => f.debug_tuple("Set").field(values).finish(),
            Selector::Not(values) => f.debug_tuple("Not").field(values).finish(),
            Selector::Interval { from, to, compare } => f
                .debug_struct("Interval")
                .field("from", from)
                .field("to", to)
                .field("custom_compare", &compare.is_some())
                .finish(),
            Selector::Regex(pattern) => f.debug_tuple("Regex").field(pattern).finish(),
            Selector::OneIndex(index) => f.debug_tuple("OneIndex").field(index).finish(),
            Selector::IndexSet(indexes) => f.debug_tuple("IndexSet").field(indexes).finish(),
            Selector::IndexInterval { from, to } => {
                f.debug_struct("IndexInterval").field("from", from).field("to", to).finish()
            }
            Selector::Union(subs) => f.debug_tuple("Union").field(subs).finish(),
            Selector::Intersection(subs) => f.debug_tuple("Intersection").field(subs).finish(),
        }
    }
}
