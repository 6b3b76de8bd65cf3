//! Interval endpoints and containment tests.

// used to compare elements against boundaries
use std::cmp::Ordering;
// comparators are shared between clones of a selector
use std::sync::Arc;

use crate::element::Element;
use crate::error::{AldbError, Result};

/// Orders two elements for types without a natural order, or overrides it.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// One endpoint of an interval: unconstrained, or a value that is either
/// part of the interval (inclusive) or just outside it (exclusive).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Boundary<T> {
    Open,
    Closed { value: T, inclusive: bool },
}

impl<T> Boundary<T> {
    pub fn open() -> Self {
        Boundary::Open
    }
    pub fn incl(value: T) -> Self {
        Boundary::Closed { value, inclusive: true }
    }
    pub fn excl(value: T) -> Self {
        Boundary::Closed { value, inclusive: false }
    }
    pub fn is_open(&self) -> bool {
        matches!(self, Boundary::Open)
    }
    pub fn value(&self) -> Option<&T> {
        match self {
            Boundary::Open => None,
            Boundary::Closed { value, .. } => Some(value),
        }
    }
    pub fn is_inclusive(&self) -> bool {
        matches!(self, Boundary::Closed { inclusive: true, .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interval<T> {
    pub lower: Boundary<T>,
    pub upper: Boundary<T>,
}

impl<T> Interval<T> {
    pub fn new(lower: Boundary<T>, upper: Boundary<T>) -> Self {
        Self { lower, upper }
    }

    /// Tests `value` against both boundaries using `compare`, which is only
    /// called for closed boundaries.
    pub fn contains_by<F>(&self, value: &T, mut compare: F) -> Result<bool>
    where
        F: FnMut(&T, &T) -> Result<Ordering>,
    {
        let passes_lower = match &self.lower {
            Boundary::Open => true,
            Boundary::Closed { value: bound, inclusive } => match compare(value, bound)? {
                Ordering::Greater => true,
                Ordering::Equal => *inclusive,
                Ordering::Less => false,
            },
        };
        if !passes_lower {
            return Ok(false);
        }
        Ok(match &self.upper {
            Boundary::Open => true,
            Boundary::Closed { value: bound, inclusive } => match compare(value, bound)? {
                Ordering::Less => true,
                Ordering::Equal => *inclusive,
                Ordering::Greater => false,
            },
        })
    }
}

impl<T: Ord> Interval<T> {
    /// Tests `value` against both boundaries using `Ord`.
    pub fn covers(&self, value: &T) -> bool {
        let passes_lower = match &self.lower {
            Boundary::Open => true,
            Boundary::Closed { value: bound, inclusive } => admits(value.cmp(bound), Ordering::Greater, *inclusive),
        };
        passes_lower
            && match &self.upper {
                Boundary::Open => true,
                Boundary::Closed { value: bound, inclusive } => admits(value.cmp(bound), Ordering::Less, *inclusive),
            }
    }
}

fn admits(ordering: Ordering, inside: Ordering, inclusive: bool) -> bool {
    ordering == inside || (ordering == Ordering::Equal && inclusive)
}

impl<T: Element> Interval<T> {
    /// Tests `value` with the given comparator, or the element's natural order
    /// when none is given. Fails with `ComparatorRequired` if neither exists.
    pub fn contains(&self, value: &T, compare: Option<&Comparator<T>>) -> Result<bool> {
        self.contains_by(value, |left, right| order(left, right, compare))
    }
}

fn order<T: Element>(left: &T, right: &T, compare: Option<&Comparator<T>>) -> Result<Ordering> {
    match compare {
        Some(compare) => Ok(compare(left, right)),
        None => left.natural_order(right).ok_or(AldbError::ComparatorRequired(T::KIND)),
    }
}
