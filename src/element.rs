// used for natural orders of elements
use std::cmp::Ordering;
// elements show up in debug output of selectors
use std::fmt;

use crate::error::{AldbError, Result};
use crate::interval::Comparator;

/// A type whose values can be selected and written in selector strings.
///
/// Every element has a textual form used inside the selector grammar
/// (`render`/`parse_element` must agree), a kind name for error messages, and
/// optionally a natural order (used by interval selectors when no comparator
/// is given) and a text view (required by regex selectors).
///
/// Types without a natural order can name a default comparator. Intervals
/// decoded from selector strings carry it.
pub trait Element: Clone + PartialEq + fmt::Debug {
    // static stuff which needs to be implemented downstream
    const KIND: &'static str;
    fn parse_element(text: &str) -> Result<Self>;
    fn render(&self) -> String;
    // instance callable with pre-made implementation
    fn natural_order(&self, _other: &Self) -> Option<Ordering> {
        None
    }
    fn text(&self) -> Option<&str> {
        None
    }
    fn comparator() -> Option<Comparator<Self>> {
        None
    }
}

impl Element for String {
    const KIND: &'static str = "string";
    fn parse_element(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
    fn render(&self) -> String {
        self.clone()
    }
    fn natural_order(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
    fn text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl Element for i64 {
    const KIND: &'static str = "int64";
    fn parse_element(text: &str) -> Result<Self> {
        text.parse::<i64>()
            .map_err(|e| AldbError::malformed(text, format!("not an int64: {e}")))
    }
    fn render(&self) -> String {
        self.to_string()
    }
    fn natural_order(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
