//! Aldb – dynamic value trees and a small selector language for picking
//! elements out of ordered sequences.
//!
//! ## Values
//! A [`value::Value`] is a JSON-like tree (null, bool, int, float, string,
//! timestamp, list, map). Nodes are addressed with a [`path::Path`], a
//! sequence of [`path::Segment`]s that act as map keys or list indexes.
//! * [`value::Value::get`] descends directly along a path.
//! * [`value::Value::set`] returns a modified copy, creating containers on
//!   the way and padding lists with nulls.
//! * [`traverse::traverse_depth_first`] visits every node with a visitor that
//!   can replace nodes and cut the walk short (see [`traverse::Flow`]).
//!
//! ## Selectors
//! A [`selector::Selector`] picks elements of any [`element::Element`] type
//! by value (one, set, complement, interval, regex), by position (one index,
//! index set, index interval, counting from the end with negative indexes)
//! or by combining other selectors (union, intersection). Every non-composite
//! selector has a canonical string form, handled by [`grammar`]:
//!
//! ```
//! use aldb::selector::Selector;
//!
//! let days: Vec<String> = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"]
//!     .iter().map(|d| d.to_string()).collect();
//! let weekend: Selector<String> = "[#-2,#-1]".parse().unwrap();
//! assert_eq!(weekend.select(&days).unwrap(), vec!["sat", "sun"]);
//! assert_eq!(weekend.to_string(), "[#-2,#-1]");
//! ```
//!
//! ## Activity references
//! The [`refs`] module applies selectors to activity and version references,
//! e.g. "the previous and latest version of these activities".
//!
//! ## Ambient
//! Errors are collected in [`error::AldbError`]. The library logs through
//! `tracing` without installing a subscriber; the `aldb` binary does, based
//! on [`settings::Settings`].
pub mod element;
pub mod error;
pub mod grammar;
pub mod interval;
pub mod path;
pub mod refs;
pub mod selector;
pub mod settings;
pub mod traverse;
pub mod value;

pub use error::{AldbError, Result};
pub use path::{Path, Segment};
pub use selector::Selector;
pub use value::Value;
