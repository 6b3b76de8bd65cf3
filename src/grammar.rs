//! Canonical string forms of selectors and the polymorphic decoder.
//!
//! | Variant        | Form                                   |
//! |----------------|----------------------------------------|
//! | All            | `*`                                    |
//! | None           | `{}`                                   |
//! | One            | the element itself                     |
//! | Set            | `{a, b}`                               |
//! | Not            | `!{a, b}`                              |
//! | Interval       | `[a,b]`, `]a,b[`, `[a,[` …             |
//! | Regex          | `^…$`                                  |
//! | OneIndex       | `#-1`                                  |
//! | IndexSet       | `{#0, #-1}`                            |
//! | IndexInterval  | `[#-2,#1[` …                           |
//!
//! In interval forms a bracket facing the value includes it, a bracket
//! facing away excludes it, and an empty endpoint leaves that side open.
//! Union and intersection selectors have no string form, and neither has a
//! selector whose string would decode as something else.
//!
//! Decoding tries the variant grammars in a fixed order (see [`decode`]) and
//! keeps the first that parses. With serde a selector is a single string, so
//! it is a JSON string or a YAML scalar (quoted by the YAML emitter whenever
//! the form starts with an indicator such as `*`, `{`, `!`, `[` or `#`).

// used to print and parse the canonical forms
use std::fmt;
use std::str::FromStr;

// so the grammar regexes are compiled once
use lazy_static::lazy_static;
use regex::Regex;
// selectors travel as plain strings in JSON and YAML
use serde::{Deserialize, Deserializer, Serialize, Serializer};
// used to trace which candidate grammar accepted an input
use tracing::trace;

// our own stuff that we need
use crate::element::Element;
use crate::error::{AldbError, Result};
use crate::interval::Boundary;
use crate::selector::{Pattern, Selector};

lazy_static! {
    static ref INTERVAL: Regex = Regex::new(r"(?s)^([\[\]])(.*)([\[\]])$").unwrap();
    static ref INDEX: Regex = Regex::new(r"^#([+-]?\d+)$").unwrap();
}

/// Renders the canonical string of a selector.
///
/// Fails with `Unencodable` for unions and intersections, and for selectors
/// whose rendered string would decode as a different selector (element
/// values that look like selector syntax, or an interval comparator other
/// than the element's default).
pub fn encode<T: Element>(selector: &Selector<T>) -> Result<String> {
    let rendered = render(selector)?;
    match decode::<T>(&rendered) {
        Ok(decoded) if same_meaning(selector, &decoded) => Ok(rendered),
        _ => Err(AldbError::Unencodable(format!(
            "'{}' would decode as a different selector",
            rendered
        ))),
    }
}

fn render<T: Element>(selector: &Selector<T>) -> Result<String> {
    Ok(match selector {
        Selector::All => "*".to_string(),
        Selector::None => "{}".to_string(),
        Selector::One(value) => value.render(),
        Selector::Set(values) => format!("{{{}}}", join(values, T::render)),
        Selector::Not(values) => format!("!{{{}}}", join(values, T::render)),
        Selector::Interval { from, to, .. } => interval_string(from, to, T::render),
        Selector::Regex(pattern) => pattern.as_str().to_string(),
        Selector::OneIndex(index) => render_index(index),
        Selector::IndexSet(indexes) => format!("{{{}}}", join(indexes, render_index)),
        Selector::IndexInterval { from, to } => interval_string(from, to, render_index),
        Selector::Union(_) | Selector::Intersection(_) => {
            return Err(AldbError::Unencodable(
                "union and intersection selectors have no string form".to_string(),
            ));
        }
    })
}

// Equal, or one of the spellings the grammar folds together.
fn same_meaning<T: Element>(original: &Selector<T>, decoded: &Selector<T>) -> bool {
    match (original, decoded) {
        (Selector::Set(values), Selector::None) => values.is_empty(),
        (Selector::IndexSet(indexes), Selector::None) => indexes.is_empty(),
        (
            Selector::Interval { from: Boundary::Open, to: Boundary::Open, .. },
            Selector::IndexInterval { from: Boundary::Open, to: Boundary::Open },
        ) => true,
        _ => original == decoded,
    }
}

type Candidate<T> = fn(&str) -> Result<Selector<T>>;

/// Parses a selector string.
///
/// Candidates are tried in this order: All, None, IndexSet, Set, Not,
/// IndexInterval, Interval, Regex, OneIndex and finally One, which accepts
/// any text the element type can parse. Fails with `NoCandidateMatched`
/// when no grammar accepts the input.
pub fn decode<T: Element>(input: &str) -> Result<Selector<T>> {
    let candidates: [(&str, Candidate<T>); 10] = [
        ("all", parse_all),
        ("none", parse_none),
        ("index set", parse_index_set),
        ("set", parse_set),
        ("not", parse_not),
        ("index interval", parse_index_interval),
        ("interval", parse_interval),
        ("regex", parse_regex),
        ("one index", parse_one_index),
        ("one", parse_one),
    ];
    for (name, parse) in candidates {
        match parse(input) {
            Ok(selector) => {
                trace!(candidate = name, input, "selector decoded");
                return Ok(selector);
            }
            Err(e) => trace!(candidate = name, error = %e, "candidate rejected"),
        }
    }
    Err(AldbError::NoCandidateMatched(input.to_string()))
}

// ------------- Candidate grammars -------------

fn parse_all<T: Element>(input: &str) -> Result<Selector<T>> {
    match input {
        "*" => Ok(Selector::All),
        _ => Err(AldbError::malformed(input, "only '*' selects all")),
    }
}

fn parse_none<T: Element>(input: &str) -> Result<Selector<T>> {
    match input {
        "{}" => Ok(Selector::None),
        _ => Err(AldbError::malformed(input, "only '{}' selects none")),
    }
}

fn parse_index_set<T: Element>(input: &str) -> Result<Selector<T>> {
    let body = enclosed(input, "{", "}")?;
    Ok(Selector::IndexSet(parse_list(body, parse_index)?))
}

fn parse_set<T: Element>(input: &str) -> Result<Selector<T>> {
    let body = enclosed(input, "{", "}")?;
    Ok(Selector::Set(parse_list(body, T::parse_element)?))
}

fn parse_not<T: Element>(input: &str) -> Result<Selector<T>> {
    let body = enclosed(input, "!{", "}")?;
    Ok(Selector::Not(parse_list(body, T::parse_element)?))
}

fn parse_index_interval<T: Element>(input: &str) -> Result<Selector<T>> {
    let (from, to) = parse_boundaries(input, parse_index)?;
    Ok(Selector::IndexInterval { from, to })
}

fn parse_interval<T: Element>(input: &str) -> Result<Selector<T>> {
    let (from, to) = parse_boundaries(input, T::parse_element)?;
    Ok(Selector::Interval { from, to, compare: T::comparator() })
}

fn parse_regex<T: Element>(input: &str) -> Result<Selector<T>> {
    if !input.starts_with('^') || !input.ends_with('$') {
        return Err(AldbError::malformed(input, "a regex must start with '^' and end with '$'"));
    }
    Ok(Selector::Regex(Pattern::new(input)?))
}

fn parse_one_index<T: Element>(input: &str) -> Result<Selector<T>> {
    Ok(Selector::OneIndex(parse_index(input)?))
}

fn parse_one<T: Element>(input: &str) -> Result<Selector<T>> {
    Ok(Selector::One(T::parse_element(input)?))
}

// ------------- Shared pieces -------------

fn enclosed<'s>(input: &'s str, open: &str, close: &str) -> Result<&'s str> {
    input
        .strip_prefix(open)
        .and_then(|rest| rest.strip_suffix(close))
        .ok_or_else(|| AldbError::malformed(input, format!("not enclosed in '{open}' and '{close}'")))
}

fn parse_list<B>(body: &str, parse: impl Fn(&str) -> Result<B>) -> Result<Vec<B>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    body.split(',').map(|part| parse(part.trim())).collect()
}

fn parse_index(text: &str) -> Result<i64> {
    let captures = INDEX
        .captures(text)
        .ok_or_else(|| AldbError::malformed(text, "an index is written as '#<integer>'"))?;
    captures[1]
        .parse::<i64>()
        .map_err(|e| AldbError::malformed(text, e.to_string()))
}

fn render_index(index: &i64) -> String {
    format!("#{}", index)
}

fn join<B>(values: &[B], render: impl Fn(&B) -> String) -> String {
    values.iter().map(render).collect::<Vec<_>>().join(", ")
}

fn parse_boundaries<B>(input: &str, parse: impl Fn(&str) -> Result<B>) -> Result<(Boundary<B>, Boundary<B>)> {
    let captures = INTERVAL
        .captures(input)
        .ok_or_else(|| AldbError::malformed(input, "an interval starts and ends with '[' or ']'"))?;
    let from_inclusive = &captures[1] == "[";
    let to_inclusive = &captures[3] == "]";
    let parts: Vec<&str> = captures
        .get(2)
        .map_or("", |body| body.as_str())
        .split(',')
        .collect();
    let [from, to] = parts.as_slice() else {
        return Err(AldbError::malformed(input, "an interval contains exactly one ','"));
    };
    Ok((boundary(from, from_inclusive, &parse)?, boundary(to, to_inclusive, &parse)?))
}

fn boundary<B>(text: &str, inclusive: bool, parse: impl Fn(&str) -> Result<B>) -> Result<Boundary<B>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Boundary::Open);
    }
    let value = parse(text)?;
    Ok(if inclusive { Boundary::incl(value) } else { Boundary::excl(value) })
}

fn interval_string<B>(from: &Boundary<B>, to: &Boundary<B>, render: impl Fn(&B) -> String) -> String {
    let from = match from {
        Boundary::Open => "]".to_string(),
        Boundary::Closed { value, inclusive: true } => format!("[{}", render(value)),
        Boundary::Closed { value, inclusive: false } => format!("]{}", render(value)),
    };
    let to = match to {
        Boundary::Open => "[".to_string(),
        Boundary::Closed { value, inclusive: true } => format!("{}]", render(value)),
        Boundary::Closed { value, inclusive: false } => format!("{}[", render(value)),
    };
    format!("{},{}", from, to)
}

// ------------- Trait impls -------------

impl<T: Element> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Selector::Union(subs) => write_composite(f, "union", subs),
            Selector::Intersection(subs) => write_composite(f, "intersection", subs),
            other => {
                let rendered = render(other).map_err(|_| fmt::Error)?;
                write!(f, "{}", rendered)
            }
        }
    }
}

fn write_composite<T: Element>(f: &mut fmt::Formatter, name: &str, subs: &[Selector<T>]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, sub) in subs.iter().enumerate() {
        if i > 0 {
            write!(f, "; ")?;
        }
        write!(f, "{}", sub)?;
    }
    write!(f, ")")
}

impl<T: Element> FromStr for Selector<T> {
    type Err = AldbError;
    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}

impl<T: Element> Serialize for Selector<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let encoded = encode(self).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de, T: Element> Deserialize<'de> for Selector<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        decode(&encoded).map_err(serde::de::Error::custom)
    }
}
