// used to derive the error messages
use thiserror::Error;

use crate::path::Path;

#[derive(Error, Debug)]
pub enum AldbError {
    #[error("Null cast: value is null")]
    NullCast,
    #[error("Wrong type: expected {expected}, found {found}")]
    WrongType { expected: &'static str, found: &'static str },
    #[error("Path not found: {0}")]
    PathNotFound(Path),
    #[error("Invalid index {index}: lists can only be grown at non-negative indexes")]
    InvalidIndex { index: i64 },
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),
    #[error("Malformed selector string '{input}': {message}")]
    MalformedSelectorString { input: String, message: String },
    #[error("No candidate selector matched '{0}'")]
    NoCandidateMatched(String),
    #[error("Comparator required: {0} has no natural order")]
    ComparatorRequired(&'static str),
    #[error("Cannot encode selector: {0}")]
    Unencodable(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Format error: {0}")]
    Format(String),
}

pub type Result<T> = std::result::Result<T, AldbError>;

impl AldbError {
    pub(crate) fn malformed(input: &str, message: impl Into<String>) -> Self {
        Self::MalformedSelectorString { input: input.to_string(), message: message.into() }
    }
}

// Helper conversions
impl From<serde_json::Error> for AldbError {
    fn from(e: serde_json::Error) -> Self { Self::Format(e.to_string()) }
}
impl From<serde_yaml::Error> for AldbError {
    fn from(e: serde_yaml::Error) -> Self { Self::Format(e.to_string()) }
}
impl From<config::ConfigError> for AldbError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<std::io::Error> for AldbError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
