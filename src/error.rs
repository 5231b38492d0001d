use crate::epoch;

/// Errors produced while decoding a KVN message.
///
/// Every error is terminal for the decode call that produced it. Line numbers are 1-based
/// physical line numbers in the trimmed message text.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A line that is neither a comment nor a `KEY = VALUE` pair.
    #[error("malformed line {line}: {text:?}")]
    MalformedLine { line: usize, text: String },

    /// A required key was not the next key in the message.
    #[error("expected key {expected}, got {actual} at line {line}")]
    KeyMismatch {
        expected: &'static str,
        actual: String,
        line: usize,
    },

    /// A required key was expected but the message had no more keys.
    #[error("expected key {expected}, got end of input")]
    UnexpectedEndOfInput { expected: &'static str },

    #[error("invalid number for {key} at line {line}: {value:?}")]
    NumberParse {
        key: &'static str,
        value: String,
        line: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid time for {key} at line {line}: {value:?}")]
    TimeParse {
        key: &'static str,
        value: String,
        line: usize,
        #[source]
        source: epoch::Error,
    },

    /// Both TRUE_ANOMALY and MEAN_ANOMALY were provided for osculating elements.
    #[error("either TRUE_ANOMALY or MEAN_ANOMALY must be provided, not both")]
    AmbiguousAnomaly,

    /// A key remained after all fields were decoded. Only reported by strict decoding.
    #[error("unexpected key {key} at line {line}")]
    UnexpectedKey { key: String, line: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
