use std::io;

use thiserror::Error;

use crate::ledger::{
    category::Category,
    transaction::{MAX_FRACTION_DIGITS, MAX_WHOLE_DIGITS},
};

/// Column order expected by the flat-file codec, quoted in format errors.
pub const EXPECTED_COLUMNS: &str = "Name,Price,Category,Cashflow";

/// Rejections produced while building a transaction from raw field text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "Invalid price `{0}`: expected a non-negative number such as 12 or 4.50, \
         with at most {} whole digits and {} decimal places",
        MAX_WHOLE_DIGITS,
        MAX_FRACTION_DIGITS
    )]
    InvalidPrice(String),
    #[error(
        "Invalid category `{value}`: expected one of {}{}",
        Category::expected(),
        suggestion_hint(.suggestion)
    )]
    InvalidCategory {
        value: String,
        suggestion: Option<Category>,
    },
    #[error("Invalid cashflow `{0}`: expected Income or Expenditure")]
    InvalidCashflow(String),
}

/// Unified error type for the ledger, codec, and session layers.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(
        "Malformed record on row {row}: {reason} (expected columns {})",
        EXPECTED_COLUMNS
    )]
    MalformedRecord { row: usize, reason: String },
    #[error("{}", index_message(.index, .len))]
    IndexOutOfRange { index: Option<usize>, len: usize },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

impl From<csv::Error> for TrackerError {
    fn from(err: csv::Error) -> Self {
        let row = err
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(0);
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => TrackerError::Io(io),
            _ => TrackerError::MalformedRecord { row, reason },
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Config(err.to_string())
    }
}

fn suggestion_hint(suggestion: &Option<Category>) -> String {
    match suggestion {
        Some(category) => format!(" (did you mean `{}`?)", category),
        None => String::new(),
    }
}

fn index_message(index: &Option<usize>, len: &usize) -> String {
    match index {
        Some(index) => format!(
            "Row {} does not exist: the ledger holds {} transaction(s)",
            index, len
        ),
        None => "No transaction selected".to_string(),
    }
}
