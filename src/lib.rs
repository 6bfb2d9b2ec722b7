#![doc(test(attr(deny(warnings))))]

//! Money Tracker keeps a running ledger of income and expenditure, validates
//! entries, and stores ledgers as plain CSV files bound to an editing session.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::{Outcome, Session};
pub use errors::{Result, TrackerError, ValidationError};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Money Tracker tracing initialized.");
    });
}
