//! Transactions, their validation, and the ledger that aggregates them.

pub mod category;
pub mod events;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod transaction;

pub use category::{Cashflow, Category};
pub use events::{LedgerEvent, LedgerObserver};
pub use ledger::{CategoryTotals, Ledger, Totals};
pub use transaction::{RawTransaction, Transaction, NAME_PLACEHOLDER};
