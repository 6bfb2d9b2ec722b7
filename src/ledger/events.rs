use std::{cell::RefCell, rc::Rc};

use super::{ledger::Totals, transaction::Transaction};

/// Change notifications raised by the ledger after each successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Appended at the end of the sequence.
    Added(Transaction),
    Removed { index: usize },
    /// A removed transaction was put back at `index`.
    Restored { index: usize, transaction: Transaction },
    /// The whole sequence was replaced.
    Reset(Vec<Transaction>),
}

/// Receives ledger mutations, typically to refresh a displayed table.
///
/// `totals` is the ledger state after the mutation, so a view never has to
/// derive totals from its own rows.
pub trait LedgerObserver {
    fn on_mutation(&mut self, event: &LedgerEvent, totals: &Totals);
}

impl<T: LedgerObserver> LedgerObserver for Rc<RefCell<T>> {
    fn on_mutation(&mut self, event: &LedgerEvent, totals: &Totals) {
        self.borrow_mut().on_mutation(event, totals);
    }
}
