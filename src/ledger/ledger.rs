use std::fmt;

use rust_decimal::Decimal;
use tracing::debug;

use super::{
    category::{Cashflow, Category},
    events::{LedgerEvent, LedgerObserver},
    transaction::Transaction,
};
use crate::errors::{Result, TrackerError};

/// Aggregate amounts grouped by cashflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: Decimal,
    pub expenditure: Decimal,
}

impl Totals {
    /// Full recomputation over a sequence of transactions.
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .fold(Totals::default(), |mut totals, txn| {
                totals.apply(txn);
                totals
            })
    }

    pub fn net(&self) -> Decimal {
        self.income - self.expenditure
    }

    fn apply(&mut self, txn: &Transaction) {
        *self.bucket(txn.cashflow()) += txn.price();
    }

    fn revert(&mut self, txn: &Transaction) {
        *self.bucket(txn.cashflow()) -= txn.price();
    }

    fn bucket(&mut self, cashflow: Cashflow) -> &mut Decimal {
        match cashflow {
            Cashflow::Income => &mut self.income,
            Cashflow::Expenditure => &mut self.expenditure,
        }
    }
}

/// Income and expenditure booked against one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotals {
    pub category: Category,
    pub totals: Totals,
}

#[derive(Debug, Clone)]
struct RemovedTransaction {
    index: usize,
    transaction: Transaction,
}

/// Ordered transactions plus income/expenditure totals kept in step with them.
///
/// Totals are maintained incrementally on add/remove and recomputed from
/// scratch only on [`Ledger::replace_all`].
#[derive(Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    totals: Totals,
    last_removed: Option<RemovedTransaction>,
    observers: Vec<Box<dyn LedgerObserver>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let totals = Totals::from_transactions(&transactions);
        Self {
            transactions,
            totals,
            ..Self::default()
        }
    }

    /// Registers a listener for every subsequent mutation.
    pub fn subscribe(&mut self, observer: Box<dyn LedgerObserver>) {
        self.observers.push(observer);
    }

    pub fn add(&mut self, transaction: Transaction) {
        self.totals.apply(&transaction);
        self.transactions.push(transaction.clone());
        self.last_removed = None;
        debug!(count = self.transactions.len(), "transaction added");
        self.emit(LedgerEvent::Added(transaction));
    }

    /// Removes the transaction at `index`, returning it.
    pub fn remove_at(&mut self, index: usize) -> Result<Transaction> {
        if index >= self.transactions.len() {
            return Err(TrackerError::IndexOutOfRange {
                index: Some(index),
                len: self.transactions.len(),
            });
        }
        let removed = self.transactions.remove(index);
        self.totals.revert(&removed);
        self.last_removed = Some(RemovedTransaction {
            index,
            transaction: removed.clone(),
        });
        debug!(index, count = self.transactions.len(), "transaction removed");
        self.emit(LedgerEvent::Removed { index });
        Ok(removed)
    }

    /// Puts the most recently removed transaction back where it was.
    ///
    /// Only one removal is remembered; any add or replacement forgets it.
    pub fn undo_remove(&mut self) -> Option<usize> {
        let RemovedTransaction { index, transaction } = self.last_removed.take()?;
        let index = index.min(self.transactions.len());
        self.totals.apply(&transaction);
        self.transactions.insert(index, transaction.clone());
        debug!(index, "removal undone");
        self.emit(LedgerEvent::Restored { index, transaction });
        Some(index)
    }

    pub fn can_undo_remove(&self) -> bool {
        self.last_removed.is_some()
    }

    pub fn replace_all(&mut self, transactions: Vec<Transaction>) {
        self.totals = Totals::from_transactions(&transactions);
        self.transactions = transactions;
        self.last_removed = None;
        debug!(count = self.transactions.len(), "ledger replaced");
        self.emit(LedgerEvent::Reset(self.transactions.clone()));
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Per-category breakdown, in order of each category's first appearance.
    pub fn category_totals(&self) -> Vec<CategoryTotals> {
        let mut breakdown: Vec<CategoryTotals> = Vec::new();
        for txn in &self.transactions {
            let position = match breakdown
                .iter()
                .position(|entry| entry.category == txn.category())
            {
                Some(position) => position,
                None => {
                    breakdown.push(CategoryTotals {
                        category: txn.category(),
                        totals: Totals::default(),
                    });
                    breakdown.len() - 1
                }
            };
            breakdown[position].totals.apply(txn);
        }
        breakdown
    }

    fn emit(&mut self, event: LedgerEvent) {
        let totals = self.totals;
        for observer in self.observers.iter_mut() {
            observer.on_mutation(&event, &totals);
        }
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("transactions", &self.transactions)
            .field("totals", &self.totals)
            .field("can_undo_remove", &self.can_undo_remove())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::{cell::RefCell, rc::Rc};

    #[derive(Default)]
    struct Recorder {
        events: Vec<(LedgerEvent, Totals)>,
    }

    impl LedgerObserver for Recorder {
        fn on_mutation(&mut self, event: &LedgerEvent, totals: &Totals) {
            self.events.push((event.clone(), *totals));
        }
    }

    fn txn(name: &str, price: &str, category: &str, cashflow: &str) -> Transaction {
        Transaction::create(name, price, category, cashflow).unwrap()
    }

    fn assert_consistent(ledger: &Ledger) {
        assert_eq!(
            ledger.totals(),
            Totals::from_transactions(ledger.transactions()),
            "maintained totals drifted from a full recomputation"
        );
    }

    #[test]
    fn add_then_remove_updates_totals() {
        let mut ledger = Ledger::new();
        ledger.add(txn("A", "100", "Wages", "Income"));
        ledger.add(txn("B", "40", "Rent", "Expenditure"));
        assert_eq!(
            ledger.totals(),
            Totals {
                income: dec!(100),
                expenditure: dec!(40)
            }
        );

        let removed = ledger.remove_at(0).unwrap();
        assert_eq!(removed.name(), "A");
        assert_eq!(
            ledger.totals(),
            Totals {
                income: dec!(0),
                expenditure: dec!(40)
            }
        );
        assert_consistent(&ledger);
    }

    #[test]
    fn remove_on_empty_ledger_is_out_of_range() {
        let mut ledger = Ledger::new();
        let err = ledger.remove_at(0).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::IndexOutOfRange {
                index: Some(0),
                len: 0
            }
        ));
    }

    #[test]
    fn failed_remove_does_not_mutate_or_notify() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut ledger = Ledger::new();
        ledger.add(txn("A", "1.25", "Bills", "Expenditure"));
        ledger.subscribe(Box::new(recorder.clone()));

        assert!(ledger.remove_at(1).is_err());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.totals().expenditure, dec!(1.25));
        assert!(recorder.borrow().events.is_empty());
    }

    #[test]
    fn observers_receive_events_with_post_mutation_totals() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut ledger = Ledger::new();
        ledger.subscribe(Box::new(recorder.clone()));

        let pay = txn("Pay", "2000", "Wages", "Income");
        ledger.add(pay.clone());
        ledger.remove_at(0).unwrap();
        ledger.replace_all(vec![pay.clone()]);

        let recorded = recorder.borrow();
        let events = &recorded.events;
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].0, LedgerEvent::Added(pay.clone()));
        assert_eq!(events[0].1.income, dec!(2000));
        assert_eq!(events[1].0, LedgerEvent::Removed { index: 0 });
        assert_eq!(events[1].1.income, dec!(0));
        assert_eq!(events[2].0, LedgerEvent::Reset(vec![pay]));
        assert_eq!(events[2].1.income, dec!(2000));
    }

    #[test]
    fn replace_all_recomputes_totals() {
        let mut ledger = Ledger::new();
        ledger.add(txn("Old", "999", "Other", "Income"));
        ledger.replace_all(vec![
            txn("Rent", "800", "Rent", "Expenditure"),
            txn("Pay", "1500.50", "Wages", "Income"),
            txn("Food", "60.25", "Groceries", "Expenditure"),
        ]);
        assert_eq!(ledger.totals().income, dec!(1500.50));
        assert_eq!(ledger.totals().expenditure, dec!(860.25));
        assert_eq!(ledger.totals().net(), dec!(640.25));
        assert_consistent(&ledger);
    }

    #[test]
    fn totals_stay_consistent_over_mixed_operations() {
        let mut ledger = Ledger::new();
        let prices = ["10", "0.1", "0.2", "3.33", "7", "12.5", "0", "19.99"];
        for (step, price) in prices.iter().cycle().take(40).enumerate() {
            let cashflow = if step % 3 == 0 { "Income" } else { "Expenditure" };
            ledger.add(txn("item", price, "Other", cashflow));
            if step % 4 == 3 {
                let index = (step * 7) % ledger.len();
                ledger.remove_at(index).unwrap();
            }
            assert_consistent(&ledger);
        }
        while !ledger.is_empty() {
            ledger.remove_at(ledger.len() / 2).unwrap();
            assert_consistent(&ledger);
        }
        assert_eq!(ledger.totals(), Totals::default());
    }

    #[test]
    fn largest_accepted_prices_sum_without_overflow() {
        let largest = format!(
            "{}.{}",
            "9".repeat(crate::ledger::transaction::MAX_WHOLE_DIGITS),
            "9".repeat(crate::ledger::transaction::MAX_FRACTION_DIGITS)
        );
        let mut ledger = Ledger::new();
        for _ in 0..1_000 {
            ledger.add(txn("Big", &largest, "Wages", "Income"));
            ledger.add(txn("Big", &largest, "Rent", "Expenditure"));
        }
        let single = ledger.get(0).unwrap().price();
        assert_eq!(ledger.totals().income, single * Decimal::from(1_000));
        assert_eq!(ledger.totals().net(), Decimal::ZERO);
        let snapshot = ledger.transactions().to_vec();
        ledger.replace_all(snapshot);
        assert_consistent(&ledger);
    }

    #[test]
    fn undo_restores_last_removal_once() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut ledger = Ledger::new();
        let first = txn("First", "5", "Bills", "Expenditure");
        let second = txn("Second", "6", "Bills", "Expenditure");
        ledger.add(first.clone());
        ledger.add(second.clone());
        ledger.subscribe(Box::new(recorder.clone()));

        ledger.remove_at(0).unwrap();
        assert!(ledger.can_undo_remove());
        assert_eq!(ledger.undo_remove(), Some(0));
        assert_eq!(ledger.transactions(), &[first.clone(), second]);
        assert_eq!(ledger.totals().expenditure, dec!(11));
        assert_eq!(ledger.undo_remove(), None);
        assert_eq!(
            recorder.borrow().events.last().map(|(event, _)| event.clone()),
            Some(LedgerEvent::Restored {
                index: 0,
                transaction: first
            })
        );
    }

    #[test]
    fn add_forgets_pending_undo() {
        let mut ledger = Ledger::new();
        ledger.add(txn("A", "1", "Other", "Income"));
        ledger.remove_at(0).unwrap();
        ledger.add(txn("B", "2", "Other", "Income"));
        assert!(!ledger.can_undo_remove());
        assert_eq!(ledger.undo_remove(), None);
    }

    #[test]
    fn category_breakdown_follows_first_appearance() {
        let ledger = Ledger::from_transactions(vec![
            txn("Pay", "100", "Wages", "Income"),
            txn("Shop", "20", "Groceries", "Expenditure"),
            txn("Refund", "5", "Groceries", "Income"),
        ]);
        let breakdown = ledger.category_totals();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, Category::Wages);
        assert_eq!(breakdown[1].category, Category::Groceries);
        assert_eq!(breakdown[1].totals.expenditure, dec!(20));
        assert_eq!(breakdown[1].totals.income, dec!(5));
    }
}
