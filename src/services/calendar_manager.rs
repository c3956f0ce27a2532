//! Owner of the canonical recurring-transaction collection.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use super::clock::Clock;
use crate::{
    calendar::{
        canonicalize_all, occurrences_for_month, MonthOccurrences, NewRecurringTransaction,
        RecurringTransaction, RecurringTransactionPatch, YearMonth,
    },
    errors::Result,
    storage::CalendarStorage,
    sync::RemoteSync,
};

/// Facade that coordinates the calendar collection, local persistence, and
/// the optional remote mirror.
///
/// Every mutation is written to local storage before it becomes visible in
/// memory, then queued for the remote. Drafts and patches are expected to be
/// validated by the caller.
pub struct CalendarManager {
    transactions: Vec<RecurringTransaction>,
    storage: Box<dyn CalendarStorage>,
    clock: Box<dyn Clock>,
    remote: Option<RemoteSync>,
}

impl CalendarManager {
    pub fn new(storage: Box<dyn CalendarStorage>, clock: Box<dyn Clock>) -> Self {
        Self {
            transactions: Vec::new(),
            storage,
            clock,
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: RemoteSync) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn remote(&self) -> Option<&RemoteSync> {
        self.remote.as_ref()
    }

    /// Replaces the collection with the migrated contents of local storage.
    ///
    /// A record that fails migration aborts the load and leaves state as it was.
    pub fn load(&mut self) -> Result<usize> {
        let records = self.storage.load_records()?;
        let legacy = records.iter().filter(|record| record.is_legacy()).count();
        let transactions = canonicalize_all(records)?;
        info!(
            count = transactions.len(),
            legacy, "loaded recurring transactions from local storage"
        );
        self.transactions = transactions;
        Ok(self.transactions.len())
    }

    /// Adopts the remote collection when sync is allowed and the remote has one.
    ///
    /// Returns whether local state was replaced. Remote I/O failures are not
    /// errors; remote records that fail migration are.
    pub async fn refresh_from_remote(&mut self) -> Result<bool> {
        let records = match self.remote.as_ref() {
            Some(remote) => remote.fetch().await,
            None => None,
        };
        let Some(records) = records else {
            return Ok(false);
        };
        let transactions = canonicalize_all(records)?;
        self.storage.save_transactions(&transactions)?;
        info!(
            count = transactions.len(),
            "replaced recurring transactions with remote copy"
        );
        self.transactions = transactions;
        Ok(true)
    }

    /// Adds a transaction, assigning a fresh id and creation timestamp.
    pub fn add(&mut self, draft: NewRecurringTransaction) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let transaction = draft.into_transaction(id.clone(), self.clock.now());
        let mut updated = self.transactions.clone();
        updated.push(transaction);
        self.commit(updated)?;
        debug!(id = %id, "added recurring transaction");
        Ok(id)
    }

    /// Applies `patch` to the transaction with `id`. Unknown ids are a no-op
    /// and report `false`.
    pub fn update(&mut self, id: &str, patch: RecurringTransactionPatch) -> Result<bool> {
        let Some(index) = self.position(id) else {
            debug!(id, "update ignored for unknown recurring transaction");
            return Ok(false);
        };
        let mut updated = self.transactions.clone();
        patch.apply(&mut updated[index]);
        self.commit(updated)?;
        debug!(id, "updated recurring transaction");
        Ok(true)
    }

    /// Removes the transaction with `id`. Unknown ids are a no-op and report `false`.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let Some(index) = self.position(id) else {
            debug!(id, "delete ignored for unknown recurring transaction");
            return Ok(false);
        };
        let mut updated = self.transactions.clone();
        updated.remove(index);
        self.commit(updated)?;
        debug!(id, "deleted recurring transaction");
        Ok(true)
    }

    pub fn transactions(&self) -> &[RecurringTransaction] {
        &self.transactions
    }

    pub fn get(&self, id: &str) -> Option<&RecurringTransaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// Occurrence index for zero-based `month` of `year`.
    pub fn transactions_for_month(&self, year: i32, month: u32) -> Result<MonthOccurrences<'_>> {
        Ok(self.occurrences_in(YearMonth::new(year, month)?))
    }

    pub fn occurrences_in(&self, month: YearMonth) -> MonthOccurrences<'_> {
        debug!(%month, "resolving calendar occurrences");
        occurrences_for_month(&self.transactions, month)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.transactions.iter().position(|txn| txn.id == id)
    }

    fn commit(&mut self, updated: Vec<RecurringTransaction>) -> Result<()> {
        self.storage.save_transactions(&updated)?;
        self.transactions = updated;
        if let Some(remote) = self.remote.as_ref() {
            remote.submit(&self.transactions);
        }
        Ok(())
    }
}
