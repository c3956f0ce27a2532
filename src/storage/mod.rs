pub mod json_backend;

use crate::{
    calendar::{RecurringTransaction, RecurringTransactionRecord},
    errors::Result,
};

/// Local persistence for the calendar collection: one serialized array
/// under one key, read wholesale at startup and written wholesale on change.
pub trait CalendarStorage: Send + Sync {
    /// Stored records in either shape; empty when nothing was saved yet.
    fn load_records(&self) -> Result<Vec<RecurringTransactionRecord>>;
    fn save_transactions(&self, transactions: &[RecurringTransaction]) -> Result<()>;
}

pub use json_backend::JsonStorage;
