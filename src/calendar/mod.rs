//! Recurring-transaction domain: canonical types, stored-record migration,
//! and the month occurrence resolver.

pub mod category;
pub mod dates;
pub mod frequency;
pub mod occurrence;
pub mod record;
pub mod transaction;

pub use category::{category_color, known_categories, DEFAULT_CATEGORY, NEUTRAL_COLOR};
pub use dates::{days_in_month, iso_day, parse_calendar_day, parse_timestamp, YearMonth};
pub use frequency::{Frequency, TransactionType};
pub use occurrence::{occurrences_for_month, CalendarOccurrence, MonthOccurrences, MonthlySummary};
pub use record::{
    canonicalize, canonicalize_all, CanonicalRecord, LegacyRecord, RecordFields,
    RecurringTransactionRecord,
};
pub use transaction::{
    LegacyAnchors, NewRecurringTransaction, RecurringTransaction, RecurringTransactionPatch,
};
