//! Persisted record shapes and their migration to [`RecurringTransaction`].
//!
//! Two shapes exist in stored data. Canonical records carry `frequency` and
//! derive their anchors from `startDate`. Legacy records carry `recurrence`
//! (`weekly | monthly | yearly`) plus explicit `dayOfWeek`, `dayOfMonth` and
//! `monthOfYear` anchors. Both decode into [`RecurringTransactionRecord`] and
//! only leave the storage boundary through [`canonicalize`].

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use super::{
    category::DEFAULT_CATEGORY,
    dates::{parse_calendar_day, parse_timestamp},
    frequency::{Frequency, TransactionType},
    transaction::{LegacyAnchors, RecurringTransaction},
};
use crate::errors::{CalendarError, Result};

/// Fields common to both persisted shapes, dates still in serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    pub id: String,
    pub name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub anchors: LegacyAnchors,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub fields: RecordFields,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRecord {
    pub fields: RecordFields,
    pub recurrence: Option<String>,
}

/// A stored recurring transaction in either schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireRecord", into = "WireRecord")]
pub enum RecurringTransactionRecord {
    Canonical(CanonicalRecord),
    Legacy(LegacyRecord),
}

#[derive(Serialize, Deserialize)]
struct WireRecord {
    #[serde(flatten)]
    fields: RecordFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frequency: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recurrence: Option<String>,
}

impl From<WireRecord> for RecurringTransactionRecord {
    fn from(wire: WireRecord) -> Self {
        match wire.frequency {
            Some(frequency) => RecurringTransactionRecord::Canonical(CanonicalRecord {
                fields: wire.fields,
                frequency,
            }),
            None => RecurringTransactionRecord::Legacy(LegacyRecord {
                fields: wire.fields,
                recurrence: wire.recurrence,
            }),
        }
    }
}

impl From<RecurringTransactionRecord> for WireRecord {
    fn from(record: RecurringTransactionRecord) -> Self {
        match record {
            RecurringTransactionRecord::Canonical(canonical) => WireRecord {
                fields: canonical.fields,
                frequency: Some(canonical.frequency),
                recurrence: None,
            },
            RecurringTransactionRecord::Legacy(legacy) => WireRecord {
                fields: legacy.fields,
                frequency: None,
                recurrence: legacy.recurrence,
            },
        }
    }
}

impl RecurringTransactionRecord {
    pub fn id(&self) -> &str {
        &self.fields().id
    }

    pub fn fields(&self) -> &RecordFields {
        match self {
            RecurringTransactionRecord::Canonical(canonical) => &canonical.fields,
            RecurringTransactionRecord::Legacy(legacy) => &legacy.fields,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, RecurringTransactionRecord::Legacy(_))
    }
}

impl From<&RecurringTransaction> for RecurringTransactionRecord {
    fn from(txn: &RecurringTransaction) -> Self {
        RecurringTransactionRecord::Canonical(CanonicalRecord {
            fields: RecordFields {
                id: txn.id.clone(),
                name: txn.name.clone(),
                amount: txn.amount,
                kind: txn.kind,
                start_date: txn.start_date.format("%Y-%m-%d").to_string(),
                end_date: txn.end_date.map(|end| end.format("%Y-%m-%d").to_string()),
                category: Some(txn.category.clone()),
                color: txn.color.clone(),
                anchors: txn.anchors,
                created_at: txn.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            },
            frequency: txn.frequency,
        })
    }
}

/// Maps a stored record of either shape onto the canonical representation.
///
/// Unparseable dates fail the whole record. Legacy anchors are carried as
/// stored; an anchor no calendar day can satisfy simply never matches.
pub fn canonicalize(record: RecurringTransactionRecord) -> Result<RecurringTransaction> {
    let (fields, frequency) = match record {
        RecurringTransactionRecord::Canonical(canonical) => (canonical.fields, canonical.frequency),
        RecurringTransactionRecord::Legacy(legacy) => {
            let frequency = Frequency::from_legacy(legacy.recurrence.as_deref());
            (legacy.fields, frequency)
        }
    };

    let start_date = parse_calendar_day(&fields.start_date).ok_or_else(|| {
        invalid_date(&fields.id, "startDate", &fields.start_date)
    })?;
    let end_date = match fields.end_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            parse_calendar_day(raw).ok_or_else(|| invalid_date(&fields.id, "endDate", raw))?,
        ),
    };
    let created_at = parse_timestamp(&fields.created_at)
        .ok_or_else(|| invalid_date(&fields.id, "createdAt", &fields.created_at))?;

    let category = fields
        .category
        .filter(|category| !category.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let color = fields.color.filter(|color| !color.trim().is_empty());

    Ok(RecurringTransaction {
        id: fields.id,
        name: fields.name,
        amount: fields.amount,
        kind: fields.kind,
        frequency,
        start_date,
        end_date,
        category,
        color,
        anchors: fields.anchors,
        created_at,
    })
}

/// Migrates a whole collection, stopping at the first record that fails.
pub fn canonicalize_all(
    records: impl IntoIterator<Item = RecurringTransactionRecord>,
) -> Result<Vec<RecurringTransaction>> {
    records.into_iter().map(canonicalize).collect()
}

fn invalid_date(record: &str, field: &'static str, value: &str) -> CalendarError {
    CalendarError::InvalidDate {
        record: record.to_string(),
        field,
        value: value.to_string(),
    }
}
