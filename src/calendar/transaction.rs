use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    category::{category_color, DEFAULT_CATEGORY},
    frequency::{Frequency, TransactionType},
};
use crate::errors::{CalendarError, Result};

/// Explicit anchor fields carried over from records written before
/// recurrence was derived from the start date.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAnchors {
    /// 0-6, Sunday = 0. Carried for round-tripping; weekly matching uses the start day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u32>,
    /// 1-31.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    /// 0-11.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_of_year: Option<u32>,
}

impl LegacyAnchors {
    pub fn is_empty(&self) -> bool {
        self.day_of_week.is_none() && self.day_of_month.is_none() && self.month_of_year.is_none()
    }
}

/// Canonical in-memory recurring transaction.
///
/// Only ever built by `canonicalize` or the store; the persisted shape is
/// [`RecurringTransactionRecord`](super::RecurringTransactionRecord).
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringTransaction {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub kind: TransactionType,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub category: String,
    pub color: Option<String>,
    pub anchors: LegacyAnchors,
    pub created_at: DateTime<Utc>,
}

impl RecurringTransaction {
    /// Explicit color override, else the category palette color.
    pub fn display_color(&self) -> &str {
        match self.color.as_deref() {
            Some(color) if !color.is_empty() => color,
            _ => category_color(&self.category),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Whether `day` lies within the inclusive start/end bounds.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        day >= self.start_date && self.end_date.map_or(true, |end| day <= end)
    }
}

/// Field values for a transaction that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecurringTransaction {
    pub name: String,
    pub amount: f64,
    pub kind: TransactionType,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub category: String,
    pub color: Option<String>,
}

impl NewRecurringTransaction {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        kind: TransactionType,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            kind,
            frequency,
            start_date,
            end_date: None,
            category: DEFAULT_CATEGORY.into(),
            color: None,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Edit-boundary checks. Returns the draft with its name trimmed.
    pub fn validate(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(CalendarError::Validation("name must not be empty".into()));
        }
        validate_amount(self.amount)?;
        if let Some(end) = self.end_date {
            validate_range(self.start_date, end)?;
        }
        if self.category.trim().is_empty() {
            self.category = DEFAULT_CATEGORY.into();
        }
        self.color = self.color.filter(|color| !color.trim().is_empty());
        Ok(self)
    }

    pub(crate) fn into_transaction(self, id: String, created_at: DateTime<Utc>) -> RecurringTransaction {
        RecurringTransaction {
            id,
            name: self.name,
            amount: self.amount,
            kind: self.kind,
            frequency: self.frequency,
            start_date: self.start_date,
            end_date: self.end_date,
            category: self.category,
            color: self.color,
            anchors: LegacyAnchors::default(),
            created_at,
        }
    }
}

/// Partial update. `None` leaves a field untouched; the nested options on
/// `end_date` and `color` allow clearing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurringTransactionPatch {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub kind: Option<TransactionType>,
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub category: Option<String>,
    pub color: Option<Option<String>>,
    /// Replaces the legacy anchors; `Some(LegacyAnchors::default())` re-anchors
    /// on the start date.
    pub anchors: Option<LegacyAnchors>,
}

impl RecurringTransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == RecurringTransactionPatch::default()
    }

    /// Edit-boundary checks for the fields present in the patch.
    pub fn validate(mut self) -> Result<Self> {
        if let Some(name) = self.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Err(CalendarError::Validation("name must not be empty".into()));
            }
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let (Some(start), Some(Some(end))) = (self.start_date, self.end_date) {
            validate_range(start, end)?;
        }
        Ok(self)
    }

    /// Applies the patch; `id` and `created_at` are never touched.
    pub fn apply(self, target: &mut RecurringTransaction) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(amount) = self.amount {
            target.amount = amount;
        }
        if let Some(kind) = self.kind {
            target.kind = kind;
        }
        if let Some(frequency) = self.frequency {
            target.frequency = frequency;
        }
        if let Some(start_date) = self.start_date {
            target.start_date = start_date;
        }
        if let Some(anchors) = self.anchors {
            target.anchors = anchors;
        }
        if let Some(end_date) = self.end_date {
            target.end_date = end_date;
        }
        if let Some(category) = self.category {
            target.category = category;
        }
        if let Some(color) = self.color {
            target.color = color.filter(|value| !value.is_empty());
        }
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(CalendarError::Validation("amount must be a number".into()));
    }
    if amount < 0.0 {
        return Err(CalendarError::Validation(
            "amount must not be negative".into(),
        ));
    }
    Ok(())
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(CalendarError::Validation(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> RecurringTransaction {
        NewRecurringTransaction::new(
            "Rent",
            1200.0,
            TransactionType::Expense,
            Frequency::Monthly,
            day(2024, 1, 31),
        )
        .with_category("Rent/Mortgage")
        .into_transaction(
            "rent-1".into(),
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn validate_trims_name_and_rejects_blank() {
        let draft = NewRecurringTransaction::new(
            "  Netflix ",
            15.99,
            TransactionType::Expense,
            Frequency::Monthly,
            day(2024, 1, 5),
        );
        assert_eq!(draft.validate().unwrap().name, "Netflix");

        let blank = NewRecurringTransaction::new(
            "   ",
            1.0,
            TransactionType::Expense,
            Frequency::Monthly,
            day(2024, 1, 5),
        );
        assert!(matches!(blank.validate(), Err(CalendarError::Validation(_))));
    }

    #[test]
    fn validate_rejects_bad_amounts_and_ranges() {
        let base = NewRecurringTransaction::new(
            "Gym",
            30.0,
            TransactionType::Expense,
            Frequency::Monthly,
            day(2024, 3, 1),
        );
        let mut nan = base.clone();
        nan.amount = f64::NAN;
        assert!(nan.validate().is_err());
        let mut negative = base.clone();
        negative.amount = -5.0;
        assert!(negative.validate().is_err());
        assert!(base.clone().with_end_date(day(2024, 2, 1)).validate().is_err());
        assert!(base.with_end_date(day(2024, 3, 1)).validate().is_ok());
    }

    #[test]
    fn display_color_prefers_override() {
        let mut txn = sample();
        assert_eq!(txn.display_color(), "#dc2626");
        txn.color = Some("#123456".into());
        assert_eq!(txn.display_color(), "#123456");
        txn.category = "Custom".into();
        txn.color = None;
        assert_eq!(txn.display_color(), "#6b7280");
    }

    #[test]
    fn patch_only_touches_the_fields_it_names() {
        let mut txn = sample();
        txn.anchors.day_of_month = Some(15);
        txn.anchors.month_of_year = Some(2);
        let created = txn.created_at;

        RecurringTransactionPatch {
            amount: Some(1250.0),
            ..Default::default()
        }
        .apply(&mut txn);
        assert_eq!(txn.amount, 1250.0);
        assert_eq!(txn.anchors.day_of_month, Some(15));

        RecurringTransactionPatch {
            start_date: Some(day(2024, 2, 10)),
            frequency: Some(Frequency::Annually),
            end_date: Some(Some(day(2024, 12, 31))),
            ..Default::default()
        }
        .apply(&mut txn);
        assert_eq!(txn.id, "rent-1");
        assert_eq!(txn.created_at, created);
        assert_eq!(txn.start_date, day(2024, 2, 10));
        assert_eq!(txn.anchors.day_of_month, Some(15));
        assert_eq!(txn.anchors.month_of_year, Some(2));
        assert_eq!(txn.end_date, Some(day(2024, 12, 31)));

        RecurringTransactionPatch {
            end_date: Some(None),
            ..Default::default()
        }
        .apply(&mut txn);
        assert_eq!(txn.end_date, None);
    }

    #[test]
    fn explicit_anchor_patch_reanchors_on_start_date() {
        let mut txn = sample();
        txn.anchors.day_of_month = Some(15);
        let patch = RecurringTransactionPatch {
            anchors: Some(LegacyAnchors::default()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut txn);
        assert!(txn.anchors.is_empty());
    }

    #[test]
    fn active_range_is_inclusive() {
        let mut txn = sample();
        txn.end_date = Some(day(2024, 3, 31));
        assert!(!txn.is_active_on(day(2024, 1, 30)));
        assert!(txn.is_active_on(day(2024, 1, 31)));
        assert!(txn.is_active_on(day(2024, 3, 31)));
        assert!(!txn.is_active_on(day(2024, 4, 1)));
    }
}
