//! Resolves which recurring transactions fall due on each day of a month.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use super::{
    dates::{iso_day, YearMonth},
    frequency::Frequency,
    transaction::RecurringTransaction,
};

const BI_WEEKLY_DAYS: i64 = 14;

/// A transaction paired with a day it is due on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarOccurrence<'a> {
    pub transaction: &'a RecurringTransaction,
    pub date: NaiveDate,
}

/// Day-keyed occurrence index for a single month.
///
/// Days without occurrences have no entry; [`MonthOccurrences::on`] returns an
/// empty slice for them.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthOccurrences<'a> {
    month: YearMonth,
    by_day: BTreeMap<String, Vec<CalendarOccurrence<'a>>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlySummary {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub occurrences: usize,
}

impl<'a> MonthOccurrences<'a> {
    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn on(&self, date: NaiveDate) -> &[CalendarOccurrence<'a>] {
        self.on_key(&iso_day(date))
    }

    /// Lookup by `YYYY-MM-DD` key.
    pub fn on_key(&self, key: &str) -> &[CalendarOccurrence<'a>] {
        self.by_day.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Days with at least one occurrence, in calendar order.
    pub fn days(&self) -> impl Iterator<Item = (&str, &[CalendarOccurrence<'a>])> {
        self.by_day
            .iter()
            .map(|(key, occurrences)| (key.as_str(), occurrences.as_slice()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalendarOccurrence<'a>> {
        self.by_day.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_day.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }

    /// Income and expense totals with every occurrence counted once.
    pub fn summary(&self) -> MonthlySummary {
        let mut summary = MonthlySummary::default();
        for occurrence in self.iter() {
            let txn = occurrence.transaction;
            if txn.is_income() {
                summary.income += txn.amount;
            } else {
                summary.expenses += txn.amount;
            }
            summary.occurrences += 1;
        }
        summary.net = summary.income - summary.expenses;
        summary
    }
}

/// Computes the occurrence index of `month` for `transactions`.
///
/// Within a day, occurrences follow the order of `transactions`.
pub fn occurrences_for_month(
    transactions: &[RecurringTransaction],
    month: YearMonth,
) -> MonthOccurrences<'_> {
    let mut by_day: BTreeMap<String, Vec<CalendarOccurrence<'_>>> = BTreeMap::new();
    let last_day = month.day_count();

    for transaction in transactions {
        for day in month.days() {
            if !transaction.is_active_on(day) {
                continue;
            }
            if matches_day(transaction, day, last_day) {
                by_day
                    .entry(iso_day(day))
                    .or_default()
                    .push(CalendarOccurrence {
                        transaction,
                        date: day,
                    });
            }
        }
    }

    MonthOccurrences { month, by_day }
}

/// Frequency rule for a day already known to be inside the transaction's range.
/// `last_day` is the length of the month containing `day`.
fn matches_day(transaction: &RecurringTransaction, day: NaiveDate, last_day: u32) -> bool {
    let start = transaction.start_date;
    let anchor_day = transaction
        .anchors
        .day_of_month
        .unwrap_or_else(|| start.day());
    match transaction.frequency {
        Frequency::Daily => true,
        Frequency::Weekly => day.weekday() == start.weekday(),
        Frequency::BiWeekly => {
            let diff = (day - start).num_days();
            diff >= 0 && diff % BI_WEEKLY_DAYS == 0
        }
        Frequency::Monthly => day.day() == anchor_day.min(last_day),
        Frequency::Annually => {
            let anchor_month = transaction
                .anchors
                .month_of_year
                .unwrap_or_else(|| start.month0());
            day.month0() == anchor_month && day.day() == anchor_day.min(last_day)
        }
    }
}
