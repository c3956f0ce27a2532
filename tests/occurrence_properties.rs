mod common;

use chrono::{Datelike, Weekday};
use common::{day, transaction};
use finance_calendar::calendar::{
    occurrences_for_month, Frequency, LegacyAnchors, RecurringTransaction, YearMonth,
};

fn month(year: i32, month1: u32) -> YearMonth {
    YearMonth::new(year, month1 - 1).expect("valid month")
}

fn dates_for(transactions: &[RecurringTransaction], ym: YearMonth) -> Vec<String> {
    occurrences_for_month(transactions, ym)
        .days()
        .map(|(key, _)| key.to_string())
        .collect()
}

#[test]
fn daily_fills_every_day_from_start_to_month_end() {
    let txns = [transaction("d", Frequency::Daily, day(2024, 2, 10))];

    let feb = occurrences_for_month(&txns, month(2024, 2));
    assert_eq!(feb.len(), 20);
    for d in 10..=29 {
        assert_eq!(feb.on(day(2024, 2, d)).len(), 1, "2024-02-{d:02}");
    }
    assert!(feb.on(day(2024, 2, 9)).is_empty());

    for m in 3..=12 {
        let ym = month(2024, m);
        assert_eq!(occurrences_for_month(&txns, ym).len() as u32, ym.day_count());
    }
}

#[test]
fn monthly_on_the_31st_clamps_in_short_months() {
    let txns = [transaction("m", Frequency::Monthly, day(2024, 1, 31))];
    assert_eq!(dates_for(&txns, month(2024, 2)), ["2024-02-29"]);
    assert_eq!(dates_for(&txns, month(2024, 4)), ["2024-04-30"]);
    assert_eq!(dates_for(&txns, month(2025, 2)), ["2025-02-28"]);
    assert_eq!(dates_for(&txns, month(2024, 5)), ["2024-05-31"]);
}

#[test]
fn bi_weekly_steps_fourteen_days_from_start() {
    let txns = [transaction("b", Frequency::BiWeekly, day(2024, 1, 1))];
    assert_eq!(
        dates_for(&txns, month(2024, 1)),
        ["2024-01-01", "2024-01-15", "2024-01-29"]
    );
    assert_eq!(dates_for(&txns, month(2024, 2)), ["2024-02-12", "2024-02-26"]);
}

#[test]
fn weekly_only_matches_the_start_weekday() {
    let start = day(2024, 1, 1);
    assert_eq!(start.weekday(), Weekday::Mon);
    let txns = [transaction("w", Frequency::Weekly, start)];

    for m in 1..=12 {
        let index = occurrences_for_month(&txns, month(2024, m));
        assert!(!index.is_empty());
        assert!(index.iter().all(|occ| occ.date.weekday() == Weekday::Mon));
    }
}

#[test]
fn end_date_is_inclusive() {
    let mut txn = transaction("e", Frequency::Daily, day(2024, 3, 1));
    txn.end_date = Some(day(2024, 3, 10));
    let txns = [txn];

    let march = occurrences_for_month(&txns, month(2024, 3));
    assert_eq!(march.len(), 10);
    assert_eq!(march.on(day(2024, 3, 10)).len(), 1);
    assert!(march.on(day(2024, 3, 11)).is_empty());
    assert!(occurrences_for_month(&txns, month(2024, 4)).is_empty());
}

#[test]
fn months_before_the_start_are_empty() {
    let txns = [
        transaction("d", Frequency::Daily, day(2024, 6, 15)),
        transaction("w", Frequency::Weekly, day(2024, 6, 15)),
        transaction("b", Frequency::BiWeekly, day(2024, 6, 15)),
        transaction("m", Frequency::Monthly, day(2024, 6, 15)),
        transaction("a", Frequency::Annually, day(2024, 6, 15)),
    ];
    assert!(occurrences_for_month(&txns, month(2024, 5)).is_empty());
    assert!(occurrences_for_month(&txns, month(2023, 6)).is_empty());
    assert!(occurrences_for_month(&txns, month(2023, 12)).is_empty());
}

#[test]
fn same_day_occurrences_keep_input_order() {
    let txns = [
        transaction("first", Frequency::Monthly, day(2024, 1, 5)),
        transaction("second", Frequency::Weekly, day(2024, 1, 5)),
        transaction("third", Frequency::Daily, day(2024, 1, 1)),
    ];
    let jan = occurrences_for_month(&txns, month(2024, 1));
    let ids: Vec<_> = jan
        .on(day(2024, 1, 5))
        .iter()
        .map(|occ| occ.transaction.id.as_str())
        .collect();
    assert_eq!(ids, ["first", "second", "third"]);
}

#[test]
fn annual_leap_day_clamps_to_february_28() {
    let txns = [transaction("a", Frequency::Annually, day(2024, 2, 29))];
    assert_eq!(dates_for(&txns, month(2024, 2)), ["2024-02-29"]);
    assert_eq!(dates_for(&txns, month(2025, 2)), ["2025-02-28"]);
    assert!(occurrences_for_month(&txns, month(2025, 3)).is_empty());
}

#[test]
fn legacy_anchors_override_the_start_day() {
    let mut txn = transaction("rent", Frequency::Monthly, day(2024, 1, 10));
    txn.anchors = LegacyAnchors {
        day_of_month: Some(31),
        ..Default::default()
    };
    let mut yearly = transaction("fee", Frequency::Annually, day(2024, 1, 10));
    yearly.anchors = LegacyAnchors {
        day_of_month: Some(30),
        month_of_year: Some(1),
        ..Default::default()
    };
    let txns = [txn, yearly];

    assert_eq!(dates_for(&txns, month(2024, 1)), ["2024-01-31"]);
    assert_eq!(dates_for(&txns, month(2024, 2)), ["2024-02-29"]);
    assert_eq!(dates_for(&txns, month(2025, 2)), ["2025-02-28"]);
}

#[test]
fn monthly_summary_totals_each_occurrence() {
    let mut salary = transaction("salary", Frequency::BiWeekly, day(2024, 1, 1));
    salary.kind = finance_calendar::calendar::TransactionType::Income;
    salary.amount = 1000.0;
    let rent = transaction("rent", Frequency::Monthly, day(2024, 1, 1));
    let txns = [salary, rent];

    let summary = occurrences_for_month(&txns, month(2024, 1)).summary();
    assert_eq!(summary.occurrences, 4);
    assert_eq!(summary.income, 3000.0);
    assert_eq!(summary.expenses, 10.0);
    assert_eq!(summary.net, 2990.0);
}
