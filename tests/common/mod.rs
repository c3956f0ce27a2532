#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, TimeZone, Utc};
use finance_calendar::{
    calendar::{Frequency, NewRecurringTransaction, RecurringTransaction, TransactionType},
    services::{CalendarManager, FixedClock},
    storage::JsonStorage,
};
use tempfile::TempDir;

pub const STORAGE_KEY: &str = "finance-calendar";

/// Isolated workspace; the directory lives as long as the value.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn base(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn storage(&self) -> JsonStorage {
        JsonStorage::new(Some(self.base()), STORAGE_KEY).expect("create json storage")
    }

    pub fn data_file(&self) -> PathBuf {
        self.storage().path().to_path_buf()
    }

    pub fn manager(&self) -> CalendarManager {
        CalendarManager::new(Box::new(self.storage()), Box::new(fixed_clock()))
    }

    pub fn write_data(&self, json: &str) {
        write_file(&self.data_file(), json);
    }
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap())
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, contents).expect("write fixture");
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn draft(name: &str, frequency: Frequency, start: NaiveDate) -> NewRecurringTransaction {
    NewRecurringTransaction::new(name, 100.0, TransactionType::Expense, frequency, start)
}

/// Canonical transaction built without going through a store.
pub fn transaction(id: &str, frequency: Frequency, start: NaiveDate) -> RecurringTransaction {
    RecurringTransaction {
        id: id.into(),
        name: id.into(),
        amount: 10.0,
        kind: TransactionType::Expense,
        frequency,
        start_date: start,
        end_date: None,
        category: "Other".into(),
        color: None,
        anchors: Default::default(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}
