#![doc(test(attr(deny(warnings))))]

//! Finance Calendar keeps a collection of recurring income and expense
//! transactions and resolves which of them fall due on each day of a month.

pub mod calendar;
pub mod cli;
pub mod config;
pub mod errors;
pub mod services;
pub mod storage;
pub mod sync;
pub mod utils;

use std::sync::Once;

pub use errors::{CalendarError, Result};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Calendar tracing initialized.");
    });
}
