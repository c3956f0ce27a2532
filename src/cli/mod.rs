//! Line-oriented command shell over the recurring-transaction calendar.

mod commands;
pub mod output;
mod shell;

use std::io;

use thiserror::Error;

use crate::errors::CalendarError;

pub use shell::run_cli;

/// Fatal shell failures; the binary exits non-zero on these.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CalendarError),
}

/// Per-command failures; reported and the shell keeps going.
#[derive(Debug, Error)]
pub(crate) enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CalendarError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}
