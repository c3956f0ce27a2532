use std::io::{self, BufRead};

use shell_words::split;
use tracing::debug;

use super::{commands, output, CliError, CommandError, LoopControl};
use crate::{
    config::ConfigManager,
    services::{CalendarManager, SystemClock},
    storage::JsonStorage,
};

/// Reads commands from stdin, one per line, until `exit` or end of input.
pub fn run_cli() -> Result<(), CliError> {
    let mut context = ShellContext::new()?;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match handle_line(&mut context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => report_error(err),
        }
    }
    Ok(())
}

pub(crate) struct ShellContext {
    pub(crate) manager: CalendarManager,
}

impl ShellContext {
    fn new() -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        if config.cloud_sync_allowed() {
            output::warning(commands::CLOUD_SYNC_NOTE);
        }
        let storage = JsonStorage::new(
            Some(config_manager.base_dir().to_path_buf()),
            &config.storage_key,
        )?;
        debug!(path = %storage.path().display(), "using calendar storage");
        let mut manager = CalendarManager::new(Box::new(storage), Box::new(SystemClock));
        manager.load()?;
        Ok(Self { manager })
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not parse command: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    commands::dispatch(context, &raw.to_lowercase(), &args)
}

fn report_error(err: CommandError) {
    match err {
        CommandError::InvalidArguments(message) => {
            output::error(message);
            output::info("Use `help` for usage details.");
        }
        other => output::error(other),
    }
}
