use std::fmt;

use colored::{ColoredString, Colorize};

use crate::calendar::{RecurringTransaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

impl MessageKind {
    fn label(self) -> &'static str {
        match self {
            MessageKind::Info => "INFO",
            MessageKind::Success => "SUCCESS",
            MessageKind::Warning => "WARNING",
            MessageKind::Error => "ERROR",
            MessageKind::Section => "",
        }
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let formatted = match kind {
        MessageKind::Section => message.to_string(),
        other => format!("{}: {}", other.label(), message),
    };
    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Error => eprintln!("{}", formatted),
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Colored bullet for a `#rrggbb` color; plain bullet when the value is not hex.
pub fn swatch(hex: &str) -> ColoredString {
    match parse_hex(hex) {
        Some((r, g, b)) => "●".truecolor(r, g, b),
        None => "●".normal(),
    }
}

pub fn signed_amount(kind: TransactionType, amount: f64) -> ColoredString {
    match kind {
        TransactionType::Income => format!("+{:.2}", amount).green(),
        TransactionType::Expense => format!("-{:.2}", amount).red(),
    }
}

pub fn transaction_line(txn: &RecurringTransaction) -> String {
    let end = txn
        .end_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "open".into());
    format!(
        "{} {} {} {} [{}] {} from {} until {}",
        swatch(txn.display_color()),
        txn.id.dimmed(),
        txn.name,
        signed_amount(txn.kind, txn.amount),
        txn.category,
        txn.frequency.label(),
        txn.start_date.format("%Y-%m-%d"),
        end
    )
}

fn parse_hex(value: &str) -> Option<(u8, u8, u8)> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
