use chrono::NaiveDate;

use super::{output, shell::ShellContext, CommandError, LoopControl};
use crate::calendar::{
    parse_calendar_day, Frequency, NewRecurringTransaction, RecurringTransactionPatch,
    TransactionType, YearMonth,
};

type CommandResult = Result<LoopControl, CommandError>;

pub(crate) const CLOUD_SYNC_NOTE: &str =
    "Cloud sync is not available in this shell; changes are saved locally only.";

const HELP: &[(&str, &str)] = &[
    (
        "add <name> <amount> <income|expense> <frequency> <start> [end=..] [category=..] [color=..]",
        "Add a recurring transaction",
    ),
    ("update <id> <field>=<value>...", "Change fields of a transaction"),
    ("delete <id>", "Remove a transaction"),
    ("list", "List every recurring transaction"),
    ("month [YYYY-MM]", "Show occurrences for a month (default: current)"),
    ("help", "Show this help"),
    ("exit", "Leave the shell"),
];

pub(crate) fn dispatch(context: &mut ShellContext, command: &str, args: &[&str]) -> CommandResult {
    match command {
        "add" => cmd_add(context, args),
        "update" => cmd_update(context, args),
        "delete" | "remove" => cmd_delete(context, args),
        "list" => cmd_list(context),
        "month" => cmd_month(context, args),
        "help" => cmd_help(),
        "exit" | "quit" => Ok(LoopControl::Exit),
        other => Err(invalid(format!("Unknown command `{other}`"))),
    }
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, amount, kind, frequency, start, options @ ..] = args else {
        return Err(invalid(
            "usage: add <name> <amount> <income|expense> <frequency> <start> [end=..] [category=..] [color=..]",
        ));
    };
    let mut draft = NewRecurringTransaction::new(
        *name,
        parse_amount(amount)?,
        parse_kind(kind)?,
        parse_frequency(frequency)?,
        parse_day("start", start)?,
    );
    for option in options {
        let (key, value) = split_assignment(option)?;
        match key {
            "end" => draft = draft.with_end_date(parse_day("end", value)?),
            "category" => draft = draft.with_category(value),
            "color" => draft = draft.with_color(value),
            other => return Err(invalid(format!("Unknown option `{other}` for add"))),
        }
    }
    let draft = draft.validate()?;
    let label = draft.name.clone();
    let id = context.manager.add(draft)?;
    output::success(format!("Added `{label}` ({id})"));
    Ok(LoopControl::Continue)
}

fn cmd_update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id, assignments @ ..] = args else {
        return Err(invalid("usage: update <id> <field>=<value>..."));
    };
    let mut patch = RecurringTransactionPatch::default();
    for assignment in assignments {
        let (field, value) = split_assignment(assignment)?;
        match field {
            "name" => patch.name = Some(value.to_string()),
            "amount" => patch.amount = Some(parse_amount(value)?),
            "type" => patch.kind = Some(parse_kind(value)?),
            "frequency" => patch.frequency = Some(parse_frequency(value)?),
            "start" => patch.start_date = Some(parse_day("start", value)?),
            "end" => {
                patch.end_date = Some(if clears(value) {
                    None
                } else {
                    Some(parse_day("end", value)?)
                });
            }
            "category" => patch.category = Some(value.to_string()),
            "color" => patch.color = Some((!clears(value)).then(|| value.to_string())),
            other => return Err(invalid(format!("Unknown field `{other}`"))),
        }
    }
    if patch.is_empty() {
        return Err(invalid("update needs at least one <field>=<value>"));
    }
    let patch = patch.validate()?;
    if let Some(current) = context.manager.get(id) {
        let start = patch.start_date.unwrap_or(current.start_date);
        let end = patch.end_date.unwrap_or(current.end_date);
        if end.is_some_and(|end| end < start) {
            return Err(invalid("end date must not precede the start date"));
        }
    }
    if context.manager.update(id, patch)? {
        output::success(format!("Updated {id}"));
    } else {
        output::warning(format!("No recurring transaction with id {id}"));
    }
    Ok(LoopControl::Continue)
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(invalid("usage: delete <id>"));
    };
    if context.manager.delete(id)? {
        output::success(format!("Deleted {id}"));
    } else {
        output::warning(format!("No recurring transaction with id {id}"));
    }
    Ok(LoopControl::Continue)
}

fn cmd_list(context: &ShellContext) -> CommandResult {
    let transactions = context.manager.transactions();
    if transactions.is_empty() {
        output::info("No recurring transactions.");
        return Ok(LoopControl::Continue);
    }
    output::section(format!("Recurring transactions ({})", transactions.len()));
    for txn in transactions {
        println!("{}", output::transaction_line(txn));
    }
    Ok(LoopControl::Continue)
}

fn cmd_month(context: &ShellContext, args: &[&str]) -> CommandResult {
    let month = match args {
        [] => YearMonth::containing(context.manager.today()),
        [value] => YearMonth::parse(value)
            .ok_or_else(|| invalid(format!("Invalid month `{value}`; expected YYYY-MM")))?,
        _ => return Err(invalid("usage: month [YYYY-MM]")),
    };
    let occurrences = context.manager.occurrences_in(month);
    if occurrences.is_empty() {
        output::info(format!("No occurrences in {month}."));
        return Ok(LoopControl::Continue);
    }
    output::section(format!("Calendar for {month}"));
    for (day, entries) in occurrences.days() {
        println!("{day}");
        for entry in entries {
            let txn = entry.transaction;
            println!(
                "  {} {} {}",
                output::swatch(txn.display_color()),
                txn.name,
                output::signed_amount(txn.kind, txn.amount)
            );
        }
    }
    let summary = occurrences.summary();
    println!(
        "Income: {:.2}  Expenses: {:.2}  Net: {:.2}  ({} occurrences)",
        summary.income, summary.expenses, summary.net, summary.occurrences
    );
    Ok(LoopControl::Continue)
}

fn cmd_help() -> CommandResult {
    output::section("Commands");
    for (usage, summary) in HELP {
        println!("  {usage}\n      {summary}");
    }
    println!("  Frequencies: {}", frequency_names());
    println!("  {CLOUD_SYNC_NOTE}");
    Ok(LoopControl::Continue)
}

fn invalid(message: impl Into<String>) -> CommandError {
    CommandError::InvalidArguments(message.into())
}

fn split_assignment(raw: &str) -> Result<(&str, &str), CommandError> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .ok_or_else(|| invalid(format!("Expected <field>=<value>, got `{raw}`")))
}

fn clears(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("none")
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .map_err(|_| invalid(format!("Invalid amount `{raw}`")))
}

fn parse_kind(raw: &str) -> Result<TransactionType, CommandError> {
    TransactionType::parse(raw)
        .ok_or_else(|| invalid(format!("Invalid type `{raw}`; expected income or expense")))
}

fn parse_frequency(raw: &str) -> Result<Frequency, CommandError> {
    Frequency::parse(raw).ok_or_else(|| {
        invalid(format!(
            "Invalid frequency `{raw}`; expected one of {}",
            frequency_names()
        ))
    })
}

fn parse_day(field: &str, raw: &str) -> Result<NaiveDate, CommandError> {
    parse_calendar_day(raw)
        .ok_or_else(|| invalid(format!("Invalid {field} date `{raw}`; expected YYYY-MM-DD")))
}

fn frequency_names() -> String {
    Frequency::ALL
        .iter()
        .map(Frequency::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::iso_day;

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(split_assignment("name=a=b").unwrap(), ("name", "a=b"));
        assert_eq!(split_assignment("end=").unwrap(), ("end", ""));
        assert!(split_assignment("name").is_err());
    }

    #[test]
    fn blank_or_none_clears_optional_fields() {
        assert!(clears(""));
        assert!(clears("None"));
        assert!(!clears("2024-01-01"));
    }

    #[test]
    fn parses_dates_and_frequencies() {
        assert_eq!(
            parse_day("start", "2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_day("start", "2023-02-29").is_err());
        assert_eq!(parse_frequency("bi-weekly").unwrap(), Frequency::BiWeekly);
        assert!(parse_frequency("hourly").is_err());
        assert!(parse_amount("12.5x").is_err());
        assert_eq!(iso_day(parse_day("end", "2024-03-01").unwrap()), "2024-03-01");
    }
}
