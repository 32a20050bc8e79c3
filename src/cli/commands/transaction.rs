use crate::cli::core::{short_id, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::domain::transaction::{TransactionDraft, TransactionKind};
use crate::domain::Displayable;

use super::{parse_date, parse_value, subcommand, CommandDefinition, ParsedArgs};

const USAGE: &str = "tx add <expense|income> <amount> [category] [--date YYYY-MM-DD] [--note TEXT] | tx list [limit] | tx rm <id> | tx clear --yes";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "tx",
        "Log, list and delete income or expense records",
        USAGE,
        cmd_tx,
    )]
}

fn cmd_tx(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = subcommand(args, &["add", "list", "rm", "clear"], USAGE)?;
    match sub {
        "add" => add(context, rest),
        "list" => list(context, rest),
        "rm" => remove(context, rest),
        _ => clear(context, rest),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["--date", "--note"], &[])?;
    let (kind, amount) = match parsed.positional.as_slice() {
        [kind, amount, ..] => (parse_value::<TransactionKind>(kind)?, *amount),
        _ => return Err(CommandError::InvalidArguments(format!("usage: {USAGE}"))),
    };

    let category = match parsed.joined(2) {
        name if name.is_empty() => context.categories.initial_selection(kind).ok_or_else(|| {
            CommandError::InvalidArguments(format!("no {kind} categories; add one first"))
        })?,
        name => name,
    };
    if !context.categories.contains(kind, &category) {
        return Err(CommandError::InvalidArguments(format!(
            "unknown {kind} category `{category}`; see `category list {}`",
            kind.to_string().to_lowercase()
        )));
    }

    let draft = TransactionDraft {
        amount: amount.to_string(),
        kind: Some(kind),
        category,
        note: parsed.flag("--note").map(str::to_string),
        date: parsed.flag("--date").map(parse_date).transpose()?,
    };
    let today = context.clock.today();
    let record = context.transactions.add(draft, today)?;
    output::success(format!(
        "Logged {} {} in {} on {} ({}).",
        record.kind,
        record.amount,
        record.category,
        record.date,
        short_id(record.id)
    ));
    Ok(())
}

fn list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args.first() {
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a valid limit"))
        })?,
        None => usize::MAX,
    };
    if context.transactions.is_empty() {
        output::info("No transactions logged yet.");
        return Ok(());
    }
    output::section(format!("Transactions ({})", context.transactions.len()));
    for record in context.transactions.list().iter().take(limit) {
        let amount = record
            .signed_amount()
            .map(output::format_amount)
            .unwrap_or_else(|| format!("{} (unreadable)", record.amount));
        let note = record
            .note
            .as_deref()
            .map(|note| format!("  {note}"))
            .unwrap_or_default();
        output::row(format!(
            "{}  {}  {:<8} {:>12}  {}{}",
            short_id(record.id),
            record.date,
            record.kind,
            amount,
            record.category,
            note
        ));
    }
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let needle = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: tx rm <id>".into()))?;
    let id = context.transactions.find_id(needle).ok_or_else(|| {
        CommandError::InvalidArguments(format!("no single transaction matches `{needle}`"))
    })?;
    let removed = context.transactions.delete(id)?;
    output::success(format!("Deleted {}.", removed.display_label()));
    Ok(())
}

fn clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["--yes"])?;
    if !parsed.switch("--yes") {
        output::warning("This deletes every transaction. Re-run as `tx clear --yes` to confirm.");
        return Ok(());
    }
    let removed = context.transactions.clear();
    output::success(format!("Cleared {removed} transaction(s)."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::cli::core::testing::{run, shell_on};
    use crate::cli::core::LoopControl;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_defaults_to_today_and_first_category() {
        let (_dir, mut shell) = shell_on(day(2024, 3, 15));
        run(&mut shell, &["tx add expense 120"]);
        let record = &shell.transactions.list()[0];
        assert_eq!(record.category, "Food");
        assert_eq!(record.date, day(2024, 3, 15));
    }

    #[test]
    fn add_accepts_multi_word_category_date_and_note() {
        let (_dir, mut shell) = shell_on(day(2024, 3, 15));
        run(
            &mut shell,
            &[
                "category add expense Pet care",
                "tx add expense 30 Pet care --date 2024-02-01 --note \"vet visit\"",
            ],
        );
        let record = &shell.transactions.list()[0];
        assert_eq!(record.category, "Pet care");
        assert_eq!(record.date, day(2024, 2, 1));
        assert_eq!(record.note.as_deref(), Some("vet visit"));
    }

    #[test]
    fn add_rejects_unknown_category_and_bad_amount() {
        let (_dir, mut shell) = shell_on(day(2024, 3, 15));
        assert!(shell.process_line("tx add income 10 Groceries").is_err());
        assert!(shell.process_line("tx add expense ten Food").is_err());
        assert!(shell.process_line("tx add expense -30 Food").is_err());
        assert!(shell.transactions.is_empty());
    }

    #[test]
    fn clear_requires_confirmation() {
        let (_dir, mut shell) = shell_on(day(2024, 3, 15));
        run(&mut shell, &["tx add expense 1", "tx clear"]);
        assert_eq!(shell.transactions.len(), 1);
        assert_eq!(
            shell.process_line("tx clear --yes").unwrap(),
            LoopControl::Continue
        );
        assert!(shell.transactions.is_empty());
    }
}
