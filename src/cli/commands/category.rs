use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::domain::transaction::TransactionKind;

use super::{parse_value, subcommand, CommandDefinition, ParsedArgs};

const USAGE: &str =
    "category list [expense|income] | category add <expense|income> <name> | category rm <expense|income> <name>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "category",
        "Manage expense and income categories",
        USAGE,
        cmd_category,
    )]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = subcommand(args, &["list", "add", "rm"], USAGE)?;
    match sub {
        "list" => list(context, rest),
        "add" => add(context, rest),
        _ => remove(context, rest),
    }
}

fn list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kinds = match args.first() {
        Some(raw) => vec![parse_value::<TransactionKind>(raw)?],
        None => vec![TransactionKind::Expense, TransactionKind::Income],
    };
    for kind in kinds {
        output::section(format!("{kind} categories"));
        let selected = context.categories.initial_selection(kind);
        for name in context.categories.categories(kind) {
            let marker = if selected.as_deref() == Some(name.as_str()) { "*" } else { " " };
            output::row(format!("{marker} {name}"));
        }
    }
    Ok(())
}

fn kind_and_name(args: &[&str], action: &str) -> Result<(TransactionKind, String), CommandError> {
    let parsed = ParsedArgs::parse(args, &[], &[])?;
    let kind = parsed
        .positional
        .first()
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("usage: category {action} <expense|income> <name>"))
        })
        .and_then(|raw| parse_value::<TransactionKind>(raw))?;
    Ok((kind, parsed.joined(1)))
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (kind, name) = kind_and_name(args, "add")?;
    let added = context.categories.add(kind, &name)?;
    output::success(format!("Added {kind} category `{added}`."));
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (kind, name) = kind_and_name(args, "rm")?;
    let fallback = context.categories.remove(kind, &name)?;
    output::success(format!(
        "Removed {kind} category `{}`. Selection falls back to `{fallback}`.",
        name.trim()
    ));
    Ok(())
}
