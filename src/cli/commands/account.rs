use std::{fs::File, io};

use crate::cli::core::{short_id, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::domain::account::{AccountDraft, AccountIcon};
use crate::domain::Displayable;

use super::{parse_value, subcommand, CommandDefinition, ParsedArgs};

const USAGE: &str = "account add <name> <balance> [--limit N] [--icon cash|credit-card|bank|wallet] [--currency SYMBOL] | account edit <id> <name> <balance> [...] | account list | account rm <id> | account export <path|->";

const FORM_VALUE_FLAGS: [&str; 3] = ["--limit", "--icon", "--currency"];

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "account",
        "Track balances across cash, cards and bank accounts",
        USAGE,
        cmd_account,
    )]
}

fn cmd_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = subcommand(args, &["add", "edit", "list", "rm", "export"], USAGE)?;
    match sub {
        "add" => add(context, rest),
        "edit" => edit(context, rest),
        "list" => list(context),
        "rm" => remove(context, rest),
        _ => export(context, rest),
    }
}

/// Reads `<name> <balance>` plus the optional form flags into a draft.
fn draft_from(parsed: &ParsedArgs<'_>, positional: &[&str]) -> Result<AccountDraft, CommandError> {
    let [name, balance] = positional else {
        return Err(CommandError::InvalidArguments(
            "expected `<name> <balance>`; quote names that contain spaces".into(),
        ));
    };
    Ok(AccountDraft {
        name: name.to_string(),
        balance: balance.to_string(),
        credit_limit: parsed.flag("--limit").unwrap_or_default().to_string(),
        icon: parsed
            .flag("--icon")
            .map(parse_value::<AccountIcon>)
            .transpose()?
            .unwrap_or_default(),
        currency: parsed.flag("--currency").map(str::to_string),
    })
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &FORM_VALUE_FLAGS, &[])?;
    let draft = draft_from(&parsed, &parsed.positional)?;
    let account = context.accounts.add(draft)?;
    output::success(format!(
        "Added account `{}` with {} {} ({}).",
        account.name,
        account.currency,
        output::format_amount(account.balance),
        short_id(account.id)
    ));
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &FORM_VALUE_FLAGS, &[])?;
    let Some((needle, rest)) = parsed.positional.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: account edit <id> <name> <balance>".into(),
        ));
    };
    let id = context.accounts.find_id(needle).ok_or_else(|| {
        CommandError::InvalidArguments(format!("no single account matches `{needle}`"))
    })?;
    let draft = draft_from(&parsed, rest)?;
    let account = context.accounts.edit(id, draft)?;
    output::success(format!("Updated account `{}`.", account.name));
    Ok(())
}

fn list(context: &mut ShellContext) -> CommandResult {
    if context.accounts.list().is_empty() {
        output::info("No accounts yet. Use `account add <name> <balance>`.");
        return Ok(());
    }
    let currency = context.config.currency();
    output::section(format!(
        "Accounts (total {} {})",
        currency.symbol,
        output::format_amount(context.accounts.total_in(currency))
    ));
    for account in context.accounts.sorted_by_balance() {
        let limit = account
            .credit_limit
            .map(|limit| format!("  limit {}", output::format_amount(limit)))
            .unwrap_or_default();
        output::row(format!(
            "{}  {:<20} {:>14}  {:<12}{}",
            short_id(account.id),
            account.name,
            output::format_amount(account.balance),
            account.icon,
            limit
        ));
    }
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let needle = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: account rm <id>".into()))?;
    let id = context.accounts.find_id(needle).ok_or_else(|| {
        CommandError::InvalidArguments(format!("no single account matches `{needle}`"))
    })?;
    let removed = context.accounts.remove(id)?;
    output::success(format!("Removed account {}.", removed.display_label()));
    Ok(())
}

fn export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: account export <path|->".into()))?;
    if *target == "-" {
        context.accounts.export_csv(io::stdout().lock())?;
        return Ok(());
    }
    let file = File::create(target)?;
    let written = context.accounts.export_csv(file)?;
    output::success(format!("Exported {written} account(s) to {target}."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;

    use crate::cli::core::testing::{run, shell_on};
    use crate::domain::account::AccountIcon;

    #[test]
    fn add_edit_and_export() {
        let (dir, mut shell) = shell_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        run(
            &mut shell,
            &["account add \"Visa card\" -1200 --limit 30000 --icon credit-card"],
        );
        let account = shell.accounts.list()[0].clone();
        assert_eq!(account.icon, AccountIcon::CreditCard);
        assert_eq!(account.credit_limit, Some(30000.0));

        let prefix = account.id.simple().to_string()[..8].to_string();
        run(&mut shell, &[format!("account edit {prefix} Visa 0").as_str()]);
        assert_eq!(shell.accounts.list()[0].name, "Visa");
        assert_eq!(shell.accounts.list()[0].id, account.id);

        let path = dir.path().join("accounts.csv");
        run(&mut shell, &[format!("account export {}", path.display()).as_str()]);
        let csv = fs::read_to_string(path).unwrap();
        assert!(csv.starts_with("name,balance,credit_limit,icon,currency"));
        assert!(csv.contains("Visa,0,,cash,NT$"));
    }

    #[test]
    fn add_rejects_missing_balance() {
        let (_dir, mut shell) = shell_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(shell.process_line("account add Wallet").is_err());
        assert!(shell.process_line("account add Wallet 10 --icon rocket").is_err());
        assert!(shell.accounts.list().is_empty());
    }
}
