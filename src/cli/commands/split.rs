use crate::cli::core::{short_id, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::domain::Displayable;

use super::{subcommand, CommandDefinition};

const USAGE: &str = "split members | split add <name> | split rm <member> | split toggle <member> | split calc <total> | split history [forget <id>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "split",
        "Split a bill evenly between selected members",
        USAGE,
        cmd_split,
    )]
}

fn cmd_split(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = subcommand(
        args,
        &["members", "add", "rm", "toggle", "calc", "history"],
        USAGE,
    )?;
    match sub {
        "members" => members(context),
        "add" => {
            let member = context.split.add_member(&rest.join(" "))?;
            output::success(format!("Added `{}` to the split.", member.name));
            Ok(())
        }
        "rm" => {
            let id = member_id(context, rest)?;
            let removed = context.split.remove_member(id)?;
            output::success(format!("Removed `{}`.", removed.name));
            Ok(())
        }
        "toggle" => {
            let id = member_id(context, rest)?;
            let selected = context.split.toggle(id)?;
            output::info(if selected {
                "Member is included in the next split."
            } else {
                "Member is left out of the next split."
            });
            Ok(())
        }
        "calc" => calculate(context, rest),
        _ => history(context, rest),
    }
}

/// Resolves a member by id prefix or by name; names may span several words.
fn member_id(context: &ShellContext, args: &[&str]) -> Result<uuid::Uuid, CommandError> {
    let needle = args.join(" ");
    if needle.trim().is_empty() {
        return Err(CommandError::InvalidArguments("name a member".into()));
    }
    context
        .split
        .find_member(&needle)
        .ok_or_else(|| CommandError::InvalidArguments(format!("no member matches `{needle}`")))
}

fn members(context: &ShellContext) -> CommandResult {
    output::section("Split members");
    if context.split.members().is_empty() {
        output::row("(nobody yet; use `split add <name>`)");
    }
    for member in context.split.members() {
        let mark = if member.selected { "[x]" } else { "[ ]" };
        output::row(format!("{mark} {}  {}", member.name, short_id(member.id)));
    }
    Ok(())
}

fn calculate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let total = args.first().copied().unwrap_or_default();
    let now = context.clock.now();
    let record = context.split.calculate(total, now)?;
    output::section(format!("Split of {}", output::format_amount(record.amount)));
    for share in &record.shares {
        output::row(share.display_label());
    }
    Ok(())
}

fn history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let ["forget", needle] = args {
        let id = context.split.find_history_entry(needle).ok_or_else(|| {
            CommandError::InvalidArguments(format!("no split matches `{needle}`"))
        })?;
        context.split.clear_history_entry(id)?;
        output::success("Split removed from history.");
        return Ok(());
    }
    if !args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: split history [forget <id>]".into(),
        ));
    }
    if context.split.history().is_empty() {
        output::info("No splits calculated this session.");
        return Ok(());
    }
    output::section("Split history");
    for record in context.split.history() {
        let people: Vec<String> = record
            .shares
            .iter()
            .map(|share| share.display_label())
            .collect();
        output::row(format!(
            "{}  {}  {}: {}",
            short_id(record.id),
            record.created_at.format("%Y-%m-%d %H:%M"),
            output::format_amount(record.amount),
            people.join(", ")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::cli::core::testing::{run, shell_on};

    #[test]
    fn toggled_members_are_left_out() {
        let (_dir, mut shell) = shell_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        run(
            &mut shell,
            &["split add Lin", "split toggle hua", "split calc 301"],
        );
        let record = &shell.split.history()[0];
        assert_eq!(record.shares.len(), 2);
        assert!(record.shares.iter().all(|share| share.share == 151.0));
        assert!(record.shares.iter().all(|share| share.name != "Hua"));
    }

    #[test]
    fn calc_without_total_is_rejected() {
        let (_dir, mut shell) = shell_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(shell.process_line("split calc").is_err());
        assert!(shell.process_line("split rm nobody").is_err());
        run(&mut shell, &["split calc 10"]);
        let forget = format!("split history forget {}", &shell.split.history()[0].id.to_string()[..8]);
        run(&mut shell, &[forget.as_str()]);
        assert!(shell.split.history().is_empty());
    }
}
