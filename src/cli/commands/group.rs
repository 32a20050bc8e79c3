use crate::cli::core::{short_id, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::core::services::JoinOutcome;
use crate::domain::Displayable;

use super::{subcommand, CommandDefinition};

const USAGE: &str = "group create <name> | group join <code> | group list | group rm <id>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "group",
        "Create shared groups and look them up by join code",
        USAGE,
        cmd_group,
    )]
}

fn cmd_group(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = subcommand(args, &["create", "join", "list", "rm"], USAGE)?;
    match sub {
        "create" => {
            let group = context.groups.create(&rest.join(" "))?;
            output::success(format!(
                "Created group `{}`. Share code {} to invite others.",
                group.name, group.code
            ));
            Ok(())
        }
        "join" => {
            let code = rest.first().copied().unwrap_or_default();
            match context.groups.join(code) {
                JoinOutcome::AlreadyJoined(group) => {
                    output::info(format!("You are already in `{}`.", group.name));
                }
                JoinOutcome::UnknownCode => {
                    output::warning(format!("No group uses code `{}`.", code.trim()));
                }
                JoinOutcome::Empty => {
                    return Err(CommandError::InvalidArguments(
                        "usage: group join <code>".into(),
                    ));
                }
            }
            Ok(())
        }
        "list" => {
            if context.groups.list().is_empty() {
                output::info("No groups yet. Use `group create <name>`.");
                return Ok(());
            }
            output::section("Groups");
            for group in context.groups.list() {
                output::row(format!(
                    "{}  {:<24} code {}",
                    short_id(group.id),
                    group.name,
                    group.code
                ));
            }
            Ok(())
        }
        _ => {
            let needle = rest
                .first()
                .ok_or_else(|| CommandError::InvalidArguments("usage: group rm <id>".into()))?;
            let id = context.groups.find_id(needle).ok_or_else(|| {
                CommandError::InvalidArguments(format!("no single group matches `{needle}`"))
            })?;
            let removed = context.groups.remove(id)?;
            output::success(format!("Removed group {}.", removed.display_label()));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::cli::core::testing::{run, shell_on};

    #[test]
    fn create_join_and_remove() {
        let (_dir, mut shell) = shell_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        run(&mut shell, &["group create Weekend trip"]);
        let group = shell.groups.list()[0].clone();
        assert_eq!(group.name, "Weekend trip");

        let join = format!("group join {}", group.code.to_lowercase());
        run(&mut shell, &[join.as_str(), "group join ZZZZZZ"]);
        assert!(shell.process_line("group join").is_err());

        let remove = format!("group rm {}", &group.id.to_string()[..8]);
        run(&mut shell, &[remove.as_str()]);
        assert!(shell.groups.list().is_empty());
    }
}
