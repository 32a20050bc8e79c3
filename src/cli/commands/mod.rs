use std::collections::HashMap;

use chrono::NaiveDate;

pub mod account;
pub mod category;
pub mod config;
pub mod group;
pub mod report;
pub mod split;
pub mod system;
pub mod transaction;

use crate::cli::core::{closest, CommandError, CommandResult, ShellContext};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(transaction::definitions());
    commands.extend(category::definitions());
    commands.extend(report::definitions());
    commands.extend(account::definitions());
    commands.extend(group::definitions());
    commands.extend(split::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Positional arguments plus `--flag value` pairs pulled out of a command line.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    flags: HashMap<&'static str, &'a str>,
    switches: Vec<&'static str>,
}

impl<'a> ParsedArgs<'a> {
    /// Splits `args`, accepting only the named flags. `value_flags` consume the
    /// following token; `switch_flags` stand alone.
    pub fn parse(
        args: &[&'a str],
        value_flags: &[&'static str],
        switch_flags: &[&'static str],
    ) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            if !arg.starts_with("--") {
                parsed.positional.push(arg);
                continue;
            }
            if let Some(flag) = value_flags.iter().copied().find(|flag| *flag == arg) {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`{flag}` needs a value"))
                })?;
                parsed.flags.insert(flag, value);
            } else if let Some(flag) = switch_flags.iter().copied().find(|flag| *flag == arg) {
                parsed.switches.push(flag);
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{arg}`"
                )));
            }
        }
        Ok(parsed)
    }

    pub fn flag(&self, name: &str) -> Option<&'a str> {
        self.flags.get(name).copied()
    }

    pub fn switch(&self, name: &str) -> bool {
        self.switches.iter().any(|flag| *flag == name)
    }

    /// Remaining positionals from `from` joined by spaces, for multi-word names.
    pub fn joined(&self, from: usize) -> String {
        self.positional
            .get(from..)
            .map(|rest| rest.join(" "))
            .unwrap_or_default()
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_value<T>(input: &str) -> Result<T, CommandError>
where
    T: std::str::FromStr<Err = String>,
{
    input.parse().map_err(CommandError::InvalidArguments)
}

/// Splits `args` into the subcommand and its arguments, rejecting unknown ones.
pub(crate) fn subcommand<'a, 'b>(
    args: &'b [&'a str],
    known: &[&'static str],
    usage: &str,
) -> Result<(&'static str, &'b [&'a str]), CommandError> {
    let Some((first, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    };
    let wanted = first.to_ascii_lowercase();
    if let Some(found) = known.iter().copied().find(|name| *name == wanted) {
        return Ok((found, rest));
    }
    let hint = closest(known.iter().copied(), &wanted)
        .map(|best| format!(" Did you mean `{best}`?"))
        .unwrap_or_default();
    Err(CommandError::InvalidArguments(format!(
        "unknown subcommand `{first}`.{hint} usage: {usage}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_args_separates_flags() {
        let args = ["add", "12", "--date", "2024-01-02", "--yes", "Food"];
        let parsed = ParsedArgs::parse(&args, &["--date"], &["--yes"]).unwrap();
        assert_eq!(parsed.positional, ["add", "12", "Food"]);
        assert_eq!(parsed.flag("--date"), Some("2024-01-02"));
        assert!(parsed.switch("--yes"));
        assert_eq!(parsed.joined(1), "12 Food");
    }

    #[test]
    fn parsed_args_rejects_unknown_or_dangling_flags() {
        assert!(ParsedArgs::parse(&["--bogus"], &[], &[]).is_err());
        assert!(ParsedArgs::parse(&["--date"], &["--date"], &[]).is_err());
    }

    #[test]
    fn subcommand_suggests_close_names() {
        let err = subcommand(&["lsit"], &["list", "add"], "x").unwrap_err();
        assert!(err.to_string().contains("`list`"));
        let (name, rest) = subcommand(&["ADD", "a"], &["list", "add"], "x").unwrap();
        assert_eq!((name, rest), ("add", &["a"][..]));
    }

    #[test]
    fn registry_keeps_declaration_order() {
        let registry = CommandRegistry::new(all_definitions());
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names.first(), Some(&"tx"));
        assert!(registry.get("report").is_some());
        assert_eq!(registry.iter().count(), names.len());
    }
}
