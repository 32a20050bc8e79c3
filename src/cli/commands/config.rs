use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

use super::{subcommand, CommandDefinition};

const USAGE: &str = "config show | config set <locale|currency|tab|range> <value>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "Show or change stored preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = subcommand(args, &["show", "set"], USAGE)?;
    if sub == "show" {
        let config = &context.config;
        output::section("Configuration");
        output::row(format!("locale     : {}", config.locale));
        output::row(format!("currency   : {}", config.display_currency));
        output::row(format!("tab        : {}", config.default_tab));
        output::row(format!("range      : {}", config.default_range));
        if let Some(opened) = config.last_opened_at {
            output::row(format!("last opened: {}", opened.format("%Y-%m-%d %H:%M")));
        }
        output::row(format!("file       : {}", context.config_manager.path().display()));
        return Ok(());
    }

    let [key, value @ ..] = rest else {
        return Err(CommandError::InvalidArguments(format!("usage: {USAGE}")));
    };
    if value.is_empty() {
        return Err(CommandError::InvalidArguments(format!("`{key}` needs a value")));
    }
    let value = value.join(" ");
    context.config.set(key, &value)?;
    context.persist_config()?;
    output::success(format!("Set {key} to {value}."));
    Ok(())
}
