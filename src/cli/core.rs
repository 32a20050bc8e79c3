//! Shell context, dispatch, and the error types shared by command handlers.

use std::{io, path::PathBuf, sync::Arc};

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    config::{Config, ConfigManager},
    core::clock::{Clock, SystemClock},
    core::services::{
        AccountService, CategoryService, GroupService, ServiceError, SplitService,
        TransactionService,
    },
    core::utils::PathResolver,
    errors::LedgerError,
    report::ReportQuery,
    storage::{JsonFileStore, KeyValueStore},
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::shell::parse_command_line;
use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub type CommandResult = Result<(), CommandError>;

/// Everything a command handler can reach: services, configuration and the
/// report screen's viewing state.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) transactions: TransactionService,
    pub(crate) categories: CategoryService,
    pub(crate) accounts: AccountService,
    pub(crate) groups: GroupService,
    pub(crate) split: SplitService,
    pub(crate) config_manager: ConfigManager,
    pub(crate) config: Config,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) query: ReportQuery,
    pub(crate) last_command: Option<String>,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::open(mode, PathResolver::base_dir(), Box::new(SystemClock))
    }

    /// Opens the data directory at `base` and loads every service from it.
    pub fn open(mode: CliMode, base: PathBuf, clock: Box<dyn Clock>) -> Result<Self, CliError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(Some(base.clone()))?);
        let config_manager = ConfigManager::with_base_dir(base)?;
        let mut config = config_manager.load();
        config.last_opened_at = Some(clock.now());
        if let Err(err) = config_manager.save(&config) {
            warn!(error = %err, "could not record last opened time");
        }
        let query = ReportQuery::new(config.default_tab, config.default_range);

        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            transactions: TransactionService::load(store.clone()),
            categories: CategoryService::load(store.clone()),
            accounts: AccountService::load(store.clone()),
            groups: GroupService::load(store.clone()),
            split: SplitService::load(store),
            config_manager,
            config,
            clock,
            query,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        format!("ledger [{} | {}]> ", self.query.tab, self.query.range)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    /// Runs one input line. Blank lines, comments and unbalanced quotes never fail.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let parsed = match parse_command_line(line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return Ok(LoopControl::Continue),
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        self.last_command = Some(line.trim().to_string());
        let args: Vec<&str> = parsed.args.iter().map(String::as_str).collect();
        let control = self.dispatch(&parsed.name.to_lowercase(), &parsed.name, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = closest(self.registry.names(), input) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        debug!(
            command = self.last_command.as_deref().unwrap_or_default(),
            error = %err,
            "command failed"
        );
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }
}

/// Closest candidate within an edit distance of three.
pub(crate) fn closest<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    input: &str,
) -> Option<&'a str> {
    let input = input.to_lowercase();
    candidates
        .into_iter()
        .map(|name| (levenshtein(name, &input), name))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

pub(crate) fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Ledger(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

/// Failures that stop the shell itself rather than a single command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("input error: {0}")]
    Input(String),
    #[error("{0}")]
    Command(String),
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}
