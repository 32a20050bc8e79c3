use std::io::{self, BufRead, Lines, StdinLock};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output;

const SCRIPT_ENV: &str = "POCKET_LEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let mut context = ShellContext::new(mode)?;

    let mut source: Box<dyn LineSource> = match context.mode {
        CliMode::Interactive => {
            output::info("Pocket Ledger shell. Type `help` for commands.");
            Box::new(Prompt::new(context.command_names())?)
        }
        CliMode::Script => Box::new(Script {
            lines: io::stdin().lock().lines(),
        }),
    };
    drive(&mut context, source.as_mut())
}

enum Input {
    Line(String),
    Skip,
    End,
}

/// Where the shell reads its next line from.
trait LineSource {
    fn next_input(&mut self, prompt: &str) -> Result<Input, CliError>;
}

struct Prompt {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl Prompt {
    fn new(commands: Vec<&'static str>) -> Result<Self, CliError> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(CommandHelper::new(commands)));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineSource for Prompt {
    fn next_input(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let entry = line.trim();
                if !entry.is_empty() {
                    self.editor.add_history_entry(entry).ok();
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => {
                output::info("Type `exit` or press Ctrl-D to leave.");
                Ok(Input::Skip)
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                Ok(Input::End)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Lines piped on stdin, no prompt.
struct Script {
    lines: Lines<StdinLock<'static>>,
}

impl LineSource for Script {
    fn next_input(&mut self, _prompt: &str) -> Result<Input, CliError> {
        match self.lines.next() {
            Some(line) => Ok(Input::Line(line?)),
            None => Ok(Input::End),
        }
    }
}

fn drive(context: &mut ShellContext, source: &mut dyn LineSource) -> Result<(), CliError> {
    while context.running {
        let line = match source.next_input(&context.prompt())? {
            Input::Line(line) => line,
            Input::Skip => continue,
            Input::End => break,
        };
        match context.process_line(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

/// A command word and its arguments, split shell-style.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct CommandLine {
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("could not read that line: {0}")]
pub(crate) struct ParseError(#[from] shell_words::ParseError);

/// `None` for blank lines and `#` comments.
pub(crate) fn parse_command_line(input: &str) -> Result<Option<CommandLine>, ParseError> {
    let input = input.trim();
    if input.is_empty() || input.starts_with('#') {
        return Ok(None);
    }
    let mut words = shell_words::split(input)?.into_iter();
    Ok(words.next().map(|name| CommandLine {
        name,
        args: words.collect(),
    }))
}

/// Completes the command word from the registry.
struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    fn candidates(&self, needle: &str) -> Vec<Pair> {
        let needle = needle.to_ascii_lowercase();
        self.commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        if typed.trim_start().contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = typed.len() - typed.trim_start().len();
        Ok((start, self.candidates(&typed[start..])))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

impl Helper for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_respects_quotes() {
        let parsed = parse_command_line("account add \"Main bank\" 100")
            .unwrap()
            .unwrap();
        assert_eq!(parsed.name, "account");
        assert_eq!(parsed.args, ["add", "Main bank", "100"]);
        assert!(parse_command_line("tx add \"unterminated").is_err());
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        assert_eq!(parse_command_line("   ").unwrap(), None);
        assert_eq!(parse_command_line("  # tx add expense 5").unwrap(), None);
        assert_eq!(parse_command_line("# unbalanced \"quote").unwrap(), None);
    }

    #[test]
    fn completes_command_prefixes() {
        let helper = CommandHelper::new(vec!["report", "split", "REPORT"]);
        let names: Vec<String> = helper
            .candidates("Re")
            .into_iter()
            .map(|pair| pair.replacement)
            .collect();
        assert_eq!(names, ["report"]);
    }
}
