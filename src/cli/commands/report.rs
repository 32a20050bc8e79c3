use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::report::{compute, Direction, RangeMode, ReportOutcome, ReportResult, ReportTab};

use super::{parse_date, parse_value, subcommand, CommandDefinition};

const USAGE: &str = "report show | report tab <expense|income|balance> | report range <month|last6|year|custom> | report custom <start|-> [end|-] | report prev | report next";

const BAR_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "report",
        "Show per-category totals for the selected window",
        USAGE,
        cmd_report,
    )]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return show(context);
    }
    let (sub, rest) = subcommand(
        args,
        &["show", "tab", "range", "custom", "prev", "next"],
        USAGE,
    )?;
    match sub {
        "show" => show(context),
        "tab" => {
            let raw = rest.first().ok_or_else(|| {
                CommandError::InvalidArguments("usage: report tab <expense|income|balance>".into())
            })?;
            context.query.set_tab(parse_value::<ReportTab>(raw)?);
            show(context)
        }
        "range" => set_range(context, rest),
        "custom" => set_custom(context, rest),
        direction => navigate(context, parse_value::<Direction>(direction)?),
    }
}

fn show(context: &mut ShellContext) -> CommandResult {
    let outcome = compute(
        context.transactions.list(),
        &context.query,
        context.clock.today(),
    );
    match &outcome {
        ReportOutcome::Ready(result) => {
            output::section(format!("{} report: {}", result.tab, result.window));
            for line in render(result) {
                output::row(line);
            }
        }
        ReportOutcome::Unresolved(reason) => {
            output::warning(format!(
                "No report yet: {reason}. Use `report custom <start> <end>`."
            ));
        }
    }
    Ok(())
}

fn set_range(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let label = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: report range <month|last6|year|custom>".into())
    })?;
    context.query.set_range(parse_value::<RangeMode>(label)?);
    show(context)
}

fn set_custom(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (start, end) = match args {
        [start] => (Some(*start), None),
        [start, end] => (Some(*start), Some(*end)),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: report custom <start|-> [end|-]".into(),
            ))
        }
    };
    context.query.set_range(RangeMode::Custom);
    if let Some(raw) = start.filter(|raw| *raw != "-") {
        context.query.set_custom_start(parse_date(raw)?);
    }
    if let Some(raw) = end.filter(|raw| *raw != "-") {
        context.query.set_custom_end(parse_date(raw)?);
    }
    show(context)
}

fn navigate(context: &mut ShellContext, direction: Direction) -> CommandResult {
    let today = context.clock.today();
    if !context.query.navigate(direction, today) {
        output::info(format!(
            "The {} range does not step by month or year; showing it unchanged.",
            context.query.range
        ));
    }
    show(context)
}

/// Table lines for a computed report: one line per category, then the total.
pub(crate) fn render(result: &ReportResult) -> Vec<String> {
    if result.is_empty() {
        return vec!["No records in this range.".to_string()];
    }
    let basis = result.magnitude_sum();
    let mut lines: Vec<String> = result
        .by_category
        .iter()
        .map(|entry| {
            let amount = match result.tab {
                ReportTab::Balance => entry.signed,
                ReportTab::Expense | ReportTab::Income => entry.magnitude,
            };
            let share = entry.share_of(basis);
            let bar_len = share
                .map(|percent| ((percent / 100.0) * BAR_WIDTH as f64).round() as usize)
                .unwrap_or(0)
                .min(BAR_WIDTH);
            format!(
                "{:<16} {:>14} {:>7} {}",
                entry.category,
                output::format_amount(amount),
                share
                    .map(|percent| format!("{percent:.1}%"))
                    .unwrap_or_else(|| "-".to_string()),
                "#".repeat(bar_len)
            )
        })
        .collect();
    lines.push(format!(
        "{:<16} {:>14}",
        "Total",
        output::format_amount(result.total)
    ));
    lines.push(format!("{} record(s)", result.filtered.len()));
    lines
}
