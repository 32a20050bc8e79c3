use std::process::ExitCode;

use pocket_ledger::cli::{output, run_cli};

fn main() -> ExitCode {
    pocket_ledger::init();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&err);
            ExitCode::FAILURE
        }
    }
}
