use std::process::ExitCode;

use spending_checker::cli::{self, output, CommandError};

fn main() -> ExitCode {
    spending_checker::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match cli::run_cli(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(message)) => {
            output::error(message);
            eprintln!("{}", cli::usage());
            ExitCode::from(2)
        }
        Err(err) => {
            output::error(format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
