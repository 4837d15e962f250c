pub mod commands;
pub mod io;
pub mod output;
pub mod report;
mod shell;

pub use commands::{usage, App, Command, CommandError};
pub use shell::run_cli;
