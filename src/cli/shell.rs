use tracing::debug;

use crate::config::ConfigManager;
use crate::core::SystemClock;
use crate::storage::JsonStorage;

use super::commands::{App, Command, CommandError};
use super::output;

/// Entry point for the `spending_checker` binary. `args` excludes the program name.
pub fn run_cli<S: AsRef<str>>(args: &[S]) -> Result<(), CommandError> {
    let command = Command::parse(args)?;

    let config_manager = ConfigManager::new()?;
    let config = config_manager.load()?;
    output::set_color_enabled(config.color_enabled);

    let data_file = config_manager.data_file(&config);
    debug!(path = %data_file.display(), "using ledger file");
    let storage = JsonStorage::new(data_file);

    let clock = SystemClock;
    let mut app = App::load(storage, config, &clock)?;
    app.run(command)
}
