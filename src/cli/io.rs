use dialoguer::{theme::ColorfulTheme, Confirm};

use super::commands::CommandError;

/// Prompt the user for confirmation with a yes/no question. `assume_yes` skips the prompt.
pub fn confirm_action(prompt: &str, assume_yes: bool) -> Result<bool, CommandError> {
    if assume_yes {
        return Ok(true);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(CommandError::from)
}
