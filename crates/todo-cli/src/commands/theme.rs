use todo_core::models::ThemeMode;
use todo_core::services::SettingsService;

use crate::cli::ThemeCommands;
use crate::error::CliError;

pub fn run_theme(
    command: Option<ThemeCommands>,
    settings: &SettingsService,
) -> Result<ThemeMode, CliError> {
    let theme = match command {
        Some(ThemeCommands::Toggle) => settings.toggle_theme()?,
        None => settings.load().theme,
    };

    let palette = theme.palette();
    println!(
        "{} (primary {}, background {}, paper {})",
        theme.as_str(),
        palette.primary,
        palette.background_default,
        palette.background_paper
    );
    Ok(theme)
}
