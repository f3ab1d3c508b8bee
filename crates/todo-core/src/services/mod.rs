//! Services layer for application business logic

mod settings;

pub use settings::{default_settings_path, SettingsService};
