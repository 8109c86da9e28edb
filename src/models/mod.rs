pub mod config;
pub mod settings;

pub use config::{AppConfig, CONFIG_FILE_ENV};
pub use settings::{ReformSettings, SettingsOverrides};
