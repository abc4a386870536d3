mod service;

pub use service::{SettingsService, CONFIG_PATH_ENV};
