mod service;

pub use service::SettingsService;
