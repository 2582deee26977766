// Settings module
// User-tunable configuration persisted as TOML

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub calendar: CalendarSettings,
    pub auto_scroll: AutoScrollSettings,
    pub focus: FocusSettings,
    pub appearance: AppearanceSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Backend root, without a trailing slash
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
        }
    }
}

/// Timeline geometry and gesture timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub pixels_per_minute: f32,
    pub snap_minutes: i32,
    pub min_duration_minutes: i32,
    pub long_press_ms: u64,
    pub click_grace_ms: u64,
    /// The view opens scrolled this many minutes before the current time
    pub initial_scroll_lead_minutes: i32,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            pixels_per_minute: 1.8,
            snap_minutes: 15,
            min_duration_minutes: 15,
            long_press_ms: 400,
            click_grace_ms: 100,
            initial_scroll_lead_minutes: 120,
        }
    }
}

impl CalendarSettings {
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn click_grace(&self) -> Duration {
        Duration::from_millis(self.click_grace_ms)
    }
}

/// Edge auto-scroll while dragging. Speeds are pixels per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScrollSettings {
    pub edge_threshold: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for AutoScrollSettings {
    fn default() -> Self {
        Self {
            edge_threshold: 60.0,
            min_speed: 2.0,
            max_speed: 17.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusSettings {
    pub default_minutes: u32,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self { default_minutes: 25 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppearanceSettings {
    pub theme: ThemePreference,
}

impl Settings {
    /// Validate settings values
    pub fn validate(&self) -> Result<(), String> {
        if self.api.base_url.trim().is_empty() {
            return Err("API base URL cannot be empty".to_string());
        }

        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err("API base URL must start with http:// or https://".to_string());
        }

        if !(self.calendar.pixels_per_minute > 0.0) {
            return Err("Pixels per minute must be positive".to_string());
        }

        if self.calendar.snap_minutes <= 0 {
            return Err("Snap interval must be positive".to_string());
        }

        if self.calendar.min_duration_minutes <= 0 {
            return Err("Minimum duration must be positive".to_string());
        }

        if !(self.auto_scroll.edge_threshold > 0.0) {
            return Err("Auto-scroll edge threshold must be positive".to_string());
        }

        if self.auto_scroll.min_speed < 0.0 || self.auto_scroll.max_speed < self.auto_scroll.min_speed
        {
            return Err("Auto-scroll speeds must satisfy 0 <= min <= max".to_string());
        }

        if self.focus.default_minutes == 0 {
            return Err("Default focus length must be at least one minute".to_string());
        }

        Ok(())
    }
}
