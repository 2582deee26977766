//! Focus session model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a focus timer counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    /// Count down from a fixed length
    Pomodoro { total: Duration },
    /// Count up from zero
    Stopwatch,
}

impl FocusMode {
    pub fn pomodoro_minutes(minutes: u32) -> Self {
        FocusMode::Pomodoro {
            total: Duration::from_secs(u64::from(minutes) * 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FocusStatus {
    Completed,
}

/// Body of `POST /api/focus/sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSessionRequest {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Whole minutes of focused time
    pub duration: u32,
    pub habit_id: Option<String>,
    pub category_id: Option<String>,
    pub status: FocusStatus,
}
