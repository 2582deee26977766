// Test fixtures - reusable test data
// Provides consistent events and collaborators across the integration tests

#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use flowstate_calendar::models::event::CalendarEvent;
use flowstate_calendar::services::api::ApiError;
use flowstate_calendar::services::interaction::Viewport;
use flowstate_calendar::services::time_records::TimeRecordBackend;

/// Sample days
pub mod dates {
    use super::*;

    pub fn review_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 5).unwrap()
    }
}

/// Sample time blocks
pub mod events {
    use super::*;

    /// 09:00 to 10:00
    pub fn standup_block() -> CalendarEvent {
        CalendarEvent::new("a", "Deep work", "Work", 540, 60)
    }

    /// 09:30 to 10:00, overlapping the standup block
    pub fn overlapping_block() -> CalendarEvent {
        CalendarEvent::new("b", "Reading", "Study", 570, 30)
    }

    /// 14:00 to 14:30, clear of the morning
    pub fn afternoon_block() -> CalendarEvent {
        CalendarEvent::new("c", "Run", "Health", 840, 30)
    }

    pub fn morning() -> Vec<CalendarEvent> {
        vec![standup_block(), overlapping_block()]
    }
}

/// A scroll container that never scrolls and has no edges near the test
/// pointer positions.
pub fn still_viewport() -> Viewport {
    Viewport {
        top: 0.0,
        bottom: 800.0,
        scroll_offset: 0.0,
        max_scroll_offset: 2000.0,
    }
}

/// Backend double that serves a fixed day and records every write.
#[derive(Default)]
pub struct RecordingBackend {
    pub day: Vec<CalendarEvent>,
    pub updates: Mutex<Vec<CalendarEvent>>,
}

impl RecordingBackend {
    pub fn serving(day: Vec<CalendarEvent>) -> Self {
        Self {
            day,
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn updates(&self) -> Vec<CalendarEvent> {
        self.updates.lock().unwrap().clone()
    }
}

impl TimeRecordBackend for RecordingBackend {
    fn fetch_for_date(&self, _date: NaiveDate) -> Result<Vec<CalendarEvent>, ApiError> {
        Ok(self.day.clone())
    }

    fn update_record(&self, event: &CalendarEvent) -> Result<(), ApiError> {
        self.updates.lock().unwrap().push(event.clone());
        Ok(())
    }
}
