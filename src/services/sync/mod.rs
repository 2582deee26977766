//! Background traffic between the timeline and the backend.
//!
//! Writes are fire-and-forget: the local store already holds the new
//! timing, so a failed PUT is logged and otherwise ignored. Fetches report
//! back over a channel the UI polls each frame.

use chrono::NaiveDate;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::models::event::CalendarEvent;
use crate::services::time_records::TimeRecordBackend;

pub type SharedBackend = Arc<dyn TimeRecordBackend + Send + Sync>;

/// Outcome of a background day fetch.
#[derive(Debug)]
pub struct FetchResult {
    pub date: NaiveDate,
    pub events: Result<Vec<CalendarEvent>, String>,
}

#[derive(Clone)]
pub struct PersistenceSync {
    backend: SharedBackend,
}

impl PersistenceSync {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Write the event's timing back on a detached thread. The handle is
    /// only useful to tests; callers may drop it.
    pub fn push(&self, event: CalendarEvent) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        thread::spawn(move || match backend.update_record(&event) {
            Ok(()) => log::debug!(
                "Synced '{}' to {}+{} min",
                event.id,
                event.start_time,
                event.duration
            ),
            Err(err) => log::error!("Failed to sync time record '{}': {}", event.id, err),
        })
    }

    /// Fetch one day's events on a background thread.
    pub fn fetch(&self, date: NaiveDate) -> Receiver<FetchResult> {
        let backend = Arc::clone(&self.backend);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let events = backend.fetch_for_date(date).map_err(|err| {
                log::error!("Failed to fetch time records for {}: {}", date, err);
                err.to_string()
            });
            // Receiver gone means the view moved on; nothing to do.
            let _ = tx.send(FetchResult { date, events });
        });
        rx
    }
}
