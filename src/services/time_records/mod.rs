//! Time-record endpoints and the conversion between wire records and
//! timeline events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::category::{ColorKey, DEFAULT_CATEGORY};
use crate::models::event::{CalendarEvent, MINUTES_PER_DAY, MIN_DURATION_MINUTES};
use crate::services::api::{ApiClient, ApiError};

const TIME_RECORDS_PATH: &str = "/api/time-records";

/// A time record as returned by `GET /api/time-records`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecordResponse {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl TimeRecordResponse {
    /// Convert into a timeline event, or `None` when the record cannot be
    /// placed on a day. The category becomes the subtitle. Short positive
    /// durations are raised to the minimum block size.
    pub fn into_event(self) -> Option<CalendarEvent> {
        let (Some(start_time), Some(duration)) = (self.start_time, self.duration) else {
            log::warn!("Dropping time record '{}': missing start time or duration", self.id);
            return None;
        };

        if !(0..i64::from(MINUTES_PER_DAY)).contains(&start_time) {
            log::warn!(
                "Dropping time record '{}': start time {} is outside the day",
                self.id,
                start_time
            );
            return None;
        }

        if duration <= 0 {
            log::warn!(
                "Dropping time record '{}': non-positive duration {}",
                self.id,
                duration
            );
            return None;
        }

        let duration = if duration < i64::from(MIN_DURATION_MINUTES) {
            log::warn!(
                "Time record '{}' lasts {} min; raising to {} min",
                self.id,
                duration,
                MIN_DURATION_MINUTES
            );
            MIN_DURATION_MINUTES
        } else {
            i32::try_from(duration).unwrap_or(i32::MAX)
        };

        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let color = ColorKey::resolve(self.color.as_deref(), &category);

        Some(CalendarEvent {
            id: self.id,
            title: self.title.unwrap_or_default(),
            subtitle: category,
            start_time: start_time as i32,
            duration,
            color,
            sort_index: None,
        })
    }
}

/// Body of `PUT /api/time-records/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecordUpdate {
    pub title: String,
    pub start_time: i32,
    pub duration: i32,
    pub category: String,
    pub color: String,
}

impl TimeRecordUpdate {
    /// The subtitle travels back as the category; the color as its hex.
    pub fn from_event(event: &CalendarEvent) -> Self {
        Self {
            title: event.title.clone(),
            start_time: event.start_time,
            duration: event.duration,
            category: event.subtitle.clone(),
            color: event.color.hex().to_string(),
        }
    }
}

/// Convert a fetched batch, dropping records that cannot be placed.
pub fn events_from_records(records: Vec<TimeRecordResponse>) -> Vec<CalendarEvent> {
    let total = records.len();
    let events: Vec<CalendarEvent> = records
        .into_iter()
        .filter_map(TimeRecordResponse::into_event)
        .collect();
    if events.len() < total {
        log::warn!("Dropped {} of {} time records", total - events.len(), total);
    }
    events
}

/// Backend seam for the calendar: fetch a day, write one event back.
#[cfg_attr(test, mockall::automock)]
pub trait TimeRecordBackend {
    fn fetch_for_date(&self, date: NaiveDate) -> Result<Vec<CalendarEvent>, ApiError>;
    fn update_record(&self, event: &CalendarEvent) -> Result<(), ApiError>;
}

/// [`TimeRecordBackend`] over the REST API.
#[derive(Clone)]
pub struct TimeRecordService {
    api: ApiClient,
}

impl TimeRecordService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl TimeRecordBackend for TimeRecordService {
    fn fetch_for_date(&self, date: NaiveDate) -> Result<Vec<CalendarEvent>, ApiError> {
        let records: Vec<TimeRecordResponse> = self.api.get_json(
            TIME_RECORDS_PATH,
            &[("date", date.format("%Y-%m-%d").to_string())],
        )?;
        log::debug!("Fetched {} time records for {}", records.len(), date);
        Ok(events_from_records(records))
    }

    fn update_record(&self, event: &CalendarEvent) -> Result<(), ApiError> {
        let path = format!("{}/{}", TIME_RECORDS_PATH, event.id);
        self.api.put_json(&path, &TimeRecordUpdate::from_event(event))
    }
}
