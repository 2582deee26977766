// Event module
// Time-block event shown on the day timeline

use crate::models::category::ColorKey;

/// Shortest block the timeline allows, in minutes.
pub const MIN_DURATION_MINUTES: i32 = 15;

/// Minutes in a rendered day.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// A time block for the selected day.
///
/// `start_time` and `duration` are whole minutes; `start_time` counts from
/// midnight. `sort_index` only orders events that share a cluster and is
/// never sent back to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub start_time: i32,
    pub duration: i32,
    pub color: ColorKey,
    pub sort_index: Option<i32>,
}

impl CalendarEvent {
    /// Create an event with the default color for its category.
    ///
    /// # Examples
    /// ```
    /// use flowstate_calendar::models::event::CalendarEvent;
    ///
    /// let event = CalendarEvent::new("a", "Deep work", "Work", 540, 60);
    /// assert_eq!(event.end_time(), 600);
    /// ```
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        start_time: i32,
        duration: i32,
    ) -> Self {
        let subtitle = subtitle.into();
        Self {
            id: id.into(),
            title: title.into(),
            color: ColorKey::from_category(&subtitle),
            subtitle,
            start_time,
            duration,
            sort_index: None,
        }
    }

    /// Create a builder for events with optional fields
    pub fn builder() -> CalendarEventBuilder {
        CalendarEventBuilder::default()
    }

    /// Exclusive end minute.
    pub fn end_time(&self) -> i32 {
        self.start_time + self.duration
    }

    /// Half-open interval intersection: touching blocks do not overlap.
    pub fn overlaps(&self, other: &CalendarEvent) -> bool {
        self.start_time.max(other.start_time) < self.end_time().min(other.end_time())
    }

    /// Ordering key used inside a cluster: explicit sort index, then start.
    pub fn cluster_order(&self) -> (i32, i32) {
        (self.sort_index.unwrap_or(0), self.start_time)
    }
}

/// Builder for creating events with optional fields
#[derive(Debug, Default)]
pub struct CalendarEventBuilder {
    id: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    start_time: Option<i32>,
    duration: Option<i32>,
    color: Option<ColorKey>,
    sort_index: Option<i32>,
}

impl CalendarEventBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn start_time(mut self, minutes: i32) -> Self {
        self.start_time = Some(minutes);
        self
    }

    pub fn duration(mut self, minutes: i32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn color(mut self, color: ColorKey) -> Self {
        self.color = Some(color);
        self
    }

    pub fn sort_index(mut self, index: i32) -> Self {
        self.sort_index = Some(index);
        self
    }

    /// Build the event. Id and start time are required; duration defaults
    /// to the minimum block size.
    pub fn build(self) -> Result<CalendarEvent, String> {
        let id = self.id.ok_or_else(|| "Event id is required".to_string())?;
        let start_time = self
            .start_time
            .ok_or_else(|| "Event start time is required".to_string())?;
        let subtitle = self.subtitle.unwrap_or_else(|| "Default".to_string());
        let color = self
            .color
            .unwrap_or_else(|| ColorKey::from_category(&subtitle));

        Ok(CalendarEvent {
            id,
            title: self.title.unwrap_or_default(),
            subtitle,
            start_time,
            duration: self.duration.unwrap_or(MIN_DURATION_MINUTES),
            color,
            sort_index: self.sort_index,
        })
    }
}
