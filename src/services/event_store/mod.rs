//! In-memory events for the selected day.

use std::collections::HashMap;

use crate::models::event::CalendarEvent;
use crate::services::layout::{self, EventLayout};

/// Ordered collection of the day's events.
///
/// Every mutation bumps `revision`, which lets the view cache the resolved
/// layout until the list actually changes.
#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: Vec<CalendarEvent>,
    revision: u64,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events,
            revision: 0,
        }
    }

    /// Replace the whole list, e.g. after a fetch.
    pub fn replace_all(&mut self, events: Vec<CalendarEvent>) {
        self.events = events;
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.replace_all(Vec::new());
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Set start and duration of one event. Returns false if the id is
    /// unknown.
    pub fn set_timing(&mut self, id: &str, start_time: i32, duration: i32) -> bool {
        let Some(event) = self.events.iter_mut().find(|event| event.id == id) else {
            return false;
        };

        if event.start_time != start_time || event.duration != duration {
            event.start_time = start_time;
            event.duration = duration;
            self.revision += 1;
        }
        true
    }

    /// Apply new sort indices by id.
    pub fn set_sort_indices(&mut self, updates: &HashMap<String, i32>) {
        let mut changed = false;
        for event in &mut self.events {
            if let Some(&index) = updates.get(&event.id) {
                if event.sort_index != Some(index) {
                    event.sort_index = Some(index);
                    changed = true;
                }
            }
        }
        if changed {
            self.revision += 1;
        }
    }

    /// Events whose interval intersects the given event's, including the
    /// event itself, in store order.
    pub fn overlapping(&self, id: &str) -> Vec<&CalendarEvent> {
        let Some(target) = self.get(id) else {
            return Vec::new();
        };
        self.events
            .iter()
            .filter(|event| event.overlaps(target))
            .collect()
    }

    pub fn layouts(&self) -> HashMap<String, EventLayout> {
        layout::resolve_layouts(&self.events)
    }
}
