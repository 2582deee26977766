//! Column layout for overlapping time blocks.
//!
//! Events whose intervals overlap, directly or through a chain of other
//! events, form a cluster. Inside a cluster events are packed greedily into
//! columns so that no two events sharing a column overlap. Every event in a
//! cluster gets the same width: one column's share of the day column.

use std::collections::HashMap;

use crate::models::event::CalendarEvent;

/// Horizontal placement of one event inside the day column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLayout {
    /// Zero-based column inside the event's cluster
    pub column: usize,
    /// Number of columns the cluster opened
    pub columns: usize,
}

impl EventLayout {
    /// Full width, no offset. Used when an event has no computed layout.
    pub const FULL: EventLayout = EventLayout {
        column: 0,
        columns: 1,
    };

    pub fn width_percent(&self) -> f64 {
        100.0 / self.columns as f64
    }

    pub fn left_percent(&self) -> f64 {
        (self.column as f64 * 100.0) / self.columns as f64
    }

    /// Width as a style value, e.g. `"50%"`.
    pub fn width_label(&self) -> String {
        format!("{}%", self.width_percent())
    }

    /// Left offset as a style value, e.g. `"0%"`.
    pub fn left_label(&self) -> String {
        format!("{}%", self.left_percent())
    }

    /// Fraction of the available width, for painting.
    pub fn width_fraction(&self) -> f32 {
        1.0 / self.columns as f32
    }

    pub fn left_fraction(&self) -> f32 {
        self.column as f32 / self.columns as f32
    }
}

/// Split events into clusters of transitively overlapping intervals.
///
/// Clusters come back in start order; members keep start order.
pub fn clusters(events: &[CalendarEvent]) -> Vec<Vec<&CalendarEvent>> {
    let mut sorted: Vec<&CalendarEvent> = events.iter().collect();
    sorted.sort_by_key(|event| event.start_time);

    let mut result: Vec<Vec<&CalendarEvent>> = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return result;
    };

    let mut current = vec![first];
    let mut cluster_end = first.end_time();

    for event in iter {
        if event.start_time < cluster_end {
            cluster_end = cluster_end.max(event.end_time());
            current.push(event);
        } else {
            result.push(std::mem::take(&mut current));
            cluster_end = event.end_time();
            current.push(event);
        }
    }
    result.push(current);

    result
}

/// Assign columns inside one cluster. Returns `(event, column)` pairs and the
/// number of columns opened.
fn pack_cluster<'a>(cluster: &mut [&'a CalendarEvent]) -> (Vec<(&'a CalendarEvent, usize)>, usize) {
    cluster.sort_by_key(|event| event.cluster_order());

    // End minute of the last event placed in each column
    let mut column_ends: Vec<i32> = Vec::new();
    let mut placed = Vec::with_capacity(cluster.len());

    for event in cluster.iter() {
        let column = match column_ends
            .iter()
            .position(|&end| end <= event.start_time)
        {
            Some(index) => {
                column_ends[index] = event.end_time();
                index
            }
            None => {
                column_ends.push(event.end_time());
                column_ends.len() - 1
            }
        };
        placed.push((*event, column));
    }

    (placed, column_ends.len())
}

/// Resolve the horizontal layout of every event, keyed by event id.
pub fn resolve_layouts(events: &[CalendarEvent]) -> HashMap<String, EventLayout> {
    let mut layouts = HashMap::with_capacity(events.len());

    for mut cluster in clusters(events) {
        let (placed, columns) = pack_cluster(&mut cluster);
        for (event, column) in placed {
            layouts.insert(event.id.clone(), EventLayout { column, columns });
        }
    }

    layouts
}

/// Look up a layout, falling back to full width.
pub fn layout_for(layouts: &HashMap<String, EventLayout>, id: &str) -> EventLayout {
    layouts.get(id).copied().unwrap_or(EventLayout::FULL)
}
