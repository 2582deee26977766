//! Day timeline view.
//!
//! Paints the week strip and the 24 hour timeline, and feeds pointer input
//! into the [`InteractionEngine`]. Everything is measured in screen space:
//! pointer positions come straight from egui and the scroll offset is read
//! back from the scroll area's clip rect each frame.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use chrono::{Datelike, Duration as ChronoDuration, Local, NaiveDate};
use egui::{Align, Align2, Color32, CursorIcon, FontId, Id, Layout, Pos2, Rect, Sense, Stroke, Vec2};

use crate::models::event::{CalendarEvent, MINUTES_PER_DAY};
use crate::models::settings::Settings;
use crate::services::event_store::EventStore;
use crate::services::interaction::{minute_at_offset, DragMode, InteractionEngine, Viewport};
use crate::services::layout::{layout_for, EventLayout};
use crate::services::sync::{FetchResult, PersistenceSync};
use crate::ui_egui::handles::{draw_handles, HandleRects};
use crate::ui_egui::theme::{CalendarTheme, EventPalette};
use crate::utils::time::{format_minutes, hour_label, minute_of_day, week_of, weekday_initial};

/// Width of the hour label column
const LABEL_GUTTER: f32 = 64.0;
const RIGHT_MARGIN: f32 = 16.0;
/// Empty space below midnight so the last blocks can be dragged comfortably
const BOTTOM_PADDING: f32 = 128.0;
const CARD_GAP: f32 = 2.0;
const CARD_ROUNDING: f32 = 10.0;
const ACCENT_WIDTH: f32 = 4.0;

/// Requests the view hands up to the app.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarAction {
    EditEvent(CalendarEvent),
    CreateAt { date: NaiveDate, start_time: i32 },
    StartFocus,
    FetchFailed(String),
}

/// Screen placement of one card this frame.
struct CardGeometry {
    id: String,
    rect: Rect,
    handles: HandleRects,
}

pub struct CalendarView {
    store: EventStore,
    engine: InteractionEngine,
    sync: PersistenceSync,
    selected_date: NaiveDate,
    pending_fetch: Option<Receiver<FetchResult>>,
    /// Resolved layout and the store revision it was computed for
    layout_cache: Option<(u64, HashMap<String, EventLayout>)>,
    scroll_request: Option<f32>,
    initial_scroll_pending: bool,
    lead_minutes: i32,
}

impl CalendarView {
    pub fn new(settings: &Settings, sync: PersistenceSync, today: NaiveDate) -> Self {
        let mut view = Self {
            store: EventStore::new(),
            engine: InteractionEngine::from_settings(settings),
            sync,
            selected_date: today,
            pending_fetch: None,
            layout_cache: None,
            scroll_request: None,
            initial_scroll_pending: true,
            lead_minutes: settings.calendar.initial_scroll_lead_minutes,
        };
        view.select_date(today);
        view
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn is_loading(&self) -> bool {
        self.pending_fetch.is_some()
    }

    /// Switch days and fetch the new day's events. Any gesture in progress
    /// is dropped.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.engine.cancel();
        self.selected_date = date;
        log::info!("Loading time records for {}", date);
        self.pending_fetch = Some(self.sync.fetch(date));
    }

    pub fn refresh(&mut self) {
        self.select_date(self.selected_date);
    }

    /// Called when the view is hidden.
    pub fn cancel_interaction(&mut self) {
        self.engine.cancel();
    }

    fn poll_fetch(&mut self, ctx: &egui::Context) -> Option<CalendarAction> {
        let rx = self.pending_fetch.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.pending_fetch = None;
                match result.events {
                    Ok(events) => {
                        log::info!("Loaded {} events for {}", events.len(), result.date);
                        self.engine.cancel();
                        self.store.replace_all(events);
                        None
                    }
                    Err(message) => Some(CalendarAction::FetchFailed(message)),
                }
            }
            Err(TryRecvError::Empty) => {
                ctx.request_repaint_after(Duration::from_millis(200));
                None
            }
            Err(TryRecvError::Disconnected) => {
                self.pending_fetch = None;
                Some(CalendarAction::FetchFailed(
                    "Fetch worker disconnected unexpectedly".to_string(),
                ))
            }
        }
    }

    fn refresh_layouts(&mut self) {
        let revision = self.store.revision();
        let fresh = matches!(&self.layout_cache, Some((cached, _)) if *cached == revision);
        if !fresh {
            self.layout_cache = Some((revision, self.store.layouts()));
        }
    }

    /// Card rects in paint order; the dragged card comes last so it draws
    /// and hit-tests on top.
    fn card_geometries(&mut self, day_top: f32, events_left: f32, events_width: f32) -> Vec<CardGeometry> {
        self.refresh_layouts();
        let ppm = self.engine.config().pixels_per_minute;
        let layouts = self.layout_cache.as_ref().map(|(_, layouts)| layouts);
        let dragging = self.engine.dragging_id();

        let mut cards: Vec<CardGeometry> = self
            .store
            .iter()
            .map(|event| {
                let layout = layouts
                    .map(|layouts| layout_for(layouts, &event.id))
                    .unwrap_or(EventLayout::FULL);
                let left = events_left
                    + layout.left_fraction() * events_width
                    + self.engine.drag_offset_x(&event.id);
                let rect = Rect::from_min_size(
                    Pos2::new(left, day_top + event.start_time as f32 * ppm),
                    Vec2::new(
                        (layout.width_fraction() * events_width - CARD_GAP).max(1.0),
                        event.duration as f32 * ppm,
                    ),
                );
                CardGeometry {
                    id: event.id.clone(),
                    rect,
                    handles: HandleRects::for_card(rect),
                }
            })
            .collect();

        if let Some(id) = dragging {
            if let Some(index) = cards.iter().position(|card| card.id == id) {
                let card = cards.remove(index);
                cards.push(card);
            }
        }
        cards
    }

    fn initial_scroll_offset(&self) -> f32 {
        let now = minute_of_day(Local::now().time());
        (now - self.lead_minutes).max(0) as f32 * self.engine.config().pixels_per_minute
    }

    pub fn show(&mut self, ui: &mut egui::Ui, theme: &CalendarTheme) -> Option<CalendarAction> {
        let mut action = self.poll_fetch(ui.ctx());

        if let Some(header_action) = self.show_header(ui, theme) {
            action = Some(header_action);
        }
        ui.separator();

        if self.initial_scroll_pending {
            self.initial_scroll_pending = false;
            self.scroll_request = Some(self.initial_scroll_offset());
        }

        let mut scroll = egui::ScrollArea::vertical()
            .id_source("flowstate_timeline")
            .auto_shrink([false, false]);
        if let Some(offset) = self.scroll_request.take() {
            scroll = scroll.vertical_scroll_offset(offset);
        }

        let output = scroll.show(ui, |ui| self.show_timeline(ui, theme));
        output.inner.or(action)
    }

    fn show_header(&mut self, ui: &mut egui::Ui, theme: &CalendarTheme) -> Option<CalendarAction> {
        let mut action = None;
        let mut new_date = None;
        let mut reload = false;
        let today = Local::now().date_naive();

        ui.horizontal(|ui| {
            if ui.button("‹").on_hover_text("Previous week").clicked() {
                new_date = Some(self.selected_date - ChronoDuration::days(7));
            }
            ui.heading(self.selected_date.format("%B %Y").to_string());
            if ui.button("›").on_hover_text("Next week").clicked() {
                new_date = Some(self.selected_date + ChronoDuration::days(7));
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("⟳").on_hover_text("Reload").clicked() {
                    reload = true;
                }
                if ui.button("Today").clicked() {
                    new_date = Some(today);
                }
                if self.is_loading() {
                    ui.spinner();
                }
            });
        });

        let cell_width = ui.available_width() / 7.0;
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            for day in week_of(self.selected_date) {
                let (rect, response) =
                    ui.allocate_exact_size(Vec2::new(cell_width, 52.0), Sense::click());
                let painter = ui.painter();
                painter.text(
                    Pos2::new(rect.center().x, rect.top() + 8.0),
                    Align2::CENTER_CENTER,
                    weekday_initial(day),
                    FontId::proportional(11.0),
                    theme.text_secondary,
                );

                let center = Pos2::new(rect.center().x, rect.top() + 32.0);
                let selected = day == self.selected_date;
                if selected {
                    painter.circle_filled(center, 16.0, theme.primary);
                } else if response.hovered() {
                    painter.circle_filled(center, 16.0, theme.grid_line);
                }

                let text_color = if selected {
                    Color32::WHITE
                } else if day == today {
                    theme.primary
                } else {
                    theme.text_primary
                };
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    day.day().to_string(),
                    FontId::proportional(14.0),
                    text_color,
                );

                if response.clicked() && !selected {
                    new_date = Some(day);
                }
            }
        });

        ui.add_space(4.0);
        let focus_button = egui::Button::new("▶  Start focus mode").min_size(Vec2::new(ui.available_width(), 40.0));
        if ui.add(focus_button).clicked() {
            action = Some(CalendarAction::StartFocus);
        }
        ui.add_space(4.0);

        if let Some(date) = new_date {
            self.select_date(date);
        } else if reload {
            self.refresh();
        }
        action
    }

    fn show_timeline(&mut self, ui: &mut egui::Ui, theme: &CalendarTheme) -> Option<CalendarAction> {
        let now = Instant::now();
        let ctx = ui.ctx().clone();
        let ppm = self.engine.config().pixels_per_minute;
        let day_height = MINUTES_PER_DAY as f32 * ppm;

        let (timeline_rect, timeline_response) = ui.allocate_exact_size(
            Vec2::new(ui.available_width(), day_height + BOTTOM_PADDING),
            Sense::click(),
        );
        let day_top = timeline_rect.top();
        let clip = ui.clip_rect();
        let viewport = Viewport {
            top: clip.top(),
            bottom: clip.bottom(),
            scroll_offset: (clip.top() - day_top).max(0.0),
            max_scroll_offset: (timeline_rect.height() - clip.height()).max(0.0),
        };
        let events_left = timeline_rect.left() + LABEL_GUTTER;
        let events_width = (timeline_rect.width() - LABEL_GUTTER - RIGHT_MARGIN).max(1.0);

        let (pressed, released, press_origin, pointer) = ui.input(|i| {
            (
                i.pointer.any_pressed(),
                i.pointer.any_released(),
                i.pointer.press_origin(),
                i.pointer.interact_pos(),
            )
        });

        // Press: pick the top-most card under the pointer
        if pressed {
            if let Some(origin) = press_origin {
                let on_timeline = clip.contains(origin)
                    && timeline_rect.contains(origin)
                    && ctx.layer_id_at(origin) == Some(ui.layer_id());
                if on_timeline {
                    let cards = self.card_geometries(day_top, events_left, events_width);
                    let hit = cards.iter().rev().find_map(|card| {
                        card.handles
                            .hit_test(card.rect, origin)
                            .map(|mode| (card.id.clone(), mode, card.rect.width()))
                    });
                    match hit {
                        Some((id, mode, width)) => {
                            self.engine.pointer_down(
                                &self.store,
                                &id,
                                mode,
                                origin,
                                width,
                                viewport.scroll_offset,
                                now,
                            );
                        }
                        None => self.engine.background_pressed(),
                    }
                }
            }
        }

        if self.engine.poll(viewport.scroll_offset, now) {
            ctx.request_repaint();
        }
        if let Some(deadline) = self.engine.pending_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        if let Some(pos) = pointer {
            self.engine.pointer_move(&mut self.store, pos, viewport);
        }

        if self.engine.is_auto_scrolling() {
            if let Some(offset) = self.engine.frame(&mut self.store, viewport) {
                self.scroll_request = Some(offset);
            }
            ctx.request_repaint();
        }

        if released && !self.engine.is_idle() {
            if let Some(event) = self.engine.pointer_up(&self.store, now) {
                log::info!(
                    "Moved '{}' to {} ({} min)",
                    event.title,
                    format_minutes(event.start_time),
                    event.duration
                );
                self.sync.push(event);
            }
        }

        let cards = self.card_geometries(day_top, events_left, events_width);
        let mut action = None;

        let painter = ui.painter_at(clip);
        painter.rect_filled(timeline_rect, 0.0, theme.calendar_background);
        self.paint_grid(&painter, theme, timeline_rect, events_left);

        if self.selected_date == Local::now().date_naive() {
            self.paint_now_line(&painter, theme, timeline_rect, events_left);
        }

        let dragging_id = self.engine.dragging_id().map(str::to_string);
        let drag_mode = self.engine.drag_mode();

        for card in &cards {
            let Some(event) = self.store.get(&card.id) else {
                continue;
            };
            let response = ui.interact(card.rect, Id::new(("flowstate_event", &card.id)), Sense::click_and_drag());
            let is_dragging = dragging_id.as_deref() == Some(card.id.as_str());

            let hovered_handle = response
                .hover_pos()
                .and_then(|pos| card.handles.hit_test(card.rect, pos))
                .filter(|mode| mode.is_resize());
            if hovered_handle.is_some() || (is_dragging && drag_mode.is_some_and(|m| m.is_resize())) {
                ctx.set_cursor_icon(CursorIcon::ResizeVertical);
            } else if is_dragging {
                ctx.set_cursor_icon(CursorIcon::Grabbing);
            }

            paint_card(&painter, card, event, theme, is_dragging, hovered_handle);

            if response.clicked() && !self.engine.should_suppress_click(now) {
                action = Some(CalendarAction::EditEvent(event.clone()));
            }
        }

        if timeline_response.clicked() && !self.engine.should_suppress_click(now) {
            if let Some(pos) = timeline_response.interact_pointer_pos() {
                let offset = pos.y - day_top;
                if offset < day_height {
                    action = Some(CalendarAction::CreateAt {
                        date: self.selected_date,
                        start_time: minute_at_offset(offset, self.engine.config()),
                    });
                }
            }
        }

        action
    }

    fn paint_grid(&self, painter: &egui::Painter, theme: &CalendarTheme, timeline: Rect, events_left: f32) {
        let ppm = self.engine.config().pixels_per_minute;
        for hour in 0..=24 {
            let y = timeline.top() + (hour * 60) as f32 * ppm;
            painter.text(
                Pos2::new(events_left - 16.0, y),
                Align2::RIGHT_CENTER,
                hour_label(hour),
                FontId::proportional(10.0),
                theme.text_secondary,
            );
            painter.hline(events_left..=timeline.right(), y, Stroke::new(1.0, theme.grid_line));
        }
    }

    fn paint_now_line(&self, painter: &egui::Painter, theme: &CalendarTheme, timeline: Rect, events_left: f32) {
        let now = Local::now().time();
        let y = timeline.top() + minute_of_day(now) as f32 * self.engine.config().pixels_per_minute;

        painter.hline(events_left..=timeline.right(), y, Stroke::new(2.0, theme.primary));
        painter.circle_filled(Pos2::new(events_left, y), 5.0, theme.primary);
        painter.text(
            Pos2::new(events_left + 8.0, y - 4.0),
            Align2::LEFT_BOTTOM,
            now.format("%H:%M").to_string(),
            FontId::proportional(10.0),
            theme.primary,
        );
    }
}

fn paint_card(
    painter: &egui::Painter,
    card: &CardGeometry,
    event: &CalendarEvent,
    theme: &CalendarTheme,
    is_dragging: bool,
    hovered_handle: Option<DragMode>,
) {
    let palette = EventPalette::for_key(event.color, theme.is_dark);
    let rect = if is_dragging {
        card.rect.expand(2.0)
    } else {
        card.rect
    };

    painter.rect_filled(rect, CARD_ROUNDING, theme.calendar_background);
    painter.rect_filled(rect, CARD_ROUNDING, palette.background);
    if is_dragging {
        painter.rect_stroke(rect, CARD_ROUNDING, Stroke::new(1.5, palette.border));
    }
    let accent = Rect::from_min_size(rect.min, Vec2::new(ACCENT_WIDTH, rect.height()));
    painter.rect_filled(accent, 2.0, palette.border);

    let text_painter = painter.with_clip_rect(rect.shrink(1.0));
    let text_left = rect.left() + ACCENT_WIDTH + 8.0;
    let mut y = rect.top() + 14.0;

    text_painter.text(
        Pos2::new(text_left, y),
        Align2::LEFT_TOP,
        format_minutes(event.start_time),
        FontId::proportional(10.0),
        theme.text_secondary,
    );
    y += 13.0;
    text_painter.text(
        Pos2::new(text_left, y),
        Align2::LEFT_TOP,
        &event.title,
        FontId::proportional(13.0),
        palette.text,
    );
    y += 17.0;
    text_painter.text(
        Pos2::new(text_left, y),
        Align2::LEFT_TOP,
        format!("{} • {} min", event.subtitle, event.duration),
        FontId::proportional(10.0),
        palette.sub_text,
    );

    draw_handles(painter, &card.handles, hovered_handle, palette.border);
}
