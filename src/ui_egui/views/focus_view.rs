//! Focus mode: a pomodoro countdown or stopwatch with a progress ring.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;
use egui::{Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Vec2};

use crate::models::focus::FocusMode;
use crate::models::settings::Settings;
use crate::services::focus::{FocusOutcome, FocusSessionService, FocusTimer};
use crate::ui_egui::theme::CalendarTheme;

const RING_RADIUS: f32 = 110.0;
const RING_WIDTH: f32 = 8.0;
const RING_SEGMENTS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusAction {
    Quit,
    Saved { minutes: u32 },
    TooShort,
    SaveFailed(String),
}

pub struct FocusView {
    timer: FocusTimer,
    minutes: u32,
    stopwatch: bool,
    service: FocusSessionService,
    pending_save: Option<Receiver<Result<u32, String>>>,
}

impl FocusView {
    pub fn new(settings: &Settings, service: FocusSessionService) -> Self {
        let minutes = settings.focus.default_minutes.max(1);
        Self {
            timer: FocusTimer::new(FocusMode::pomodoro_minutes(minutes)),
            minutes,
            stopwatch: false,
            service,
            pending_save: None,
        }
    }

    fn mode(&self) -> FocusMode {
        if self.stopwatch {
            FocusMode::Stopwatch
        } else {
            FocusMode::pomodoro_minutes(self.minutes)
        }
    }

    fn reset_timer(&mut self) {
        self.timer = FocusTimer::new(self.mode());
    }

    /// Pause when the view is left; the session survives until finished.
    pub fn on_hide(&mut self) {
        self.timer.pause(Instant::now());
    }

    fn finish(&mut self, now: Instant) -> Option<FocusAction> {
        match self.timer.finish(now, Local::now().naive_local()) {
            FocusOutcome::TooShort => Some(FocusAction::TooShort),
            FocusOutcome::Completed(request) => {
                let service = self.service.clone();
                let (tx, rx) = mpsc::channel();
                thread::spawn(move || {
                    let result = service.save(&request).map(|()| request.duration).map_err(|err| {
                        log::error!("Failed to save focus session: {}", err);
                        err.to_string()
                    });
                    let _ = tx.send(result);
                });
                self.pending_save = Some(rx);
                None
            }
        }
    }

    fn poll_save(&mut self, ctx: &egui::Context) -> Option<FocusAction> {
        let rx = self.pending_save.as_ref()?;
        let action = match rx.try_recv() {
            Ok(Ok(minutes)) => FocusAction::Saved { minutes },
            Ok(Err(message)) => FocusAction::SaveFailed(message),
            Err(TryRecvError::Empty) => {
                ctx.request_repaint_after(Duration::from_millis(200));
                return None;
            }
            Err(TryRecvError::Disconnected) => {
                FocusAction::SaveFailed("Save worker disconnected unexpectedly".to_string())
            }
        };
        self.pending_save = None;
        self.reset_timer();
        Some(action)
    }

    pub fn show(&mut self, ui: &mut egui::Ui, theme: &CalendarTheme) -> Option<FocusAction> {
        let now = Instant::now();
        let mut action = self.poll_save(ui.ctx());

        if self.timer.is_running() && self.timer.is_complete(now) {
            log::info!("Pomodoro finished");
            action = self.finish(now).or(action);
        }
        if self.timer.is_running() {
            ui.ctx().request_repaint_after(Duration::from_millis(250));
        }

        ui.horizontal(|ui| {
            if ui.button("✕ Quit").clicked() {
                action = Some(FocusAction::Quit);
            }
            ui.heading("Focus");
        });
        ui.separator();

        let locked = self.timer.has_started() || self.pending_save.is_some();
        ui.add_enabled_ui(!locked, |ui| {
            ui.horizontal(|ui| {
                let mut changed = ui.selectable_value(&mut self.stopwatch, false, "Pomodoro").changed();
                changed |= ui.selectable_value(&mut self.stopwatch, true, "Stopwatch").changed();
                if !self.stopwatch {
                    changed |= ui
                        .add(egui::DragValue::new(&mut self.minutes).range(1..=180).suffix(" min"))
                        .changed();
                }
                if changed {
                    self.reset_timer();
                }
            });
        });

        ui.add_space(16.0);
        self.paint_ring(ui, theme, now);
        ui.add_space(16.0);

        ui.horizontal(|ui| {
            let label = if self.timer.is_running() {
                "⏸ Pause"
            } else if self.timer.has_started() {
                "▶ Resume"
            } else {
                "▶ Start"
            };
            let saving = self.pending_save.is_some();
            if ui.add_enabled(!saving, egui::Button::new(label)).clicked() {
                self.timer.toggle(now, Local::now().naive_local());
            }
            if self.timer.has_started()
                && ui.add_enabled(!saving, egui::Button::new("✓ Finish")).clicked()
            {
                action = self.finish(now).or(action.take());
            }
            if saving {
                ui.spinner();
            }
        });

        action
    }

    fn paint_ring(&self, ui: &mut egui::Ui, theme: &CalendarTheme, now: Instant) {
        let size = Vec2::splat(RING_RADIUS * 2.0 + RING_WIDTH * 2.0);
        let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), size.y), Sense::hover());
        let center = rect.center();
        let painter = ui.painter();

        painter.circle_stroke(center, RING_RADIUS, Stroke::new(RING_WIDTH, theme.grid_line));

        let progress = self.timer.progress(now);
        let segments = (RING_SEGMENTS as f32 * progress).round() as usize;
        if segments > 0 {
            let points: Vec<Pos2> = (0..=segments)
                .map(|i| {
                    let angle = -std::f32::consts::FRAC_PI_2
                        + std::f32::consts::TAU * i as f32 / RING_SEGMENTS as f32;
                    center + RING_RADIUS * Vec2::angled(angle)
                })
                .collect();
            painter.add(Shape::line(points, Stroke::new(RING_WIDTH, theme.primary)));
        }

        painter.text(
            center,
            Align2::CENTER_CENTER,
            self.timer.display(now),
            FontId::monospace(44.0),
            theme.text_primary,
        );
        let caption = match self.timer.mode() {
            FocusMode::Pomodoro { .. } => "remaining",
            FocusMode::Stopwatch => "elapsed",
        };
        painter.text(
            center + Vec2::new(0.0, 36.0),
            Align2::CENTER_CENTER,
            caption,
            FontId::proportional(12.0),
            if self.timer.is_running() {
                theme.primary
            } else {
                Color32::GRAY
            },
        );
    }
}
