//! Brief non-blocking messages shown at the top of the window.
//!
//! Used for feedback that needs no answer: a focus session that was too
//! short to save, a failed fetch, an expired session.

use egui::{Color32, Context, Pos2, RichText};
use std::time::{Duration, Instant};

const DEFAULT_DURATION: Duration = Duration::from_secs(3);
const FADE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

impl ToastLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Info => "ℹ",
            ToastLevel::Error => "✗",
        }
    }

    pub fn background_color(&self, is_dark_theme: bool) -> Color32 {
        match (self, is_dark_theme) {
            (ToastLevel::Success, true) => Color32::from_rgb(30, 70, 40),
            (ToastLevel::Info, true) => Color32::from_rgb(30, 50, 80),
            (ToastLevel::Error, true) => Color32::from_rgb(80, 30, 30),
            (ToastLevel::Success, false) => Color32::from_rgb(220, 255, 220),
            (ToastLevel::Info, false) => Color32::from_rgb(220, 235, 255),
            (ToastLevel::Error, false) => Color32::from_rgb(255, 220, 220),
        }
    }

    pub fn text_color(&self, is_dark_theme: bool) -> Color32 {
        match (self, is_dark_theme) {
            (ToastLevel::Success, true) => Color32::from_rgb(100, 220, 120),
            (ToastLevel::Info, true) => Color32::from_rgb(100, 180, 255),
            (ToastLevel::Error, true) => Color32::from_rgb(255, 120, 120),
            (ToastLevel::Success, false) => Color32::from_rgb(30, 120, 50),
            (ToastLevel::Info, false) => Color32::from_rgb(30, 80, 150),
            (ToastLevel::Error, false) => Color32::from_rgb(180, 40, 40),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel, now: Instant) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: now,
            duration: DEFAULT_DURATION,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }

    /// Fades out over the last half second.
    pub fn opacity(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.created_at);
        let fade_start = self.duration.saturating_sub(FADE);

        if elapsed >= self.duration {
            0.0
        } else if elapsed >= fade_start {
            ((self.duration - elapsed).as_secs_f32() / FADE.as_secs_f32()).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.add(Toast::new(message, ToastLevel::Success, Instant::now()));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.add(Toast::new(message, ToastLevel::Info, Instant::now()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add(Toast::new(message, ToastLevel::Error, Instant::now()));
    }

    pub fn cleanup(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.is_expired(now));
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Render active toasts stacked down from the top center.
    pub fn render(&mut self, ctx: &Context, is_dark_theme: bool) {
        let now = Instant::now();
        self.cleanup(now);

        if self.toasts.is_empty() {
            return;
        }

        // Keep animating the fade
        ctx.request_repaint();

        let screen_rect = ctx.screen_rect();
        let toast_width = 300.0;
        let toast_height = 40.0;
        let margin = 48.0;
        let spacing = 6.0;

        for (i, toast) in self.toasts.iter().enumerate() {
            let opacity = toast.opacity(now);
            if opacity <= 0.0 {
                continue;
            }

            let pos = Pos2::new(
                screen_rect.center().x - toast_width / 2.0,
                screen_rect.top() + margin + (i as f32) * (toast_height + spacing),
            );

            egui::Area::new(egui::Id::new(("toast", i)))
                .fixed_pos(pos)
                .order(egui::Order::Foreground)
                .show(ctx, |ui| {
                    let bg_color = toast
                        .level
                        .background_color(is_dark_theme)
                        .gamma_multiply(0.9 * opacity);
                    let text_color = toast.level.text_color(is_dark_theme).gamma_multiply(opacity);

                    egui::Frame::none()
                        .fill(bg_color)
                        .rounding(6.0)
                        .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                        .stroke(egui::Stroke::new(1.0, text_color.gamma_multiply(0.3)))
                        .show(ui, |ui| {
                            ui.set_min_width(toast_width - 24.0);
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(toast.level.icon()).color(text_color).strong());
                                ui.label(RichText::new(&toast.message).color(text_color));
                            });
                        });
                });
        }
    }
}
