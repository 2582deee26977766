use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::{Local, NaiveDate};

use crate::models::event::CalendarEvent;
use crate::models::settings::Settings;
use crate::services::api::{ApiClient, TokenStore};
use crate::services::focus::FocusSessionService;
use crate::services::settings::SettingsService;
use crate::services::sync::PersistenceSync;
use crate::services::time_records::TimeRecordService;
use crate::ui_egui::theme::CalendarTheme;
use crate::ui_egui::toast::ToastManager;
use crate::ui_egui::views::{CalendarAction, CalendarView, FocusAction, FocusView};
use crate::utils::time::format_minutes;

/// Environment variable that seeds the token store at startup.
const TOKEN_ENV: &str = "FLOWSTATE_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Calendar,
    Focus,
}

pub struct FlowstateApp {
    theme: CalendarTheme,
    screen: Screen,
    calendar: CalendarView,
    focus: FocusView,
    toasts: ToastManager,
    /// Raised from worker threads by the API client's observer
    session_expired: Arc<AtomicBool>,
    /// Event whose detail window is open
    selected_event: Option<(NaiveDate, CalendarEvent)>,
}

impl eframe::App for FlowstateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_session_expiry();

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.app_background)
                    .inner_margin(egui::Margin::same(8.0)),
            )
            .show(ctx, |ui| match self.screen {
                Screen::Calendar => {
                    if let Some(action) = self.calendar.show(ui, &self.theme) {
                        self.handle_calendar_action(action);
                    }
                }
                Screen::Focus => {
                    if let Some(action) = self.focus.show(ui, &self.theme) {
                        self.handle_focus_action(action);
                    }
                }
            });

        self.show_event_details(ctx);
        self.toasts.render(ctx, self.theme.is_dark);
    }
}

impl FlowstateApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self> {
        let settings = SettingsService::new(SettingsService::default_path()).load_or_default();
        let theme = CalendarTheme::for_preference(settings.appearance.theme);
        theme.apply_to_context(&cc.egui_ctx);

        let tokens = TokenStore::new(TokenStore::default_path());
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            tokens
                .save(&token)
                .with_context(|| format!("Failed to store token from {}", TOKEN_ENV))?;
            log::info!("Seeded API token from {}", TOKEN_ENV);
        }

        let session_expired = Arc::new(AtomicBool::new(false));
        let api = {
            let flag = Arc::clone(&session_expired);
            let ctx = cc.egui_ctx.clone();
            ApiClient::new(settings.api.base_url.clone(), tokens)
                .context("Failed to build API client")?
                .with_session_observer(move || {
                    flag.store(true, Ordering::SeqCst);
                    ctx.request_repaint();
                })
        };
        log::info!("Using Flowstate backend at {}", api.base_url());

        let sync = PersistenceSync::new(Arc::new(TimeRecordService::new(api.clone())));
        Ok(Self::with_services(
            &settings,
            theme,
            sync,
            FocusSessionService::new(api),
            session_expired,
        ))
    }

    fn with_services(
        settings: &Settings,
        theme: CalendarTheme,
        sync: PersistenceSync,
        focus_service: FocusSessionService,
        session_expired: Arc<AtomicBool>,
    ) -> Self {
        Self {
            theme,
            screen: Screen::Calendar,
            calendar: CalendarView::new(settings, sync, Local::now().date_naive()),
            focus: FocusView::new(settings, focus_service),
            toasts: ToastManager::new(),
            session_expired,
            selected_event: None,
        }
    }

    fn handle_session_expiry(&mut self) {
        if self.session_expired.swap(false, Ordering::SeqCst) {
            log::warn!("Backend session expired");
            self.toasts
                .error(format!("Session expired. Set {} and restart to sign in again.", TOKEN_ENV));
        }
    }

    fn switch_to(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        match self.screen {
            Screen::Calendar => self.calendar.cancel_interaction(),
            Screen::Focus => self.focus.on_hide(),
        }
        self.screen = screen;
    }

    fn handle_calendar_action(&mut self, action: CalendarAction) {
        match action {
            CalendarAction::EditEvent(event) => {
                self.selected_event = Some((self.calendar.selected_date(), event));
            }
            CalendarAction::CreateAt { date, start_time } => {
                log::info!("Create requested at {} {}", date, format_minutes(start_time));
                self.toasts.info(format!(
                    "New block at {} on {}",
                    format_minutes(start_time),
                    date.format("%b %-d")
                ));
            }
            CalendarAction::StartFocus => {
                self.selected_event = None;
                self.switch_to(Screen::Focus);
            }
            CalendarAction::FetchFailed(message) => {
                log::error!("Failed to load time records: {}", message);
                self.toasts.error("Could not load time records");
            }
        }
    }

    fn handle_focus_action(&mut self, action: FocusAction) {
        match action {
            FocusAction::Quit => self.switch_to(Screen::Calendar),
            FocusAction::Saved { minutes } => {
                self.toasts.success(format!("Saved {} min focus session", minutes));
                self.switch_to(Screen::Calendar);
                self.calendar.refresh();
            }
            FocusAction::TooShort => {
                self.toasts.info("Focus for at least a minute to save a session");
            }
            FocusAction::SaveFailed(_) => {
                self.toasts.error("Could not save focus session");
            }
        }
    }

    fn show_event_details(&mut self, ctx: &egui::Context) {
        let Some((date, event)) = &self.selected_event else {
            return;
        };

        let mut open = true;
        egui::Window::new(event.title.as_str())
            .id(egui::Id::new("event_details"))
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                egui::Grid::new("event_details_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Date");
                    ui.label(date.format("%A, %B %-d").to_string());
                    ui.end_row();

                    ui.label("Time");
                    ui.label(format!(
                        "{} – {}",
                        format_minutes(event.start_time),
                        format_minutes(event.end_time())
                    ));
                    ui.end_row();

                    ui.label("Duration");
                    ui.label(format!("{} min", event.duration));
                    ui.end_row();

                    ui.label("Category");
                    ui.label(event.subtitle.as_str());
                    ui.end_row();
                });
            });

        if !open {
            self.selected_event = None;
        }
    }
}
