//! Focus timer with pause accounting, and the focus session endpoint.
//!
//! Running time is measured with [`Instant`]s supplied by the caller; the
//! wall-clock start and end recorded for the backend are passed in
//! separately.

use chrono::NaiveDateTime;
use std::time::{Duration, Instant};

use crate::models::focus::{FocusMode, FocusSessionRequest, FocusStatus};
use crate::services::api::{ApiClient, ApiError};

const FOCUS_SESSIONS_PATH: &str = "/api/focus/sessions";

/// Sessions shorter than this are discarded.
pub const MIN_SESSION: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Less than a minute was focused; nothing is saved
    TooShort,
    Completed(FocusSessionRequest),
}

#[derive(Debug, Clone)]
pub struct FocusTimer {
    mode: FocusMode,
    /// Running time banked by previous pauses
    accumulated: Duration,
    running_since: Option<Instant>,
    started_at: Option<NaiveDateTime>,
    habit_id: Option<String>,
    category_id: Option<String>,
}

impl FocusTimer {
    pub fn new(mode: FocusMode) -> Self {
        Self {
            mode,
            accumulated: Duration::ZERO,
            running_since: None,
            started_at: None,
            habit_id: None,
            category_id: None,
        }
    }

    pub fn with_habit(mut self, habit_id: impl Into<String>) -> Self {
        self.habit_id = Some(habit_id.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn mode(&self) -> FocusMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Started at least once since the last reset.
    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start counting, or resume after a pause. The wall-clock time is only
    /// recorded the first time.
    pub fn start(&mut self, now: Instant, wall_clock: NaiveDateTime) {
        if self.running_since.is_some() {
            return;
        }
        if self.started_at.is_none() {
            self.started_at = Some(wall_clock);
        }
        self.running_since = Some(now);
        log::debug!("Focus timer running ({:?} banked)", self.accumulated);
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
            log::debug!("Focus timer paused at {:?}", self.accumulated);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.running_since.is_none() && self.started_at.is_some() {
            self.running_since = Some(now);
        }
    }

    pub fn toggle(&mut self, now: Instant, wall_clock: NaiveDateTime) {
        if self.is_running() {
            self.pause(now);
        } else {
            self.start(now, wall_clock);
        }
    }

    /// Focused time so far, excluding pauses. A pomodoro never reports more
    /// than its length.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let running = self
            .running_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or_default();
        let elapsed = self.accumulated + running;
        match self.mode {
            FocusMode::Pomodoro { total } => elapsed.min(total),
            FocusMode::Stopwatch => elapsed,
        }
    }

    /// Time left on a pomodoro; `None` for a stopwatch.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self.mode {
            FocusMode::Pomodoro { total } => Some(total.saturating_sub(self.elapsed(now))),
            FocusMode::Stopwatch => None,
        }
    }

    /// `MM:SS` of the remaining time (pomodoro) or elapsed time (stopwatch).
    pub fn display(&self, now: Instant) -> String {
        let shown = self.remaining(now).unwrap_or_else(|| self.elapsed(now));
        let secs = shown.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Ring fill in `0.0..=1.0`. A stopwatch sweeps once per minute.
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = self.elapsed(now);
        match self.mode {
            FocusMode::Pomodoro { total } if total.is_zero() => 1.0,
            FocusMode::Pomodoro { total } => {
                (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
            }
            FocusMode::Stopwatch => (elapsed.as_secs() % 60) as f32 / 60.0,
        }
    }

    /// A pomodoro that has run down. Stopwatches never complete on their own.
    pub fn is_complete(&self, now: Instant) -> bool {
        matches!(self.remaining(now), Some(left) if left.is_zero())
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = None;
        self.started_at = None;
    }

    /// Stop the timer and produce the session to save.
    ///
    /// A session under one minute is discarded and the timer resets.
    pub fn finish(&mut self, now: Instant, wall_clock: NaiveDateTime) -> FocusOutcome {
        self.pause(now);
        let elapsed = self.elapsed(now);

        if elapsed < MIN_SESSION {
            log::info!("Focus session of {:?} is too short to save", elapsed);
            self.reset();
            return FocusOutcome::TooShort;
        }

        let minutes = u32::try_from(elapsed.as_secs() / 60).unwrap_or(u32::MAX);
        let start_time = self.started_at.unwrap_or_else(|| {
            wall_clock - chrono::Duration::seconds(elapsed.as_secs() as i64)
        });

        FocusOutcome::Completed(FocusSessionRequest {
            start_time,
            end_time: wall_clock,
            duration: minutes,
            habit_id: self.habit_id.clone(),
            category_id: self.category_id.clone(),
            status: FocusStatus::Completed,
        })
    }
}

/// Saves completed focus sessions.
#[derive(Clone)]
pub struct FocusSessionService {
    api: ApiClient,
}

impl FocusSessionService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn save(&self, session: &FocusSessionRequest) -> Result<(), ApiError> {
        self.api.post_json(FOCUS_SESSIONS_PATH, session)?;
        log::info!("Saved {} min focus session", session.duration);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::test_server::serve_once;
    use crate::services::api::TokenStore;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn wall(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_pomodoro_counts_down() {
        let t0 = Instant::now();
        let mut timer = FocusTimer::new(FocusMode::pomodoro_minutes(25));
        assert_eq!(timer.display(t0), "25:00");

        timer.start(t0, wall(10, 0, 0));
        assert_eq!(timer.display(t0 + secs(61)), "23:59");
        assert_eq!(timer.remaining(t0 + secs(61)), Some(secs(1439)));
        assert!(!timer.is_complete(t0 + secs(61)));
    }

    #[test]
    fn test_pauses_are_excluded() {
        let t0 = Instant::now();
        let mut timer = FocusTimer::new(FocusMode::Stopwatch);
        timer.start(t0, wall(10, 0, 0));
        timer.pause(t0 + secs(30));
        // Paused for five minutes
        timer.resume(t0 + secs(330));
        assert_eq!(timer.elapsed(t0 + secs(345)), secs(45));
        assert_eq!(timer.display(t0 + secs(345)), "00:45");
    }

    #[test]
    fn test_toggle_alternates() {
        let t0 = Instant::now();
        let mut timer = FocusTimer::new(FocusMode::Stopwatch);
        timer.toggle(t0, wall(9, 0, 0));
        assert!(timer.is_running());
        timer.toggle(t0 + secs(10), wall(9, 0, 10));
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed(t0 + secs(100)), secs(10));
    }

    #[test]
    fn test_resume_before_start_is_ignored() {
        let t0 = Instant::now();
        let mut timer = FocusTimer::new(FocusMode::Stopwatch);
        timer.resume(t0);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_pomodoro_completes_and_caps() {
        let t0 = Instant::now();
        let mut timer = FocusTimer::new(FocusMode::pomodoro_minutes(1));
        timer.start(t0, wall(10, 0, 0));
        assert!(timer.is_complete(t0 + secs(90)));
        assert_eq!(timer.elapsed(t0 + secs(90)), secs(60));
        assert_eq!(timer.display(t0 + secs(90)), "00:00");
        assert_eq!(timer.progress(t0 + secs(90)), 1.0);
    }

    #[test]
    fn test_progress() {
        let t0 = Instant::now();
        let mut timer = FocusTimer::new(FocusMode::pomodoro_minutes(10));
        timer.start(t0, wall(10, 0, 0));
        assert!((timer.progress(t0 + secs(150)) - 0.25).abs() < 1e-6);

        let mut watch = FocusTimer::new(FocusMode::Stopwatch);
        watch.start(t0, wall(10, 0, 0));
        assert!((watch.progress(t0 + secs(75)) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_short_session_is_discarded() {
        let t0 = Instant::now();
        let mut timer = FocusTimer::new(FocusMode::pomodoro_minutes(25));
        timer.start(t0, wall(10, 0, 0));

        assert_eq!(timer.finish(t0 + secs(59), wall(10, 0, 59)), FocusOutcome::TooShort);
        assert!(!timer.is_running());
        assert!(!timer.has_started());
        assert_eq!(timer.display(t0 + secs(59)), "25:00");
    }

    #[test]
    fn test_finish_builds_request() {
        let t0 = Instant::now();
        let mut timer = FocusTimer::new(FocusMode::Stopwatch).with_habit("habit-7");
        timer.start(t0, wall(10, 0, 0));

        let outcome = timer.finish(t0 + secs(150), wall(10, 2, 30));
        assert_eq!(
            outcome,
            FocusOutcome::Completed(FocusSessionRequest {
                start_time: wall(10, 0, 0),
                end_time: wall(10, 2, 30),
                duration: 2,
                habit_id: Some("habit-7".to_string()),
                category_id: None,
                status: FocusStatus::Completed,
            })
        );
    }

    #[test]
    fn test_service_posts_session() {
        let dir = TempDir::new().unwrap();
        let (base, handle) = serve_once(201, "{}");
        let service = FocusSessionService::new(
            ApiClient::new(base, TokenStore::new(dir.path().join("token"))).unwrap(),
        );

        let request = FocusSessionRequest {
            start_time: wall(8, 0, 0),
            end_time: wall(8, 25, 0),
            duration: 25,
            habit_id: None,
            category_id: None,
            status: FocusStatus::Completed,
        };
        service.save(&request).unwrap();

        let captured = handle.join().unwrap();
        assert_eq!(captured.method, "POST");
        assert_eq!(captured.url, "/api/focus/sessions");
        let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(body["duration"], 25);
        assert_eq!(body["status"], "COMPLETED");
    }
}
