pub mod calendar_view;
pub mod focus_view;

pub use calendar_view::{CalendarAction, CalendarView};
pub use focus_view::{FocusAction, FocusView};
