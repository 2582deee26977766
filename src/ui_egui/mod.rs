mod app;
pub mod handles;
pub mod theme;
pub mod toast;
mod views;

pub use app::FlowstateApp;
