// Service module exports

pub mod api;
pub mod autoscroll;
pub mod event_store;
pub mod focus;
pub mod interaction;
pub mod layout;
pub mod settings;
pub mod sync;
pub mod time_records;
