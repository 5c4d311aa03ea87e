// Library surface for the binary and the headless tests.
pub mod alert;
pub mod app;
pub mod error;
pub mod form;
pub mod logging;
pub mod prefs;
pub mod progress;
pub mod ticker;
pub mod timer;
pub mod ui;

pub use timer::{Mode, SessionState, SessionTimer, TimerConfig, TimerEvent};
