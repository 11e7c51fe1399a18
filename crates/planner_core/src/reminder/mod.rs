//! Reminder engine: periodic scan that fires each upcoming activity's
//! notification exactly once per session.

pub mod band;
pub mod engine;
pub mod runner;

pub use band::ReminderBand;
pub use engine::{Clock, NotifiedSet, ReminderEngine, SystemClock};
pub use runner::{ReminderHandle, ReminderRunner};
