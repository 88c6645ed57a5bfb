//! Platform abstraction layer
//!
//! Handles hardware/native differences for:
//! - Time/ticks (millisecond counter that wraps like a microcontroller timer)

pub mod time;

pub use time::{Clock, ManualClock, Millis, SystemClock};
