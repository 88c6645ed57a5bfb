//! Motion input
//!
//! Raw six-axis readings in, smoothed joystick state and attack edges out.
//! No bus I/O happens here; sources hand over already-read samples.

pub mod detector;
pub mod samples;
pub mod source;

pub use detector::{AttackDetector, DetectorConfig, DisconnectPolicy, JoystickState};
pub use samples::SampleWindow;
pub use source::{Axis, MotionError, MotionSample, MotionSource, ScriptedSource};
