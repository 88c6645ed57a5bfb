//! Motion sensor boundary
//!
//! The bus driver lives outside the core. All the core sees is a
//! non-blocking poll that either yields one six-axis reading or says the
//! device did not answer in time.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axis of the sensor used as the joystick axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Firmware orientation code (0, 1 or 2)
    pub fn from_orientation(code: u8) -> Option<Self> {
        match code {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }
}

/// One raw accelerometer + gyroscope reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotionSample {
    pub accel: [i16; 3],
    pub gyro: [i16; 3],
}

impl MotionSample {
    pub fn new(ax: i16, ay: i16, az: i16, gx: i16, gy: i16, gz: i16) -> Self {
        Self {
            accel: [ax, ay, az],
            gyro: [gx, gy, gz],
        }
    }

    #[inline]
    pub fn accel_on(&self, axis: Axis) -> i16 {
        self.accel[axis as usize]
    }

    #[inline]
    pub fn gyro_on(&self, axis: Axis) -> i16 {
        self.gyro[axis as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MotionError {
    #[error("motion sensor did not deliver data within {0} ms")]
    TimedOut(u32),
    #[error("motion sensor is disconnected")]
    Disconnected,
}

/// Per-tick motion input; must never block
pub trait MotionSource {
    fn poll(&mut self) -> Result<MotionSample, MotionError>;
}

/// Replays a prepared sequence of poll results
///
/// Once the script runs out every poll reports a disconnected device.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: VecDeque<Result<MotionSample, MotionError>>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Result<MotionSample, MotionError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn push(&mut self, result: Result<MotionSample, MotionError>) {
        self.script.push_back(result);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl MotionSource for ScriptedSource {
    fn poll(&mut self) -> Result<MotionSample, MotionError> {
        self.script.pop_front().unwrap_or(Err(MotionError::Disconnected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_lookup() {
        let sample = MotionSample::new(1, 2, 3, -4, -5, -6);
        assert_eq!(sample.accel_on(Axis::X), 1);
        assert_eq!(sample.accel_on(Axis::Z), 3);
        assert_eq!(sample.gyro_on(Axis::Y), -5);
    }

    #[test]
    fn test_orientation_codes() {
        assert_eq!(Axis::from_orientation(0), Some(Axis::X));
        assert_eq!(Axis::from_orientation(2), Some(Axis::Z));
        assert_eq!(Axis::from_orientation(3), None);
    }

    #[test]
    fn test_scripted_source_runs_dry_as_disconnected() {
        let sample = MotionSample::new(0, 0, 0, 0, 100, 0);
        let mut source = ScriptedSource::new([Ok(sample), Err(MotionError::TimedOut(5))]);
        assert_eq!(source.poll(), Ok(sample));
        assert_eq!(source.poll(), Err(MotionError::TimedOut(5)));
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.poll(), Err(MotionError::Disconnected));
    }

    #[test]
    fn test_scripted_source_push_refills() {
        let mut source = ScriptedSource::default();
        assert_eq!(source.poll(), Err(MotionError::Disconnected));

        let sample = MotionSample::new(0, 0, 0, 0, 0, 7);
        source.push(Ok(sample));
        source.push(Err(MotionError::TimedOut(3)));
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.poll(), Ok(sample));
        assert_eq!(source.poll(), Err(MotionError::TimedOut(3)));
    }
}
