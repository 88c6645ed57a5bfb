//! Joystick smoothing and attack detection
//!
//! The player swings a spring-mounted sensor. Accelerometer tilt steers,
//! gyroscope wobble attacks. Both streams go through a median window so a
//! single noisy reading cannot move the player or fire an attack.

use serde::{Deserialize, Serialize};

use super::samples::SampleWindow;
use super::source::{Axis, MotionError, MotionSample};
use crate::consts::SAMPLE_COUNT;

/// What the detector reports while the sensor is not answering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisconnectPolicy {
    /// Report zero tilt and zero wobble (also re-arms the attack edge)
    #[default]
    Neutral,
    /// Keep reporting the last smoothed values
    HoldLast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Smoothed wobble above this fires an attack
    pub attack_threshold: i32,
    /// Tilt magnitudes up to this read as centred
    pub deadzone: i32,
    pub axis: Axis,
    /// Flip tilt sign for sensors mounted the other way round
    pub invert: bool,
    /// Raw accelerometer counts per tilt unit
    pub tilt_scale: i32,
    pub disconnect_policy: DisconnectPolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            attack_threshold: 30_000,
            deadzone: 8,
            axis: Axis::Y,
            invert: true,
            tilt_scale: 166,
            disconnect_policy: DisconnectPolicy::Neutral,
        }
    }
}

/// Smoothed joystick state for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoystickState {
    /// Signed steering input, zero inside the deadzone
    pub tilt: i32,
    /// Median gyro magnitude
    pub wobble: i32,
    /// Largest raw gyro magnitude in the window
    pub peak: i32,
    /// True only on the tick the wobble crossed the threshold
    pub attack: bool,
    pub connected: bool,
}

#[derive(Debug, Clone)]
pub struct AttackDetector {
    config: DetectorConfig,
    tilt_samples: SampleWindow<SAMPLE_COUNT>,
    wobble_samples: SampleWindow<SAMPLE_COUNT>,
    tilt: i32,
    wobble: i32,
    peak: i32,
    above_threshold: bool,
    connected: bool,
}

impl AttackDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            tilt_samples: SampleWindow::new(),
            wobble_samples: SampleWindow::new(),
            tilt: 0,
            wobble: 0,
            peak: 0,
            above_threshold: false,
            connected: true,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Live settings update; sample history is kept
    pub fn reconfigure(&mut self, config: DetectorConfig) {
        self.config = config;
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Ingest this tick's poll result
    pub fn update(&mut self, reading: Result<MotionSample, MotionError>) -> JoystickState {
        match reading {
            Ok(sample) => {
                if !self.connected {
                    log::info!("motion sensor reconnected");
                    self.connected = true;
                }
                self.ingest(&sample);
            }
            Err(err) => {
                if self.connected {
                    log::warn!("motion sensor lost: {}", err);
                    self.connected = false;
                }
                if self.config.disconnect_policy == DisconnectPolicy::Neutral {
                    self.tilt = 0;
                    self.wobble = 0;
                    self.peak = 0;
                }
            }
        }

        let above = self.wobble > self.config.attack_threshold;
        let attack = above && !self.above_threshold;
        self.above_threshold = above;
        if attack {
            log::debug!("attack: wobble {} > {}", self.wobble, self.config.attack_threshold);
        }

        JoystickState {
            tilt: self.tilt,
            wobble: self.wobble,
            peak: self.peak,
            attack,
            connected: self.connected,
        }
    }

    fn ingest(&mut self, sample: &MotionSample) {
        let axis = self.config.axis;
        self.tilt_samples
            .add(i32::from(sample.accel_on(axis)) / self.config.tilt_scale);
        self.wobble_samples
            .add(i32::from(sample.gyro_on(axis)).abs());

        let mut tilt = self.tilt_samples.median();
        if self.config.invert {
            tilt = -tilt;
        }
        if tilt.abs() <= self.config.deadzone {
            tilt = 0;
        }
        self.tilt = tilt;
        self.wobble = self.wobble_samples.median();
        self.peak = self.wobble_samples.max();
    }
}
