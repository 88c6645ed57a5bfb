//! Configuration injected into the simulation core
//!
//! Built once from [`Settings`] and handed to [`crate::sim::GameState`] by
//! reference. Values are already clamped by the settings layer; nothing here
//! validates them again.

use serde::{Deserialize, Serialize};

use crate::consts::EXPLOSION_PARTICLES;
use crate::motion::{Axis, DetectorConfig, DisconnectPolicy};
use crate::settings::Settings;
use crate::sim::{Gravity, ParticleTuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub particle_capacity: usize,
    pub spawner_capacity: usize,
    /// Sparks requested per explosion
    pub explosion_particles: usize,
    pub particles: ParticleTuning,
    pub detector: DetectorConfig,
    /// LEDs the track is mapped onto at render time
    pub led_count: u16,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for SimConfig {
    fn from(settings: &Settings) -> Self {
        let gravity = settings.gravity.then(|| Gravity {
            bend_point: i32::from(settings.bend_point),
            ..Gravity::default()
        });

        Self {
            particle_capacity: usize::from(settings.particle_count),
            spawner_capacity: usize::from(settings.spawner_count),
            explosion_particles: EXPLOSION_PARTICLES,
            particles: ParticleTuning {
                gravity,
                ..ParticleTuning::default()
            },
            detector: DetectorConfig {
                attack_threshold: i32::from(settings.attack_threshold),
                deadzone: i32::from(settings.joystick_deadzone),
                axis: Axis::from_orientation(settings.joystick_orientation).unwrap_or_default(),
                invert: settings.joystick_invert,
                disconnect_policy: DisconnectPolicy::Neutral,
                ..DetectorConfig::default()
            },
            led_count: settings.led_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_settings() {
        let config = SimConfig::default();
        assert_eq!(config.particle_capacity, 40);
        assert_eq!(config.spawner_capacity, 2);
        assert_eq!(config.particles.gravity, None);
        assert_eq!(config.detector.attack_threshold, 30_000);
        assert_eq!(config.detector.axis, Axis::Y);
    }

    #[test]
    fn test_gravity_uses_configured_bend_point() {
        let mut settings = Settings::default();
        settings.set('G', 1).unwrap();
        settings.set('K', 700).unwrap();
        let config = SimConfig::from(&settings);
        assert_eq!(
            config.particles.gravity,
            Some(Gravity {
                bend_point: 700,
                pull: 10
            })
        );
    }

    #[test]
    fn test_bad_orientation_falls_back_to_default_axis() {
        let settings = Settings {
            joystick_orientation: 9,
            ..Settings::default()
        };
        assert_eq!(SimConfig::from(&settings).detector.axis, Axis::Y);
    }
}
