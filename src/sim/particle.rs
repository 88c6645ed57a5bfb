//! Explosion particles
//!
//! A particle is a decaying spark on the 1-D track. Friction grows with age,
//! the track ends are inelastic walls, and the spark dies once its age
//! exhausts the intensity ceiling. Everything is integer math.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{TRACK_MAX, TRACK_MIN};

/// Pull applied past the bend point when the strip runs up a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gravity {
    /// Track coordinate where the strip leaves the floor
    pub bend_point: i32,
    /// Velocity subtracted every tick past the bend point
    pub pull: i32,
}

impl Default for Gravity {
    fn default() -> Self {
        Self {
            bend_point: 550,
            pull: 10,
        }
    }
}

/// Tuned constants behind the particle feel
///
/// Changing any of these changes how explosions look, not whether they are
/// correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleTuning {
    /// Spawn velocity is sampled from `[-max_speed, max_speed]`
    pub max_speed: i32,
    /// Starting age is `life_base - |velocity|`
    pub life_base: i32,
    /// Intensity at spawn, before the first tick
    pub spawn_intensity: i32,
    /// Per-tick intensity is `intensity_ceiling - age`
    pub intensity_ceiling: i32,
    /// Friction per tick is `age / friction_divisor`
    pub friction_divisor: i32,
    /// Translation per tick is `velocity / travel_divisor`
    pub travel_divisor: i32,
    /// `None` for a flat strip
    pub gravity: Option<Gravity>,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            max_speed: 200,
            life_base: 220,
            spawn_intensity: 255,
            intensity_ceiling: 100,
            friction_divisor: 10,
            travel_divisor: 7,
            gravity: None,
        }
    }
}

/// A single spark
///
/// Fields of a dead particle are stale until it is spawned again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Particle {
    position: i32,
    velocity: i32,
    intensity: i32,
    age: i32,
    alive: bool,
}

impl Particle {
    /// Revive this slot at `position` with a random velocity
    pub fn spawn<R: Rng>(&mut self, position: i32, tuning: &ParticleTuning, rng: &mut R) {
        let velocity = rng.random_range(-tuning.max_speed..=tuning.max_speed);
        let age = tuning.life_base - velocity.abs();
        self.spawn_exact(position, velocity, age, tuning);
    }

    /// Revive this slot with explicit motion state (scripted effects, tests)
    pub fn spawn_exact(&mut self, position: i32, velocity: i32, age: i32, tuning: &ParticleTuning) {
        self.position = position;
        self.velocity = velocity;
        self.intensity = tuning.spawn_intensity;
        self.age = age;
        self.alive = true;
    }

    /// Advance one tick; dead particles are left untouched
    pub fn tick(&mut self, tuning: &ParticleTuning) {
        if !self.alive {
            return;
        }

        self.age += 1;

        // Friction pushes toward zero; a resting spark drifts positive.
        let friction = self.age / tuning.friction_divisor;
        if self.velocity > 0 {
            self.velocity -= friction;
        } else {
            self.velocity += friction;
        }

        if let Some(gravity) = tuning.gravity {
            if self.position > gravity.bend_point {
                self.velocity -= gravity.pull;
            }
        }

        self.intensity = tuning.intensity_ceiling - self.age;
        if self.intensity <= 0 {
            self.kill();
            return;
        }

        self.position += self.velocity / tuning.travel_divisor;
        if self.position > TRACK_MAX {
            self.position = TRACK_MAX;
            self.bounce();
        } else if self.position < TRACK_MIN {
            self.position = TRACK_MIN;
            self.bounce();
        }
    }

    /// Inelastic reflection off a track end
    fn bounce(&mut self) {
        self.velocity = -(self.velocity / 2);
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn position(&self) -> i32 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> i32 {
        self.velocity
    }

    /// Brightness for the renderer, `0..=255` while alive
    #[inline]
    pub fn intensity(&self) -> i32 {
        self.intensity
    }

    #[inline]
    pub fn age(&self) -> i32 {
        self.age
    }
}
