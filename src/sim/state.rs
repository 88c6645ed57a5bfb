//! Game state and core simulation types
//!
//! Everything the frame loop advances lives here. The renderer only ever sees
//! a [`Snapshot`].

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::pool::ParticlePool;
use super::spawner::{SpawnDirection, SpawnerPool};
use crate::config::SimConfig;
use crate::consts::TRACK_MAX;
use crate::motion::{AttackDetector, JoystickState};
use crate::platform::Millis;

/// Events held between drains. One frame raises at most one sensor
/// transition, one attack and one event per spawner, so this covers several
/// undrained frames; past it new events are dropped.
pub const MAX_PENDING_EVENTS: usize = 64;

/// Something the game layer has to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The player swung the joystick
    Attack,
    /// A spawner owes the game a new enemy
    EnemyDue {
        spawner: usize,
        position: i32,
        speed: i32,
        direction: SpawnDirection,
    },
    SensorLost,
    SensorRestored,
}

/// Renderer view of one spark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleView {
    pub position: i32,
    pub intensity: i32,
}

/// Renderer view of one spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnerView {
    pub position: i32,
}

/// Read-only picture of everything alive after a frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub particles: Vec<ParticleView>,
    pub spawners: Vec<SpawnerView>,
}

impl Snapshot {
    /// LED index for a track coordinate on a strip of `led_count` pixels
    pub fn pixel(position: i32, led_count: u16) -> usize {
        let last = i64::from(led_count.saturating_sub(1));
        let position = i64::from(crate::clamp_to_track(position));
        (position * last / i64::from(TRACK_MAX)) as usize
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: SimConfig,
    pub rng: Pcg32,
    pub particles: ParticlePool,
    pub spawners: SpawnerPool,
    pub detector: AttackDetector,
    /// Joystick state from the latest frame
    pub joystick: JoystickState,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the last drain
    pub(crate) events: Vec<GameEvent>,
    /// Spawner indices that came due this frame, reused across ticks
    pub(crate) due: Vec<usize>,
}

impl GameState {
    pub fn new(config: &SimConfig, seed: u64) -> Self {
        Self {
            seed,
            config: *config,
            rng: Pcg32::seed_from_u64(seed),
            particles: ParticlePool::new(config.particle_capacity),
            spawners: SpawnerPool::new(config.spawner_capacity),
            detector: AttackDetector::new(config.detector),
            joystick: JoystickState::default(),
            time_ticks: 0,
            events: Vec::with_capacity(MAX_PENDING_EVENTS),
            due: Vec::with_capacity(config.spawner_capacity),
        }
    }

    /// Live settings update
    ///
    /// Tuning and detector changes apply from the next tick. A capacity change
    /// reallocates the affected pool, which clears it.
    pub fn reconfigure(&mut self, config: &SimConfig) {
        if config.particle_capacity != self.particles.capacity() {
            log::info!(
                "Particle pool resized {} -> {}",
                self.particles.capacity(),
                config.particle_capacity
            );
            self.particles = ParticlePool::new(config.particle_capacity);
        }
        if config.spawner_capacity != self.spawners.capacity() {
            log::info!(
                "Spawner pool resized {} -> {}",
                self.spawners.capacity(),
                config.spawner_capacity
            );
            self.spawners = SpawnerPool::new(config.spawner_capacity);
            self.due = Vec::with_capacity(config.spawner_capacity);
        }
        self.detector.reconfigure(config.detector);
        self.config = *config;
    }

    /// Explosion at `position`; returns how many sparks fit in the pool
    pub fn explode(&mut self, position: i32) -> usize {
        let count = self.config.explosion_particles;
        self.particles
            .explode(position, count, &self.config.particles, &mut self.rng)
    }

    /// Place a spawner; `None` if every slot is taken
    pub fn add_spawner(
        &mut self,
        position: i32,
        rate_ms: u32,
        speed: i32,
        direction: SpawnDirection,
        start_offset_ms: i32,
        now: Millis,
    ) -> Option<usize> {
        self.spawners
            .spawn(position, rate_ms, speed, direction, start_offset_ms, now)
    }

    /// Level transition: clear every spark and spawner
    pub fn clear_level(&mut self) {
        self.particles.kill_all();
        self.spawners.kill_all();
    }

    /// Take the events raised since the last call
    ///
    /// Call once per frame. Events beyond [`MAX_PENDING_EVENTS`] are dropped
    /// until the queue is drained.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::replace(&mut self.events, Vec::with_capacity(MAX_PENDING_EVENTS))
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            log::trace!("Event queue full, dropping {:?}", event);
            return;
        }
        self.events.push(event);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            particles: self
                .particles
                .iter_alive()
                .map(|p| ParticleView {
                    position: p.position(),
                    intensity: p.intensity(),
                })
                .collect(),
            spawners: self
                .spawners
                .iter_alive()
                .map(|s| SpawnerView {
                    position: s.position,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_mapping() {
        assert_eq!(Snapshot::pixel(0, 30), 0);
        assert_eq!(Snapshot::pixel(1000, 30), 29);
        assert_eq!(Snapshot::pixel(500, 31), 15);
        assert_eq!(Snapshot::pixel(2000, 30), 29);
        assert_eq!(Snapshot::pixel(-5, 30), 0);
        assert_eq!(Snapshot::pixel(1000, 0), 0);
    }

    #[test]
    fn test_same_seed_same_explosion() {
        let config = SimConfig::default();
        let mut a = GameState::new(&config, 99);
        let mut b = GameState::new(&config, 99);
        a.explode(500);
        b.explode(500);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_explosion_capped_by_pool() {
        let config = SimConfig {
            particle_capacity: 8,
            ..SimConfig::default()
        };
        let mut state = GameState::new(&config, 1);
        assert_eq!(state.explode(250), 8);
        assert_eq!(state.explode(250), 0);
        assert_eq!(state.snapshot().particles.len(), 8);
    }

    #[test]
    fn test_snapshot_skips_dead_entries() {
        let mut state = GameState::new(&SimConfig::default(), 3);
        let first = state
            .add_spawner(1000, 3000, 1, SpawnDirection::TowardGoal, 0, Millis(0))
            .unwrap();
        state.add_spawner(700, 3000, 1, SpawnDirection::Away, 0, Millis(0));
        state.spawners.kill(first);
        assert_eq!(state.snapshot().spawners, vec![SpawnerView { position: 700 }]);

        state.clear_level();
        assert_eq!(state.snapshot(), Snapshot::default());
    }

    #[test]
    fn test_event_queue_is_bounded() {
        let mut state = GameState::new(&SimConfig::default(), 3);
        for _ in 0..MAX_PENDING_EVENTS {
            state.push_event(GameEvent::Attack);
        }
        state.push_event(GameEvent::SensorLost);

        let events = state.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert!(!events.contains(&GameEvent::SensorLost));

        state.push_event(GameEvent::SensorLost);
        assert_eq!(state.drain_events(), vec![GameEvent::SensorLost]);
    }

    #[test]
    fn test_reconfigure_resizes_pools() {
        let mut state = GameState::new(&SimConfig::default(), 3);
        state.explode(100);
        let bigger = SimConfig {
            particle_capacity: 64,
            ..SimConfig::default()
        };
        state.reconfigure(&bigger);
        assert_eq!(state.particles.capacity(), 64);
        assert_eq!(state.particles.alive_count(), 0);
        assert_eq!(state.spawners.capacity(), 2);

        let more_spawners = SimConfig {
            spawner_capacity: 8,
            ..bigger
        };
        state.reconfigure(&more_spawners);
        assert_eq!(state.spawners.capacity(), 8);
        assert!(state.due.capacity() >= 8);
    }
}
