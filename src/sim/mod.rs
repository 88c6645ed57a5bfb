//! Deterministic simulation module
//!
//! All per-frame game dynamics live here. This module must stay pure:
//! - One tick per frame, no sleeping or I/O
//! - Seeded RNG only
//! - Fixed-capacity pools, stable slot order

pub mod particle;
pub mod pool;
pub mod spawner;
pub mod state;
pub mod tick;

pub use particle::{Gravity, Particle, ParticleTuning};
pub use pool::ParticlePool;
pub use spawner::{SpawnDirection, Spawner, SpawnerPool};
pub use state::{
    GameEvent, GameState, MAX_PENDING_EVENTS, ParticleView, Snapshot, SpawnerView,
};
pub use tick::{TickInput, run_frame, tick};
