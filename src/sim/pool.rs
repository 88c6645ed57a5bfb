//! Fixed-capacity particle storage
//!
//! Slots are allocated once. A spawn request with no free slot is dropped:
//! explosions lose sparks instead of the frame growing in cost.

use rand::Rng;

use super::particle::{Particle, ParticleTuning};

#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Box<[Particle]>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Spawn into the first free slot, returning its index
    pub fn spawn<R: Rng>(
        &mut self,
        position: i32,
        tuning: &ParticleTuning,
        rng: &mut R,
    ) -> Option<usize> {
        let index = self.free_slot()?;
        self.slots[index].spawn(position, tuning, rng);
        Some(index)
    }

    /// Spawn with explicit motion state into the first free slot
    pub fn spawn_exact(
        &mut self,
        position: i32,
        velocity: i32,
        age: i32,
        tuning: &ParticleTuning,
    ) -> Option<usize> {
        let index = self.free_slot()?;
        self.slots[index].spawn_exact(position, velocity, age, tuning);
        Some(index)
    }

    /// Burst of up to `count` sparks at `position`; returns how many were emitted
    pub fn explode<R: Rng>(
        &mut self,
        position: i32,
        count: usize,
        tuning: &ParticleTuning,
        rng: &mut R,
    ) -> usize {
        let mut emitted = 0;
        while emitted < count && self.spawn(position, tuning, rng).is_some() {
            emitted += 1;
        }
        if emitted < count {
            log::trace!(
                "particle pool full: dropped {} of {} sparks at {}",
                count - emitted,
                count,
                position
            );
        }
        emitted
    }

    /// Tick every slot in slot order (dead slots are no-ops)
    pub fn tick(&mut self, tuning: &ParticleTuning) {
        for particle in self.slots.iter_mut() {
            particle.tick(tuning);
        }
    }

    pub fn kill(&mut self, index: usize) {
        if let Some(particle) = self.slots.get_mut(index) {
            particle.kill();
        }
    }

    pub fn kill_all(&mut self) {
        for particle in self.slots.iter_mut() {
            particle.kill();
        }
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.slots.get(index)
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.alive())
    }

    pub fn alive_count(&self) -> usize {
        self.iter_alive().count()
    }

    fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|p| !p.alive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_fills_lowest_free_slot() {
        let tuning = ParticleTuning::default();
        let mut pool = ParticlePool::new(4);
        assert_eq!(pool.spawn_exact(100, 150, 0, &tuning), Some(0));
        assert_eq!(pool.spawn_exact(200, 150, 0, &tuning), Some(1));
        pool.kill(0);
        assert_eq!(pool.spawn_exact(300, 150, 0, &tuning), Some(0));
        assert_eq!(pool.get(0).map(Particle::position), Some(300));
    }

    #[test]
    fn test_full_pool_drops_requests() {
        let tuning = ParticleTuning::default();
        let mut pool = ParticlePool::new(3);
        for _ in 0..3 {
            assert!(pool.spawn_exact(500, 150, 0, &tuning).is_some());
        }
        assert_eq!(pool.spawn_exact(500, 150, 0, &tuning), None);
        assert_eq!(pool.capacity(), 3);
        assert_eq!(pool.alive_count(), 3);
    }

    #[test]
    fn test_explode_reports_partial_burst() {
        let tuning = ParticleTuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = ParticlePool::new(10);
        assert_eq!(pool.explode(500, 6, &tuning, &mut rng), 6);
        assert_eq!(pool.explode(500, 6, &tuning, &mut rng), 4);
        assert_eq!(pool.alive_count(), 10);
    }

    #[test]
    fn test_tick_reclaims_dead_slots() {
        let tuning = ParticleTuning::default();
        let mut pool = ParticlePool::new(2);
        pool.spawn_exact(500, 0, 0, &tuning);
        pool.spawn_exact(500, 0, 99, &tuning);
        pool.tick(&tuning);
        assert_eq!(pool.alive_count(), 1);
        pool.tick(&tuning);
        assert_eq!(pool.alive_count(), 1);
        assert_eq!(pool.spawn_exact(10, 0, 0, &tuning), Some(1));
    }

    #[test]
    fn test_kill_all_and_out_of_range_kill() {
        let tuning = ParticleTuning::default();
        let mut pool = ParticlePool::new(3);
        pool.spawn_exact(1, 150, 0, &tuning);
        pool.spawn_exact(2, 150, 0, &tuning);
        pool.kill(99);
        assert_eq!(pool.alive_count(), 2);
        pool.kill_all();
        assert_eq!(pool.alive_count(), 0);
    }
}
