//! Enemy spawners
//!
//! A spawner only keeps cadence bookkeeping and the parameters handed to the
//! enemies it emits. Moving and fighting those enemies belongs to the game
//! layer above the core.

use serde::{Deserialize, Serialize};

use crate::platform::Millis;

/// Which way emitted enemies travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnDirection {
    /// Down the strip, away from the exit
    #[default]
    Away,
    /// Toward the exit (and the player)
    TowardGoal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spawner {
    pub position: i32,
    pub rate_ms: u32,
    /// Enemy speed, typically 1 to 4
    pub speed: i32,
    pub direction: SpawnDirection,
    /// Cadence is measured from here; see [`Spawner::is_due`]
    pub last_spawned: Millis,
    /// Added to the rate for the first emission only; may be negative
    pub one_shot_delay_ms: i32,
    alive: bool,
}

impl Spawner {
    /// Arm this slot
    ///
    /// `start_offset_ms` shifts only the first emission: positive values
    /// stagger spawners, negative values make the first enemy come early.
    pub fn spawn(
        &mut self,
        position: i32,
        rate_ms: u32,
        speed: i32,
        direction: SpawnDirection,
        start_offset_ms: i32,
        now: Millis,
    ) {
        self.position = position;
        self.rate_ms = rate_ms;
        self.speed = speed;
        self.direction = direction;
        self.last_spawned = now;
        self.one_shot_delay_ms = start_offset_ms;
        self.alive = true;
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.alive
    }

    /// Whether the next enemy is owed at `now`
    ///
    /// Uses elapsed time (`now - last`), so the answer stays right when the
    /// millisecond counter wraps.
    pub fn is_due(&self, now: Millis) -> bool {
        if !self.alive {
            return false;
        }
        let elapsed = i64::from(now.elapsed_since(self.last_spawned));
        let wait = i64::from(self.rate_ms) + i64::from(self.one_shot_delay_ms);
        elapsed >= wait
    }

    /// Record an emission at `now`; the start offset is spent
    pub fn mark_spawned(&mut self, now: Millis) {
        self.last_spawned = now;
        self.one_shot_delay_ms = 0;
    }
}

/// Fixed set of spawner slots
#[derive(Debug, Clone)]
pub struct SpawnerPool {
    slots: Box<[Spawner]>,
}

impl SpawnerPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Spawner::default(); capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Arm the first free slot, returning its index; `None` when all are busy
    pub fn spawn(
        &mut self,
        position: i32,
        rate_ms: u32,
        speed: i32,
        direction: SpawnDirection,
        start_offset_ms: i32,
        now: Millis,
    ) -> Option<usize> {
        let Some(index) = self.slots.iter().position(|s| !s.alive()) else {
            log::trace!("spawner pool full: dropped spawner at {}", position);
            return None;
        };
        self.slots[index].spawn(position, rate_ms, speed, direction, start_offset_ms, now);
        Some(index)
    }

    pub fn kill(&mut self, index: usize) {
        if let Some(spawner) = self.slots.get_mut(index) {
            spawner.kill();
        }
    }

    /// Level transition: every spawner goes inert
    pub fn kill_all(&mut self) {
        for spawner in self.slots.iter_mut() {
            spawner.kill();
        }
    }

    /// Mark every due spawner as fired and append its index to `due`
    pub fn poll_due(&mut self, now: Millis, due: &mut Vec<usize>) {
        for (index, spawner) in self.slots.iter_mut().enumerate() {
            if spawner.is_due(now) {
                spawner.mark_spawned(now);
                due.push(index);
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&Spawner> {
        self.slots.get(index)
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = &Spawner> {
        self.slots.iter().filter(|s| s.alive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Clock, ManualClock};

    fn armed(rate_ms: u32, offset: i32, now: Millis) -> Spawner {
        let mut s = Spawner::default();
        s.spawn(1000, rate_ms, 3, SpawnDirection::TowardGoal, offset, now);
        s
    }

    #[test]
    fn test_spawn_records_parameters() {
        let s = armed(500, 250, Millis(42));
        assert!(s.alive());
        assert_eq!(s.position, 1000);
        assert_eq!(s.speed, 3);
        assert_eq!(s.direction, SpawnDirection::TowardGoal);
        assert_eq!(s.last_spawned, Millis(42));
        assert_eq!(s.one_shot_delay_ms, 250);
    }

    #[test]
    fn test_cadence_across_timer_wrap() {
        let clock = ManualClock::starting_at(u32::MAX - 300);
        let mut s = armed(500, 0, clock.now());

        clock.advance(499);
        assert!(!s.is_due(clock.now()));
        clock.advance(1);
        assert!(clock.now().0 < 500, "clock should have wrapped");
        assert!(s.is_due(clock.now()));

        s.mark_spawned(clock.now());
        assert!(!s.is_due(clock.now()));
        clock.advance(500);
        assert!(s.is_due(clock.now()));
    }

    #[test]
    fn test_start_offset_applies_once() {
        let mut s = armed(500, 300, Millis(0));
        assert!(!s.is_due(Millis(500)));
        assert!(s.is_due(Millis(800)));
        s.mark_spawned(Millis(800));
        assert!(s.is_due(Millis(1300)));
    }

    #[test]
    fn test_negative_offset_fires_immediately() {
        let s = armed(500, -600, Millis(10));
        assert!(s.is_due(Millis(10)));
    }

    #[test]
    fn test_dead_spawner_never_due() {
        let mut s = armed(0, 0, Millis(0));
        assert!(s.is_due(Millis(0)));
        s.kill();
        s.kill();
        assert!(!s.alive());
        assert!(!s.is_due(Millis(1_000_000)));
    }

    #[test]
    fn test_pool_polls_only_due_spawners() {
        let mut pool = SpawnerPool::new(3);
        assert_eq!(pool.spawn(1000, 500, 2, SpawnDirection::TowardGoal, 0, Millis(0)), Some(0));
        assert_eq!(pool.spawn(600, 2000, 1, SpawnDirection::Away, 0, Millis(0)), Some(1));

        let mut due = Vec::new();
        pool.poll_due(Millis(600), &mut due);
        assert_eq!(due, vec![0]);

        due.clear();
        pool.poll_due(Millis(700), &mut due);
        assert!(due.is_empty());
    }

    #[test]
    fn test_pool_drops_when_full() {
        let mut pool = SpawnerPool::new(1);
        assert!(pool.spawn(1, 10, 1, SpawnDirection::Away, 0, Millis(0)).is_some());
        assert_eq!(pool.spawn(2, 10, 1, SpawnDirection::Away, 0, Millis(0)), None);
        pool.kill_all();
        assert_eq!(pool.iter_alive().count(), 0);
        assert_eq!(pool.spawn(2, 10, 1, SpawnDirection::Away, 0, Millis(0)), Some(0));
    }
}
