//! Fixed timestep simulation tick
//!
//! One call is one frame: ingest exactly one motion sample, advance every
//! particle once, and collect the spawners that came due.

use super::state::{GameEvent, GameState};
use crate::motion::{MotionError, MotionSample, MotionSource};
use crate::platform::{Clock, Millis};

/// Inputs for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInput {
    /// Frame timestamp from the monotonic clock
    pub now: Millis,
    /// This frame's sensor poll
    pub motion: Result<MotionSample, MotionError>,
}

/// Advance the game state by one frame
///
/// Events pile up in `state` until [`GameState::drain_events`]; drain them
/// every frame or the newest are dropped once the queue is full.
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    let was_connected = state.detector.connected();
    state.joystick = state.detector.update(input.motion);
    match (was_connected, state.joystick.connected) {
        (true, false) => state.push_event(GameEvent::SensorLost),
        (false, true) => state.push_event(GameEvent::SensorRestored),
        _ => {}
    }
    if state.joystick.attack {
        state.push_event(GameEvent::Attack);
    }

    state.particles.tick(&state.config.particles);

    let mut due = std::mem::take(&mut state.due);
    due.clear();
    state.spawners.poll_due(input.now, &mut due);
    for &index in &due {
        let Some(spawner) = state.spawners.get(index) else {
            continue;
        };
        let event = GameEvent::EnemyDue {
            spawner: index,
            position: spawner.position,
            speed: spawner.speed,
            direction: spawner.direction,
        };
        state.push_event(event);
    }
    state.due = due;
}

/// Poll the source and clock, then tick
pub fn run_frame(state: &mut GameState, source: &mut impl MotionSource, clock: &impl Clock) {
    let input = TickInput {
        now: clock.now(),
        motion: source.poll(),
    };
    tick(state, &input);
}
