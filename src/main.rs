//! Twang demo runner
//!
//! Drives the simulation core headless with a synthetic joystick: the player
//! drifts up the strip and swings periodically, every swing explodes, and the
//! strip is printed as text now and then.

use anyhow::{Context, Result};
use clap::Parser;

use twang::consts::TICK_MS;
use twang::motion::{MotionError, MotionSample, MotionSource};
use twang::persistence::{self, FileStore, MemoryStore, SettingsStore};
use twang::platform::{Clock, ManualClock};
use twang::settings::Command;
use twang::sim::{GameEvent, GameState, SpawnDirection, Snapshot, run_frame};
use twang::{Settings, SimConfig};

#[derive(Debug, Parser)]
#[command(name = "twang", about = "Headless run of the Twang simulation core")]
struct Args {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Seed for particle randomness
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Frame period in milliseconds
    #[arg(long, default_value_t = TICK_MS)]
    tick_ms: u32,
    /// Print the strip every N frames (0 disables)
    #[arg(long, default_value_t = 30)]
    render_every: u32,
    /// Settings file (defaults are used in memory when omitted)
    #[arg(long)]
    settings: Option<std::path::PathBuf>,
    /// Console commands applied before the run, e.g. `--set A=25000`
    #[arg(long = "set")]
    commands: Vec<String>,
    /// Frames during which the sensor stops answering, e.g. `--drop 200..260`
    #[arg(long)]
    drop: Option<String>,
}

/// Synthetic spring joystick: steady forward tilt, a hard swing every
/// `swing_period` frames, and an optional outage window
struct SwingPattern {
    frame: u32,
    swing_period: u32,
    outage: Option<(u32, u32)>,
}

impl MotionSource for SwingPattern {
    fn poll(&mut self) -> Result<MotionSample, MotionError> {
        let frame = self.frame;
        self.frame += 1;

        if let Some((start, end)) = self.outage {
            if (start..end).contains(&frame) {
                return Err(MotionError::TimedOut(5));
            }
        }

        let swinging = frame % self.swing_period < 6;
        let gyro = if swinging { 32_000 } else { 400 };
        Ok(MotionSample::new(0, -4_000, 16_000, 0, gyro, 0))
    }
}

fn parse_outage(text: &str) -> Result<(u32, u32)> {
    let (start, end) = text
        .split_once("..")
        .with_context(|| format!("outage {text:?} must look like START..END"))?;
    Ok((start.parse()?, end.parse()?))
}

fn render(snapshot: &Snapshot, player: i32, led_count: u16) -> String {
    let mut strip = vec![' '; usize::from(led_count.max(1))];
    for particle in &snapshot.particles {
        let glyph = match particle.intensity {
            i32::MIN..=30 => '.',
            31..=60 => '+',
            _ => '*',
        };
        strip[Snapshot::pixel(particle.position, led_count)] = glyph;
    }
    for spawner in &snapshot.spawners {
        strip[Snapshot::pixel(spawner.position, led_count)] = 'S';
    }
    strip[Snapshot::pixel(player, led_count)] = '@';
    strip.into_iter().collect()
}

fn run(args: &Args, settings: &Settings) -> Result<()> {
    let config = SimConfig::from(settings);
    log::debug!("core config: {}", serde_json::to_string(&config)?);

    let clock = ManualClock::default();
    let mut state = GameState::new(&config, args.seed);
    let mut source = SwingPattern {
        frame: 0,
        swing_period: 90,
        outage: args.drop.as_deref().map(parse_outage).transpose()?,
    };

    state.add_spawner(1000, 3000, 2, SpawnDirection::TowardGoal, 0, clock.now());
    state.add_spawner(600, 5000, 1, SpawnDirection::Away, -2000, clock.now());

    let mut player = 0;
    let mut attacks = 0u32;
    let mut enemies = 0u32;

    for frame in 0..args.ticks {
        run_frame(&mut state, &mut source, &clock);
        player = twang::clamp_to_track(player + state.joystick.tilt / 4);

        for event in state.drain_events() {
            match event {
                GameEvent::Attack => {
                    attacks += 1;
                    let sparks = state.explode(player);
                    log::debug!("frame {frame}: attack at {player}, {sparks} sparks");
                }
                GameEvent::EnemyDue {
                    spawner, position, ..
                } => {
                    enemies += 1;
                    log::debug!("frame {frame}: spawner {spawner} emits enemy at {position}");
                }
                GameEvent::SensorLost => log::warn!("frame {frame}: joystick offline"),
                GameEvent::SensorRestored => log::info!("frame {frame}: joystick back"),
            }
        }

        if args.render_every > 0 && frame % args.render_every == 0 {
            println!("|{}|", render(&state.snapshot(), player, config.led_count));
        }
        clock.advance(args.tick_ms);
    }

    log::info!(
        "{} frames: {} attacks, {} enemies due, {} sparks alive",
        args.ticks,
        attacks,
        enemies,
        state.particles.alive_count()
    );
    Ok(())
}

fn configure(args: &Args, store: &mut impl SettingsStore) -> Result<Settings> {
    let mut settings = persistence::load(store)?;
    for text in &args.commands {
        let command = Command::parse(text)?;
        let outcome = settings.apply(command)?;
        if outcome.needs_save() {
            persistence::save(&settings, store)?;
        } else {
            print!("{}{}", settings.menu(), settings.stats_report());
        }
    }
    Ok(settings)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Twang starting...");

    let args = Args::parse();
    let settings = match &args.settings {
        Some(path) => configure(&args, &mut FileStore::new(path))
            .with_context(|| format!("settings file {}", path.display()))?,
        None => configure(&args, &mut MemoryStore::new())?,
    };

    run(&args, &settings)
}
