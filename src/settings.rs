//! Game settings and play statistics
//!
//! One versioned record, persisted by [`crate::persistence`]. Every value is
//! clamped here on the way in; the simulation core trusts what it receives.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bump whenever the record layout changes. A stored record with any other
/// version is discarded and replaced by factory defaults.
pub const SETTINGS_VERSION: u8 = 3;

pub const DEFAULT_LED_COUNT: u16 = 30;
pub const MIN_LED_COUNT: u16 = 30;
pub const MAX_LED_COUNT: u16 = 1000;

pub const DEFAULT_BRIGHTNESS: u8 = 150;
pub const MIN_BRIGHTNESS: u8 = 10;
pub const MAX_BRIGHTNESS: u8 = 255;

pub const DEFAULT_JOYSTICK_DEADZONE: u8 = 8;
pub const MIN_JOYSTICK_DEADZONE: u8 = 3;
pub const MAX_JOYSTICK_DEADZONE: u8 = 12;

pub const DEFAULT_JOYSTICK_ORIENTATION: u8 = 1;
pub const MAX_JOYSTICK_ORIENTATION: u8 = 2;

pub const DEFAULT_ATTACK_THRESHOLD: u16 = 30_000;
pub const MIN_ATTACK_THRESHOLD: u16 = 20_000;
pub const MAX_ATTACK_THRESHOLD: u16 = 30_000;

pub const DEFAULT_VOLUME: u8 = 20;
pub const MIN_VOLUME: u8 = 0;
pub const MAX_VOLUME: u8 = 255;

pub const DEFAULT_LIVES_PER_LEVEL: u8 = 3;
pub const MIN_LIVES_PER_LEVEL: u8 = 3;
pub const MAX_LIVES_PER_LEVEL: u8 = 9;

pub const DEFAULT_BEND_POINT: u16 = 550;
pub const MAX_BEND_POINT: u16 = 1000;

pub const DEFAULT_PARTICLE_COUNT: u16 = 40;
pub const MIN_PARTICLE_COUNT: u16 = 1;
pub const MAX_PARTICLE_COUNT: u16 = 64;

pub const DEFAULT_SPAWNER_COUNT: u8 = 2;
pub const MIN_SPAWNER_COUNT: u8 = 1;
pub const MAX_SPAWNER_COUNT: u8 = 8;

/// The persisted settings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Record format version, see [`SETTINGS_VERSION`]
    pub settings_version: u8,

    // === LEDs ===
    pub led_count: u16,
    pub led_brightness: u8,

    // === Joystick ===
    pub joystick_deadzone: u8,
    /// Sensor axis used as the joystick (0, 1 or 2)
    pub joystick_orientation: u8,
    /// Flip steering direction
    pub joystick_invert: bool,
    pub attack_threshold: u16,

    // === Audio ===
    pub audio_volume: u8,

    // === Gameplay ===
    pub lives_per_level: u8,
    /// Strip runs up a wall past `bend_point`
    pub gravity: bool,
    pub bend_point: u16,
    pub particle_count: u16,
    pub spawner_count: u8,

    // === Play statistics ===
    pub games_played: u16,
    pub total_points: u32,
    pub high_score: u16,
    pub boss_kills: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            settings_version: SETTINGS_VERSION,

            led_count: DEFAULT_LED_COUNT,
            led_brightness: DEFAULT_BRIGHTNESS,

            joystick_deadzone: DEFAULT_JOYSTICK_DEADZONE,
            joystick_orientation: DEFAULT_JOYSTICK_ORIENTATION,
            joystick_invert: true,
            attack_threshold: DEFAULT_ATTACK_THRESHOLD,

            audio_volume: DEFAULT_VOLUME,

            lives_per_level: DEFAULT_LIVES_PER_LEVEL,
            gravity: false,
            bend_point: DEFAULT_BEND_POINT,
            particle_count: DEFAULT_PARTICLE_COUNT,
            spawner_count: DEFAULT_SPAWNER_COUNT,

            games_played: 0,
            total_points: 0,
            high_score: 0,
            boss_kills: 0,
        }
    }
}

/// A console command: `X` or `X=nn`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Action(char),
    Set(char, u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("malformed command {0:?}: expected X or X=nn")]
    Malformed(String),
    #[error("malformed value in command {0:?}")]
    BadValue(String),
    #[error("unknown setting {0}")]
    UnknownSetting(char),
    #[error("unknown command {0}")]
    UnknownAction(char),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut chars = line.chars();
        let Some(code) = chars.next() else {
            return Err(CommandError::Malformed(line.to_string()));
        };
        let rest = chars.as_str();
        if rest.is_empty() {
            return Ok(Command::Action(code));
        }

        let Some(digits) = rest.strip_prefix('=') else {
            return Err(CommandError::Malformed(line.to_string()));
        };
        if digits.is_empty() {
            return Err(CommandError::Malformed(line.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CommandError::BadValue(line.to_string()));
        }
        let value = digits
            .parse::<u16>()
            .map_err(|_| CommandError::BadValue(line.to_string()))?;
        Ok(Command::Set(code, value))
    }
}

/// What applying a command did to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A value was stored (after clamping); persist the record
    Changed { code: char, value: u16 },
    /// Print the menu and statistics
    ShowMenu,
    /// Everything back to factory defaults; persist the record
    Reset,
    /// Statistics cleared; persist the record
    StatsReset,
}

impl Outcome {
    pub fn needs_save(&self) -> bool {
        !matches!(self, Outcome::ShowMenu)
    }
}

impl Settings {
    /// Apply a console command, clamping values into their legal range
    pub fn apply(&mut self, command: Command) -> Result<Outcome, CommandError> {
        match command {
            Command::Set(code, value) => {
                let stored = self.set(code, value)?;
                log::info!("setting {} = {}", code, stored);
                Ok(Outcome::Changed {
                    code,
                    value: stored,
                })
            }
            Command::Action('?') => Ok(Outcome::ShowMenu),
            Command::Action('R') => {
                *self = Self::default();
                log::info!("settings reset");
                Ok(Outcome::Reset)
            }
            Command::Action('P') => {
                self.reset_stats();
                Ok(Outcome::StatsReset)
            }
            Command::Action(other) => Err(CommandError::UnknownAction(other)),
        }
    }

    /// Store a clamped value under a setting code, returning what was stored
    pub fn set(&mut self, code: char, value: u16) -> Result<u16, CommandError> {
        let stored = match code {
            'C' => {
                self.led_count = value.clamp(MIN_LED_COUNT, MAX_LED_COUNT);
                self.led_count
            }
            'B' => {
                self.led_brightness = clamp_u8(value, MIN_BRIGHTNESS, MAX_BRIGHTNESS);
                u16::from(self.led_brightness)
            }
            'S' => {
                self.audio_volume = clamp_u8(value, MIN_VOLUME, MAX_VOLUME);
                u16::from(self.audio_volume)
            }
            'D' => {
                self.joystick_deadzone =
                    clamp_u8(value, MIN_JOYSTICK_DEADZONE, MAX_JOYSTICK_DEADZONE);
                u16::from(self.joystick_deadzone)
            }
            'A' => {
                self.attack_threshold = value.clamp(MIN_ATTACK_THRESHOLD, MAX_ATTACK_THRESHOLD);
                self.attack_threshold
            }
            'L' => {
                self.lives_per_level = clamp_u8(value, MIN_LIVES_PER_LEVEL, MAX_LIVES_PER_LEVEL);
                u16::from(self.lives_per_level)
            }
            'G' => {
                self.gravity = value != 0;
                u16::from(self.gravity)
            }
            'K' => {
                self.bend_point = value.min(MAX_BEND_POINT);
                self.bend_point
            }
            other => return Err(CommandError::UnknownSetting(other)),
        };
        Ok(stored)
    }

    /// Force every field into its legal range, as a record read back from
    /// storage may hold anything. Returns whether a value had to change.
    pub fn clamp(&mut self) -> bool {
        let before = self.clone();

        self.led_count = self.led_count.clamp(MIN_LED_COUNT, MAX_LED_COUNT);
        self.led_brightness = self.led_brightness.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS);
        self.joystick_deadzone = self
            .joystick_deadzone
            .clamp(MIN_JOYSTICK_DEADZONE, MAX_JOYSTICK_DEADZONE);
        // Not a range: an unknown axis goes back to the default one.
        if self.joystick_orientation > MAX_JOYSTICK_ORIENTATION {
            self.joystick_orientation = DEFAULT_JOYSTICK_ORIENTATION;
        }
        self.attack_threshold = self
            .attack_threshold
            .clamp(MIN_ATTACK_THRESHOLD, MAX_ATTACK_THRESHOLD);
        self.audio_volume = self.audio_volume.clamp(MIN_VOLUME, MAX_VOLUME);
        self.lives_per_level = self
            .lives_per_level
            .clamp(MIN_LIVES_PER_LEVEL, MAX_LIVES_PER_LEVEL);
        self.bend_point = self.bend_point.min(MAX_BEND_POINT);
        self.particle_count = self
            .particle_count
            .clamp(MIN_PARTICLE_COUNT, MAX_PARTICLE_COUNT);
        self.spawner_count = self.spawner_count.clamp(MIN_SPAWNER_COUNT, MAX_SPAWNER_COUNT);

        *self != before
    }

    pub fn reset_stats(&mut self) {
        self.games_played = 0;
        self.total_points = 0;
        self.high_score = 0;
        self.boss_kills = 0;
    }

    /// Fold a finished game into the statistics
    pub fn record_game(&mut self, points: u32, boss_killed: bool) {
        self.games_played = self.games_played.saturating_add(1);
        self.total_points = self.total_points.saturating_add(points);
        let points = u16::try_from(points).unwrap_or(u16::MAX);
        if points > self.high_score {
            self.high_score = points;
        }
        if boss_killed {
            self.boss_kills = self.boss_kills.saturating_add(1);
        }
    }

    pub fn average_score(&self) -> Option<u32> {
        (self.games_played > 0).then(|| self.total_points / u32::from(self.games_played))
    }

    /// Current values with their legal ranges, one per line
    pub fn menu(&self) -> String {
        let mut out = String::from("====== TWANG Settings Menu ========\n");
        let _ = writeln!(
            out,
            "C={} (LED count {MIN_LED_COUNT}-{MAX_LED_COUNT})",
            self.led_count
        );
        let _ = writeln!(
            out,
            "B={} (LED brightness {MIN_BRIGHTNESS}-{MAX_BRIGHTNESS})",
            self.led_brightness
        );
        let _ = writeln!(
            out,
            "S={} (sound volume {MIN_VOLUME}-{MAX_VOLUME})",
            self.audio_volume
        );
        let _ = writeln!(
            out,
            "D={} (joystick deadzone {MIN_JOYSTICK_DEADZONE}-{MAX_JOYSTICK_DEADZONE})",
            self.joystick_deadzone
        );
        let _ = writeln!(
            out,
            "A={} (attack sensitivity {MIN_ATTACK_THRESHOLD}-{MAX_ATTACK_THRESHOLD})",
            self.attack_threshold
        );
        let _ = writeln!(
            out,
            "L={} (lives per level {MIN_LIVES_PER_LEVEL}-{MAX_LIVES_PER_LEVEL})",
            self.lives_per_level
        );
        let _ = writeln!(out, "G={} (gravity past bend point 0/1)", u8::from(self.gravity));
        let _ = writeln!(out, "K={} (bend point 0-{MAX_BEND_POINT})", self.bend_point);
        out.push_str("  ? show settings\n");
        out.push_str("  R reset everything to defaults\n");
        out.push_str("  P reset play statistics\n");
        out
    }

    /// Play statistics summary
    pub fn stats_report(&self) -> String {
        let mut out = String::from("===== Play statistics ======\n");
        let _ = writeln!(out, "Games played: {}", self.games_played);
        if let Some(average) = self.average_score() {
            let _ = writeln!(out, "Average score: {average}");
        }
        let _ = writeln!(out, "High score: {}", self.high_score);
        let _ = writeln!(out, "Boss kills: {}", self.boss_kills);
        out
    }
}

fn clamp_u8(value: u16, min: u8, max: u8) -> u8 {
    // Clamped into u8 range, so the narrowing is lossless.
    value.clamp(u16::from(min), u16::from(max)) as u8
}
