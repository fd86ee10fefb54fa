//! Gift Shooter - the arcade shooter screen of a personal gift app
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (world state, spawning, collisions, step)
//! - `run`: Level selection / run state machine and progression unlocking
//! - `snapshot`: Read-only per-frame view for an external renderer
//! - `platform`: Key name mapping for the presentation layer
//! - `persistence`: Unlocked-level progress store
//! - `settings`: Playfield size, quality preset, seed, file paths

pub mod persistence;
pub mod platform;
pub mod run;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use persistence::{JsonFileProgress, MemoryProgress, ProgressError, ProgressStore};
pub use run::{CommandOutcome, LevelStatus, RunCommand, RunPhase, Session};
pub use settings::{QualityPreset, Settings};
pub use snapshot::FrameSnapshot;

/// Game configuration constants
pub mod consts {
    /// Highest selectable level
    pub const MAX_LEVEL: u8 = 3;

    /// Default playfield dimensions
    pub const DEFAULT_WIDTH: f32 = 1000.0;
    pub const DEFAULT_HEIGHT: f32 = 700.0;

    /// Player ship
    pub const PLAYER_SPEED: f32 = 6.0; // px per frame per held direction
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_BASE_HP: f32 = 100.0;
    pub const PLAYER_SHIELDED_HP: f32 = 200.0;
    /// Damage per overlapping enemy per frame
    pub const CONTACT_DAMAGE: f32 = 20.0;

    /// Weapons (milliseconds between shots)
    pub const BASE_FIRE_RATE_MS: f64 = 250.0;
    pub const RAPID_FIRE_RATE_MS: f64 = 80.0;
    pub const PROJECTILE_WIDTH: f32 = 15.0;
    pub const PROJECTILE_HEIGHT: f32 = 8.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;
    /// Vertical speed of the angled spread shots
    pub const SPREAD_VY: f32 = 2.0;

    /// Spawning
    pub const WAVE_INTERVAL_FRAMES: u64 = 60;
    pub const WAVE_SCORE_STEP: u64 = 800;
    pub const MAX_WAVE_SIZE: u64 = 4;
    pub const BOSS_SCORE_THRESHOLD: u64 = 1000;
    /// Boss stops advancing once left of `width - BOSS_SETTLE_OFFSET`
    pub const BOSS_SETTLE_OFFSET: f32 = 300.0;
    pub const PICKUP_DROP_CHANCE: f32 = 0.3;

    /// Scoring
    pub const KILL_SCORE: u64 = 50;
    pub const BOSS_KILL_SCORE: u64 = 1000;

    /// Particles
    pub const PARTICLE_SIZE: f32 = 4.0;
    pub const PARTICLE_DECAY: f32 = 0.95;
    pub const PARTICLE_MIN_SIZE: f32 = 0.5;

    /// Scenery
    pub const STAR_COUNT: usize = 100;
    /// Star scroll multiplier during the boss phase
    pub const BOSS_STAR_SPEED: f32 = 5.0;
}

/// Difficulty multiplier for a level (1.2, 1.4, 1.6)
#[inline]
pub fn difficulty_for_level(level: u8) -> f32 {
    1.0 + level as f32 * 0.2
}
