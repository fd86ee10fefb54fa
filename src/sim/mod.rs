//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - One owned `World` per run, advanced by `step` once per display frame
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (insertion order of each collection)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rng;
pub mod scenery;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionSummary, rect_intersect, resolve_collisions};
pub use rng::{RandomSource, ScriptedSource};
pub use spawn::EnemyStats;
pub use state::{
    Archetype, Asteroid, BossStyle, Color, EnemyKind, Entity, EntityKind, InputFlags, PickupKind,
    Star, WeaponMode, World,
};
pub use tick::{RunOutcome, StepReport, step};
