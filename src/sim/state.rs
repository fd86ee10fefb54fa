//! World state and core simulation types
//!
//! Everything one run owns lives in `World`. A world is created fresh when a
//! level starts and dropped when the run ends; nothing carries over.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::difficulty_for_level;
use crate::platform::Key;

/// Packed `0xRRGGBB` colour. Cosmetic only, never read by gameplay logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const PLAYER: Color = Color(0x3b82f6);
    pub const PROJECTILE: Color = Color(0xfbbf24);
    pub const BOSS_SHOT: Color = Color(0xef4444);

    /// CSS-style `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{:06x}", self.0 & 0xff_ffff)
    }
}

/// Coarse entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Boss,
    Projectile,
    Particle,
    Pickup,
    /// Boss-fired hazard; lives in the enemy collection
    Obstacle,
}

/// Ordinary enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    /// Eases toward the player's vertical centre (level 2+)
    Tracker,
}

/// Pickup archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Spread,
    Rapid,
    Shield,
    Health,
}

/// Boss variant, one per level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossStyle {
    /// Level 1 heavy hull
    Tank,
    /// Level 2 flying saucer
    Saucer,
    /// Level 3 spiked destroyer, fires three-way volleys
    Spiky,
}

/// Behavioural sub-kind of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    Enemy(EnemyKind),
    Pickup(PickupKind),
    Boss(BossStyle),
}

/// Player weapon mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponMode {
    #[default]
    Normal,
    Spread,
    Rapid,
}

/// The unit of simulation. Physics uses the bounding box for every kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub color: Color,
    pub hp: f32,
    pub max_hp: Option<f32>,
    pub kind: EntityKind,
    pub archetype: Option<Archetype>,
    /// Set during resolution, purged at end of step
    pub remove: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, pos: Vec2, size: Vec2, vel: Vec2, color: Color, hp: f32) -> Self {
        Self {
            pos,
            size,
            vel,
            color,
            hp,
            max_hp: None,
            kind,
            archetype: None,
            remove: false,
        }
    }

    pub fn with_archetype(mut self, archetype: Archetype) -> Self {
        self.archetype = Some(archetype);
        self
    }

    pub fn with_max_hp(mut self, max_hp: f32) -> Self {
        self.max_hp = Some(max_hp);
        self
    }

    /// Fresh player ship at the left of the playfield, vertically centred
    pub fn player(height: f32) -> Self {
        Self::new(
            EntityKind::Player,
            Vec2::new(PLAYER_START_X, height / 2.0),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            Vec2::ZERO,
            Color::PLAYER,
            PLAYER_BASE_HP,
        )
        .with_max_hp(PLAYER_BASE_HP)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn enemy_kind(&self) -> Option<EnemyKind> {
        match self.archetype {
            Some(Archetype::Enemy(kind)) => Some(kind),
            _ => None,
        }
    }

    pub fn pickup_kind(&self) -> Option<PickupKind> {
        match self.archetype {
            Some(Archetype::Pickup(kind)) => Some(kind),
            _ => None,
        }
    }

    pub fn boss_style(&self) -> Option<BossStyle> {
        match self.archetype {
            Some(Archetype::Boss(style)) => Some(style),
            _ => None,
        }
    }

    /// Damages the player on contact and can be shot
    pub fn is_hostile(&self) -> bool {
        matches!(
            self.kind,
            EntityKind::Enemy | EntityKind::Boss | EntityKind::Obstacle
        )
    }
}

/// Held directional/fire keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl InputFlags {
    /// Record a press or release. Pause is a command, not a held flag.
    pub fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Up => self.up = pressed,
            Key::Down => self.down = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Fire => self.fire = pressed,
            Key::Pause => {}
        }
    }
}

/// Background star (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

/// Background asteroid (cosmetic)
#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    /// Centre of the polygon
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Outline relative to `pos`
    pub points: Vec<Vec2>,
    pub color: Color,
}

/// Complete state of one live run
#[derive(Debug, Clone)]
pub struct World {
    /// Selected level (1..=MAX_LEVEL), fixed for the run
    pub level: u8,
    /// Playfield bounds
    pub width: f32,
    pub height: f32,
    pub player: Entity,
    /// Ordinary enemies, the boss and boss-fired obstacles
    pub enemies: Vec<Entity>,
    pub projectiles: Vec<Entity>,
    pub particles: Vec<Entity>,
    pub pickups: Vec<Entity>,
    pub stars: Vec<Star>,
    pub asteroids: Vec<Asteroid>,
    /// Scenery is built lazily on the first step
    pub scenery_ready: bool,
    pub input: InputFlags,
    /// Timestamp (ms) of the last shot, `None` before the first
    pub last_shot: Option<f64>,
    /// Minimum ms between shots
    pub fire_rate: f64,
    pub weapon: WeaponMode,
    pub boss_active: bool,
    pub score: u64,
    /// Steps taken this run
    pub frame: u64,
    /// Per-level multiplier on enemy stats and boss fire rate
    pub difficulty: f32,
    /// Oldest particles are dropped beyond this many
    pub max_particles: usize,
    /// (score, hp, max_hp) as of the last report
    pub(crate) last_reported: Option<(u64, f32, f32)>,
}

impl World {
    /// Create a fresh world for `level` on a `width` x `height` playfield
    pub fn new(level: u8, width: f32, height: f32) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        Self {
            level,
            width,
            height,
            player: Entity::player(height),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            pickups: Vec::new(),
            stars: Vec::new(),
            asteroids: Vec::new(),
            scenery_ready: false,
            input: InputFlags::default(),
            last_shot: None,
            fire_rate: BASE_FIRE_RATE_MS,
            weapon: WeaponMode::Normal,
            boss_active: false,
            score: 0,
            frame: 0,
            difficulty: difficulty_for_level(level),
            max_particles: usize::MAX,
            last_reported: None,
        }
    }

    pub fn with_particle_cap(mut self, cap: usize) -> Self {
        self.max_particles = cap;
        self
    }

    /// Player's current maximum hp (100, or 200 when shielded)
    pub fn max_hp(&self) -> f32 {
        self.player.max_hp.unwrap_or(PLAYER_BASE_HP)
    }

    pub fn has_boss(&self) -> bool {
        self.enemies.iter().any(|e| e.kind == EntityKind::Boss && !e.remove)
    }

    pub fn boss(&self) -> Option<&Entity> {
        self.enemies.iter().find(|e| e.kind == EntityKind::Boss)
    }

    /// Add a particle, evicting the oldest when at the cap
    pub fn push_particle(&mut self, particle: Entity) {
        if self.max_particles == 0 {
            return;
        }
        let excess = (self.particles.len() + 1).saturating_sub(self.max_particles);
        if excess > 0 {
            self.particles.drain(..excess);
        }
        self.particles.push(particle);
    }

    /// New playfield size; keeps the player inside the new bounds
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.player.pos.x = self.player.pos.x.clamp(0.0, (width - self.player.size.x).max(0.0));
        self.player.pos.y = self.player.pos.y.clamp(0.0, (height - self.player.size.y).max(0.0));
    }

    /// Drop every flagged entity and recompute the boss flag
    pub fn purge_removed(&mut self) {
        self.enemies.retain(|e| !e.remove);
        self.projectiles.retain(|p| !p.remove);
        self.particles.retain(|p| !p.remove);
        self.pickups.retain(|p| !p.remove);
        self.boss_active = self.enemies.iter().any(|e| e.kind == EntityKind::Boss);
    }
}
