//! Per-frame render view
//!
//! Built from a `World` without mutating it. The presentation layer draws
//! sprites layer by layer, back to front; the core never draws.

use serde::Serialize;

use crate::consts::{BOSS_SCORE_THRESHOLD, PLAYER_BASE_HP};
use crate::run::RunPhase;
use crate::sim::{Archetype, BossStyle, Color, Entity, EntityKind, WeaponMode, World};

/// Draw order, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Layer {
    Stars,
    Asteroids,
    Pickups,
    Enemies,
    Projectiles,
    Player,
    Particles,
}

/// Background gradient and asteroid tint for a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub top: String,
    pub bottom: String,
    pub asteroid: Option<String>,
}

impl Palette {
    pub fn for_level(level: u8) -> Self {
        let (top, bottom, asteroid) = match level {
            2 => (0x0f0524, 0x2e1065, Some(0x4c1d95)),
            3 => (0x1c0505, 0x450a0a, Some(0x7c2d12)),
            _ => (0x020617, 0x0f172a, None),
        };
        Self {
            top: Color(top).hex(),
            bottom: Color(bottom).hex(),
            asteroid: asteroid.map(|c| Color(c).hex()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    /// Axis-aligned box, tagged with what it represents
    Body {
        kind: EntityKind,
        archetype: Option<Archetype>,
    },
    Star,
    /// Closed outline relative to the sprite centre
    Polygon { points: Vec<[f32; 2]> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub layer: Layer,
    pub shape: Shape,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: String,
    pub rotation: f32,
}

impl Sprite {
    fn body(layer: Layer, e: &Entity) -> Self {
        Self {
            layer,
            shape: Shape::Body {
                kind: e.kind,
                archetype: e.archetype,
            },
            x: e.pos.x,
            y: e.pos.y,
            w: e.size.x,
            h: e.size.y,
            color: e.color.hex(),
            rotation: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BossBar {
    pub style: BossStyle,
    pub hp: f32,
    pub max_hp: f32,
}

impl BossBar {
    /// Remaining fraction in [0, 1]
    pub fn fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }
}

/// Everything the renderer and HUD need for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub phase: RunPhase,
    pub level: u8,
    pub score: u64,
    pub boss_threshold: u64,
    pub hp: f32,
    pub max_hp: f32,
    pub shielded: bool,
    pub weapon: WeaponMode,
    pub boss: Option<BossBar>,
    pub palette: Palette,
    pub width: f32,
    pub height: f32,
    /// Sorted by layer
    pub sprites: Vec<Sprite>,
}

impl FrameSnapshot {
    pub fn capture(phase: RunPhase, world: &World, starfield: bool) -> Self {
        let mut sprites = Vec::with_capacity(
            world.stars.len()
                + world.asteroids.len()
                + world.pickups.len()
                + world.enemies.len()
                + world.projectiles.len()
                + world.particles.len()
                + 1,
        );

        if starfield {
            sprites.extend(world.stars.iter().map(|s| Sprite {
                layer: Layer::Stars,
                shape: Shape::Star,
                x: s.pos.x,
                y: s.pos.y,
                w: s.size,
                h: s.size,
                color: "#ffffff".to_string(),
                rotation: 0.0,
            }));
        }

        sprites.extend(world.asteroids.iter().map(|a| Sprite {
            layer: Layer::Asteroids,
            shape: Shape::Polygon {
                points: a.points.iter().map(|p| [p.x, p.y]).collect(),
            },
            x: a.pos.x,
            y: a.pos.y,
            w: a.size * 2.0,
            h: a.size * 2.0,
            color: a.color.hex(),
            rotation: a.rotation,
        }));

        let live = |e: &&Entity| !e.remove;
        sprites.extend(world.pickups.iter().filter(live).map(|e| Sprite::body(Layer::Pickups, e)));
        sprites.extend(world.enemies.iter().filter(live).map(|e| Sprite::body(Layer::Enemies, e)));
        sprites.extend(
            world
                .projectiles
                .iter()
                .filter(live)
                .map(|e| Sprite::body(Layer::Projectiles, e)),
        );
        sprites.push(Sprite::body(Layer::Player, &world.player));
        sprites.extend(
            world
                .particles
                .iter()
                .filter(live)
                .map(|e| Sprite::body(Layer::Particles, e)),
        );

        let boss = world.boss().map(|b| BossBar {
            style: b.boss_style().unwrap_or(BossStyle::Tank),
            hp: b.hp.max(0.0),
            max_hp: b.max_hp.unwrap_or(b.hp),
        });

        Self {
            phase,
            level: world.level,
            score: world.score,
            boss_threshold: BOSS_SCORE_THRESHOLD,
            hp: world.player.hp,
            max_hp: world.max_hp(),
            shielded: world.max_hp() > PLAYER_BASE_HP,
            weapon: world.weapon,
            boss,
            palette: Palette::for_level(world.level),
            width: world.width,
            height: world.height,
            sprites,
        }
    }

    /// Progress toward the boss, in [0, 1]
    pub fn boss_progress(&self) -> f32 {
        if self.boss.is_some() {
            return 1.0;
        }
        (self.score as f32 / self.boss_threshold as f32).min(1.0)
    }

    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(move |s| s.layer == layer)
    }
}
