//! Spawn director
//!
//! Decides when and what to introduce: enemy waves, the boss, boss volleys,
//! pickup drops and explosion particles. Also applies collected pickups.

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{
    Archetype, BossStyle, Color, EnemyKind, Entity, EntityKind, PickupKind, WeaponMode, World,
};
use crate::consts::*;

/// Fixed per-archetype enemy stats before difficulty scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub size: Vec2,
    pub hp: f32,
    /// Leftward speed (px/frame)
    pub speed: f32,
    pub color: Color,
}

impl EnemyKind {
    /// Pick an archetype from one uniform draw `r` in `[0, 1)`.
    ///
    /// Roughly 55% basic, 15% fast, 15% tank and 15% tracker; the tracker
    /// share falls back to basic before level 2.
    pub fn roll(r: f32, level: u8) -> Self {
        if r > 0.55 && r < 0.70 {
            EnemyKind::Fast
        } else if (0.70..0.85).contains(&r) {
            EnemyKind::Tank
        } else if r >= 0.85 && level >= 2 {
            EnemyKind::Tracker
        } else {
            EnemyKind::Basic
        }
    }

    pub fn stats(&self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                size: Vec2::new(30.0, 30.0),
                hp: 1.0,
                speed: 3.0,
                color: Color(0xef4444),
            },
            EnemyKind::Fast => EnemyStats {
                size: Vec2::new(20.0, 15.0),
                hp: 1.0,
                speed: 6.0,
                color: Color(0xf97316),
            },
            EnemyKind::Tank => EnemyStats {
                size: Vec2::new(50.0, 50.0),
                hp: 5.0,
                speed: 1.5,
                color: Color(0xa855f7),
            },
            EnemyKind::Tracker => EnemyStats {
                size: Vec2::new(25.0, 25.0),
                hp: 2.0,
                speed: 4.0,
                color: Color(0x06b6d4),
            },
        }
    }
}

impl BossStyle {
    pub fn for_level(level: u8) -> Self {
        match level {
            2 => BossStyle::Saucer,
            3 => BossStyle::Spiky,
            _ => BossStyle::Tank,
        }
    }

    /// Hit points. Level 3 is deliberately below a naive 150.
    pub fn hp(&self) -> f32 {
        match self {
            BossStyle::Tank => 60.0,
            BossStyle::Saucer => 100.0,
            BossStyle::Spiky => 120.0,
        }
    }

    pub fn size(&self) -> Vec2 {
        match self {
            BossStyle::Spiky => Vec2::splat(180.0),
            BossStyle::Tank | BossStyle::Saucer => Vec2::splat(150.0),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            BossStyle::Tank => Color(0xdc2626),
            BossStyle::Saucer => Color(0x7e22ce),
            BossStyle::Spiky => Color(0xf59e0b),
        }
    }

    /// Per-frame fire probability before difficulty scaling
    pub fn fire_chance(&self) -> f32 {
        match self {
            BossStyle::Saucer => 0.05,
            BossStyle::Tank | BossStyle::Spiky => 0.02,
        }
    }
}

impl PickupKind {
    /// 30% spread, 30% rapid, 20% shield, 20% health
    pub fn roll(r: f32) -> Self {
        if r < 0.3 {
            PickupKind::Spread
        } else if r < 0.6 {
            PickupKind::Rapid
        } else if r < 0.8 {
            PickupKind::Shield
        } else {
            PickupKind::Health
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PickupKind::Spread => Color(0xfde047),
            PickupKind::Rapid => Color(0x22d3ee),
            PickupKind::Shield => Color(0x60a5fa),
            PickupKind::Health => Color(0x22c55e),
        }
    }
}

/// Run the director for the current frame. `world.frame` must already be
/// advanced for this step.
pub fn direct<R: RandomSource + ?Sized>(world: &mut World, rng: &mut R) {
    if world.boss_active {
        return;
    }

    if world.frame % WAVE_INTERVAL_FRAMES == 0 {
        let count = (1 + world.score / WAVE_SCORE_STEP).min(MAX_WAVE_SIZE);
        log::debug!("Frame {}: wave of {} (score {})", world.frame, count, world.score);
        for _ in 0..count {
            spawn_enemy(world, rng);
        }
    }

    if world.score >= BOSS_SCORE_THRESHOLD && !world.has_boss() {
        spawn_boss(world);
    }
}

/// Spawn one ordinary enemy just beyond the right edge
pub fn spawn_enemy<R: RandomSource + ?Sized>(world: &mut World, rng: &mut R) {
    let kind = EnemyKind::roll(rng.unit(), world.level);
    let stats = kind.stats();
    let m = world.difficulty;
    let y = rng.unit() * (world.height - stats.size.y).max(0.0);

    world.enemies.push(
        Entity::new(
            EntityKind::Enemy,
            Vec2::new(world.width + 50.0, y),
            stats.size,
            Vec2::new(-stats.speed * m, 0.0),
            stats.color,
            stats.hp * m,
        )
        .with_archetype(Archetype::Enemy(kind)),
    );
}

/// Spawn the level boss and enter the boss phase
pub fn spawn_boss(world: &mut World) {
    let style = BossStyle::for_level(world.level);
    let size = style.size();
    let hp = style.hp();

    world.enemies.push(
        Entity::new(
            EntityKind::Boss,
            Vec2::new(world.width + 100.0, world.height / 2.0 - size.y / 2.0),
            size,
            Vec2::new(-2.0, 2.0),
            style.color(),
            hp,
        )
        .with_max_hp(hp)
        .with_archetype(Archetype::Boss(style)),
    );
    world.boss_active = true;
    log::info!("Boss {:?} spawned on level {} (hp {})", style, world.level, hp);
}

/// Roll this frame's boss shot. Returns the obstacles to add (possibly none).
pub fn boss_volley<R: RandomSource + ?Sized>(
    boss: &Entity,
    difficulty: f32,
    rng: &mut R,
) -> Vec<Entity> {
    let Some(style) = boss.boss_style() else {
        return Vec::new();
    };
    if !rng.chance(style.fire_chance() * difficulty) {
        return Vec::new();
    }

    let muzzle = Vec2::new(boss.pos.x, boss.pos.y + boss.size.y / 2.0);
    match style {
        BossStyle::Spiky => [0.0, 2.0, -2.0]
            .into_iter()
            .map(|vy| {
                Entity::new(
                    EntityKind::Obstacle,
                    muzzle,
                    Vec2::splat(15.0),
                    Vec2::new(-5.0, vy),
                    Color::PROJECTILE,
                    1.0,
                )
            })
            .collect(),
        BossStyle::Tank | BossStyle::Saucer => vec![Entity::new(
            EntityKind::Obstacle,
            muzzle,
            Vec2::splat(20.0),
            Vec2::new(-4.0, rng.range(-3.0, 3.0)),
            Color::BOSS_SHOT,
            1.0,
        )],
    }
}

/// Maybe drop a pickup where an enemy died
pub fn maybe_drop_pickup<R: RandomSource + ?Sized>(world: &mut World, at: Vec2, rng: &mut R) {
    if !rng.chance(PICKUP_DROP_CHANCE) {
        return;
    }
    let kind = PickupKind::roll(rng.unit());
    world.pickups.push(
        Entity::new(
            EntityKind::Pickup,
            at,
            Vec2::splat(20.0),
            Vec2::new(-2.0, 0.0),
            kind.color(),
            1.0,
        )
        .with_archetype(Archetype::Pickup(kind)),
    );
}

/// Burst of `count` particles at `at`
pub fn spawn_explosion<R: RandomSource + ?Sized>(
    world: &mut World,
    at: Vec2,
    color: Color,
    count: usize,
    rng: &mut R,
) {
    for _ in 0..count {
        let vel = Vec2::new(rng.range(-5.0, 5.0), rng.range(-5.0, 5.0));
        world.push_particle(Entity::new(
            EntityKind::Particle,
            at,
            Vec2::splat(PARTICLE_SIZE),
            vel,
            color,
            1.0,
        ));
    }
}

/// Apply a collected pickup to the player
pub fn apply_pickup(world: &mut World, kind: PickupKind) {
    match kind {
        PickupKind::Shield => {
            world.player.max_hp = Some(PLAYER_SHIELDED_HP);
            world.player.hp = PLAYER_SHIELDED_HP;
        }
        PickupKind::Health => {
            world.player.hp = world.max_hp();
        }
        PickupKind::Spread => {
            world.weapon = WeaponMode::Spread;
            world.fire_rate = BASE_FIRE_RATE_MS;
        }
        PickupKind::Rapid => {
            world.weapon = WeaponMode::Rapid;
            world.fire_rate = RAPID_FIRE_RATE_MS;
        }
    }
}
