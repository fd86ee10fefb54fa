//! Per-frame simulation step
//!
//! Advances a `World` by exactly one display frame in a fixed order:
//! scenery, player input, firing, spawning, movement, collisions, particle
//! decay, cleanup, then stat synchronization.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::rng::RandomSource;
use super::scenery;
use super::spawn::{self, boss_volley};
use super::state::{Color, EnemyKind, Entity, EntityKind, WeaponMode, World};
use crate::consts::*;

const STRAIGHT: [f32; 1] = [0.0];
const SPREAD_ANGLES: [f32; 3] = [0.0, -SPREAD_VY, SPREAD_VY];

/// Terminal result of a run, reported by the step that caused it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

/// Externally visible stats after a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub score: u64,
    pub hp: f32,
    pub max_hp: f32,
    /// Any of score/hp/max_hp differs from the previous report
    pub changed: bool,
    pub outcome: Option<RunOutcome>,
}

/// Advance the world by one frame. `now_ms` is the frame's wall-clock time.
pub fn step<R: RandomSource + ?Sized>(world: &mut World, now_ms: f64, rng: &mut R) -> StepReport {
    if !world.scenery_ready {
        scenery::init(world, rng);
    }
    scenery::scroll(world, rng);

    move_player(world);
    fire(world, now_ms);

    world.frame += 1;
    spawn::direct(world, rng);

    advance(world, rng);

    let summary = resolve_collisions(world, rng);

    update_particles(world);
    world.purge_removed();

    synchronize(world, summary.boss_defeated)
}

/// Instantaneous movement at a fixed speed, clamped to the playfield
fn move_player(world: &mut World) {
    let input = world.input;
    let max_x = (world.width - world.player.size.x).max(0.0);
    let max_y = (world.height - world.player.size.y).max(0.0);
    let pos = &mut world.player.pos;

    if input.up {
        pos.y -= PLAYER_SPEED;
    }
    if input.down {
        pos.y += PLAYER_SPEED;
    }
    if input.left {
        pos.x -= PLAYER_SPEED;
    }
    if input.right {
        pos.x += PLAYER_SPEED;
    }
    pos.x = pos.x.clamp(0.0, max_x);
    pos.y = pos.y.clamp(0.0, max_y);
}

fn fire(world: &mut World, now_ms: f64) {
    if !world.input.fire {
        return;
    }
    let ready = match world.last_shot {
        None => true,
        Some(last) => now_ms - last >= world.fire_rate,
    };
    if !ready {
        return;
    }
    world.last_shot = Some(now_ms);

    let player = &world.player;
    let muzzle = Vec2::new(
        player.right(),
        player.pos.y + player.size.y / 2.0 - PROJECTILE_HEIGHT / 2.0,
    );
    let angles: &[f32] = match world.weapon {
        WeaponMode::Spread => &SPREAD_ANGLES,
        WeaponMode::Normal | WeaponMode::Rapid => &STRAIGHT,
    };
    for &vy in angles {
        world.projectiles.push(Entity::new(
            EntityKind::Projectile,
            muzzle,
            Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            Vec2::new(PROJECTILE_SPEED, vy),
            Color::PROJECTILE,
            1.0,
        ));
    }
}

/// Move everything by its velocity and apply archetype behaviour
fn advance<R: RandomSource + ?Sized>(world: &mut World, rng: &mut R) {
    let (width, height) = (world.width, world.height);

    for shot in world.projectiles.iter_mut() {
        shot.pos += shot.vel;
        if shot.pos.x > width {
            shot.remove = true;
        }
    }

    let target_y = world.player.center().y;
    let mut volleys: Vec<Entity> = Vec::new();
    for enemy in world.enemies.iter_mut() {
        enemy.pos += enemy.vel;

        if enemy.enemy_kind() == Some(EnemyKind::Tracker) {
            let dy = target_y - enemy.center().y;
            if dy.abs() > 5.0 {
                enemy.pos.y += 1.5 * dy.signum();
            }
        }

        if enemy.kind == EntityKind::Boss {
            if enemy.pos.x < width - BOSS_SETTLE_OFFSET {
                enemy.vel.x = 0.0;
            }
            if enemy.pos.y <= 0.0 {
                enemy.vel.y = enemy.vel.y.abs();
            } else if enemy.bottom() >= height {
                enemy.vel.y = -enemy.vel.y.abs();
            }
            // Only a settled boss fires
            if enemy.vel.x == 0.0 {
                volleys.extend(boss_volley(enemy, world.difficulty, rng));
            }
        }

        if enemy.right() < 0.0 {
            enemy.remove = true;
        }
    }
    world.enemies.extend(volleys);

    for pickup in world.pickups.iter_mut() {
        pickup.pos += pickup.vel;
        if pickup.right() < 0.0 {
            pickup.remove = true;
        }
    }
}

/// Runs after collisions, so bursts spawned this frame already move
fn update_particles(world: &mut World) {
    for particle in world.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.size *= PARTICLE_DECAY;
        if particle.size.x < PARTICLE_MIN_SIZE {
            particle.remove = true;
        }
    }
}

/// Clamp hp, detect terminal conditions and build the report
fn synchronize(world: &mut World, boss_defeated: bool) -> StepReport {
    let max_hp = world.max_hp();
    world.player.hp = world.player.hp.clamp(0.0, max_hp);
    let hp = world.player.hp;

    let outcome = if boss_defeated {
        Some(RunOutcome::Victory)
    } else if hp <= 0.0 {
        Some(RunOutcome::Defeat)
    } else {
        None
    };

    let current = (world.score, hp, max_hp);
    let changed = world.last_reported != Some(current);
    world.last_reported = Some(current);

    if let Some(outcome) = outcome {
        log::info!(
            "Run on level {} ended: {:?} (score {}, frame {})",
            world.level,
            outcome,
            world.score,
            world.frame
        );
    }

    StepReport {
        score: world.score,
        hp,
        max_hp,
        changed,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Key;
    use crate::sim::rng::ScriptedSource;
    use crate::sim::state::{Archetype, BossStyle};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Draws above every drop and boss fire chance
    fn quiet() -> ScriptedSource {
        ScriptedSource::constant(0.9)
    }

    #[test]
    fn test_first_step_builds_scenery() {
        let mut world = World::new(2, 1000.0, 700.0);
        step(&mut world, 0.0, &mut quiet());
        assert!(world.scenery_ready);
        assert_eq!(world.stars.len(), STAR_COUNT);
        assert_eq!(world.asteroids.len(), 5);
        assert_eq!(world.frame, 1);
    }

    #[test]
    fn test_player_movement_clamped() {
        let mut world = World::new(1, 1000.0, 700.0);
        world.player.pos = Vec2::new(2.0, 3.0);
        world.input.set(Key::Left, true);
        world.input.set(Key::Up, true);
        step(&mut world, 0.0, &mut quiet());
        assert_eq!(world.player.pos, Vec2::ZERO);

        world.input = Default::default();
        world.input.set(Key::Right, true);
        step(&mut world, 16.0, &mut quiet());
        assert_eq!(world.player.pos, Vec2::new(PLAYER_SPEED, 0.0));

        world.player.pos = Vec2::new(958.0, 668.0);
        world.input.set(Key::Down, true);
        step(&mut world, 32.0, &mut quiet());
        assert_eq!(world.player.pos, Vec2::new(960.0, 670.0));
    }

    #[test]
    fn test_fire_rate_gates_shots() {
        let mut world = World::new(1, 1000.0, 700.0);
        world.input.set(Key::Fire, true);

        step(&mut world, 1000.0, &mut quiet());
        assert_eq!(world.projectiles.len(), 1);
        step(&mut world, 1100.0, &mut quiet());
        assert_eq!(world.projectiles.len(), 1);
        step(&mut world, 1250.0, &mut quiet());
        assert_eq!(world.projectiles.len(), 2);
        assert_eq!(world.last_shot, Some(1250.0));
    }

    #[test]
    fn test_spread_fires_three() {
        let mut world = World::new(1, 1000.0, 700.0);
        world.weapon = WeaponMode::Spread;
        world.input.set(Key::Fire, true);
        step(&mut world, 0.0, &mut quiet());

        let mut vys: Vec<f32> = world.projectiles.iter().map(|p| p.vel.y).collect();
        vys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(vys, vec![-SPREAD_VY, 0.0, SPREAD_VY]);
    }

    #[test]
    fn test_projectile_leaves_right_edge() {
        let mut world = World::new(1, 1000.0, 700.0);
        world.projectiles.push(Entity::new(
            EntityKind::Projectile,
            Vec2::new(995.0, 10.0),
            Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            Vec2::new(PROJECTILE_SPEED, 0.0),
            Color::PROJECTILE,
            1.0,
        ));
        step(&mut world, 0.0, &mut quiet());
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_tracker_eases_toward_player() {
        let mut world = World::new(2, 1000.0, 700.0);
        let stats = EnemyKind::Tracker.stats();
        world.enemies.push(
            Entity::new(
                EntityKind::Enemy,
                Vec2::new(800.0, 100.0),
                stats.size,
                Vec2::new(-4.0, 0.0),
                stats.color,
                2.0,
            )
            .with_archetype(Archetype::Enemy(EnemyKind::Tracker)),
        );
        step(&mut world, 0.0, &mut quiet());
        assert_eq!(world.enemies[0].pos, Vec2::new(796.0, 101.5));
    }

    #[test]
    fn test_boss_settles_and_bounces() {
        let mut world = World::new(1, 1000.0, 700.0);
        spawn::spawn_boss(&mut world);
        world.enemies[0].pos = Vec2::new(701.0, 1.0);
        world.enemies[0].vel = Vec2::new(-2.0, -2.0);

        step(&mut world, 0.0, &mut quiet());
        let boss = world.boss().expect("boss");
        assert_eq!(boss.pos, Vec2::new(699.0, -1.0));
        assert_eq!(boss.vel, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_settled_boss_fires() {
        let mut world = World::new(3, 1000.0, 700.0);
        spawn::spawn_boss(&mut world);
        world.enemies[0].pos = Vec2::new(600.0, 200.0);
        world.enemies[0].vel = Vec2::new(0.0, 2.0);

        step(&mut world, 0.0, &mut ScriptedSource::constant(0.0));
        let obstacles = world
            .enemies
            .iter()
            .filter(|e| e.kind == EntityKind::Obstacle)
            .count();
        assert_eq!(obstacles, 3);
    }

    #[test]
    fn test_particles_shrink_and_expire() {
        let mut world = World::new(1, 1000.0, 700.0);
        world.particles.push(Entity::new(
            EntityKind::Particle,
            Vec2::new(10.0, 10.0),
            Vec2::splat(PARTICLE_SIZE),
            Vec2::new(1.0, 0.0),
            Color::PLAYER,
            1.0,
        ));
        step(&mut world, 0.0, &mut quiet());
        assert_eq!(world.particles[0].pos, Vec2::new(11.0, 10.0));
        assert!((world.particles[0].size.x - 3.8).abs() < 1e-5);

        for i in 0..60 {
            step(&mut world, i as f64, &mut quiet());
        }
        assert!(world.particles.is_empty());
    }

    #[test]
    fn test_fresh_burst_moves_in_spawn_frame() {
        let mut world = World::new(1, 1000.0, 700.0);
        let p = world.player.pos;
        world.enemies.push(Entity::new(
            EntityKind::Enemy,
            p,
            Vec2::splat(30.0),
            Vec2::ZERO,
            Color(0xef4444),
            1.0,
        ));
        step(&mut world, 0.0, &mut quiet());

        // 0.9 draws give every spark velocity (4, 4)
        let spark = &world.particles[0];
        assert_eq!(spark.pos, p + Vec2::splat(4.0));
        assert!((spark.size.x - PARTICLE_SIZE * PARTICLE_DECAY).abs() < 1e-5);
    }

    #[test]
    fn test_pickup_discarded_off_screen() {
        let mut world = World::new(1, 1000.0, 700.0);
        world.pickups.push(
            Entity::new(
                EntityKind::Pickup,
                Vec2::new(-19.0, 10.0),
                Vec2::splat(20.0),
                Vec2::new(-2.0, 0.0),
                Color(0x22c55e),
                1.0,
            )
            .with_archetype(Archetype::Pickup(crate::sim::PickupKind::Health)),
        );
        step(&mut world, 0.0, &mut quiet());
        assert!(world.pickups.is_empty());
    }

    #[test]
    fn test_report_changed_flag() {
        let mut world = World::new(1, 1000.0, 700.0);
        let first = step(&mut world, 0.0, &mut quiet());
        assert!(first.changed);
        let second = step(&mut world, 16.0, &mut quiet());
        assert!(!second.changed);
        assert_eq!(second.outcome, None);
    }

    #[test]
    fn test_defeat_clamps_hp() {
        let mut world = World::new(1, 1000.0, 700.0);
        world.player.hp = 10.0;
        let p = world.player.pos;
        world.enemies.push(Entity::new(
            EntityKind::Enemy,
            p,
            Vec2::splat(30.0),
            Vec2::ZERO,
            Color(0xef4444),
            1.0,
        ));
        let report = step(&mut world, 0.0, &mut quiet());
        assert_eq!(report.hp, 0.0);
        assert_eq!(report.outcome, Some(RunOutcome::Defeat));
    }

    #[test]
    fn test_boss_kill_is_victory() {
        let mut world = World::new(1, 1000.0, 700.0);
        spawn::spawn_boss(&mut world);
        world.enemies[0].pos = Vec2::new(600.0, 200.0);
        world.enemies[0].vel = Vec2::ZERO;
        world.enemies[0].hp = 1.0;
        world.score = 1000;
        world.projectiles.push(Entity::new(
            EntityKind::Projectile,
            Vec2::new(590.0, 250.0),
            Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            Vec2::new(PROJECTILE_SPEED, 0.0),
            Color::PROJECTILE,
            1.0,
        ));

        let report = step(&mut world, 0.0, &mut quiet());
        assert_eq!(report.outcome, Some(RunOutcome::Victory));
        assert_eq!(report.score, 2000);
        assert!(!world.boss_active);
        assert!(world.boss().is_none());
        assert_eq!(
            world.enemies.iter().filter(|e| e.boss_style() == Some(BossStyle::Tank)).count(),
            0
        );
    }

    #[test]
    fn test_seeded_runs_match() {
        let mut a = World::new(2, 1000.0, 700.0);
        let mut b = World::new(2, 1000.0, 700.0);
        let mut rng_a = Pcg32::seed_from_u64(99);
        let mut rng_b = Pcg32::seed_from_u64(99);
        a.input.set(Key::Fire, true);
        b.input.set(Key::Fire, true);

        for i in 0..300 {
            let now = i as f64 * 16.0;
            let ra = step(&mut a, now, &mut rng_a);
            let rb = step(&mut b, now, &mut rng_b);
            assert_eq!(ra, rb);
        }
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.score, b.score);
    }
}
