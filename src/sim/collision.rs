//! Collision detection and damage resolution
//!
//! Every entity collides by its axis-aligned bounding box, including the
//! ones drawn as circles. Resolution marks entities for removal; nothing is
//! purged here, so iteration never sees a collection shrink mid-pass.

use glam::Vec2;

use super::rng::RandomSource;
use super::spawn::{apply_pickup, maybe_drop_pickup, spawn_explosion};
use super::state::{Color, Entity, EntityKind, PickupKind, World};
use crate::consts::*;

/// What happened during one frame's resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionSummary {
    /// Overlapping hostiles that damaged the player
    pub player_hits: u32,
    /// Hostiles destroyed by projectiles
    pub kills: u32,
    pub pickups_collected: u32,
    pub boss_defeated: bool,
}

/// Inclusive axis-aligned rectangle overlap (touching edges collide)
#[inline]
pub fn rect_intersect(a: &Entity, b: &Entity) -> bool {
    a.pos.x <= b.right() && a.right() >= b.pos.x && a.pos.y <= b.bottom() && a.bottom() >= b.pos.y
}

/// Deferred visual burst (spawned after the borrowing passes finish)
struct Burst {
    at: Vec2,
    color: Color,
    count: usize,
}

/// Resolve all overlaps for this frame
pub fn resolve_collisions<R: RandomSource + ?Sized>(
    world: &mut World,
    rng: &mut R,
) -> CollisionSummary {
    let mut summary = CollisionSummary::default();
    let mut bursts: Vec<Burst> = Vec::new();

    player_vs_hostiles(world, &mut summary, &mut bursts);
    collect_pickups(world, &mut summary);
    let drops = projectiles_vs_hostiles(world, &mut summary, &mut bursts);

    for at in drops {
        maybe_drop_pickup(world, at, rng);
    }
    for burst in bursts {
        spawn_explosion(world, burst.at, burst.color, burst.count, rng);
    }

    summary
}

/// Contact damage. Re-applies every frame the overlap persists.
fn player_vs_hostiles(world: &mut World, summary: &mut CollisionSummary, bursts: &mut Vec<Burst>) {
    let player = &mut world.player;
    for enemy in world.enemies.iter_mut() {
        if enemy.remove || !enemy.is_hostile() || !rect_intersect(player, enemy) {
            continue;
        }
        player.hp -= CONTACT_DAMAGE;
        summary.player_hits += 1;
        bursts.push(Burst {
            at: player.pos,
            color: player.color,
            count: 20,
        });

        if enemy.kind != EntityKind::Boss {
            enemy.remove = true;
            bursts.push(Burst {
                at: enemy.pos,
                color: enemy.color,
                count: 10,
            });
        }
    }
}

fn collect_pickups(world: &mut World, summary: &mut CollisionSummary) {
    let mut collected: Vec<PickupKind> = Vec::new();
    for pickup in world.pickups.iter_mut() {
        if pickup.remove || !rect_intersect(&world.player, pickup) {
            continue;
        }
        pickup.remove = true;
        if let Some(kind) = pickup.pickup_kind() {
            collected.push(kind);
        }
    }

    for kind in collected {
        apply_pickup(world, kind);
        summary.pickups_collected += 1;
    }
}

/// Returns kill positions that may drop a pickup
fn projectiles_vs_hostiles(
    world: &mut World,
    summary: &mut CollisionSummary,
    bursts: &mut Vec<Burst>,
) -> Vec<Vec2> {
    let mut drops = Vec::new();

    for shot in world.projectiles.iter_mut() {
        for target in world.enemies.iter_mut() {
            if shot.remove || target.remove || !target.is_hostile() {
                continue;
            }
            if !rect_intersect(shot, target) {
                continue;
            }

            shot.remove = true;
            target.hp -= 1.0;

            if target.hp <= 0.0 {
                target.remove = true;
                let is_boss = target.kind == EntityKind::Boss;
                world.score += if is_boss { BOSS_KILL_SCORE } else { KILL_SCORE };
                summary.kills += 1;
                drops.push(target.pos);
                bursts.push(Burst {
                    at: target.pos,
                    color: target.color,
                    count: if is_boss { 50 } else { 10 },
                });
                if is_boss {
                    summary.boss_defeated = true;
                    log::info!("Boss destroyed on level {}", world.level);
                }
            } else {
                bursts.push(Burst {
                    at: shot.pos,
                    color: Color::PROJECTILE,
                    count: 2,
                });
            }
        }
    }

    drops
}
