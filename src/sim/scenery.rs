//! Decorative background: stars and asteroids. No gameplay interaction.

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Asteroid, Color, Star, World};
use crate::consts::*;

/// Asteroid count and tint for a level (none on level 1)
pub fn asteroid_field(level: u8) -> Option<(usize, Color)> {
    match level {
        2 => Some((5, Color(0x4c1d95))),
        3 => Some((12, Color(0x7c2d12))),
        _ => None,
    }
}

/// Build the star and asteroid fields for the world's level
pub fn init<R: RandomSource + ?Sized>(world: &mut World, rng: &mut R) {
    let (w, h) = (world.width, world.height);

    world.stars = (0..STAR_COUNT)
        .map(|_| Star {
            pos: Vec2::new(rng.unit() * w, rng.unit() * h),
            size: rng.range(0.5, 2.5),
            speed: rng.range(0.5, 3.5),
        })
        .collect();

    world.asteroids.clear();
    if let Some((count, color)) = asteroid_field(world.level) {
        for _ in 0..count {
            let sides = 5 + (rng.unit() * 4.0) as usize;
            let points = (0..sides)
                .map(|j| {
                    let angle = j as f32 / sides as f32 * std::f32::consts::TAU;
                    let radius = rng.range(20.0, 40.0);
                    Vec2::new(angle.cos(), angle.sin()) * radius
                })
                .collect();
            world.asteroids.push(Asteroid {
                pos: Vec2::new(rng.unit() * w, rng.unit() * h),
                size: rng.range(30.0, 70.0),
                speed: rng.range(0.2, 0.7),
                rotation: rng.unit() * std::f32::consts::PI,
                rotation_speed: rng.range(-0.01, 0.01),
                points,
                color,
            });
        }
    }

    world.scenery_ready = true;
}

/// Scroll the background one frame, wrapping at the left edge
pub fn scroll<R: RandomSource + ?Sized>(world: &mut World, rng: &mut R) {
    let speed_mult = if world.boss_active { BOSS_STAR_SPEED } else { 1.0 };
    for star in world.stars.iter_mut() {
        star.pos.x -= star.speed * speed_mult;
        if star.pos.x < 0.0 {
            star.pos.x = world.width;
        }
    }

    for asteroid in world.asteroids.iter_mut() {
        asteroid.pos.x -= asteroid.speed;
        asteroid.rotation += asteroid.rotation_speed;
        if asteroid.pos.x + 100.0 < 0.0 {
            asteroid.pos.x = world.width + 100.0;
            asteroid.pos.y = rng.unit() * world.height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_field_sizes_per_level() {
        let mut rng = Pcg32::seed_from_u64(1);
        for (level, asteroids) in [(1, 0), (2, 5), (3, 12)] {
            let mut world = World::new(level, 1000.0, 700.0);
            init(&mut world, &mut rng);
            assert!(world.scenery_ready);
            assert_eq!(world.stars.len(), STAR_COUNT);
            assert_eq!(world.asteroids.len(), asteroids);
            assert!(world.asteroids.iter().all(|a| (5..=8).contains(&a.points.len())));
        }
    }

    #[test]
    fn test_stars_wrap() {
        let mut world = World::new(1, 1000.0, 700.0);
        world.stars.push(Star {
            pos: Vec2::new(1.0, 5.0),
            size: 1.0,
            speed: 2.0,
        });
        let mut rng = Pcg32::seed_from_u64(1);
        scroll(&mut world, &mut rng);
        assert_eq!(world.stars[0].pos.x, 1000.0);
    }

    #[test]
    fn test_stars_rush_during_boss_phase() {
        let mut world = World::new(1, 1000.0, 700.0);
        world.boss_active = true;
        world.stars.push(Star {
            pos: Vec2::new(500.0, 5.0),
            size: 1.0,
            speed: 2.0,
        });
        let mut rng = Pcg32::seed_from_u64(1);
        scroll(&mut world, &mut rng);
        assert_eq!(world.stars[0].pos.x, 490.0);
    }
}
