use gift_shooter::consts::*;
use gift_shooter::platform::{InputEvent, Key};
use gift_shooter::sim::{
    Archetype, BossStyle, Color, EnemyKind, Entity, EntityKind, RunOutcome, ScriptedSource,
    WeaponMode, World, spawn,
};
use gift_shooter::{
    CommandOutcome, MemoryProgress, RunCommand, RunPhase, Session, Settings,
};

use glam::Vec2;

type TestSession = Session<MemoryProgress, ScriptedSource>;

const FRAME_MS: f64 = 1000.0 / 60.0;

/// 0.9 sits above every drop and boss-fire chance
fn session_with(store: MemoryProgress) -> TestSession {
    Session::with_rng(store, Settings::default(), ScriptedSource::constant(0.9))
}

fn active_on(level: u8, store: MemoryProgress) -> TestSession {
    let mut s = session_with(store);
    assert_eq!(s.handle(RunCommand::SelectLevel(level)), CommandOutcome::Applied);
    s
}

fn world(s: &mut TestSession) -> &mut World {
    s.world_mut().expect("active run has a world")
}

/// Put a 1-hp boss in the path of a projectile
fn stage_lethal_boss_hit(w: &mut World) {
    spawn::spawn_boss(w);
    let boss = w
        .enemies
        .iter_mut()
        .find(|e| e.kind == EntityKind::Boss)
        .expect("boss spawned");
    boss.pos = Vec2::new(500.0, 300.0);
    boss.hp = 1.0;
    w.projectiles.push(Entity::new(
        EntityKind::Projectile,
        Vec2::new(510.0, 340.0),
        Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
        Vec2::new(PROJECTILE_SPEED, 0.0),
        Color::PROJECTILE,
        1.0,
    ));
}

fn win_current_level(s: &mut TestSession) {
    stage_lethal_boss_hit(world(s));
    let report = s.frame(0.0).expect("active step");
    assert_eq!(report.outcome, Some(RunOutcome::Victory));
    assert_eq!(s.handle(RunCommand::Continue), CommandOutcome::Applied);
}

// ── scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn scenario_a_first_wave_after_sixty_frames() {
    let mut s = active_on(1, MemoryProgress::new());
    s.input(InputEvent::Pressed(Key::Fire));

    let mut now = 0.0;
    for _ in 0..60 {
        now += FRAME_MS;
        s.frame(now);
    }
    let w = s.world().expect("world");
    assert!(w.enemies.iter().any(|e| e.kind == EntityKind::Enemy));
    assert!(!w.projectiles.is_empty());
}

#[test]
fn scenario_b_contact_damage() {
    let mut s = active_on(1, MemoryProgress::new());
    let w = world(&mut s);
    let at = w.player.pos;
    w.enemies.push(
        Entity::new(
            EntityKind::Enemy,
            at,
            Vec2::new(30.0, 30.0),
            Vec2::ZERO,
            Color(0xef4444),
            1.0,
        )
        .with_archetype(Archetype::Enemy(EnemyKind::Basic)),
    );

    let report = s.frame(0.0).expect("active step");
    assert_eq!((report.hp, report.max_hp), (80.0, 100.0));
    assert!(report.changed);
    assert!(s.world().expect("world").enemies.is_empty());
}

#[test]
fn scenario_c_boss_arrives_at_threshold() {
    let mut s = active_on(2, MemoryProgress::with_unlocked(2));
    world(&mut s).score = BOSS_SCORE_THRESHOLD;

    s.frame(0.0);
    let w = s.world().expect("world");
    let bosses: Vec<_> = w.enemies.iter().filter(|e| e.kind == EntityKind::Boss).collect();
    assert_eq!(bosses.len(), 1);
    assert_eq!(bosses[0].hp, 100.0);
    assert_eq!(bosses[0].boss_style(), Some(BossStyle::Saucer));
    assert!(w.boss_active);
}

#[test]
fn scenario_d_boss_kill_is_victory() {
    let mut s = active_on(1, MemoryProgress::new());
    world(&mut s).score = 1200;
    stage_lethal_boss_hit(world(&mut s));

    let report = s.frame(0.0).expect("active step");
    assert_eq!(report.outcome, Some(RunOutcome::Victory));
    assert_eq!(report.score, 2200);
    assert_eq!(s.phase(), RunPhase::Victorious);
    let w = s.world().expect("world kept for the results screen");
    assert!(!w.boss_active);
    assert!(w.boss().is_none());
}

#[test]
fn scenario_e_pause_freezes_everything() {
    let mut s = active_on(1, MemoryProgress::new());
    s.input(InputEvent::Pressed(Key::Fire));
    let mut now = 0.0;
    for _ in 0..30 {
        now += FRAME_MS;
        s.frame(now);
    }

    s.handle(RunCommand::TogglePause);
    let before = s.world().expect("world").clone_stats();
    for _ in 0..120 {
        now += FRAME_MS;
        assert!(s.frame(now).is_none());
    }
    assert_eq!(s.world().expect("world").clone_stats(), before);

    s.handle(RunCommand::TogglePause);
    assert!(s.frame(now + FRAME_MS).is_some());
    assert_eq!(s.world().expect("world").frame, before.2 + 1);
}

/// (score, hp, frame, projectile count)
trait Stats {
    fn clone_stats(&self) -> (u64, f32, u64, usize);
}

impl Stats for World {
    fn clone_stats(&self) -> (u64, f32, u64, usize) {
        (self.score, self.player.hp, self.frame, self.projectiles.len())
    }
}

// ── run lifecycle ─────────────────────────────────────────────────────────────

#[test]
fn retry_resets_the_world() {
    let mut s = active_on(1, MemoryProgress::new());
    {
        let w = world(&mut s);
        w.score = 900;
        w.weapon = WeaponMode::Rapid;
        w.fire_rate = RAPID_FIRE_RATE_MS;
        w.player.max_hp = Some(PLAYER_SHIELDED_HP);
        w.player.hp = 0.0;
    }
    s.input(InputEvent::Pressed(Key::Fire));
    assert_eq!(s.frame(0.0).and_then(|r| r.outcome), Some(RunOutcome::Defeat));
    assert_eq!(s.handle(RunCommand::Retry), CommandOutcome::Applied);

    let w = s.world().expect("fresh world");
    assert_eq!(w.level, 1);
    assert_eq!(w.score, 0);
    assert_eq!((w.player.hp, w.max_hp()), (100.0, 100.0));
    assert_eq!(w.weapon, WeaponMode::Normal);
    assert_eq!(w.fire_rate, BASE_FIRE_RATE_MS);
    assert!(w.enemies.is_empty() && w.projectiles.is_empty());
    assert!(w.particles.is_empty() && w.pickups.is_empty());
    assert!(!w.boss_active);
    assert!(!w.input.fire);
}

#[test]
fn defeat_outcome_reported_once() {
    let mut s = active_on(1, MemoryProgress::new());
    world(&mut s).player.hp = 0.0;
    assert_eq!(s.frame(0.0).and_then(|r| r.outcome), Some(RunOutcome::Defeat));
    assert!(s.frame(FRAME_MS).is_none());
    assert_eq!(s.phase(), RunPhase::Defeated);
    assert_eq!(s.handle(RunCommand::Continue), CommandOutcome::Ignored);
    assert_eq!(s.handle(RunCommand::Abandon), CommandOutcome::Applied);
    assert_eq!(s.phase(), RunPhase::Selecting);
}

#[test]
fn completing_frontier_level_unlocks_next_once() {
    let mut s = active_on(1, MemoryProgress::new());
    win_current_level(&mut s);
    assert_eq!(s.unlocked_level(), 2);
    assert_eq!(s.store().writes, 1);
    assert_eq!(s.store().unlocked, Some(2));

    // Replaying an already-beaten level changes nothing
    s.handle(RunCommand::SelectLevel(1));
    win_current_level(&mut s);
    assert_eq!(s.unlocked_level(), 2);
    assert_eq!(s.store().writes, 1);

    s.handle(RunCommand::SelectLevel(2));
    win_current_level(&mut s);
    assert_eq!(s.unlocked_level(), 3);
    assert_eq!(s.store().unlocked, Some(3));
}

#[test]
fn beating_the_last_level_marks_everything_complete() {
    let mut s = active_on(3, MemoryProgress::with_unlocked(3));
    win_current_level(&mut s);
    assert_eq!(s.unlocked_level(), MAX_LEVEL + 1);
    assert_eq!(s.handle(RunCommand::SelectLevel(4)), CommandOutcome::Ignored);
    assert_eq!(s.handle(RunCommand::SelectLevel(3)), CommandOutcome::Applied);
}

#[test]
fn stored_progress_is_read_at_start() {
    let s = session_with(MemoryProgress::with_unlocked(3));
    assert_eq!(s.unlocked_level(), 3);
}

#[test]
fn exit_leaves_the_screen() {
    let mut s = session_with(MemoryProgress::new());
    assert_eq!(s.handle(RunCommand::Exit), CommandOutcome::ExitScreen);

    let mut s = active_on(1, MemoryProgress::new());
    assert_eq!(s.handle(RunCommand::Exit), CommandOutcome::Ignored);
    s.handle(RunCommand::TogglePause);
    assert_eq!(s.handle(RunCommand::Exit), CommandOutcome::ExitScreen);
}

#[test]
fn snapshot_tracks_phase_and_level() {
    let mut s = active_on(2, MemoryProgress::with_unlocked(2));
    s.frame(0.0);
    s.handle(RunCommand::TogglePause);
    let snap = s.snapshot().expect("snapshot during a run");
    assert_eq!(snap.phase, RunPhase::Paused);
    assert_eq!(snap.level, 2);
    assert_eq!(snap.palette.top, "#0f0524");

    s.handle(RunCommand::Abandon);
    assert!(s.snapshot().is_none());
}
