//! Gift Shooter headless demo
//!
//! Plays through the levels with a simple autopilot and persists progress.
//! Usage: `gift-shooter [settings.json]` (`RUST_LOG=info` for run logs).

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;

    use gift_shooter::consts::MAX_LEVEL;
    use gift_shooter::platform::{InputEvent, Key};
    use gift_shooter::sim::{EntityKind, RandomSource, World};
    use gift_shooter::{
        CommandOutcome, JsonFileProgress, ProgressStore, RunCommand, RunPhase, Session, Settings,
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up on a run after five simulated minutes
    const MAX_FRAMES_PER_RUN: u32 = 60 * 60 * 5;
    const MAX_ATTEMPTS_PER_LEVEL: u32 = 3;
    /// Dead zone for vertical tracking, in px
    const AIM_SLACK: f32 = 8.0;

    /// Hold fire and line up with the nearest hostile
    fn autopilot(world: &World) -> [(Key, bool); 3] {
        let me = world.player.center();
        let target = world
            .enemies
            .iter()
            .filter(|e| !e.remove && e.kind != EntityKind::Obstacle && e.pos.x > me.x)
            .min_by(|a, b| {
                let da = a.center().distance_squared(me);
                let db = b.center().distance_squared(me);
                da.total_cmp(&db)
            })
            .map(|e| e.center().y);

        let (up, down) = match target {
            Some(y) if y < me.y - AIM_SLACK => (true, false),
            Some(y) if y > me.y + AIM_SLACK => (false, true),
            _ => (false, false),
        };
        [(Key::Fire, true), (Key::Up, up), (Key::Down, down)]
    }

    /// Drive one run to its end. Returns the terminal phase.
    fn play_run<S: ProgressStore, R: RandomSource>(
        session: &mut Session<S, R>,
        now_ms: &mut f64,
    ) -> RunPhase {
        for _ in 0..MAX_FRAMES_PER_RUN {
            if let Some(world) = session.world() {
                for (key, held) in autopilot(world) {
                    let event = if held {
                        InputEvent::Pressed(key)
                    } else {
                        InputEvent::Released(key)
                    };
                    session.input(event);
                }
            }

            *now_ms += FRAME_MS;
            if let Some(report) = session.frame(*now_ms) {
                if report.changed {
                    log::debug!(
                        "score {} hp {}/{}",
                        report.score,
                        report.hp,
                        report.max_hp
                    );
                }
            }
            if session.phase() != RunPhase::Active {
                return session.phase();
            }
        }

        log::warn!("Run timed out, abandoning");
        session.handle(RunCommand::TogglePause);
        session.handle(RunCommand::Abandon);
        RunPhase::Selecting
    }

    pub fn run() {
        let settings_path = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("gift_shooter_settings.json"));
        let settings = Settings::load_from(&settings_path);
        let store = JsonFileProgress::new(settings.progress_path.clone());
        log::info!(
            "Progress file: {} ({}x{}, quality {})",
            store.path().display(),
            settings.width,
            settings.height,
            settings.quality.as_str()
        );

        let mut session = Session::new(store, settings);
        let mut now_ms = 0.0;

        while session.unlocked_level() <= MAX_LEVEL {
            let level = session.unlocked_level();
            if session.handle(RunCommand::SelectLevel(level)) != CommandOutcome::Applied {
                break;
            }

            let mut attempts = 1;
            loop {
                match play_run(&mut session, &mut now_ms) {
                    RunPhase::Victorious => {
                        let score = session.world().map_or(0, |w| w.score);
                        log::info!("Level {} cleared with score {}", level, score);
                        session.handle(RunCommand::Continue);
                        break;
                    }
                    RunPhase::Defeated if attempts < MAX_ATTEMPTS_PER_LEVEL => {
                        log::info!("Level {} lost (attempt {}), retrying", level, attempts);
                        attempts += 1;
                        session.handle(RunCommand::Retry);
                    }
                    RunPhase::Defeated => {
                        log::info!("Level {} lost {} times, giving up", level, attempts);
                        session.handle(RunCommand::Abandon);
                        break;
                    }
                    _ => break,
                }
            }

            if session.unlocked_level() <= level {
                break;
            }
        }

        log::info!("Demo finished, unlocked level {}", session.unlocked_level());
        session.handle(RunCommand::Exit);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gift Shooter (headless) starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is driven by the host page; nothing to run here
}
