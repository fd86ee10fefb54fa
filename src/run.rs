//! Level selection and run state machine
//!
//! A `Session` is the shooter screen: it owns the progress store, the random
//! source and (while a run exists) the `World`. The simulation only advances
//! in `Active`; every other phase turns `frame` into a no-op.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_LEVEL;
use crate::persistence::{ProgressStore, load_or_default};
use crate::platform::{InputEvent, Key};
use crate::settings::Settings;
use crate::sim::{RandomSource, RunOutcome, StepReport, World, step};
use crate::snapshot::FrameSnapshot;

/// Screen mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Level menu (initial state on screen entry)
    Selecting,
    /// Simulation running
    Active,
    Paused,
    /// Player ship destroyed
    Defeated,
    /// Boss destroyed
    Victorious,
}

/// Discrete commands from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunCommand {
    SelectLevel(u8),
    TogglePause,
    Resume,
    /// Drop the current run and return to the level menu
    Abandon,
    /// Restart the same level after a defeat
    Retry,
    /// Acknowledge a victory and return to the level menu
    Continue,
    /// Leave the shooter screen entirely
    Exit,
}

/// Result of handling a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// Not valid in the current phase; nothing changed
    Ignored,
    /// The caller should navigate away from the shooter screen
    ExitScreen,
}

/// How a level appears on the selection menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStatus {
    Locked,
    Unlocked,
    Completed,
}

/// The shooter screen
pub struct Session<S: ProgressStore, R: RandomSource = Pcg32> {
    phase: RunPhase,
    level: u8,
    unlocked: u8,
    world: Option<World>,
    last_report: Option<StepReport>,
    store: S,
    rng: R,
    settings: Settings,
}

impl<S: ProgressStore> Session<S, Pcg32> {
    /// Create a session with a `Pcg32` seeded from settings or entropy
    pub fn new(store: S, settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Session RNG seed: {}", seed);
        Self::with_rng(store, settings, Pcg32::seed_from_u64(seed))
    }
}

impl<S: ProgressStore, R: RandomSource> Session<S, R> {
    /// Create a session with an injected random source. Reads the unlocked
    /// level once; an unreadable store means level 1.
    pub fn with_rng(store: S, settings: Settings, rng: R) -> Self {
        let unlocked = load_or_default(&store);
        Self {
            phase: RunPhase::Selecting,
            level: 1,
            unlocked,
            world: None,
            last_report: None,
            store,
            rng,
            settings,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Level of the current (or last) run
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn unlocked_level(&self) -> u8 {
        self.unlocked
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Mutable access for tooling and tests; gameplay goes through `frame`
    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn last_report(&self) -> Option<StepReport> {
        self.last_report
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn level_status(&self, level: u8) -> LevelStatus {
        if level > self.unlocked {
            LevelStatus::Locked
        } else if level < self.unlocked {
            LevelStatus::Completed
        } else {
            LevelStatus::Unlocked
        }
    }

    /// Apply a command
    pub fn handle(&mut self, command: RunCommand) -> CommandOutcome {
        use RunCommand::*;
        use RunPhase::*;

        match (self.phase, command) {
            (Selecting, SelectLevel(level)) => {
                if !(1..=MAX_LEVEL).contains(&level) || level > self.unlocked {
                    log::warn!(
                        "Level {} not selectable (unlocked: {})",
                        level,
                        self.unlocked
                    );
                    return CommandOutcome::Ignored;
                }
                self.start_run(level);
            }
            (Active, TogglePause) => self.phase = Paused,
            (Paused, TogglePause | Resume) => self.phase = Active,
            (Paused | Defeated, Abandon) => self.end_run(),
            (Defeated, Retry) => self.start_run(self.level),
            (Victorious, Continue) => {
                self.record_completion();
                self.end_run();
            }
            (Selecting | Paused, Exit) => {
                self.end_run();
                return CommandOutcome::ExitScreen;
            }
            _ => return CommandOutcome::Ignored,
        }
        CommandOutcome::Applied
    }

    /// Forward an input event. Held-key presses only register while
    /// `Active`; releases always register so no key stays stuck.
    pub fn input(&mut self, event: InputEvent) -> CommandOutcome {
        match event {
            InputEvent::Pressed(Key::Pause) => self.handle(RunCommand::TogglePause),
            InputEvent::Released(Key::Pause) => CommandOutcome::Ignored,
            InputEvent::Pressed(key) => {
                if self.phase != RunPhase::Active {
                    return CommandOutcome::Ignored;
                }
                match self.world.as_mut() {
                    Some(world) => {
                        world.input.set(key, true);
                        CommandOutcome::Applied
                    }
                    None => CommandOutcome::Ignored,
                }
            }
            InputEvent::Released(key) => match self.world.as_mut() {
                Some(world) => {
                    world.input.set(key, false);
                    CommandOutcome::Applied
                }
                None => CommandOutcome::Ignored,
            },
        }
    }

    /// One display tick. Steps the world only while `Active`.
    pub fn frame(&mut self, now_ms: f64) -> Option<StepReport> {
        if self.phase != RunPhase::Active {
            return None;
        }
        let world = self.world.as_mut()?;
        let report = step(world, now_ms, &mut self.rng);

        match report.outcome {
            Some(RunOutcome::Victory) => self.phase = RunPhase::Victorious,
            Some(RunOutcome::Defeat) => self.phase = RunPhase::Defeated,
            None => {}
        }
        self.last_report = Some(report);
        Some(report)
    }

    /// Resize the playfield (layout change)
    pub fn set_playfield(&mut self, width: f32, height: f32) {
        self.settings.width = width;
        self.settings.height = height;
        let (w, h) = self.settings.playfield();
        if let Some(world) = self.world.as_mut() {
            world.resize(w, h);
        }
    }

    /// Render view of the current run, if any
    pub fn snapshot(&self) -> Option<FrameSnapshot> {
        let world = self.world.as_ref()?;
        Some(FrameSnapshot::capture(
            self.phase,
            world,
            self.settings.effective_starfield(),
        ))
    }

    fn start_run(&mut self, level: u8) {
        let (w, h) = self.settings.playfield();
        self.level = level;
        self.world = Some(World::new(level, w, h).with_particle_cap(self.settings.max_particles()));
        self.last_report = None;
        self.phase = RunPhase::Active;
        log::info!("Run started: level {} ({}x{})", level, w, h);
    }

    fn end_run(&mut self) {
        self.world = None;
        self.last_report = None;
        self.phase = RunPhase::Selecting;
    }

    /// Unlock the next level when the frontier level was just beaten
    fn record_completion(&mut self) {
        if self.level != self.unlocked || self.level > MAX_LEVEL {
            return;
        }
        let next = self.unlocked.max(self.level + 1);
        self.unlocked = next;
        log::info!("Level {} complete, unlocked level {}", self.level, next);
        if let Err(e) = self.store.save_unlocked(next) {
            log::warn!("Could not save progress: {}", e);
        }
    }
}
