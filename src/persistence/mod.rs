//! Unlocked-level progress store
//!
//! The only state that outlives a run is a single integer: the highest
//! level the player may select. Stores:
//! - `MemoryProgress`: in-process, for tests and as a fallback
//! - `JsonFileProgress`: versioned JSON envelope on disk, tmp-then-rename writes

pub mod envelope;
pub mod file;

pub use envelope::{PROGRESS_VERSION, ProgressEnvelope};
pub use file::JsonFileProgress;

use crate::consts::MAX_LEVEL;

/// Errors from reading or writing progress
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("progress I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("progress data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported progress version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Persistent "highest unlocked level" integer
pub trait ProgressStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load_unlocked(&self) -> Result<Option<u8>, ProgressError>;

    fn save_unlocked(&mut self, level: u8) -> Result<(), ProgressError>;
}

/// Valid range of the unlocked counter: 1 through one past the last level
/// (every level completed).
pub fn clamp_unlocked(level: u8) -> u8 {
    level.clamp(1, MAX_LEVEL + 1)
}

/// Read the unlocked level, defaulting to 1 when absent or unreadable
pub fn load_or_default<S: ProgressStore + ?Sized>(store: &S) -> u8 {
    match store.load_unlocked() {
        Ok(Some(level)) => clamp_unlocked(level),
        Ok(None) => 1,
        Err(e) => {
            log::warn!("Could not read progress ({}), starting at level 1", e);
            1
        }
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryProgress {
    pub unlocked: Option<u8>,
    /// Number of successful saves
    pub writes: u32,
}

impl MemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unlocked(level: u8) -> Self {
        Self {
            unlocked: Some(level),
            writes: 0,
        }
    }
}

impl ProgressStore for MemoryProgress {
    fn load_unlocked(&self) -> Result<Option<u8>, ProgressError> {
        Ok(self.unlocked)
    }

    fn save_unlocked(&mut self, level: u8) -> Result<(), ProgressError> {
        self.unlocked = Some(level);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl ProgressStore for Broken {
        fn load_unlocked(&self) -> Result<Option<u8>, ProgressError> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn save_unlocked(&mut self, _level: u8) -> Result<(), ProgressError> {
            Err(std::io::Error::other("disk on fire").into())
        }
    }

    #[test]
    fn test_defaults_to_level_one() {
        assert_eq!(load_or_default(&MemoryProgress::new()), 1);
        assert_eq!(load_or_default(&Broken), 1);
    }

    #[test]
    fn test_loaded_value_clamped() {
        assert_eq!(load_or_default(&MemoryProgress::with_unlocked(0)), 1);
        assert_eq!(load_or_default(&MemoryProgress::with_unlocked(3)), 3);
        assert_eq!(load_or_default(&MemoryProgress::with_unlocked(200)), MAX_LEVEL + 1);
    }

    #[test]
    fn test_memory_counts_writes() {
        let mut store = MemoryProgress::new();
        store.save_unlocked(2).expect("memory save");
        assert_eq!(store.unlocked, Some(2));
        assert_eq!(store.writes, 1);
    }
}
