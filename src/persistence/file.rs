//! JSON file progress store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::envelope::ProgressEnvelope;
use super::{ProgressError, ProgressStore};

/// Progress kept in a single JSON file. Writes go to `<file>.tmp` first and
/// are renamed over the real file, so a crash never leaves a half-written save.
#[derive(Debug, Clone)]
pub struct JsonFileProgress {
    path: PathBuf,
}

impl JsonFileProgress {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl ProgressStore for JsonFileProgress {
    fn load_unlocked(&self) -> Result<Option<u8>, ProgressError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope = ProgressEnvelope::decode(&json)?;
        Ok(Some(envelope.unlocked_level))
    }

    fn save_unlocked(&mut self, level: u8) -> Result<(), ProgressError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = ProgressEnvelope::new(level).encode()?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("Progress saved: level {} unlocked", level);
        Ok(())
    }
}
