//! Versioned JSON envelope for saved progress

use serde::{Deserialize, Serialize};

use super::ProgressError;

/// Current on-disk format version
pub const PROGRESS_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEnvelope {
    pub version: u32,
    pub unlocked_level: u8,
}

impl ProgressEnvelope {
    pub fn new(unlocked_level: u8) -> Self {
        Self {
            version: PROGRESS_VERSION,
            unlocked_level,
        }
    }

    pub fn encode(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and check the version
    pub fn decode(json: &str) -> Result<Self, ProgressError> {
        let envelope: ProgressEnvelope = serde_json::from_str(json)?;
        if envelope.version != PROGRESS_VERSION {
            return Err(ProgressError::UnsupportedVersion {
                found: envelope.version,
                expected: PROGRESS_VERSION,
            });
        }
        Ok(envelope)
    }
}
