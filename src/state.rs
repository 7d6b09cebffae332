// ---------------------------------------------------------------------------
// State persistence — the whole tree as one versioned JSON blob.
// ---------------------------------------------------------------------------

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FsError;
use crate::fs::FileSystem;
use crate::node::Directory;

/// Bumped whenever the on-disk shape of the tree changes incompatibly.
pub const STATE_SCHEMA: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StateBlob {
    schema: u32,
    root: Directory,
}

impl FileSystem {
    /// Serialize the full live tree, by value, to `target`.
    pub fn save_state(&self, target: &Path) -> Result<(), FsError> {
        let blob = StateBlob {
            schema: STATE_SCHEMA,
            root: self.root().clone(),
        };
        let raw = serde_json::to_string(&blob)?;
        std::fs::write(target, raw)?;
        Ok(())
    }

    /// Rebuild a tree from a previously saved blob, replacing nothing until
    /// parsing succeeds. Malformed input and foreign schema versions are
    /// `CorruptState`; a missing file stays `Io` so callers can treat it as
    /// a fresh start.
    pub fn load_state(target: &Path) -> Result<FileSystem, FsError> {
        let raw = std::fs::read_to_string(target)?;
        let blob: StateBlob = serde_json::from_str(&raw)
            .map_err(|e| FsError::CorruptState(format!("Unreadable state blob: {}", e)))?;
        if blob.schema != STATE_SCHEMA {
            return Err(FsError::CorruptState(format!(
                "Unsupported schema version {} (expected {})",
                blob.schema, STATE_SCHEMA
            )));
        }
        Ok(FileSystem::from_root(blob.root))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
