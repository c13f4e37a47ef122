//! File-backed persistence for [`SharedState`]

use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::SharedState;

/// Reads and atomically replaces the shared state file
#[derive(Clone, Debug)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current state
    ///
    /// A missing or unreadable file is treated as the empty state.
    pub fn load(&self) -> SharedState {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("State file {} missing, starting empty", self.path.display());
                return SharedState::empty();
            }
            Err(e) => {
                tracing::warn!("Failed to read state file {}: {}", self.path.display(), e);
                return SharedState::empty();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    "Malformed state file {}, treating as empty: {}",
                    self.path.display(),
                    e
                );
                SharedState::empty()
            }
        }
    }

    /// Replace the state file with `state`
    ///
    /// Writes a uniquely named sibling temp file, flushes it to disk, then
    /// renames it over the target so readers see either the old or the new
    /// contents. Concurrent writers each get their own temp file; the last
    /// rename wins.
    pub fn save(&self, state: &SharedState) -> Result<()> {
        let content = serde_json::to_string_pretty(state)?;

        let dir = self.dir();
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(
            "Saved {} ({} active, {} completed)",
            self.path.display(),
            state.active_negotiations.len(),
            state.completed_negotiations.len()
        );
        Ok(())
    }

    /// Overwrite with the initial empty state
    pub fn reset(&self) -> Result<SharedState> {
        let state = SharedState::empty();
        self.save(&state)?;
        Ok(state)
    }

    /// Directory holding the state file, `.` for a bare file name
    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Listing;
    use crate::negotiation::Negotiation;
    use crate::types::{AgentId, NegotiationId};

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("negotiations.json"));

        assert_eq!(store.load(), SharedState::empty());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("negotiations.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(StateStore::new(&path).load(), SharedState::empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state").join("negotiations.json"));

        let mut state = SharedState::empty();
        state.put(Negotiation::new(
            NegotiationId::from("neg_1_abcd"),
            &Listing::new("1", "Widget", "Electronics", 120, 80),
            AgentId::from("buyer_001"),
            AgentId::from("seller_001"),
            100,
        ));
        store.save(&state).unwrap();

        assert_eq!(store.load(), state);
        let leftovers = fs::read_dir(store.dir()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_reset_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("negotiations.json");
        fs::write(&path, r#"{"active_negotiations": 5}"#).unwrap();

        let store = StateStore::new(&path);
        store.reset().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["active_negotiations"], serde_json::json!({}));
    }

    #[test]
    fn test_bare_file_name_uses_current_dir() {
        let store = StateStore::new("negotiations.json");
        assert_eq!(store.dir(), Path::new("."));
    }

    #[test]
    fn test_concurrent_saves_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("negotiations.json");

        let handles: Vec<_> = (0..2u64)
            .map(|n| {
                let store = StateStore::new(&path);
                std::thread::spawn(move || {
                    let mut state = SharedState::empty();
                    state.put(Negotiation::new(
                        NegotiationId(format!("neg_{}_abcd", n)),
                        &Listing::new("1", "Widget", "Electronics", 120, 80),
                        AgentId::from("buyer_001"),
                        AgentId::from("seller_001"),
                        100,
                    ));
                    for _ in 0..50 {
                        store.save(&state)?;
                    }
                    Ok::<_, crate::error::HaggleError>(())
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let state = StateStore::new(&path).load();
        assert_eq!(state.active_negotiations.len(), 1);
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
