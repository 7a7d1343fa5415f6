//! The save store: versioned YAML document sets under a root directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use tw_model::{GameHistory, GameSession, GameState, Location, World};

use crate::error::{StoreError, StoreResult};

/// Version written to and required from every save's marker document.
pub const SAVE_VERSION: &str = "1";

const VERSION_FILE: &str = "version.yaml";
const WORLD_FILE: &str = "world.yaml";
const STATE_FILE: &str = "state.yaml";
const HISTORY_FILE: &str = "history.yaml";
const LOCATIONS_DIR: &str = "locations";

#[derive(Debug, Serialize, Deserialize)]
struct VersionDoc {
    version: String,
}

/// Transform a display name into a filesystem-safe document name.
pub fn file_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Reads and writes session saves under a fixed root directory.
#[derive(Debug, Clone)]
pub struct SaveStore {
    root: PathBuf,
}

impl SaveStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory this store operates on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist a session under `name`, overwriting any existing save of
    /// that name.
    pub fn save(&self, name: &str, session: &GameSession) -> StoreResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let dir = self.root.join(name);
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        write_doc(
            &dir.join(VERSION_FILE),
            &VersionDoc {
                version: SAVE_VERSION.to_string(),
            },
        )?;
        write_doc(&dir.join(WORLD_FILE), &session.world)?;
        write_doc(&dir.join(STATE_FILE), &session.state)?;
        write_doc(&dir.join(HISTORY_FILE), &session.history)?;

        if !session.locations.is_empty() {
            let loc_dir = dir.join(LOCATIONS_DIR);
            fs::create_dir_all(&loc_dir).map_err(|source| StoreError::Io {
                path: loc_dir.clone(),
                source,
            })?;
            for (loc_name, location) in &session.locations {
                let file = loc_dir.join(format!("{}.yaml", file_slug(loc_name)));
                write_doc(&file, location)?;
            }
        }

        Ok(())
    }

    /// Load the session saved under `name`.
    ///
    /// The version marker is a hard gate: a missing or mismatched marker
    /// fails the load outright — there is no migration.
    pub fn load(&self, name: &str) -> StoreResult<GameSession> {
        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Err(StoreError::NotFound(name.to_string()));
        }

        let version_path = dir.join(VERSION_FILE);
        if !version_path.is_file() {
            return Err(StoreError::VersionMissing(name.to_string()));
        }
        let version: VersionDoc = read_doc(&version_path)?;
        if version.version != SAVE_VERSION {
            return Err(StoreError::VersionMismatch {
                found: version.version,
                expected: SAVE_VERSION.to_string(),
            });
        }

        let world: World = read_doc(&dir.join(WORLD_FILE))?;
        let state: GameState = read_doc(&dir.join(STATE_FILE))?;
        let history: GameHistory = read_doc(&dir.join(HISTORY_FILE))?;

        let mut session = GameSession {
            world,
            state,
            history,
            ..Default::default()
        };

        let loc_dir = dir.join(LOCATIONS_DIR);
        if loc_dir.is_dir() {
            let entries = fs::read_dir(&loc_dir).map_err(|source| StoreError::Io {
                path: loc_dir.clone(),
                source,
            })?;
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                    continue;
                }
                // Stray or unreadable location documents are skipped, not
                // fatal: the rest of the save is still playable.
                match read_doc::<Location>(&path) {
                    Ok(location) => session.insert_location(location),
                    Err(err) => {
                        warn!(path = %path.display(), %err, "skipping location document");
                    }
                }
            }
        }

        Ok(session)
    }

    /// Names of all valid saves, sorted.
    ///
    /// A subdirectory counts as a save only if it carries a version marker.
    pub fn list(&self) -> StoreResult<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && path.join(VERSION_FILE).is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

fn write_doc<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let yaml = serde_yaml::to_string(value).map_err(|source| StoreError::Document {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, yaml).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_doc<T: for<'de> Deserialize<'de>>(path: &Path) -> StoreResult<T> {
    let data = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&data).map_err(|source| StoreError::Document {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;
    use tw_model::{HistoryEntry, Polarity, TurnStatus};

    use super::*;

    fn sample_session() -> GameSession {
        let mut stats = BTreeMap::new();
        stats.insert("health".to_string(), "100".to_string());
        stats.insert("dread".to_string(), "rising".to_string());

        let mut session = GameSession {
            world: World {
                title: "The Hollow Light".to_string(),
                short_name: "hollow-light".to_string(),
                description: "A lighthouse at the end of a drowned causeway.".to_string(),
                possibilities: vec!["explore".to_string(), "talk to the keeper".to_string()],
                state_schema: "health and dread".to_string(),
                win_conditions: "Relight the lamp".to_string(),
                lose_conditions: "Dread reaches the brim".to_string(),
                ..Default::default()
            },
            state: GameState {
                inventory: vec!["brass key".to_string()],
                stats,
                current_location: "Lamp Room".to_string(),
                health: "100".to_string(),
                progress: "10%".to_string(),
            },
            history: GameHistory {
                summary: "You came ashore at dusk.".to_string(),
                entries: vec![HistoryEntry {
                    player_action: "climb the stairs".to_string(),
                    outcome: "The stairs groan but hold.".to_string(),
                    status: TurnStatus::Playing,
                    inventory: vec!["brass key".to_string()],
                    ..Default::default()
                }],
            },
            ..Default::default()
        };
        session.world.stat_display_names.insert("dread".to_string(), "Dread".to_string());
        session.world.stat_polarity.insert("dread".to_string(), Polarity::Bad);
        session.insert_location(Location {
            name: "Lamp Room".to_string(),
            description: "Glass on three sides, salt on all of them.".to_string(),
            people: vec!["the keeper".to_string()],
            objects: vec!["dead lamp".to_string()],
        });
        session
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path());
        let session = sample_session();

        store.save("hollow-light", &session).unwrap();
        let loaded = store.load("hollow-light").unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn empty_name_rejected() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path());
        let err = store.save("  ", &sample_session()).unwrap_err();
        assert!(matches!(err, StoreError::EmptyName));
    }

    #[test]
    fn missing_save_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path());
        let err = store.load("nope").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn missing_version_marker_fails() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path());
        fs::create_dir_all(dir.path().join("old-save")).unwrap();
        let err = store.load("old-save").unwrap_err();
        assert!(matches!(err, StoreError::VersionMissing(_)));
    }

    #[test]
    fn version_mismatch_fails() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path());
        store.save("game", &sample_session()).unwrap();
        fs::write(dir.path().join("game").join(VERSION_FILE), "version: \"0\"\n").unwrap();
        let err = store.load("game").unwrap_err();
        match err {
            StoreError::VersionMismatch { found, expected } => {
                assert_eq!(found, "0");
                assert_eq!(expected, SAVE_VERSION);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn list_skips_unmarked_directories() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path());
        store.save("beta", &sample_session()).unwrap();
        store.save("alpha", &sample_session()).unwrap();
        fs::create_dir_all(dir.path().join("not-a-save")).unwrap();

        assert_eq!(store.list().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn list_without_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path().join("never-created"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn corrupt_location_document_is_skipped() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path());
        store.save("game", &sample_session()).unwrap();
        let loc_dir = dir.path().join("game").join(LOCATIONS_DIR);
        fs::write(loc_dir.join("broken.yaml"), ": : not yaml : :").unwrap();

        let loaded = store.load("game").unwrap();
        assert_eq!(loaded.locations.len(), 1);
        assert!(loaded.locations.contains_key("Lamp Room"));
    }

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(file_slug("Lamp Room"), "lamp-room");
        assert_eq!(file_slug("Drowned Causeway East"), "drowned-causeway-east");
    }
}
