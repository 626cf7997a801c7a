//! JSON file store.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/players.json            saved player roster
//! <data_dir>/encounters/<id>.json    one file per encounter bundle
//! ```
//!
//! Writes go to a temp file in the target directory and are renamed into
//! place, so readers see either the old document or the new one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::error::{StorageError, StorageResult};
use super::models::{is_valid_encounter_id, EncounterBundle, EncounterSummary};
use super::CombatStore;
use crate::core::session::Participant;

const PLAYERS_FILE: &str = "players.json";
const ENCOUNTERS_DIR: &str = "encounters";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        let encounters = root.join(ENCOUNTERS_DIR);
        fs::create_dir_all(&encounters).map_err(|e| {
            StorageError::init(format!("cannot create {}: {e}", encounters.display()))
        })?;
        log::debug!("Encounter store ready at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn players_path(&self) -> PathBuf {
        self.root.join(PLAYERS_FILE)
    }

    fn encounter_path(&self, id: &str) -> PathBuf {
        self.root.join(ENCOUNTERS_DIR).join(format!("{id}.json"))
    }
}

impl CombatStore for JsonFileStore {
    fn save_players(&self, players: &[Participant]) -> StorageResult<()> {
        write_json_atomic(&self.players_path(), players)
    }

    fn load_players(&self) -> StorageResult<Option<Vec<Participant>>> {
        read_json(&self.players_path())
    }

    fn save_encounter(&self, bundle: &EncounterBundle) -> StorageResult<String> {
        let id = bundle.id();
        if !is_valid_encounter_id(&id) {
            return Err(StorageError::invalid_name(&bundle.name));
        }
        write_json_atomic(&self.encounter_path(&id), bundle)?;
        Ok(id)
    }

    fn load_encounter(&self, id: &str) -> StorageResult<Option<EncounterBundle>> {
        if !is_valid_encounter_id(id) {
            return Ok(None);
        }
        read_json(&self.encounter_path(id))
    }

    fn list_encounters(&self) -> StorageResult<Vec<EncounterSummary>> {
        let dir = self.root.join(ENCOUNTERS_DIR);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match read_json::<EncounterBundle>(&path) {
                Ok(Some(bundle)) => {
                    let mut summary = bundle.summary();
                    // The file name is authoritative for loading.
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        summary.id = stem.to_string();
                    }
                    summaries.push(summary);
                }
                Ok(None) => {}
                Err(e) => log::warn!("Skipping unreadable encounter {}: {e}", path.display()),
            }
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}

// ============================================================================
// File helpers
// ============================================================================

fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| StorageError::write(path, e.error))?;
    Ok(())
}
