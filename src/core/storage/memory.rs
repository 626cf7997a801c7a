//! In-process store. Nothing survives a restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::error::{StorageError, StorageResult};
use super::models::{is_valid_encounter_id, EncounterBundle, EncounterSummary};
use super::CombatStore;
use crate::core::session::Participant;

#[derive(Debug, Default)]
struct Documents {
    players: Option<Vec<Participant>>,
    encounters: HashMap<String, EncounterBundle>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Documents>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self) -> MutexGuard<'_, Documents> {
        // A panic while holding the lock cannot leave a half-written
        // document: every write is a single assignment.
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CombatStore for MemoryStore {
    fn save_players(&self, players: &[Participant]) -> StorageResult<()> {
        self.documents().players = Some(players.to_vec());
        Ok(())
    }

    fn load_players(&self) -> StorageResult<Option<Vec<Participant>>> {
        Ok(self.documents().players.clone())
    }

    fn save_encounter(&self, bundle: &EncounterBundle) -> StorageResult<String> {
        let id = bundle.id();
        if !is_valid_encounter_id(&id) {
            return Err(StorageError::invalid_name(&bundle.name));
        }
        self.documents().encounters.insert(id.clone(), bundle.clone());
        Ok(id)
    }

    fn load_encounter(&self, id: &str) -> StorageResult<Option<EncounterBundle>> {
        Ok(self.documents().encounters.get(id).cloned())
    }

    fn list_encounters(&self) -> StorageResult<Vec<EncounterSummary>> {
        let mut summaries: Vec<EncounterSummary> = self
            .documents()
            .encounters
            .values()
            .map(EncounterBundle::summary)
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}
