//! Initiative Tracker Service
//!
//! The shared session object handed to request handlers. Each command takes
//! the session lock once, so a command that reads and then writes the roster
//! or the turn pointer can never interleave with another one. Mutating
//! commands hand back an [`Applied`] carrying the snapshot taken before the
//! lock is released.
//!
//! Store calls happen inside the same critical section. They are small,
//! synchronous file operations for a single game master.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::core::session::{
    Category, CombatRules, CombatSnapshot, CombatState, D20Roller, InitiativeRoller, Participant,
    Role,
};
use crate::core::storage::{CombatStore, EncounterBundle, EncounterSummary, StorageResult};

/// A command's return value and the state it left behind, read under the
/// same lock.
#[derive(Debug, Clone)]
pub struct Applied<T> {
    pub outcome: T,
    pub state: CombatSnapshot,
}

impl<T> Applied<T> {
    fn new(outcome: T, combat: &CombatState) -> Self {
        Self {
            outcome,
            state: combat.snapshot(),
        }
    }
}

struct Session {
    combat: CombatState,
    roller: Box<dyn InitiativeRoller>,
}

pub struct InitiativeTracker {
    session: Mutex<Session>,
    store: Arc<dyn CombatStore>,
}

impl InitiativeTracker {
    /// Tracker rolling real dice.
    pub fn new(rules: CombatRules, store: Arc<dyn CombatStore>) -> Self {
        Self::with_roller(rules, store, Box::new(D20Roller::new()))
    }

    /// Tracker with a caller-supplied dice source (scripted in tests).
    pub fn with_roller(
        rules: CombatRules,
        store: Arc<dyn CombatStore>,
        roller: Box<dyn InitiativeRoller>,
    ) -> Self {
        Self {
            session: Mutex::new(Session {
                combat: CombatState::new(rules),
                roller,
            }),
            store,
        }
    }

    pub async fn snapshot(&self) -> CombatSnapshot {
        self.session.lock().await.combat.snapshot()
    }

    // ========================================================================
    // Roster commands
    // ========================================================================

    pub async fn add_participant(
        &self,
        name: &str,
        role: Role,
        category: Category,
    ) -> Applied<Option<usize>> {
        let mut session = self.session.lock().await;
        let index = session.combat.add_participant(name, role, category);
        match index {
            Some(i) => log::info!("Added {role:?} {:?} at position {i}", name.trim()),
            None => log::debug!("Ignored participant with blank name"),
        }
        Applied::new(index, &session.combat)
    }

    pub async fn remove_participant(&self, index: usize) -> Applied<Option<Participant>> {
        let mut session = self.session.lock().await;
        let removed = session.combat.remove_participant(index);
        if let Some(p) = &removed {
            log::info!("Removed {:?} from position {index}", p.name);
        }
        Applied::new(removed, &session.combat)
    }

    pub async fn add_wound(&self, index: usize) -> Applied<Option<u32>> {
        let mut session = self.session.lock().await;
        let wounds = session.combat.add_wound(index);
        Applied::new(wounds, &session.combat)
    }

    pub async fn remove_wound(&self, index: usize) -> Applied<Option<u32>> {
        let mut session = self.session.lock().await;
        let wounds = session.combat.remove_wound(index);
        Applied::new(wounds, &session.combat)
    }

    pub async fn set_player_initiative(&self, index: usize, raw: &str) -> Applied<bool> {
        let mut session = self.session.lock().await;
        let accepted = session.combat.set_player_initiative(index, raw);
        Applied::new(accepted, &session.combat)
    }

    /// Apply every player entry, then sort once. Returns how many were accepted.
    pub async fn set_player_initiatives(&self, entries: Vec<(usize, String)>) -> Applied<usize> {
        let submitted = entries.len();
        let mut session = self.session.lock().await;
        let applied = session.combat.set_player_initiatives(entries);
        log::debug!("Applied {applied}/{submitted} player initiative entries");
        Applied::new(applied, &session.combat)
    }

    // ========================================================================
    // Turn flow
    // ========================================================================

    pub async fn advance_turn(&self) -> Applied<Option<usize>> {
        let mut session = self.session.lock().await;
        let current = session.combat.advance_turn();
        Applied::new(current, &session.combat)
    }

    pub async fn start_new_round(&self) -> Applied<Option<usize>> {
        let mut session = self.session.lock().await;
        let Session { combat, roller } = &mut *session;
        let current = combat.start_new_round(&mut **roller);
        log::info!("Round {} started, first turn: {current:?}", combat.round());
        Applied::new(current, combat)
    }

    pub async fn reset_combat(&self) -> Applied<()> {
        let mut session = self.session.lock().await;
        session.combat.reset_combat();
        log::info!("Combat reset, players kept");
        Applied::new((), &session.combat)
    }

    pub async fn reset_all(&self) -> Applied<()> {
        let mut session = self.session.lock().await;
        session.combat.reset_all();
        log::info!("Roster cleared");
        Applied::new((), &session.combat)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Save every player currently in the roster. Returns how many were saved.
    pub async fn save_players(&self) -> StorageResult<usize> {
        let session = self.session.lock().await;
        let players = session.combat.with_role(Role::Player);
        self.store.save_players(&players)?;
        log::info!("Saved {} players", players.len());
        Ok(players.len())
    }

    /// Replace live players with the saved roster. `false` when nothing was saved.
    pub async fn load_players(&self) -> StorageResult<Applied<bool>> {
        let mut session = self.session.lock().await;
        let Some(players) = self.store.load_players()? else {
            log::info!("No saved players to load");
            return Ok(Applied::new(false, &session.combat));
        };
        log::info!("Loaded {} players", players.len());
        session.combat.replace_players(players);
        Ok(Applied::new(true, &session.combat))
    }

    /// Save the current monsters and allies. A blank name saves nothing.
    pub async fn save_encounter(&self, name: &str) -> StorageResult<Option<EncounterSummary>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let session = self.session.lock().await;
        let bundle = EncounterBundle::from_roster(name, session.combat.participants(), Utc::now());
        let id = self.store.save_encounter(&bundle)?;
        log::info!(
            "Saved encounter {name:?} as {id} ({} monsters, {} allies)",
            bundle.monsters.len(),
            bundle.allies.len()
        );
        let mut summary = bundle.summary();
        summary.id = id;
        Ok(Some(summary))
    }

    /// Append a saved encounter. Returns the number of participants added,
    /// or `None` when no bundle has that id.
    pub async fn load_encounter(&self, id: &str) -> StorageResult<Option<Applied<usize>>> {
        let mut session = self.session.lock().await;
        let Some(bundle) = self.store.load_encounter(id)? else {
            log::info!("Encounter {id:?} not found");
            return Ok(None);
        };
        let Session { combat, roller } = &mut *session;
        let appended = combat.append_encounter(&bundle.monsters, &bundle.allies, &mut **roller);
        log::info!("Loaded encounter {:?}: {appended} participants", bundle.name);
        Ok(Some(Applied::new(appended, combat)))
    }

    pub async fn list_encounters(&self) -> StorageResult<Vec<EncounterSummary>> {
        self.store.list_encounters()
    }
}
