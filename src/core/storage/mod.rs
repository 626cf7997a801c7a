//! Storage module for saved rosters and encounters.
//!
//! The engine only needs a handful of document operations, expressed by
//! [`CombatStore`]:
//!
//! - the player roster, saved and restored as one collection
//! - named encounter bundles, saved, loaded and listed
//!
//! # Modules
//!
//! - `json` - JSON files under the data directory, written atomically
//! - `memory` - in-process store for tests and throwaway sessions
//! - `error` - Error types for storage operations
//! - `models` - Encounter bundle and listing types

pub mod error;
pub mod json;
pub mod memory;
pub mod models;

pub use error::{StorageError, StorageResult};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use models::{encounter_id, is_valid_encounter_id, EncounterBundle, EncounterSummary};

use crate::core::session::Participant;

/// Document store backing the tracker.
///
/// Every call is a complete unit: nothing partially written is ever visible
/// to a later read. "Nothing saved" is reported as `None`, never as an error.
pub trait CombatStore: Send + Sync {
    /// Replace the saved player roster.
    fn save_players(&self, players: &[Participant]) -> StorageResult<()>;

    /// The saved player roster, if one exists.
    fn load_players(&self) -> StorageResult<Option<Vec<Participant>>>;

    /// Save a bundle under its derived id, overwriting any previous bundle
    /// with that id. Returns the id.
    fn save_encounter(&self, bundle: &EncounterBundle) -> StorageResult<String>;

    /// Load a bundle by id. Unknown or malformed ids yield `None`.
    fn load_encounter(&self, id: &str) -> StorageResult<Option<EncounterBundle>>;

    /// Summaries of every saved bundle, newest first.
    fn list_encounters(&self) -> StorageResult<Vec<EncounterSummary>>;
}
