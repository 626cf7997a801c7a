//! Session Module
//!
//! The initiative engine: roster ordering, wound status, turn flow and
//! round transitions.

pub mod combat;
pub mod initiative;
pub mod snapshot;
pub mod status;

// Re-exports for convenience
pub use combat::{Category, CombatRules, CombatState, EncounterLoadRoll, Participant, Role};
pub use initiative::{
    parse_player_initiative, D20Roller, InitiativeRoller, ScriptedRoller, INITIATIVE_DIE,
};
pub use snapshot::{CombatSnapshot, ParticipantView, SpectatorView};
pub use status::{ParticipantStatus, StatusClass, WoundPolicy};
