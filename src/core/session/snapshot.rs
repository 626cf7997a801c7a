//! Read-only views of the combat state.
//!
//! Both the operator page and the spectator overlay render from a
//! [`CombatSnapshot`]; producing one never mutates the session.

use serde::{Deserialize, Serialize};

use super::combat::Participant;
use super::status::ParticipantStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticipantView {
    /// Position in the sorted roster; the handle for index-based commands.
    pub index: usize,
    #[serde(flatten)]
    pub participant: Participant,
    pub status: ParticipantStatus,
    pub css_class: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CombatSnapshot {
    pub round: u32,
    pub current_turn: Option<usize>,
    pub participants: Vec<ParticipantView>,
}

impl CombatSnapshot {
    pub fn current(&self) -> Option<&ParticipantView> {
        self.current_turn.and_then(|i| self.participants.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// Snapshot served to the spectator overlay, with its poll cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectatorView {
    #[serde(flatten)]
    pub snapshot: CombatSnapshot,
    pub refresh_secs: u64,
}
