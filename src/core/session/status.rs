//! Wound Status Derivation
//!
//! Status is never stored on a participant. It is recomputed from the
//! participant's category and wound count under the active [`WoundPolicy`]
//! every time someone asks for it.

use serde::{Deserialize, Serialize};

use super::combat::Category;

// ============================================================================
// Wound Policy
// ============================================================================

/// Threshold table deciding when a Joker escalates from wounded to
/// incapacitated and (optionally) dead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WoundPolicy {
    /// Incapacitated at 4 wounds, dead at 5.
    #[default]
    Escalating,
    /// Incapacitated at 3 wounds, no dead tier.
    IncapacitationOnly,
    /// Table-specific thresholds.
    Custom {
        incapacitated_at: u32,
        dead_at: Option<u32>,
    },
}

impl WoundPolicy {
    /// Wound count at which a Joker becomes incapacitated.
    pub fn incapacitated_at(&self) -> u32 {
        match self {
            Self::Escalating => 4,
            Self::IncapacitationOnly => 3,
            Self::Custom { incapacitated_at, .. } => *incapacitated_at,
        }
    }

    /// Wound count at which a Joker dies, if this policy has a dead tier.
    pub fn dead_at(&self) -> Option<u32> {
        match self {
            Self::Escalating => Some(5),
            Self::IncapacitationOnly => None,
            Self::Custom { dead_at, .. } => *dead_at,
        }
    }

    /// Derive the status of a participant with the given category and wounds.
    pub fn evaluate(&self, category: Category, wounds: u32) -> ParticipantStatus {
        match category {
            Category::Extra if wounds >= 1 => ParticipantStatus {
                label: "Out of the fight".to_string(),
                class: StatusClass::Out,
                malus: 0,
            },
            Category::Extra => ParticipantStatus::default(),
            Category::Joker if wounds == 0 => ParticipantStatus::default(),
            Category::Joker => {
                let (label, class) = if self.dead_at().is_some_and(|dead| wounds >= dead) {
                    ("Dead".to_string(), StatusClass::Dead)
                } else if wounds >= self.incapacitated_at() {
                    ("Incapacitated".to_string(), StatusClass::Incapacitated)
                } else {
                    (format!("-{wounds}"), StatusClass::Wounded)
                };
                ParticipantStatus {
                    label,
                    class,
                    malus: wounds,
                }
            }
        }
    }
}

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    #[default]
    Healthy,
    Wounded,
    Incapacitated,
    Dead,
    /// An Extra that took a wound.
    Out,
}

impl StatusClass {
    /// Style tag used by the operator page and the overlay.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Healthy => "",
            Self::Wounded => "status-wounded",
            Self::Incapacitated => "status-incapacitated",
            Self::Dead => "status-dead",
            Self::Out => "status-out",
        }
    }

    /// Whether a participant in this state may hold the turn.
    pub fn can_act(&self) -> bool {
        !matches!(self, Self::Dead | Self::Out)
    }
}

/// Derived status attached to every participant in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ParticipantStatus {
    /// Human-readable label, empty when unharmed.
    pub label: String,
    pub class: StatusClass,
    /// Penalty applied to a Joker's rolls (one per wound).
    pub malus: u32,
}

impl ParticipantStatus {
    pub fn can_act(&self) -> bool {
        self.class.can_act()
    }
}
