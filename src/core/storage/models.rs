//! Data models for storage operations.
//!
//! Encounter bundles are saved snapshots of the non-player side of a fight,
//! reusable across sessions. The player roster is persisted as a plain array
//! of [`Participant`] snapshots and needs no wrapper type.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::session::{Participant, Role};

// ============================================================================
// Encounter Bundle
// ============================================================================

/// Saved monsters and allies for one encounter.
///
/// Older bundle files store `date_created` as a naive `YYYY-MM-DD HH:MM:SS`
/// string. Those still load. A timestamp that is missing or unreadable
/// becomes the Unix epoch, so the bundle lists last.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EncounterBundle {
    pub name: String,
    #[serde(default)]
    pub monsters: Vec<Participant>,
    #[serde(default)]
    pub allies: Vec<Participant>,
    #[serde(
        default,
        alias = "date_created",
        deserialize_with = "deserialize_created_at"
    )]
    pub created_at: DateTime<Utc>,
}

impl EncounterBundle {
    /// Build a bundle from the live roster, keeping only monsters and allies.
    pub fn from_roster(name: impl Into<String>, roster: &[Participant], created_at: DateTime<Utc>) -> Self {
        let by_role = |role: Role| -> Vec<Participant> {
            roster.iter().filter(|p| p.role == role).cloned().collect()
        };
        Self {
            name: name.into(),
            monsters: by_role(Role::Monster),
            allies: by_role(Role::Ally),
            created_at,
        }
    }

    /// Identifier the bundle is stored under.
    pub fn id(&self) -> String {
        encounter_id(&self.name)
    }

    pub fn summary(&self) -> EncounterSummary {
        EncounterSummary {
            id: self.id(),
            name: self.name.clone(),
            created_at: self.created_at,
            monster_count: self.monsters.len(),
            ally_count: self.allies.len(),
        }
    }
}

/// Listing entry for a saved bundle.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EncounterSummary {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub monster_count: usize,
    pub ally_count: usize,
}

/// Naive timestamp layouts accepted besides RFC 3339, read as UTC.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a bundle timestamp: RFC 3339 first, then the naive layouts.
fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn deserialize_created_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(parse_created_at)
        .unwrap_or_default())
}

/// Derive a bundle identifier from its display name.
///
/// Whitespace becomes `_`, as does anything outside letters, digits, `-` and
/// `_`, so the id is always safe to use as a file stem. Two names mapping to
/// the same id overwrite each other.
pub fn encounter_id(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Whether an id could have been produced by [`encounter_id`].
pub fn is_valid_encounter_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}
