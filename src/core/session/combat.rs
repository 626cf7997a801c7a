//! Combat Management Module
//!
//! Owns the initiative roster and the current-turn pointer. Every mutating
//! operation restores the roster ordering itself; callers never sort.
//!
//! Invalid input (out-of-range index, blank name, bad initiative text) is a
//! silent no-op. The roster can never end up with a dangling turn pointer or
//! a negative wound count.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::initiative::{parse_player_initiative, InitiativeRoller, INITIATIVE_DIE};
use super::snapshot::{CombatSnapshot, ParticipantView};
use super::status::{ParticipantStatus, WoundPolicy};

// ============================================================================
// Participant Types
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Player,
    Ally,
    #[default]
    Monster,
}

/// Survivability rule. Players are always Jokers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Extra,
    Joker,
}

/// How appended bundle participants get their initiative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EncounterLoadRoll {
    /// Roll a fresh d20 for every appended participant that can act.
    #[default]
    Reroll,
    /// Clear the roll to 0 and wait for the next round.
    Reset,
}

/// Table rules applied by the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct CombatRules {
    pub wound_policy: WoundPolicy,
    pub encounter_load_roll: EncounterLoadRoll,
}

// ============================================================================
// Participant
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(rename = "type")]
    pub category: Category,
    pub wounds: u32,
    pub initiative_roll: i32,
    pub is_critical: bool,
}

impl Default for Participant {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            role: Role::default(),
            category: Category::default(),
            wounds: 0,
            initiative_roll: 0,
            is_critical: false,
        }
    }
}

impl Participant {
    /// Create a fresh participant. Players are forced to [`Category::Joker`].
    pub fn new(name: impl Into<String>, role: Role, category: Category) -> Self {
        let category = if role == Role::Player {
            Category::Joker
        } else {
            category
        };
        Self {
            name: name.into(),
            role,
            category,
            ..Self::default()
        }
    }

    pub fn is_player(&self) -> bool {
        self.role == Role::Player
    }

    /// Add one wound, returning the new count
    pub fn add_wound(&mut self) -> u32 {
        self.wounds = self.wounds.saturating_add(1);
        self.wounds
    }

    /// Remove one wound (never below zero), returning the new count
    pub fn remove_wound(&mut self) -> u32 {
        self.wounds = self.wounds.saturating_sub(1);
        self.wounds
    }

    pub fn status(&self, policy: &WoundPolicy) -> ParticipantStatus {
        policy.evaluate(self.category, self.wounds)
    }

    fn set_roll(&mut self, roll: i32) {
        self.initiative_roll = roll;
        self.is_critical = roll == INITIATIVE_DIE;
    }

    fn clear_roll(&mut self) {
        self.initiative_roll = 0;
        self.is_critical = false;
    }
}

// ============================================================================
// Combat State
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CombatState {
    participants: Vec<Participant>,
    /// `None` when the roster is empty or nobody can act this round.
    current_turn: Option<usize>,
    round: u32,
    rules: CombatRules,
}

impl CombatState {
    /// Create an empty combat state
    pub fn new(rules: CombatRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn current_turn(&self) -> Option<usize> {
        self.current_turn
    }

    /// Rounds started since the last reset.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Get the participant whose turn it is
    pub fn current_participant(&self) -> Option<&Participant> {
        self.current_turn.and_then(|i| self.participants.get(i))
    }

    pub fn status_of(&self, participant: &Participant) -> ParticipantStatus {
        participant.status(&self.rules.wound_policy)
    }

    fn can_act(&self, index: usize) -> bool {
        self.participants
            .get(index)
            .is_some_and(|p| self.status_of(p).can_act())
    }

    // ------------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------------

    /// Sort by initiative (highest first), name descending as tie-break.
    ///
    /// Names compare on raw text, case-sensitive. Participants equal on both
    /// keys have no guaranteed relative order. A turn in progress stays with
    /// the same participant.
    pub fn sort_roster(&mut self) {
        let holder = self.current_participant().map(|p| p.id.clone());
        self.participants.sort_by(|a, b| {
            b.initiative_roll
                .cmp(&a.initiative_roll)
                .then_with(|| b.name.cmp(&a.name))
        });
        if let Some(id) = holder {
            self.current_turn = self.participants.iter().position(|p| p.id == id);
        }
        self.clamp_turn();
    }

    /// Pull the pointer back into range after the roster shrank or grew.
    fn clamp_turn(&mut self) {
        let len = self.participants.len();
        self.current_turn = match self.current_turn {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(0),
            other => other,
        };
    }

    /// A roster that was empty starts with the first participant holding the turn.
    fn start_turn_if_was_empty(&mut self, was_empty: bool) {
        if was_empty && !self.participants.is_empty() {
            self.current_turn = Some(0);
        }
    }

    // ------------------------------------------------------------------------
    // Roster mutation
    // ------------------------------------------------------------------------

    /// Add a participant and re-sort initiative
    /// Returns the new participant's index, or `None` for a blank name
    pub fn add_participant(&mut self, name: &str, role: Role, category: Category) -> Option<usize> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let was_empty = self.participants.is_empty();
        let participant = Participant::new(name, role, category);
        let id = participant.id.clone();
        self.participants.push(participant);
        self.sort_roster();
        self.start_turn_if_was_empty(was_empty);
        self.participants.iter().position(|p| p.id == id)
    }

    /// Remove a participant by index
    /// Adjusts current_turn so it keeps pointing at the same participant
    /// Returns the removed participant if the index was valid
    pub fn remove_participant(&mut self, index: usize) -> Option<Participant> {
        if index >= self.participants.len() {
            return None;
        }
        if let Some(current) = self.current_turn {
            if index < current {
                self.current_turn = Some(current - 1);
            }
        }
        let removed = self.participants.remove(index);
        self.clamp_turn();
        Some(removed)
    }

    /// Returns the new wound count, `None` for an invalid index
    pub fn add_wound(&mut self, index: usize) -> Option<u32> {
        self.participants.get_mut(index).map(Participant::add_wound)
    }

    /// Returns the new wound count, `None` for an invalid index
    pub fn remove_wound(&mut self, index: usize) -> Option<u32> {
        self.participants.get_mut(index).map(Participant::remove_wound)
    }

    /// Apply a typed-in initiative without re-sorting.
    fn apply_player_initiative(&mut self, index: usize, raw: &str) -> bool {
        let Some(participant) = self.participants.get_mut(index) else {
            return false;
        };
        if !participant.is_player() {
            return false;
        }
        match parse_player_initiative(raw) {
            Some(value) => {
                participant.set_roll(value);
                true
            }
            None => false,
        }
    }

    /// Set one player's initiative from raw input and re-sort.
    /// Non-players, bad indices and values outside 1..=20 are ignored.
    pub fn set_player_initiative(&mut self, index: usize, raw: &str) -> bool {
        let applied = self.apply_player_initiative(index, raw);
        self.sort_roster();
        applied
    }

    /// Apply a batch of player entries, then sort once.
    ///
    /// Indices refer to the roster as it was before the batch. Returns how
    /// many entries were accepted.
    pub fn set_player_initiatives<I, S>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        let applied = entries
            .into_iter()
            .filter(|(index, raw)| self.apply_player_initiative(*index, raw.as_ref()))
            .count();
        self.sort_roster();
        applied
    }

    // ------------------------------------------------------------------------
    // Turn flow
    // ------------------------------------------------------------------------

    /// Advance to the next participant able to act.
    ///
    /// Scans forward from the current holder, wrapping once around the
    /// roster. If nobody can act the pointer stays where it was. Returns the
    /// pointer after the call.
    pub fn advance_turn(&mut self) -> Option<usize> {
        let len = self.participants.len();
        if len == 0 {
            return self.current_turn;
        }
        let start = self.current_turn.map_or(0, |current| current + 1);
        if let Some(next) = (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&candidate| self.can_act(candidate))
        {
            self.current_turn = Some(next);
        }
        self.current_turn
    }

    /// Start a new round.
    ///
    /// Everyone still able to act gets a new initiative: a d20 for allies and
    /// monsters, a cleared entry for players. Dead and out participants keep
    /// their stale values. The turn goes to the first participant able to
    /// act in the new order, or `None` if there is nobody.
    pub fn start_new_round(&mut self, roller: &mut dyn InitiativeRoller) -> Option<usize> {
        self.current_turn = None;
        self.round = self.round.saturating_add(1);
        let policy = self.rules.wound_policy;
        for participant in &mut self.participants {
            if !participant.status(&policy).can_act() {
                continue;
            }
            if participant.is_player() {
                participant.clear_roll();
            } else {
                participant.set_roll(roller.roll());
            }
        }
        self.sort_roster();
        self.current_turn = (0..self.participants.len()).find(|&i| self.can_act(i));
        self.current_turn
    }

    /// Keep only the players and rewind to the top of the order.
    pub fn reset_combat(&mut self) {
        self.participants.retain(Participant::is_player);
        self.round = 0;
        self.current_turn = (!self.participants.is_empty()).then_some(0);
    }

    /// Clear everything.
    pub fn reset_all(&mut self) {
        self.participants.clear();
        self.round = 0;
        self.current_turn = None;
    }

    // ------------------------------------------------------------------------
    // Snapshots for persistence
    // ------------------------------------------------------------------------

    pub fn with_role(&self, role: Role) -> Vec<Participant> {
        self.participants
            .iter()
            .filter(|p| p.role == role)
            .cloned()
            .collect()
    }

    /// Replace every player with the given snapshot, leaving allies and
    /// monsters in place.
    pub fn replace_players(&mut self, players: Vec<Participant>) {
        let was_empty = self.participants.is_empty();
        let previous = self.current_turn;
        let holder = self.current_participant().map(|p| p.id.clone());
        self.participants.retain(|p| !p.is_player());
        // A replaced holder leaves the pointer at the same position.
        self.current_turn = holder
            .and_then(|id| self.participants.iter().position(|p| p.id == id))
            .or(previous);

        self.participants.extend(players.into_iter().map(|snapshot| Participant {
            id: Uuid::new_v4().to_string(),
            role: Role::Player,
            category: Category::Joker,
            ..snapshot
        }));
        self.sort_roster();
        self.start_turn_if_was_empty(was_empty);
    }

    /// Append the monsters and allies of a saved encounter.
    ///
    /// Appended participants get fresh ids and have their initiative
    /// reinitialised according to [`CombatRules::encounter_load_roll`].
    /// Players already in the roster are not touched. Returns the number of
    /// participants appended.
    pub fn append_encounter(
        &mut self,
        monsters: &[Participant],
        allies: &[Participant],
        roller: &mut dyn InitiativeRoller,
    ) -> usize {
        let was_empty = self.participants.is_empty();
        let policy = self.rules.wound_policy;
        let load_roll = self.rules.encounter_load_roll;

        let incoming = monsters
            .iter()
            .map(|p| (p, Role::Monster))
            .chain(allies.iter().map(|p| (p, Role::Ally)));

        let mut appended = 0;
        for (snapshot, role) in incoming {
            let mut participant = Participant {
                id: Uuid::new_v4().to_string(),
                role,
                ..snapshot.clone()
            };
            if participant.status(&policy).can_act() {
                match load_roll {
                    EncounterLoadRoll::Reroll => participant.set_roll(roller.roll()),
                    EncounterLoadRoll::Reset => participant.clear_roll(),
                }
            }
            self.participants.push(participant);
            appended += 1;
        }

        self.sort_roster();
        self.start_turn_if_was_empty(was_empty);
        appended
    }

    // ------------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------------

    /// Full state with derived statuses, for the operator page and the overlay.
    pub fn snapshot(&self) -> CombatSnapshot {
        let participants = self
            .participants
            .iter()
            .enumerate()
            .map(|(index, participant)| {
                let status = self.status_of(participant);
                ParticipantView {
                    index,
                    css_class: status.class.css_class().to_string(),
                    status,
                    is_current: self.current_turn == Some(index),
                    participant: participant.clone(),
                }
            })
            .collect();

        CombatSnapshot {
            round: self.round,
            current_turn: self.current_turn,
            participants,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
