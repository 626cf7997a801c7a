//! Property-based tests for the initiative engine
//!
//! Tests invariants:
//! - Sort order holds after every command
//! - Turn pointer never dangles
//! - Advance lands on a participant able to act, when one exists
//! - Round reset rolls in range and clears players
//! - Wound floor at zero

use proptest::prelude::*;

use crate::core::session::{
    Category, CombatRules, CombatState, D20Roller, Participant, Role, WoundPolicy,
};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

#[derive(Debug, Clone)]
enum Command {
    Add(String, Role, Category),
    Remove(usize),
    AddWound(usize),
    RemoveWound(usize),
    SetInitiative(usize, String),
    Advance,
    NewRound,
    ResetCombat,
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Player), Just(Role::Ally), Just(Role::Monster)]
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![Just(Category::Extra), Just(Category::Joker)]
}

fn arb_policy() -> impl Strategy<Value = WoundPolicy> {
    prop_oneof![
        Just(WoundPolicy::Escalating),
        Just(WoundPolicy::IncapacitationOnly),
        (1u32..6, prop::option::of(1u32..8)).prop_map(|(incapacitated_at, dead_at)| {
            WoundPolicy::Custom {
                incapacitated_at,
                dead_at,
            }
        }),
    ]
}

/// Names drawn from a small pool so ties on both sort keys happen.
fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Orc".to_string()),
        Just("orc".to_string()),
        Just("Goblin".to_string()),
        Just("Wolf".to_string()),
        Just("   ".to_string()),
        "[A-Za-z]{1,8}",
    ]
}

/// Initiative text as typed into the form, valid or not.
fn arb_initiative_text() -> impl Strategy<Value = String> {
    prop_oneof![
        (-5i32..30).prop_map(|n| n.to_string()),
        Just("abc".to_string()),
        Just("".to_string()),
        Just(" 12 ".to_string()),
    ]
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        3 => (arb_name(), arb_role(), arb_category())
            .prop_map(|(name, role, category)| Command::Add(name, role, category)),
        1 => (0usize..10).prop_map(Command::Remove),
        3 => (0usize..10).prop_map(Command::AddWound),
        1 => (0usize..10).prop_map(Command::RemoveWound),
        2 => (0usize..10, arb_initiative_text())
            .prop_map(|(index, raw)| Command::SetInitiative(index, raw)),
        3 => Just(Command::Advance),
        2 => Just(Command::NewRound),
        1 => Just(Command::ResetCombat),
    ]
}

// ============================================================================
// Invariant checks
// ============================================================================

fn is_sorted(participants: &[Participant]) -> bool {
    participants.windows(2).all(|pair| {
        let (a, b) = (&pair[0], &pair[1]);
        a.initiative_roll > b.initiative_roll
            || (a.initiative_roll == b.initiative_roll && a.name >= b.name)
    })
}

fn anyone_can_act(combat: &CombatState) -> bool {
    combat
        .participants()
        .iter()
        .any(|p| combat.status_of(p).can_act())
}

fn holder_can_act(combat: &CombatState) -> bool {
    combat
        .current_participant()
        .is_some_and(|p| combat.status_of(p).can_act())
}

fn apply(combat: &mut CombatState, roller: &mut D20Roller, command: &Command) {
    match command {
        Command::Add(name, role, category) => {
            combat.add_participant(name, *role, *category);
        }
        Command::Remove(index) => {
            combat.remove_participant(*index);
        }
        Command::AddWound(index) => {
            combat.add_wound(*index);
        }
        Command::RemoveWound(index) => {
            combat.remove_wound(*index);
        }
        Command::SetInitiative(index, raw) => {
            combat.set_player_initiative(*index, raw);
        }
        Command::Advance => {
            combat.advance_turn();
        }
        Command::NewRound => {
            combat.start_new_round(roller);
        }
        Command::ResetCombat => combat.reset_combat(),
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_invariants_hold_after_every_command(
        policy in arb_policy(),
        seed in any::<u64>(),
        commands in prop::collection::vec(arb_command(), 1..60),
    ) {
        let rules = CombatRules { wound_policy: policy, ..CombatRules::default() };
        let mut combat = CombatState::new(rules);
        let mut roller = D20Roller::with_seed(seed);

        for command in &commands {
            apply(&mut combat, &mut roller, command);

            prop_assert!(is_sorted(combat.participants()), "unsorted after {:?}", command);
            if let Some(index) = combat.current_turn() {
                prop_assert!(index < combat.len(), "dangling pointer after {:?}", command);
            }
            if combat.is_empty() {
                prop_assert_eq!(combat.current_turn(), None);
            }
            for p in combat.participants() {
                prop_assert!((0..=20).contains(&p.initiative_roll));
                prop_assert_eq!(p.is_critical, p.initiative_roll == 20);
                prop_assert!(!p.name.trim().is_empty());
                if p.is_player() {
                    prop_assert_eq!(p.category, Category::Joker);
                }
            }
        }
    }

    #[test]
    fn prop_advance_finds_someone_who_can_act(
        seed in any::<u64>(),
        commands in prop::collection::vec(arb_command(), 1..40),
    ) {
        let mut combat = CombatState::default();
        let mut roller = D20Roller::with_seed(seed);
        for command in &commands {
            apply(&mut combat, &mut roller, command);
        }

        let before = combat.current_turn();
        combat.advance_turn();
        if anyone_can_act(&combat) {
            prop_assert!(holder_can_act(&combat));
        } else {
            prop_assert_eq!(combat.current_turn(), before);
        }
    }

    #[test]
    fn prop_new_round_rolls_and_clears(
        seed in any::<u64>(),
        commands in prop::collection::vec(arb_command(), 1..40),
    ) {
        let mut combat = CombatState::default();
        let mut roller = D20Roller::with_seed(seed);
        for command in &commands {
            apply(&mut combat, &mut roller, command);
        }

        let round = combat.round();
        let current = combat.start_new_round(&mut roller);
        prop_assert_eq!(combat.round(), round + 1);

        for p in combat.participants() {
            if !combat.status_of(p).can_act() {
                continue;
            }
            if p.is_player() {
                prop_assert_eq!(p.initiative_roll, 0);
            } else {
                prop_assert!((1..=20).contains(&p.initiative_roll));
            }
        }

        match current {
            Some(index) => {
                prop_assert!(holder_can_act(&combat));
                let first_eligible = combat
                    .participants()
                    .iter()
                    .position(|p| combat.status_of(p).can_act());
                prop_assert_eq!(Some(index), first_eligible);
            }
            None => {
                prop_assert!(!anyone_can_act(&combat));
            }
        }
    }

    #[test]
    fn prop_wound_floor(adds in 0u32..10, removes in 0u32..20) {
        let mut combat = CombatState::default();
        combat.add_participant("Target", Role::Monster, Category::Joker);
        for _ in 0..adds {
            combat.add_wound(0);
        }
        let mut last = adds;
        for _ in 0..removes {
            last = combat.remove_wound(0).unwrap_or(u32::MAX);
        }
        prop_assert_eq!(combat.participants()[0].wounds, adds.saturating_sub(removes));
        if removes > 0 {
            prop_assert_eq!(last, adds.saturating_sub(removes));
        }
    }
}
