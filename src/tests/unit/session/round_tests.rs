//! Multi-round combat scenarios driven through the engine API.

use crate::core::session::{
    Category, CombatRules, CombatState, Role, StatusClass, WoundPolicy,
};
use crate::tests::common::fixtures::{create_test_combat, index_of, names, scripted};

// =============================================================================
// Full Session
// =============================================================================

#[test]
fn test_two_round_session() {
    let mut combat = create_test_combat(CombatRules::default());
    // Unrolled roster sorts by name: Wolf, Valeria, Orc Chief, Orc
    let mut dice = scripted(&[7, 20, 11]);

    assert_eq!(combat.start_new_round(&mut dice), Some(0));
    assert_eq!(combat.round(), 1);
    assert_eq!(
        names(&combat.snapshot()),
        vec!["Orc Chief", "Orc", "Wolf", "Valeria"]
    );
    let chief = &combat.participants()[0];
    assert_eq!(chief.initiative_roll, 20);
    assert!(chief.is_critical);

    let valeria = index_of(&combat, "Valeria");
    assert!(combat.set_player_initiative(valeria, "14"));
    assert_eq!(
        names(&combat.snapshot()),
        vec!["Orc Chief", "Valeria", "Orc", "Wolf"]
    );
    assert_eq!(combat.current_turn(), Some(0));

    // The Orc is an Extra: one wound takes it out of the turn order
    combat.add_wound(index_of(&combat, "Orc"));
    assert_eq!(combat.advance_turn(), Some(1));
    assert_eq!(combat.advance_turn(), Some(3));
    assert_eq!(combat.advance_turn(), Some(0));

    let chief = index_of(&combat, "Orc Chief");
    for _ in 0..4 {
        combat.add_wound(chief);
    }
    assert_eq!(
        combat.status_of(&combat.participants()[chief]).class,
        StatusClass::Incapacitated
    );
    combat.add_wound(chief);
    assert_eq!(
        combat.status_of(&combat.participants()[chief]).class,
        StatusClass::Dead
    );

    // Only the Wolf rolls; dead and out participants keep their old values
    let mut dice = scripted(&[3]);
    assert_eq!(combat.start_new_round(&mut dice), Some(2));
    assert_eq!(combat.round(), 2);
    assert_eq!(
        names(&combat.snapshot()),
        vec!["Orc Chief", "Orc", "Wolf", "Valeria"]
    );
    let chief = &combat.participants()[0];
    assert_eq!(chief.initiative_roll, 20);
    assert!(chief.is_critical);
    assert_eq!(combat.participants()[1].initiative_roll, 11);
    assert_eq!(combat.participants()[3].initiative_roll, 0);
}

// =============================================================================
// Policies
// =============================================================================

#[test]
fn test_incapacitation_only_policy_never_kills() {
    let rules = CombatRules {
        wound_policy: WoundPolicy::IncapacitationOnly,
        ..CombatRules::default()
    };
    let mut combat = CombatState::new(rules);
    combat.add_participant("Ogre", Role::Monster, Category::Joker);
    combat.add_participant("Rat", Role::Monster, Category::Extra);

    let ogre = index_of(&combat, "Ogre");
    for _ in 0..2 {
        combat.add_wound(ogre);
    }
    let status = combat.status_of(&combat.participants()[ogre]);
    assert_eq!(status.label, "-2");
    assert_eq!(status.malus, 2);

    for _ in 0..8 {
        combat.add_wound(ogre);
    }
    let status = combat.status_of(&combat.participants()[ogre]);
    assert_eq!(status.class, StatusClass::Incapacitated);
    assert!(status.can_act());

    combat.add_wound(index_of(&combat, "Rat"));
    let mut dice = scripted(&[9]);
    let current = combat.start_new_round(&mut dice);
    assert_eq!(current, Some(index_of(&combat, "Ogre")));
}

#[test]
fn test_custom_policy_thresholds() {
    let rules = CombatRules {
        wound_policy: WoundPolicy::Custom {
            incapacitated_at: 2,
            dead_at: Some(3),
        },
        ..CombatRules::default()
    };
    let mut combat = CombatState::new(rules);
    combat.add_participant("Lich", Role::Monster, Category::Joker);

    combat.add_wound(0);
    assert_eq!(combat.status_of(&combat.participants()[0]).class, StatusClass::Wounded);
    combat.add_wound(0);
    assert_eq!(
        combat.status_of(&combat.participants()[0]).class,
        StatusClass::Incapacitated
    );
    combat.add_wound(0);
    assert_eq!(combat.status_of(&combat.participants()[0]).class, StatusClass::Dead);
}

// =============================================================================
// Nobody Can Act
// =============================================================================

#[test]
fn test_round_with_nobody_eligible_recovers() {
    let mut combat = CombatState::default();
    combat.add_participant("Kobold", Role::Monster, Category::Extra);
    combat.add_participant("Bat", Role::Monster, Category::Extra);
    combat.add_wound(0);
    combat.add_wound(1);

    let mut dice = scripted(&[5]);
    assert_eq!(combat.start_new_round(&mut dice), None);
    assert_eq!(combat.advance_turn(), None);
    assert!(combat.snapshot().current().is_none());

    // Healing one participant lets the turn flow pick it up again
    let bat = index_of(&combat, "Bat");
    combat.remove_wound(bat);
    assert_eq!(combat.advance_turn(), Some(bat));
}

#[test]
fn test_players_only_table_waits_for_entries() {
    let mut combat = CombatState::default();
    combat.add_participant("Valeria", Role::Player, Category::Joker);
    combat.add_participant("Borin", Role::Player, Category::Joker);

    let mut dice = scripted(&[20]);
    assert_eq!(combat.start_new_round(&mut dice), Some(0));
    assert!(combat.participants().iter().all(|p| p.initiative_roll == 0));

    let applied = combat.set_player_initiatives(vec![(0, "5"), (1, "20"), (0, "21")]);
    assert_eq!(applied, 2);
    let borin = &combat.participants()[0];
    assert_eq!(borin.name, "Borin");
    assert!(borin.is_critical);
}
