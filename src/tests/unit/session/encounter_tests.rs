//! Saving and restoring rosters through the tracker and the JSON store.

use crate::core::session::{Category, CombatRules, EncounterLoadRoll, Role, StatusClass};
use crate::tests::common::fixtures::{create_file_tracker, create_test_tracker, names};

#[tokio::test]
async fn test_encounter_survives_file_store() {
    let (tracker, dir) = create_file_tracker(&[15, 4, 18]);
    tracker.add_participant("Valeria", Role::Player, Category::Joker).await;
    tracker.add_participant("Goblin", Role::Monster, Category::Extra).await;
    tracker.add_participant("Goblin Boss", Role::Monster, Category::Joker).await;
    tracker.add_participant("Hound", Role::Ally, Category::Extra).await;

    let summary = tracker
        .save_encounter("Cave Mouth!")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.id, "Cave_Mouth_");
    assert_eq!(summary.name, "Cave Mouth!");
    assert!(dir.path().join("encounters/Cave_Mouth_.json").exists());

    tracker.reset_combat().await;
    assert_eq!(names(&tracker.snapshot().await), vec!["Valeria"]);

    let listed = tracker.list_encounters().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!((listed[0].monster_count, listed[0].ally_count), (2, 1));

    let loaded = tracker.load_encounter("Cave_Mouth_").await.unwrap().unwrap();
    assert_eq!(loaded.outcome, 3);
    let snapshot = loaded.state;
    assert_eq!(snapshot.participants.len(), 4);
    // Appended participants rolled; the player keeps an empty entry
    for view in &snapshot.participants {
        if view.participant.role == Role::Player {
            assert_eq!(view.participant.initiative_roll, 0);
        } else {
            assert!((1..=20).contains(&view.participant.initiative_roll));
        }
    }
    assert_eq!(names(&snapshot)[0], "Hound");
}

#[tokio::test]
async fn test_loading_twice_gives_distinct_ids() {
    let tracker = create_test_tracker(CombatRules::default(), &[10]);
    tracker.add_participant("Skeleton", Role::Monster, Category::Extra).await;
    tracker.save_encounter("Crypt").await.unwrap();
    tracker.reset_all().await;

    tracker.load_encounter("Crypt").await.unwrap();
    tracker.load_encounter("Crypt").await.unwrap();

    let snapshot = tracker.snapshot().await;
    assert_eq!(names(&snapshot), vec!["Skeleton", "Skeleton"]);
    assert_ne!(
        snapshot.participants[0].participant.id,
        snapshot.participants[1].participant.id
    );
    assert_eq!(snapshot.current_turn, Some(0));
}

#[tokio::test]
async fn test_reset_policy_and_wounded_bundle() {
    let rules = CombatRules {
        encounter_load_roll: EncounterLoadRoll::Reset,
        ..CombatRules::default()
    };
    let tracker = create_test_tracker(rules, &[17]);
    tracker.add_participant("Zombie", Role::Monster, Category::Extra).await;
    tracker.add_participant("Necromancer", Role::Monster, Category::Joker).await;
    tracker.start_new_round().await;
    let snapshot = tracker.snapshot().await;
    let zombie = snapshot
        .participants
        .iter()
        .find(|v| v.participant.name == "Zombie")
        .unwrap()
        .index;
    tracker.add_wound(zombie).await;
    tracker.save_encounter("Graveyard").await.unwrap();
    tracker.reset_all().await;

    tracker.load_encounter("Graveyard").await.unwrap();
    let snapshot = tracker.snapshot().await;
    let zombie = snapshot
        .participants
        .iter()
        .find(|v| v.participant.name == "Zombie")
        .unwrap();
    // Out participants are restored as saved, wounds and stale roll included
    assert_eq!(zombie.participant.wounds, 1);
    assert_eq!(zombie.status.class, StatusClass::Out);
    assert_eq!(zombie.participant.initiative_roll, 17);

    let necromancer = snapshot
        .participants
        .iter()
        .find(|v| v.participant.name == "Necromancer")
        .unwrap();
    assert_eq!(necromancer.participant.initiative_roll, 0);
    assert!(!necromancer.participant.is_critical);
}

#[tokio::test]
async fn test_players_saved_to_disk_replace_live_players() {
    let (tracker, dir) = create_file_tracker(&[]);
    tracker.add_participant("Valeria", Role::Player, Category::Joker).await;
    tracker.add_participant("Borin", Role::Player, Category::Joker).await;
    tracker.add_wound(0).await;
    assert_eq!(tracker.save_players().await.unwrap(), 2);
    assert!(dir.path().join("players.json").exists());

    tracker.reset_all().await;
    tracker.add_participant("Imposter", Role::Player, Category::Joker).await;
    tracker.add_participant("Troll", Role::Monster, Category::Joker).await;
    assert!(tracker.load_players().await.unwrap().outcome);

    let snapshot = tracker.snapshot().await;
    assert_eq!(names(&snapshot), vec!["Valeria", "Troll", "Borin"]);
    let wounded: u32 = snapshot.participants.iter().map(|v| v.participant.wounds).sum();
    assert_eq!(wounded, 1);
}
