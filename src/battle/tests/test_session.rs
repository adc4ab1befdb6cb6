#[cfg(test)]
mod tests {
    use crate::battle::runner::BattleRunner;
    use crate::battle::state::{BattleEvent, BattleOutcome, Side, TurnRng};
    use crate::battle::tests::common::{
        assert_action_error, assert_ok, TestPalBuilder, TestWorld, TEST_AMBIENT,
    };
    use crate::battle::trainer::OpponentParty;
    use crate::config::BattleConfig;
    use crate::errors::ActionError;
    use crate::host::memory::DEFEATED_FIRST_PAL;
    use crate::host::{Inventory, QuestConditions, Roster};
    use crate::player::PlayerAction;
    use pal_schema::{BattleMode, ItemKind, MoveKind};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn bramblet() -> OpponentParty {
        OpponentParty::wild(TestPalBuilder::new("Bramblet").build())
    }

    fn runner(rolls: Vec<i32>) -> BattleRunner {
        BattleRunner::new(BattleConfig::default(), TurnRng::new_for_test(rolls))
    }

    #[test]
    fn test_action_without_session_is_rejected() {
        // Arrange
        let mut world = TestWorld::new(vec![TestPalBuilder::new("Sprig").build()]);
        let mut runner = runner(vec![]);

        // Act
        let err = assert_action_error(runner.submit_action(&mut world.host(), PlayerAction::Basic));

        // Assert
        assert_eq!(err, ActionError::NoActiveBattle);
        assert!(!world.world.in_battle());
        assert!(runner.active_combatants(&world.roster).is_err());
    }

    #[test]
    fn test_only_one_battle_at_a_time() {
        // Arrange
        let mut world = TestWorld::new(vec![TestPalBuilder::new("Sprig").build()]);
        let mut runner = runner(vec![]);
        assert_ok(runner.start_battle(&mut world.host(), None, bramblet()));

        // Act
        let err = assert_action_error(runner.start_battle(&mut world.host(), None, bramblet()));

        // Assert
        assert_eq!(err, ActionError::BattleAlreadyActive);
        assert!(runner.is_active());
    }

    #[test]
    fn test_start_auto_selects_sole_conscious_pal() {
        // Arrange
        let mut world = TestWorld::new(vec![
            TestPalBuilder::new("Sprig").with_hp(0).build(),
            TestPalBuilder::new("Leafy").build(),
        ]);
        let mut runner = runner(vec![]);

        // Act
        let outcome = assert_ok(runner.start_battle(&mut world.host(), None, bramblet()));

        // Assert
        assert_eq!(
            outcome.events[0],
            BattleEvent::BattleStarted {
                mode: BattleMode::Wild,
                player_pal: "Leafy".to_string(),
                opponent_pal: "Bramblet".to_string(),
                trainer: None,
            }
        );
        assert_eq!(runner.session().map(|s| s.player_slot()), Some(1));
    }

    #[test]
    fn test_start_prompts_when_several_pals_are_conscious() {
        // Arrange
        let mut world = TestWorld::new(vec![
            TestPalBuilder::new("Sprig").build(),
            TestPalBuilder::new("Leafy").build(),
            TestPalBuilder::new("Moss").build(),
        ]);
        world.roster.queue_selection(2);
        let mut runner = runner(vec![]);

        // Act
        assert_ok(runner.start_battle(&mut world.host(), None, bramblet()));

        // Assert
        let (player, opponent) = assert_ok(runner.active_combatants(&world.roster));
        assert_eq!(player.name, "Moss");
        assert_eq!(opponent.name, "Bramblet");
    }

    #[rstest]
    #[case(vec![0, 50], Some(0), ActionError::InvalidPalSelection(0))]
    #[case(vec![0, 0], None, ActionError::NoConsciousPal)]
    #[case(vec![50], Some(3), ActionError::InvalidPalSelection(3))]
    fn test_start_rejects_unusable_selection(
        #[case] hps: Vec<u32>,
        #[case] slot: Option<usize>,
        #[case] expected: ActionError,
    ) {
        // Arrange
        let pals = hps
            .into_iter()
            .enumerate()
            .map(|(i, hp)| TestPalBuilder::new(&format!("Pal{}", i)).with_hp(hp).build())
            .collect();
        let mut world = TestWorld::new(pals);
        let mut runner = runner(vec![]);

        // Act
        let err = assert_action_error(runner.start_battle(&mut world.host(), slot, bramblet()));

        // Assert: the world never left exploration
        assert_eq!(err, expected);
        assert!(!runner.is_active());
        assert!(!world.world.in_battle());
        assert_eq!(world.world.ambient, TEST_AMBIENT);
    }

    #[test]
    fn test_start_resets_opponent_and_player_energy() {
        // Arrange
        let mut world = TestWorld::new(vec![TestPalBuilder::new("Sprig")
            .with_hp(20)
            .with_uses(0, 0)
            .build()]);
        let mut runner = runner(vec![]);
        let opponent = OpponentParty::wild(
            TestPalBuilder::new("Bramblet").with_hp(3).with_uses(1, 0).build(),
        );

        // Act
        assert_ok(runner.start_battle(&mut world.host(), None, opponent));

        // Assert: energy is refilled but the player's HP carries over
        let (player, opponent) = assert_ok(runner.active_combatants(&world.roster));
        assert_eq!((player.hp, player.basic_attack_uses, player.special_attack_uses), (20, 15, 5));
        assert_eq!((opponent.hp, opponent.basic_attack_uses, opponent.special_attack_uses), (50, 15, 5));
        assert_eq!(world.world.battle_mode, Some(BattleMode::Wild));
        assert_ne!(world.world.ambient, TEST_AMBIENT);
        assert_eq!(runner.session().map(|s| s.ambient()), Some(TEST_AMBIENT));
    }

    #[test]
    fn test_item_without_potion_is_rejected() {
        // Arrange
        let mut world = TestWorld::new(vec![TestPalBuilder::new("Sprig").build()]);
        let mut runner = runner(vec![]);
        assert_ok(runner.start_battle(&mut world.host(), None, bramblet()));

        // Act
        let err = assert_action_error(runner.submit_action(&mut world.host(), PlayerAction::Item));

        // Assert
        assert_eq!(err, ActionError::ItemUnavailable(ItemKind::Potion));
        assert_eq!(runner.session().map(|s| s.round()), Some(1));
    }

    #[test]
    fn test_potion_heals_and_is_consumed() {
        // Arrange
        let mut world = TestWorld::new(vec![TestPalBuilder::new("Sprig").with_hp(20).build()])
            .with_items(&[(ItemKind::Potion, 1)]);
        // Rolls: heal variance, ai defend
        let mut runner = runner(vec![2, 2]);
        assert_ok(runner.start_battle(&mut world.host(), None, bramblet()));

        // Act
        let outcome = assert_ok(runner.submit_action(&mut world.host(), PlayerAction::Item));

        // Assert
        assert_eq!(
            outcome.events[..2].to_vec(),
            vec![
                BattleEvent::ItemUsed {
                    item: ItemKind::Potion,
                },
                BattleEvent::PalHealed {
                    side: Side::Player,
                    pal: "Sprig".to_string(),
                    amount: 17,
                    new_hp: 37,
                },
            ]
        );
        assert_eq!(world.backpack.item_count(ItemKind::Potion), 0);
        assert_eq!(world.roster.pals()[0].hp, 37);
    }

    #[test]
    fn test_successful_run_ends_wild_battle() {
        // Arrange
        let mut world = TestWorld::new(vec![TestPalBuilder::new("Sprig").build()]);
        let mut runner = runner(vec![44]);
        assert_ok(runner.start_battle(&mut world.host(), None, bramblet()));

        // Act
        let outcome = assert_ok(runner.submit_action(&mut world.host(), PlayerAction::Run));

        // Assert
        assert_eq!(
            outcome.events,
            vec![
                BattleEvent::Fled,
                BattleEvent::BattleEnded {
                    outcome: BattleOutcome::Fled,
                },
            ]
        );
        assert!(!runner.is_active());
        assert_eq!(world.world.cleared_wild, vec!["Bramblet".to_string()]);
        assert!(!world.quests.is_true(DEFEATED_FIRST_PAL));
    }

    #[test]
    fn test_failed_run_costs_the_turn() {
        // Arrange
        let mut world = TestWorld::new(vec![TestPalBuilder::new("Sprig").build()]);
        // Rolls: run, ai basic, ai variance
        let mut runner = runner(vec![45, 0, 0]);
        assert_ok(runner.start_battle(&mut world.host(), None, bramblet()));

        // Act
        let outcome = assert_ok(runner.submit_action(&mut world.host(), PlayerAction::Run));

        // Assert
        assert_eq!(outcome.events[0], BattleEvent::RunFailed);
        assert!(outcome.events.contains(&BattleEvent::MoveUsed {
            side: Side::Opponent,
            pal: "Bramblet".to_string(),
            move_name: "Basic Attack".to_string(),
            kind: MoveKind::Basic,
        }));
        assert!(outcome.session_active);
        assert_eq!(world.roster.pals()[0].hp, 40);
    }

    #[test]
    fn test_wild_victory_pays_experience_and_reports_outcome() {
        // Arrange
        let mut world = TestWorld::new(vec![TestPalBuilder::new("Sprig").with_damage(20, 20).build()]);
        let mut runner = runner(vec![0]);
        let opponent = OpponentParty::wild(TestPalBuilder::new("Bramblet").with_max_hp(10).build());
        assert_ok(runner.start_battle(&mut world.host(), None, opponent));

        // Act
        let outcome = assert_ok(runner.submit_action(&mut world.host(), PlayerAction::Basic));

        // Assert
        let tail = outcome.events[outcome.events.len() - 3..].to_vec();
        assert_eq!(
            tail,
            vec![
                BattleEvent::PalFainted {
                    side: Side::Opponent,
                    pal: "Bramblet".to_string(),
                },
                BattleEvent::BattleEnded {
                    outcome: BattleOutcome::Victory,
                },
                BattleEvent::ExperienceGained {
                    pal: "Sprig".to_string(),
                    amount: 50,
                },
            ]
        );
        assert_eq!(world.roster.pals()[0].experience, 50);
        assert!(world.quests.is_true(DEFEATED_FIRST_PAL));
        assert_eq!(world.world.cleared_wild, vec!["Bramblet".to_string()]);
        assert!(!world.world.in_battle());
    }

    #[test]
    fn test_seeded_battle_always_reaches_an_end() {
        // Arrange
        let mut world = TestWorld::new(vec![TestPalBuilder::new("Sprig").build()]);
        let mut runner = BattleRunner::new(BattleConfig::default(), TurnRng::from_seed(2024));
        assert_ok(runner.start_battle(&mut world.host(), None, bramblet()));

        // Act
        let mut turns = 0;
        while runner.is_active() && turns < 200 {
            let result = match runner.submit_action(&mut world.host(), PlayerAction::Basic) {
                Err(_) => runner.submit_action(&mut world.host(), PlayerAction::Special),
                ok => ok,
            };
            if result.is_err() {
                assert_ok(runner.submit_action(&mut world.host(), PlayerAction::Defend));
            }
            turns += 1;
        }

        // Assert
        assert!(!runner.is_active());
        let outcome = world.quests.concluded[0].outcome;
        assert!(matches!(outcome, BattleOutcome::Victory | BattleOutcome::Defeat));
        assert!(!world.world.in_battle());
    }
}
