mod utils;

use std::sync::Arc;
use std::time::Duration;

use maksijatsi::{
    config::{AppConfig, ScoringRules, UpperBonus},
    event::{GameEvent, GameSubscription},
    game::{GameError, GameState, ScoreType, TurnNumber},
    AppError,
};
use utils::{play_turn, throw_all, RecordingHandler, TestSetupBuilder};

const STRAIGHT: [u8; 6] = [1, 2, 3, 4, 5, 6];

fn assert_state_error<T: std::fmt::Debug>(result: Result<T, AppError>, expected: GameError) {
    match result {
        Err(AppError::State(error)) => assert_eq!(error, expected),
        other => panic!("Expected {:?}, got {:?}", expected, other),
    }
}

#[tokio::test]
async fn test_two_player_game_runs_to_completion() {
    let setup = TestSetupBuilder::new().with_two_players().build().await;
    let game = setup.started_game().await;

    let handler = Arc::new(RecordingHandler::new());
    let subscription =
        GameSubscription::new(game.id.clone(), handler.clone(), setup.event_bus.clone())
            .start()
            .await;

    let mut turns = 0;
    for score_type in ScoreType::all() {
        for player in &setup.players {
            let current = setup.service.get_game(&game.id).await.unwrap();
            assert_eq!(current.whos_turn(), Some(player.as_str()));

            play_turn(&setup, &game.id, player, STRAIGHT.to_vec(), score_type)
                .await
                .unwrap();
            turns += 1;
        }
    }
    assert_eq!(turns, 40);

    let finished = setup.service.get_game(&game.id).await.unwrap();
    assert_eq!(finished.state(), GameState::Finished);
    assert_eq!(finished.whos_turn(), None);
    assert_eq!(finished.turn_number(), None);
    assert!(finished.score_sheets().iter().all(|s| s.is_complete()));

    // 1..6 = 21, straights 15 + 20 + 21, chance 21
    let standings = finished.standings(&setup.config.rules);
    assert_eq!(standings.len(), 2);
    assert!(standings.iter().all(|s| s.total == 98));

    assert_state_error(
        throw_all(&setup, &game.id, setup.player(0), STRAIGHT.to_vec()).await,
        GameError::GameFinished,
    );
    assert_state_error(
        setup
            .service
            .end_turn(&game.id, setup.player(1), ScoreType::Chance)
            .await,
        GameError::GameFinished,
    );

    // The channel is closed once the game finishes, which ends the subscription
    tokio::time::timeout(Duration::from_secs(2), subscription)
        .await
        .expect("subscription should end with the game")
        .unwrap();

    let types = handler.event_types().await;
    assert_eq!(types.iter().filter(|t| **t == "dice_thrown").count(), 40);
    assert_eq!(types.iter().filter(|t| **t == "turn_ended").count(), 40);
    assert_eq!(types.last(), Some(&"game_finished"));

    match handler.events().await.last() {
        Some(GameEvent::GameFinished { standings, game }) => {
            assert_eq!(standings.len(), 2);
            assert_eq!(game.state(), GameState::Finished);
        }
        other => panic!("Expected GameFinished, got {:?}", other),
    }
}

#[tokio::test]
async fn test_three_players_take_turns_in_join_order() {
    let setup = TestSetupBuilder::new().with_three_players().build().await;
    let game = setup.started_game().await;

    let mut order = vec![];
    for (turn, score_type) in ScoreType::all().take(7).enumerate() {
        let current = setup.service.get_game(&game.id).await.unwrap();
        let player = current.whos_turn().unwrap().to_string();
        order.push(player.clone());

        // Everyone else is refused
        for other in setup.players.iter().filter(|p| **p != player) {
            assert_state_error(
                throw_all(&setup, &game.id, other, STRAIGHT.to_vec()).await,
                GameError::NotYourTurn,
            );
        }

        play_turn(&setup, &game.id, &player, STRAIGHT.to_vec(), score_type)
            .await
            .unwrap_or_else(|e| panic!("turn {} failed: {:?}", turn, e));
    }

    let p = &setup.players;
    assert_eq!(
        order,
        vec![
            p[0].clone(),
            p[1].clone(),
            p[2].clone(),
            p[0].clone(),
            p[1].clone(),
            p[2].clone(),
            p[0].clone()
        ]
    );
}

#[tokio::test]
async fn test_holding_dice_across_three_throws() {
    let setup = TestSetupBuilder::new().with_two_players().build().await;
    let game = setup.started_game().await;
    let alice = setup.player(0);

    setup.dice.push(vec![1, 1, 1, 2, 3, 4]);
    setup.dice.push(vec![1, 5]);
    setup.dice.push(vec![1, 1]);

    setup
        .service
        .throw_dice(&game.id, alice, 6, vec![])
        .await
        .unwrap();
    setup
        .service
        .throw_dice(&game.id, alice, 2, vec![1, 1, 1, 4])
        .await
        .unwrap();

    let current = setup.service.get_game(&game.id).await.unwrap();
    assert_eq!(current.turn_number(), Some(TurnNumber::Second));
    assert_eq!(current.dice(), &[1, 1, 1, 4, 1, 5]);

    // Only dice on the table can be held
    let result = setup
        .service
        .throw_dice(&game.id, alice, 2, vec![1, 1, 1, 6])
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    setup
        .service
        .throw_dice(&game.id, alice, 2, vec![1, 1, 1, 1])
        .await
        .unwrap();
    assert_state_error(
        setup
            .service
            .throw_dice(&game.id, alice, 6, vec![])
            .await,
        GameError::NoThrowsLeft,
    );

    let points = setup
        .service
        .end_turn(&game.id, alice, ScoreType::Ones)
        .await
        .unwrap();
    assert_eq!(points, 6);
}

#[tokio::test]
async fn test_rejected_turn_leaves_game_untouched() {
    let setup = TestSetupBuilder::new().with_two_players().build().await;
    let game = setup.started_game().await;
    let (alice, bob) = (setup.player(0), setup.player(1));

    play_turn(&setup, &game.id, alice, vec![6; 6], ScoreType::MaxiYatzy)
        .await
        .unwrap();
    play_turn(&setup, &game.id, bob, STRAIGHT.to_vec(), ScoreType::Chance)
        .await
        .unwrap();

    throw_all(&setup, &game.id, alice, vec![6; 6]).await.unwrap();
    let before = setup.service.get_game(&game.id).await.unwrap();

    assert_state_error(
        setup
            .service
            .end_turn(&game.id, alice, ScoreType::MaxiYatzy)
            .await,
        GameError::CategoryAlreadyScored(ScoreType::MaxiYatzy),
    );

    let after = setup.service.get_game(&game.id).await.unwrap();
    assert_eq!(after, before);

    // The same dice can still go into another category
    let points = setup
        .service
        .end_turn(&game.id, alice, ScoreType::Sixes)
        .await
        .unwrap();
    assert_eq!(points, 36);
}

#[tokio::test]
async fn test_lobby_lifecycle() {
    let setup = TestSetupBuilder::new().with_three_players().build().await;
    let game = setup.joinable_game().await;
    let (alice, bob, carol) = (setup.player(0), setup.player(1), setup.player(2));

    // The host leaves before the start; the next player takes over
    let left = setup.service.leave_game(&game.id, alice).await.unwrap();
    let remaining = left.game.unwrap();
    assert!(remaining.is_host(bob));
    assert_eq!(remaining.users(), &[bob.to_string(), carol.to_string()]);

    assert_state_error(
        setup.service.start_game(&game.id, alice).await,
        GameError::NotHost,
    );
    setup.service.start_game(&game.id, bob).await.unwrap();

    assert_state_error(
        setup.service.join_game(&game.id, alice).await,
        GameError::GameNotJoinable,
    );
    assert_state_error(
        setup.service.leave_game(&game.id, carol).await,
        GameError::GameAlreadyStarted,
    );
}

#[tokio::test]
async fn test_upper_bonus_from_config() {
    let config = AppConfig {
        rules: ScoringRules {
            upper_bonus: Some(UpperBonus {
                threshold: 10,
                points: 50,
            }),
            ..ScoringRules::default()
        },
        ..AppConfig::default()
    };
    let setup = TestSetupBuilder::new()
        .with_players(vec!["solo"])
        .with_config(config)
        .build()
        .await;
    let game = setup.started_game().await;
    let solo = setup.player(0);

    play_turn(&setup, &game.id, solo, vec![6; 6], ScoreType::Sixes)
        .await
        .unwrap();

    let current = setup.service.get_game(&game.id).await.unwrap();
    let standings = current.standings(&setup.config.rules);
    assert_eq!(standings[0].total, 36 + 50);
}
