use maksijatsi::{game::ScoreType, AppError};

use super::setup::TestSetup;

/// Throws all six dice, landing on `faces`
#[allow(dead_code)]
pub async fn throw_all(
    setup: &TestSetup,
    game_id: &str,
    player: &str,
    faces: Vec<u8>,
) -> Result<(), AppError> {
    setup.dice.push(faces);
    setup
        .service
        .throw_dice(game_id, player, 6, vec![])
        .await
        .map(|_| ())
}

/// One throw of `faces` followed by scoring `score_type`
#[allow(dead_code)]
pub async fn play_turn(
    setup: &TestSetup,
    game_id: &str,
    player: &str,
    faces: Vec<u8>,
    score_type: ScoreType,
) -> Result<u32, AppError> {
    throw_all(setup, game_id, player, faces).await?;
    setup.service.end_turn(game_id, player, score_type).await
}
