use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use tracing::{info, instrument};

use super::{
    dice::DiceThrow,
    logic::GameSession,
    repository::GamePage,
    scoring::ScoreTable,
    types::{
        CreateGameRequest, EndTurnRequest, FreeThrowRequest, GetScoresRequest, LeaveGameResponse,
        ListGamesQuery, ThrowRequest,
    },
};
use crate::shared::{AppError, AppState};
use crate::user::Caller;

/// Scores every category for the given dice
///
/// POST /scores
#[instrument(name = "get_scores", skip(state))]
pub async fn get_scores(
    State(state): State<AppState>,
    Json(request): Json<GetScoresRequest>,
) -> Result<Json<ScoreTable>, AppError> {
    let table = state.game_service().get_scores(&request.dice_values)?;
    Ok(Json(table))
}

/// POST /dice/throw
#[instrument(name = "throw_free_dice", skip(state))]
pub async fn throw_free_dice(
    State(state): State<AppState>,
    Json(request): Json<FreeThrowRequest>,
) -> Result<Json<DiceThrow>, AppError> {
    let dice_throw = state
        .game_service()
        .throw_free_dice(request.number_of_dice)?;
    Ok(Json(dice_throw))
}

/// GET /games?state=&participant=&limit=&nextToken=
#[instrument(name = "list_games", skip(state))]
pub async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<GamePage>, AppError> {
    let page = state.game_service().list_games(query).await?;
    Ok(Json(page))
}

/// GET /games/:id
#[instrument(name = "get_game", skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameSession>, AppError> {
    let game = state.game_service().get_game(&game_id).await?;
    Ok(Json(game))
}

/// POST /games
#[instrument(name = "create_game", skip(state))]
pub async fn create_game(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<CreateGameRequest>,
) -> Result<Json<GameSession>, AppError> {
    let game = state
        .game_service()
        .create_game(&caller.user_id, request.name)
        .await?;

    info!(game_id = %game.id, host = %caller.user_id, "Game created successfully");
    Ok(Json(game))
}

/// POST /games/:id/join
#[instrument(name = "join_game", skip(state))]
pub async fn join_game(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(game_id): Path<String>,
) -> Result<Json<GameSession>, AppError> {
    let game = state
        .game_service()
        .join_game(&game_id, &caller.user_id)
        .await?;
    Ok(Json(game))
}

/// POST /games/:id/leave
#[instrument(name = "leave_game", skip(state))]
pub async fn leave_game(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(game_id): Path<String>,
) -> Result<Json<LeaveGameResponse>, AppError> {
    let response = state
        .game_service()
        .leave_game(&game_id, &caller.user_id)
        .await?;
    Ok(Json(response))
}

/// POST /games/:id/start
#[instrument(name = "start_game", skip(state))]
pub async fn start_game(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(game_id): Path<String>,
) -> Result<Json<GameSession>, AppError> {
    let game = state
        .game_service()
        .start_game(&game_id, &caller.user_id)
        .await?;
    Ok(Json(game))
}

/// POST /games/:id/abandon
#[instrument(name = "abandon_game", skip(state))]
pub async fn abandon_game(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(game_id): Path<String>,
) -> Result<Json<GameSession>, AppError> {
    let game = state
        .game_service()
        .abandon_game(&game_id, &caller.user_id)
        .await?;
    Ok(Json(game))
}

/// POST /games/:id/throw
#[instrument(name = "throw_dice", skip(state))]
pub async fn throw_dice(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(game_id): Path<String>,
    Json(request): Json<ThrowRequest>,
) -> Result<Json<DiceThrow>, AppError> {
    let dice_throw = state
        .game_service()
        .throw_dice(
            &game_id,
            &caller.user_id,
            request.number_of_dice,
            request.hold,
        )
        .await?;
    Ok(Json(dice_throw))
}

/// Responds with the points awarded
///
/// POST /games/:id/end-turn
#[instrument(name = "end_turn", skip(state))]
pub async fn end_turn(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(game_id): Path<String>,
    Json(request): Json<EndTurnRequest>,
) -> Result<Json<u32>, AppError> {
    let points = state
        .game_service()
        .end_turn(&game_id, &caller.user_id, request.score_type)
        .await?;
    Ok(Json(points))
}
