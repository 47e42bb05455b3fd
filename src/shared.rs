use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use crate::event::EventBus;
use crate::game::{DiceProvider, GameError, GameRepository, GameService};
use crate::user::{UserRepository, UserService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub game_repository: Arc<dyn GameRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub dice_provider: Arc<dyn DiceProvider>,
    pub event_bus: EventBus,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        game_repository: Arc<dyn GameRepository>,
        user_repository: Arc<dyn UserRepository>,
        dice_provider: Arc<dyn DiceProvider>,
        event_bus: EventBus,
        config: AppConfig,
    ) -> Self {
        Self {
            game_repository,
            user_repository,
            dice_provider,
            event_bus,
            config: Arc::new(config),
        }
    }

    pub fn game_service(&self) -> GameService {
        GameService::new(
            Arc::clone(&self.game_repository),
            Arc::clone(&self.user_repository),
            Arc::clone(&self.dice_provider),
            self.event_bus.clone(),
            &self.config,
        )
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(Arc::clone(&self.user_repository))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    State(GameError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// The concurrent-save error: another mutation of the same game committed first
    pub fn stale_turn(game_id: &str) -> Self {
        AppError::Conflict(format!("StaleTurn: game {} was modified concurrently", game_id))
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "ValidationError",
            AppError::State(e) => e.code(),
            AppError::Conflict(msg) if msg.starts_with("StaleTurn") => "StaleTurn",
            AppError::Conflict(_) => "Conflict",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal => "Internal",
        }
    }
}

impl From<GameError> for AppError {
    fn from(error: GameError) -> Self {
        if error.is_validation() {
            AppError::Validation(error.to_string())
        } else {
            AppError::State(error)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::State(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}
