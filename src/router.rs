use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::game;
use crate::shared::AppState;
use crate::user;
use crate::websockets;

/// All HTTP and WebSocket routes. Game mutations go through the caller identity layer.
pub fn build_router(app_state: AppState) -> Router {
    let protected = Router::new()
        .route("/games", post(game::create_game))
        .route("/games/:id/join", post(game::join_game))
        .route("/games/:id/leave", post(game::leave_game))
        .route("/games/:id/start", post(game::start_game))
        .route("/games/:id/abandon", post(game::abandon_game))
        .route("/games/:id/throw", post(game::throw_dice))
        .route("/games/:id/end-turn", post(game::end_turn))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            user::caller_identity,
        ));

    let public = Router::new()
        .route("/scores", post(game::get_scores))
        .route("/dice/throw", post(game::throw_free_dice))
        .route("/users", post(user::create_user).get(user::find_user))
        .route("/users/:id", get(user::get_user))
        .route("/users/:id/scores", get(user::get_user_scores))
        .route("/games", get(game::list_games))
        .route("/games/:id", get(game::get_game))
        .route("/games/:id/ws", get(websockets::game_socket));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        // Browser clients are served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
