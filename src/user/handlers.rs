use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument};

use super::{
    models::User,
    types::{CreateUserRequest, FindUserQuery},
};
use crate::game::Score;
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a player profile
///
/// POST /users
#[instrument(name = "create_user", skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<User>, AppError> {
    let user = state.user_service().create_user(request).await?;
    info!(user_id = %user.id, "User created successfully");
    Ok(Json(user))
}

/// GET /users?profileOwner=<owner>
#[instrument(name = "find_user", skip(state))]
pub async fn find_user(
    State(state): State<AppState>,
    Query(query): Query<FindUserQuery>,
) -> Result<Json<User>, AppError> {
    let user = state
        .user_service()
        .find_by_profile_owner(&query.profile_owner)
        .await?;
    Ok(Json(user))
}

/// GET /users/:id
#[instrument(name = "get_user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = state.user_service().get_user(&user_id).await?;
    Ok(Json(user))
}

/// Scores of the user across every game they take part in
///
/// GET /users/:id/scores
#[instrument(name = "get_user_scores", skip(state))]
pub async fn get_user_scores(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Score>>, AppError> {
    let scores = state.game_service().scores_for_user(&user_id).await?;
    info!(score_count = scores.len(), "User scores retrieved");
    Ok(Json(scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app() -> Router {
        let app_state = AppStateBuilder::new().build();
        Router::new()
            .route("/users", post(create_user).get(find_user))
            .route("/users/:id", get(get_user))
            .route("/users/:id/scores", get(get_user_scores))
            .with_state(app_state)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn create_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/users")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let app = app();

        let response = app
            .clone()
            .oneshot(create_request(r#"{"name": "Maija", "profileOwner": "sub-123"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created: User = body_json(response).await;
        assert_eq!(created.name, "Maija");
        assert_eq!(created.profile_owner, "sub-123");

        let response = app
            .clone()
            .oneshot(get_request("/users?profileOwner=sub-123"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let found: User = body_json(response).await;
        assert_eq!(found, created);

        let response = app
            .clone()
            .oneshot(get_request(&format!("/users/{}", created.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_request(&format!("/users/{}/scores", created.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let scores: Vec<Score> = body_json(response).await;
        assert!(scores.is_empty());
    }

    #[tokio::test]
    async fn test_create_user_empty_name() {
        let response = app()
            .oneshot(create_request(r#"{"name": " ", "profileOwner": "sub-123"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_profile_owner_conflicts() {
        let app = app();
        let body = r#"{"name": "Maija", "profileOwner": "sub-123"}"#;

        let first = app.clone().oneshot(create_request(body)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let second = app.oneshot(create_request(body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let app = app();
        let response = app.clone().oneshot(get_request("/users/nobody")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(get_request("/users?profileOwner=nobody"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
