use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use crate::shared::{AppError, AppState};

/// Header carrying the authenticated user id, set by the upstream gateway
pub const CALLER_HEADER: &str = "x-user-id";

/// The user a request acts on behalf of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
}

/// Resolves the caller from the `x-user-id` header and adds a `Caller` extension.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), user::caller_identity))
/// Handlers then extract `Extension(caller): Extension<Caller>`.
#[instrument(skip(state, req, next))]
pub async fn caller_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = req
        .headers()
        .get(CALLER_HEADER)
        .and_then(|header| header.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            warn!(uri = %req.uri(), "Missing caller header");
            AppError::Unauthorized(format!("Missing {} header", CALLER_HEADER))
        })?
        .to_string();

    if state.user_repository.get_user(&user_id).await?.is_none() {
        warn!(user_id = %user_id, "Unknown caller");
        return Err(AppError::Unauthorized(format!("Unknown user: {}", user_id)));
    }

    debug!(user_id = %user_id, "Caller identified");
    req.extensions_mut().insert(Caller { user_id });

    Ok(next.run(req).await)
}
