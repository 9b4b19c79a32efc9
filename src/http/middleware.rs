//! Request guards applied ahead of handlers

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::app::AppState;
use crate::http::routes::AppError;

/// Reject create/join requests beyond the configured per-second budget
pub async fn limit_entry(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.entry_limiter.check().is_err() {
        warn!(path = %request.uri().path(), "Entry rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}
