//! Principal extraction from the upstream auth layer
//!
//! Session handling lives upstream; requests arrive carrying an opaque,
//! already-authenticated principal id in the `x-user-id` header. This
//! middleware only consumes that id.

use crate::api::models::{error_codes, ApiError};
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated principal for the current request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
}

/// Reject requests without a principal id; otherwise stash it as an
/// extension for handlers.
pub async fn require_user(
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    match user_id {
        Some(id) if !id.is_empty() => {
            request.extensions_mut().insert(AuthenticatedUser { id });
            Ok(next.run(request).await)
        }
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiError::new(
                error_codes::UNAUTHORIZED,
                "User not authenticated",
            )),
        )),
    }
}
