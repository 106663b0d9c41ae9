use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// Valid API tokens, shared with the auth middleware
#[derive(Clone)]
pub struct AuthTokens(Arc<Vec<String>>);

impl AuthTokens {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(Arc::new(tokens))
    }

    fn is_valid(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }
}

/// Checks the 'Token' header against the configured list.
///
/// A missing header is a 400, an unknown token a 401. Rejected attempts
/// are logged at warn level.
pub async fn require_token(
    State(tokens): State<AuthTokens>,
    request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("token")
        .and_then(|value| value.to_str().ok());

    match token {
        None => (StatusCode::BAD_REQUEST, "missing 'Token' header").into_response(),
        Some(token) if !tokens.is_valid(token) => {
            warn!(token, "request with invalid token");
            (StatusCode::UNAUTHORIZED, "the token is not valid").into_response()
        }
        Some(_) => next.run(request).await,
    }
}
