use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use skylane_core::context::RequestContext;
use crate::state::OrderState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Numeric user id, as text.
    pub sub: String,
    pub exp: usize,
}

/// Verifies the bearer token and turns its claims into a
/// [`RequestContext`] request extension. The user id reaching the
/// orchestrator always comes from here, never from a request body.
pub async fn user_auth_middleware(
    State(state): State<OrderState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user_id: i64 = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(RequestContext::new(user_id));

    Ok(next.run(req).await)
}
