use axum::http::HeaderMap;

use crate::config::AppConfig;
use crate::errors::AppError;

// Proof that a request presented the dashboard bearer token. Operations that
// require staff privileges take the session as an explicit argument, so
// authorization always happens at the call boundary and never through
// ambient state.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub actor: String,
}

pub fn authenticate(headers: &HeaderMap, config: &AppConfig) -> Result<AdminSession, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    authenticate_token(auth.strip_prefix("Bearer ").unwrap_or(""), config)
}

// SSE clients pass the token as a query param (EventSource can't set headers).
pub fn authenticate_token(token: &str, config: &AppConfig) -> Result<AdminSession, AppError> {
    if token.is_empty() || token != config.admin_token {
        return Err(AppError::Unauthorized);
    }

    Ok(AdminSession {
        actor: "admin".to_string(),
    })
}
