use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderName;

use crate::domain::tenant::Role;
use crate::http::AppError;
use crate::AppState;

/// Role of the caller as asserted by the upstream auth layer.
#[derive(Debug, Clone, Copy)]
pub struct CallerRole(pub Role);

const USER_ROLE_HEADER: HeaderName = HeaderName::from_static("x-user-role");

#[axum::async_trait]
impl FromRequestParts<AppState> for CallerRole {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ROLE_HEADER) else {
            return Ok(CallerRole(Role::Member));
        };

        let value = value
            .to_str()
            .map_err(|_| AppError::bad_request("invalid x-user-role header"))?;

        Ok(CallerRole(Role::parse(value)))
    }
}
