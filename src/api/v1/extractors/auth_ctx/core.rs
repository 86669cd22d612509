use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use thiserror::Error;
use tracing::debug;

use crate::error::AppError;
use crate::services::directory::ROLE_ADMIN;
use crate::state::AppState;

use super::{Authentication, SecurityContext};

/// Outcome of an authorization check against the request's security context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("missing authority {authority}")]
    Forbidden { authority: &'static str },
}

impl From<AuthzError> for AppError {
    fn from(e: AuthzError) -> Self {
        match e {
            AuthzError::Unauthenticated => AppError::Unauthorized,
            AuthzError::Forbidden { .. } => AppError::Forbidden,
        }
    }
}

/// Requires an authenticated context. With no context at all (middleware not applied)
/// the request is treated as unauthenticated as well.
pub fn require_authenticated(ctx: Option<&SecurityContext>) -> Result<Authentication, AuthzError> {
    ctx.and_then(SecurityContext::authentication)
        .cloned()
        .ok_or(AuthzError::Unauthenticated)
}

pub fn require_authority(
    ctx: Option<&SecurityContext>,
    authority: &'static str,
) -> Result<Authentication, AuthzError> {
    let auth = require_authenticated(ctx)?;
    if !auth.has_authority(authority) {
        debug!(username = %auth.username(), authority, "authorization denied");
        return Err(AuthzError::Forbidden { authority });
    }
    Ok(auth)
}

/// Extractor for handlers that need any authenticated principal (401 otherwise).
pub struct CurrentUser(pub Authentication);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = require_authenticated(parts.extensions.get::<SecurityContext>())?;
        Ok(CurrentUser(auth))
    }
}

/// Extractor for administrative handlers (401 when anonymous, 403 without ROLE_ADMIN).
pub struct AdminUser(pub Authentication);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = require_authority(parts.extensions.get::<SecurityContext>(), ROLE_ADMIN)?;
        Ok(AdminUser(auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::v1::extractors::RequestDetails;
    use crate::services::directory::Principal;

    fn ctx_for(authorities: &[&str]) -> SecurityContext {
        let mut ctx = SecurityContext::empty();
        ctx.set_authentication(Authentication::new(
            Principal::new("someone", "hash", authorities.iter().copied()),
            RequestDetails::default(),
        ));
        ctx
    }

    #[test]
    fn missing_or_empty_context_is_unauthenticated() {
        assert_eq!(
            require_authenticated(None).unwrap_err(),
            AuthzError::Unauthenticated
        );
        assert_eq!(
            require_authenticated(Some(&SecurityContext::empty())).unwrap_err(),
            AuthzError::Unauthenticated
        );
    }

    #[test]
    fn authority_is_enforced() {
        let user = ctx_for(&["ROLE_USER"]);
        assert_eq!(
            require_authority(Some(&user), ROLE_ADMIN).unwrap_err(),
            AuthzError::Forbidden { authority: ROLE_ADMIN }
        );

        let admin = ctx_for(&[ROLE_ADMIN]);
        assert_eq!(
            require_authority(Some(&admin), ROLE_ADMIN).unwrap().username(),
            "someone"
        );
    }

    #[test]
    fn maps_onto_http_errors() {
        assert!(matches!(
            AppError::from(AuthzError::Unauthenticated),
            AppError::Unauthorized
        ));
        assert!(matches!(
            AppError::from(AuthzError::Forbidden { authority: ROLE_ADMIN }),
            AppError::Forbidden
        ));
    }
}
