//! Bearer token → SecurityContext in request extensions.
//!
//! Runs once per request before any handler. It only *establishes* authentication:
//! every failure (no header, wrong scheme, bad signature, unknown user, expired token)
//! leaves an empty context and the request continues. Rejecting is left to the
//! extractors (`CurrentUser`, `AdminUser`) on routes that need it.

use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request, header, request::Parts},
    middleware::{self, Next},
    response::Response,
};
use tracing::{debug, info, warn};

use crate::api::v1::extractors::{Authentication, RequestDetails, SecurityContext};
use crate::middleware::http::REQUEST_ID_HEADER;
use crate::services::directory::DirectoryError;
use crate::state::AppState;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Terminal state reached by [`establish`] for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    NoHeader,
    MalformedHeader,
    MalformedToken,
    AlreadyAuthenticated,
    UnknownPrincipal,
    LookupFailed,
    Rejected,
    Authenticated,
}

impl FilterOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoHeader => "no_header",
            Self::MalformedHeader => "malformed_header",
            Self::MalformedToken => "malformed_token",
            Self::AlreadyAuthenticated => "already_authenticated",
            Self::UnknownPrincipal => "unknown_principal",
            Self::LookupFailed => "lookup_failed",
            Self::Rejected => "rejected",
            Self::Authenticated => "authenticated",
        }
    }
}

/// Apply the authentication middleware to every route of `router`.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, authenticate))
}

pub async fn authenticate(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let details = request_details(&parts);
    let mut ctx = parts
        .extensions
        .remove::<SecurityContext>()
        .unwrap_or_default();

    let outcome = establish(&state, &parts.headers, details, &mut ctx).await;
    debug!(
        outcome = outcome.as_str(),
        authenticated = ctx.is_authenticated(),
        "security context ready"
    );

    // middleware → extractor
    parts.extensions.insert(ctx);

    next.run(Request::from_parts(parts, body)).await
}

/// Decide what the security context holds for this request.
///
/// Never fails: errors are logged and end as an empty (cleared) context.
pub async fn establish(
    state: &AppState,
    headers: &HeaderMap,
    details: RequestDetails,
    ctx: &mut SecurityContext,
) -> FilterOutcome {
    let Some(raw) = headers.get(header::AUTHORIZATION) else {
        debug!("no authorization header");
        return FilterOutcome::NoHeader;
    };

    let Some(token) = raw
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
    else {
        debug!("authorization header is not a bearer credential; ignoring");
        return FilterOutcome::MalformedHeader;
    };

    debug!(token_len = token.len(), "bearer token present");

    let username = match state.tokens.extract_subject(token) {
        Ok(sub) => sub,
        Err(err) => {
            debug!(error = %err, "could not extract subject from bearer token");
            return FilterOutcome::MalformedToken;
        }
    };

    if ctx.is_authenticated() {
        debug!(username = %username, "security context already authenticated; skipping");
        return FilterOutcome::AlreadyAuthenticated;
    }

    let principal = match state.users.load_by_username(&username).await {
        Ok(p) => p,
        Err(DirectoryError::NotFound(_)) => {
            debug!(username = %username, "token subject not in user directory");
            ctx.clear();
            return FilterOutcome::UnknownPrincipal;
        }
        Err(err) => {
            warn!(
                username = %username,
                backend = state.users.backend_name(),
                error = %err,
                "user lookup failed; continuing unauthenticated"
            );
            ctx.clear();
            return FilterOutcome::LookupFailed;
        }
    };

    if !state.tokens.validate(token, &principal) {
        debug!(username = %username, "bearer token failed validation");
        ctx.clear();
        return FilterOutcome::Rejected;
    }

    info!(
        username = %username,
        remote_addr = ?details.remote_addr,
        "request authenticated"
    );
    ctx.set_authentication(Authentication::new(principal, details));

    FilterOutcome::Authenticated
}

fn request_details(parts: &Parts) -> RequestDetails {
    let remote_addr = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let request_id = parts
        .headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    RequestDetails {
        remote_addr,
        request_id,
    }
}
