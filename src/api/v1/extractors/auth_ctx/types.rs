/*
 * Responsibility
 * - The per-request "security context" type as seen by handlers
 * - The authentication middleware fills it and stores it in request extensions;
 *   handlers and extractors only read it
 *
 * Notes
 * - Lives in the request, never in thread-locals: created empty per request,
 *   set at most once by the middleware, dropped with the request
 */
use std::collections::BTreeSet;
use std::net::SocketAddr;

use crate::services::directory::Principal;

/// Request metadata recorded alongside a successful authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDetails {
    pub remote_addr: Option<SocketAddr>,
    pub request_id: Option<String>,
}

/// An authenticated principal plus what it was granted for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    pub principal: Principal,
    pub authorities: BTreeSet<String>,
    pub details: RequestDetails,
}

impl Authentication {
    pub fn new(principal: Principal, details: RequestDetails) -> Self {
        let authorities = principal.authorities.clone();
        Self {
            principal,
            authorities,
            details,
        }
    }

    pub fn username(&self) -> &str {
        &self.principal.username
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}

/// Zero or one authenticated principal for the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    authentication: Option<Authentication>,
}

impl SecurityContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authentication.is_some()
    }

    pub fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.authentication.as_ref().map(|a| &a.principal)
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authentication
            .as_ref()
            .is_some_and(|a| a.has_authority(authority))
    }

    pub fn set_authentication(&mut self, authentication: Authentication) {
        self.authentication = Some(authentication);
    }

    pub fn clear(&mut self) {
        self.authentication = None;
    }
}
