use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::services::directory::Principal;

// Errors returned by token issuance and subject extraction.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(#[from] jsonwebtoken::errors::Error),
    #[error("empty 'sub' claim")]
    EmptySubject,
    #[error("failed to sign token")]
    Signing,
}

/// Access token claims.
///
/// NOTE:
/// - `jti` is random so two tokens issued in the same second still differ.
/// - `authorities` is informational; the filter trusts the directory, not the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    #[serde(default)]
    pub authorities: Vec<String>,
}

/// HS256 token issuer/verifier bound to a single server-held secret.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenService {
    issuer: String,
    ttl_seconds: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl_seconds: u64) -> Self {
        let issuer = issuer.into();

        // Expiry is checked by `validate_at` against our own clock, strictly.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["sub", "exp", "iss"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            issuer,
            ttl_seconds,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn issue(
        &self,
        subject: &str,
        authorities: &BTreeSet<String>,
    ) -> Result<String, TokenError> {
        self.issue_at(subject, authorities, Utc::now())
    }

    /// Issue a token valid from `now` for `ttl_seconds`.
    pub fn issue_at(
        &self,
        subject: &str,
        authorities: &BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let iat = now.timestamp();
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| iat.checked_add(ttl))
            .ok_or_else(|| {
                error!(ttl_seconds = self.ttl_seconds, "token expiry out of range");
                TokenError::Signing
            })?;

        let claims = AccessTokenClaims {
            iss: self.issuer.clone(),
            sub: subject.to_string(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
            authorities: authorities.iter().cloned().collect(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            TokenError::Signing
        })
    }

    /// Verify signature and structure, then decode claims. Expiry is NOT checked here.
    pub fn decode(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        let claims = self.decode(token)?;
        if claims.sub.trim().is_empty() {
            return Err(TokenError::EmptySubject);
        }
        Ok(claims.sub)
    }

    pub fn validate(&self, token: &str, principal: &Principal) -> bool {
        self.validate_at(token, principal, Utc::now())
    }

    /// True only for an authentic token whose subject is `principal` and whose
    /// expiry lies strictly after `now`. Never errors.
    pub fn validate_at(&self, token: &str, principal: &Principal, now: DateTime<Utc>) -> bool {
        let claims = match self.decode(token) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(error = %err, "token rejected during validation");
                return false;
            }
        };

        if claims.sub != principal.username {
            debug!(sub = %claims.sub, username = %principal.username, "token subject mismatch");
            return false;
        }

        if claims.exp <= now.timestamp() {
            debug!(exp = claims.exp, now = now.timestamp(), "token expired");
            return false;
        }

        true
    }
}
