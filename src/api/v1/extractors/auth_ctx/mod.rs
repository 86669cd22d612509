/*!
 * Security context + authorization extractors
 *
 * Responsibility:
 * - Give handlers the per-request SecurityContext filled by the authentication middleware
 * - Keep axum-specific extraction in core, plain types in types
 *
 * Public API:
 * - SecurityContext / Authentication / RequestDetails
 * - CurrentUser / AdminUser
 */

mod core;
mod types;

pub use core::{AdminUser, AuthzError, CurrentUser, require_authenticated, require_authority};
pub use types::{Authentication, RequestDetails, SecurityContext};
