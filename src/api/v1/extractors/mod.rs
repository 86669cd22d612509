pub mod auth_ctx;

pub use auth_ctx::{
    AdminUser, Authentication, AuthzError, CurrentUser, RequestDetails, SecurityContext,
};
