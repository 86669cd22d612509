pub mod factory;
pub mod jwt;
pub mod login;

pub use factory::{build_token_service, build_user_directory};
pub use jwt::{TokenError, TokenService};
pub use login::{IssuedToken, LoginService};
