pub mod access;

pub use access::{BEARER_PREFIX, FilterOutcome, apply, authenticate, establish};
