//! `reelhouse-auth` — pure authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it decides
//! whether a presented token identifies a caller, nothing else.

pub mod claims;
pub mod validator;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use validator::{AuthError, Hs256JwtValidator, JwtValidator};
