/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public SoliForge client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{AuthContext, SessionToken, TokenClaims, decode_claims};

// Re-export commonly used types from http
pub use http::{
    ClientConfig, DEFAULT_BASE_URL, Result, SoliforgeClient, SoliforgeError, normalize_base_url,
};

// Re-export all types
pub use types::*;
