/*
[INPUT]:  Access tokens from login or persisted sessions
[OUTPUT]: Auth context and decoded token claims
[POS]:    Auth layer - bearer token handling for the SoliForge API
[UPDATE]: When auth flow or token handling changes
*/

pub mod claims;
pub mod session;

pub use claims::{TokenClaims, decode_claims};
pub use session::{AuthContext, SessionToken};
