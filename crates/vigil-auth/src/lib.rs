//! Identity issuance for Vigil: credential verification, account
//! registration, and self-contained signed tokens.
//!
//! Tokens are stateless — validation needs only the process-wide signing
//! key, which is injected at startup and read-only afterwards. No
//! server-side session exists.

pub mod account;
pub mod error;
pub mod password;
pub mod token;

pub use account::{authenticate, change_role, register};
pub use error::AuthError;
pub use token::{Claims, TokenKeys};
