//! Auth domain - phone-verified sessions backed by an external identity provider
//!
//! Responsibilities:
//! - Starting phone verification with the provider
//! - Issuing a signed JWT once the provider confirms a session/phone pair
//! - Verifying presented tokens (signature, expiry, upstream revocation)

pub mod actions;
pub mod error;
pub mod jwt;
pub mod types;

pub use error::AuthError;
pub use jwt::{Claims, JwtService};
pub use types::{mask_phone, VerifiedPhone, VerifiedSession};
