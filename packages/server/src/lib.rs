// Rauth Gateway - API Core
//
// HTTP façade over an external phone-verification provider. Issues a signed
// session token once the provider confirms a phone number and checks that
// token, including upstream revocation, on protected routes.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
