//! Auth domain actions - business logic functions
//!
//! Actions are async functions called directly from the HTTP handlers.

mod init_session;
mod login;
mod verify_session;

pub use init_session::init_session;
pub use login::login;
pub use verify_session::{extract_bearer, verify_session_token};
