// HTTP routes
pub mod health;
pub mod login;
pub mod protected;
pub mod webhook;

pub use health::*;
pub use login::*;
pub use protected::*;
pub use webhook::*;
