//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{RauthAdapter, ServerDeps};
pub use test_dependencies::MockIdentityProvider;
pub use traits::*;
