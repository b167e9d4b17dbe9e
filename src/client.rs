//! Client-credentials identities: validated names, redacted secrets, and configurations.

pub mod config;
pub mod name;
pub mod secret;

pub use config::*;
pub use name::*;
pub use secret::*;
