//! Harness configuration: `.env` loading, credentials and backend selection

pub mod env;
pub mod harness;
pub mod secret;

pub use env::EnvVars;
pub use harness::{Credentials, HarnessConfig};
pub use secret::SecretString;
