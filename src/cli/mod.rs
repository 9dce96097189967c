//! CLI argument parsing

pub mod args;

pub use args::{Args, CallArgs, CheckArgs, Command, ServeArgs};
