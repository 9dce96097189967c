//! tripmock library interface
//!
//! A mock travel-booking backend plus the smoke/API check suite that drives
//! either the mock or the real service.
//!
//! # Module Organization
//!
//! - [`mock`] - In-process responder, routing table and HTTP server
//! - [`client`] - Backend selection (mock or live HTTP)
//! - [`suite`] - Checks, runner and report
//! - [`config`] - Harness configuration and `.env` loading
//! - [`errors`] - Error types (TripmockError, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Command dispatch

pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod errors;
pub mod logging;
pub mod mock;
pub mod signals;
pub mod status;
pub mod suite;
