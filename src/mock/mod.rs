//! Mock travel-booking backend
//!
//! An in-process responder for auth, bookings, tours and health routes, plus
//! a small HTTP server exposing it on a socket.

pub mod config;
pub mod fixtures;
pub mod handlers;
pub mod responder;
pub mod routes;
pub mod server;

pub use config::MockServerConfig;
pub use responder::{MockRequest, MockResponder, MockResponse, RequestOptions};
pub use routes::{HttpMethod, PathPattern, Route, RouteInfo};
pub use server::MockServer;
