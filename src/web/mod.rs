//! HTTP surface for filestash.
//!
//! Upload handling, file serving, routing, and the server wiring live here.
//! Handlers receive their storage dependency through [`handlers::AppState`].

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
