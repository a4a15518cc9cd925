//! Middleware for the filestash HTTP surface.

pub mod cors;

pub use cors::create_cors_layer;
