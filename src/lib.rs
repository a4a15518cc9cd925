//! filestash - minimal HTTP file storage server
//!
//! Upload a file with a multipart POST to `/upload`, get back a JSON
//! descriptor with a URL, and fetch the bytes again from `/files/{name}`.

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod web;

pub use config::Config;
pub use error::{Result, StashError};
pub use storage::LocalStorage;
pub use web::WebServer;
