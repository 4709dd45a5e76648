//! HTTP server for pagestore.
//!
//! Serves the page builder's editor endpoint: JSON document snapshots and
//! upserts backed by [`pagestore_store`], multipart asset uploads into the
//! public folder, and builder asset files. The whole editor surface is gated
//! on the runtime mode and refused in production.

pub mod asset;
pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;
pub mod upload;

pub use auth::{RuntimeMode, MODE_ENV_VAR};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::PagestoreServer;
pub use state::AppState;
pub use upload::UploadStore;
