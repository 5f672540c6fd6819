//! News Manager Backend Library
//!
//! JWT-authenticated news CRUD service. Exposes every module so the binary
//! and the integration tests share one router.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod news;

pub use app::App;
pub use config::Config;
pub use error::{ServiceError, StoreError};
