//! News Module
//! Mission: Article storage, access control and HTTP endpoints

pub mod api;
pub mod models;
pub mod service;
pub mod store;

pub use api::NewsState;
pub use service::{can_modify, NewsService};
pub use store::{NewsStore, SqliteNewsStore};
