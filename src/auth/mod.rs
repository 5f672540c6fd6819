//! Authentication Module
//! Mission: Password accounts, JWT sessions and bearer-token protection

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod service;
pub mod user_store;

pub use api::AuthState;
pub use jwt::JwtHandler;
pub use middleware::auth_middleware;
pub use service::AuthService;
pub use user_store::{SqliteUserStore, UserStore};
