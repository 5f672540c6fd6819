//! Application Assembly
//! Mission: Wire stores, services and routes from one validated Config

use crate::{
    auth::{api as auth_api, auth_middleware, AuthService, AuthState, JwtHandler, SqliteUserStore},
    config::Config,
    db::Database,
    error::ServiceError,
    middleware::request_logging,
    news::{api as news_api, NewsService, NewsState, SqliteNewsStore},
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Every long-lived component, built once at startup
#[derive(Clone)]
pub struct App {
    pub jwt_handler: Arc<JwtHandler>,
    pub auth_service: Arc<AuthService>,
    pub news_service: Arc<NewsService>,
}

impl App {
    /// Build services over an already-open database
    pub fn new(config: &Config, db: Database) -> Self {
        let jwt_handler = Arc::new(JwtHandler::from_config(config));
        let auth_service = Arc::new(AuthService::new(
            Arc::new(SqliteUserStore::new(db.clone())),
            jwt_handler.clone(),
            config.bcrypt_cost,
        ));
        let news_service = Arc::new(NewsService::new(Arc::new(SqliteNewsStore::new(db))));

        Self {
            jwt_handler,
            auth_service,
            news_service,
        }
    }

    /// Open the configured database, migrate it and seed the admin account if asked to
    pub fn bootstrap(config: &Config) -> Result<Self, ServiceError> {
        let db = Database::open(&config.database_path)?;
        let app = Self::new(config, db);

        if let Some(seed) = &config.admin_seed {
            app.auth_service.ensure_admin(seed)?;
        }
        if app.auth_service.admin_count()? == 0 {
            warn!("⚠️  No admin account exists; set ADMIN_PASSWORD to seed one");
        }

        Ok(app)
    }

    /// Full HTTP surface: `/health` plus the versioned API under `/api/v1`
    pub fn router(&self, config: &Config) -> Router {
        let require_auth =
            middleware::from_fn_with_state(self.jwt_handler.clone(), auth_middleware);

        let auth_state = AuthState::new(self.auth_service.clone());
        let news_state = NewsState {
            news_service: self.news_service.clone(),
        };

        let auth_routes = Router::new()
            .route("/register", post(auth_api::register))
            .route("/login", post(auth_api::login))
            .route(
                "/me",
                get(auth_api::get_current_user).route_layer(require_auth.clone()),
            )
            .with_state(auth_state);

        // Reads are public; every write passes the bearer check first
        let news_routes = Router::new()
            .route(
                "/news",
                get(news_api::list_news)
                    .merge(post(news_api::create_news).route_layer(require_auth.clone())),
            )
            .route(
                "/news/:id",
                get(news_api::get_news).merge(
                    put(news_api::update_news)
                        .delete(news_api::delete_news)
                        .route_layer(require_auth),
                ),
            )
            .with_state(news_state);

        Router::new()
            .route("/health", get(health_check))
            .nest("/api/v1", auth_routes.merge(news_routes))
            .layer(middleware::from_fn(request_logging))
            .layer(cors_layer(&config.cors_origins))
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Permissive when no origins are configured, otherwise an explicit allow-list
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    info!("🌐 CORS restricted to {} origin(s)", allowed.len());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 3600))
}
