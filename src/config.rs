//! Process Configuration
//! Mission: Read settings once at boot and hand an explicit Config to every component

use crate::error::ServiceError;
use clap::Parser;

/// Issuer stamped into and required from every session token
pub const TOKEN_ISSUER: &str = "news-manager-api";

/// Session token lifetime
pub const TOKEN_TTL_HOURS: i64 = 24;

/// bcrypt accepts work factors in this range
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Cheapest valid cost, used by `Config::for_tests` and unit tests
pub const TEST_BCRYPT_COST: u32 = MIN_BCRYPT_COST;

#[derive(Parser, Debug, Clone)]
#[command(name = "news-manager")]
#[command(about = "News management API - JWT auth and article CRUD")]
pub struct Args {
    /// SQLite database file (":memory:" for an ephemeral store)
    #[arg(long, env = "DATABASE_PATH", default_value = "news_manager.db")]
    pub database_path: String,

    /// Symmetric secret used to sign session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// bcrypt work factor for password hashing
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    /// Comma-separated allowed CORS origins (empty = permissive)
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", default_value = "")]
    pub cors_origins: String,

    /// Admin account seeded at boot when a password is supplied
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    pub admin_username: String,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
}

/// Credentials for the boot-time admin account
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    pub admin_seed: Option<AdminSeed>,
}

impl Config {
    /// Validate raw arguments. A missing signing secret is fatal here, at boot,
    /// rather than on the first login.
    pub fn from_args(args: Args) -> Result<Self, ServiceError> {
        let jwt_secret = args
            .jwt_secret
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ServiceError::Configuration("JWT_SECRET is not set".to_string()))?;

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&args.bcrypt_cost) {
            return Err(ServiceError::Configuration(format!(
                "BCRYPT_COST must be between {} and {}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, args.bcrypt_cost
            )));
        }

        let cors_origins = args
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let admin_seed = args
            .admin_password
            .filter(|p| !p.is_empty())
            .map(|password| AdminSeed {
                username: args.admin_username.trim().to_string(),
                password,
            });

        Ok(Self {
            database_path: args.database_path,
            jwt_secret,
            host: args.host,
            port: args.port,
            bcrypt_cost: args.bcrypt_cost,
            cors_origins,
            admin_seed,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// In-memory configuration for tests
    pub fn for_tests(secret: &str) -> Self {
        Self {
            database_path: ":memory:".to_string(),
            jwt_secret: secret.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            bcrypt_cost: TEST_BCRYPT_COST,
            cors_origins: Vec::new(),
            admin_seed: None,
        }
    }
}
