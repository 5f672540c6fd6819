//! Auth Service
//! Mission: Registration (hash + persist) and login (verify + issue token)

use crate::auth::jwt::JwtHandler;
use crate::auth::models::{NewUser, Role, User};
use crate::auth::user_store::UserStore;
use crate::config::AdminSeed;
use crate::error::{ServiceError, StoreError};
use bcrypt::{hash, verify};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtHandler>,
    bcrypt_cost: u32,
    /// Verified against when the username is unknown, so both failure paths pay for one bcrypt check
    dummy_hash: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: Arc<JwtHandler>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            jwt,
            bcrypt_cost,
            dummy_hash: hash("not-a-real-password", bcrypt_cost).unwrap_or_default(),
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        // bcrypt only fails on an out-of-range cost
        hash(password, self.bcrypt_cost).map_err(|e| {
            error!("Failed to hash password: {}", e);
            ServiceError::Configuration(format!("bcrypt cost {}: {}", self.bcrypt_cost, e))
        })
    }

    /// Create a regular user account
    pub fn register(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        self.create_user(username, password, Role::User)
    }

    fn create_user(&self, username: &str, password: &str, role: Role) -> Result<User, ServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServiceError::validation("Username is required"));
        }
        if password.is_empty() {
            return Err(ServiceError::validation("Password is required"));
        }

        if self.users.find_by_username(username)?.is_some() {
            return Err(ServiceError::UserExists);
        }

        let password_hash = self.hash_password(password)?;

        // The unique index still catches a concurrent registration of the same name
        self.users
            .create(NewUser {
                username: username.to_string(),
                password_hash,
                role,
            })
            .map_err(|e| match e {
                StoreError::Duplicate(_) => ServiceError::UserExists,
                other => ServiceError::Persistence(other),
            })
    }

    /// Verify credentials and issue a session token
    pub fn login(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let user = self.users.find_by_username(username.trim())?;

        let authenticated = match &user {
            Some(user) => verify(password, &user.password_hash).unwrap_or(false),
            None => {
                let _ = verify(password, &self.dummy_hash);
                false
            }
        };

        let user = match user {
            Some(user) if authenticated => user,
            _ => {
                warn!("❌ Failed login attempt: {}", username);
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let token = self
            .jwt
            .issue(user.id, &user.username, user.role)
            .map_err(|e| {
                error!("Token issuance failed for {}: {}", user.username, e);
                ServiceError::TokenGeneration
            })?;

        info!("✅ Login successful: {} ({})", user.username, user.role.as_str());
        Ok(token)
    }

    /// Number of accounts holding the admin role
    pub fn admin_count(&self) -> Result<u64, ServiceError> {
        Ok(self.users.count_admins()?)
    }

    /// Seed the configured admin account unless that username already exists
    pub fn ensure_admin(&self, seed: &AdminSeed) -> Result<(), ServiceError> {
        if self.users.find_by_username(&seed.username)?.is_some() {
            return Ok(());
        }

        match self.create_user(&seed.username, &seed.password, Role::Admin) {
            Ok(_) => {
                info!("🔐 Admin user seeded: {}", seed.username);
                Ok(())
            }
            Err(ServiceError::UserExists) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
