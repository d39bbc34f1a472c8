//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, User, UserClaims, UserShort},
    repository::Repository,
};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password, returning a bearer token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !verify_password(&user.password, password)? {
            tracing::warn!("Failed login for user {}", user.username);
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User {} logged in", user.username);
        Ok((token, user))
    }

    /// Create JWT token for a user
    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            is_staff: user.is_staff,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list(&self) -> AppResult<Vec<UserShort>> {
        self.repository.users.list().await
    }

    /// Create a user; usernames are unique regardless of case
    pub async fn create_user(&self, mut data: CreateUser) -> AppResult<User> {
        data.username = data.username.trim().to_string();
        data.validate()?;

        if self.repository.users.get_by_username(&data.username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "User \"{}\" already exists",
                data.username
            )));
        }

        let hash = hash_password(&data.password)?;
        let user = self.repository.users.create(&data, &hash).await?;
        tracing::info!("Created user id={} username={} staff={}", user.id, user.username, user.is_staff);
        Ok(user)
    }

    /// Resolve a token to a current staff account; tokens of deleted or demoted users are refused
    pub async fn staff_account(&self, claims: &UserClaims) -> AppResult<User> {
        claims.require_staff()?;
        let user = self.repository.users.get_by_id(claims.user_id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::Authentication("Account no longer exists".to_string()),
            other => other,
        })?;
        if !user.is_staff {
            return Err(AppError::Authorization("Staff access required".to_string()));
        }
        Ok(user)
    }

    /// Delete a user; their borrowed copies are kept with no borrower
    pub async fn delete_user(&self, id: i32, acting_user_id: i32) -> AppResult<()> {
        if id == acting_user_id {
            return Err(AppError::BadRequest("Cannot delete your own account".to_string()));
        }
        let borrowed = self.repository.users.count_borrowed(id).await?;
        self.repository.users.delete(id).await?;
        tracing::info!("Deleted user id={}, cleared borrower on {} instance(s)", id, borrowed);
        Ok(())
    }

    /// Create the configured staff account when the database has none
    pub async fn ensure_bootstrap_staff(&self) -> AppResult<()> {
        if self.repository.users.staff_exists().await? {
            return Ok(());
        }

        let (Some(username), Some(password)) = (
            self.config.bootstrap_username.clone(),
            self.config.bootstrap_password.clone(),
        ) else {
            tracing::warn!("No staff account exists and no bootstrap credentials are configured");
            return Ok(());
        };

        let user = self
            .create_user(CreateUser {
                username,
                password,
                first_name: String::new(),
                last_name: String::new(),
                email: None,
                is_staff: true,
            })
            .await?;
        tracing::info!("Bootstrapped staff account {}", user.username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert_ne!(hash, "s3cret");
        assert!(verify_password(&hash, "s3cret").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn test_invalid_hash_is_internal_error() {
        assert!(matches!(
            verify_password("not-a-hash", "x"),
            Err(AppError::Internal(_))
        ));
    }
}
