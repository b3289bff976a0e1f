//! Authentication service.
//!
//! Provides username/password sign-up and login.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sqlx::SqlitePool;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{NewUser, User};

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user from a validated sign-up payload.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UsernameTaken` if the username is already registered.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    #[tracing::instrument(skip(self, new_user), fields(username = %new_user.username))]
    pub async fn sign_up(&self, new_user: &NewUser) -> Result<User, AuthError> {
        let password_hash = hash_password(new_user.password.expose_secret())?;

        let user = self
            .users
            .create(&new_user.username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Log in with username and password.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// `AuthError::InvalidCredentials`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    #[tracing::instrument(skip(self, password))]
    pub async fn log_in(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a PHC hash string.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or an unparseable hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use grocer_core::Username;
    use secrecy::SecretString;

    use super::*;
    use crate::db::test_pool;

    fn new_user(username: &str, password: &str) -> NewUser {
        NewUser {
            username: Username::parse(username).unwrap(),
            password: SecretString::from(password.to_string()),
        }
    }

    #[test]
    fn test_hash_is_salted_and_verifies() {
        let a = hash_password("pw1").unwrap();
        let b = hash_password("pw1").unwrap();

        assert_ne!(a, "pw1");
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(verify_password("pw1", &a).is_ok());
        assert!(matches!(
            verify_password("wrong", &a),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("pw1", "plaintext"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_sign_up_then_log_in() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let user = auth.sign_up(&new_user("alice", "pw1")).await.unwrap();
        let logged_in = auth.log_in("alice", "pw1").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_username() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        auth.sign_up(&new_user("alice", "pw1")).await.unwrap();
        let err = auth.sign_up(&new_user("alice", "pw2")).await.unwrap_err();

        assert!(matches!(err, AuthError::UsernameTaken));
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_log_in_failures_are_indistinguishable() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);
        auth.sign_up(&new_user("alice", "pw1")).await.unwrap();

        let wrong_password = auth.log_in("alice", "wrongpw").await.unwrap_err();
        let unknown_user = auth.log_in("mallory", "pw1").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    }
}
