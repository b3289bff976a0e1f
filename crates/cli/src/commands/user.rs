//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! grocer-cli user create -u alice -p secret
//! ```

use thiserror::Error;

use grocer_web::forms::{FieldErrors, SignUpForm};
use grocer_web::services::auth::{AuthError, AuthService};

use super::connect;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Username or password failed validation.
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// Username is already registered.
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Authentication service error.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

fn describe(errors: &FieldErrors) -> String {
    errors
        .fields()
        .filter_map(|field| errors.get(field).map(|msg| format!("{field}: {msg}")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Create a user with the same validation and hashing as the sign-up form.
///
/// # Errors
///
/// Returns an error if validation fails, the username is taken, or the
/// database is unavailable.
pub async fn create(username: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let new_user = SignUpForm {
        username: username.to_owned(),
        password: password.to_owned(),
    }
    .validate()
    .map_err(|errors| UserError::Invalid(describe(&errors)))?;

    let pool = connect().await?;
    grocer_web::db::migrate(&pool).await?;

    let user = AuthService::new(&pool)
        .sign_up(&new_user)
        .await
        .map_err(|e| match e {
            AuthError::UsernameTaken => UserError::UserExists(new_user.username.to_string()),
            other => UserError::Auth(other),
        })?;

    tracing::info!("User created successfully! ID: {}, Username: {}", user.id, user.username);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_lists_every_field() {
        let errors = SignUpForm::default().validate().err().unwrap_or_default();
        assert_eq!(
            describe(&errors),
            "password: This field is required.; username: This field is required."
        );
    }
}
