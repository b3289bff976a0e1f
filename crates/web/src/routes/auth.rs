//! Sign-up, login and logout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use super::Layout;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::forms::{FieldErrors, INVALID_LOGIN, LoginForm, SignUpForm, USERNAME_TAKEN};
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{
    RequireAuth, clear_current_user, safe_next, set_current_user, set_flash,
};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Where to go after a successful login.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignUpTemplate {
    pub layout: Layout,
    pub form: SignUpForm,
    pub errors: FieldErrors,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    /// Form action, carrying `next` through the POST.
    pub action: String,
    pub username: String,
    pub errors: FieldErrors,
    /// Generic failure message for bad credentials.
    pub error: Option<&'static str>,
}

/// Gated routes that only accept POST, with the page that shows their result.
const POST_ONLY_RESUME: &[(&str, &str)] = &[("/add_to_shopping_list/", "/shopping_list")];

/// Where a successful login lands.
///
/// A `next` pointing at a POST-only action cannot be replayed by a redirect,
/// so the user is sent to the page that action would have led to.
fn login_destination(next: Option<&str>) -> &str {
    let Some(next) = safe_next(next) else {
        return "/";
    };
    POST_ONLY_RESUME
        .iter()
        .find(|(prefix, _)| next.starts_with(*prefix))
        .map_or(next, |(_, page)| *page)
}

fn login_action(next: Option<&str>) -> String {
    match safe_next(next) {
        Some(next) => format!("{LOGIN_PATH}?next={}", urlencoding::encode(next)),
        None => LOGIN_PATH.to_owned(),
    }
}

// =============================================================================
// Sign Up
// =============================================================================

/// Display the sign-up page.
pub async fn signup_page(session: Session) -> Result<Response> {
    Ok(SignUpTemplate {
        layout: Layout::from_session(&session).await?,
        form: SignUpForm::default(),
        errors: FieldErrors::default(),
    }
    .into_response())
}

/// Handle sign-up form submission.
///
/// Does not log the new user in; they are sent to the login page.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignUpForm>,
) -> Result<Response> {
    let errors = match form.validate() {
        Ok(new_user) => match AuthService::new(state.pool()).sign_up(&new_user).await {
            Ok(_) => {
                set_flash(&session, "New user created!").await?;
                return Ok(Redirect::to(LOGIN_PATH).into_response());
            }
            Err(AuthError::UsernameTaken) => {
                let mut errors = FieldErrors::default();
                errors.add("username", USERNAME_TAKEN);
                errors
            }
            Err(e) => return Err(e.into()),
        },
        Err(errors) => errors,
    };

    Ok(SignUpTemplate {
        layout: Layout::from_session(&session).await?,
        form: SignUpForm {
            password: String::new(),
            ..form
        },
        errors,
    }
    .into_response())
}

// =============================================================================
// Login
// =============================================================================

/// Display the login page.
pub async fn login_page(session: Session, Query(query): Query<NextQuery>) -> Result<Response> {
    Ok(LoginTemplate {
        layout: Layout::from_session(&session).await?,
        action: login_action(query.next.as_deref()),
        username: String::new(),
        errors: FieldErrors::default(),
        error: None,
    }
    .into_response())
}

/// Handle login form submission.
///
/// Unknown usernames and wrong passwords get the same message, and no
/// session is established.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let (errors, error) = match form.validate() {
        Ok(username) => match AuthService::new(state.pool())
            .log_in(username, &form.password)
            .await
        {
            Ok(user) => {
                let current = CurrentUser {
                    id: user.id,
                    username: user.username.into_inner(),
                };
                set_current_user(&session, &current).await?;
                set_sentry_user(&current.id, Some(&current.username));
                tracing::info!(user_id = %current.id, "User logged in");

                let destination = login_destination(query.next.as_deref());
                return Ok(Redirect::to(destination).into_response());
            }
            Err(AuthError::InvalidCredentials) => {
                tracing::info!("Login failed");
                (FieldErrors::default(), Some(INVALID_LOGIN))
            }
            Err(e) => return Err(e.into()),
        },
        Err(errors) => (errors, None),
    };

    Ok(LoginTemplate {
        layout: Layout::from_session(&session).await?,
        action: login_action(query.next.as_deref()),
        username: form.username.trim().to_owned(),
        errors,
        error,
    }
    .into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// Log out and return to the home page.
pub async fn logout(RequireAuth(user): RequireAuth, session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    tracing::info!(user_id = %user.id, "User logged out");

    Ok(Redirect::to("/"))
}
