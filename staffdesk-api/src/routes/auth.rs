/// Login and logout
///
/// # Endpoints
///
/// - `GET /login` - Login view (carries any pending flash message)
/// - `POST /login` - Credential check; establishes the session cookie
/// - `GET /logout` - Clears the session unconditionally

use crate::{
    app::AppState,
    error::ApiResult,
    flash::{flash_redirect, take_flash},
};
use axum::{
    extract::State,
    response::Redirect,
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use staffdesk_shared::{
    auth::{
        password,
        session::{SessionUser, SESSION_COOKIE},
    },
    models::app_user::AppUser,
};

/// The single message for every credential failure
///
/// An unknown username and a wrong password must be indistinguishable to the
/// client, otherwise the form leaks which usernames exist.
const INVALID_CREDENTIALS: &str = "Invalid username or password.";

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Username
    pub username: String,

    /// Plaintext password (verified against the stored hash, never stored)
    pub password: String,
}

/// Login view payload
#[derive(Debug, Serialize)]
pub struct LoginView {
    /// Pending flash message, if any
    pub flash: Option<String>,
}

/// Login view handler
///
/// # Endpoint
///
/// ```text
/// GET /login
/// ```
pub async fn login_view(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<LoginView>) {
    let (jar, flash) = take_flash(jar);
    (jar, Json(LoginView { flash }))
}

/// Login handler
///
/// Looks up the credential record by username (unique, so at most one
/// match), verifies the password against the stored Argon2id hash, and on
/// success stores the identity and role in the private session cookie.
///
/// All failure paths (unknown user, wrong password, unparseable stored
/// hash) produce the identical generic flash message.
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/x-www-form-urlencoded
///
/// username=jules&password=...
/// ```
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<(PrivateCookieJar, Redirect)> {
    let user = match AppUser::find_by_username(&state.db, &form.username).await? {
        Some(user) => user,
        None => return Ok(flash_redirect(jar, "/login", INVALID_CREDENTIALS)),
    };

    let verified = match password::verify_password(&form.password, &user.password_hash) {
        Ok(ok) => ok,
        Err(err) => {
            // A bad stored hash is an operator problem; to the client it is
            // still just a failed login.
            tracing::warn!(username = %form.username, "stored password hash rejected: {}", err);
            false
        }
    };

    if !verified {
        return Ok(flash_redirect(jar, "/login", INVALID_CREDENTIALS));
    }

    let session = SessionUser::new(&user.username, user.role);

    let cookie = Cookie::build((SESSION_COOKIE, session.encode()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    tracing::info!(username = %user.username, role = user.role.as_str(), "login succeeded");
    Ok((jar.add(cookie), Redirect::to("/home")))
}

/// Logout handler
///
/// Removes the session cookie unconditionally and redirects to the login
/// flow. Safe to call without a session.
///
/// # Endpoint
///
/// ```text
/// GET /logout
/// ```
pub async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    (jar, Redirect::to("/login"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        // The constant must not name either failure cause.
        assert!(!INVALID_CREDENTIALS.to_lowercase().contains("unknown"));
        assert!(!INVALID_CREDENTIALS.to_lowercase().contains("exist"));
        assert_eq!(INVALID_CREDENTIALS, "Invalid username or password.");
    }
}
