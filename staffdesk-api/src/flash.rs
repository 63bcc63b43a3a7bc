/// One-shot flash messages
///
/// Every mutation redirects back to a sensible prior view; the outcome
/// message travels in a short-lived private cookie and is removed the first
/// time a view reads it. GET views include the pending message in their
/// payload so a failure never produces a blank page.

use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};

/// Name of the flash cookie
pub const FLASH_COOKIE: &str = "staffdesk_flash";

/// Stores a flash message for the next request
pub fn set_flash(jar: PrivateCookieJar, message: &str) -> PrivateCookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, message.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Takes the pending flash message, removing it from the jar
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let message = cookie.value().to_string();
            let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/").build());
            (jar, Some(message))
        }
        None => (jar, None),
    }
}

/// Flashes a message and redirects
///
/// The standard exit path for every guarded mutation: a user-visible
/// message plus a redirect to a prior view, never a raw fault.
pub fn flash_redirect(
    jar: PrivateCookieJar,
    to: &str,
    message: &str,
) -> (PrivateCookieJar, Redirect) {
    (set_flash(jar, message), Redirect::to(to))
}
