//! Session cookie helpers
//! The token travels in an HTTP-only cookie, never in response bodies

use axum::http::{header, HeaderMap};

/// Cookie name carrying the session token
pub const AUTH_COOKIE: &str = "auth-token";

/// Build the Set-Cookie value for a freshly issued token
pub fn build(token: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        AUTH_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that clears the session cookie.
/// Attributes must match `build` so browsers replace the right cookie.
pub fn clear(secure: bool) -> String {
    build("", 0, secure)
}

/// Pull the session token out of the Cookie header, if present.
/// An empty value counts as absent.
pub fn extract(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    for pair in raw.split(';') {
        if let Some(rest) = pair.trim().strip_prefix(AUTH_COOKIE) {
            if let Some(value) = rest.strip_prefix('=') {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}
