//! Cookie-session authentication for the dashboard.
//!
//! Development: accepts the built-in operator credentials and issues a
//! random session token in a cookie. Production: replace with a real
//! identity provider (jsonwebtoken + OAuth2).

use axum::http::{header, HeaderMap};
use rand::Rng;
use serde::Deserialize;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sp_session";

/// Prefix identifying tokens issued by this server.
const SESSION_TOKEN_PREFIX: &str = "sps_";

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Validate a login and return a session token.
pub fn authenticate(form: &LoginForm) -> Result<String, &'static str> {
    // Development credentials only.
    if form.username == "admin" && form.password == "admin" {
        Ok(generate_session_token())
    } else {
        Err("Invalid username or password.")
    }
}

/// Generate a random session token.
fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!(
        "{}{}",
        SESSION_TOKEN_PREFIX,
        bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>()
    )
}

/// The Set-Cookie value establishing a session.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// The Set-Cookie value clearing the session.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Whether the request carries a session issued by this server.
/// Token shape validation only (development mode).
pub fn is_authenticated(headers: &HeaderMap) -> bool {
    let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    cookies.split(';').any(|pair| {
        let pair = pair.trim();
        match pair.split_once('=') {
            Some((name, value)) => {
                name == SESSION_COOKIE
                    && value.starts_with(SESSION_TOKEN_PREFIX)
                    && value.len() > SESSION_TOKEN_PREFIX.len()
            }
            None => false,
        }
    })
}
