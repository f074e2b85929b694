use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose, Engine};
use ring::hmac;

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

/// HMAC-SHA256 key derived from SECRET_KEY. Signs the session cookie so the
/// user id it carries cannot be forged.
pub struct SessionKey {
    key: hmac::Key,
}

impl SessionKey {
    pub fn new(secret: &str) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()),
        }
    }

    /// Cookie value binding the user id: `<id>.<base64 tag>`.
    pub fn sign(&self, user_id: i64) -> String {
        let id = user_id.to_string();
        let tag = hmac::sign(&self.key, id.as_bytes());
        format!(
            "{}.{}",
            id,
            general_purpose::URL_SAFE_NO_PAD.encode(tag.as_ref())
        )
    }

    /// Returns the user id when the tag verifies; None for missing, malformed,
    /// or forged values.
    pub fn verify(&self, value: &str) -> Option<i64> {
        let (id, tag) = value.split_once('.')?;
        let tag = general_purpose::URL_SAFE_NO_PAD.decode(tag).ok()?;
        hmac::verify(&self.key, id.as_bytes(), &tag).ok()?;
        id.parse().ok()
    }
}

/// Value of a single cookie from the request's Cookie header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(name)?
            .strip_prefix('=')
            .map(str::to_owned)
    })
}

pub fn session_cookie(value: &str) -> String {
    format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// One-shot notice shown by the next rendered page. Base64 keeps arbitrary
/// message text cookie-safe.
pub fn flash_cookie(message: &str) -> String {
    format!(
        "{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        general_purpose::URL_SAFE_NO_PAD.encode(message)
    )
}

pub fn clear_flash_cookie() -> String {
    format!("{FLASH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub fn take_flash(headers: &HeaderMap) -> Option<String> {
    let raw = cookie_value(headers, FLASH_COOKIE)?;
    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(raw).ok()?;
    String::from_utf8(bytes).ok()
}
