//! One-shot toast messages carried across a redirect in a cookie.
//!
//! A handler that finishes with a redirect sets the flash; the next page
//! render takes it (clearing the cookie) and shows it as a toast.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const FLASH_COOKIE: &str = "flash";

const FLASH_MAX_AGE_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS class suffix used by the toast markup.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    fn tag(self) -> char {
        match self {
            Self::Success => 's',
            Self::Error => 'e',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: FlashKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: FlashKind::Error, message: message.into() }
    }

    fn encode(&self) -> String {
        format!("{}:{}", self.kind.tag(), self.message)
    }

    fn decode(raw: &str) -> Option<Self> {
        let (tag, message) = raw.split_once(':')?;
        let kind = match tag {
            "s" => FlashKind::Success,
            "e" => FlashKind::Error,
            _ => return None,
        };
        (!message.is_empty()).then(|| Self { kind, message: message.to_owned() })
    }
}

/// Queue a toast for the next rendered page.
#[must_use]
pub fn set(jar: CookieJar, flash: &Flash, secure: bool) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, flash.encode()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(FLASH_MAX_AGE_SECS));
    jar.add(cookie)
}

/// Read and clear the pending toast, if any.
#[must_use]
pub fn take(jar: CookieJar, secure: bool) -> (CookieJar, Option<Flash>) {
    let Some(flash) = jar.get(FLASH_COOKIE).map(|c| Flash::decode(c.value())) else {
        return (jar, None);
    };
    let clear = Cookie::build((FLASH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO);
    (jar.add(clear), flash)
}

#[cfg(test)]
#[path = "flash_test.rs"]
mod tests;
