//! Site configuration parsed from environment variables.
//!
//! Start-up loads `.env` (or `.env.production` when `APP_ENV=production`)
//! with dotenvy before calling [`SiteConfig::from_env`], so values written by
//! `vitrine-cli generate-env` and real process variables look the same here.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STORAGE_BUCKET: &str = "service-images";
pub const DEFAULT_WHATSAPP_PHONE: &str = "5511999999999";
pub const DEFAULT_DISPLAY_UTC_OFFSET_HOURS: i8 = -3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupabaseTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL without trailing slash, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Publishable (anon) project key.
    pub key: String,
    pub storage_bucket: String,
    pub timeouts: SupabaseTimeouts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub production: bool,
    pub port: u16,
    pub supabase: SupabaseConfig,
    /// Phone number (digits only) used for the WhatsApp contact links.
    pub whatsapp_phone: String,
    pub display_utc_offset_hours: i8,
    pub cookie_secure: bool,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl SiteConfig {
    /// Build typed site config from environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL`
    /// - `SUPABASE_KEY`
    ///
    /// Optional:
    /// - `APP_ENV`: `production` enables production defaults
    /// - `PORT`: default 3000
    /// - `STORAGE_BUCKET`: default `service-images`
    /// - `WHATSAPP_PHONE`: default `5511999999999`
    /// - `DISPLAY_UTC_OFFSET_HOURS`: default -3
    /// - `COOKIE_SECURE`: defaults to `true` in production
    /// - `SUPABASE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SUPABASE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `STATIC_DIR`: default `static/` next to the crate manifest
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let production = is_production(std::env::var("APP_ENV").ok().as_deref());

        let url = required("SUPABASE_URL")?.trim_end_matches('/').to_owned();
        let key = required("SUPABASE_KEY")?;
        let storage_bucket = std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_STORAGE_BUCKET.to_owned());
        let timeouts = SupabaseTimeouts {
            request_secs: env_parse("SUPABASE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse("SUPABASE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        let whatsapp_phone: String = std::env::var("WHATSAPP_PHONE")
            .unwrap_or_else(|_| DEFAULT_WHATSAPP_PHONE.to_owned())
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if whatsapp_phone.is_empty() {
            return Err(ConfigError::Invalid { var: "WHATSAPP_PHONE", value: String::new() });
        }

        let display_utc_offset_hours = env_parse("DISPLAY_UTC_OFFSET_HOURS", DEFAULT_DISPLAY_UTC_OFFSET_HOURS)?;
        if !(-23..=23).contains(&display_utc_offset_hours) {
            return Err(ConfigError::Invalid {
                var: "DISPLAY_UTC_OFFSET_HOURS",
                value: display_utc_offset_hours.to_string(),
            });
        }

        Ok(Self {
            production,
            port: env_parse("PORT", DEFAULT_PORT)?,
            supabase: SupabaseConfig { url, key, storage_bucket, timeouts },
            whatsapp_phone,
            display_utc_offset_hours,
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(production),
            static_dir: std::env::var("STATIC_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map_or_else(default_static_dir, PathBuf::from),
        })
    }
}

#[must_use]
pub fn default_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Name of the env file start-up should load for the given `APP_ENV`.
#[must_use]
pub fn env_file_name(app_env: Option<&str>) -> &'static str {
    if is_production(app_env) { ".env.production" } else { ".env" }
}

fn is_production(app_env: Option<&str>) -> bool {
    app_env.is_some_and(|v| v.trim().eq_ignore_ascii_case("production"))
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_owned()),
        _ => Err(ConfigError::Missing(var)),
    }
}

fn env_parse<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        Err(_) => Ok(default),
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
