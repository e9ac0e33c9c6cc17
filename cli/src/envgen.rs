//! Connection env files for the server.
//!
//! Writes `.env` for development and `.env.production` for production, both
//! carrying the same backend connection. The server picks one at start-up
//! from `APP_ENV`.

use std::path::{Path, PathBuf};

use crate::CliError;

pub const DEV_FILE: &str = ".env";
pub const PROD_FILE: &str = ".env.production";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub supabase_url: String,
    pub supabase_key: String,
}

impl Connection {
    /// Both values are required; surrounding whitespace is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingVar`] for an absent or blank value and
    /// [`CliError::InvalidValue`] for one that would break the env file.
    pub fn new(supabase_url: Option<String>, supabase_key: Option<String>) -> Result<Self, CliError> {
        Ok(Self {
            supabase_url: required("SUPABASE_URL", supabase_url)?,
            supabase_key: required("SUPABASE_KEY", supabase_key)?,
        })
    }
}

fn required(var: &'static str, value: Option<String>) -> Result<String, CliError> {
    let value = value.map(|v| v.trim().to_owned()).unwrap_or_default();
    if value.is_empty() {
        return Err(CliError::MissingVar(var));
    }
    if value.contains(['\n', '\r', '"']) {
        return Err(CliError::InvalidValue(var));
    }
    Ok(value)
}

/// Contents of one env file.
#[must_use]
pub fn render(connection: &Connection, production: bool) -> String {
    let app_env = if production { "production" } else { "development" };
    format!(
        "# Generated by vitrine-cli generate-env\nAPP_ENV={app_env}\nSUPABASE_URL=\"{}\"\nSUPABASE_KEY=\"{}\"\n",
        connection.supabase_url, connection.supabase_key
    )
}

/// Write both env files into `dir`, creating it if needed. Returns the written paths.
///
/// # Errors
///
/// Returns [`CliError::Io`] if the directory or a file cannot be written.
pub fn write_env_files(dir: &Path, connection: &Connection) -> Result<Vec<PathBuf>, CliError> {
    std::fs::create_dir_all(dir).map_err(|e| CliError::Io { path: dir.to_path_buf(), message: e.to_string() })?;

    [(DEV_FILE, false), (PROD_FILE, true)]
        .into_iter()
        .map(|(name, production)| {
            let path = dir.join(name);
            std::fs::write(&path, render(connection, production))
                .map_err(|e| CliError::Io { path: path.clone(), message: e.to_string() })?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
#[path = "envgen_test.rs"]
mod tests;
