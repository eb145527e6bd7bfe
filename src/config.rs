// ⚙️ Configuration - environment variables with defaults
//
//   STAY_ENV            development | test | production   (development)
//   STAY_DATABASE_PATH  SQLite file, or :memory:           (stay.db)
//   STAY_LOG            filter used when RUST_LOG is unset (info, warn in test)
//   STAY_SERVER_ADDR    bind address for stay-server       (0.0.0.0:3000)
//
// A .env file in the working directory is read first; variables already set
// in the process environment take precedence over it.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_DATABASE_PATH: &str = "stay.db";
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Test => "warn",
            _ => "info",
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => bail!("unknown environment '{}'", other),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read `.env` from the working directory when one exists.
///
/// Variables already set in the environment are never overwritten.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded .env");
            Some(path)
        }
        Err(err) => {
            debug!("no .env loaded: {}", err);
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database_path: String,
    pub log_filter: String,
    pub server_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let environment = Environment::default();
        AppConfig {
            environment,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            log_filter: environment.default_log_filter().to_string(),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = match lookup("STAY_ENV") {
            Some(value) => value
                .parse::<Environment>()
                .context("STAY_ENV must be development, test or production")?,
            None => Environment::default(),
        };

        Ok(AppConfig {
            environment,
            database_path: lookup("STAY_DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            log_filter: lookup("STAY_LOG")
                .unwrap_or_else(|| environment.default_log_filter().to_string()),
            server_addr: lookup("STAY_SERVER_ADDR")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string()),
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == ":memory:"
    }

    /// Database path for commands whose writes must outlive the process
    pub fn persistent_database_path(&self) -> Result<&str> {
        if self.is_in_memory() {
            bail!("STAY_DATABASE_PATH is :memory:; writes would be discarded on exit");
        }
        Ok(&self.database_path)
    }
}
