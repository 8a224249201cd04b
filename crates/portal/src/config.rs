//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PORTAL_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `PORTAL_BASE_URL` - Public URL for the portal
//!
//! ## Optional
//! - `PORTAL_HOST` - Bind address (default: 0.0.0.0)
//! - `PORTAL_PORT` - Listen port (default: 3000)
//! - `PORTAL_STATIC_DIR` - Static asset directory (default: crates/portal/static)
//! - `PORTAL_CONTACT_PHONE` - Help desk phone number
//! - `PORTAL_CONTACT_EMAIL` - Help desk email address
//! - `PORTAL_CONTACT_ADDRESS` - Office address
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_STATIC_DIR: &str = "crates/portal/static";
const DEFAULT_CONTACT_PHONE: &str = "+91 9876543210";
const DEFAULT_CONTACT_EMAIL: &str = "support@esep.gov.in";
const DEFAULT_CONTACT_ADDRESS: &str = "ESEP Office, Government Building, Kerala, India - 695001";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Help desk details shown in the "Need Help?" section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self {
            phone: DEFAULT_CONTACT_PHONE.to_string(),
            email: DEFAULT_CONTACT_EMAIL.to_string(),
            address: DEFAULT_CONTACT_ADDRESS.to_string(),
        }
    }
}

/// Portal application configuration.
#[derive(Clone)]
pub struct PortalConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL for the portal
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: String,
    pub contact: ContactInfo,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("static_dir", &self.static_dir)
            .field("contact", &self.contact)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("PORTAL_DATABASE_URL")?;
        let host = get_env_or_default("PORTAL_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTAL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORTAL_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTAL_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("PORTAL_BASE_URL")?;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar(
                "PORTAL_BASE_URL".to_string(),
                "must start with http:// or https://".to_string(),
            ));
        }
        let base_url = base_url.trim_end_matches('/').to_string();
        let static_dir = get_env_or_default("PORTAL_STATIC_DIR", DEFAULT_STATIC_DIR);

        let contact = ContactInfo {
            phone: get_env_or_default("PORTAL_CONTACT_PHONE", DEFAULT_CONTACT_PHONE),
            email: get_env_or_default("PORTAL_CONTACT_EMAIL", DEFAULT_CONTACT_EMAIL),
            address: get_env_or_default("PORTAL_CONTACT_ADDRESS", DEFAULT_CONTACT_ADDRESS),
        };

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            static_dir,
            contact,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_optional_env("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            // Public traffic is much higher than admin traffic
            sentry_traces_sample_rate: get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.1),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(primary_key.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_contact() {
        let contact = ContactInfo::default();
        assert_eq!(contact.phone, "+91 9876543210");
        assert_eq!(contact.email, "support@esep.gov.in");
        assert!(contact.address.contains("695001"));
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = PortalConfig {
            database_url: SecretString::from("postgres://portal:s3cret@db/esep"),
            host: "0.0.0.0".parse().unwrap(),
            port: 3000,
            base_url: "https://esep.gov.in".to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            contact: ContactInfo::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("s3cret"));
        assert!(debug_output.contains("[REDACTED]"));
        assert_eq!(config.socket_addr().port(), 3000);
    }
}
