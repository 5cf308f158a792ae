// crates/http-auth-hook-cli/src/config.rs
// ============================================================================
// Module: Probe File Configuration
// Description: TOML configuration describing the authorization service.
// Purpose: Load, bound, and validate probe configuration before use.
// Dependencies: http-auth-hook, serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! The probe reads a small TOML file naming the ACL and client authentication
//! endpoints. Resolution order is the explicit path, then
//! [`CONFIG_ENV_VAR`], then [`DEFAULT_CONFIG_NAME`] in the working directory.
//! Invariants:
//! - Files larger than [`MAX_CONFIG_FILE_SIZE`] or not UTF-8 are rejected.
//! - Unknown keys are rejected.
//! - Endpoints must use `http` or `https`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use http_auth_hook::HttpAuthOptions;
use http_auth_hook::ReqwestTransport;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default config filename in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "http-auth-hook.toml";
/// Environment variable naming the config path.
pub const CONFIG_ENV_VAR: &str = "HTTP_AUTH_HOOK_CONFIG";
/// Maximum config file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Upper bound for `timeout_ms`.
pub const MAX_TIMEOUT_MS: u64 = 300_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading probe configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Probe Config
// ============================================================================

/// Probe configuration file contents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    /// Endpoint for topic access checks.
    pub acl_host: Url,
    /// Endpoint for connect-time credential checks.
    pub client_auth_host: Url,
    /// Reserved superuser endpoint.
    #[serde(default)]
    pub superuser_host: Option<Url>,
    /// Per-exchange timeout in milliseconds; unbounded when absent.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ProbeConfig {
    /// Loads configuration from `path`, the environment, or the default name.
    ///
    /// # Errors
    ///
    /// Returns [`FileConfigError`] when the file cannot be read or is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, FileConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok());
        let bytes = fs::read(&resolved).map_err(|err| {
            FileConfigError::Io(format!("{}: {err}", resolved.display()))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parses and validates configuration from raw file bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FileConfigError`] when the content is oversized, not UTF-8,
    /// malformed, or fails validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FileConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(FileConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| FileConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| FileConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates endpoint schemes and the timeout range.
    ///
    /// # Errors
    ///
    /// Returns [`FileConfigError::Invalid`] on the first violation.
    pub fn validate(&self) -> Result<(), FileConfigError> {
        validate_endpoint("acl_host", &self.acl_host)?;
        validate_endpoint("client_auth_host", &self.client_auth_host)?;
        if let Some(superuser_host) = &self.superuser_host {
            validate_endpoint("superuser_host", superuser_host)?;
        }
        match self.timeout_ms {
            Some(0) => Err(FileConfigError::Invalid("timeout_ms must be greater than zero".into())),
            Some(ms) if ms > MAX_TIMEOUT_MS => Err(FileConfigError::Invalid(format!(
                "timeout_ms must be at most {MAX_TIMEOUT_MS}"
            ))),
            _ => Ok(()),
        }
    }

    /// Returns the configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Converts the file config into hook options.
    ///
    /// A bounded [`ReqwestTransport`] is installed when `timeout_ms` is set;
    /// otherwise the hook's default transport applies.
    ///
    /// # Errors
    ///
    /// Returns [`FileConfigError::Invalid`] when the bounded transport cannot
    /// be built.
    pub fn to_options(&self) -> Result<HttpAuthOptions, FileConfigError> {
        let mut options = HttpAuthOptions::new(self.acl_host.clone(), self.client_auth_host.clone());
        if let Some(superuser_host) = &self.superuser_host {
            options = options.with_superuser_host(superuser_host.clone());
        }
        if let Some(timeout) = self.timeout() {
            let transport = ReqwestTransport::with_timeout(timeout)
                .map_err(|err| FileConfigError::Invalid(err.to_string()))?;
            options = options.with_transport(transport);
        }
        Ok(options)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from an explicit path, env value, or default.
#[must_use]
pub fn resolve_path(path: Option<&Path>, env_value: Option<String>) -> PathBuf {
    if let Some(path) = path {
        return path.to_path_buf();
    }
    match env_value {
        Some(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_CONFIG_NAME),
    }
}

/// Requires an `http` or `https` endpoint.
fn validate_endpoint(field: &str, url: &Url) -> Result<(), FileConfigError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(FileConfigError::Invalid(format!(
            "{field} must use http or https, got {scheme}"
        ))),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        reason = "Test-only assertions are permitted."
    )]

    use super::*;

    /// Smallest valid config file.
    const MINIMAL: &str = r#"
acl_host = "http://127.0.0.1:8080/acl"
client_auth_host = "http://127.0.0.1:8080/auth"
"#;

    #[test]
    fn explicit_path_wins_over_env() {
        let resolved = resolve_path(Some(Path::new("a.toml")), Some("b.toml".to_string()));
        assert_eq!(resolved, PathBuf::from("a.toml"));
    }

    #[test]
    fn env_path_used_when_no_explicit_path() {
        assert_eq!(resolve_path(None, Some("b.toml".to_string())), PathBuf::from("b.toml"));
        assert_eq!(resolve_path(None, Some("  ".to_string())), PathBuf::from(DEFAULT_CONFIG_NAME));
        assert_eq!(resolve_path(None, None), PathBuf::from(DEFAULT_CONFIG_NAME));
    }

    #[test]
    fn minimal_config_parses() {
        let config = ProbeConfig::from_bytes(MINIMAL.as_bytes()).unwrap();
        assert_eq!(config.acl_host.path(), "/acl");
        assert!(config.superuser_host.is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let content = format!("{MINIMAL}\nretries = 3\n");
        let err = ProbeConfig::from_bytes(content.as_bytes()).unwrap_err();
        assert!(matches!(err, FileConfigError::Parse(_)), "{err:?}");
    }

    #[test]
    fn missing_client_auth_host_is_a_parse_error() {
        let err = ProbeConfig::from_bytes(b"acl_host = \"http://a/acl\"\n").unwrap_err();
        assert!(matches!(err, FileConfigError::Parse(_)), "{err:?}");
    }

    #[test]
    fn timeout_bounds_are_enforced() {
        for bad in ["timeout_ms = 0", "timeout_ms = 300001"] {
            let content = format!("{MINIMAL}{bad}\n");
            let err = ProbeConfig::from_bytes(content.as_bytes()).unwrap_err();
            assert!(matches!(err, FileConfigError::Invalid(_)), "{bad}: {err:?}");
        }
        let content = format!("{MINIMAL}timeout_ms = 300000\n");
        let config = ProbeConfig::from_bytes(content.as_bytes()).unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let content = "acl_host = \"ftp://a/acl\"\nclient_auth_host = \"http://a/auth\"\n";
        let err = ProbeConfig::from_bytes(content.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            FileConfigError::Invalid("acl_host must use http or https, got ftp".to_string())
        );
    }

    #[test]
    fn non_utf8_and_oversized_files_are_rejected() {
        let err = ProbeConfig::from_bytes(&[0xff, 0xfe]).unwrap_err();
        assert_eq!(err, FileConfigError::Invalid("config file must be utf-8".to_string()));

        let oversized = vec![b'#'; MAX_CONFIG_FILE_SIZE + 1];
        let err = ProbeConfig::from_bytes(&oversized).unwrap_err();
        assert_eq!(err, FileConfigError::Invalid("config file exceeds size limit".to_string()));
    }

    #[test]
    fn options_carry_hosts() {
        let content = format!("{MINIMAL}superuser_host = \"https://su.example/\"\ntimeout_ms = 250\n");
        let config = ProbeConfig::from_bytes(content.as_bytes()).unwrap();
        let options = config.to_options().unwrap();
        assert_eq!(options.acl_host, Some(config.acl_host.clone()));
        assert_eq!(options.superuser_host, config.superuser_host);
        assert!(options.transport.is_some());
    }
}
