// crates/http-auth-hook-cli/src/lib.rs
// ============================================================================
// Module: HTTP Auth Probe Library
// Description: File configuration and probe execution for the probe binary.
// Purpose: Keep the CLI entry point thin and the probe logic testable.
// Dependencies: http-auth-hook, serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! Supporting library for the `http-auth-probe` binary. [`config`] loads the
//! TOML file that describes the authorization service, and [`probe`] turns it
//! into an initialized hook and runs a single check.

pub mod config;
pub mod probe;

pub use config::CONFIG_ENV_VAR;
pub use config::DEFAULT_CONFIG_NAME;
pub use config::FileConfigError;
pub use config::MAX_CONFIG_FILE_SIZE;
pub use config::MAX_TIMEOUT_MS;
pub use config::ProbeConfig;
pub use probe::ProbeCheck;
pub use probe::ProbeError;
pub use probe::build_hook;
pub use probe::run_probe;
