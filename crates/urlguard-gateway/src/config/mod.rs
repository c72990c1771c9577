//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use urlguard_core::error::{Result, UrlGuardError};

pub use schema::{AdminSection, GatewayConfig, GatewaySection, IdentitySection};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "URLGUARD_CONFIG";
/// Config file used when `URLGUARD_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "urlguard.yaml";

pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| UrlGuardError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| UrlGuardError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
