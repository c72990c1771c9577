use std::net::SocketAddr;

use axum::http::HeaderName;
use serde::Deserialize;
use urlguard_core::error::{Result, UrlGuardError};
use urlguard_core::Rule;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub identity: IdentitySection,

    #[serde(default)]
    pub admin: AdminSection,

    /// Ordered; first blocking rule wins.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl GatewayConfig {
    /// Structural validation only. Rule patterns that do not compile are
    /// not load errors; those rules fail open and are reported at publish.
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(UrlGuardError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.identity.validate()?;
        self.admin.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            UrlGuardError::BadRequest(format!(
                "gateway.listen must be a valid socket address: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

/// Where the principal name comes from.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentitySection {
    /// Trusted header set by the upstream authenticator.
    #[serde(default = "default_identity_header")]
    pub header: String,

    /// Principal name used when the header is absent or unusable.
    #[serde(default = "default_anonymous")]
    pub anonymous: String,
}

impl Default for IdentitySection {
    fn default() -> Self {
        Self {
            header: default_identity_header(),
            anonymous: default_anonymous(),
        }
    }
}

impl IdentitySection {
    pub fn validate(&self) -> Result<()> {
        if self.header.is_empty() {
            return Err(UrlGuardError::BadRequest(
                "identity.header must not be empty".into(),
            ));
        }
        HeaderName::from_bytes(self.header.as_bytes()).map_err(|_| {
            UrlGuardError::BadRequest(format!(
                "identity.header is not a valid header name: {}",
                self.header
            ))
        })?;
        Ok(())
    }
}

fn default_identity_header() -> String {
    "x-remote-user".into()
}
fn default_anonymous() -> String {
    "anonymous".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminSection {
    #[serde(default = "default_admin_enabled")]
    pub enabled: bool,

    #[serde(default = "default_admin_prefix")]
    pub path_prefix: String,
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            enabled: default_admin_enabled(),
            path_prefix: default_admin_prefix(),
        }
    }
}

impl AdminSection {
    pub fn validate(&self) -> Result<()> {
        if !self.path_prefix.starts_with('/') || self.path_prefix.len() < 2 {
            return Err(UrlGuardError::BadRequest(
                "admin.path_prefix must start with '/' and not be the root".into(),
            ));
        }
        if self.path_prefix.ends_with('/') {
            return Err(UrlGuardError::BadRequest(
                "admin.path_prefix must not end with '/'".into(),
            ));
        }
        Ok(())
    }
}

fn default_admin_enabled() -> bool {
    true
}
fn default_admin_prefix() -> String {
    "/_urlguard".into()
}
