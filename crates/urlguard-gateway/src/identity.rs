//! Identity source: who is making the request.
//!
//! Authentication happens upstream. The gateway only reads the principal
//! name the authenticator attached to the request; anything unusable maps to
//! a stable anonymous sentinel so exclusion rules can reference it.

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName};
use urlguard_core::error::{Result, UrlGuardError};

use crate::config::IdentitySection;

/// Supplies the current principal's name for a request.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Never fails: unauthenticated requests get the anonymous sentinel.
    async fn principal(&self, headers: &HeaderMap) -> String;
}

/// Reads the principal from a trusted request header.
#[derive(Debug, Clone)]
pub struct HeaderIdentity {
    header: HeaderName,
    anonymous: String,
}

impl HeaderIdentity {
    pub fn new(header: &str, anonymous: impl Into<String>) -> Result<Self> {
        let header = HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
            UrlGuardError::BadRequest(format!("invalid identity header name: {header}"))
        })?;
        Ok(Self {
            header,
            anonymous: anonymous.into(),
        })
    }

    pub fn from_config(cfg: &IdentitySection) -> Result<Self> {
        Self::new(&cfg.header, cfg.anonymous.clone())
    }

    fn resolve(&self, headers: &HeaderMap) -> String {
        match headers.get(&self.header).map(|v| v.to_str()) {
            Some(Ok(name)) if !name.trim().is_empty() => name.trim().to_string(),
            Some(Err(_)) => {
                tracing::debug!(header = %self.header, "non-utf8 identity header; treating as anonymous");
                self.anonymous.clone()
            }
            _ => self.anonymous.clone(),
        }
    }
}

#[async_trait]
impl IdentitySource for HeaderIdentity {
    async fn principal(&self, headers: &HeaderMap) -> String {
        self.resolve(headers)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn ident() -> HeaderIdentity {
        HeaderIdentity::new("x-remote-user", "anonymous").unwrap()
    }

    #[test]
    fn header_value_is_principal() {
        let mut h = HeaderMap::new();
        h.insert("x-remote-user", HeaderValue::from_static("alice"));
        assert_eq!(ident().resolve(&h), "alice");
    }

    #[test]
    fn missing_or_blank_header_is_anonymous() {
        assert_eq!(ident().resolve(&HeaderMap::new()), "anonymous");

        let mut h = HeaderMap::new();
        h.insert("x-remote-user", HeaderValue::from_static("   "));
        assert_eq!(ident().resolve(&h), "anonymous");
    }

    #[test]
    fn non_utf8_header_is_anonymous() {
        let mut h = HeaderMap::new();
        h.insert("x-remote-user", HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap());
        assert_eq!(ident().resolve(&h), "anonymous");
    }

    #[test]
    fn rejects_bad_header_name() {
        assert!(HeaderIdentity::new("bad header", "anonymous").is_err());
    }
}
