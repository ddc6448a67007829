//! Scoped basic-auth credentials from a single `HTTP_AUTH` descriptor
//!
//! The descriptor has the shape `basic:REALM:USER:PASSWORD`. Credentials
//! are only handed out for URLs that start with `https://REALM`, so one
//! globally configured secret never leaks to unrelated hosts.

use apkfetch_errors::{ConfigError, Error};
use std::fmt;

/// Username and password for HTTP basic authentication
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// A parsed `HTTP_AUTH` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthDescriptor {
    pub realm: String,
    pub credentials: Credentials,
}

impl AuthDescriptor {
    /// Parse `scheme:realm:user:password`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MalformedAuthDescriptor` if the value does not
    /// have exactly four fields or the scheme is not `basic`.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let fields: Vec<&str> = value.split(':').collect();
        let [scheme, realm, username, password] = fields.as_slice() else {
            return Err(ConfigError::MalformedAuthDescriptor {
                reason: format!("expected 4 colon-separated fields, got {}", fields.len()),
            });
        };

        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(ConfigError::MalformedAuthDescriptor {
                reason: format!("unsupported scheme {scheme:?}, only \"basic\" is accepted"),
            });
        }

        Ok(Self {
            realm: (*realm).to_string(),
            credentials: Credentials {
                username: (*username).to_string(),
                password: (*password).to_string(),
            },
        })
    }

    fn covers(&self, url: &str) -> bool {
        url.starts_with(&format!("https://{}", self.realm))
    }
}

/// Decides per URL whether to attach credentials
#[derive(Debug, Clone, Default)]
pub struct AuthScopeResolver {
    descriptor: Option<AuthDescriptor>,
}

impl AuthScopeResolver {
    /// Build a resolver from an optional descriptor value. `None` yields a
    /// resolver that never attaches credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is present but malformed.
    pub fn new(value: Option<&str>) -> Result<Self, Error> {
        let descriptor = value.map(AuthDescriptor::parse).transpose()?;
        Ok(Self { descriptor })
    }

    /// A resolver with no descriptor configured
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Credentials for `url`, if the descriptor's realm covers it
    #[must_use]
    pub fn credentials_for(&self, url: &str) -> Option<&Credentials> {
        self.descriptor
            .as_ref()
            .filter(|descriptor| descriptor.covers(url))
            .map(|descriptor| &descriptor.credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_credentials() {
        let resolver = AuthScopeResolver::new(Some("basic:example.dev:alice:secret")).unwrap();

        let creds = resolver.credentials_for("https://example.dev/x").unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "secret");

        assert!(resolver.credentials_for("https://other.dev/x").is_none());
        assert!(resolver.credentials_for("http://example.dev/x").is_none());
    }

    #[test]
    fn test_absent_descriptor_attaches_nothing() {
        let resolver = AuthScopeResolver::new(None).unwrap();
        assert!(resolver.credentials_for("https://example.dev/x").is_none());
    }

    #[test]
    fn test_malformed_descriptors() {
        for value in ["bearer:a:b", "basic:example.dev:alice", "basic:a:b:c:d", ""] {
            let err = AuthScopeResolver::new(Some(value)).unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::Config(ConfigError::MalformedAuthDescriptor { .. })
                ),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        assert!(AuthDescriptor::parse("BASIC:example.dev:alice:secret").is_ok());
        assert!(AuthDescriptor::parse("bearer:example.dev:alice:secret").is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let descriptor = AuthDescriptor::parse("basic:example.dev:alice:secret").unwrap();
        let debug = format!("{descriptor:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret"));
    }
}
