//! Upstream target resolution.
//!
//! Accepted forms:
//! - full URL: `http[s]://host[:port][/prefix][?query]`
//! - bare `host[:port][/prefix]`, scheme defaults to `http`
//! - bare port number: `8081` means `http://127.0.0.1:8081`

use std::fmt;
use std::str::FromStr;

use axum::http::uri::{Authority, Scheme};
use url::Url;

/// Error resolving the upstream target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("Bad target URL: empty target")]
    Empty,

    #[error("Bad target URL: {input} ({reason})")]
    Invalid { input: String, reason: String },

    #[error("Bad target URL: {input} (unsupported scheme `{scheme}`)")]
    UnsupportedScheme { input: String, scheme: String },
}

/// The single upstream origin every request is forwarded to.
///
/// Immutable after startup. `label` is the target exactly as the operator
/// wrote it and is what appears in dump headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    scheme: Scheme,
    authority: Authority,
    path: String,
    query: Option<String>,
    label: String,
}

impl Target {
    /// Resolve a target string.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TargetError::Empty);
        }

        let url = if let Ok(port) = input.parse::<u16>() {
            Url::parse(&format!("http://127.0.0.1:{}", port))
        } else if input.contains("://") {
            Url::parse(input)
        } else {
            Url::parse(&format!("http://{}", input))
        }
        .map_err(|e| TargetError::Invalid {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => {
                return Err(TargetError::UnsupportedScheme {
                    input: input.to_string(),
                    scheme: other.to_string(),
                })
            }
        };

        let host = url.host_str().ok_or_else(|| TargetError::Invalid {
            input: input.to_string(),
            reason: "missing host".to_string(),
        })?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let authority = Authority::from_str(&authority).map_err(|e| TargetError::Invalid {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        // The url crate normalizes an empty path to "/"; keep it empty so
        // joining does not produce a double slash.
        let path = match url.path() {
            "/" => String::new(),
            p => p.to_string(),
        };

        Ok(Self {
            scheme,
            authority,
            path,
            query: url.query().filter(|q| !q.is_empty()).map(str::to_string),
            label: input.to_string(),
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Path prefix, empty when the target has none.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// The target as configured, used to tag dump blocks.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_port() {
        let target = Target::parse("8081").unwrap();
        assert_eq!(target.authority().as_str(), "127.0.0.1:8081");
        assert_eq!(target.path(), "");
        assert_eq!(target.to_string(), "http://127.0.0.1:8081");
        assert_eq!(target.label(), "8081");
    }

    #[test]
    fn test_full_url() {
        let target = Target::parse("http://127.0.0.1:9000").unwrap();
        assert_eq!(target.authority().as_str(), "127.0.0.1:9000");
        assert_eq!(target.path(), "");
        assert_eq!(target.query(), None);

        let target = Target::parse("http://example.com/api/?v=2").unwrap();
        assert_eq!(target.authority().as_str(), "example.com");
        assert_eq!(target.path(), "/api/");
        assert_eq!(target.query(), Some("v=2"));
        assert_eq!(target.to_string(), "http://example.com/api/?v=2");
    }

    #[test]
    fn test_https_url() {
        let target = Target::parse("https://api.example.com").unwrap();
        assert_eq!(target.scheme(), &Scheme::HTTPS);
        assert_eq!(target.authority().as_str(), "api.example.com");
        assert_eq!(target.path(), "");
        assert_eq!(target.to_string(), "https://api.example.com");

        // Default port is dropped, explicit ones are kept.
        let target = Target::parse("https://api.example.com:443/v2").unwrap();
        assert_eq!(target.authority().as_str(), "api.example.com");
        let target = Target::parse("https://10.0.0.9:8443/v2").unwrap();
        assert_eq!(target.authority().as_str(), "10.0.0.9:8443");
        assert_eq!(target.path(), "/v2");
    }

    #[test]
    fn test_bare_host() {
        let target = Target::parse("localhost:3000").unwrap();
        assert_eq!(target.scheme(), &Scheme::HTTP);
        assert_eq!(target.authority().as_str(), "localhost:3000");

        let target = Target::parse("backend.internal/v1").unwrap();
        assert_eq!(target.authority().as_str(), "backend.internal");
        assert_eq!(target.path(), "/v1");
    }

    #[test]
    fn test_label_is_trimmed_input() {
        let target = Target::parse("  localhost:3000 ").unwrap();
        assert_eq!(target.label(), "localhost:3000");
    }

    #[test]
    fn test_rejects_bad_targets() {
        assert_eq!(Target::parse("   "), Err(TargetError::Empty));
        assert!(matches!(
            Target::parse("http://"),
            Err(TargetError::Invalid { .. })
        ));
        assert!(matches!(
            Target::parse("ftp://example.com"),
            Err(TargetError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_error_message() {
        let err = Target::parse("http://").unwrap_err();
        assert!(err.to_string().starts_with("Bad target URL: http://"));
    }
}
