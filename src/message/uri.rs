//! Absolute request URI.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Errors raised when a URI cannot be built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid uri \"{uri}\": {reason}")]
pub struct UriError {
    pub uri: String,
    pub reason: String,
}

/// An absolute URI (scheme, authority, path, query).
///
/// Cloning is cheap enough for the request model; the parsed form is kept so
/// accessors never re-parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri {
    inner: Url,
}

impl Uri {
    /// Parse an absolute URI.
    pub fn parse(input: &str) -> Result<Self, UriError> {
        Url::parse(input)
            .map(|inner| Self { inner })
            .map_err(|e| UriError {
                uri: input.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn scheme(&self) -> &str {
        self.inner.scheme()
    }

    /// Host without port, empty if the URI has none.
    pub fn host(&self) -> &str {
        self.inner.host_str().unwrap_or_default()
    }

    /// Explicit port. Default ports for the scheme are not reported.
    pub fn port(&self) -> Option<u16> {
        self.inner.port()
    }

    pub fn path(&self) -> &str {
        self.inner.path()
    }

    /// Raw query string without the leading `?`, empty if there is none.
    pub fn query(&self) -> &str {
        self.inner.query().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Return a copy with a replaced query. An empty query removes it.
    pub fn with_query(&self, query: &str) -> Self {
        let mut inner = self.inner.clone();
        inner.set_query(if query.is_empty() { None } else { Some(query) });
        Self { inner }
    }

    /// Return a copy with a replaced path.
    pub fn with_path(&self, path: &str) -> Self {
        let mut inner = self.inner.clone();
        inner.set_path(path);
        Self { inner }
    }
}

impl FromStr for Uri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.inner.as_str())
    }
}
