//! Inbound request as delivered by the transport.

use std::fmt;

use axum::body::Body;
use axum::http::{HeaderMap, Request, Version};

/// Headers that keep only their first value when repeated.
const SINGLETON_HEADERS: &[&str] = &[
    "age",
    "authorization",
    "content-length",
    "content-type",
    "etag",
    "expires",
    "from",
    "host",
    "if-modified-since",
    "if-unmodified-since",
    "last-modified",
    "location",
    "max-forwards",
    "proxy-authorization",
    "referer",
    "retry-after",
    "server",
    "user-agent",
];

/// A header value as the transport reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    /// Values as a list. A single value becomes a one-element list, an empty
    /// list stays empty.
    pub fn into_values(self) -> Vec<String> {
        match self {
            FieldValue::Single(value) => vec![value],
            FieldValue::Multiple(values) => values,
        }
    }

    /// Values joined with `separator`.
    pub fn join(&self, separator: &str) -> String {
        match self {
            FieldValue::Single(value) => value.clone(),
            FieldValue::Multiple(values) => values.join(separator),
        }
    }

    /// Values joined with `", "`.
    pub fn line(&self) -> String {
        self.join(", ")
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Multiple(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// Raw inbound request.
///
/// Header entries keep their original order; a `None` value marks a header
/// the transport lists without a value.
pub struct IncomingRequest {
    pub method: Option<String>,
    pub url: Option<String>,
    pub http_version: String,
    pub headers: Vec<(String, Option<FieldValue>)>,
    pub body: Body,
}

impl IncomingRequest {
    /// Empty request: no method, no URL, version `1.1`, empty body.
    pub fn new() -> Self {
        Self {
            method: None,
            url: None,
            http_version: "1.1".to_string(),
            headers: Vec::new(),
            body: Body::empty(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_http_version(mut self, version: impl Into<String>) -> Self {
        self.http_version = version.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.headers.push((name.into(), Some(value.into())));
        self
    }

    /// Add a header entry that carries no value.
    pub fn with_absent_header(mut self, name: impl Into<String>) -> Self {
        self.headers.push((name.into(), None));
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// First present value for `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&FieldValue> {
        self.headers
            .iter()
            .filter(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .find_map(|(_, value)| value.as_ref())
    }
}

impl Default for IncomingRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IncomingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncomingRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("http_version", &self.http_version)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl From<Request<Body>> for IncomingRequest {
    fn from(request: Request<Body>) -> Self {
        let (parts, body) = request.into_parts();

        let url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .or_else(|| parts.uri.authority().map(|a| a.as_str().to_string()))
            .unwrap_or_else(|| "/".to_string());

        Self {
            method: Some(parts.method.as_str().to_string()),
            url: Some(url),
            http_version: version_label(parts.version).to_string(),
            headers: fold_headers(&parts.headers),
            body,
        }
    }
}

/// Protocol version the way it appears after `HTTP/` on the wire.
pub fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "1.1",
    }
}

fn fold_headers(headers: &HeaderMap) -> Vec<(String, Option<FieldValue>)> {
    headers
        .keys()
        .map(|name| {
            let mut values = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

            let key = name.as_str();
            let value = match key {
                "set-cookie" => FieldValue::Multiple(values.collect()),
                "cookie" => FieldValue::Single(values.collect::<Vec<_>>().join("; ")),
                _ if SINGLETON_HEADERS.contains(&key) => {
                    FieldValue::Single(values.next().unwrap_or_default())
                }
                _ => FieldValue::Single(values.collect::<Vec<_>>().join(", ")),
            };
            (key.to_string(), Some(value))
        })
        .collect()
}
