//! Immutable server-side request.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::Method;

use crate::message::{CookieParams, Headers, QueryParams, Stream, Uri};

/// An incoming request as seen by the application.
///
/// All `with_*` methods return a new value. Collections sit behind `Arc`, so
/// a step only copies the part it changes.
#[derive(Debug, Clone)]
pub struct ServerRequest {
    method: Method,
    uri: Uri,
    protocol_version: String,
    headers: Headers,
    body: Stream,
    cookie_params: Arc<CookieParams>,
    query_params: Arc<QueryParams>,
    attributes: Arc<BTreeMap<String, serde_json::Value>>,
}

impl ServerRequest {
    /// Create a request with an empty body and protocol version `1.1`.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            protocol_version: "1.1".to_string(),
            headers: Headers::new(),
            body: Stream::empty(),
            cookie_params: Arc::default(),
            query_params: Arc::default(),
            attributes: Arc::default(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> &[String] {
        self.headers.get(name)
    }

    pub fn header_line(&self, name: &str) -> String {
        self.headers.get_line(name)
    }

    pub fn body(&self) -> &Stream {
        &self.body
    }

    pub fn cookie_params(&self) -> &CookieParams {
        &self.cookie_params
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query_params
    }

    pub fn attributes(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }

    pub fn with_method(&self, method: Method) -> Self {
        Self {
            method,
            ..self.clone()
        }
    }

    pub fn with_uri(&self, uri: Uri) -> Self {
        Self {
            uri,
            ..self.clone()
        }
    }

    pub fn with_protocol_version(&self, version: impl Into<String>) -> Self {
        Self {
            protocol_version: version.into(),
            ..self.clone()
        }
    }

    /// Replace a header with the given values.
    pub fn with_header(&self, name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            headers: self.headers.with(name, values),
            ..self.clone()
        }
    }

    pub fn with_added_header(&self, name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            headers: self.headers.with_added(name, values),
            ..self.clone()
        }
    }

    pub fn without_header(&self, name: &str) -> Self {
        Self {
            headers: self.headers.without(name),
            ..self.clone()
        }
    }

    pub fn with_body(&self, body: Stream) -> Self {
        Self {
            body,
            ..self.clone()
        }
    }

    pub fn with_cookie_params(&self, cookies: CookieParams) -> Self {
        Self {
            cookie_params: Arc::new(cookies),
            ..self.clone()
        }
    }

    pub fn with_query_params(&self, query: QueryParams) -> Self {
        Self {
            query_params: Arc::new(query),
            ..self.clone()
        }
    }

    pub fn with_attribute(&self, name: impl Into<String>, value: serde_json::Value) -> Self {
        let mut attributes = Arc::clone(&self.attributes);
        Arc::make_mut(&mut attributes).insert(name.into(), value);
        Self {
            attributes,
            ..self.clone()
        }
    }

    pub fn without_attribute(&self, name: &str) -> Self {
        if !self.attributes.contains_key(name) {
            return self.clone();
        }
        let mut attributes = Arc::clone(&self.attributes);
        Arc::make_mut(&mut attributes).remove(name);
        Self {
            attributes,
            ..self.clone()
        }
    }
}
