//! Immutable response.

use axum::http::StatusCode;

use crate::message::{Headers, Stream};

/// A response produced by the application, ready to be emitted.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    reason_phrase: String,
    protocol_version: String,
    headers: Headers,
    body: Stream,
}

impl Response {
    /// Create a response. An empty reason phrase falls back to the canonical
    /// one for the status code.
    pub fn new(status: StatusCode, reason_phrase: &str) -> Self {
        Self {
            status,
            reason_phrase: resolve_reason(status, reason_phrase),
            protocol_version: "1.1".to_string(),
            headers: Headers::new(),
            body: Stream::empty(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header_line(&self, name: &str) -> String {
        self.headers.get_line(name)
    }

    pub fn body(&self) -> &Stream {
        &self.body
    }

    pub fn with_status(&self, status: StatusCode, reason_phrase: &str) -> Self {
        Self {
            status,
            reason_phrase: resolve_reason(status, reason_phrase),
            ..self.clone()
        }
    }

    pub fn with_protocol_version(&self, version: impl Into<String>) -> Self {
        Self {
            protocol_version: version.into(),
            ..self.clone()
        }
    }

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
}

fn resolve_reason(status: StatusCode, reason_phrase: &str) -> String {
    if reason_phrase.is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        reason_phrase.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_reason_default() {
        let res = Response::new(StatusCode::NOT_FOUND, "");
        assert_eq!(res.reason_phrase(), "Not Found");
    }

    #[test]
    fn test_custom_reason_kept() {
        let res = Response::new(StatusCode::OK, "Fine");
        assert_eq!(res.reason_phrase(), "Fine");

        let moved = res.with_status(StatusCode::CREATED, "");
        assert_eq!(moved.status(), StatusCode::CREATED);
        assert_eq!(moved.reason_phrase(), "Created");
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn test_header_order_preserved() {
        let res = Response::new(StatusCode::OK, "")
            .with_header("Content-Type", vec!["text/plain".into()])
            .with_header("X-Trace", vec!["a".into(), "b".into()]);

        let names: Vec<_> = res.headers().iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Content-Type", "X-Trace"]);
        assert_eq!(res.header_line("x-trace"), "a, b");
    }

    #[test]
    fn test_added_and_removed_headers() {
        let res = Response::new(StatusCode::OK, "")
            .with_header("Vary", vec!["Accept".into()])
            .with_added_header("vary", vec!["Origin".into()]);
        assert_eq!(res.header_line("Vary"), "Accept, Origin");

        let stripped = res.without_header("VARY");
        assert!(stripped.headers().is_empty());
        assert_eq!(res.headers().len(), 1);
    }
}
