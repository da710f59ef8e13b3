//! Error types for request ingest and response emission.

use thiserror::Error;

use crate::message::stream::StreamError;
use crate::message::UriError;

/// Errors raised while turning a transport request into a `ServerRequest`.
///
/// All of these are caused by the caller's input and are raised before any
/// factory is invoked (except `InvalidUri`, which the URI factory reports).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("Method missing")]
    MissingMethod,

    #[error("Url missing")]
    MissingUrl,

    /// Forwarding headers required in proxy mode, in proto/host/port order.
    #[error("Missing {} header(s).", quote_list(.0))]
    MissingProxyHeaders(Vec<&'static str>),

    #[error("Invalid method \"{0}\"")]
    InvalidMethod(String),

    #[error(transparent)]
    InvalidUri(#[from] UriError),
}

fn quote_list(names: &[&'static str]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while writing a `Response` onto a transport response.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Status line already written")]
    HeadAlreadySent,

    #[error("Headers already sent")]
    HeadersSent,

    #[error("Status line missing")]
    MissingHead,

    #[error("Invalid header \"{name}\": {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Invalid reason phrase \"{0}\"")]
    InvalidReasonPhrase(String),

    /// The receiving side of the transport response went away.
    #[error("Response receiver closed")]
    Closed,

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_proxy_headers_message() {
        let err = IngestError::MissingProxyHeaders(vec![
            "x-forwarded-proto",
            "x-forwarded-host",
            "x-forwarded-port",
        ]);
        assert_eq!(
            err.to_string(),
            "Missing \"x-forwarded-proto\", \"x-forwarded-host\", \"x-forwarded-port\" header(s)."
        );

        let err = IngestError::MissingProxyHeaders(vec!["x-forwarded-port"]);
        assert_eq!(err.to_string(), "Missing \"x-forwarded-port\" header(s).");
    }
}
