//! Factories for message values.
//!
//! The bridge never constructs message values directly; it goes through these
//! traits so an application can plug in its own request, URI or stream types
//! (and tests can count calls).

use axum::body::Body;
use axum::http::{Method, StatusCode};
use bytes::Bytes;

use crate::message::{Response, ServerRequest, Stream, Uri, UriError};

/// Creates the base server request from method and URI.
pub trait ServerRequestFactory: Send + Sync {
    fn create_server_request(&self, method: Method, uri: Uri) -> ServerRequest;
}

/// Resolves an absolute URI string.
pub trait UriFactory: Send + Sync {
    fn create_uri(&self, uri: &str) -> Result<Uri, UriError>;
}

/// Wraps byte sources into body streams.
pub trait StreamFactory: Send + Sync {
    /// Stream over in-memory content.
    fn create_stream(&self, content: Bytes) -> Stream;

    /// Stream over a transport body.
    fn create_stream_from_resource(&self, body: Body) -> Stream;
}

/// Creates responses for application handlers.
pub trait ResponseFactory: Send + Sync {
    fn create_response(&self, status: StatusCode, reason_phrase: &str) -> Response;
}

/// Default factory backed by the crate's own message types.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFactory;

impl ServerRequestFactory for MessageFactory {
    fn create_server_request(&self, method: Method, uri: Uri) -> ServerRequest {
        ServerRequest::new(method, uri)
    }
}

impl UriFactory for MessageFactory {
    fn create_uri(&self, uri: &str) -> Result<Uri, UriError> {
        Uri::parse(uri)
    }
}

impl StreamFactory for MessageFactory {
    fn create_stream(&self, content: Bytes) -> Stream {
        Stream::from_bytes(content)
    }

    fn create_stream_from_resource(&self, body: Body) -> Stream {
        Stream::new(body)
    }
}

impl ResponseFactory for MessageFactory {
    fn create_response(&self, status: StatusCode, reason_phrase: &str) -> Response {
        Response::new(status, reason_phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_stream() {
        let stream = MessageFactory.create_stream(Bytes::from_static(b"abc"));
        assert_eq!(&stream.read_to_bytes(16).await.unwrap()[..], b"abc");
    }

    #[test]
    fn test_create_response_defaults_reason() {
        let res = MessageFactory.create_response(StatusCode::BAD_REQUEST, "");
        assert_eq!(res.reason_phrase(), "Bad Request");
    }
}
