//! Outbound response handles.

use std::future::Future;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use bytes::Bytes;
use hyper::ext::ReasonPhrase;
use tokio::io::{AsyncReadExt, AsyncWrite, DuplexStream};
use tokio::sync::oneshot;

use crate::bridge::EmitError;

/// Read buffer size for the streaming adapter.
const CHUNK_SIZE: usize = 16 * 1024;

/// A mutable, write-once response handle owned by the transport.
///
/// Callers write the status line, then headers, then the body. Once
/// `start_body` returned, the head is locked.
pub trait OutgoingResponse: Send {
    type Body: AsyncWrite + Unpin + Send;

    /// Set the status line. May only be called once.
    fn write_head(&mut self, status: StatusCode, reason_phrase: &str) -> Result<(), EmitError>;

    /// Set (or replace) a header with its full value list.
    fn set_header(&mut self, name: &str, values: &[String]) -> Result<(), EmitError>;

    /// Lock the head and hand out the body writer.
    fn start_body(&mut self) -> impl Future<Output = Result<&mut Self::Body, EmitError>> + Send;
}

fn check_header(name: &str, values: &[String]) -> Result<HeaderName, EmitError> {
    let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| EmitError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    for value in values {
        HeaderValue::from_str(value).map_err(|e| EmitError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(header)
}

fn check_reason(reason_phrase: &str) -> Result<(), EmitError> {
    if reason_phrase.bytes().any(|b| b == b'\r' || b == b'\n') {
        return Err(EmitError::InvalidReasonPhrase(reason_phrase.to_string()));
    }
    Ok(())
}

/// Status, reason and headers handed to the axum side once the body starts.
#[derive(Debug)]
struct ResponseHead {
    status: StatusCode,
    reason_phrase: String,
    headers: HeaderMap,
}

/// Response handle feeding an axum response through an in-memory pipe.
///
/// Created together with a [`PendingResponse`]; the pipe capacity bounds how
/// much body data can be in flight between the two.
pub struct StreamingResponse {
    status: Option<(StatusCode, String)>,
    headers: HeaderMap,
    head_tx: Option<oneshot::Sender<ResponseHead>>,
    writer: DuplexStream,
}

/// Receiving side of a [`StreamingResponse`].
pub struct PendingResponse {
    head_rx: oneshot::Receiver<ResponseHead>,
    reader: DuplexStream,
}

impl StreamingResponse {
    pub fn channel(capacity: usize) -> (StreamingResponse, PendingResponse) {
        let (head_tx, head_rx) = oneshot::channel();
        let (writer, reader) = tokio::io::duplex(capacity);
        (
            StreamingResponse {
                status: None,
                headers: HeaderMap::new(),
                head_tx: Some(head_tx),
                writer,
            },
            PendingResponse { head_rx, reader },
        )
    }
}

impl OutgoingResponse for StreamingResponse {
    type Body = DuplexStream;

    fn write_head(&mut self, status: StatusCode, reason_phrase: &str) -> Result<(), EmitError> {
        if self.status.is_some() {
            return Err(EmitError::HeadAlreadySent);
        }
        check_reason(reason_phrase)?;
        self.status = Some((status, reason_phrase.to_string()));
        Ok(())
    }

    fn set_header(&mut self, name: &str, values: &[String]) -> Result<(), EmitError> {
        if self.head_tx.is_none() {
            return Err(EmitError::HeadersSent);
        }
        let header = check_header(name, values)?;
        self.headers.remove(&header);
        for value in values {
            let value = HeaderValue::from_str(value).map_err(|e| EmitError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
            self.headers.append(header.clone(), value);
        }
        Ok(())
    }

    async fn start_body(&mut self) -> Result<&mut DuplexStream, EmitError> {
        if let Some(head_tx) = self.head_tx.take() {
            let (status, reason_phrase) = self.status.take().ok_or(EmitError::MissingHead)?;
            let head = ResponseHead {
                status,
                reason_phrase,
                headers: std::mem::take(&mut self.headers),
            };
            head_tx.send(head).map_err(|_| EmitError::Closed)?;
        }
        Ok(&mut self.writer)
    }
}

impl PendingResponse {
    /// Wait for the head and build an axum response whose body streams from
    /// the pipe.
    ///
    /// Fails with [`EmitError::Closed`] if the emitting side went away before
    /// starting the body.
    pub async fn into_response(self) -> Result<axum::response::Response, EmitError> {
        let head = self.head_rx.await.map_err(|_| EmitError::Closed)?;

        let chunks = futures_util::stream::unfold(Some(self.reader), |reader| async move {
            let mut reader = reader?;
            let mut buf = vec![0u8; CHUNK_SIZE];
            match reader.read(&mut buf).await {
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok(Bytes::from(buf)), Some(reader)))
                }
                Err(e) => Some((Err(e), None)),
            }
        });

        let mut response = axum::response::Response::new(Body::from_stream(chunks));
        *response.status_mut() = head.status;
        *response.headers_mut() = head.headers;

        if head.status.canonical_reason() != Some(head.reason_phrase.as_str()) {
            if let Ok(reason) = ReasonPhrase::try_from(head.reason_phrase.into_bytes()) {
                response.extensions_mut().insert(reason);
            }
        }

        Ok(response)
    }
}
