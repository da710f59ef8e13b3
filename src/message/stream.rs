//! Body stream handle.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use axum::body::Body;
use bytes::Bytes;
use futures_util::StreamExt;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Errors raised while consuming a body stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The body was already taken by another consumer.
    #[error("Body stream already consumed")]
    Consumed,

    /// Reading from the source failed.
    #[error("Body read failed: {0}")]
    Read(#[from] axum::Error),

    /// Writing to the destination failed.
    #[error("Body write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Shared handle to a single-consumer byte stream.
///
/// Message values are immutable and cheap to clone, so every clone of a
/// request or response points at the same handle. The first consumer takes
/// the underlying body; later consumers get [`StreamError::Consumed`].
#[derive(Clone)]
pub struct Stream {
    inner: Arc<Mutex<Option<Body>>>,
}

impl Stream {
    /// Wrap a transport body.
    pub fn new(body: Body) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(body))),
        }
    }

    pub fn empty() -> Self {
        Self::new(Body::empty())
    }

    /// Stream over an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::new(Body::from(bytes.into()))
    }

    /// Take the underlying body, leaving the handle consumed.
    pub fn take(&self) -> Option<Body> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn is_consumed(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Returns true if both handles point at the same body.
    pub fn same_as(&self, other: &Stream) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Drain the stream into memory, failing past `limit` bytes.
    pub async fn read_to_bytes(&self, limit: usize) -> Result<Bytes, StreamError> {
        let body = self.take().ok_or(StreamError::Consumed)?;
        Ok(axum::body::to_bytes(body, limit).await?)
    }

    /// Relay the stream into `writer` chunk by chunk, then shut it down.
    ///
    /// Each chunk is awaited with `write_all`, so a slow writer holds back the
    /// source instead of the body piling up in memory.
    pub async fn pipe_to<W>(&self, writer: &mut W) -> Result<u64, StreamError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let body = self.take().ok_or(StreamError::Consumed)?;
        let mut chunks = body.into_data_stream();
        let mut written = 0u64;

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        writer.shutdown().await?;
        Ok(written)
    }
}

impl Default for Stream {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}
