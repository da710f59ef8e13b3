//! Transport-side request and response representations.
//!
//! # Responsibilities
//! - `incoming.rs`: the raw view of a request as the transport delivers it
//!   (method and URL may be missing, header values may be lists or absent)
//! - `outgoing.rs`: the write-once-then-stream response handle and the
//!   axum streaming adapter that hands encoding to hyper
//!
//! # Design Decisions
//! - Conversion from `http::Request` folds duplicate headers the way a
//!   Node-style transport does, so ingest sees one entry per name
//! - Status line and headers are locked once the body starts

pub mod incoming;
pub mod outgoing;

pub use incoming::{FieldValue, IncomingRequest};
pub use outgoing::{OutgoingResponse, PendingResponse, StreamingResponse};
