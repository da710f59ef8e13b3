//! Translation between transport messages and the abstract message model.
//!
//! # Data Flow
//! ```text
//! IncomingRequest
//!     → ingest.rs (validate, resolve origin, parse cookies/query, copy headers)
//!     → ServerRequest
//!
//! Response
//!     → emit.rs (status line, headers, streamed body)
//!     → OutgoingResponse
//! ```
//!
//! # Design Decisions
//! - Both translators are stateless and safe to share across tasks
//! - Ingest validates everything before any factory is called
//! - Emit never buffers the whole body

pub mod emit;
pub mod error;
pub mod ingest;

pub use emit::ResponseEmitter;
pub use error::{EmitError, IngestError};
pub use ingest::{RequestIngest, UriOptions};
