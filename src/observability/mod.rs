//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! bridge, server and handlers produce:
//!     → tracing events with structured fields (method, uri, status, bytes)
//!     → tower-http TraceLayer spans per request
//!
//! Consumers:
//!     → stdout, pretty or JSON lines
//! ```

pub mod logging;

pub use logging::init_logging;
