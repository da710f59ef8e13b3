//! Abstract HTTP message model.
//!
//! # Data Flow
//! ```text
//! native request
//!     → bridge::ingest (validate, resolve origin)
//!     → ServerRequest (immutable, shared via Arc)
//!     → application handler
//!     → Response (immutable)
//!     → bridge::emit → native response
//! ```
//!
//! # Design Decisions
//! - Every `with_*` returns a new value; earlier values stay valid
//! - Unchanged sub-structures are shared, not copied
//! - Body streams are single-consumer handles shared between clones

pub mod headers;
pub mod params;
pub mod request;
pub mod response;
pub mod stream;
pub mod uri;

pub use headers::Headers;
pub use params::{CookieParams, QueryParams, QueryValue};
pub use request::ServerRequest;
pub use response::Response;
pub use stream::Stream;
pub use uri::{Uri, UriError};
