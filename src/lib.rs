//! HTTP message bridge library.
//!
//! Translates transport-level HTTP requests into immutable [`ServerRequest`]
//! values and writes [`Response`] values back onto the transport.

pub mod bridge;
pub mod config;
pub mod factory;
pub mod http;
pub mod lifecycle;
pub mod message;
pub mod native;
pub mod observability;
pub mod parse;

pub use bridge::{EmitError, IngestError, RequestIngest, ResponseEmitter, UriOptions};
pub use config::BridgeConfig;
pub use http::{BridgeServer, EchoHandler, Handler};
pub use lifecycle::Shutdown;
pub use message::{Response, ServerRequest, Stream, Uri};
pub use native::{IncomingRequest, OutgoingResponse};
