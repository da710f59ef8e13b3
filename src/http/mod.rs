//! HTTP server subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum/hyper, tracing + timeout layers)
//!     → native::IncomingRequest (header folding)
//!     → bridge::RequestIngest → ServerRequest
//!     → Handler (e.g. echo.rs) → Response
//!     → bridge::ResponseEmitter → native::StreamingResponse
//!     → Send to client
//! ```

pub mod echo;
pub mod server;

pub use echo::EchoHandler;
pub use server::{BridgeServer, Handler};
