//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Ctrl+C / SIGTERM or trigger() → server stops accepting → in-flight
//!     requests drain → run() returns
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
