//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with a single catch-all route
//! - Wire up middleware (tracing, timeout)
//! - Run every request through ingest, the handler and emit
//! - Map ingest failures to `400 Bad Request`

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response as AxumResponse},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::bridge::{RequestIngest, ResponseEmitter};
use crate::config::BridgeConfig;
use crate::lifecycle::Shutdown;
use crate::message::{Response, ServerRequest};
use crate::native::{IncomingRequest, StreamingResponse};

/// Application code running behind the bridge.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: ServerRequest) -> impl Future<Output = Response> + Send;
}

/// State injected into the catch-all route.
struct AppState<H> {
    ingest: RequestIngest,
    emitter: ResponseEmitter,
    handler: Arc<H>,
    stream_buffer_bytes: usize,
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            ingest: self.ingest.clone(),
            emitter: self.emitter,
            handler: Arc::clone(&self.handler),
            stream_buffer_bytes: self.stream_buffer_bytes,
        }
    }
}

/// HTTP server exposing a [`Handler`] through the bridge.
pub struct BridgeServer {
    router: Router,
    config: BridgeConfig,
}

impl BridgeServer {
    /// Create a server with the default factories.
    pub fn new<H: Handler>(config: BridgeConfig, handler: H) -> Self {
        let ingest = RequestIngest::with_defaults(config.uri.clone());
        Self::with_ingest(config, ingest, handler)
    }

    /// Create a server with a custom ingest (e.g. custom factories).
    pub fn with_ingest<H: Handler>(config: BridgeConfig, ingest: RequestIngest, handler: H) -> Self {
        let state = AppState {
            ingest,
            emitter: ResponseEmitter::new(),
            handler: Arc::new(handler),
            stream_buffer_bytes: config.listener.stream_buffer_bytes,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<H: Handler>(config: &BridgeConfig, state: AppState<H>) -> Router {
        Router::new()
            .fallback(bridge_handler::<H>)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving it elsewhere or driving it in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Serve connections until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            uri_mode = ?self.config.uri,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.signalled())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all route: ingest, handle, emit.
async fn bridge_handler<H: Handler>(
    State(state): State<AppState<H>>,
    request: Request<Body>,
) -> AxumResponse {
    let incoming = IncomingRequest::from(request);

    let server_request = match state.ingest.ingest(incoming) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!(error = %e, "Request rejected");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let response = state.handler.handle(server_request).await;

    let (mut sink, pending) = StreamingResponse::channel(state.stream_buffer_bytes);
    let emitter = state.emitter;
    tokio::spawn(async move {
        if let Err(e) = emitter.emit(&response, &mut sink).await {
            tracing::error!(error = %e, "Response emission failed");
        }
    });

    match pending.into_response().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Response head never arrived");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
