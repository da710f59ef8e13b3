//! Echo handler: describes the ingested request as JSON.

use axum::http::StatusCode;
use serde_json::{json, Map, Value};

use crate::factory::{MessageFactory, ResponseFactory, StreamFactory};
use crate::http::server::Handler;
use crate::message::{Response, ServerRequest};

/// Replies with method, URI, protocol version, headers, query, cookies and
/// body of the request it received.
#[derive(Debug, Clone)]
pub struct EchoHandler {
    max_body_bytes: usize,
    factory: MessageFactory,
}

impl EchoHandler {
    pub fn new(max_body_bytes: usize) -> Self {
        Self {
            max_body_bytes,
            factory: MessageFactory,
        }
    }

    fn json_response(&self, status: StatusCode, document: &Value) -> Response {
        self.factory
            .create_response(status, "")
            .with_header("Content-Type", vec!["application/json".into()])
            .with_body(self.factory.create_stream(document.to_string().into()))
    }
}

impl Handler for EchoHandler {
    async fn handle(&self, request: ServerRequest) -> Response {
        let body = match request.body().read_to_bytes(self.max_body_bytes).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!(error = %e, limit = self.max_body_bytes, "Request body rejected");
                return self.json_response(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    &json!({ "error": e.to_string() }),
                );
            }
        };

        let headers: Map<String, Value> = request
            .headers()
            .iter()
            .map(|(name, values)| (name.to_string(), json!(values)))
            .collect();

        let document = json!({
            "method": request.method().as_str(),
            "uri": request.uri().as_str(),
            "protocol_version": request.protocol_version(),
            "headers": headers,
            "query": request.query_params(),
            "cookies": request.cookie_params(),
            "body": body,
        });

        self.json_response(StatusCode::OK, &document)
    }
}
