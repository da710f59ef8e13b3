//! Inbound request translation.
//!
//! # Responsibilities
//! - Reject requests without method or URL
//! - Resolve scheme and host according to [`UriOptions`]
//! - Build the `ServerRequest` through the configured factories
//! - Attach cookie and query parameters when present
//! - Copy every present header, including the ones used above
//!
//! # Design Decisions
//! - Only absent header values are skipped; empty strings and empty lists
//!   are attached as they are
//! - Header names are attached unchanged
//! - In proxy mode every missing forwarding header is reported at once

use std::sync::Arc;

use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::bridge::IngestError;
use crate::factory::{MessageFactory, ServerRequestFactory, StreamFactory, UriFactory};
use crate::message::ServerRequest;
use crate::native::IncomingRequest;
use crate::parse::{parse_cookies, parse_query};

pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";
pub const X_FORWARDED_PORT: &str = "x-forwarded-port";

const DEFAULT_HOST: &str = "localhost";

/// How the scheme and host of the request URI are determined.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UriOptions {
    /// `http`, host from the `Host` header or `localhost`.
    #[default]
    Disabled,

    /// Scheme, host and port from `X-Forwarded-Proto/Host/Port`, all required.
    TrustProxyHeaders,

    /// Fixed scheme; fixed host if given, else the `Host` header or `localhost`.
    Override {
        scheme: String,
        #[serde(default)]
        host: Option<String>,
    },
}

impl UriOptions {
    pub fn override_scheme(scheme: impl Into<String>) -> Self {
        UriOptions::Override {
            scheme: scheme.into(),
            host: None,
        }
    }

    pub fn override_scheme_and_host(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        UriOptions::Override {
            scheme: scheme.into(),
            host: Some(host.into()),
        }
    }
}

/// Builds `ServerRequest` values from transport requests.
#[derive(Clone)]
pub struct RequestIngest {
    server_request_factory: Arc<dyn ServerRequestFactory>,
    uri_factory: Arc<dyn UriFactory>,
    stream_factory: Arc<dyn StreamFactory>,
    uri_options: UriOptions,
}

impl RequestIngest {
    pub fn new(
        server_request_factory: Arc<dyn ServerRequestFactory>,
        uri_factory: Arc<dyn UriFactory>,
        stream_factory: Arc<dyn StreamFactory>,
        uri_options: UriOptions,
    ) -> Self {
        Self {
            server_request_factory,
            uri_factory,
            stream_factory,
            uri_options,
        }
    }

    /// Ingest backed by [`MessageFactory`] for all three factories.
    pub fn with_defaults(uri_options: UriOptions) -> Self {
        let factory = Arc::new(MessageFactory);
        Self::new(factory.clone(), factory.clone(), factory, uri_options)
    }

    pub fn uri_options(&self) -> &UriOptions {
        &self.uri_options
    }

    /// Translate a transport request.
    pub fn ingest(&self, request: IncomingRequest) -> Result<ServerRequest, IngestError> {
        let method = request
            .method
            .as_deref()
            .filter(|method| !method.is_empty())
            .ok_or(IngestError::MissingMethod)?;
        let url = request
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(IngestError::MissingUrl)?;
        let method = parse_method(method)?;
        let origin = self.resolve_origin(&request)?;

        let cookie = request
            .header("cookie")
            .map(|value| value.join("; "))
            .filter(|value| !value.is_empty());

        let uri = self.uri_factory.create_uri(&format!("{origin}{url}"))?;

        let IncomingRequest {
            http_version,
            headers,
            body,
            ..
        } = request;

        let mut server_request = self
            .server_request_factory
            .create_server_request(method, uri.clone())
            .with_protocol_version(http_version)
            .with_body(self.stream_factory.create_stream_from_resource(body));

        if let Some(cookie) = cookie {
            server_request = server_request.with_cookie_params(parse_cookies(&cookie));
        }

        let query = uri.query();
        if !query.is_empty() {
            server_request = server_request.with_query_params(parse_query(query));
        }

        for (name, value) in headers {
            if let Some(value) = value {
                server_request = server_request.with_header(name, value.into_values());
            }
        }

        tracing::debug!(
            method = %server_request.method(),
            uri = %server_request.uri(),
            headers = server_request.headers().len(),
            "Request ingested"
        );

        Ok(server_request)
    }

    fn resolve_origin(&self, request: &IncomingRequest) -> Result<String, IngestError> {
        let host_header = || {
            request
                .header("host")
                .map(|value| value.line())
                .filter(|host| !host.is_empty())
        };

        match &self.uri_options {
            UriOptions::Disabled => {
                let host = host_header().unwrap_or_else(|| DEFAULT_HOST.to_string());
                Ok(format!("http://{host}"))
            }
            UriOptions::TrustProxyHeaders => {
                let proto = request.header(X_FORWARDED_PROTO);
                let host = request.header(X_FORWARDED_HOST);
                let port = request.header(X_FORWARDED_PORT);

                match (proto, host, port) {
                    (Some(proto), Some(host), Some(port)) => Ok(format!(
                        "{}://{}:{}",
                        proto.line(),
                        host.line(),
                        port.line()
                    )),
                    _ => {
                        let missing: Vec<&'static str> = [
                            (X_FORWARDED_PROTO, proto.is_none()),
                            (X_FORWARDED_HOST, host.is_none()),
                            (X_FORWARDED_PORT, port.is_none()),
                        ]
                        .into_iter()
                        .filter_map(|(name, missing)| missing.then_some(name))
                        .collect();

                        tracing::warn!(missing = ?missing, "Forwarding headers missing");
                        Err(IngestError::MissingProxyHeaders(missing))
                    }
                }
            }
            UriOptions::Override { scheme, host } => {
                let host = host
                    .clone()
                    .or_else(host_header)
                    .unwrap_or_else(|| DEFAULT_HOST.to_string());
                Ok(format!("{scheme}://{host}"))
            }
        }
    }
}

fn parse_method(method: &str) -> Result<Method, IngestError> {
    let upper = method.to_ascii_uppercase();
    Method::from_bytes(upper.as_bytes()).map_err(|_| IngestError::InvalidMethod(upper))
}
