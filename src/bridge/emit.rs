//! Outbound response translation.

use crate::bridge::EmitError;
use crate::message::Response;
use crate::native::OutgoingResponse;

/// Writes `Response` values onto transport responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseEmitter;

impl ResponseEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Write status line, headers and body onto `out`.
    ///
    /// Each header is set once with its full value list, in the response's
    /// order. The body is relayed chunk by chunk and the writer is shut down
    /// at the end. Returns the number of body bytes written.
    pub async fn emit<O>(&self, response: &Response, out: &mut O) -> Result<u64, EmitError>
    where
        O: OutgoingResponse,
    {
        out.write_head(response.status(), response.reason_phrase())?;

        for (name, values) in response.headers().iter() {
            out.set_header(name, values)?;
        }

        let writer = out.start_body().await?;
        let written = response.body().pipe_to(writer).await?;

        tracing::debug!(
            status = response.status().as_u16(),
            headers = response.headers().len(),
            bytes = written,
            "Response emitted"
        );

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::message::Stream;
    use crate::native::StreamingResponse;

    #[derive(Debug, PartialEq)]
    enum Call {
        Head(u16, String),
        Header(String, Vec<String>),
        Body,
    }

    /// Records every call made on the transport response.
    #[derive(Default)]
    struct RecordingResponse {
        calls: Vec<Call>,
        body: Vec<u8>,
    }

    impl OutgoingResponse for RecordingResponse {
        type Body = Vec<u8>;

        fn write_head(&mut self, status: StatusCode, reason: &str) -> Result<(), EmitError> {
            self.calls.push(Call::Head(status.as_u16(), reason.to_string()));
            Ok(())
        }

        fn set_header(&mut self, name: &str, values: &[String]) -> Result<(), EmitError> {
            self.calls.push(Call::Header(name.to_string(), values.to_vec()));
            Ok(())
        }

        async fn start_body(&mut self) -> Result<&mut Vec<u8>, EmitError> {
            self.calls.push(Call::Body);
            Ok(&mut self.body)
        }
    }

    #[tokio::test]
    async fn test_emit_not_found() {
        let response = Response::new(StatusCode::NOT_FOUND, "Not Found")
            .with_header("Content-Type", vec!["application/json".into()])
            .with_body(Stream::from_bytes(r#"{"error":"missing"}"#));
        let mut out = RecordingResponse::default();

        let written = ResponseEmitter::new().emit(&response, &mut out).await.unwrap();

        assert_eq!(
            out.calls,
            vec![
                Call::Head(404, "Not Found".into()),
                Call::Header("Content-Type".into(), vec!["application/json".into()]),
                Call::Body,
            ]
        );
        assert_eq!(out.body, br#"{"error":"missing"}"#);
        assert_eq!(written, out.body.len() as u64);
        assert!(response.body().is_consumed());
    }

    #[tokio::test]
    async fn test_multi_value_header_set_once() {
        let response = Response::new(StatusCode::OK, "")
            .with_header("Set-Cookie", vec!["a=1".into(), "b=2".into()])
            .with_header("Cache-Control", vec!["no-store".into()]);
        let mut out = RecordingResponse::default();

        ResponseEmitter::new().emit(&response, &mut out).await.unwrap();

        assert_eq!(
            out.calls,
            vec![
                Call::Head(200, "OK".into()),
                Call::Header("Set-Cookie".into(), vec!["a=1".into(), "b=2".into()]),
                Call::Header("Cache-Control".into(), vec!["no-store".into()]),
                Call::Body,
            ]
        );
    }

    #[tokio::test]
    async fn test_consumed_body_fails() {
        let response = Response::new(StatusCode::OK, "");
        let _ = response.body().take();
        let mut out = RecordingResponse::default();

        let err = ResponseEmitter::new()
            .emit(&response, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, EmitError::Stream(_)));
    }

    #[tokio::test]
    async fn test_large_body_through_small_pipe() {
        let payload = vec![b'z'; 256 * 1024];
        let response = Response::new(StatusCode::OK, "OK")
            .with_header("Content-Length", vec![payload.len().to_string()])
            .with_body(Stream::from_bytes(payload.clone()));

        let (mut out, pending) = StreamingResponse::channel(64);
        let emit = tokio::spawn(async move {
            ResponseEmitter::new().emit(&response, &mut out).await
        });

        let native = pending.into_response().await.unwrap();
        assert_eq!(native.status(), StatusCode::OK);
        assert_eq!(native.headers()["content-length"], "262144");

        let received = axum::body::to_bytes(native.into_body(), usize::MAX)
            .await
            .unwrap();
        let written = emit.await.unwrap().unwrap();

        assert_eq!(written, payload.len() as u64);
        assert_eq!(&received[..], &payload[..]);
    }
}
