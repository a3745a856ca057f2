//! Access logging: one line per completed request.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use http::{HeaderMap, header};

use crate::context::RequestContext;

/// Log method, URI, status and latency of every request.
///
/// The request ID is read from the [`RequestContext`] the request ID
/// middleware leaves in the response extensions, and is `"unknown"` when
/// that middleware did not run.
pub async fn log_access(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let uri = request.uri().clone();
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .or_else(|| uri.host().map(String::from))
        .unwrap_or_default();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let remote_ip = client_ip(request.headers(), peer);

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let ctx = RequestContext::from_extensions(response.extensions());

    tracing::info!(
        status,
        latency = ?start.elapsed(),
        id = %ctx.request_id(),
        method = %method,
        uri = %uri,
        host = %host,
        remote_ip = %remote_ip,
        "request: {} {}; response status: {}",
        method,
        uri,
        status
    );

    response
}

/// Best-effort client address: `X-Real-Ip`, then `X-Forwarded-For` verbatim,
/// then the peer address of the connection.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let from_header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    from_header("x-real-ip")
        .or_else(|| from_header("x-forwarded-for"))
        .or_else(|| peer.map(|addr| addr.to_string()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    use axum::{Router, body::Body, middleware::from_fn, routing::get};
    use bookshelf_store::MemoryStore;
    use http::{HeaderValue, StatusCode};
    use tower::ServiceExt;

    use crate::config::ServerConfig;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::state::AppState;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }

        fn access_line(&self) -> String {
            self.contents()
                .lines()
                .find(|line| line.contains("response status:"))
                .map(String::from)
                .unwrap_or_default()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (buffer, guard)
    }

    #[tokio::test]
    async fn test_logs_final_status_and_request_id() {
        let (logs, _guard) = capture();
        let app = crate::build_app(AppState::new(
            Arc::new(MemoryStore::new()),
            ServerConfig::default(),
        ));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/books/5")
                    .header(header::HOST, "books.test")
                    .header("x-real-ip", "1.2.3.4")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let line = logs.access_line();
        assert!(line.contains("request: GET /books/5; response status: 404"), "{line}");
        assert!(line.contains("status=404"), "{line}");
        assert!(line.contains(&format!("id={request_id}")), "{line}");
        assert!(line.contains("method=GET"), "{line}");
        assert!(line.contains("uri=/books/5"), "{line}");
        assert!(line.contains("host=books.test"), "{line}");
        assert!(line.contains("remote_ip=1.2.3.4"), "{line}");
    }

    #[tokio::test]
    async fn test_id_unknown_without_request_id_stage() {
        let (logs, _guard) = capture();
        let app = Router::new()
            .route("/", get(|| async { StatusCode::CREATED }))
            .layer(from_fn(log_access));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let line = logs.access_line();
        assert!(line.contains("status=201"), "{line}");
        assert!(line.contains("id=unknown"), "{line}");
    }

    fn peer() -> Option<SocketAddr> {
        Some(SocketAddr::from(([10, 0, 0, 7], 51234)))
    }

    #[test]
    fn test_real_ip_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.9"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("198.51.100.1"));
        assert_eq!(client_ip(&headers, peer()), "203.0.113.9");
    }

    #[test]
    fn test_forwarded_for_kept_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.1, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, peer()), "198.51.100.1, 10.0.0.1");
    }

    #[test]
    fn test_falls_back_to_peer() {
        assert_eq!(client_ip(&HeaderMap::new(), peer()), "10.0.0.7:51234");
        assert_eq!(client_ip(&HeaderMap::new(), None), "");
    }
}
