//! The HTTP collaborator that actually moves bytes. Everything above this module is pure request
//! construction; everything here is I/O.
use std::time::Duration;

use reqwest::header::HeaderMap;

/// A response received from the server, regardless of its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

/// A connection-level failure: no response was received.
#[derive(thiserror::Error, Debug)]
#[error("transport error: {source}")]
pub struct TransportError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    /// Wrap an underlying error.
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TransportError {
            source: source.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        // The URL carries no secrets, but it is noise in logs.
        TransportError::new(value.without_url())
    }
}

/// Sends a JSON body to a URL with the given headers.
///
/// Implement this to route requests through your own HTTP stack, or to observe requests in tests.
/// Implementations must not retry: one call is one attempt.
pub trait Transport: Send + Sync {
    /// POST `body` to `url` with `headers`.
    ///
    /// Returns `Ok` for any response the server produced, including error statuses. Returns `Err`
    /// only when no response was received.
    fn post(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn post(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError> {
        (**self).post(url, headers, body)
    }
}

/// The default [`Transport`], backed by a blocking `reqwest` client.
///
/// Do not use from within an async runtime: `reqwest::blocking` starts its own runtime internally.
pub struct HttpTransport {
    // Client holds a connection pool internally, so we're reusing the client between requests.
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<HttpTransport> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn post(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .headers(headers.clone())
            .body(body)
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use std::{net::TcpListener, time::Duration};

    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
    use tokio::runtime::Runtime;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::{HttpTransport, Transport};

    /// Starts a mock server answering POSTs to `route` with `response`.
    ///
    /// The server runs on the returned runtime's worker threads, so the blocking transport can be
    /// driven from the test thread.
    fn mock_server(route: &str, response: ResponseTemplate) -> (Runtime, MockServer) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(route))
                .respond_with(response)
                .expect(1)
                .mount(&server)
                .await;
            server
        });
        (runtime, server)
    }

    #[test]
    fn posts_body_and_headers() {
        let (runtime, server) = mock_server("/v2/identify", ResponseTemplate::new(200));
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-outbound-key", HeaderValue::from_static("key123"));

        let response = transport
            .post(
                &format!("{}/v2/identify", server.uri()),
                &headers,
                br#"{"user_id":42}"#.to_vec(),
            )
            .unwrap();
        assert_eq!(response.status, 200);

        let requests = runtime.block_on(server.received_requests()).unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.headers["content-type"], "application/json");
        assert_eq!(request.headers["x-outbound-key"], "key123");
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&request.body).unwrap(),
            serde_json::json!({"user_id": 42})
        );
    }

    #[test]
    fn returns_error_statuses_as_responses() {
        let (runtime, server) = mock_server(
            "/track",
            ResponseTemplate::new(500).set_body_string("something broke"),
        );
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();

        let response = transport
            .post(&format!("{}/track", server.uri()), &HeaderMap::new(), b"{}".to_vec())
            .unwrap();

        assert_eq!(response.status, 500);
        assert_eq!(response.body, "something broke");
        // One call is one attempt.
        assert_eq!(runtime.block_on(server.received_requests()).unwrap().len(), 1);
    }

    #[test]
    fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();

        let result = transport.post(
            &format!("http://{addr}/identify"),
            &HeaderMap::new(),
            b"{}".to_vec(),
        );
        assert!(result.is_err());
    }
}
