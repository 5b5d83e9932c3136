use crate::error::{Result, ScanError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("webmirror/", env!("CARGO_PKG_VERSION"));

/// Downloads page bodies.
///
/// Content type is not inspected: whatever comes back with a 2xx status is
/// handed to the HTML parser.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::build(None)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(50) // Connection pooling
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60));

        if let Some(timeout) = timeout {
            builder = builder
                .timeout(timeout)
                .connect_timeout(timeout / 2);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"<html>hi</html>"))
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let body = fetcher
            .fetch(&format!("{}/page", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(body, b"<html>hi</html>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", mock_server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::Status { status: 404, .. }));
        assert!(err.is_fetch_error());
    }

    #[tokio::test]
    async fn test_fetch_non_html_body_is_returned_as_is() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_bytes(br#"{"a":1}"#),
            )
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let body = fetcher
            .fetch(&format!("{}/data.json", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(body, br#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        // grab a free port, then close it again
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let fetcher = Fetcher::with_timeout(Duration::from_secs(2)).unwrap();
        let err = fetcher
            .fetch(&format!("http://127.0.0.1:{}/", port))
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::Http(_)));
    }
}
