// HTTP loader for remote datasets
use crate::application::source_loader::SourceLoader;
use crate::domain::error::FetchError;
use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::Client,
}

impl HttpLoader {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SourceLoader for HttpLoader {
    async fn load(&self, uri: &str) -> Result<String, FetchError> {
        let response = self.client.get(uri).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { uri: uri.to_string() }
            } else {
                FetchError::Request {
                    uri: uri.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                uri: uri.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { uri: uri.to_string() }
            } else {
                FetchError::Body {
                    uri: uri.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        tracing::debug!("Fetched {} bytes from {}", body.len(), uri);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn loader() -> HttpLoader {
        HttpLoader::new(Duration::from_millis(500)).unwrap()
    }

    #[tokio::test]
    async fn test_loads_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/co2.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("country,year,co2\nChina,2021,11000\n"))
            .expect(1)
            .mount(&server)
            .await;

        let body = loader().load(&format!("{}/co2.csv", server.uri())).await.unwrap();
        assert_eq!(body, "country,year,co2\nChina,2021,11000\n");
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.csv"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = loader()
            .load(&format!("{}/missing.csv", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let err = loader().load(&format!("{}/slow.csv", server.uri())).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }
}
