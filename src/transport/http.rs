use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::{debug, warn};

use super::{FileReply, JsonReply, Transport};
use crate::config::ServerConfig;
use crate::error::RequestError;

/// reqwest-backed transport rooted at the configured server URL.
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(config: &ServerConfig) -> Result<Self, RequestError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| RequestError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let mut builder =
            Client::builder().user_agent(concat!("argus/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(HttpTransport {
            client: builder.build()?,
            base,
        })
    }

    fn url(&self, path: &str) -> Result<Url, RequestError> {
        self.base
            .join(path)
            .map_err(|e| RequestError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn read_json(path: &str, response: Response) -> Result<JsonReply, RequestError> {
        let status = response.status();
        if !status.is_success() {
            warn!("{} answered {}", path, status);
        }
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        Ok(JsonReply {
            status: status.as_u16(),
            body,
        })
    }
}

fn header_string(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<JsonReply, RequestError> {
        let url = self.url(path)?;
        debug!("POST {}", url);
        // .json() sets Content-Type: application/json
        let response = self.client.post(url).json(body).send().await?;
        Self::read_json(path, response).await
    }

    async fn get_json(&self, path: &str) -> Result<JsonReply, RequestError> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::read_json(path, response).await
    }

    async fn get_file(&self, path: &str) -> Result<FileReply, RequestError> {
        let url = self.url(path)?;
        debug!("GET {} (download)", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let disposition = header_string(&response, CONTENT_DISPOSITION);
        let content_type = header_string(&response, CONTENT_TYPE);
        let bytes = response.bytes().await?.to_vec();

        Ok(FileReply {
            disposition,
            content_type,
            bytes,
        })
    }

    fn resolve(&self, path: &str) -> String {
        self.url(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(base_url: &str) -> ServerConfig {
        ServerConfig {
            base_url: base_url.to_string(),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn paths_resolve_against_the_server_root() {
        let transport = HttpTransport::new(&server("http://127.0.0.1:5000")).unwrap();
        assert_eq!(transport.resolve("/scan"), "http://127.0.0.1:5000/scan");
        assert_eq!(
            transport.resolve("/report?scan=42"),
            "http://127.0.0.1:5000/report?scan=42"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = HttpTransport::new(&server("not a url")).err().unwrap();
        assert!(matches!(err, RequestError::InvalidUrl(_)));
    }
}
