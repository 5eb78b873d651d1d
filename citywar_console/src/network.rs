use anyhow::Context;
use async_trait::async_trait;
use citywar::error::TransportError;
use citywar::sync::GameTransport;
use reqwest::header::CONTENT_TYPE;
use url::Url;


pub const STATUS_PATH: &str = "game/status";

pub struct HttpTransport {
    client: reqwest::Client,
    status_url: Url,
}

impl HttpTransport {
    pub fn new(server_address: &Url) -> anyhow::Result<Self> {
        let status_url = server_address
            .join(STATUS_PATH)
            .with_context(|| format!("Cannot build status URL from {server_address}"))?;
        Ok(HttpTransport { client: reqwest::Client::new(), status_url })
    }

    pub fn status_url(&self) -> &Url { &self.status_url }
}

fn unreachable(err: reqwest::Error) -> TransportError { TransportError::Unreachable(err.to_string()) }

async fn read_body(response: reqwest::Response) -> Result<String, TransportError> {
    let status = response.status();
    let body = response.text().await.map_err(unreachable)?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(TransportError::Rejected { status: status.as_u16(), body })
    }
}

#[async_trait]
impl GameTransport for HttpTransport {
    async fn fetch_status(&self) -> Result<String, TransportError> {
        let response = self.client.get(self.status_url.clone()).send().await.map_err(unreachable)?;
        read_body(response).await
    }

    async fn post_status(&self, body: String) -> Result<String, TransportError> {
        let response = self
            .client
            .post(self.status_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(unreachable)?;
        read_body(response).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_url() {
        let base = Url::parse("http://localhost:8000").unwrap();
        let transport = HttpTransport::new(&base).unwrap();
        assert_eq!(transport.status_url().as_str(), "http://localhost:8000/game/status");
    }
}
