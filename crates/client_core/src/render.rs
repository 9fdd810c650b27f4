//! Client for the external rendering service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{error::TransportError, protocol::RenderRequest};
use tracing::{debug, warn};

use crate::url_builder::resolve_render_url;

#[async_trait]
pub trait RenderService: Send + Sync {
    /// Fetches markup for `request`. Non-2xx responses are failures.
    async fn render(&self, request: &RenderRequest) -> Result<String, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpRenderService {
    http: Client,
    base_url: String,
}

impl HttpRenderService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RenderService for HttpRenderService {
    async fn render(&self, request: &RenderRequest) -> Result<String, TransportError> {
        let url = resolve_render_url(&self.base_url, &request.component, &request.props)?;
        debug!(request_id = %request.request_id, %url, "requesting component render");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| network_error(request, err))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                request_id = %request.request_id,
                status = status.as_u16(),
                "rendering service returned an error status"
            );
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|err| network_error(request, err))
    }
}

fn network_error(request: &RenderRequest, err: reqwest::Error) -> TransportError {
    warn!(request_id = %request.request_id, error = %err, "render request failed");
    TransportError::Network(err.to_string())
}
