use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use tracing::debug;

use super::{ItemBundle, MetadataGateway};
use crate::common::errors::GatewayError;
use crate::common::types::Seconds;
use crate::configs::GatewayConfig;
use crate::protocol::ItemRef;

/// Catalog client over the service's JSON API.
pub struct HttpMetadataGateway {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpMetadataGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => req.header(header::AUTHORIZATION, format!("Token {}", token)),
            None => req,
        }
    }
}

#[async_trait]
impl MetadataGateway for HttpMetadataGateway {
    async fn fetch_item(&self, item: &ItemRef) -> Result<ItemBundle, GatewayError> {
        let url = format!(
            "{}/api/items/{}/{}/",
            self.base_url,
            urlencoding::encode(&item.extractor),
            urlencoding::encode(&item.id),
        );
        debug!("fetching item descriptor: {}", url);

        let resp = self.authorize(self.client.get(&url)).send().await?;
        if !resp.status().is_success() {
            return Err(GatewayError::Status(resp.status().as_u16()));
        }
        Ok(resp.json().await?)
    }

    async fn report_activity(
        &self,
        internal_id: i64,
        stop_time_sec: Seconds,
    ) -> Result<(), GatewayError> {
        let url = format!("{}/api/items/{}/progress/", self.base_url, internal_id);

        let resp = self
            .authorize(self.client.post(&url))
            .json(&serde_json::json!({ "position": stop_time_sec }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(GatewayError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}
