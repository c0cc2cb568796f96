//! HTTP client for the platform's content-generation service.

use crate::plan::{GeneratedPlan, GenerationError};
use crate::UnitGenerator;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::json;
use tracing::debug;

/// Client for the external content service that turns a description into a
/// unit plan. The service is opaque; whatever it returns still goes through
/// plan validation before the engine sees it.
#[derive(Clone)]
pub struct HttpGenerator {
    /// HTTP client
    client: Client,

    /// Content service URL
    url: String,
}

impl HttpGenerator {
    /// Create a new content service client.
    pub fn new(url: String) -> Self {
        Self {
            client: ClientBuilder::new()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            url,
        }
    }
}

#[async_trait]
impl UnitGenerator for HttpGenerator {
    async fn generate(&self, description: &str) -> Result<GeneratedPlan, GenerationError> {
        let payload = json!({
            "description": description,
        });

        debug!("Requesting unit plan for '{}'", description);

        let response = self
            .client
            .post(format!("{}/v1/plans", self.url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| GenerationError::Service(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Service(format!(
                "content service error (status {}): {}",
                status, error_text
            )));
        }

        let plan: GeneratedPlan = response
            .json()
            .await
            .map_err(|e| GenerationError::Service(format!("malformed plan: {}", e)))?;

        plan.validate()?;
        Ok(plan)
    }
}
