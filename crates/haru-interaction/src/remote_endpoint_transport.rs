//! RemoteEndpointTransport - the hosted generation endpoint.
//!
//! The endpoint takes `{"prompt": "..."}` and answers with JSON wrapping the
//! generated text (usually `{"aiResponse": "..."}`).

use crate::response::extract_text;
use async_trait::async_trait;
use haru_core::generation::{GenerationError, TextGenerator};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct PromptRequest<'a> {
    prompt: &'a str,
}

/// Primary transport: POSTs the prompt to a hosted endpoint.
#[derive(Clone)]
pub struct RemoteEndpointTransport {
    client: Client,
    endpoint_url: String,
}

impl RemoteEndpointTransport {
    pub fn new(endpoint_url: impl Into<String>, timeout: Duration) -> Result<Self, GenerationError> {
        let endpoint_url = endpoint_url.into();
        if endpoint_url.trim().is_empty() {
            return Err(GenerationError::NotConfigured(
                "remote endpoint URL is empty".into(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GenerationError::NotConfigured(format!("HTTP client: {err}")))?;

        Ok(Self {
            client,
            endpoint_url,
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

#[async_trait]
impl TextGenerator for RemoteEndpointTransport {
    fn name(&self) -> &str {
        "remote-endpoint"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.endpoint_url)
            .json(&PromptRequest { prompt })
            .send()
            .await
            .map_err(|err| GenerationError::Request(format!("endpoint request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| GenerationError::Request(format!("failed to read body: {err}")))?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status_code: status.as_u16(),
                message: body,
            });
        }

        // Some deployments answer with bare text instead of JSON.
        let text = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => extract_text(&value),
            Err(_) => body,
        };

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}
