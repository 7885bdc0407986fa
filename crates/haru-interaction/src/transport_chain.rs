//! Ordered transport fallback.

use haru_core::generation::{GenerationError, TextGenerator};
use std::sync::Arc;

/// An ordered list of transports tried one after another.
///
/// A link fails when its request fails, the endpoint answers with a
/// non-success status, or the payload does not parse. The first link that
/// produces a parseable payload wins; there are no retries and no backoff.
#[derive(Clone, Default)]
pub struct TransportChain {
    links: Vec<Arc<dyn TextGenerator>>,
}

impl TransportChain {
    pub fn new(links: Vec<Arc<dyn TextGenerator>>) -> Self {
        Self { links }
    }

    /// Appends a link to the end of the chain.
    pub fn with_link(mut self, link: Arc<dyn TextGenerator>) -> Self {
        self.links.push(link);
        self
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Link names in order, for diagnostics.
    pub fn link_names(&self) -> Vec<String> {
        self.links.iter().map(|link| link.name().to_string()).collect()
    }

    /// Runs `prompt` through the chain and parses the first usable payload.
    ///
    /// # Returns
    ///
    /// - `Ok(T)`: A link produced text that `parse` accepted
    /// - `Err(GenerationError::Exhausted)`: Every link failed
    /// - `Err(GenerationError::NotConfigured)`: The chain has no links
    pub async fn run<T, F>(&self, prompt: &str, parse: F) -> Result<T, GenerationError>
    where
        F: Fn(&str) -> Result<T, GenerationError>,
    {
        if self.links.is_empty() {
            return Err(GenerationError::NotConfigured("no transports configured".into()));
        }

        let mut last_error = None;
        for link in &self.links {
            let attempt = match link.generate(prompt).await {
                Ok(raw) => parse(&raw),
                Err(e) => Err(e),
            };

            match attempt {
                Ok(value) => {
                    tracing::debug!(transport = link.name(), "Transport succeeded");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(transport = link.name(), error = %e, "Transport failed; trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(GenerationError::Exhausted {
            attempts: self.links.len(),
            last: last_error
                .map(|e| e.to_string())
                .unwrap_or_default(),
        })
    }
}
