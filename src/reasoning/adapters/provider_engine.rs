//! Reasoning engine speaking one provider's wire format.

use crate::orchestration::domain::EngineDecision;
use crate::orchestration::ports::{EngineRequest, EngineResult, ReasoningEngine};
use crate::reasoning::domain::Provider;
use crate::reasoning::ports::EngineTransport;
use crate::reasoning::services::{RequestOptions, normalize_response, render_request};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// [`ReasoningEngine`] that renders each request for `provider`, sends it
/// through an [`EngineTransport`], and normalizes the answer.
#[derive(Debug)]
pub struct ProviderEngine<T>
where
    T: EngineTransport,
{
    provider: Provider,
    transport: Arc<T>,
    options: RequestOptions,
}

impl<T> Clone for ProviderEngine<T>
where
    T: EngineTransport,
{
    fn clone(&self) -> Self {
        Self {
            provider: self.provider,
            transport: Arc::clone(&self.transport),
            options: self.options.clone(),
        }
    }
}

impl<T> ProviderEngine<T>
where
    T: EngineTransport,
{
    /// Creates an engine for `provider` over `transport`.
    #[must_use]
    pub fn new(provider: Provider, transport: Arc<T>) -> Self {
        Self {
            provider,
            transport,
            options: RequestOptions::default(),
        }
    }

    /// Sets the model identifier sent with each request.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.options.model = Some(model.into());
        self
    }

    /// Sets the completion limit for providers that require one.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = max_tokens;
        self
    }

    /// Returns the provider format in use.
    #[must_use]
    pub const fn provider(&self) -> Provider {
        self.provider
    }
}

#[async_trait]
impl<T> ReasoningEngine for ProviderEngine<T>
where
    T: EngineTransport,
{
    async fn decide(&self, request: &EngineRequest) -> EngineResult<EngineDecision> {
        let body = render_request(self.provider, request, &self.options);
        debug!(
            provider = %self.provider,
            session_id = %request.session_id(),
            round = request.round(),
            "sending reasoning request"
        );
        let response = self.transport.send(body).await?;
        let decision = normalize_response(self.provider, &response)?;
        debug!(
            provider = %self.provider,
            round = request.round(),
            tool_calls = decision.tool_calls().len(),
            final_answer = decision.is_final(),
            "normalized reasoning response"
        );
        Ok(decision)
    }
}
