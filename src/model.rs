//! Summarisation model backends.
//!
//! The summariser only needs one abstract capability: "summarise this text
//! with (max_length, min_length, deterministic, truncation)". That seam is
//! the [`SummarisationModel`] trait; [`HfModel`] implements it against a
//! Hugging Face inference endpoint, hosted or self-hosted.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ModelConfig;

/// Base URL of the hosted inference API
const HOSTED_API_BASE: &str = "https://api-inference.huggingface.co/models";

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("model returned no summary candidate")]
    EmptyResponse,
}

/// Decoding parameters for one generation call.
///
/// These mirror the transformers summarisation pipeline arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    /// Upper bound on generated tokens
    pub max_length: usize,
    /// Lower bound on generated tokens
    pub min_length: usize,
    /// Sampling toggle; `false` means deterministic decoding
    pub do_sample: bool,
    /// Model-side input truncation, a second safety net behind the
    /// character cap applied by the summariser
    pub truncation: bool,
}

/// An abstractive summarisation model.
///
/// One instance is constructed per session and reused across calls; it is
/// not assumed safe for concurrent calls from multiple callers.
#[async_trait]
pub trait SummarisationModel {
    /// Run one generation over `text` and return the first candidate's text.
    ///
    /// An empty candidate list is [`ModelError::EmptyResponse`]; callers
    /// decide whether that is fatal.
    async fn generate(&self, text: &str, params: &GenerationParams)
        -> Result<String, ModelError>;
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
    truncation: bool,
    /// Transformers device index, only meaningful to self-hosted
    /// pipeline endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<i64>,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct SummaryCandidate {
    summary_text: String,
}

/// Hugging Face inference client.
///
/// Construction failures and request failures propagate to the caller;
/// there is no retry, and no timeout is enforced on inference.
pub struct HfModel {
    client: Client,
    url: String,
    api_token: Option<String>,
    device: Option<i64>,
}

impl HfModel {
    pub fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        let client = Client::builder()
            .user_agent(crate::scraper::USER_AGENT)
            .build()?;

        // The hosted API picks its own device; only a self-hosted pipeline
        // endpoint honours the configured one.
        let (url, device) = match &config.endpoint {
            Some(endpoint) => (endpoint.clone(), Some(config.device.index())),
            None => (format!("{HOSTED_API_BASE}/{}", config.model), None),
        };

        Ok(Self {
            client,
            url,
            api_token: config.api_token.clone(),
            device,
        })
    }
}

#[async_trait]
impl SummarisationModel for HfModel {
    async fn generate(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, ModelError> {
        let body = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                max_length: params.max_length,
                min_length: params.min_length,
                do_sample: params.do_sample,
                truncation: params.truncation,
                device: self.device,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let candidates: Vec<SummaryCandidate> = response.json().await?;

        candidates
            .into_iter()
            .next()
            .map(|candidate| candidate.summary_text)
            .ok_or(ModelError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_is_omitted_from_hosted_requests() {
        let parameters = InferenceParameters {
            max_length: 200,
            min_length: 50,
            do_sample: false,
            truncation: true,
            device: None,
        };

        let json = serde_json::to_value(&parameters).unwrap();

        assert!(json.get("device").is_none());
        assert_eq!(json["max_length"], 200);
        assert_eq!(json["do_sample"], false);
    }

    #[test]
    fn device_is_forwarded_to_self_hosted_endpoints() {
        let parameters = InferenceParameters {
            max_length: 100,
            min_length: 25,
            do_sample: false,
            truncation: true,
            device: Some(-1),
        };

        let json = serde_json::to_value(&parameters).unwrap();

        assert_eq!(json["device"], -1);
    }

    #[test]
    fn candidate_response_deserialises() {
        let raw = r#"[{"summary_text": "A short summary."}]"#;

        let candidates: Vec<SummaryCandidate> = serde_json::from_str(raw).unwrap();

        assert_eq!(candidates[0].summary_text, "A short summary.");
    }
}
