//! Jupiter API client
//!
//! HTTP client for the Jupiter swap API: quotes and swap transaction
//! building. Signing and submission live in [`super::JupiterSwap`].

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::quote::{QuoteRequest, QuoteResponse};
use super::swap::{SwapRequest, SwapResponse};
use crate::adapters::http::send_with_retry;
use crate::ports::SwapError;

/// Jupiter API client configuration
#[derive(Debug, Clone)]
pub struct JupiterConfig {
    pub api_base_url: String,
    /// Optional API key for higher rate limits
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub slippage_bps: u16,
    pub priority_fee_lamports: Option<u64>,
}

impl Default for JupiterConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.jup.ag/swap/v1".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            slippage_bps: 100,
            priority_fee_lamports: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JupiterClient {
    config: JupiterConfig,
    http: Client,
}

impl JupiterClient {
    pub fn with_config(config: JupiterConfig) -> Result<Self, SwapError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SwapError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &JupiterConfig {
        &self.config
    }

    pub async fn get_quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, SwapError> {
        let url = format!("{}/quote", self.config.api_base_url);
        let mut req = self.http.get(&url).query(&request.query_pairs());

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("x-api-key", api_key);
        }

        let response = send_with_retry(req, self.config.max_retries)
            .await
            .map_err(SwapError::ApiError)?;

        self.handle_response(response).await
    }

    pub async fn get_swap_transaction(&self, request: &SwapRequest) -> Result<SwapResponse, SwapError> {
        let url = format!("{}/swap", self.config.api_base_url);
        let mut req = self.http.post(&url).json(request);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("x-api-key", api_key);
        }

        let response = send_with_retry(req, self.config.max_retries)
            .await
            .map_err(SwapError::ApiError)?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, SwapError> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| SwapError::ApiError(format!("Failed to parse response: {}", e)))
    }
}

/// Map a failed Jupiter response body onto a swap error
fn classify_error(status: StatusCode, body: &str) -> SwapError {
    if body.contains("SlippageToleranceExceeded") || body.contains("6001") {
        return SwapError::SlippageExceeded;
    }
    if body.contains("COULD_NOT_FIND_ANY_ROUTE") || body.contains("NO_ROUTES_FOUND") {
        return SwapError::NoRoute(body.to_string());
    }
    SwapError::ApiError(format!("API error {}: {}", status, body))
}
