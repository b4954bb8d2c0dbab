//! Launchpad backend HTTP client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::adapters::http::send_with_retry;
use crate::domain::{TokenMetadata, TradeRecord};
use crate::ports::{BackendApi, BackendError, Following, ThreadReply, TokenInfo, TokenQuery, TradeHistoryEntry};

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_url: String,
    pub timeout: Duration,
    /// Attempts for read requests; writes are sent once
    pub max_retries: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            timeout: Duration::from_secs(15),
            max_retries: 3,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketIdResponse {
    market_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyBody<'a> {
    mint_addr: String,
    comment: &'a str,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    config: BackendConfig,
    http: Client,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn get<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, BackendError> {
        let response = send_with_retry(req, self.config.max_retries)
            .await
            .map_err(BackendError::ApiError)?;
        parse_response(response).await
    }

    async fn post(&self, req: RequestBuilder) -> Result<(), BackendError> {
        let response = req.send().await.map_err(|e| BackendError::ApiError(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }
        Ok(())
    }
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, body));
    }

    response
        .json()
        .await
        .map_err(|e| BackendError::ParseError(e.to_string()))
}

fn status_error(status: StatusCode, body: String) -> BackendError {
    if status == StatusCode::NOT_FOUND {
        BackendError::NotFound(body)
    } else {
        BackendError::ApiError(format!("{}: {}", status, body))
    }
}

fn follow_path(target_id: &str, follow: bool) -> String {
    let action = if follow { "follow" } else { "unfollow" };
    format!("/user/{}/{}", action, target_id)
}

fn parse_market_id(response: MarketIdResponse) -> Result<Pubkey, BackendError> {
    response
        .market_id
        .parse()
        .map_err(|e| BackendError::ParseError(format!("market id {}: {}", response.market_id, e)))
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn record_trade(&self, record: &TradeRecord) -> Result<(), BackendError> {
        debug!(mint = %record.mint, tx = %record.tx_hash, "Recording trade");
        self.post(self.http.post(self.url("/token/trade")).json(record)).await
    }

    async fn get_token(&self, mint: &Pubkey, user_id: Option<&str>) -> Result<TokenInfo, BackendError> {
        let mut req = self.http.get(self.url(&format!("/token/{}", mint)));
        if let Some(user_id) = user_id {
            req = req.query(&[("userId", user_id)]);
        }
        self.get(req).await
    }

    async fn get_trade_history(&self, mint: &Pubkey) -> Result<Vec<TradeHistoryEntry>, BackendError> {
        self.get(self.http.get(self.url(&format!("/token/trade-history/{}", mint))))
            .await
    }

    async fn get_market_id(&self, mint: &Pubkey, quote_mint: &Pubkey) -> Result<Pubkey, BackendError> {
        let response: MarketIdResponse = self
            .get(self.http.get(self.url(&format!("/token/market-id/{}/{}", mint, quote_mint))))
            .await?;
        parse_market_id(response)
    }

    async fn get_thread(&self, mint: &Pubkey, user_id: Option<&str>) -> Result<Vec<ThreadReply>, BackendError> {
        let mut req = self.http.get(self.url(&format!("/token/thread/{}", mint)));
        if let Some(user_id) = user_id {
            req = req.query(&[("userId", user_id)]);
        }
        self.get(req).await
    }

    async fn post_reply(&self, mint: &Pubkey, comment: &str) -> Result<(), BackendError> {
        let body = ReplyBody {
            mint_addr: mint.to_string(),
            comment,
        };
        self.post(self.http.post(self.url("/token/reply")).json(&body)).await
    }

    async fn like_reply(&self, reply_id: u64, liked: bool) -> Result<(), BackendError> {
        let action = if liked { "like" } else { "dislike" };
        self.post(self.http.post(self.url(&format!("/token/reply/{}/{}", reply_id, action))))
            .await
    }

    async fn update_token(&self, metadata: &TokenMetadata) -> Result<(), BackendError> {
        debug!(mint = %metadata.mint_addr, name = %metadata.name, "Registering token");
        self.post(self.http.post(self.url("/token/update")).json(metadata)).await
    }

    async fn find_tokens(&self, query: &TokenQuery) -> Result<Vec<TokenInfo>, BackendError> {
        self.get(self.http.get(self.url("/token/find")).query(&query.query_pairs()))
            .await
    }

    async fn get_king(&self) -> Result<Option<TokenInfo>, BackendError> {
        self.get(self.http.get(self.url("/token/king"))).await
    }

    async fn get_followings(&self, user_id: &str) -> Result<Vec<Following>, BackendError> {
        self.get(self.http.get(self.url(&format!("/user/followings/{}", user_id))))
            .await
    }

    async fn set_follow(&self, target_id: &str, follow: bool) -> Result<(), BackendError> {
        self.post(self.http.post(self.url(&follow_path(target_id, follow)))).await
    }
}
