use async_trait::async_trait;
use solana_sdk::{hash::Hash, pubkey::Pubkey, transaction::VersionedTransaction};
use thiserror::Error;

use crate::domain::TradeError;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC request failed: {0}")]
    RpcError(String),
    #[error("Transaction failed: {0}")]
    TransactionError(String),
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
}

/// Chain RPC access needed to land a trade
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Recent blockhash used as the transaction's block reference
    async fn latest_blockhash(&self) -> Result<Hash, ChainError>;

    /// Blockhash at finalized commitment, for launch transactions
    async fn finalized_blockhash(&self) -> Result<Hash, ChainError> {
        self.latest_blockhash().await
    }

    /// Send a signed transaction and wait for confirmation; returns the signature
    async fn submit(&self, transaction: &VersionedTransaction) -> Result<String, ChainError>;

    /// Raw account data, `None` when the account does not exist
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError>;
}

impl From<ChainError> for TradeError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::RpcError(msg) | ChainError::TransactionError(msg) => {
                TradeError::SubmissionFailed(msg)
            }
            other => TradeError::Unknown(other.to_string()),
        }
    }
}
