use async_trait::async_trait;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    transaction::VersionedTransaction,
};
use std::sync::Arc;

use crate::ports::{ChainClient, ChainError};

/// Wrapper around the blocking Solana RPC client with async-compatible methods
#[derive(Clone)]
pub struct SolanaClient {
    client: Arc<RpcClient>,
    commitment: CommitmentConfig,
}

impl SolanaClient {
    pub fn new(rpc_url: String) -> Self {
        Self::with_commitment(rpc_url, CommitmentConfig::confirmed())
    }

    pub fn with_commitment(rpc_url: String, commitment: CommitmentConfig) -> Self {
        let client = Arc::new(RpcClient::new_with_commitment(rpc_url, commitment));
        Self { client, commitment }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    /// SOL balance in lamports
    pub async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, ChainError> {
        let pubkey = *pubkey;
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_balance(&pubkey)
                .map_err(|e| ChainError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| ChainError::RpcError(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl ChainClient for SolanaClient {
    async fn latest_blockhash(&self) -> Result<Hash, ChainError> {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_latest_blockhash()
                .map_err(|e| ChainError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| ChainError::RpcError(format!("Task join error: {}", e)))?
    }

    async fn finalized_blockhash(&self) -> Result<Hash, ChainError> {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_latest_blockhash_with_commitment(CommitmentConfig::finalized())
                .map(|(hash, _)| hash)
                .map_err(|e| ChainError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| ChainError::RpcError(format!("Task join error: {}", e)))?
    }

    async fn submit(&self, transaction: &VersionedTransaction) -> Result<String, ChainError> {
        let tx = transaction.clone();
        let client = Arc::clone(&self.client);

        // Confirmation timeout is whatever the RPC client enforces
        tokio::task::spawn_blocking(move || {
            client
                .send_and_confirm_transaction(&tx)
                .map(|sig| sig.to_string())
                .map_err(|e| ChainError::TransactionError(e.to_string()))
        })
        .await
        .map_err(|e| ChainError::RpcError(format!("Task join error: {}", e)))?
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError> {
        let address = *address;
        let commitment = self.commitment;
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_account_with_commitment(&address, commitment)
                .map(|response| response.value.map(|account| account.data))
                .map_err(|e| ChainError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| ChainError::RpcError(format!("Task join error: {}", e)))?
    }
}
