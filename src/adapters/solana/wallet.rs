use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::VersionedTransaction,
};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::domain::partial_sign;
use crate::ports::{WalletError, WalletSigner};

#[derive(Debug, Error)]
pub enum KeypairError {
    #[error("Failed to load keypair from file: {0}")]
    LoadError(String),
    #[error("Invalid keypair bytes: {0}")]
    InvalidKeypair(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Local keypair wallet; always connected once loaded
pub struct WalletManager {
    keypair: Keypair,
}

impl WalletManager {
    /// Load keypair from a file path (JSON array format, as written by solana-keygen)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, KeypairError> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| KeypairError::LoadError(format!("Failed to read file: {}", e)))?;

        let bytes: Vec<u8> = serde_json::from_str(&contents)
            .map_err(|e| KeypairError::LoadError(format!("Invalid JSON format: {}", e)))?;

        Self::from_bytes(&bytes)
    }

    /// Load keypair from a base58 secret key (the format wallets export)
    pub fn from_base58(secret: &str) -> Result<Self, KeypairError> {
        let bytes = bs58::decode(secret.trim())
            .into_vec()
            .map_err(|e| KeypairError::InvalidKeypair(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeypairError> {
        let keypair = Keypair::try_from(bytes)
            .map_err(|e| KeypairError::InvalidKeypair(e.to_string()))?;

        Ok(Self { keypair })
    }

    /// Create a new random keypair (for testing)
    pub fn new_random() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Export keypair as bytes (use with caution)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.keypair.to_bytes().to_vec()
    }
}

#[async_trait]
impl WalletSigner for WalletManager {
    fn is_connected(&self) -> bool {
        true
    }

    fn public_key(&self) -> Option<Pubkey> {
        Some(self.keypair.pubkey())
    }

    async fn sign_transaction(
        &self,
        mut transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, WalletError> {
        partial_sign(&mut transaction, &self.keypair).map_err(|e| WalletError::SigningError(e.to_string()))?;
        Ok(transaction)
    }
}
