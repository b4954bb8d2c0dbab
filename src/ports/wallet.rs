use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, transaction::VersionedTransaction};
use thiserror::Error;

use crate::domain::TradeError;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Wallet not connected")]
    NotConnected,
    #[error("User rejected the request: {0}")]
    Rejected(String),
    #[error("Failed to sign transaction: {0}")]
    SigningError(String),
}

/// The connected wallet: one shared signing capability per session.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    fn is_connected(&self) -> bool;

    /// `None` while no wallet is connected
    fn public_key(&self) -> Option<Pubkey>;

    /// Sign every slot this wallet is responsible for.
    ///
    /// Fails with [`WalletError::Rejected`] when the user declines.
    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, WalletError>;
}

impl From<WalletError> for TradeError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NotConnected => TradeError::NotConnected,
            WalletError::Rejected(msg) => TradeError::SignatureRejected(msg),
            WalletError::SigningError(msg) => TradeError::Unknown(msg),
        }
    }
}
