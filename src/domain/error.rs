use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use super::plan::PlanError;

/// Every way a trade can fail, as surfaced to the caller.
///
/// None of these are retried; the caller may immediately place a fresh request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TradeError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Not connected wallet!")]
    NotConnected,

    #[error("{0}")]
    InvalidLaunch(String),

    #[error("Contract not initialized yet!")]
    ProgramNotInitialized,

    #[error("Pool not created for token '{0}'")]
    PoolNotFound(Pubkey),

    #[error("Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    #[error("Signature request rejected: {0}")]
    SignatureRejected(String),

    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Another trade is still pending")]
    TradeInFlight,

    /// The transaction confirmed on-chain; only the backend write failed.
    #[error("Transaction {tx_hash} confirmed but the backend did not record it: {message}")]
    RecordFailed { tx_hash: String, message: String },

    #[error("{0}")]
    Unknown(String),
}

impl TradeError {
    /// Hash of a transaction that already landed despite the error
    pub fn confirmed_tx(&self) -> Option<&str> {
        match self {
            TradeError::RecordFailed { tx_hash, .. } => Some(tx_hash),
            _ => None,
        }
    }
}

impl From<PlanError> for TradeError {
    fn from(err: PlanError) -> Self {
        TradeError::Unknown(err.to_string())
    }
}
