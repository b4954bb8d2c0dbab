//! Jupiter swap-build types

use base64::Engine;
use serde::{Deserialize, Serialize};
use solana_sdk::transaction::VersionedTransaction;

use crate::ports::SwapError;

/// Body of `POST /swap`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub user_public_key: String,
    /// The untouched `/quote` response
    pub quote_response: serde_json::Value,
    /// Native SOL in, native SOL out
    #[serde(default = "default_true")]
    pub wrap_and_unwrap_sol: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prioritization_fee_lamports: Option<u64>,
    #[serde(default = "default_true")]
    pub dynamic_compute_unit_limit: bool,
}

fn default_true() -> bool {
    true
}

impl SwapRequest {
    pub fn new(user_public_key: String, quote_response: serde_json::Value) -> Self {
        Self {
            user_public_key,
            quote_response,
            wrap_and_unwrap_sol: true,
            prioritization_fee_lamports: None,
            dynamic_compute_unit_limit: true,
        }
    }

    pub fn with_priority_fee(mut self, lamports: Option<u64>) -> Self {
        self.prioritization_fee_lamports = lamports;
        self
    }
}

/// Response of `POST /swap`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    /// Base64 bincode-serialized unsigned transaction
    pub swap_transaction: String,
    pub last_valid_block_height: u64,
    #[serde(default)]
    pub prioritization_fee_lamports: u64,
}

impl SwapResponse {
    /// Decode the transaction the user has to sign
    pub fn transaction(&self) -> Result<VersionedTransaction, SwapError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&self.swap_transaction)
            .map_err(|e| SwapError::InvalidTransaction(format!("base64: {}", e)))?;

        bincode::deserialize(&bytes).map_err(|e| SwapError::InvalidTransaction(format!("bincode: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionPlan;
    use solana_sdk::{hash::Hash, pubkey::Pubkey, system_instruction};

    fn encoded_transaction(payer: Pubkey) -> String {
        let mut plan = TransactionPlan::new(payer);
        plan.push(system_instruction::transfer(&payer, &Pubkey::new_unique(), 1_000));
        let tx = plan.compile(Hash::new_unique()).unwrap();
        base64::engine::general_purpose::STANDARD.encode(bincode::serialize(&tx).unwrap())
    }

    #[test]
    fn test_swap_request_serialization() {
        let req = SwapRequest::new("wallet123".to_string(), serde_json::json!({"inAmount": "1"}))
            .with_priority_fee(Some(5_000));

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["userPublicKey"], "wallet123");
        assert_eq!(json["wrapAndUnwrapSol"], true);
        assert_eq!(json["prioritizationFeeLamports"], 5_000);
        assert_eq!(json["quoteResponse"]["inAmount"], "1");
    }

    #[test]
    fn test_priority_fee_omitted_when_unset() {
        let req = SwapRequest::new("wallet123".to_string(), serde_json::json!({}));
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("prioritizationFeeLamports").is_none());
    }

    #[test]
    fn test_transaction_decoding() {
        let payer = Pubkey::new_unique();
        let response = SwapResponse {
            swap_transaction: encoded_transaction(payer),
            last_valid_block_height: 1_000,
            prioritization_fee_lamports: 0,
        };

        let tx = response.transaction().unwrap();
        assert_eq!(tx.message.static_account_keys()[0], payer);
        assert_eq!(tx.signatures.len(), 1);
    }

    #[test]
    fn test_garbage_transaction_rejected() {
        let response = SwapResponse {
            swap_transaction: "not base64!".to_string(),
            last_valid_block_height: 0,
            prioritization_fee_lamports: 0,
        };
        assert!(matches!(response.transaction(), Err(SwapError::InvalidTransaction(_))));

        let response = SwapResponse {
            swap_transaction: base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]),
            last_valid_block_height: 0,
            prioritization_fee_lamports: 0,
        };
        assert!(matches!(response.transaction(), Err(SwapError::InvalidTransaction(_))));
    }
}
