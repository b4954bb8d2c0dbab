use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::{v0, VersionedMessage},
    pubkey::Pubkey,
    signature::Signature,
    signer::Signer,
    transaction::VersionedTransaction,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Transaction plan has no instructions")]
    Empty,
    #[error("Failed to compile message: {0}")]
    Compile(String),
    #[error("{0} is not a required signer of this transaction")]
    NotASigner(Pubkey),
    #[error("Signing failed: {0}")]
    Sign(String),
}

/// Ordered instructions plus the fee payer of one in-flight trade.
///
/// Consumed by [`TransactionPlan::compile`]; nothing outlives a single submission.
#[derive(Debug, Clone)]
pub struct TransactionPlan {
    payer: Pubkey,
    instructions: Vec<Instruction>,
}

impl TransactionPlan {
    pub fn new(payer: Pubkey) -> Self {
        Self {
            payer,
            instructions: Vec::new(),
        }
    }

    pub fn push(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    pub fn payer(&self) -> &Pubkey {
        &self.payer
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Compile into an unsigned v0 transaction anchored at `recent_blockhash`.
    ///
    /// Signature slots are zero-filled; the wallet replaces them when signing.
    pub fn compile(self, recent_blockhash: Hash) -> Result<VersionedTransaction, PlanError> {
        if self.instructions.is_empty() {
            return Err(PlanError::Empty);
        }

        let message = v0::Message::try_compile(&self.payer, &self.instructions, &[], recent_blockhash)
            .map_err(|e| PlanError::Compile(e.to_string()))?;
        let required = message.header.num_required_signatures as usize;

        Ok(VersionedTransaction {
            signatures: vec![Signature::default(); required],
            message: VersionedMessage::V0(message),
        })
    }
}

/// Fill the signature slot of `signer`, leaving every other slot as it is.
///
/// Lets several parties sign one transaction in turn (a fresh mint keypair,
/// then the wallet).
pub fn partial_sign(transaction: &mut VersionedTransaction, signer: &dyn Signer) -> Result<(), PlanError> {
    let key = signer.try_pubkey().map_err(|e| PlanError::Sign(e.to_string()))?;
    let required = transaction.message.header().num_required_signatures as usize;
    let position = transaction
        .message
        .static_account_keys()
        .iter()
        .take(required)
        .position(|k| *k == key)
        .ok_or(PlanError::NotASigner(key))?;

    if transaction.signatures.len() < required {
        transaction.signatures.resize(required, Signature::default());
    }
    let signature = signer
        .try_sign_message(&transaction.message.serialize())
        .map_err(|e| PlanError::Sign(e.to_string()))?;
    transaction.signatures[position] = signature;
    Ok(())
}
