//! Recording mocks for every port.
//!
//! Each mock appends to a shared [`CallLog`] so tests can assert on the exact
//! sequence of collaborator calls a trade produced.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::VersionedTransaction,
};

use super::backend::{BackendApi, BackendError, Following, ThreadReply, TokenInfo, TokenQuery, TradeHistoryEntry};
use super::chain::{ChainClient, ChainError};
use super::curve::{CurveError, CurveProgramClient};
use super::swap::{SwapClient, SwapError};
use super::wallet::{WalletError, WalletSigner};
use crate::domain::{partial_sign, TokenAmount, TokenDescriptor, TokenMetadata, TradeRecord};

/// A collaborator call observed by a mock
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Sign,
    LatestBlockhash,
    FinalizedBlockhash,
    Submit,
    AccountData(Pubkey),
    IsPoolCreated(Pubkey),
    IsPoolComplete(Pubkey),
    IsInitialized,
    MintInstructions { mint: Pubkey, supply: u64 },
    CreatePoolInstruction { mint: Pubkey, base_amount: u64, quote_amount: u64 },
    BuyInstruction { mint: Pubkey, amount: u64 },
    SellInstruction { mint: Pubkey, amount: u64 },
    Swap {
        input: TokenAmount,
        output: TokenDescriptor,
        market_id: Pubkey,
        is_buy: bool,
    },
    RecordTrade(TradeRecord),
    GetToken(Pubkey),
    GetTradeHistory(Pubkey),
    GetMarketId(Pubkey),
    GetThread(Pubkey),
    PostReply(Pubkey, String),
    LikeReply(u64, bool),
    UpdateToken(TokenMetadata),
    FindTokens(TokenQuery),
    GetKing,
    GetFollowings(String),
    SetFollow(String, bool),
}

/// Shared, ordered log of calls across all mocks
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().unwrap().is_empty()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    pub fn records(&self) -> Vec<TradeRecord> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Call::RecordTrade(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

/// Wallet backed by a throwaway keypair
pub struct MockWallet {
    keypair: Keypair,
    connected: bool,
    reject: bool,
    log: CallLog,
}

impl MockWallet {
    pub fn new(log: CallLog) -> Self {
        Self {
            keypair: Keypair::new(),
            connected: true,
            reject: false,
            log,
        }
    }

    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    /// The user declines every signature request
    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

#[async_trait]
impl WalletSigner for MockWallet {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn public_key(&self) -> Option<Pubkey> {
        self.connected.then(|| self.keypair.pubkey())
    }

    async fn sign_transaction(
        &self,
        mut transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, WalletError> {
        self.log.push(Call::Sign);
        if !self.connected {
            return Err(WalletError::NotConnected);
        }
        if self.reject {
            return Err(WalletError::Rejected("User rejected the request.".to_string()));
        }
        partial_sign(&mut transaction, &self.keypair).map_err(|e| WalletError::SigningError(e.to_string()))?;
        Ok(transaction)
    }
}

/// Chain that confirms everything unless told otherwise
#[derive(Default)]
pub struct MockChain {
    log: CallLog,
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    submit_error: Option<String>,
    submitted: Mutex<Vec<VersionedTransaction>>,
}

impl MockChain {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn with_account(self, address: Pubkey, data: Vec<u8>) -> Self {
        self.accounts.lock().unwrap().insert(address, data);
        self
    }

    pub fn failing_submit(mut self, message: &str) -> Self {
        self.submit_error = Some(message.to_string());
        self
    }

    pub fn submitted(&self) -> Vec<VersionedTransaction> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn latest_blockhash(&self) -> Result<Hash, ChainError> {
        self.log.push(Call::LatestBlockhash);
        Ok(Hash::new_unique())
    }

    async fn finalized_blockhash(&self) -> Result<Hash, ChainError> {
        self.log.push(Call::FinalizedBlockhash);
        Ok(Hash::new_unique())
    }

    async fn submit(&self, transaction: &VersionedTransaction) -> Result<String, ChainError> {
        self.log.push(Call::Submit);
        if let Some(ref message) = self.submit_error {
            return Err(ChainError::TransactionError(message.clone()));
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(transaction.clone());
        Ok(transaction.signatures[0].to_string())
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError> {
        self.log.push(Call::AccountData(*address));
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }
}

/// Curve program with fixed pool flags
pub struct MockCurve {
    log: CallLog,
    program_id: Pubkey,
    initialized: bool,
    created: bool,
    complete: bool,
}

impl MockCurve {
    /// Pool exists and the curve is still active
    pub fn active(log: CallLog) -> Self {
        Self {
            log,
            program_id: Pubkey::new_unique(),
            initialized: true,
            created: true,
            complete: false,
        }
    }

    /// Curve finished, liquidity migrated
    pub fn complete(log: CallLog) -> Self {
        Self {
            complete: true,
            ..Self::active(log)
        }
    }

    pub fn missing(log: CallLog) -> Self {
        Self {
            created: false,
            ..Self::active(log)
        }
    }

    /// Program deployed but its global state never set up
    pub fn uninitialized(log: CallLog) -> Self {
        Self {
            initialized: false,
            created: false,
            ..Self::active(log)
        }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    fn instruction(&self, user: &Pubkey, tag: u8, amount: u64) -> Instruction {
        let mut data = vec![tag];
        data.extend_from_slice(&amount.to_le_bytes());
        Instruction::new_with_bytes(self.program_id, &data, vec![AccountMeta::new(*user, true)])
    }
}

#[async_trait]
impl CurveProgramClient for MockCurve {
    async fn is_pool_created(&self, mint: &Pubkey, _quote_mint: &Pubkey) -> Result<bool, CurveError> {
        self.log.push(Call::IsPoolCreated(*mint));
        Ok(self.created)
    }

    async fn is_pool_complete(&self, mint: &Pubkey, _quote_mint: &Pubkey) -> Result<bool, CurveError> {
        self.log.push(Call::IsPoolComplete(*mint));
        Ok(self.complete)
    }

    async fn is_initialized(&self) -> Result<bool, CurveError> {
        self.log.push(Call::IsInitialized);
        Ok(self.initialized)
    }

    async fn mint_instructions(&self, creator: &Pubkey, mint: &Pubkey, supply: u64) -> Result<Vec<Instruction>, CurveError> {
        self.log.push(Call::MintInstructions { mint: *mint, supply });
        Ok(vec![Instruction::new_with_bytes(
            self.program_id,
            &[9],
            vec![AccountMeta::new(*creator, true), AccountMeta::new(*mint, true)],
        )])
    }

    async fn create_pool_instruction(
        &self,
        creator: &Pubkey,
        mint: &Pubkey,
        _quote_mint: &Pubkey,
        base_amount: u64,
        quote_amount: u64,
    ) -> Result<Instruction, CurveError> {
        self.log.push(Call::CreatePoolInstruction {
            mint: *mint,
            base_amount,
            quote_amount,
        });
        Ok(self.instruction(creator, 2, base_amount))
    }

    async fn buy_instruction(
        &self,
        user: &Pubkey,
        mint: &Pubkey,
        _quote_mint: &Pubkey,
        quote_amount: u64,
    ) -> Result<Instruction, CurveError> {
        self.log.push(Call::BuyInstruction {
            mint: *mint,
            amount: quote_amount,
        });
        Ok(self.instruction(user, 0, quote_amount))
    }

    async fn sell_instruction(
        &self,
        user: &Pubkey,
        mint: &Pubkey,
        _quote_mint: &Pubkey,
        token_amount: u64,
    ) -> Result<Instruction, CurveError> {
        self.log.push(Call::SellInstruction {
            mint: *mint,
            amount: token_amount,
        });
        Ok(self.instruction(user, 1, token_amount))
    }
}

/// Swap service returning fixed hashes
pub struct MockSwap {
    log: CallLog,
    hashes: Vec<String>,
}

impl MockSwap {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            hashes: vec!["swap-tx-1".to_string(), "swap-tx-2".to_string()],
        }
    }

    pub fn with_hashes(mut self, hashes: Vec<String>) -> Self {
        self.hashes = hashes;
        self
    }
}

#[async_trait]
impl SwapClient for MockSwap {
    async fn swap(
        &self,
        _wallet: &dyn WalletSigner,
        input: TokenAmount,
        output: TokenDescriptor,
        market_id: &Pubkey,
        is_buy: bool,
    ) -> Result<Vec<String>, SwapError> {
        self.log.push(Call::Swap {
            input,
            output,
            market_id: *market_id,
            is_buy,
        });
        Ok(self.hashes.clone())
    }
}

/// Backend with canned display data
pub struct MockBackend {
    log: CallLog,
    market_id: Pubkey,
    token: TokenInfo,
    board: Vec<TokenInfo>,
    king: Option<TokenInfo>,
    record_error: Option<String>,
    update_error: Option<String>,
}

impl MockBackend {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            market_id: Pubkey::new_unique(),
            token: TokenInfo::default(),
            board: Vec::new(),
            king: None,
            record_error: None,
            update_error: None,
        }
    }

    pub fn with_board(mut self, tokens: Vec<TokenInfo>, king: Option<TokenInfo>) -> Self {
        self.board = tokens;
        self.king = king;
        self
    }

    pub fn failing_update(mut self, message: &str) -> Self {
        self.update_error = Some(message.to_string());
        self
    }

    pub fn with_token(mut self, token: TokenInfo) -> Self {
        self.token = token;
        self
    }

    pub fn failing_record(mut self, message: &str) -> Self {
        self.record_error = Some(message.to_string());
        self
    }

    pub fn market_id(&self) -> Pubkey {
        self.market_id
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn record_trade(&self, record: &TradeRecord) -> Result<(), BackendError> {
        self.log.push(Call::RecordTrade(record.clone()));
        match self.record_error {
            Some(ref message) => Err(BackendError::ApiError(message.clone())),
            None => Ok(()),
        }
    }

    async fn get_token(&self, mint: &Pubkey, _user_id: Option<&str>) -> Result<TokenInfo, BackendError> {
        self.log.push(Call::GetToken(*mint));
        Ok(self.token.clone())
    }

    async fn get_trade_history(&self, mint: &Pubkey) -> Result<Vec<TradeHistoryEntry>, BackendError> {
        self.log.push(Call::GetTradeHistory(*mint));
        Ok(Vec::new())
    }

    async fn get_market_id(&self, mint: &Pubkey, _quote_mint: &Pubkey) -> Result<Pubkey, BackendError> {
        self.log.push(Call::GetMarketId(*mint));
        Ok(self.market_id)
    }

    async fn get_thread(&self, mint: &Pubkey, _user_id: Option<&str>) -> Result<Vec<ThreadReply>, BackendError> {
        self.log.push(Call::GetThread(*mint));
        Ok(Vec::new())
    }

    async fn post_reply(&self, mint: &Pubkey, comment: &str) -> Result<(), BackendError> {
        self.log.push(Call::PostReply(*mint, comment.to_string()));
        Ok(())
    }

    async fn like_reply(&self, reply_id: u64, liked: bool) -> Result<(), BackendError> {
        self.log.push(Call::LikeReply(reply_id, liked));
        Ok(())
    }

    async fn update_token(&self, metadata: &TokenMetadata) -> Result<(), BackendError> {
        self.log.push(Call::UpdateToken(metadata.clone()));
        match self.update_error {
            Some(ref message) => Err(BackendError::ApiError(message.clone())),
            None => Ok(()),
        }
    }

    async fn find_tokens(&self, query: &TokenQuery) -> Result<Vec<TokenInfo>, BackendError> {
        self.log.push(Call::FindTokens(query.clone()));
        Ok(self.board.clone())
    }

    async fn get_king(&self) -> Result<Option<TokenInfo>, BackendError> {
        self.log.push(Call::GetKing);
        Ok(self.king.clone())
    }

    async fn get_followings(&self, user_id: &str) -> Result<Vec<Following>, BackendError> {
        self.log.push(Call::GetFollowings(user_id.to_string()));
        Ok(Vec::new())
    }

    async fn set_follow(&self, target_id: &str, follow: bool) -> Result<(), BackendError> {
        self.log.push(Call::SetFollow(target_id.to_string(), follow));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_curve_records_calls() {
        let log = CallLog::new();
        let curve = MockCurve::complete(log.clone());
        let mint = Pubkey::new_unique();

        assert!(curve.is_pool_complete(&mint, &Pubkey::new_unique()).await.unwrap());
        assert_eq!(log.calls(), vec![Call::IsPoolComplete(mint)]);
    }

    #[tokio::test]
    async fn test_mock_wallet_rejects() {
        let log = CallLog::new();
        let wallet = MockWallet::new(log.clone()).rejecting();
        let tx = VersionedTransaction::default();

        let result = wallet.sign_transaction(tx).await;
        assert!(matches!(result, Err(WalletError::Rejected(_))));
        assert_eq!(log.calls(), vec![Call::Sign]);
    }

    #[test]
    fn test_disconnected_wallet_has_no_key() {
        let wallet = MockWallet::new(CallLog::new()).disconnected();
        assert!(!wallet.is_connected());
        assert!(wallet.public_key().is_none());
    }
}
