//! Launchpad program layout
//!
//! Addresses, account layout and instruction encoding of the bonding-curve
//! program. The program is an Anchor program: instructions and accounts are
//! prefixed with an 8-byte discriminator.

use serde::{Deserialize, Serialize};
use solana_sdk::{
    hash::hash,
    instruction::{AccountMeta, Instruction},
    program_pack::Pack,
    pubkey,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction, system_program,
};

use crate::domain::TradeSide;
use crate::ports::CurveError;

pub const MAINNET_PROGRAM_ID: Pubkey = pubkey!("J1VXiarstjLXGQHmUxsZtUa5Ek1ZXfk3GNzdaUF11Tv6");
pub const DEVNET_PROGRAM_ID: Pubkey = pubkey!("H5LZJeF5EYqon3a8crePnYrtStZawhGLQZs5xvsZeuxA");

pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

pub const MAINSTATE_PREFIX_SEED: &[u8] = b"main";
pub const POOLSTATE_PREFIX_SEED: &[u8] = b"pool";

const DISCRIMINATOR_LEN: usize = 8;

/// Global program state PDA
pub fn main_state_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[MAINSTATE_PREFIX_SEED], program_id).0
}

/// Per-pair pool state PDA
pub fn pool_state_address(program_id: &Pubkey, mint: &Pubkey, quote_mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[POOLSTATE_PREFIX_SEED, mint.as_ref(), quote_mint.as_ref()],
        program_id,
    )
    .0
}

/// Associated token account of `owner` for `mint` under the classic token program
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), spl_token::id().as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

/// `sha256("global:<name>")[..8]`
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    discriminator(&format!("global:{}", name))
}

/// `sha256("account:<name>")[..8]`
pub fn account_discriminator(name: &str) -> [u8; 8] {
    discriminator(&format!("account:{}", name))
}

fn discriminator(preimage: &str) -> [u8; 8] {
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..DISCRIMINATOR_LEN]);
    out
}

/// On-chain pool state account (after the discriminator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolAccount {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub quote_mint: Pubkey,
    pub real_base_reserves: u64,
    pub virtual_base_reserves: u64,
    pub real_quote_reserves: u64,
    pub virtual_quote_reserves: u64,
    pub complete: bool,
}

impl PoolAccount {
    pub const NAME: &'static str = "PoolState";

    pub fn decode(data: &[u8]) -> Result<Self, CurveError> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(CurveError::InvalidPoolAccount(format!(
                "account too short: {} bytes",
                data.len()
            )));
        }
        let (disc, body) = data.split_at(DISCRIMINATOR_LEN);
        if disc != account_discriminator(Self::NAME) {
            return Err(CurveError::InvalidPoolAccount("discriminator mismatch".to_string()));
        }

        bincode::deserialize(body).map_err(|e| CurveError::InvalidPoolAccount(e.to_string()))
    }

    pub fn encode(&self) -> Result<Vec<u8>, CurveError> {
        let body = bincode::serialize(self).map_err(|e| CurveError::InvalidPoolAccount(e.to_string()))?;
        let mut data = account_discriminator(Self::NAME).to_vec();
        data.extend_from_slice(&body);
        Ok(data)
    }
}

/// Accounts shared by the pool instructions, in program order
fn pool_accounts(program_id: &Pubkey, user: &Pubkey, mint: &Pubkey, quote_mint: &Pubkey) -> Vec<AccountMeta> {
    let main_state = main_state_address(program_id);
    let pool_state = pool_state_address(program_id, mint, quote_mint);

    vec![
        AccountMeta::new(*user, true),
        AccountMeta::new(main_state, false),
        AccountMeta::new(pool_state, false),
        AccountMeta::new_readonly(*mint, false),
        AccountMeta::new_readonly(*quote_mint, false),
        AccountMeta::new(associated_token_address(user, mint), false),
        AccountMeta::new(associated_token_address(user, quote_mint), false),
        AccountMeta::new(associated_token_address(&pool_state, mint), false),
        AccountMeta::new(associated_token_address(&pool_state, quote_mint), false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ]
}

/// Build the program's `create_pool` instruction.
///
/// Moves `base_amount` token base units (and `quote_amount` lamports, usually
/// zero) from the creator into a fresh pool for the pair.
pub fn create_pool_instruction(
    program_id: &Pubkey,
    creator: &Pubkey,
    mint: &Pubkey,
    quote_mint: &Pubkey,
    base_amount: u64,
    quote_amount: u64,
) -> Instruction {
    let mut data = instruction_discriminator("create_pool").to_vec();
    data.extend_from_slice(&base_amount.to_le_bytes());
    data.extend_from_slice(&quote_amount.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: pool_accounts(program_id, creator, mint, quote_mint),
        data,
    }
}

/// Idempotent associated token account creation (`CreateIdempotent`, tag 1)
pub fn create_associated_token_account_idempotent(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(associated_token_address(owner, mint), false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: vec![1],
    }
}

/// Create `mint` and mint `supply` base units into the creator's token account.
///
/// The creator stays mint authority; `mint` must co-sign the transaction.
pub fn mint_token_instructions(
    creator: &Pubkey,
    mint: &Pubkey,
    decimals: u8,
    supply: u64,
) -> Result<Vec<Instruction>, CurveError> {
    let space = spl_token::state::Mint::LEN;
    let lamports = Rent::default().minimum_balance(space);

    let initialize = spl_token::instruction::initialize_mint2(&spl_token::id(), mint, creator, None, decimals)
        .map_err(|e| CurveError::InvalidInstruction(e.to_string()))?;
    let mint_to = spl_token::instruction::mint_to(
        &spl_token::id(),
        mint,
        &associated_token_address(creator, mint),
        creator,
        &[],
        supply,
    )
    .map_err(|e| CurveError::InvalidInstruction(e.to_string()))?;

    Ok(vec![
        system_instruction::create_account(creator, mint, lamports, space as u64, &spl_token::id()),
        initialize,
        create_associated_token_account_idempotent(creator, creator, mint),
        mint_to,
    ])
}

/// Build the program's `buy` or `sell` instruction.
///
/// `amount` is in base units of the spent side: lamports for buys, token
/// base units for sells.
pub fn trade_instruction(
    program_id: &Pubkey,
    side: TradeSide,
    user: &Pubkey,
    mint: &Pubkey,
    quote_mint: &Pubkey,
    amount: u64,
) -> Instruction {
    let name = match side {
        TradeSide::Buy => "buy",
        TradeSide::Sell => "sell",
    };
    let mut data = instruction_discriminator(name).to_vec();
    data.extend_from_slice(&amount.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: pool_accounts(program_id, user, mint, quote_mint),
        data,
    }
}
