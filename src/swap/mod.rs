//! The orchestration surface tying Pool Manager, Address Deriver, Codec,
//! and the Transaction Pipeline into `execute_swap` (spec §4.5).
//!
//! Orientation note (spec §9 open question): spec.md observes that some
//! reference code paths compute `calculate_swap_quote` with
//! `is_base_to_quote=false` for both buys and sells, and explicitly says
//! not to guess intent but to "document the chosen orientation explicitly
//! and keep it consistent." This implementation uses `false` (quote input
//! -> base output) for buys, matching scenario S1 exactly, and `true`
//! (base input -> quote output) for sells — the physically-correct
//! direction for "how much quote do I get for this much base" — because
//! literally reusing `false` for sells feeds a base-token amount into the
//! quote-reserve slot of the formula and produces a result scaled against
//! the wrong reserve entirely (see `pool_manager::math`'s scenario test for
//! the worked comparison). See DESIGN.md for the full rationale.

mod accounts;
mod global_config_cache;
mod priority;

pub use accounts::PreparedAccounts;
pub use priority::{build_priority_instructions, parse_priority_fee_micro_lamports};

use crate::codec::SwapInstructionKind;
use crate::consts::{disable_flags, WRAPPED_NATIVE_MINT};
use crate::decimals::DecimalsCache;
use crate::errors::{check_disable_flag, mint_mismatch, EngineError};
use crate::pda;
use crate::pool_manager::{calculate_swap_quote, PoolManager, PoolState};
use crate::rpc::RpcClientFacade;
use crate::tx::TransactionPipeline;
use crate::wallet::Wallet;
use async_trait::async_trait;
use global_config_cache::GlobalConfigCache;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const FIND_POOL_MAX_TRIES: u32 = 5;
const FIND_POOL_INITIAL_DELAY: Duration = Duration::from_secs(2);

/// Trade parameters (spec §3 "SwapParams"). `token_mint` identifies which
/// pool to trade against; it isn't named in spec.md's entity list but is
/// necessary for `execute_swap` to know which pool to find, so it's added
/// here as a practical requirement (see SPEC_FULL.md).
#[derive(Debug, Clone)]
pub struct SwapParams {
    pub token_mint: Pubkey,
    pub is_buy: bool,
    pub amount: u64,
    pub slippage_pct: f64,
    pub priority_fee_sol: String,
    pub compute_unit_limit: u32,
}

/// Derived trade amounts (spec §3 "SwapAmounts").
#[derive(Debug, Clone, Copy)]
pub struct SwapAmounts {
    pub base_amount: u64,
    pub quote_amount: u64,
    pub indicative_price: f64,
}

/// Per-call session context (spec §4.5 step 1: "stores pool_address and
/// lp_mint in the session config"). Deliberately NOT a persistent engine
/// field: the engine serves many concurrent tasks, and a shared mutable
/// "current session" would let one task's context leak into another's.
#[derive(Debug, Clone)]
pub struct SwapSession {
    pub pool_address: Pubkey,
    pub lp_mint: Pubkey,
}

#[derive(Debug, Clone)]
pub struct SwapOutcome {
    pub signature: Signature,
    pub amounts: SwapAmounts,
    pub session: SwapSession,
}

/// Capability set a trading venue exposes to the Dispatcher (spec §9:
/// the launchpad path is "a sibling implementation behind the same
/// trait/interface with methods execute, get_price, get_balance,
/// sell_percent, calculate_pnl"). `calculate_pnl` belongs to the
/// out-of-scope PnL consumer (spec §1), so it isn't part of this trait.
#[async_trait]
pub trait TradeVenue: Send + Sync {
    async fn execute(
        &self,
        params: SwapParams,
        cancel: &CancellationToken,
    ) -> Result<SwapOutcome, EngineError>;

    async fn get_price(&self, mint: &Pubkey, cancel: &CancellationToken) -> Result<f64, EngineError>;

    async fn get_balance(&self, mint: &Pubkey) -> Result<u64, EngineError>;

    async fn sell_percent(
        &self,
        mint: &Pubkey,
        pct: f64,
        slippage_pct: f64,
        priority_fee_sol: String,
        compute_unit_limit: u32,
        cancel: &CancellationToken,
    ) -> Result<SwapOutcome, EngineError>;
}

pub struct SwapEngine {
    pool_manager: Arc<dyn PoolManager>,
    rpc: Arc<RpcClientFacade>,
    wallet: Arc<Wallet>,
    tx_pipeline: TransactionPipeline,
    global_config: GlobalConfigCache,
    wrapped_native_mint: Pubkey,
}

impl SwapEngine {
    pub fn new(
        pool_manager: Arc<dyn PoolManager>,
        _decimals: Arc<DecimalsCache>,
        rpc: Arc<RpcClientFacade>,
        wallet: Arc<Wallet>,
    ) -> Self {
        let tx_pipeline = TransactionPipeline::new(rpc.clone(), wallet.clone());
        let global_config = GlobalConfigCache::new(rpc.clone());
        Self {
            pool_manager,
            rpc,
            wallet,
            tx_pipeline,
            global_config,
            wrapped_native_mint: Pubkey::from_str(WRAPPED_NATIVE_MINT)
                .expect("WRAPPED_NATIVE_MINT is a valid pubkey"),
        }
    }

    async fn find_and_validate_pool(
        &self,
        token_mint: &Pubkey,
        cancel: &CancellationToken,
    ) -> Result<(PoolState, SwapSession), EngineError> {
        let pool = self
            .pool_manager
            .find_pool_with_retry(
                token_mint,
                &self.wrapped_native_mint,
                FIND_POOL_MAX_TRIES,
                FIND_POOL_INITIAL_DELAY,
                cancel,
            )
            .await?;

        let session = SwapSession {
            pool_address: pool.address,
            lp_mint: pool.lp_mint,
        };
        Ok((pool, session))
    }

    fn calculate_swap_amounts(
        &self,
        pool: &PoolState,
        is_buy: bool,
        amount: u64,
        slippage_pct: f64,
    ) -> SwapAmounts {
        if is_buy {
            let quote = calculate_swap_quote(pool, amount, false);
            let max_quote_in = ceil_with_slippage(amount, slippage_pct);
            SwapAmounts {
                base_amount: quote.output,
                quote_amount: max_quote_in,
                indicative_price: quote.price,
            }
        } else {
            let quote = calculate_swap_quote(pool, amount, true);
            let min_quote_out = floor_with_slippage(quote.output, slippage_pct);
            SwapAmounts {
                base_amount: amount,
                quote_amount: min_quote_out,
                indicative_price: quote.price,
            }
        }
    }

    pub async fn execute_swap(
        &self,
        params: SwapParams,
        cancel: &CancellationToken,
    ) -> Result<SwapOutcome, EngineError> {
        validate_params(&params)?;

        let global_config = self.global_config.get().await?;
        let (bit, direction) = if params.is_buy {
            (disable_flags::BUY, "buy")
        } else {
            (disable_flags::SELL, "sell")
        };
        check_disable_flag(global_config.disable_flags, bit, direction)?;

        let (pool, session) = self.find_and_validate_pool(&params.token_mint, cancel).await?;

        let prepared = accounts::prepare_token_accounts(&pool, &self.wallet, &global_config)?;
        let priority_instructions =
            priority::build_priority_instructions(params.compute_unit_limit, &params.priority_fee_sol);
        let amounts = self.calculate_swap_amounts(&pool, params.is_buy, params.amount, params.slippage_pct);

        let (global_config_address, _) = pda::derive_global_config()?;
        let (event_authority, _) = pda::derive_event_authority()?;
        let kind = if params.is_buy {
            SwapInstructionKind::Buy
        } else {
            SwapInstructionKind::Sell
        };

        let swap_ix = accounts::build_swap_instruction(
            &pool,
            global_config_address,
            event_authority,
            &prepared,
            self.wallet.pubkey(),
            kind,
            amounts.base_amount,
            amounts.quote_amount,
        );

        let mut instructions: Vec<Instruction> = Vec::with_capacity(priority_instructions.len() + 3);
        instructions.extend(priority_instructions);
        instructions.push(prepared.create_base_ata_ix.clone());
        instructions.push(prepared.create_quote_ata_ix.clone());
        instructions.push(swap_ix);

        match self
            .tx_pipeline
            .build_and_submit(&instructions, params.slippage_pct, params.amount, cancel)
            .await
        {
            Ok(signature) => {
                info!(
                    mint = %params.token_mint,
                    side = direction,
                    amount = params.amount,
                    slippage_pct = params.slippage_pct,
                    %signature,
                    "swap executed"
                );
                Ok(SwapOutcome {
                    signature,
                    amounts,
                    session,
                })
            }
            Err(e) => {
                let hint = if matches!(e, EngineError::SlippageExceeded { .. }) {
                    " (hint: increase slippage)"
                } else {
                    ""
                };
                warn!(mint = %params.token_mint, side = direction, error = %e, "swap failed{}", hint);
                Err(e)
            }
        }
    }

    pub async fn execute_sell(
        &self,
        amount: u64,
        token_mint: Pubkey,
        slippage_pct: f64,
        priority_fee_sol: String,
        compute_unit_limit: u32,
        cancel: &CancellationToken,
    ) -> Result<SwapOutcome, EngineError> {
        let params = SwapParams {
            token_mint,
            is_buy: false,
            amount,
            slippage_pct,
            priority_fee_sol,
            compute_unit_limit,
        };
        self.execute_swap(params, cancel).await
    }

    pub async fn sell_percent(
        &self,
        token_mint: Pubkey,
        pct: f64,
        slippage_pct: f64,
        priority_fee_sol: String,
        compute_unit_limit: u32,
        cancel: &CancellationToken,
    ) -> Result<SwapOutcome, EngineError> {
        if !(pct > 0.0 && pct <= 100.0) {
            return Err(EngineError::InputError(format!(
                "percent_to_sell out of range: {pct}"
            )));
        }

        let balance = self.get_token_balance(&token_mint).await?;
        let mut amount = floor_percent(balance, pct);
        if balance > 0 && amount == 0 {
            amount = 1;
        }

        self.execute_sell(amount, token_mint, slippage_pct, priority_fee_sol, compute_unit_limit, cancel)
            .await
    }

    pub async fn get_token_price(&self, mint: &Pubkey, cancel: &CancellationToken) -> Result<f64, EngineError> {
        let pool = self
            .pool_manager
            .find_pool(mint, &self.wrapped_native_mint, cancel)
            .await?;

        if pool.base_mint != *mint {
            return Err(mint_mismatch(&pool.base_mint, mint));
        }
        if pool.base_reserves == 0 || pool.quote_reserves == 0 {
            return Ok(0.0);
        }

        let ratio = pool.base_reserves as f64 / pool.quote_reserves as f64;
        let scale = 10f64.powi(pool.base_decimals as i32 - pool.quote_decimals as i32);
        Ok(ratio * scale)
    }

    pub async fn get_token_balance(&self, mint: &Pubkey) -> Result<u64, EngineError> {
        let ata = self.wallet.ata_for(mint);
        match self
            .rpc
            .get_token_account_balance(&ata, CommitmentConfig::processed())
            .await
        {
            Ok(balance) => Ok(balance),
            Err(_) => {
                self.rpc
                    .get_token_account_balance(&ata, CommitmentConfig::confirmed())
                    .await
            }
        }
    }
}

#[async_trait]
impl TradeVenue for SwapEngine {
    async fn execute(&self, params: SwapParams, cancel: &CancellationToken) -> Result<SwapOutcome, EngineError> {
        self.execute_swap(params, cancel).await
    }

    async fn get_price(&self, mint: &Pubkey, cancel: &CancellationToken) -> Result<f64, EngineError> {
        self.get_token_price(mint, cancel).await
    }

    async fn get_balance(&self, mint: &Pubkey) -> Result<u64, EngineError> {
        self.get_token_balance(mint).await
    }

    async fn sell_percent(
        &self,
        mint: &Pubkey,
        pct: f64,
        slippage_pct: f64,
        priority_fee_sol: String,
        compute_unit_limit: u32,
        cancel: &CancellationToken,
    ) -> Result<SwapOutcome, EngineError> {
        SwapEngine::sell_percent(self, *mint, pct, slippage_pct, priority_fee_sol, compute_unit_limit, cancel).await
    }
}

fn validate_params(params: &SwapParams) -> Result<(), EngineError> {
    if params.amount == 0 {
        return Err(EngineError::InputError("amount must be > 0".to_string()));
    }
    if !(params.slippage_pct > 0.0 && params.slippage_pct <= 100.0) {
        return Err(EngineError::InputError(format!(
            "slippage_pct out of range: {}",
            params.slippage_pct
        )));
    }
    if params.token_mint == Pubkey::default() {
        return Err(EngineError::InputError("token_mint must not be empty".to_string()));
    }
    Ok(())
}

/// `ceil(amount * (1 + slippage_pct/100))` (spec §4.5 step 4, §8 item 6).
fn ceil_with_slippage(amount: u64, slippage_pct: f64) -> u64 {
    let factor = Decimal::from_f64_retain(1.0 + slippage_pct / 100.0).unwrap_or(Decimal::ONE);
    (Decimal::from(amount) * factor).ceil().to_u64().unwrap_or(amount)
}

/// `floor(expected * (1 - slippage_pct/100))` (spec §4.5 step 4, §8 item 6).
fn floor_with_slippage(expected: u64, slippage_pct: f64) -> u64 {
    let factor = Decimal::from_f64_retain(1.0 - slippage_pct / 100.0).unwrap_or(Decimal::ONE);
    (Decimal::from(expected) * factor).floor().to_u64().unwrap_or(0)
}

/// `floor(balance * pct/100)` (spec §4.5 "sell_percent").
fn floor_percent(balance: u64, pct: f64) -> u64 {
    let factor = Decimal::from_f64_retain(pct / 100.0).unwrap_or(Decimal::ZERO);
    (Decimal::from(balance) * factor).floor().to_u64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_max_quote_in_matches_spec_scenario() {
        assert_eq!(ceil_with_slippage(1_000_000, 1.0), 1_010_000);
    }

    #[test]
    fn s2_min_quote_out_matches_spec_scenario() {
        assert_eq!(floor_with_slippage(5_125, 1.0), 5_073);
    }

    #[test]
    fn s6_sell_percent_rounds_down() {
        assert_eq!(floor_percent(1_000_000, 37.5), 375_000);
    }

    #[test]
    fn s6_floor_percent_rounds_to_zero_before_the_bump_rule_applies() {
        // `sell_percent` (async, needs an RPC-backed balance lookup) is the
        // one that applies the "bump to one" rule on top of this.
        let amount = floor_percent(3, 10.0);
        assert_eq!(amount, 0);
    }

    #[test]
    fn rejects_zero_amount() {
        let params = SwapParams {
            token_mint: Pubkey::new_unique(),
            is_buy: true,
            amount: 0,
            slippage_pct: 1.0,
            priority_fee_sol: "default".to_string(),
            compute_unit_limit: 0,
        };
        assert!(validate_params(&params).is_err());
    }

    #[test]
    fn s7_price_query_requires_matching_mint() {
        let base = Pubkey::new_unique();
        let wrapped_native = Pubkey::from_str(WRAPPED_NATIVE_MINT).unwrap();
        let err = mint_mismatch(&base, &wrapped_native);
        assert!(matches!(err, EngineError::InputError(_)));
    }
}
