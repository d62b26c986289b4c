//! Finds, caches, and prices PumpSwap pools (spec §4.4).

mod cache;
mod math;

pub use cache::PoolCache;
pub use math::{calculate_slippage, calculate_swap_quote, SwapQuote};

use crate::codec::{parse_global_config, parse_pool, Pool};
use crate::consts::{MIN_LP_SUPPLY, POOL_DISCRIMINATOR};
use crate::decimals::DecimalsCache;
use crate::errors::EngineError;
use crate::pda;
use crate::rpc::{MemcmpFilter, RpcClientFacade};
use async_trait::async_trait;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Byte offset of `base_mint` within a `Pool` account's raw data:
/// 8 (discriminator) + 1 (bump) + 2 (index) = 11.
const POOL_BASE_MINT_OFFSET: usize = 8 + 1 + 2;

/// Immutable snapshot of a pool's state at fetch time (spec §3). Cache
/// entries are shared by reference and never mutated in place.
#[derive(Debug, Clone)]
pub struct PoolState {
    pub address: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub pool_base_vault: Pubkey,
    pub pool_quote_vault: Pubkey,
    pub base_reserves: u64,
    pub quote_reserves: u64,
    pub lp_supply: u64,
    pub lp_fee_bps: u64,
    pub protocol_fee_bps: u64,
    pub creator: Pubkey,
    pub pool_index: u16,
    pub bump: u8,
    pub base_decimals: u8,
    pub quote_decimals: u8,
}

impl PoolState {
    /// Swaps base/quote (mints, vaults, reserves, decimals) in place so
    /// `base_mint == wanted_base`, matching the orientation a caller
    /// asked `find_pool` for (spec §4.4 step 1: "reorient if cached in
    /// reverse order by swapping base/quote fields symmetrically").
    fn reoriented_for(mut self, wanted_base: &Pubkey) -> PoolState {
        if self.base_mint == *wanted_base {
            return self;
        }
        std::mem::swap(&mut self.base_mint, &mut self.quote_mint);
        std::mem::swap(&mut self.pool_base_vault, &mut self.pool_quote_vault);
        std::mem::swap(&mut self.base_reserves, &mut self.quote_reserves);
        std::mem::swap(&mut self.base_decimals, &mut self.quote_decimals);
        self
    }
}

/// Explicit trait boundary (spec §9 "duck-typed pool manager interface")
/// so `SwapEngine` is testable against a fake implementation.
#[async_trait]
pub trait PoolManager: Send + Sync {
    async fn find_pool(
        &self,
        base: &Pubkey,
        quote: &Pubkey,
        cancel: &CancellationToken,
    ) -> Result<PoolState, EngineError>;

    async fn find_pool_by_program_accounts(
        &self,
        base: &Pubkey,
        quote: &Pubkey,
        cancel: &CancellationToken,
    ) -> Result<Option<PoolState>, EngineError>;

    async fn fetch_pool_info(&self, address: &Pubkey) -> Result<PoolState, EngineError>;

    async fn find_pool_with_retry(
        &self,
        base: &Pubkey,
        quote: &Pubkey,
        max_tries: u32,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> Result<PoolState, EngineError>;

    fn calculate_swap_quote(&self, pool: &PoolState, input: u64, is_base_to_quote: bool) -> SwapQuote {
        math::calculate_swap_quote(pool, input, is_base_to_quote)
    }

    fn calculate_slippage(&self, pool: &PoolState, input: u64, is_base_to_quote: bool) -> f64 {
        math::calculate_slippage(pool, input, is_base_to_quote)
    }
}

/// Production `PoolManager`, wired to the RPC facade and the decimals
/// cache, backed by a TTL'd `PoolCache`.
pub struct PoolManagerImpl {
    rpc: Arc<RpcClientFacade>,
    decimals: Arc<DecimalsCache>,
    cache: PoolCache,
    program_id: Pubkey,
}

impl PoolManagerImpl {
    pub fn new(rpc: Arc<RpcClientFacade>, decimals: Arc<DecimalsCache>, cache_ttl: Duration) -> Self {
        Self {
            rpc,
            decimals,
            cache: PoolCache::new(cache_ttl),
            program_id: Pubkey::from_str(crate::consts::PUMPSWAP_PROGRAM_ID)
                .expect("PUMPSWAP_PROGRAM_ID is a valid pubkey"),
        }
    }

    fn pool_from_decoded(address: Pubkey, decoded: Pool) -> PoolState {
        PoolState {
            address,
            base_mint: decoded.base_mint,
            quote_mint: decoded.quote_mint,
            lp_mint: decoded.lp_mint,
            pool_base_vault: decoded.pool_base_vault,
            pool_quote_vault: decoded.pool_quote_vault,
            base_reserves: 0,
            quote_reserves: 0,
            lp_supply: decoded.lp_supply,
            lp_fee_bps: 0,
            protocol_fee_bps: 0,
            creator: decoded.creator,
            pool_index: decoded.index,
            bump: decoded.bump,
            base_decimals: crate::consts::DEFAULT_TOKEN_DECIMALS,
            quote_decimals: crate::consts::DEFAULT_WRAPPED_NATIVE_DECIMALS,
        }
    }
}

#[async_trait]
impl PoolManager for PoolManagerImpl {
    async fn find_pool(
        &self,
        base: &Pubkey,
        quote: &Pubkey,
        cancel: &CancellationToken,
    ) -> Result<PoolState, EngineError> {
        if let Some(cached) = self.cache.get(base, quote).await {
            return Ok(cached.reoriented_for(base));
        }

        let found = match self.find_pool_by_program_accounts(base, quote, cancel).await? {
            Some(state) => state,
            None => self
                .find_pool_by_program_accounts(quote, base, cancel)
                .await?
                .ok_or_else(|| {
                    EngineError::NotFound(format!("no pool for mint pair ({base}, {quote})"))
                })?,
        };

        self.cache.insert(found.clone()).await;
        Ok(found.reoriented_for(base))
    }

    async fn find_pool_by_program_accounts(
        &self,
        base: &Pubkey,
        quote: &Pubkey,
        cancel: &CancellationToken,
    ) -> Result<Option<PoolState>, EngineError> {
        let filters = vec![
            MemcmpFilter {
                offset: 0,
                bytes: POOL_DISCRIMINATOR.to_vec(),
            },
            MemcmpFilter {
                offset: POOL_BASE_MINT_OFFSET,
                bytes: base.to_bytes().to_vec(),
            },
        ];

        let accounts = self
            .rpc
            .get_program_accounts(&self.program_id, filters, CommitmentConfig::confirmed(), cancel)
            .await?;

        for (address, account) in accounts {
            let decoded = match parse_pool(&account.data) {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!(%address, error = %e, "skipping account with unparsable pool layout");
                    continue;
                }
            };

            let matches_pair = (decoded.base_mint == *base && decoded.quote_mint == *quote)
                || (decoded.base_mint == *quote && decoded.quote_mint == *base);
            if !matches_pair {
                continue;
            }

            match self.fetch_pool_info(&address).await {
                Ok(state) => {
                    if state.base_reserves == 0 || state.quote_reserves == 0 {
                        debug!(%address, "skipping pool with empty reserves");
                        continue;
                    }
                    return Ok(Some(state));
                }
                Err(e) => {
                    warn!(%address, error = %e, "skipping pool that failed to hydrate");
                    continue;
                }
            }
        }

        Ok(None)
    }

    async fn fetch_pool_info(&self, address: &Pubkey) -> Result<PoolState, EngineError> {
        let (global_config_address, _) = pda::derive_global_config()?;

        let head = self
            .rpc
            .get_multiple_accounts(&[*address, global_config_address])
            .await?;
        let pool_account = head[0]
            .as_ref()
            .ok_or_else(|| EngineError::NotFound(format!("pool account {address} not found")))?;
        let global_config_account = head[1].as_ref().ok_or_else(|| {
            EngineError::NotFound("global config account not found".to_string())
        })?;

        let decoded_pool = parse_pool(&pool_account.data)?;
        let global_config = parse_global_config(&global_config_account.data)?;

        if decoded_pool.lp_supply < MIN_LP_SUPPLY {
            return Err(EngineError::NotFound(format!(
                "pool {address} has insufficient LP supply ({} < {MIN_LP_SUPPLY})",
                decoded_pool.lp_supply
            )));
        }

        let vaults = self
            .rpc
            .get_multiple_accounts(&[decoded_pool.pool_base_vault, decoded_pool.pool_quote_vault])
            .await?;
        let base_vault = vaults[0].as_ref().ok_or_else(|| {
            EngineError::NotFound(format!("base vault {} not found", decoded_pool.pool_base_vault))
        })?;
        let quote_vault = vaults[1].as_ref().ok_or_else(|| {
            EngineError::NotFound(format!(
                "quote vault {} not found",
                decoded_pool.pool_quote_vault
            ))
        })?;

        let base_reserves = crate::codec::parse_spl_token_account(&base_vault.data)?;
        let quote_reserves = crate::codec::parse_spl_token_account(&quote_vault.data)?;

        let base_decimals = self.decimals.decimals_for(&decoded_pool.base_mint).await?;
        let quote_decimals = self.decimals.decimals_for(&decoded_pool.quote_mint).await?;

        let mut state = Self::pool_from_decoded(*address, decoded_pool);
        state.base_reserves = base_reserves;
        state.quote_reserves = quote_reserves;
        state.lp_fee_bps = global_config.lp_fee_bps;
        state.protocol_fee_bps = global_config.protocol_fee_bps;
        state.base_decimals = base_decimals;
        state.quote_decimals = quote_decimals;
        Ok(state)
    }

    async fn find_pool_with_retry(
        &self,
        base: &Pubkey,
        quote: &Pubkey,
        max_tries: u32,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> Result<PoolState, EngineError> {
        let max_delay = delay.saturating_mul(10);
        let attempt_timeout = delay.saturating_mul(2);
        let mut backoff = delay;
        let mut last_err =
            EngineError::NotFound(format!("no pool for mint pair ({base}, {quote})"));

        for attempt in 0..max_tries {
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            let attempt_result = tokio::select! {
                _ = cancel.cancelled() => Err(EngineError::Cancelled),
                result = tokio::time::timeout(attempt_timeout, self.find_pool(base, quote, cancel)) => {
                    match result {
                        Ok(inner) => inner,
                        Err(_) => Err(EngineError::Transient(
                            "find_pool attempt exceeded its deadline".to_string(),
                        )),
                    }
                }
            };

            match attempt_result {
                Ok(state) => return Ok(state),
                Err(EngineError::Cancelled) => return Err(EngineError::Cancelled),
                Err(e) => last_err = e,
            }

            if attempt + 1 < max_tries {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(EngineError::Cancelled),
                    _ = tokio::time::sleep(backoff) => {}
                }
                backoff = std::cmp::min(backoff.saturating_mul(2), max_delay);
            }
        }

        Err(last_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state(base: Pubkey, quote: Pubkey) -> PoolState {
        PoolState {
            address: Pubkey::new_unique(),
            base_mint: base,
            quote_mint: quote,
            lp_mint: Pubkey::new_unique(),
            pool_base_vault: Pubkey::new_unique(),
            pool_quote_vault: Pubkey::new_unique(),
            base_reserves: 1_000,
            quote_reserves: 2_000,
            lp_supply: 10_000,
            lp_fee_bps: 25,
            protocol_fee_bps: 0,
            creator: Pubkey::new_unique(),
            pool_index: 0,
            bump: 255,
            base_decimals: 6,
            quote_decimals: 9,
        }
    }

    #[test]
    fn reorientation_swaps_fields_when_base_does_not_match() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let state = sample_state(a, b);
        let reoriented = state.clone().reoriented_for(&b);
        assert_eq!(reoriented.base_mint, b);
        assert_eq!(reoriented.quote_mint, a);
        assert_eq!(reoriented.base_reserves, state.quote_reserves);
        assert_eq!(reoriented.quote_reserves, state.base_reserves);
    }

    #[test]
    fn reorientation_is_a_no_op_when_already_matching() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let state = sample_state(a, b);
        let reoriented = state.clone().reoriented_for(&a);
        assert_eq!(reoriented.base_mint, state.base_mint);
        assert_eq!(reoriented.base_reserves, state.base_reserves);
    }
}
