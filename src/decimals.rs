//! Per-mint decimals cache (spec §4.5 "Decimals"). Kept separate from the
//! Swap Engine and Pool Manager so both can share one instance, and so
//! tests can inject a fake without touching RPC (spec §9's "process-wide
//! decimals cache... must be addressable for testing via dependency
//! injection").

use crate::codec::parse_mint;
use crate::consts::{DEFAULT_TOKEN_DECIMALS, DEFAULT_WRAPPED_NATIVE_DECIMALS, WRAPPED_NATIVE_MINT};
use crate::errors::EngineError;
use crate::rpc::RpcClientFacade;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct DecimalsCache {
    rpc: Arc<RpcClientFacade>,
    entries: RwLock<HashMap<Pubkey, u8>>,
}

impl DecimalsCache {
    pub fn new(rpc: Arc<RpcClientFacade>) -> Self {
        Self {
            rpc,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves `mint`'s decimals, consulting the cache first. Falls back
    /// to the documented defaults (6 for tokens, 9 for wrapped native) if
    /// the mint account can't be found, rather than failing the caller —
    /// the decimals cache is a convenience, not a correctness boundary.
    pub async fn decimals_for(&self, mint: &Pubkey) -> Result<u8, EngineError> {
        if let Some(decimals) = self.entries.read().await.get(mint).copied() {
            return Ok(decimals);
        }

        let decimals = self.fetch_decimals(mint).await?;
        self.entries.write().await.insert(*mint, decimals);
        Ok(decimals)
    }

    async fn fetch_decimals(&self, mint: &Pubkey) -> Result<u8, EngineError> {
        let account = self
            .rpc
            .get_account(mint, CommitmentConfig::confirmed())
            .await?;
        match account {
            Some(account) => match parse_mint(&account.data) {
                Ok(info) => Ok(info.decimals),
                Err(_) => Ok(default_decimals_for(mint)),
            },
            None => Ok(default_decimals_for(mint)),
        }
    }
}

fn default_decimals_for(mint: &Pubkey) -> u8 {
    let wrapped_native =
        Pubkey::from_str(WRAPPED_NATIVE_MINT).expect("WRAPPED_NATIVE_MINT is a valid pubkey");
    if *mint == wrapped_native {
        DEFAULT_WRAPPED_NATIVE_DECIMALS
    } else {
        DEFAULT_TOKEN_DECIMALS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_native_defaults_to_nine_decimals() {
        let wrapped_native = Pubkey::from_str(WRAPPED_NATIVE_MINT).unwrap();
        assert_eq!(default_decimals_for(&wrapped_native), 9);
    }

    #[test]
    fn unknown_mint_defaults_to_six_decimals() {
        let mint = Pubkey::new_unique();
        assert_eq!(default_decimals_for(&mint), 6);
    }
}
