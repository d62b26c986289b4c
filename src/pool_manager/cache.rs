//! Pool cache with a strict TTL, guarded by a read/write lock (spec §3
//! "PoolCache entries have a strict TTL", §4.4 state machine, §5).
//!
//! State machine per entry: `Absent -> Present(expires_at) -> Expired (on
//! read) -> Absent (cleaned on write)`. A read past `expires_at` is
//! treated as a miss without mutating the map; the next writer sweeps
//! expired rows out under the exclusive lock.

use super::PoolState;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct CacheEntry {
    state: PoolState,
    expires_at: Instant,
}

/// Canonical, order-independent cache key for an unordered mint pair.
fn sorted_key(a: &Pubkey, b: &Pubkey) -> (Pubkey, Pubkey) {
    if a <= b {
        (*a, *b)
    } else {
        (*b, *a)
    }
}

pub struct PoolCache {
    ttl: Duration,
    entries: RwLock<HashMap<(Pubkey, Pubkey), CacheEntry>>,
}

impl PoolCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached pool for `(base, quote)` if present and
    /// unexpired. Never returns an expired entry (spec §8 item 4).
    pub async fn get(&self, base: &Pubkey, quote: &Pubkey) -> Option<PoolState> {
        let key = sorted_key(base, quote);
        let entries = self.entries.read().await;
        let entry = entries.get(&key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.state.clone())
        } else {
            None
        }
    }

    /// Inserts `state`, keyed by its own `(base_mint, quote_mint)`, and
    /// sweeps any expired rows while the exclusive lock is already held.
    pub async fn insert(&self, state: PoolState) {
        let key = sorted_key(&state.base_mint, &state.quote_mint);
        let expires_at = Instant::now() + self.ttl;
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > Instant::now());
        entries.insert(key, CacheEntry { state, expires_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool_manager::PoolState;

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

    #[tokio::test]
    async fn returns_none_before_any_insert() {
        let cache = PoolCache::new(Duration::from_secs(60));
        let base = Pubkey::new_unique();
        let quote = Pubkey::new_unique();
        assert!(cache.get(&base, &quote).await.is_none());
    }

    #[tokio::test]
    async fn returns_inserted_value_regardless_of_query_order() {
        let cache = PoolCache::new(Duration::from_secs(60));
        let base = Pubkey::new_unique();
        let quote = Pubkey::new_unique();
        cache.insert(sample_state(base, quote)).await;

        assert!(cache.get(&base, &quote).await.is_some());
        assert!(cache.get(&quote, &base).await.is_some());
    }

    #[tokio::test]
    async fn expired_entries_are_not_returned() {
        let cache = PoolCache::new(Duration::from_millis(1));
        let base = Pubkey::new_unique();
        let quote = Pubkey::new_unique();
        cache.insert(sample_state(base, quote)).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.get(&base, &quote).await.is_none());
    }
}
