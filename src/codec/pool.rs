use super::{check_discriminator, read_pubkey, read_u16_le, read_u64_le, require_len};
use crate::consts::POOL_DISCRIMINATOR;
use crate::errors::CodecError;
use solana_sdk::pubkey::Pubkey;

/// Decoded `Pool` account (spec §3, §4.1). This is the raw, un-oriented
/// form straight off the wire; [`crate::pool_manager`] wraps it in
/// `PoolState`, which adds reserves and normalizes base/quote orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool {
    pub bump: u8,
    pub index: u16,
    pub creator: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub pool_base_vault: Pubkey,
    pub pool_quote_vault: Pubkey,
    pub lp_supply: u64,
}

const BODY_LEN: usize = 1 + 2 + 32 * 6 + 8;

/// Parses a `Pool` account's raw data (spec §4.1).
pub fn parse_pool(data: &[u8]) -> Result<Pool, CodecError> {
    let mut offset = check_discriminator(data, POOL_DISCRIMINATOR)?;
    require_len(data, offset + BODY_LEN)?;

    let bump = data[offset];
    offset += 1;
    let index = read_u16_le(data, offset);
    offset += 2;
    let creator = read_pubkey(data, offset);
    offset += 32;
    let base_mint = read_pubkey(data, offset);
    offset += 32;
    let quote_mint = read_pubkey(data, offset);
    offset += 32;
    let lp_mint = read_pubkey(data, offset);
    offset += 32;
    let pool_base_vault = read_pubkey(data, offset);
    offset += 32;
    let pool_quote_vault = read_pubkey(data, offset);
    offset += 32;
    let lp_supply = read_u64_le(data, offset);

    Ok(Pool {
        bump,
        index,
        creator,
        base_mint,
        quote_mint,
        lp_mint,
        pool_base_vault,
        pool_quote_vault,
        lp_supply,
    })
}

/// Encodes a `Pool` back into its on-chain byte layout, for round-trip
/// codec tests (spec §8 item 2).
pub fn encode_pool(pool: &Pool) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + BODY_LEN);
    out.extend_from_slice(&POOL_DISCRIMINATOR);
    out.push(pool.bump);
    out.extend_from_slice(&pool.index.to_le_bytes());
    out.extend_from_slice(pool.creator.as_ref());
    out.extend_from_slice(pool.base_mint.as_ref());
    out.extend_from_slice(pool.quote_mint.as_ref());
    out.extend_from_slice(pool.lp_mint.as_ref());
    out.extend_from_slice(pool.pool_base_vault.as_ref());
    out.extend_from_slice(pool.pool_quote_vault.as_ref());
    out.extend_from_slice(&pool.lp_supply.to_le_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pool() -> Pool {
        Pool {
            bump: 254,
            index: 7,
            creator: Pubkey::new_unique(),
            base_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            pool_base_vault: Pubkey::new_unique(),
            pool_quote_vault: Pubkey::new_unique(),
            lp_supply: 123_456_789,
        }
    }

    #[test]
    fn round_trips_through_encode_and_parse() {
        let pool = sample_pool();
        let encoded = encode_pool(&pool);
        let parsed = parse_pool(&encoded).unwrap();
        assert_eq!(parsed, pool);
    }

    #[test]
    fn rejects_wrong_discriminator() {
        let mut encoded = encode_pool(&sample_pool());
        encoded[0] ^= 0xFF;
        assert!(matches!(
            parse_pool(&encoded).unwrap_err(),
            CodecError::BadDiscriminator { .. }
        ));
    }

    #[test]
    fn rejects_truncated_data() {
        let encoded = encode_pool(&sample_pool());
        let truncated = &encoded[..encoded.len() - 10];
        assert!(matches!(
            parse_pool(truncated).unwrap_err(),
            CodecError::ShortData { .. }
        ));
    }
}
