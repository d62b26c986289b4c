use super::{read_u64_le, require_len};
use crate::errors::CodecError;

const BALANCE_OFFSET: usize = 64;
const MIN_TOKEN_ACCOUNT_LEN: usize = 72;

/// Reads the `amount` field out of a raw SPL token account (spec §4.1):
/// a plain `u64` little-endian at byte offset 64, no discriminator.
pub fn parse_spl_token_account(data: &[u8]) -> Result<u64, CodecError> {
    require_len(data, MIN_TOKEN_ACCOUNT_LEN)?;
    Ok(read_u64_le(data, BALANCE_OFFSET))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_account_bytes(amount: u64) -> Vec<u8> {
        let mut data = vec![0u8; MIN_TOKEN_ACCOUNT_LEN];
        data[BALANCE_OFFSET..BALANCE_OFFSET + 8].copy_from_slice(&amount.to_le_bytes());
        data
    }

    #[test]
    fn reads_balance_at_offset_64() {
        assert_eq!(parse_spl_token_account(&token_account_bytes(42)).unwrap(), 42);
    }

    #[test]
    fn rejects_short_buffers() {
        let short = vec![0u8; 71];
        assert!(matches!(
            parse_spl_token_account(&short).unwrap_err(),
            CodecError::ShortData { .. }
        ));
    }
}
