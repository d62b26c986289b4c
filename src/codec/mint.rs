use super::require_len;
use crate::errors::CodecError;

const DECIMALS_OFFSET: usize = 44;
const MIN_MINT_LEN: usize = DECIMALS_OFFSET + 1;

/// The subset of an SPL mint account this crate needs: just decimals.
/// Used by the Swap Engine's per-mint decimals cache (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintInfo {
    pub decimals: u8,
}

/// Parses the decimals byte out of a raw SPL mint account, at offset 44
/// (spec §4.5 "parse the SPL mint account (decimals byte at offset 44)").
pub fn parse_mint(data: &[u8]) -> Result<MintInfo, CodecError> {
    require_len(data, MIN_MINT_LEN)?;
    Ok(MintInfo {
        decimals: data[DECIMALS_OFFSET],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_decimals_at_offset_44() {
        let mut data = vec![0u8; 82];
        data[DECIMALS_OFFSET] = 6;
        assert_eq!(parse_mint(&data).unwrap().decimals, 6);
    }

    #[test]
    fn rejects_short_buffers() {
        let short = vec![0u8; 10];
        assert!(matches!(
            parse_mint(&short).unwrap_err(),
            CodecError::ShortData { .. }
        ));
    }
}
