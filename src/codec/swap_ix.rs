use crate::consts::{BUY_DISCRIMINATOR, SELL_DISCRIMINATOR};

/// Which PumpSwap instruction to encode (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapInstructionKind {
    /// `a1 = base_amount_out`, `a2 = max_quote_amount_in`.
    Buy,
    /// `a1 = base_amount_in`, `a2 = min_quote_amount_out`.
    Sell,
}

/// Encodes a PumpSwap swap instruction's data payload: an 8-byte kind
/// discriminator followed by two little-endian `u64` arguments, 24 bytes
/// total (spec §4.1).
pub fn encode_swap_instruction_data(kind: SwapInstructionKind, a1: u64, a2: u64) -> Vec<u8> {
    let discriminator = match kind {
        SwapInstructionKind::Buy => BUY_DISCRIMINATOR,
        SwapInstructionKind::Sell => SELL_DISCRIMINATOR,
    };
    let mut data = Vec::with_capacity(24);
    data.extend_from_slice(&discriminator);
    data.extend_from_slice(&a1.to_le_bytes());
    data.extend_from_slice(&a2.to_le_bytes());
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_24_bytes_with_buy_discriminator() {
        let data = encode_swap_instruction_data(SwapInstructionKind::Buy, 498, 1_010_000);
        assert_eq!(data.len(), 24);
        assert_eq!(&data[0..8], &BUY_DISCRIMINATOR);
        assert_eq!(u64::from_le_bytes(data[8..16].try_into().unwrap()), 498);
        assert_eq!(
            u64::from_le_bytes(data[16..24].try_into().unwrap()),
            1_010_000
        );
    }

    #[test]
    fn encodes_sell_discriminator() {
        let data = encode_swap_instruction_data(SwapInstructionKind::Sell, 136_824, 5_073);
        assert_eq!(&data[0..8], &SELL_DISCRIMINATOR);
    }
}
