//! Bit-exact decode/encode of PumpSwap on-chain account and instruction
//! layouts (spec §4.1).

mod global_config;
mod mint;
mod pool;
mod swap_ix;
mod token_account;

pub use global_config::{encode_global_config, parse_global_config, GlobalConfig};
pub use mint::{parse_mint, MintInfo};
pub use pool::{encode_pool, parse_pool, Pool};
pub use swap_ix::{encode_swap_instruction_data, SwapInstructionKind};
pub use token_account::parse_spl_token_account;

use crate::errors::CodecError;

/// Verifies that `data` begins with `expected`, returning the offset past
/// the discriminator on success.
fn check_discriminator(data: &[u8], expected: [u8; 8]) -> Result<usize, CodecError> {
    if data.len() < 8 {
        return Err(CodecError::ShortData {
            expected: 8,
            actual: data.len(),
        });
    }
    let mut actual = [0u8; 8];
    actual.copy_from_slice(&data[0..8]);
    if actual != expected {
        return Err(CodecError::BadDiscriminator { expected, actual });
    }
    Ok(8)
}

fn require_len(data: &[u8], at_least: usize) -> Result<(), CodecError> {
    if data.len() < at_least {
        return Err(CodecError::ShortData {
            expected: at_least,
            actual: data.len(),
        });
    }
    Ok(())
}

fn read_pubkey(data: &[u8], offset: usize) -> solana_sdk::pubkey::Pubkey {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&data[offset..offset + 32]);
    solana_sdk::pubkey::Pubkey::new_from_array(bytes)
}

fn read_u64_le(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    let mut bytes = [0u8; 2];
    bytes.copy_from_slice(&data[offset..offset + 2]);
    u16::from_le_bytes(bytes)
}
