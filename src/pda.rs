//! Deterministic PDA derivations against the PumpSwap program (spec §4.2).

use crate::consts::PUMPSWAP_PROGRAM_ID;
use crate::errors::DeriveError;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::OnceLock;

fn program_id() -> Pubkey {
    static PROGRAM_ID: OnceLock<Pubkey> = OnceLock::new();
    *PROGRAM_ID.get_or_init(|| {
        Pubkey::from_str(PUMPSWAP_PROGRAM_ID).expect("PUMPSWAP_PROGRAM_ID is a valid pubkey")
    })
}

fn find_address(seeds: &[&[u8]], seed_names: &[&str]) -> Result<(Pubkey, u8), DeriveError> {
    Pubkey::try_find_program_address(seeds, &program_id()).ok_or_else(|| {
        DeriveError::NoAddressFound {
            seeds: seed_names.iter().map(|s| s.to_string()).collect(),
        }
    })
}

/// Derives the `GlobalConfig` PDA: seeds `["global_config"]`.
pub fn derive_global_config() -> Result<(Pubkey, u8), DeriveError> {
    find_address(&[b"global_config"], &["global_config"])
}

/// Derives a pool PDA: seeds
/// `["pool", index_u16_le, creator, base_mint, quote_mint]`.
pub fn derive_pool(
    index: u16,
    creator: &Pubkey,
    base_mint: &Pubkey,
    quote_mint: &Pubkey,
) -> Result<(Pubkey, u8), DeriveError> {
    let index_le = index.to_le_bytes();
    find_address(
        &[
            b"pool",
            &index_le,
            creator.as_ref(),
            base_mint.as_ref(),
            quote_mint.as_ref(),
        ],
        &["pool", "index", "creator", "base_mint", "quote_mint"],
    )
}

/// Derives the event authority PDA: seeds `["__event_authority"]`.
pub fn derive_event_authority() -> Result<(Pubkey, u8), DeriveError> {
    find_address(&[b"__event_authority"], &["__event_authority"])
}

/// Derives a coin creator's vault authority PDA: seeds
/// `["creator_vault", coin_creator]`.
pub fn derive_creator_vault_authority(coin_creator: &Pubkey) -> Result<(Pubkey, u8), DeriveError> {
    find_address(
        &[b"creator_vault", coin_creator.as_ref()],
        &["creator_vault", "coin_creator"],
    )
}

/// Derives the associated token address for `(owner, mint)` using the
/// standard associated-token-program derivation.
pub fn derive_associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(owner, mint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_config_is_deterministic() {
        let (a, bump_a) = derive_global_config().unwrap();
        let (b, bump_b) = derive_global_config().unwrap();
        assert_eq!(a, b);
        assert_eq!(bump_a, bump_b);
    }

    #[test]
    fn pool_derivation_depends_on_all_inputs() {
        let creator = Pubkey::new_unique();
        let base = Pubkey::new_unique();
        let quote = Pubkey::new_unique();
        let (a, _) = derive_pool(0, &creator, &base, &quote).unwrap();
        let (b, _) = derive_pool(1, &creator, &base, &quote).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn event_authority_is_stable() {
        let (a, _) = derive_event_authority().unwrap();
        let (b, _) = derive_event_authority().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn creator_vault_authority_depends_on_creator() {
        let c1 = Pubkey::new_unique();
        let c2 = Pubkey::new_unique();
        let (a, _) = derive_creator_vault_authority(&c1).unwrap();
        let (b, _) = derive_creator_vault_authority(&c2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn associated_token_address_matches_spl_helper() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        assert_eq!(
            derive_associated_token_address(&owner, &mint),
            spl_associated_token_account::get_associated_token_address(&owner, &mint)
        );
    }
}
