//! Account preparation and the swap instruction's exact account ordering
//! (spec §3 "PreparedAccounts", §4.5 steps 2 and 5).

use crate::codec::{encode_swap_instruction_data, GlobalConfig, SwapInstructionKind};
use crate::errors::EngineError;
use crate::pda::{derive_associated_token_address, derive_creator_vault_authority};
use crate::pool_manager::PoolState;
use crate::wallet::Wallet;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Derived accounts and idempotent-create instructions a swap needs
/// beyond the pool's own vaults (spec §3).
pub struct PreparedAccounts {
    pub user_base_ata: Pubkey,
    pub user_quote_ata: Pubkey,
    pub protocol_fee_recipient: Pubkey,
    pub protocol_fee_recipient_ata: Pubkey,
    pub creator_vault_authority: Pubkey,
    pub creator_vault_ata: Pubkey,
    pub create_base_ata_ix: Instruction,
    pub create_quote_ata_ix: Instruction,
}

/// Derives user ATAs and fee/creator-vault accounts, and emits the
/// idempotent ATA-create instructions the program requires to tolerate
/// an already-existing ATA (spec §4.5 step 2).
pub fn prepare_token_accounts(
    pool: &PoolState,
    wallet: &Wallet,
    global_config: &GlobalConfig,
) -> Result<PreparedAccounts, EngineError> {
    let token_program = spl_token::id();

    let user_base_ata = wallet.ata_for(&pool.base_mint);
    let user_quote_ata = wallet.ata_for(&pool.quote_mint);

    let create_base_ata_ix = spl_associated_token_account::instruction::create_associated_token_account_idempotent(
        &wallet.pubkey(),
        &wallet.pubkey(),
        &pool.base_mint,
        &token_program,
    );
    let create_quote_ata_ix = spl_associated_token_account::instruction::create_associated_token_account_idempotent(
        &wallet.pubkey(),
        &wallet.pubkey(),
        &pool.quote_mint,
        &token_program,
    );

    let protocol_fee_recipient = global_config.first_protocol_fee_recipient().ok_or_else(|| {
        EngineError::NotFound("global config has no protocol fee recipient configured".to_string())
    })?;
    let protocol_fee_recipient_ata = derive_associated_token_address(&protocol_fee_recipient, &pool.quote_mint);

    let (creator_vault_authority, _bump) = derive_creator_vault_authority(&pool.creator)?;
    let creator_vault_ata = derive_associated_token_address(&creator_vault_authority, &pool.quote_mint);

    Ok(PreparedAccounts {
        user_base_ata,
        user_quote_ata,
        protocol_fee_recipient,
        protocol_fee_recipient_ata,
        creator_vault_authority,
        creator_vault_ata,
        create_base_ata_ix,
        create_quote_ata_ix,
    })
}

/// Assembles the swap instruction with the protocol-exact 17-account
/// order (spec §4.5 step 5). `event_authority` and the program ID are
/// appended last, matching the reference layout.
#[allow(clippy::too_many_arguments)]
pub fn build_swap_instruction(
    pool: &PoolState,
    global_config_address: Pubkey,
    event_authority: Pubkey,
    prepared: &PreparedAccounts,
    user: Pubkey,
    kind: SwapInstructionKind,
    a1: u64,
    a2: u64,
) -> Instruction {
    let program_id =
        Pubkey::from_str(crate::consts::PUMPSWAP_PROGRAM_ID).expect("PUMPSWAP_PROGRAM_ID is a valid pubkey");
    let token_program = spl_token::id();
    let system_program = solana_sdk::system_program::id();
    let associated_token_program = spl_associated_token_account::id();

    let accounts = vec![
        AccountMeta::new(pool.address, false),
        AccountMeta::new(user, true),
        AccountMeta::new_readonly(global_config_address, false),
        AccountMeta::new_readonly(pool.base_mint, false),
        AccountMeta::new_readonly(pool.quote_mint, false),
        AccountMeta::new(prepared.user_base_ata, false),
        AccountMeta::new(prepared.user_quote_ata, false),
        AccountMeta::new(pool.pool_base_vault, false),
        AccountMeta::new(pool.pool_quote_vault, false),
        AccountMeta::new_readonly(prepared.protocol_fee_recipient, false),
        AccountMeta::new(prepared.protocol_fee_recipient_ata, false),
        AccountMeta::new_readonly(token_program, false),
        AccountMeta::new_readonly(token_program, false),
        AccountMeta::new_readonly(system_program, false),
        AccountMeta::new_readonly(associated_token_program, false),
        AccountMeta::new_readonly(event_authority, false),
        AccountMeta::new_readonly(program_id, false),
    ];

    debug_assert_eq!(accounts.len(), 17, "swap instruction must carry exactly 17 accounts");

    Instruction {
        program_id,
        accounts,
        data: encode_swap_instruction_data(kind, a1, a2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_instruction_has_seventeen_accounts_in_order() {
        let pool = PoolState {
            address: Pubkey::new_unique(),
            base_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
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
        };
        let prepared = PreparedAccounts {
            user_base_ata: Pubkey::new_unique(),
            user_quote_ata: Pubkey::new_unique(),
            protocol_fee_recipient: Pubkey::new_unique(),
            protocol_fee_recipient_ata: Pubkey::new_unique(),
            creator_vault_authority: Pubkey::new_unique(),
            creator_vault_ata: Pubkey::new_unique(),
            create_base_ata_ix: Instruction {
                program_id: spl_associated_token_account::id(),
                accounts: vec![],
                data: vec![],
            },
            create_quote_ata_ix: Instruction {
                program_id: spl_associated_token_account::id(),
                accounts: vec![],
                data: vec![],
            },
        };

        let ix = build_swap_instruction(
            &pool,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            &prepared,
            Pubkey::new_unique(),
            SwapInstructionKind::Buy,
            498,
            1_010_000,
        );

        assert_eq!(ix.accounts.len(), 17);
        assert_eq!(ix.accounts[0].pubkey, pool.address);
        assert!(ix.accounts[1].is_signer);
        assert!(ix.accounts[1].is_writable);
    }
}
