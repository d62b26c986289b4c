//! Thin wrapper around the signing keypair (spec §3 "Wallet"). Key
//! material loading/storage is an external collaborator's job (spec §1
//! Out of scope); this type only has to expose `sign` and `ata_for`.

use crate::pda::derive_associated_token_address;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;

pub struct Wallet {
    keypair: Keypair,
}

impl Wallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Associated token account for `mint`, owned by this wallet.
    pub fn ata_for(&self, mint: &Pubkey) -> Pubkey {
        derive_associated_token_address(&self.keypair.pubkey(), mint)
    }

    /// Builds and signs a fresh transaction over `instructions` against
    /// `blockhash`, with this wallet as fee payer (spec §4.6 steps 2-3).
    pub fn sign(&self, instructions: &[Instruction], blockhash: Hash) -> Transaction {
        Transaction::new_signed_with_payer(
            instructions,
            Some(&self.keypair.pubkey()),
            &[&self.keypair],
            blockhash,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ata_for_matches_pda_helper() {
        let wallet = Wallet::new(Keypair::new());
        let mint = Pubkey::new_unique();
        assert_eq!(
            wallet.ata_for(&mint),
            derive_associated_token_address(&wallet.pubkey(), &mint)
        );
    }
}
