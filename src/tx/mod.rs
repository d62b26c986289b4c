//! Assembles, signs, submits, and confirms a transaction, retrying
//! transient failures under a deadline (spec §4.6).

use crate::errors::EngineError;
use crate::rpc::{RpcClientFacade, SendOptions};
use crate::wallet::Wallet;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::signature::Signature;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const INITIAL_BACKOFF: Duration = Duration::from_millis(250);
const MAX_BACKOFF: Duration = Duration::from_secs(5);

pub struct TransactionPipeline {
    rpc: Arc<RpcClientFacade>,
    wallet: Arc<Wallet>,
}

impl TransactionPipeline {
    pub fn new(rpc: Arc<RpcClientFacade>, wallet: Arc<Wallet>) -> Self {
        Self { rpc, wallet }
    }

    /// Runs the full build/sign/send/confirm pipeline, retrying only
    /// transient send failures, under a 15s overall deadline (spec §4.6,
    /// §5). A fresh blockhash is fetched on every attempt.
    pub async fn build_and_submit(
        &self,
        instructions: &[Instruction],
        slippage_pct: f64,
        amount: u64,
        cancel: &CancellationToken,
    ) -> Result<Signature, EngineError> {
        let deadline = Instant::now() + Duration::from_secs(crate::consts::SUBMIT_DEADLINE_SECS);
        let mut backoff = INITIAL_BACKOFF;

        loop {
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            // Step 1: fetch blockhash. Any failure here is permanent —
            // downstream will also fail — so it is never retried (spec
            // §4.6 step 1).
            let blockhash = tokio::select! {
                _ = cancel.cancelled() => return Err(EngineError::Cancelled),
                result = self.rpc.get_recent_blockhash() => result.map_err(|e| {
                    EngineError::Permanent(format!("blockhash fetch failed: {e}"))
                })?,
            };

            // Step 2-3: build and sign. `Wallet::sign` is infallible for a
            // single `Keypair` signer; the permanent-on-failure contract
            // in spec §4.6 step 3 applies to multi-signer wallets this
            // crate doesn't model.
            let tx = self.wallet.sign(instructions, blockhash);

            // Step 4: send.
            match self.rpc.send_transaction(&tx, SendOptions::default()).await {
                Ok(signature) => {
                    // Step 5: confirm. Confirmation errors carry the
                    // signature but are not retried at this layer.
                    let confirm = self
                        .rpc
                        .wait_for_confirmation(&signature, CommitmentConfig::confirmed(), cancel)
                        .await;
                    return match confirm {
                        Ok(()) => {
                            info!(%signature, "swap executed");
                            Ok(signature)
                        }
                        Err(e) => Err(e.with_signature_context(signature)),
                    };
                }
                Err(send_err) => {
                    let classified =
                        EngineError::classify_send_error(&send_err.to_string(), slippage_pct, amount);

                    if !classified.is_transient() || Instant::now() >= deadline {
                        return Err(classified);
                    }

                    warn!(error = %classified, "transient send failure, retrying with a fresh blockhash");
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(EngineError::Cancelled),
                        _ = tokio::time::sleep(backoff) => {}
                    }
                    backoff = std::cmp::min(backoff * 2, MAX_BACKOFF);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_backoff_is_well_under_the_deadline() {
        assert!(INITIAL_BACKOFF < Duration::from_secs(crate::consts::SUBMIT_DEADLINE_SECS));
    }
}
