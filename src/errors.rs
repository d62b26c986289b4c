//! The engine's error taxonomy (spec §7).
//!
//! `EngineError` is the single error type returned by public entry points
//! (`SwapEngine::execute_swap`, `PoolManager::find_pool`, ...). Leaf error
//! types (`CodecError`) convert into it with `?`. Transient vs. permanent
//! is a property of the *variant*, queried with [`EngineError::is_transient`].

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use thiserror::Error;

/// Errors raised while decoding packed on-chain account data (spec §4.1).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("account data too short: expected at least {expected} bytes, got {actual}")]
    ShortData { expected: usize, actual: usize },

    #[error("unexpected discriminator: expected {expected:?}, got {actual:?}")]
    BadDiscriminator {
        expected: [u8; 8],
        actual: [u8; 8],
    },
}

/// Errors raised while deriving a program-derived address (spec §4.2).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeriveError {
    #[error("no program-derived address found off curve for seeds {seeds:?}")]
    NoAddressFound { seeds: Vec<String> },
}

/// The top-level error taxonomy (spec §7).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InputError(String),

    #[error(transparent)]
    DecodeError(#[from] CodecError),

    #[error(transparent)]
    DeriveError(#[from] DeriveError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transient error: {0}")]
    Transient(String),

    #[error("permanent error: {0}")]
    Permanent(String),

    #[error(
        "slippage exceeded: attempted {amount} at {slippage_pct}% tolerance, cause: {cause}"
    )]
    SlippageExceeded {
        slippage_pct: f64,
        amount: u64,
        cause: String,
    },

    #[error("protocol disabled for this direction: {0}")]
    ProtocolDisabled(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl EngineError {
    /// Whether this error class is eligible for retry under the
    /// submission pipeline's backoff policy (spec §4.6, §7).
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Transient(_))
    }

    /// Classify a raw RPC `send_transaction` error message into the
    /// taxonomy's transient/permanent/slippage split (spec §4.6, §7).
    pub fn classify_send_error(message: &str, slippage_pct: f64, amount: u64) -> EngineError {
        if message.contains(crate::consts::BLOCKHASH_NOT_FOUND_SUBSTR) {
            return EngineError::Transient(message.to_string());
        }
        if is_slippage_error(message) {
            return EngineError::SlippageExceeded {
                slippage_pct,
                amount,
                cause: message.to_string(),
            };
        }
        EngineError::Permanent(message.to_string())
    }

    /// Attach a signature to an already-classified confirmation error
    /// (spec §4.6 step 5: "confirmation errors are surfaced with the
    /// signature attached but are not retried at this layer").
    pub fn with_signature_context(self, signature: Signature) -> EngineError {
        match self {
            EngineError::Permanent(msg) => {
                EngineError::Permanent(format!("{msg} (signature: {signature})"))
            }
            other => other,
        }
    }
}

/// Recognizes the three documented shapes of a slippage-exceeded error:
/// the numeric code `6004`, its hex form `0x1774`, or the substring
/// `ExceededSlippage` (spec §7).
pub fn is_slippage_error(message: &str) -> bool {
    message.contains(&crate::consts::SLIPPAGE_EXCEEDED_CODE.to_string())
        || message.contains(crate::consts::SLIPPAGE_EXCEEDED_HEX)
        || message.contains(crate::consts::SLIPPAGE_EXCEEDED_SUBSTR)
}

/// Checks a `GlobalConfig.disable_flags` bitset for a blocked direction and
/// produces the matching error, or `Ok(())` if the direction is enabled.
pub fn check_disable_flag(disable_flags: u8, bit: u8, direction: &str) -> Result<(), EngineError> {
    if disable_flags & bit != 0 {
        Err(EngineError::ProtocolDisabled(direction.to_string()))
    } else {
        Ok(())
    }
}

/// Convenience for "mint didn't match the pool's effective base" errors
/// raised by `get_token_price` (spec §4.5, scenario S7).
pub fn mint_mismatch(expected_base: &Pubkey, got: &Pubkey) -> EngineError {
    EngineError::InputError(format!(
        "token mint mismatch: pool base is {expected_base}, got {got}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_blockhash_not_found_as_transient() {
        let err = EngineError::classify_send_error("BlockhashNotFound", 1.0, 100);
        assert!(err.is_transient());
    }

    #[test]
    fn classifies_numeric_slippage_code_as_slippage_exceeded() {
        let err =
            EngineError::classify_send_error("custom program error 0x1774", 1.0, 100);
        assert!(matches!(err, EngineError::SlippageExceeded { .. }));
    }

    #[test]
    fn classifies_slippage_substring() {
        let err = EngineError::classify_send_error("Error: ExceededSlippage", 1.0, 100);
        assert!(matches!(err, EngineError::SlippageExceeded { .. }));
    }

    #[test]
    fn classifies_unknown_errors_as_permanent() {
        let err = EngineError::classify_send_error("invalid signature", 1.0, 100);
        assert!(matches!(err, EngineError::Permanent(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn disable_flag_check_blocks_matching_bit() {
        let flags = crate::consts::disable_flags::BUY;
        assert!(check_disable_flag(flags, crate::consts::disable_flags::BUY, "buy").is_err());
        assert!(check_disable_flag(flags, crate::consts::disable_flags::SELL, "sell").is_ok());
    }
}
