//! Well-known program IDs, discriminators, and fee constants for PumpSwap.

/// PumpSwap AMM program ID.
pub const PUMPSWAP_PROGRAM_ID: &str = "pAMMBay6oceH9fJKBRHGP5D4bD4sWpmSwMn52FMfXEA";

/// Wrapped native (SOL) mint, used as the quote side of every pool.
pub const WRAPPED_NATIVE_MINT: &str = "So11111111111111111111111111111111111111112";

/// SPL token program ID.
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// System program ID.
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";

/// Associated-token-account program ID.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";

/// `GlobalConfig` account discriminator.
pub const GLOBAL_CONFIG_DISCRIMINATOR: [u8; 8] = [149, 8, 156, 202, 160, 252, 176, 217];

/// `Pool` account discriminator.
pub const POOL_DISCRIMINATOR: [u8; 8] = [241, 154, 109, 4, 17, 177, 109, 188];

/// Buy instruction discriminator: `(base_amount_out, max_quote_amount_in)`.
pub const BUY_DISCRIMINATOR: [u8; 8] = [102, 6, 61, 18, 1, 218, 235, 234];

/// Sell instruction discriminator: `(base_amount_in, min_quote_amount_out)`.
pub const SELL_DISCRIMINATOR: [u8; 8] = [51, 230, 133, 164, 1, 127, 131, 173];

/// Default compute unit limit when a task doesn't specify one.
pub const DEFAULT_COMPUTE_UNIT_LIMIT: u32 = 200_000;

/// Default compute-unit price, in micro-lamports per unit, for the
/// textual `"default"` priority fee.
pub const DEFAULT_COMPUTE_UNIT_PRICE_MICRO_LAMPORTS: u64 = 5_000;

/// Minimum LP supply for a pool to be considered tradeable.
pub const MIN_LP_SUPPLY: u64 = 1_000;

/// Fee-basis-point denominator (lp_fee_bps / protocol_fee_bps are out of
/// this many).
pub const FEE_BPS_DENOMINATOR: u64 = 10_000;

/// Recognized on-chain slippage-exceeded error code.
pub const SLIPPAGE_EXCEEDED_CODE: u32 = 6004;

/// Recognized on-chain slippage-exceeded error code, hex form, as it
/// appears in RPC error strings (`"custom program error 0x1774"`).
pub const SLIPPAGE_EXCEEDED_HEX: &str = "0x1774";

/// Substring seen in some program error messages for slippage failures.
pub const SLIPPAGE_EXCEEDED_SUBSTR: &str = "ExceededSlippage";

/// Substring identifying a stale-blockhash transport error (transient).
pub const BLOCKHASH_NOT_FOUND_SUBSTR: &str = "BlockhashNotFound";

/// Default tradeable-token decimals when a mint account can't be read.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;

/// Decimals of wrapped native SOL.
pub const DEFAULT_WRAPPED_NATIVE_DECIMALS: u8 = 9;

/// `disable_flags` bit positions in `GlobalConfig`.
pub mod disable_flags {
    pub const CREATE_POOL: u8 = 1 << 0;
    pub const DEPOSIT: u8 = 1 << 1;
    pub const WITHDRAW: u8 = 1 << 2;
    pub const BUY: u8 = 1 << 3;
    pub const SELL: u8 = 1 << 4;
}

/// Number of protocol fee recipient slots in `GlobalConfig`.
pub const PROTOCOL_FEE_RECIPIENTS_LEN: usize = 8;

/// Overall deadline for a single submission attempt chain, per §4.6/§5.
pub const SUBMIT_DEADLINE_SECS: u64 = 15;

/// Deadline for a single `get_program_accounts` pool scan, per §5.
pub const POOL_SCAN_DEADLINE_SECS: u64 = 5;

/// Timeout used to probe each candidate RPC endpoint at startup, per §4.3.
pub const ENDPOINT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Default pool-cache TTL, per §4.4.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
