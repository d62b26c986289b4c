//! A sniper trading engine for PumpSwap AMM pools on Solana.
//!
//! This crate provides:
//! - Decoding of PumpSwap's on-chain pool, global-config, and token-account
//!   layouts (`codec`) and derivation of the protocol's PDAs (`pda`).
//! - Pool discovery with a TTL cache and decimals memoization (`pool_manager`,
//!   `decimals`).
//! - Swap-quote math with fee and slippage handling, and execution of buys,
//!   sells, and percent-of-balance sells against a pool (`swap`).
//! - A cancellation-aware transaction pipeline that classifies send errors
//!   into retryable and permanent failures (`tx`, `rpc`, `errors`).
//! - A bounded worker pool that drives tasks loaded from outside the crate
//!   (`worker`, `task`).
//!
//! # Examples
//!
//! ```rust
//! use std::env;
//! use std::sync::Arc;
//! use pumpswap_sniper::config::EngineConfig;
//! use pumpswap_sniper::decimals::DecimalsCache;
//! use pumpswap_sniper::pool_manager::PoolManagerImpl;
//! use pumpswap_sniper::rpc::RpcClientFacade;
//! use pumpswap_sniper::swap::{SwapEngine, SwapParams, TradeVenue};
//! use pumpswap_sniper::wallet::Wallet;
//! use pumpswap_sniper::worker::Dispatcher;
//! use solana_sdk::pubkey::Pubkey;
//! use solana_sdk::signature::Keypair;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     dotenvy::dotenv().ok();
//!     let config = EngineConfig::from_env()?;
//!
//!     let rpc = Arc::new(RpcClientFacade::connect(&config.rpc_list).await?);
//!     let decimals = Arc::new(DecimalsCache::new(rpc.clone()));
//!     let pool_manager = Arc::new(PoolManagerImpl::new(rpc.clone(), decimals.clone(), config.cache_ttl));
//!     let wallet = Arc::new(Wallet::new(Keypair::new()));
//!     let engine = Arc::new(SwapEngine::new(pool_manager, decimals, rpc, wallet));
//!
//!     let dispatcher = Dispatcher::new(config.workers, engine.clone())?;
//!     let cancel = CancellationToken::new();
//!     let mint: Pubkey = env::var("TOKEN_MINT")?.parse()?;
//!
//!     let outcome = engine
//!         .execute(
//!             SwapParams {
//!                 token_mint: mint,
//!                 is_buy: true,
//!                 amount: 1_000_000,
//!                 slippage_pct: 1.0,
//!                 priority_fee_sol: "default".to_string(),
//!                 compute_unit_limit: 0,
//!             },
//!             &cancel,
//!         )
//!         .await?;
//!     println!("bought via {}", outcome.signature);
//!
//!     drop(dispatcher);
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod consts;
pub mod decimals;
pub mod errors;
pub mod pda;
pub mod pool_manager;
pub mod rpc;
pub mod swap;
pub mod task;
pub mod tx;
pub mod wallet;
pub mod worker;
