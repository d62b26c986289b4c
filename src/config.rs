//! Recognized configuration options (spec §6). Parsing a config *file* is
//! out of scope (spec §1); this only models the in-process options table
//! and an env-var convenience constructor in the teacher's `dotenvy` style.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Candidate RPC endpoints; the facade probes and keeps the first
    /// reachable one.
    pub rpc_list: Vec<String>,
    /// Optional subscription endpoint. Not used by the core engine, but
    /// carried so external collaborators can read it off the same config.
    pub websocket_url: Option<String>,
    /// Persistence connection string, owned entirely by an out-of-core
    /// collaborator.
    pub postgres_url: Option<String>,
    pub debug_logging: bool,
    pub workers: usize,
    pub cache_ttl: Duration,
}

impl EngineConfig {
    /// Loads recognized options from the process environment, the way
    /// the teacher's CLI examples load `RPC_URL`/`KEYPAIR` after
    /// `dotenvy::dotenv()`.
    pub fn from_env() -> Result<Self, crate::errors::EngineError> {
        let _ = dotenvy::dotenv();

        let rpc_list = std::env::var("RPC_LIST")
            .map(|raw| raw.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default();

        let workers = std::env::var("WORKERS")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .unwrap_or(1);
        if workers < 1 {
            return Err(crate::errors::EngineError::InputError(
                "workers must be >= 1".to_string(),
            ));
        }

        let cache_ttl_seconds = std::env::var("CACHE_TTL_SECONDS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(crate::consts::DEFAULT_CACHE_TTL_SECS);

        let debug_logging = std::env::var("DEBUG_LOGGING")
            .map(|raw| raw == "1" || raw.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            rpc_list,
            websocket_url: std::env::var("WEBSOCKET_URL").ok(),
            postgres_url: std::env::var("POSTGRES_URL").ok(),
            debug_logging,
            workers,
            cache_ttl: Duration::from_secs(cache_ttl_seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_one_worker_when_unset() {
        std::env::remove_var("WORKERS");
        std::env::remove_var("RPC_LIST");
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.workers, 1);
    }
}
