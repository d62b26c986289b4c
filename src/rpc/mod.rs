//! A thin adapter over `solana_client`'s nonblocking RPC client, hiding
//! failover across multiple candidate endpoints (spec §4.3).

mod health;

pub use health::EndpointHealth;

use crate::errors::EngineError;
use solana_account_decoder::UiAccountEncoding;
use solana_client::client_error::ClientErrorKind;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig, RpcSendTransactionConfig};
use solana_client::rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType};
use solana_commitment_config::CommitmentConfig;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A single memory-compare filter: match `bytes` at `offset` within the
/// account's raw data (spec §4.4's `get_program_accounts` filters).
#[derive(Debug, Clone)]
pub struct MemcmpFilter {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl From<&MemcmpFilter> for RpcFilterType {
    fn from(filter: &MemcmpFilter) -> Self {
        RpcFilterType::Memcmp(Memcmp::new(
            filter.offset,
            MemcmpEncodedBytes::Bytes(filter.bytes.clone()),
        ))
    }
}

/// Options for `send_transaction` (spec §4.6 step 4).
#[derive(Debug, Clone, Copy)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: CommitmentConfig,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            skip_preflight: true,
            preflight_commitment: CommitmentConfig::processed(),
        }
    }
}

/// Thin facade over the Solana JSON-RPC surface the engine needs,
/// with endpoint failover (spec §4.3).
pub struct RpcClientFacade {
    client: RpcClient,
    endpoint: String,
    health: EndpointHealth,
}

impl RpcClientFacade {
    /// Probes each candidate endpoint by requesting a blockhash with a
    /// 10-second timeout, and keeps the first reachable one (spec §4.3).
    pub async fn connect(endpoints: &[String]) -> Result<Self, EngineError> {
        if endpoints.is_empty() {
            return Err(EngineError::InputError(
                "rpc_list must contain at least one endpoint".to_string(),
            ));
        }

        for endpoint in endpoints {
            let candidate = RpcClient::new(endpoint.clone());
            let probe = timeout(
                Duration::from_secs(crate::consts::ENDPOINT_PROBE_TIMEOUT_SECS),
                candidate.get_latest_blockhash(),
            )
            .await;
            match probe {
                Ok(Ok(_)) => {
                    debug!(endpoint, "RPC endpoint reachable, selected");
                    return Ok(Self {
                        client: candidate,
                        endpoint: endpoint.clone(),
                        health: EndpointHealth::new(endpoint.clone()),
                    });
                }
                Ok(Err(e)) => warn!(endpoint, error = %e, "RPC endpoint probe failed"),
                Err(_) => warn!(endpoint, "RPC endpoint probe timed out"),
            }
        }

        Err(EngineError::Transient(
            "no configured RPC endpoint was reachable".to_string(),
        ))
    }

    /// Wraps an existing `RpcClient` without probing — useful in tests.
    pub fn from_client(endpoint: impl Into<String>, client: RpcClient) -> Self {
        let endpoint = endpoint.into();
        Self {
            health: EndpointHealth::new(endpoint.clone()),
            client,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn health(&self) -> &EndpointHealth {
        &self.health
    }

    /// Records a completed call's outcome against this endpoint's health
    /// counters (spec §4.3's optional metrics aggregator).
    fn record_outcome<T>(&self, result: &Result<T, EngineError>, started_at: Instant) {
        match result {
            Ok(_) => self.health.record_success(started_at.elapsed()),
            Err(_) => self.health.record_failure(),
        }
    }

    pub async fn get_account(
        &self,
        pubkey: &Pubkey,
        commitment: CommitmentConfig,
    ) -> Result<Option<Account>, EngineError> {
        let started_at = Instant::now();
        let result = match self
            .client
            .get_account_with_commitment(pubkey, commitment)
            .await
        {
            Ok(response) => Ok(response.value),
            Err(e) => Err(classify_rpc_error(&e)),
        };
        self.record_outcome(&result, started_at);
        result
    }

    pub async fn get_multiple_accounts(
        &self,
        pubkeys: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, EngineError> {
        let started_at = Instant::now();
        let result = self
            .client
            .get_multiple_accounts(pubkeys)
            .await
            .map_err(|e| classify_rpc_error(&e));
        self.record_outcome(&result, started_at);
        result
    }

    /// Bounded by a 5-second deadline per spec §4.4/§5.
    pub async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: Vec<MemcmpFilter>,
        commitment: CommitmentConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<(Pubkey, Account)>, EngineError> {
        let config = RpcProgramAccountsConfig {
            filters: Some(filters.iter().map(RpcFilterType::from).collect()),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(commitment),
                ..Default::default()
            },
            ..Default::default()
        };

        let call = self.client.get_program_accounts_with_config(program_id, config);
        let bounded = timeout(
            Duration::from_secs(crate::consts::POOL_SCAN_DEADLINE_SECS),
            call,
        );

        let started_at = Instant::now();
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(EngineError::Cancelled),
            result = bounded => match result {
                Ok(Ok(accounts)) => Ok(accounts),
                Ok(Err(e)) => Err(classify_rpc_error(&e)),
                Err(_) => Err(EngineError::Transient(
                    "get_program_accounts deadline exceeded".to_string(),
                )),
            },
        };
        self.record_outcome(&result, started_at);
        result
    }

    pub async fn get_recent_blockhash(&self) -> Result<Hash, EngineError> {
        let started_at = Instant::now();
        let result = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(|e| classify_rpc_error(&e));
        self.record_outcome(&result, started_at);
        result
    }

    pub async fn send_transaction(
        &self,
        tx: &Transaction,
        opts: SendOptions,
    ) -> Result<Signature, EngineError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: opts.skip_preflight,
            preflight_commitment: Some(opts.preflight_commitment.commitment),
            ..Default::default()
        };
        let started_at = Instant::now();
        let result = self
            .client
            .send_transaction_with_config(tx, config)
            .await
            .map_err(|e| classify_rpc_error(&e));
        self.record_outcome(&result, started_at);
        result
    }

    pub async fn wait_for_confirmation(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
        cancel: &CancellationToken,
    ) -> Result<(), EngineError> {
        let call = self
            .client
            .confirm_transaction_with_commitment(signature, commitment);

        let started_at = Instant::now();
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(EngineError::Cancelled),
            result = call => result.map_err(|e| classify_rpc_error(&e)).and_then(|response| {
                if response.value {
                    Ok(())
                } else {
                    Err(EngineError::Permanent(format!(
                        "transaction {signature} not confirmed"
                    )))
                }
            }),
        };
        self.record_outcome(&result, started_at);
        result
    }

    pub async fn get_token_account_balance(
        &self,
        pubkey: &Pubkey,
        commitment: CommitmentConfig,
    ) -> Result<u64, EngineError> {
        let account = self.get_account(pubkey, commitment).await?;
        match account {
            Some(account) => crate::codec::parse_spl_token_account(&account.data)
                .map_err(EngineError::from),
            None => Ok(0),
        }
    }
}

/// Classifies a raw RPC transport error into the taxonomy. Transport
/// timeouts on idempotent GETs and anything mentioning a stale blockhash
/// are transient; everything else is surfaced permanent (spec §7) — the
/// caller may re-classify slippage-specific strings with
/// `EngineError::classify_send_error`.
fn classify_rpc_error(error: &solana_client::client_error::ClientError) -> EngineError {
    let message = error.to_string();
    if message.contains(crate::consts::BLOCKHASH_NOT_FOUND_SUBSTR) {
        return EngineError::Transient(message);
    }
    match error.kind() {
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => EngineError::Transient(message),
        _ => EngineError::Permanent(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memcmp_filter_converts_offset_and_bytes() {
        let filter = MemcmpFilter {
            offset: 8,
            bytes: vec![1, 2, 3],
        };
        let converted: RpcFilterType = (&filter).into();
        match converted {
            RpcFilterType::Memcmp(memcmp) => {
                assert_eq!(memcmp.offset(), 8);
            }
            _ => panic!("expected Memcmp filter"),
        }
    }

    #[test]
    fn default_send_options_match_spec_reference_configuration() {
        let opts = SendOptions::default();
        assert!(opts.skip_preflight);
        assert_eq!(opts.preflight_commitment, CommitmentConfig::processed());
    }
}
