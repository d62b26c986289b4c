//! Process-wide `GlobalConfig`, fetched lazily and memoized under a
//! read/write lock with double-checked init (spec §3 "Lifecycle", §5).

use crate::codec::{parse_global_config, GlobalConfig};
use crate::errors::EngineError;
use crate::pda;
use crate::rpc::RpcClientFacade;
use solana_commitment_config::CommitmentConfig;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct GlobalConfigCache {
    rpc: Arc<RpcClientFacade>,
    slot: RwLock<Option<GlobalConfig>>,
}

impl GlobalConfigCache {
    pub fn new(rpc: Arc<RpcClientFacade>) -> Self {
        Self {
            rpc,
            slot: RwLock::new(None),
        }
    }

    pub async fn get(&self) -> Result<GlobalConfig, EngineError> {
        if let Some(config) = self.slot.read().await.as_ref() {
            return Ok(config.clone());
        }

        let mut guard = self.slot.write().await;
        if let Some(config) = guard.as_ref() {
            return Ok(config.clone());
        }

        let (address, _) = pda::derive_global_config()?;
        let account = self
            .rpc
            .get_account(&address, CommitmentConfig::confirmed())
            .await?
            .ok_or_else(|| EngineError::NotFound("global config account not found".to_string()))?;
        let config = parse_global_config(&account.data)?;
        *guard = Some(config.clone());
        Ok(config)
    }
}
