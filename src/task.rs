//! The `Task` entity (spec §3, §6): the Dispatcher's input boundary.
//! Loading it from a tabular file is an external collaborator's job
//! (spec §1 Out of scope); only the type and the fields core semantics
//! consume are in scope (spec §6 "Per-task columns").

use solana_sdk::pubkey::Pubkey;

/// Which side of the pool a task trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
    AutoSell,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub task_name: String,
    pub wallet_id: String,
    pub token_mint: Pubkey,
    pub side: Side,
    pub amount_in: u64,
    pub slippage_config: f64,
    pub priority_fees: String,
    pub compute_units: u32,
    pub transaction_delay: std::time::Duration,
    pub autosell_pct: Option<f64>,
    pub autosell_delay: Option<std::time::Duration>,
    pub autosell_amount: Option<u64>,
    pub module: String,
    pub metadata: Option<serde_json::Value>,
}

impl Task {
    pub fn new(
        task_name: impl Into<String>,
        wallet_id: impl Into<String>,
        token_mint: Pubkey,
        side: Side,
        amount_in: u64,
        slippage_config: f64,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            wallet_id: wallet_id.into(),
            token_mint,
            side,
            amount_in,
            slippage_config,
            priority_fees: "default".to_string(),
            compute_units: crate::consts::DEFAULT_COMPUTE_UNIT_LIMIT,
            transaction_delay: std::time::Duration::ZERO,
            autosell_pct: None,
            autosell_delay: None,
            autosell_amount: None,
            module: "dex".to_string(),
            metadata: None,
        }
    }
}

/// What the Dispatcher reports per task (spec §4.7 "Task result").
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub task_name: String,
    pub signature: Option<solana_sdk::signature::Signature>,
    pub result: TaskResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    Success,
    Failed { error_kind: String },
}
