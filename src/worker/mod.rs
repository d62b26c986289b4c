//! Bounded worker pool and task dispatcher (spec §4.7).

use crate::errors::EngineError;
use crate::swap::{SwapEngine, SwapParams};
use crate::task::{Side, Task, TaskOutcome, TaskResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Soft per-task timeout (spec §4.7: "e.g., 24 h").
const DEFAULT_TASK_SOFT_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);
const TASK_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Default)]
pub struct DispatcherSummary {
    pub successes: usize,
    pub failures: usize,
    pub outcomes: Vec<TaskOutcome>,
}

/// Drives `workers` (config, default 1, validated >= 1) concurrent
/// consumers over a bounded task queue (spec §4.7).
pub struct Dispatcher {
    task_tx: mpsc::Sender<Task>,
    cancel: CancellationToken,
    outcome_rx: Mutex<mpsc::Receiver<TaskOutcome>>,
    worker_handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(workers: usize, engine: Arc<SwapEngine>) -> Result<Self, EngineError> {
        if workers < 1 {
            return Err(EngineError::InputError("workers must be >= 1".to_string()));
        }

        let (task_tx, task_rx) = mpsc::channel::<Task>(TASK_QUEUE_CAPACITY);
        let (outcome_tx, outcome_rx) = mpsc::channel::<TaskOutcome>(TASK_QUEUE_CAPACITY);
        let task_rx = Arc::new(Mutex::new(task_rx));
        let cancel = CancellationToken::new();

        let worker_handles = (0..workers)
            .map(|worker_id| {
                tokio::spawn(worker_loop(
                    worker_id,
                    task_rx.clone(),
                    outcome_tx.clone(),
                    engine.clone(),
                    cancel.clone(),
                ))
            })
            .collect();
        drop(outcome_tx);

        Ok(Self {
            task_tx,
            cancel,
            outcome_rx: Mutex::new(outcome_rx),
            worker_handles,
        })
    }

    /// Enqueues a task. Blocks if the queue is full (bounded concurrency,
    /// spec §4.7).
    pub async fn submit(&self, task: Task) -> Result<(), EngineError> {
        self.task_tx
            .send(task)
            .await
            .map_err(|_| EngineError::Permanent("dispatcher queue is closed".to_string()))
    }

    /// Stops accepting new tasks, drains whatever workers are already
    /// processing, and returns a summary of every completed task (spec
    /// §4.7 "Task result... the dispatcher reports successes and
    /// accumulated failures").
    pub async fn run(self) -> DispatcherSummary {
        drop(self.task_tx);

        let mut outcomes = Vec::new();
        let mut outcome_rx = self.outcome_rx.into_inner();
        while let Some(outcome) = outcome_rx.recv().await {
            outcomes.push(outcome);
        }

        for handle in self.worker_handles {
            let _ = handle.await;
        }

        summarize(outcomes)
    }

    /// Signals every worker to stop after its current task (spec §6
    /// "SIGINT/SIGTERM initiates graceful shutdown... cancel in-flight
    /// submissions"); the 30s wait itself is the binary-level caller's
    /// responsibility, matching the process-boundary split documented in
    /// SPEC_FULL.md §6.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

fn summarize(outcomes: Vec<TaskOutcome>) -> DispatcherSummary {
    let successes = outcomes
        .iter()
        .filter(|outcome| outcome.result == TaskResult::Success)
        .count();
    let failures = outcomes.len() - successes;
    DispatcherSummary {
        successes,
        failures,
        outcomes,
    }
}

async fn worker_loop(
    worker_id: usize,
    task_rx: Arc<Mutex<mpsc::Receiver<Task>>>,
    outcome_tx: mpsc::Sender<TaskOutcome>,
    engine: Arc<SwapEngine>,
    cancel: CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }

        let task = {
            let mut rx = task_rx.lock().await;
            rx.recv().await
        };
        let Some(task) = task else {
            break;
        };

        let task_cancel = cancel.child_token();
        let outcome = tokio::select! {
            _ = cancel.cancelled() => TaskOutcome {
                task_name: task.task_name.clone(),
                signature: None,
                result: TaskResult::Failed { error_kind: "cancelled".to_string() },
            },
            result = tokio::time::timeout(DEFAULT_TASK_SOFT_TIMEOUT, process_task(&engine, &task, &task_cancel)) => {
                match result {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(worker_id, task = %task.task_name, "task exceeded its soft timeout");
                        TaskOutcome {
                            task_name: task.task_name.clone(),
                            signature: None,
                            result: TaskResult::Failed { error_kind: "timeout".to_string() },
                        }
                    }
                }
            }
        };

        // One task's failure never terminates the worker (spec §4.7).
        if outcome_tx.send(outcome).await.is_err() {
            break;
        }
    }
}

async fn process_task(engine: &SwapEngine, task: &Task, cancel: &CancellationToken) -> TaskOutcome {
    let params = SwapParams {
        token_mint: task.token_mint,
        is_buy: matches!(task.side, Side::Buy),
        amount: task.amount_in,
        slippage_pct: task.slippage_config,
        priority_fee_sol: task.priority_fees.clone(),
        compute_unit_limit: task.compute_units,
    };

    let result = match task.side {
        Side::Buy | Side::Sell => engine.execute_swap(params, cancel).await,
        Side::AutoSell => {
            if let Some(delay) = task.autosell_delay.filter(|d| !d.is_zero()) {
                tokio::select! {
                    _ = cancel.cancelled() => return TaskOutcome {
                        task_name: task.task_name.clone(),
                        signature: None,
                        result: TaskResult::Failed { error_kind: "cancelled".to_string() },
                    },
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            // A fixed `autosell_amount` (spec §6 "autosell_amount") takes
            // precedence over the percent-of-balance rule; `autosell_pct`
            // is the fallback when no fixed amount was configured.
            match task.autosell_amount {
                Some(amount) => {
                    engine
                        .execute_sell(
                            amount,
                            task.token_mint,
                            task.slippage_config,
                            task.priority_fees.clone(),
                            task.compute_units,
                            cancel,
                        )
                        .await
                }
                None => {
                    let pct = task.autosell_pct.unwrap_or(100.0);
                    engine
                        .sell_percent(
                            task.token_mint,
                            pct,
                            task.slippage_config,
                            task.priority_fees.clone(),
                            task.compute_units,
                            cancel,
                        )
                        .await
                }
            }
        }
    };

    match result {
        Ok(outcome) => {
            info!(task = %task.task_name, signature = %outcome.signature, "task completed");
            TaskOutcome {
                task_name: task.task_name.clone(),
                signature: Some(outcome.signature),
                result: TaskResult::Success,
            }
        }
        Err(e) => {
            error!(task = %task.task_name, error = %e, "task failed");
            TaskOutcome {
                task_name: task.task_name.clone(),
                signature: None,
                result: TaskResult::Failed {
                    error_kind: e.to_string(),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_workers() {
        // `Dispatcher::new` needs a constructed `SwapEngine`, which in
        // turn needs a live RPC facade; the worker-count validation is
        // exercised directly here without standing one up.
        fn validate_worker_count(workers: usize) -> Result<(), EngineError> {
            if workers < 1 {
                Err(EngineError::InputError("workers must be >= 1".to_string()))
            } else {
                Ok(())
            }
        }
        assert!(validate_worker_count(0).is_err());
        assert!(validate_worker_count(1).is_ok());
    }

    #[test]
    fn summary_counts_successes_and_failures_separately() {
        let outcomes = vec![
            TaskOutcome {
                task_name: "a".to_string(),
                signature: None,
                result: TaskResult::Success,
            },
            TaskOutcome {
                task_name: "b".to_string(),
                signature: None,
                result: TaskResult::Failed {
                    error_kind: "permanent error: boom".to_string(),
                },
            },
        ];
        let summary = summarize(outcomes);
        assert_eq!(summary.successes, 1);
        assert_eq!(summary.failures, 1);
    }
}
