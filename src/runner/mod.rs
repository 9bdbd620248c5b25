//! Concurrent task runner
//!
//! A generic fan-out engine for batch operations: take a collection of task
//! items and a per-item async worker, execute the workers over a bounded pool
//! that shares one context object (typically the HTTP session), and collect
//! results as they complete.
//!
//! Results come back in completion order, not submission order; callers that
//! need to correlate results with inputs must have the worker echo an
//! identifying key in its returned value. The runner catches nothing: a
//! worker is responsible for catching its own failures and returning an
//! error-marked result, so one failing task never aborts the batch.

use futures::stream::{self, StreamExt};
use std::future::Future;

/// Receives advisory progress updates during a batch run
///
/// Purely observational; implementations must never affect correctness.
pub trait ProgressObserver: Send {
    /// Called after each task completes
    ///
    /// # Arguments
    ///
    /// * `completed` - Number of tasks finished so far
    /// * `total` - Total number of tasks in the batch
    /// * `label` - Short description of the task that just finished
    fn update(&mut self, completed: usize, total: usize, label: &str);
}

/// Progress observer that reports through the tracing subscriber
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn update(&mut self, completed: usize, total: usize, label: &str) {
        let short: String = label.chars().take(50).collect();
        tracing::info!("[{}/{}] {}", completed, total, short);
    }
}

/// Runs one worker invocation per task over a bounded concurrent pool
///
/// An empty task list returns immediately with no pool creation and no
/// observer calls. Otherwise up to `max_workers` workers run at once, each
/// receiving the task item and a clone of the shared context.
///
/// # Arguments
///
/// * `tasks` - The work items; one worker invocation each
/// * `ctx` - Shared context cloned into every worker (e.g. a [`crate::Fetcher`])
/// * `max_workers` - Pool width; must be at least 1
/// * `worker` - Async function from (task, context) to a result
/// * `label` - Derives the progress label from a task before it is dispatched
/// * `observer` - Receives (completed, total, label) after each completion
///
/// # Returns
///
/// Exactly one result per input task, in completion order.
pub async fn run_all<T, C, R, W, Fut, L>(
    tasks: Vec<T>,
    ctx: C,
    max_workers: usize,
    worker: W,
    label: L,
    observer: &mut dyn ProgressObserver,
) -> Vec<R>
where
    C: Clone,
    W: Fn(T, C) -> Fut,
    Fut: Future<Output = R>,
    L: Fn(&T) -> String,
{
    if tasks.is_empty() {
        return Vec::new();
    }

    let total = tasks.len();
    let mut results = Vec::with_capacity(total);

    let mut completions = stream::iter(tasks.into_iter().map(|task| {
        let task_label = label(&task);
        let work = worker(task, ctx.clone());
        async move { (task_label, work.await) }
    }))
    .buffer_unordered(max_workers);

    while let Some((task_label, result)) = completions.next().await {
        results.push(result);
        observer.update(results.len(), total, &task_label);
    }

    results
}
