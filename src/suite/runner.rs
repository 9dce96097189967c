//! Concurrent check execution
//!
//! Checks are spawned as tasks gated by a semaphore sized to the configured
//! worker count. Results come back over a channel and are reordered to
//! declaration order.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use super::assertions::AssertionResult;
use super::checks::{run_check, CheckContext, CheckId, Project, Verdict};
use super::report::SuiteReport;
use crate::signals;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckState {
    Passed,
    Failed,
    Skipped(String),
}

/// Outcome of one check
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub id: CheckId,
    pub project: Project,
    pub state: CheckState,
    pub assertions: Vec<AssertionResult>,
    pub elapsed: Duration,
}

impl CheckOutcome {
    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.assertions.iter().filter(|a| !a.passed)
    }
}

/// Runs checks against one backend
pub struct SuiteRunner {
    ctx: Arc<CheckContext>,
    workers: usize,
}

impl SuiteRunner {
    pub fn new(ctx: CheckContext) -> Self {
        let workers = ctx.config.workers.max(1);
        Self {
            ctx: Arc::new(ctx),
            workers,
        }
    }

    pub async fn run(&self, checks: &[CheckId]) -> SuiteReport {
        self.run_with(checks, |id, ctx| async move { execute(id, &ctx).await })
            .await
    }

    /// Run `exec` for every check; a task that dies without reporting is
    /// recorded as a failed outcome
    async fn run_with<F, Fut>(&self, checks: &[CheckId], exec: F) -> SuiteReport
    where
        F: Fn(CheckId, Arc<CheckContext>) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = CheckOutcome> + Send + 'static,
    {
        let start = Instant::now();
        info!(checks = checks.len(), workers = self.workers, target = %self.ctx.config.target(), "Running checks");

        let (tx, mut rx) = mpsc::channel::<(usize, CheckOutcome)>(checks.len().max(1));
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(checks.len());

        for (index, &id) in checks.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let ctx = Arc::clone(&self.ctx);
            let tx = tx.clone();
            let exec = exec.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire().await.ok();
                let outcome = exec(id, ctx).await;
                let _ = tx.send((index, outcome)).await;
            });
            handles.push((index, id, handle));
        }
        drop(tx);

        let mut collected = Vec::with_capacity(checks.len());
        while let Some(entry) = rx.recv().await {
            collected.push(entry);
        }

        for (index, id, handle) in handles {
            if let Err(e) = handle.await {
                warn!(check = id.name(), error = %e, "Check task panicked");
                if !collected.iter().any(|(i, _)| *i == index) {
                    collected.push((index, aborted(id, &e.to_string())));
                }
            }
        }

        collected.sort_by_key(|(index, _)| *index);
        SuiteReport::new(collected.into_iter().map(|(_, o)| o).collect(), start.elapsed())
    }
}

fn aborted(id: CheckId, reason: &str) -> CheckOutcome {
    CheckOutcome {
        id,
        project: id.project(),
        state: CheckState::Failed,
        assertions: vec![AssertionResult::fail("completed", reason)],
        elapsed: Duration::ZERO,
    }
}

async fn execute(id: CheckId, ctx: &CheckContext) -> CheckOutcome {
    let start = Instant::now();

    let (state, assertions) = if signals::was_interrupted() {
        (CheckState::Skipped("interrupted".to_string()), Vec::new())
    } else {
        match run_check(id, ctx).await {
            Ok(Verdict::Ran(results)) => {
                let state = if results.iter().all(|r| r.passed) {
                    CheckState::Passed
                } else {
                    CheckState::Failed
                };
                (state, results)
            }
            Ok(Verdict::Skipped(reason)) => (CheckState::Skipped(reason), Vec::new()),
            Err(e) => (
                CheckState::Failed,
                vec![AssertionResult::fail("request", &e.to_string())],
            ),
        }
    };

    debug!(check = id.name(), state = ?state, "Check finished");

    CheckOutcome {
        id,
        project: id.project(),
        state,
        assertions,
        elapsed: start.elapsed(),
    }
}
