//! Command dispatch and the per-domain runner shared by handlers.

pub mod backup;
pub mod config_cmd;
pub mod diff;
pub mod fmt;
pub mod init;
pub mod list;
pub mod sync;
pub mod util;

use std::future::Future;

use futures_util::future::join_all;
use tracing::debug;

use crate::cli::Command;
use crate::config::{Context, Resolved};
use crate::error::CliError;

/// Dispatch a config-bound command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Diff(args) => diff::handle(ctx, &args).await,
        Command::Sync(args) => sync::handle(ctx, &args).await,
        Command::Fmt(args) => fmt::handle(ctx, &args),
        Command::List(args) => list::handle(ctx, &args).await,
        Command::Backup(args) => backup::handle(ctx, &args).await,
        Command::Config(args) => config_cmd::handle(ctx, &args),
        // Init and Completions run without a loaded config
        Command::Init | Command::Completions(_) => Ok(()),
    }
}

// ── Per-domain runner ───────────────────────────────────────────────

/// Run `job` for every resolved target, in config order.
///
/// With `parallel`, all domains run concurrently; results still come back
/// in config order. Targets that failed to resolve skip the job.
pub async fn run_domains<T, F, Fut>(
    targets: Vec<Resolved>,
    parallel: bool,
    job: F,
) -> DomainResults<T>
where
    F: Fn(flaresync_core::DomainTarget) -> Fut,
    Fut: Future<Output = Result<T, CliError>>,
{
    let total = targets.len();
    let runs = targets.into_iter().map(|(name, target)| {
        let job = &job;
        async move {
            debug!(domain = %name, "processing domain");
            match target {
                Ok(target) => job(target).await,
                Err(e) => Err(e),
            }
        }
    });

    let results = if parallel {
        join_all(runs).await
    } else {
        let mut results = Vec::with_capacity(total);
        for run in runs {
            results.push(run.await);
        }
        results
    };
    DomainResults::from_results(results)
}

/// Successes and failures of a multi-domain run.
pub struct DomainResults<T> {
    pub done: Vec<T>,
    errors: Vec<CliError>,
    /// Domains that completed but with item-level failures.
    degraded: usize,
    total: usize,
}

impl<T> DomainResults<T> {
    pub fn from_results(results: Vec<Result<T, CliError>>) -> Self {
        let total = results.len();
        let mut done = Vec::new();
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(value) => done.push(value),
                Err(e) => errors.push(e),
            }
        }
        Self {
            done,
            errors,
            degraded: 0,
            total,
        }
    }

    /// Count completed domains matching `failed` as failures.
    pub fn mark_degraded(&mut self, failed: impl Fn(&T) -> bool) {
        self.degraded = self.done.iter().filter(|d| failed(d)).count();
    }

    /// A lone failing domain returns its own error; otherwise each error is
    /// printed and the run fails as a whole.
    pub fn finish(self) -> Result<(), CliError> {
        let Self {
            mut errors,
            degraded,
            total,
            ..
        } = self;
        if errors.is_empty() && degraded == 0 {
            return Ok(());
        }
        if total == 1 && degraded == 0 {
            if let Some(err) = errors.pop() {
                return Err(err);
            }
        }

        let failed = errors.len() + degraded;
        for err in errors {
            eprintln!("{:?}", miette::Report::new(err));
        }
        Err(CliError::PartialFailure { failed, total })
    }
}
