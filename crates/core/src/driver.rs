//! Batch pass over a directory of request-set files.

use crate::attempt;
use crate::clock::Clock;
use crate::config::MembershipErrorPolicy;
use crate::reconcile::reconcile;
use crate::throttle;
use anyhow::{bail, Context};
use globset::Glob;
use providers::PhotoService;
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use storage::models::{AttemptState, AttemptStatus, RequestSet};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub skipped_already_added: usize,
    pub skipped_too_soon: usize,
    pub attempted_success_added: usize,
    pub attempted_success_queued: usize,
    pub attempted_fail: usize,
    /// Only non-zero under `MembershipErrorPolicy::SkipPhoto`.
    #[serde(skip_serializing_if = "is_zero")]
    pub skipped_membership_error: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl RunStats {
    fn record(&mut self, status: AttemptStatus) {
        match status {
            AttemptStatus::SuccessAdded => self.attempted_success_added += 1,
            AttemptStatus::SuccessQueued => self.attempted_success_queued += 1,
            AttemptStatus::Fail => self.attempted_fail += 1,
        }
    }

    pub fn attempted(&self) -> usize {
        self.attempted_success_added + self.attempted_success_queued + self.attempted_fail
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub on_membership_error: MembershipErrorPolicy,
}

/// Visible `*.json` files directly inside `dir`, symlinks included, sorted
/// by path.
pub fn find_json_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("request set directory {} does not exist", dir.display());
    }
    let matcher = Glob::new("*.json")?.compile_matcher();
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        if !entry.file_type().is_file() || is_hidden(entry.file_name()) {
            continue;
        }
        if matcher.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Runs every request set found in `dir`, persisting each one's state file
/// after its full pass.
pub async fn run_directory(
    service: &dyn PhotoService,
    dir: &Path,
    clock: &dyn Clock,
    options: &RunOptions,
) -> anyhow::Result<RunStats> {
    let mut stats = RunStats::default();
    for path in find_json_files(dir)? {
        let Some(request_set) = storage::detect_request_set(&path)? else {
            debug!("Skipping {}, not a request set file", path.display());
            continue;
        };
        info!("Reading {}", path.display());
        let state_path = storage::state_path_for(&path);
        let mut state = storage::load_state(&state_path)?;

        run_request_set(service, &request_set, &mut state, clock, options, &mut stats)
            .await
            .with_context(|| format!("processing {}", path.display()))?;

        storage::persist_state(&state_path, &state)?;
    }
    Ok(stats)
}

/// Reconcile, throttle and attempt every (photo, group) pair of one set.
pub async fn run_request_set(
    service: &dyn PhotoService,
    request_set: &RequestSet,
    state: &mut AttemptState,
    clock: &dyn Clock,
    options: &RunOptions,
    stats: &mut RunStats,
) -> anyhow::Result<()> {
    for (photo_id, desired) in request_set {
        let memberships = match service.photo_pools(photo_id).await {
            Ok(memberships) => memberships,
            Err(err) => match options.on_membership_error {
                MembershipErrorPolicy::Abort => {
                    return Err(anyhow::Error::new(err)
                        .context(format!("listing pools of photo {photo_id}")));
                }
                MembershipErrorPolicy::SkipPhoto => {
                    warn!("Could not list pools of photo {}, skipping it: {}", photo_id, err);
                    stats.skipped_membership_error += 1;
                    continue;
                }
            },
        };

        let reconciliation = reconcile(desired, &memberships);
        stats.skipped_already_added += reconciliation.already_member;

        for group_id in &reconciliation.candidates {
            let now = clock.now();
            let entry = state.entry_mut(photo_id, group_id);
            if throttle::attempted_on_day(entry, now) {
                info!(
                    "Photo {} -> group {} already attempted today ({}, UTC), skipping",
                    photo_id,
                    group_id,
                    now.date_naive()
                );
                stats.skipped_too_soon += 1;
                continue;
            }
            let status = attempt::attempt_add(service, photo_id, group_id, entry, now).await;
            stats.record(status);
        }
    }
    Ok(())
}
