use chrono::{DateTime, Utc};
use providers::{AddOutcome, PhotoService};
use storage::models::{AddAttempt, AttemptStatus, StateEntry};
use tracing::{info, warn};

/// Tries one add and appends its outcome to `entry`, whatever it is.
pub async fn attempt_add(
    service: &dyn PhotoService,
    photo_id: &str,
    group_id: &str,
    entry: &mut StateEntry,
    now: DateTime<Utc>,
) -> AttemptStatus {
    info!("Attempting to add photo {} to group {}", photo_id, group_id);
    let outcome = AddOutcome::from_add_result(service.add_to_pool(photo_id, group_id).await);
    match &outcome {
        AddOutcome::Added => info!("Success!"),
        AddOutcome::Queued => info!("Success (added to pending queue)!"),
        AddOutcome::Failed(reason) => warn!("{}", reason),
    }
    record_outcome(entry, outcome, now)
}

pub fn record_outcome(
    entry: &mut StateEntry,
    outcome: AddOutcome,
    at: DateTime<Utc>,
) -> AttemptStatus {
    let (status, error_message) = match outcome {
        AddOutcome::Added => {
            entry.photo_added = true;
            (AttemptStatus::SuccessAdded, None)
        }
        AddOutcome::Queued => (AttemptStatus::SuccessQueued, None),
        AddOutcome::Failed(reason) => (AttemptStatus::Fail, Some(reason)),
    };
    entry.attempts.push(AddAttempt {
        timestamp: at,
        status,
        error_message,
    });
    status
}
