use chrono::{DateTime, Utc};
use storage::models::StateEntry;

/// True when the entry already holds an attempt on `now`'s UTC calendar day.
pub fn attempted_on_day(entry: &StateEntry, now: DateTime<Utc>) -> bool {
    let today = now.date_naive();
    entry
        .attempts
        .iter()
        .any(|attempt| attempt.timestamp.date_naive() == today)
}
