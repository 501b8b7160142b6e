use cli::report::render_stats;
use fga_core::driver::RunStats;

#[test]
fn summary_lists_counters_sorted() {
    let stats = RunStats {
        skipped_already_added: 4,
        skipped_too_soon: 1,
        attempted_success_added: 2,
        attempted_success_queued: 1,
        attempted_fail: 3,
        skipped_membership_error: 0,
    };
    let expected = "\nOperation stats:\n{
    \"attempted_fail\": 3,
    \"attempted_success_added\": 2,
    \"attempted_success_queued\": 1,
    \"skipped_already_added\": 4,
    \"skipped_too_soon\": 1
}";
    assert_eq!(render_stats(&stats).unwrap(), expected);
}

#[test]
fn membership_error_counter_appears_only_when_used() {
    let stats = RunStats {
        skipped_membership_error: 2,
        ..RunStats::default()
    };
    let expected = "\nOperation stats:\n{
    \"attempted_fail\": 0,
    \"attempted_success_added\": 0,
    \"attempted_success_queued\": 0,
    \"skipped_already_added\": 0,
    \"skipped_membership_error\": 2,
    \"skipped_too_soon\": 0
}";
    assert_eq!(render_stats(&stats).unwrap(), expected);
}
