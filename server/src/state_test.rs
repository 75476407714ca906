use super::*;

#[test]
fn usage_stats_start_at_zero() {
    let stats = UsageStats::default();
    assert_eq!(stats.snapshot(), UsageSnapshot { total_requests: 0, search_requests: 0 });
}

#[test]
fn record_request_returns_ordinal() {
    let stats = UsageStats::default();
    assert_eq!(stats.record_request(), 1);
    assert_eq!(stats.record_request(), 2);
    stats.record_search();
    assert_eq!(stats.snapshot(), UsageSnapshot { total_requests: 2, search_requests: 1 });
}

#[test]
fn cloned_state_shares_counters() {
    let state = test_helpers::test_app_state();
    let clone = state.clone();
    clone.stats.record_search();
    assert_eq!(state.stats.snapshot().search_requests, 1);
    assert!(state.llm.is_none());
    assert!(state.corpus.is_empty());
}
