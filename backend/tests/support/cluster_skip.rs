//! Skip policy for suites that need the embedded PostgreSQL cluster.
//!
//! Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start; otherwise a
//! bootstrap failure fails the test so CI breakage stays visible.

/// Truthy values: "1", "true", "yes" (case-insensitive).
pub(crate) fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Print a skip marker and return `None`, or panic when skipping is not
/// allowed.
pub(crate) fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
