/*
    Metrics - counters for room resolution

    Provides counters for:
    - Resolutions, labeled by outcome (empty, rooms)
    - Directory reads that were degraded to an empty result

    No exporter is installed here; a binary that wants Prometheus or similar
    installs a recorder before calling init_metrics.
*/

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    describe_counter!(
        "roomgate_resolutions_total",
        "Total number of room access resolutions, labeled by outcome (empty, rooms)"
    );

    describe_counter!(
        "roomgate_directory_reads_degraded_total",
        "Directory reads that failed or timed out and were treated as empty, labeled by read"
    );

    describe_histogram!(
        "roomgate_resolution_duration_seconds",
        "Time spent resolving the visible rooms for one user"
    );
}

/// Record a finished resolution
pub fn resolution_completed(outcome: &'static str, elapsed: Duration) {
    counter!("roomgate_resolutions_total", "outcome" => outcome).increment(1);
    histogram!("roomgate_resolution_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record a directory read degraded to an empty result
pub fn directory_read_degraded(read: &'static str) {
    counter!("roomgate_directory_reads_degraded_total", "read" => read).increment(1);
}
