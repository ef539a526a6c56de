//! Metrics for the finder.

use crate::Report;
use retryable_protocol::RetryableStatus;

/// Container for the finder's metric names.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Identifier for the counter of classified retryables, labeled by status.
    pub const CLASSIFIED_TOTAL: &'static str = "retryables_classified_total";

    /// Identifier for the counter of retryables that could not be classified, labeled by kind.
    pub const PAIR_ERRORS_TOTAL: &'static str = "retryables_pair_errors_total";

    /// Initializes metrics for the finder.
    ///
    /// This does two things:
    /// * Describes the finder metrics.
    /// * Zeroes every status counter so it is exported before the first run.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::CLASSIFIED_TOTAL,
            metrics::Unit::Count,
            "Total number of retryables classified, by status",
        );
        metrics::describe_counter!(
            Self::PAIR_ERRORS_TOTAL,
            metrics::Unit::Count,
            "Total number of retryables that could not be classified, by error kind",
        );
    }

    fn zero() {
        for status in RetryableStatus::ALL {
            metrics::counter!(Self::CLASSIFIED_TOTAL, "status" => status.to_string()).increment(0);
        }
    }

    /// Records the outcome of a finder run.
    pub fn record_report(report: &Report) {
        for result in report.pending.iter().chain(&report.redeemed) {
            metrics::counter!(Self::CLASSIFIED_TOTAL, "status" => result.status.to_string())
                .increment(1);
        }
        for failure in &report.failures {
            metrics::counter!(Self::PAIR_ERRORS_TOTAL, "kind" => failure.error.kind())
                .increment(1);
        }
    }
}
