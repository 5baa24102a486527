//! Counters for check-in traffic.
//!
//! Recorded through the `metrics` facade; without an installed recorder the
//! calls are no-ops.

use metrics::{counter, describe_counter};

/// Registrations submitted, labelled by `outcome`.
pub const REGISTRATIONS_TOTAL: &str = "checkin_registrations_total";

/// Reports rendered, labelled by `status` (`ok` or `error`).
pub const REPORTS_TOTAL: &str = "checkin_reports_total";

/// Register metric descriptions with the installed recorder.
pub fn describe() {
    describe_counter!(
        REGISTRATIONS_TOTAL,
        "Total number of check-in submissions by outcome"
    );
    describe_counter!(REPORTS_TOTAL, "Total number of report requests by status");
}

pub(crate) fn record_registration(outcome: &'static str) {
    counter!(REGISTRATIONS_TOTAL, "outcome" => outcome).increment(1);
}

pub(crate) fn record_report(status: &'static str) {
    counter!(REPORTS_TOTAL, "status" => status).increment(1);
}
