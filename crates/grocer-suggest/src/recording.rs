// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; nothing is collected unless the binary
//! installs a recorder.

use metrics::describe_counter;

/// Register descriptions for the suggestion metrics.
pub fn register_metrics() {
    describe_counter!(
        "grocer_suggestions_sent_total",
        "Suggestion entries offered to chats"
    );
    describe_counter!(
        "grocer_feedback_total",
        "Accept/skip decisions recorded"
    );
    describe_counter!(
        "grocer_refinements_total",
        "Model refinement attempts by outcome"
    );
}

pub fn record_suggestions_sent(count: usize) {
    metrics::counter!("grocer_suggestions_sent_total").increment(count as u64);
}

pub fn record_feedback(accepted: bool) {
    let kind = if accepted { "accept" } else { "reject" };
    metrics::counter!("grocer_feedback_total", "kind" => kind).increment(1);
}

pub fn record_refinement(outcome: &'static str) {
    metrics::counter!("grocer_refinements_total", "outcome" => outcome).increment(1);
}
