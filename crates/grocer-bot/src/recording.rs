// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric descriptions for the bot layer.

use metrics::describe_counter;

/// Describes every counter the bot and the crates under it emit.
pub fn register_metrics() {
    grocer_suggest::recording::register_metrics();
    describe_counter!("grocer_commands_total", "Chat commands handled, by command");
    describe_counter!(
        "grocer_fanout_failures_total",
        "Chats whose weekly suggestions could not be sent"
    );
    describe_counter!(
        "grocer_sessions_finalized_total",
        "Pickers applied to the list, by kind"
    );
}
