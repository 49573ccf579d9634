// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly suggestion fan-out over every registered chat.

use tracing::{error, info};

use grocer_core::GrocerError;

use crate::handlers::{GrocerBot, SuggestionDelivery};

/// Tally of one fan-out run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutReport {
    pub chats: usize,
    /// Chats that received a suggestion batch.
    pub sent: usize,
    /// Chats that got the "no suggestions yet" note.
    pub empty: usize,
    pub failed: usize,
}

impl GrocerBot {
    /// Sends suggestions to every registered chat, one at a time.
    ///
    /// A failure for one chat is logged and counted; the remaining chats
    /// are still served and nothing is retried. Only failing to list the
    /// chats is an error.
    pub async fn send_weekly_suggestions(&self) -> Result<FanoutReport, GrocerError> {
        let chats = self.storage().list_chats().await?;
        let mut report = FanoutReport {
            chats: chats.len(),
            ..FanoutReport::default()
        };

        for chat in chats {
            match self.send_suggestions(chat.chat_id).await {
                Ok(SuggestionDelivery::Sent(_)) => report.sent += 1,
                Ok(SuggestionDelivery::Empty) => report.empty += 1,
                Err(e) => {
                    report.failed += 1;
                    metrics::counter!("grocer_fanout_failures_total").increment(1);
                    error!(chat_id = chat.chat_id, error = %e, "failed to send weekly suggestions");
                }
            }
        }

        info!(
            chats = report.chats,
            sent = report.sent,
            empty = report.empty,
            failed = report.failed,
            "weekly suggestions sent"
        );
        Ok(report)
    }
}
