// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational layer of the Grocer list bot.
//!
//! The [`BotLoop`] pulls events from a channel adapter and hands each one to
//! [`GrocerBot`], which implements the chat commands, suggestion buttons and
//! picker buttons. The [`WeeklyScheduler`](scheduler::WeeklyScheduler) runs
//! the weekly fan-out next to it.

pub mod command;
pub mod fanout;
pub mod handlers;
pub mod recording;
pub mod replies;
pub mod scheduler;
pub mod shutdown;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use grocer_core::GrocerError;

pub use fanout::FanoutReport;
pub use handlers::{BotSettings, GrocerBot, SuggestionDelivery};
pub use recording::register_metrics;
pub use scheduler::{TickReport, WeeklyScheduler};

/// Receives events one at a time and handles each to completion.
pub struct BotLoop {
    bot: Arc<GrocerBot>,
}

impl BotLoop {
    pub fn new(bot: Arc<GrocerBot>) -> Self {
        Self { bot }
    }

    /// Runs until `cancel` fires or the channel closes.
    ///
    /// A failed event is logged and the loop moves on to the next one.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), GrocerError> {
        info!("bot loop running");
        let channel = self.bot.channel().clone();

        loop {
            tokio::select! {
                event = channel.receive() => {
                    match event {
                        Ok(event) => {
                            if let Err(e) = self.bot.handle_event(event).await {
                                error!(error = %e, "failed to handle inbound event");
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping bot loop");
                    break;
                }
            }
        }

        info!("bot loop stopped");
        Ok(())
    }
}
