// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Suggestion ranking and feedback learning for the Grocer list bot.
//!
//! Each chat's accept/reject counters are turned into a ranked list of items
//! worth re-ordering. Suggestions go out as batches of buttons, and each
//! answer feeds back into the counters exactly once.

pub mod batch;
pub mod feedback;
pub mod ranker;
pub mod recording;
pub mod refine;
pub mod score;

pub use batch::{RespondOutcome, SUGGESTIONS_HEADER, create_batch, respond, suggestion_keyboard};
pub use feedback::record_feedback;
pub use ranker::{Candidate, SuggestionRanker};
pub use score::score;
