// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Preference score of an item from its accept/reject counters.

use grocer_core::types::ItemStats;

const RATE_WEIGHT: f64 = 0.7;
const VOLUME_WEIGHT: f64 = 0.3;

/// `accept_rate * 0.7 + ln(1 + accepts) / 4 * 0.3`, or 0.0 without feedback.
///
/// The volume term grows slowly, so a long-accepted staple edges out an item
/// accepted once with the same rate.
pub fn score(accepts: u32, rejects: u32) -> f64 {
    let total = u64::from(accepts) + u64::from(rejects);
    if total == 0 {
        return 0.0;
    }
    let accepts = f64::from(accepts);
    let rate = accepts / total as f64;
    let volume = accepts.ln_1p() / 4.0;
    rate * RATE_WEIGHT + volume * VOLUME_WEIGHT
}

pub fn score_stats(stats: &ItemStats) -> f64 {
    score(stats.accepts, stats.rejects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn no_feedback_scores_zero() {
        assert_eq!(score(0, 0), 0.0);
    }

    #[test]
    fn known_values() {
        assert!((score(5, 0) - (0.7 + 6f64.ln() / 4.0 * 0.3)).abs() < 1e-12);
        assert!((score(1, 4) - (0.2 * 0.7 + 2f64.ln() / 4.0 * 0.3)).abs() < 1e-12);
        // Rejected only: rate and volume both zero.
        assert_eq!(score(0, 3), 0.0);
    }

    proptest! {
        #[test]
        fn monotone_in_accepts(accepts in 0u32..10_000, rejects in 0u32..10_000) {
            prop_assert!(score(accepts + 1, rejects) > score(accepts, rejects));
        }

        #[test]
        fn any_accept_beats_no_feedback(accepts in 1u32..10_000, rejects in 0u32..10_000) {
            prop_assert!(score(accepts, rejects) > score(0, 0));
        }
    }
}
