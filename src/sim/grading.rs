//! Session grading
//!
//! A resolved session passes when the cut ratio reaches the success
//! threshold; passing sessions earn 1 to 3 stars.

use serde::{Deserialize, Serialize};

use crate::tuning::SessionTuning;

/// Fraction of the initial fruit that was cut
///
/// Defined as 1.0 when no fruit was budgeted so such sessions always pass.
pub fn cut_ratio(cut: u32, initial: u32) -> f64 {
    if initial == 0 {
        return 1.0;
    }
    (cut.min(initial) as f64) / (initial as f64)
}

/// Outcome of grading a fully resolved session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Failed,
    Completed { stars: u8 },
}

/// Stars for a cut ratio (0 below the success threshold)
pub fn star_rating(ratio: f64, tuning: &SessionTuning) -> u8 {
    if ratio >= tuning.three_star_ratio {
        3
    } else if ratio >= tuning.two_star_ratio {
        2
    } else if ratio >= tuning.min_success_ratio {
        1
    } else {
        0
    }
}

/// Decide pass/fail once every object is resolved
pub fn grade(ratio: f64, tuning: &SessionTuning) -> Verdict {
    if ratio >= tuning.min_success_ratio {
        Verdict::Completed {
            stars: star_rating(ratio, tuning),
        }
    } else {
        Verdict::Failed
    }
}
