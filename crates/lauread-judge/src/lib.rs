//! Timing-window judgment of hit times against chart notes.
//!
//! Each note is paired positionally with one hit time. The absolute timing
//! error is compared against six tolerance windows whose half-widths shrink
//! as the chart's overall difficulty `D` grows:
//!
//! | tier | half-width (ms) |
//! |------|-----------------|
//! | MAX  | 16              |
//! | 300  | 64 − 3D         |
//! | 200  | 97 − 3D         |
//! | 100  | 127 − 3D        |
//! | 50   | 151 − 3D        |
//! | 0    | 188 − 3D        |
//!
//! The first (tightest) window containing the error decides the tier; errors
//! beyond every window are misses. Tier counts are summarized as an accuracy
//! percentage in a [`JudgmentReport`].
//!
//! # Example
//!
//! ```
//! use lauread_judge::{JudgmentTier, judge};
//!
//! let notes = [1000, 2000, 3000];
//! let hits = [1005, 2049, 3500];
//! let report = judge(&notes, &hits, 5.0).unwrap();
//! assert_eq!(report.counts.get(JudgmentTier::Max), 1);
//! assert_eq!(report.counts.get(JudgmentTier::Hit300), 1);
//! assert_eq!(report.counts.get(JudgmentTier::Miss), 1);
//! assert_eq!(report.accuracy(), 66.67);
//! ```

pub use self::{
    classifier::{JudgeError, judge},
    report::{JudgmentCounts, JudgmentReport},
    tier::{JudgmentTier, TierWindows},
};

pub mod classifier;
pub mod report;
pub mod tier;
