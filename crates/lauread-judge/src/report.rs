use std::fmt;

use crate::JudgmentTier;

/// Number of judgments per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JudgmentCounts {
    counts: [u32; JudgmentTier::COUNT],
}

impl JudgmentCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds counts from `(tier, count)` pairs; unlisted tiers count zero.
    ///
    /// ```
    /// use lauread_judge::{JudgmentCounts, JudgmentTier};
    ///
    /// let counts = JudgmentCounts::from_pairs([(JudgmentTier::Hit300, 10)]);
    /// assert_eq!(counts.total(), 10);
    /// assert_eq!(counts.accuracy(), 100.0);
    /// ```
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (JudgmentTier, u32)>,
    {
        let mut counts = Self::new();
        for (tier, count) in pairs {
            counts.counts[tier.index()] += count;
        }
        counts
    }

    pub fn record(&mut self, tier: JudgmentTier) {
        self.counts[tier.index()] += 1;
    }

    #[must_use]
    pub fn get(&self, tier: JudgmentTier) -> u32 {
        self.counts[tier.index()]
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Accuracy in percent, rounded half to even at two decimals; `0.0` with
    /// no judgments.
    ///
    /// `100 · Σ score(tier) · count(tier) / (300 · total)`
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let weighted = JudgmentTier::ALL
            .iter()
            .map(|tier| u64::from(tier.score()) * u64::from(self.get(*tier)))
            .sum::<u64>();
        #[expect(clippy::cast_precision_loss)]
        let accuracy = 100.0 * weighted as f64 / (300.0 * f64::from(total));
        (accuracy * 100.0).round_ties_even() / 100.0
    }
}

/// Result of judging one play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgmentReport {
    pub overall_difficulty: f64,
    pub counts: JudgmentCounts,
}

impl JudgmentReport {
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.counts.accuracy()
    }
}

/// Renders one `<tier>: <count>` line per tier followed by the accuracy.
impl fmt::Display for JudgmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tier in JudgmentTier::ALL {
            writeln!(f, "{tier}: {}", self.counts.get(tier))?;
        }
        writeln!(f, "Accuracy: {:.2}%", self.accuracy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_300_is_full_accuracy() {
        let counts = JudgmentCounts::from_pairs([(JudgmentTier::Hit300, 10)]);
        assert_eq!(counts.accuracy(), 100.0);
    }

    #[test]
    fn test_max_counts_as_300() {
        let counts = JudgmentCounts::from_pairs([(JudgmentTier::Max, 3), (JudgmentTier::Hit300, 1)]);
        assert_eq!(counts.accuracy(), 100.0);
    }

    #[test]
    fn test_empty_is_zero_accuracy() {
        assert_eq!(JudgmentCounts::new().accuracy(), 0.0);
    }

    #[test]
    fn test_mixed_accuracy_rounded() {
        let counts = JudgmentCounts::from_pairs([
            (JudgmentTier::Max, 1),
            (JudgmentTier::Hit200, 1),
            (JudgmentTier::Hit50, 1),
        ]);
        // (300 + 200 + 50) / 900 = 61.111…
        assert_eq!(counts.accuracy(), 61.11);
    }

    #[test]
    fn test_accuracy_tie_rounds_to_even() {
        // 291 * 50 / (400 * 300) = 12.125 exactly
        let report = JudgmentReport {
            overall_difficulty: 5.0,
            counts: JudgmentCounts::from_pairs([
                (JudgmentTier::Hit50, 291),
                (JudgmentTier::Miss, 109),
            ]),
        };
        assert_eq!(report.accuracy(), 12.12);
        assert!(report.to_string().ends_with("Accuracy: 12.12%
"));
    }

    #[test]
    fn test_all_misses() {
        let counts = JudgmentCounts::from_pairs([(JudgmentTier::Miss, 4)]);
        assert_eq!(counts.accuracy(), 0.0);
    }

    #[test]
    fn test_report_format() {
        let report = JudgmentReport {
            overall_difficulty: 5.0,
            counts: JudgmentCounts::from_pairs([
                (JudgmentTier::Max, 2),
                (JudgmentTier::Hit100, 1),
                (JudgmentTier::Miss, 1),
            ]),
        };
        assert_eq!(
            report.to_string(),
            "MAX: 2\n300: 0\n200: 0\n100: 1\n50: 0\n0: 1\nAccuracy: 58.33%\n"
        );
    }

    #[test]
    fn test_report_format_empty() {
        let report = JudgmentReport {
            overall_difficulty: 0.0,
            counts: JudgmentCounts::new(),
        };
        assert!(report.to_string().ends_with("Accuracy: 0.00%\n"));
    }
}
