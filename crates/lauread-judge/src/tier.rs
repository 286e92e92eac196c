use crate::JudgeError;

/// Judgment tier, from tightest to loosest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
)]
pub enum JudgmentTier {
    #[display("MAX")]
    Max,
    #[display("300")]
    Hit300,
    #[display("200")]
    Hit200,
    #[display("100")]
    Hit100,
    #[display("50")]
    Hit50,
    #[display("0")]
    Miss,
}

impl JudgmentTier {
    pub const COUNT: usize = 6;

    /// All tiers, tightest first.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Max,
        Self::Hit300,
        Self::Hit200,
        Self::Hit100,
        Self::Hit50,
        Self::Miss,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Points a hit in this tier contributes towards accuracy (out of 300).
    #[must_use]
    pub const fn score(self) -> u32 {
        match self {
            Self::Max | Self::Hit300 => 300,
            Self::Hit200 => 200,
            Self::Hit100 => 100,
            Self::Hit50 => 50,
            Self::Miss => 0,
        }
    }
}

/// Half-width tolerances (ms) of every tier for one overall difficulty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierWindows {
    half_widths: [f64; JudgmentTier::COUNT],
}

impl TierWindows {
    /// Derives tier windows from the overall difficulty `D`.
    ///
    /// Fails when `D` is not finite or so large that the windows would no
    /// longer widen strictly from MAX to 0 (the 300 window drops to 16 ms at
    /// `D = 16`).
    ///
    /// ```
    /// use lauread_judge::{JudgmentTier, TierWindows};
    ///
    /// let windows = TierWindows::new(5.0).unwrap();
    /// let widths: Vec<f64> = JudgmentTier::ALL.iter().map(|t| windows.half_width(*t)).collect();
    /// assert_eq!(widths, vec![16.0, 49.0, 82.0, 112.0, 136.0, 173.0]);
    /// ```
    pub fn new(overall_difficulty: f64) -> Result<Self, JudgeError> {
        let d = overall_difficulty;
        if !d.is_finite() {
            return Err(JudgeError::InvalidDifficulty { difficulty: d });
        }
        let half_widths = [
            16.0,
            64.0 - 3.0 * d,
            97.0 - 3.0 * d,
            127.0 - 3.0 * d,
            151.0 - 3.0 * d,
            188.0 - 3.0 * d,
        ];
        if !half_widths.is_sorted_by(|a, b| a < b) {
            return Err(JudgeError::InvalidDifficulty { difficulty: d });
        }
        Ok(Self { half_widths })
    }

    #[must_use]
    pub fn half_width(&self, tier: JudgmentTier) -> f64 {
        self.half_widths[tier.index()]
    }

    /// Classifies an absolute timing error in ms.
    ///
    /// Window boundaries are inclusive, so an error exactly on a boundary
    /// belongs to the tighter tier.
    #[must_use]
    pub fn classify(&self, abs_error: u64) -> JudgmentTier {
        #[expect(clippy::cast_precision_loss)]
        let error = abs_error as f64;
        JudgmentTier::ALL
            .into_iter()
            .find(|tier| error <= self.half_width(*tier))
            .unwrap_or(JudgmentTier::Miss)
    }
}
