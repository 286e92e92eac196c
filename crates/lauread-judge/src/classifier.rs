use crate::{JudgmentCounts, JudgmentReport, TierWindows};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum JudgeError {
    #[display("{notes} notes cannot be paired with {hits} hit times")]
    LengthMismatch { notes: usize, hits: usize },
    #[display("overall difficulty {difficulty} does not yield valid timing windows")]
    InvalidDifficulty { difficulty: f64 },
}

/// Judges hit times against note timestamps.
///
/// `notes[i]` is paired with `hits[i]`. The slices must have the same length;
/// a mismatch is reported before anything is judged.
///
/// # Errors
///
/// - [`JudgeError::LengthMismatch`] if the slices differ in length
/// - [`JudgeError::InvalidDifficulty`] if `overall_difficulty` is unusable
pub fn judge(
    notes: &[i64],
    hits: &[i64],
    overall_difficulty: f64,
) -> Result<JudgmentReport, JudgeError> {
    if notes.len() != hits.len() {
        return Err(JudgeError::LengthMismatch {
            notes: notes.len(),
            hits: hits.len(),
        });
    }
    let windows = TierWindows::new(overall_difficulty)?;

    let mut counts = JudgmentCounts::new();
    for (note, hit) in notes.iter().zip(hits) {
        counts.record(windows.classify(hit.abs_diff(*note)));
    }

    Ok(JudgmentReport {
        overall_difficulty,
        counts,
    })
}
