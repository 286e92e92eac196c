use std::path::PathBuf;

use anyhow::Context as _;
use lauread_training::predictor;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct JudgeArg {
    /// Chart file the keystrokes were played on
    #[arg(long)]
    chart: PathBuf,
    /// Keystroke ledger to judge
    ///
    /// Presses are paired with chart notes in order, so the ledger must hold
    /// exactly one keystroke per note. Recorded plays rarely do; judge
    /// predicted offsets with `--offsets` instead.
    #[arg(long, required_unless_present = "offsets", conflicts_with = "offsets")]
    ledger: Option<PathBuf>,
    /// Synthetic keystroke offset file to judge
    #[arg(long)]
    offsets: Option<PathBuf>,
    /// Report output path [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &JudgeArg) -> anyhow::Result<()> {
    let JudgeArg {
        chart,
        ledger,
        offsets,
        output,
    } = arg;

    let chart_path = chart;
    let chart = util::read_chart_file(chart_path)?;
    let (hits_path, hits): (_, Vec<i64>) = match (ledger, offsets) {
        (Some(path), _) => {
            let hits: Vec<i64> = util::read_ledger_file(path)?.press_times().collect();
            if hits.len() != chart.notes.len() {
                anyhow::bail!(
                    "ledger {} has {} keystrokes but chart {} has {} notes; \
                     ledger presses are paired with notes in order and must match one to one",
                    path.display(),
                    hits.len(),
                    chart_path.display(),
                    chart.notes.len()
                );
            }
            (path, hits)
        }
        (None, Some(path)) => {
            let text = util::read_text_file("offset", path)?;
            let keystrokes = predictor::parse_offsets(&text)
                .with_context(|| format!("Failed to parse offset file: {}", path.display()))?;
            (path, keystrokes.iter().map(|k| k.keypress_time).collect())
        }
        (None, None) => anyhow::bail!("either --ledger or --offsets is required"),
    };

    let notes: Vec<i64> = chart.timestamps().collect();
    let report = lauread_judge::judge(&notes, &hits, chart.overall_difficulty).with_context(|| {
        format!(
            "Failed to judge {} against {}",
            hits_path.display(),
            chart_path.display()
        )
    })?;
    tracing::info!(
        notes = notes.len(),
        accuracy = report.accuracy(),
        "judged keystrokes"
    );

    let mut output = Output::from_output_path(output.clone())?;
    output.write_display(&report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const CHART: &str = "[Difficulty]\nOverallDifficulty:5\n[HitObjects]\n\
                         36,192,1000,1,0\n36,192,1500,1,0\n";

    fn judge_arg(dir: &std::path::Path, ledger: Option<&str>, offsets: Option<&str>) -> JudgeArg {
        JudgeArg {
            chart: dir.join("song.osu"),
            ledger: ledger.map(|name| dir.join(name)),
            offsets: offsets.map(|name| dir.join(name)),
            output: Some(dir.join("report.txt")),
        }
    }

    #[test]
    fn test_judge_offsets() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("song.osu"), CHART).unwrap();
        fs::write(root.join("song.writency"), "1010,0,1080\n1700,0,1760\n").unwrap();

        run(&judge_arg(root, None, Some("song.writency"))).unwrap();
        let report = fs::read_to_string(root.join("report.txt")).unwrap();
        assert_eq!(
            report,
            "MAX: 1\n300: 0\n200: 0\n100: 0\n50: 0\n0: 1\nAccuracy: 50.00%\n"
        );
    }

    #[test]
    fn test_judge_ledger_requires_one_keystroke_per_note() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("song.osu"), CHART).unwrap();
        fs::write(
            root.join("song.lauread"),
            "ReplayData:\n1000,1,1060\n1200,2,1230\n1490,1,1550\n",
        )
        .unwrap();

        let err = run(&judge_arg(root, Some("song.lauread"), None)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("3 keystrokes"));
        assert!(message.contains("2 notes"));
        assert!(!root.join("report.txt").exists());
    }
}
