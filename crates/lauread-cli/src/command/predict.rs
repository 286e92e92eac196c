use std::path::PathBuf;

use anyhow::Context as _;
use lauread_training::{Predictor, predictor};

use crate::util::{self, Output};

/// Extension of generated offset files.
const OFFSET_EXTENSION: &str = "writency";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PredictArg {
    /// Model file written by `train`
    #[arg(long)]
    model: PathBuf,
    /// Charts to generate keystrokes for
    #[arg(required = true)]
    charts: Vec<PathBuf>,
    /// Directory for the `.writency` files [default: next to each chart]
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

pub(crate) fn run(arg: &PredictArg) -> anyhow::Result<()> {
    let PredictArg {
        model,
        charts,
        output_dir,
    } = arg;

    let model_file = util::read_model_file(model)?;
    let offset_predictor = Predictor::new(&model_file.model)
        .with_context(|| format!("Unusable model file: {}", model.display()))?;
    tracing::info!(
        name = %model_file.name,
        trained_at = %model_file.trained_at,
        "loaded model"
    );

    for chart_path in charts {
        let chart = util::read_chart_file(chart_path)?;
        let keystrokes = offset_predictor.predict(&chart);

        let output_path = util::sibling_path(chart_path, output_dir.as_deref(), OFFSET_EXTENSION);
        let mut output = Output::open(output_path)?;
        predictor::write_offsets(&mut output, &keystrokes)
            .with_context(|| format!("Failed to write offsets to {}", output.display_path()))?;
        tracing::info!(
            chart = %chart_path.display(),
            keystrokes = keystrokes.len(),
            path = %output.display_path(),
            "wrote synthetic keystrokes"
        );
    }
    Ok(())
}
