use std::path::PathBuf;

use anyhow::Context as _;
use lauread_analysis::sample::TrainingSample;
use lauread_training::{ForestParams, Trainer, TrainerConfig};

use crate::{dataset, schema::model::ModelFile, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Directory holding `<stem>.osu` charts with matching `<stem>.lauread`
    /// ledgers or `<stem>.json` decoded replays
    #[arg(long, default_value = "training")]
    training_dir: PathBuf,
    /// Model output path [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
    /// Name recorded in the model file
    #[arg(long, default_value = "offsets")]
    name: String,
    /// Number of trees per forest
    #[arg(long, default_value_t = 100)]
    trees: usize,
    /// Seed for bootstrap sampling
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Maximum tree depth [default: unlimited]
    #[arg(long)]
    max_depth: Option<usize>,
    #[arg(long, default_value_t = 1)]
    min_samples_leaf: usize,
    #[arg(long, default_value_t = 2)]
    min_samples_split: usize,
    /// Fraction of samples held out for the R² diagnostic
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,
    /// Seed for the held-out split
    #[arg(long, default_value_t = 42)]
    split_seed: u64,
}

impl TrainArg {
    fn config(&self) -> TrainerConfig {
        TrainerConfig {
            forest: ForestParams {
                n_trees: self.trees,
                seed: self.seed,
                max_depth: self.max_depth,
                min_samples_leaf: self.min_samples_leaf,
                min_samples_split: self.min_samples_split,
            },
            test_fraction: self.test_fraction,
            split_seed: self.split_seed,
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let files = dataset::find_pairs(&arg.training_dir)?;
    tracing::info!(
        pairs = files.len(),
        dir = %arg.training_dir.display(),
        "found chart/replay pairs"
    );
    let pairs = files
        .iter()
        .map(dataset::PairedFiles::load)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let samples = TrainingSample::from_pairs(&pairs).with_context(|| {
        format!(
            "Failed to build training samples from {}",
            arg.training_dir.display()
        )
    })?;

    let config = arg.config();
    let (model, report) = Trainer::new(config)
        .train(&samples)
        .context("Failed to train offset models")?;

    let model_file = ModelFile::new(arg.name.clone(), config, report, model);
    Output::save_json(&model_file, arg.output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model_file.name);
    eprintln!("  Trained at: {}", model_file.trained_at);
    eprintln!("  Samples: {}", report.samples);
    eprintln!("  Hit model R²: {}", format_score(report.hit_r2));
    eprintln!("  Release model R²: {}", format_score(report.release_r2));
    eprintln!("  Hit model MAE: {} ms", format_score(report.hit_mae));
    eprintln!("  Release model MAE: {} ms", format_score(report.release_mae));

    Ok(())
}

fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_owned(), |score| format!("{score:.4}"))
}
