use std::path::PathBuf;

use lauread_core::{GameMode, Ledger};

use crate::{dataset::LEDGER_EXTENSION, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ConvertArg {
    /// Decoded replay JSON file
    replay: PathBuf,
    /// Output ledger path [default: replay path with a `.lauread` extension]
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ConvertArg) -> anyhow::Result<()> {
    let ConvertArg { replay, output } = arg;

    let decoded = util::read_replay_file(replay)?;
    if decoded.mode != GameMode::Mania {
        tracing::warn!(
            mode = %decoded.mode,
            "replay is not a MANIA replay, keys may not map to columns"
        );
    }
    let ledger = Ledger::from_replay(&decoded);

    let output_path = output
        .clone()
        .unwrap_or_else(|| util::sibling_path(replay, None, LEDGER_EXTENSION));
    let mut output = util::Output::open(output_path)?;
    output.write_display(&ledger)?;

    tracing::info!(
        keystrokes = ledger.keystrokes.len(),
        path = %output.display_path(),
        "wrote keystroke ledger"
    );
    Ok(())
}
