use clap::{Parser, Subcommand};

use self::{convert::ConvertArg, judge::JudgeArg, predict::PredictArg, train::TrainArg};

mod convert;
mod judge;
mod predict;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Convert a decoded replay into a keystroke ledger
    Convert(#[clap(flatten)] ConvertArg),
    /// Judge keystrokes against a chart and print the judgment report
    Judge(#[clap(flatten)] JudgeArg),
    /// Train offset models on chart/replay pairs
    Train(#[clap(flatten)] TrainArg),
    /// Generate synthetic keystroke offset files for charts
    Predict(#[clap(flatten)] PredictArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Convert(arg) => convert::run(&arg)?,
        Mode::Judge(arg) => judge::run(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Predict(arg) => predict::run(&arg)?,
    }
    Ok(())
}
