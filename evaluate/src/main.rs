use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use conjugal::{Dataset, LabelModel, LabelingFunction, LfAnalysis, LfApplier, Metric, TieBreakPolicy};
use conjugal_rules::lf_by_name;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "A program to evaluate a label model against gold labels.")]
struct Args {
    /// The model file to evaluate
    #[arg(long)]
    model: PathBuf,

    /// A gold-labeled CSV split
    #[arg(long)]
    data: PathBuf,

    /// Evaluation metric: {accuracy, precision, recall, f1, coverage}. Can be repeated.
    #[arg(long, default_values = ["accuracy", "f1"])]
    metric: Vec<Metric>,

    /// Tie-break policy: {abstain, random}.
    #[arg(long, default_value = "abstain")]
    tie_break: TieBreakPolicy,

    /// Also print the labeling function summary of the split
    #[arg(long)]
    summary: bool,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging();

    info!("Loading model file...");
    let mut f = zstd::Decoder::new(File::open(args.model)?)?;
    let model = LabelModel::read(&mut f)?;

    let lfs = model
        .lf_names()
        .iter()
        .map(|name| lf_by_name(name).ok_or_else(|| format!("unknown labeling function: {name}")))
        .collect::<Result<Vec<Box<dyn LabelingFunction>>, _>>()?;
    let applier = LfApplier::new(lfs)?;

    let dataset = Dataset::from_path(&args.data)?;
    let gold = dataset
        .gold()
        .ok_or("the dataset has no gold labels")?;

    let l = applier.apply(dataset.candidates());
    if args.summary {
        let summary = LfAnalysis::new(&l).lf_summary(model.lf_names(), Some(gold))?;
        print!("{}", summary);
    }

    for (metric, score) in model.score(&l, gold, &args.metric, args.tie_break)? {
        println!("{}: {}", metric, score);
    }

    Ok(())
}
