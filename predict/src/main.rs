use std::fs::File;
use std::io::{stdout, Write};
use std::path::PathBuf;

use clap::Parser;
use conjugal::{
    labeled_rows, probs_to_preds, Dataset, LabelModel, LabelingFunction, LfApplier,
    TieBreakPolicy,
};
use conjugal_rules::lf_by_name;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "A program to produce probabilistic labels with a label model.")]
struct Args {
    /// The model file to use when labeling candidates
    #[arg(long)]
    model: PathBuf,

    /// A CSV split to label
    #[arg(long)]
    data: PathBuf,

    /// The CSV file to write labels to (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Drop candidates on which every labeling function abstained
    #[arg(long)]
    filter_unlabeled: bool,

    /// Tie-break policy: {abstain, random}.
    #[arg(long, default_value = "abstain")]
    tie_break: TieBreakPolicy,
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
    let l = applier.apply(dataset.candidates());
    let probs = model.predict_proba(&l)?;
    let preds = probs_to_preds(probs.view(), args.tie_break);

    let rows: Vec<usize> = if args.filter_unlabeled {
        labeled_rows(&l)
    } else {
        (0..l.n_rows()).collect()
    };

    let out: Box<dyn Write> = match args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(stdout().lock()),
    };
    let mut wtr = csv::Writer::from_writer(out);
    let mut header = vec!["index".to_string(), "sentence".to_string()];
    header.extend((0..model.cardinality()).map(|y| format!("prob_{y}")));
    header.push("pred".to_string());
    wtr.write_record(&header)?;
    for &i in &rows {
        let mut record = vec![i.to_string(), dataset.candidates()[i].sentence().to_string()];
        record.extend(probs.row(i).iter().map(|p| p.to_string()));
        record.push(preds[i].to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    info!(written = rows.len(), total = dataset.len(), "wrote probabilistic labels");

    Ok(())
}
