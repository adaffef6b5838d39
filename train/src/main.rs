use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use conjugal::{
    filter_unlabeled, load_data, LabelModel, LabelingFunction, LfAnalysis, LfApplier, Metric,
    Preprocessor, TieBreakPolicy, TrainConfig,
};
use conjugal_rules::{all_lfs, default_lfs, lf_by_name, preprocessors::GetPersonText};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "A program to fit a label model for spouse relation extraction.")]
struct Args {
    /// A directory containing dev.csv, train.csv and test.csv
    #[arg(long)]
    data_dir: PathBuf,

    /// The file to write the trained model to
    #[arg(long)]
    model: Option<PathBuf>,

    /// A labeling function to use. Can be repeated. Defaults to the five spouse heuristics.
    #[arg(long, conflicts_with = "all_lfs")]
    lf: Vec<String>,

    /// Use every available labeling function
    #[arg(long)]
    all_lfs: bool,

    /// Index of the dev candidate to print as a sample
    #[arg(long, default_value = "2")]
    sample: usize,

    /// The number of training epochs
    #[arg(long, default_value = "5000")]
    n_epochs: usize,

    /// Logs the training loss every this number of epochs
    #[arg(long, default_value = "500")]
    log_freq: usize,

    /// The random seed of the parameter initialization
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// The learning rate
    #[arg(long, default_value = "0.01")]
    lr: f64,

    /// The L2 regularization strength
    #[arg(long, default_value = "0.0")]
    l2: f64,

    /// The prior accuracy of labeling functions
    #[arg(long, default_value = "0.7")]
    prec_init: f64,

    /// The number of workers for zstd (0 means multithreaded will be disabled)
    #[arg(long, default_value = "0")]
    zstd_workers: u32,
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

    info!("Loading dataset...");
    let splits = load_data(&args.data_dir)?;

    if let Some(candidate) = splits.dev.candidates().get(args.sample) {
        let mut candidate = candidate.clone();
        GetPersonText.preprocess(&mut candidate);
        if let Some([person1, person2]) = &candidate.person_names {
            println!("Sentence: {}", candidate.sentence());
            println!("Person 1: {}", person1);
            println!("Person 2: {}", person2);
        }
    } else {
        warn!(sample = args.sample, "sample index is out of the dev split");
    }

    let lfs: Vec<Box<dyn LabelingFunction>> = if args.all_lfs {
        all_lfs()
    } else if args.lf.is_empty() {
        default_lfs()
    } else {
        args.lf
            .iter()
            .map(|name| lf_by_name(name).ok_or_else(|| format!("unknown labeling function: {name}")))
            .collect::<Result<_, _>>()?
    };
    let applier = LfApplier::new(lfs)?;
    let names = applier.names();

    info!("Applying dev dataset...");
    let l_dev = applier.apply(splits.dev.candidates());

    info!("Applying train dataset...");
    let l_train = applier.apply(splits.train.candidates());

    let summary = LfAnalysis::new(&l_dev).lf_summary(&names, splits.dev.gold())?;
    println!("Dev summary:");
    print!("{}", summary);

    let train_analysis = LfAnalysis::new(&l_train);
    info!(
        coverage = train_analysis.label_coverage(),
        overlap = train_analysis.label_overlap(),
        conflict = train_analysis.label_conflict(),
        "train label statistics"
    );

    info!("Start training...");
    let config = TrainConfig {
        n_epochs: args.n_epochs,
        lr: args.lr,
        l2: args.l2,
        prec_init: args.prec_init,
        log_freq: args.log_freq,
        seed: args.seed,
        ..Default::default()
    };
    let model = LabelModel::fit(2, &names, &l_train, splits.dev.gold(), &config)?;
    info!("Finish training.");

    info!(class_balance = ?model.class_balance().to_vec(), "class prior");

    for (name, weight) in names.iter().zip(model.get_weights()) {
        info!(lf = %name, weight, "estimated accuracy");
    }

    let probs_train = model.predict_proba(&l_train)?;
    let (kept, _) = filter_unlabeled(splits.train.candidates(), &probs_train, &l_train)?;
    info!(
        kept = kept.len(),
        total = splits.train.len(),
        "train candidates with at least one vote"
    );

    if let Some(gold) = splits.test.gold() {
        let l_test = applier.apply(splits.test.candidates());
        let scores = model.score(
            &l_test,
            gold,
            &[Metric::Accuracy, Metric::F1, Metric::Coverage],
            TieBreakPolicy::Random,
        )?;
        for (metric, score) in scores {
            println!("Test {}: {}", metric, score);
        }
    }

    if let Some(path) = args.model {
        info!(path = %path.display(), "Saving model file...");
        let mut f = zstd::Encoder::new(File::create(path)?, 19)?;
        f.multithread(args.zstd_workers)?;
        model.write(&mut f)?;
        f.finish()?;
    }

    Ok(())
}
