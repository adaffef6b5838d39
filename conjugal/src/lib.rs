#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Conjugal
//!
//! Conjugal applies weak supervision to spouse relation extraction. Heuristic labeling
//! functions vote on candidates (sentences with two person mentions), and a generative label
//! model turns the noisy, conflicting votes into probabilistic labels.
//!
//! ## Examples
//!
//! ```no_run
//! use conjugal::{load_data, LabelModel, LfAnalysis, LfApplier, TrainConfig};
//!
//! # fn lfs() -> Vec<Box<dyn conjugal::LabelingFunction>> { unimplemented!() }
//! let splits = load_data("data").unwrap();
//! let applier = LfApplier::new(lfs()).unwrap();
//! let l_dev = applier.apply(splits.dev.candidates());
//! let l_train = applier.apply(splits.train.candidates());
//!
//! let summary = LfAnalysis::new(&l_dev)
//!     .lf_summary(&applier.names(), splits.dev.gold())
//!     .unwrap();
//! println!("{}", summary);
//!
//! let config = TrainConfig { n_epochs: 5000, log_freq: 500, seed: 12345, ..Default::default() };
//! let model = LabelModel::fit(2, &applier.names(), &l_train, splits.dev.gold(), &config).unwrap();
//! let probs_train = model.predict_proba(&l_train).unwrap();
//! ```
//!
//! Fitting requires **crate feature** `train`. For more details, see [`LabelModel::fit`].
//! Labeling functions for the spouse task live in the `conjugal_rules` crate.

mod analysis;
mod applier;
mod candidate;
mod dataset;
mod label;
mod label_matrix;
mod label_model;
mod labeling;
mod metrics;
mod utils;

#[cfg(feature = "train")]
mod trainer;

pub mod errors;

pub use analysis::{LfAnalysis, LfSummary, LfSummaryRow};
pub use applier::LfApplier;
pub use candidate::{Candidate, Span};
pub use dataset::{load_data, Dataset, Splits};
pub use label::{Label, ABSTAIN};
pub use label_matrix::LabelMatrix;
pub use label_model::LabelModel;
pub use labeling::{LabelingFunction, Lf, Preprocessor};
pub use metrics::{metric_score, probs_to_preds, Metric, TieBreakPolicy};
pub use utils::{filter_unlabeled, labeled_rows};

#[cfg(feature = "train")]
pub use trainer::TrainConfig;
