use std::collections::HashSet;

use ndarray::Array2;
use tracing::{debug, info};

use crate::candidate::Candidate;
use crate::errors::{ConjugalError, Result};
use crate::label_matrix::LabelMatrix;
use crate::labeling::LabelingFunction;

// Interval of progress messages in candidates.
const PROGRESS_INTERVAL: usize = 10000;

/// Applies a fixed list of labeling functions to candidates.
///
/// # Examples
///
/// ```
/// use conjugal::{Candidate, Label, LfApplier, Lf, Span};
///
/// fn always_positive(_: &Candidate, _: &()) -> Label {
///     Label::Positive
/// }
///
/// let applier = LfApplier::new(vec![Box::new(Lf::new("lf_pos", (), always_positive))]).unwrap();
/// let c = Candidate::from_tokenized("Alice wed Bob", Span::new(0, 0), Span::new(2, 2)).unwrap();
/// let l = applier.apply(&[c]);
/// assert_eq!(1, l.get(0, 0));
/// ```
pub struct LfApplier {
    lfs: Vec<Box<dyn LabelingFunction>>,
}

impl LfApplier {
    /// Creates a new applier.
    ///
    /// # Errors
    ///
    /// If `lfs` is empty or contains duplicate names, an error variant will be returned.
    pub fn new(lfs: Vec<Box<dyn LabelingFunction>>) -> Result<Self> {
        if lfs.is_empty() {
            return Err(ConjugalError::invalid_argument(
                "lfs",
                "at least one labeling function is required",
            ));
        }
        let mut names = HashSet::new();
        for lf in &lfs {
            if !names.insert(lf.name()) {
                return Err(ConjugalError::invalid_argument(
                    "lfs",
                    format!("duplicate labeling function name: {}", lf.name()),
                ));
            }
        }
        Ok(Self { lfs })
    }

    pub fn lfs(&self) -> &[Box<dyn LabelingFunction>] {
        &self.lfs
    }

    /// Names of the labeling functions in column order.
    pub fn names(&self) -> Vec<String> {
        self.lfs.iter().map(|lf| lf.name().to_string()).collect()
    }

    /// Builds the label matrix of `candidates`.
    pub fn apply(&self, candidates: &[Candidate]) -> LabelMatrix {
        let mut votes = Array2::from_elem((candidates.len(), self.lfs.len()), 0i8);
        for (i, (candidate, mut row)) in candidates.iter().zip(votes.rows_mut()).enumerate() {
            if i % PROGRESS_INTERVAL == 0 {
                debug!(labeled = i, total = candidates.len(), "applying labeling functions");
            }
            for (lf, v) in self.lfs.iter().zip(row.iter_mut()) {
                *v = lf.label(candidate).as_i8();
            }
        }
        info!(
            n_candidates = candidates.len(),
            n_lfs = self.lfs.len(),
            "built label matrix"
        );
        LabelMatrix { votes }
    }
}
