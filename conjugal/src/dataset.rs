use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::candidate::{Candidate, Span};
use crate::errors::{ConjugalError, Result};
use crate::label::ABSTAIN;

#[derive(Debug, Deserialize)]
struct CandidateRecord {
    sentence: String,
    tokens: String,
    person1_start: usize,
    person1_end: usize,
    person2_start: usize,
    person2_end: usize,
    #[serde(default)]
    label: Option<i8>,
}

/// Candidates of one split with optional gold labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) gold: Option<Vec<i8>>,
}

impl Dataset {
    /// Reads a split from CSV.
    ///
    /// Expected columns are `sentence`, `tokens` (space separated), `person1_start`,
    /// `person1_end`, `person2_start`, `person2_end` (inclusive word indices) and an optional
    /// `label` (`1`, `0`, or empty / `-1` for unknown).
    ///
    /// # Returns
    ///
    /// The split. Gold labels are present when at least one row carries a label.
    ///
    /// # Errors
    ///
    /// If the CSV is malformed or a record has invalid spans or labels, an error variant will
    /// be returned.
    pub fn read<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut rdr = csv::Reader::from_reader(rdr);
        let mut candidates = vec![];
        let mut labels = vec![];
        for (i, record) in rdr.deserialize().enumerate() {
            let record: CandidateRecord = record?;
            let tokens = record
                .tokens
                .split_whitespace()
                .map(String::from)
                .collect();
            let candidate = Candidate::new(
                record.sentence,
                tokens,
                Span::new(record.person1_start, record.person1_end),
                Span::new(record.person2_start, record.person2_end),
            )
            .map_err(|e| ConjugalError::invalid_data(i, e.to_string()))?;
            let label = record.label.unwrap_or(ABSTAIN);
            if !matches!(label, -1..=1) {
                return Err(ConjugalError::invalid_data(
                    i,
                    format!("label {label} is not one of -1, 0, 1"),
                ));
            }
            candidates.push(candidate);
            labels.push(label);
        }
        let gold = labels.iter().any(|&y| y != ABSTAIN).then_some(labels);
        Ok(Self { candidates, gold })
    }

    /// Reads a split from a CSV file.
    ///
    /// # Errors
    ///
    /// See [`Dataset::read`].
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let dataset = Self::read(File::open(path)?)?;
        info!(
            path = %path.display(),
            n_candidates = dataset.len(),
            labeled = dataset.gold.is_some(),
            "loaded split"
        );
        Ok(dataset)
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Gold labels aligned with [`Dataset::candidates`]. `-1` marks an unknown label.
    pub fn gold(&self) -> Option<&[i8]> {
        self.gold.as_deref()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Dev, train and test splits.
#[derive(Debug, Clone, PartialEq)]
pub struct Splits {
    /// Gold-labeled split for analysis and the class prior.
    pub dev: Dataset,

    /// Unlabeled split for fitting the label model.
    pub train: Dataset,

    /// Gold-labeled split for the final score.
    pub test: Dataset,
}

/// Loads `dev.csv`, `train.csv` and `test.csv` from a directory.
///
/// # Errors
///
/// If a file is missing or malformed, an error variant will be returned.
pub fn load_data<P>(dir: P) -> Result<Splits>
where
    P: AsRef<Path>,
{
    let dir = dir.as_ref();
    Ok(Splits {
        dev: Dataset::from_path(dir.join("dev.csv"))?,
        train: Dataset::from_path(dir.join("train.csv"))?,
        test: Dataset::from_path(dir.join("test.csv"))?,
    })
}
