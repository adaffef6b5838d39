use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::errors::{ConjugalError, Result};
use crate::label::ABSTAIN;

/// Votes of every labeling function on every candidate.
///
/// Rows are candidates and columns are labeling functions. `-1` means abstain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatrix {
    pub(crate) votes: Array2<i8>,
}

impl LabelMatrix {
    /// Creates a label matrix from row-major votes.
    ///
    /// # Arguments
    ///
    /// * `n_rows` - The number of candidates.
    /// * `n_lfs` - The number of labeling functions.
    /// * `votes` - Row-major votes.
    ///
    /// # Errors
    ///
    /// If the length of `votes` does not match the shape or a vote is less than `-1`, an error
    /// variant will be returned.
    pub fn from_vec(n_rows: usize, n_lfs: usize, votes: Vec<i8>) -> Result<Self> {
        if votes.iter().any(|&v| v < ABSTAIN) {
            return Err(ConjugalError::invalid_argument(
                "votes",
                "votes must be greater than or equal to -1",
            ));
        }
        let votes = Array2::from_shape_vec((n_rows, n_lfs), votes)
            .map_err(|e| ConjugalError::invalid_argument("votes", e.to_string()))?;
        Ok(Self { votes })
    }

    /// Creates a label matrix from rows of votes.
    ///
    /// # Errors
    ///
    /// If rows have different lengths, an error variant will be returned.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self>
    where
        R: AsRef<[i8]>,
    {
        let n_lfs = rows.first().map_or(0, |r| r.as_ref().len());
        let mut votes = Vec::with_capacity(rows.len() * n_lfs);
        for row in rows {
            let row = row.as_ref();
            if row.len() != n_lfs {
                return Err(ConjugalError::invalid_argument(
                    "rows",
                    format!("expected {} votes per row, got {}", n_lfs, row.len()),
                ));
            }
            votes.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), n_lfs, votes)
    }

    pub fn n_rows(&self) -> usize {
        self.votes.nrows()
    }

    pub fn n_lfs(&self) -> usize {
        self.votes.ncols()
    }

    #[inline(always)]
    pub fn get(&self, row: usize, lf: usize) -> i8 {
        self.votes[[row, lf]]
    }

    pub fn row(&self, row: usize) -> ArrayView1<i8> {
        self.votes.row(row)
    }

    pub fn column(&self, lf: usize) -> ArrayView1<i8> {
        self.votes.column(lf)
    }

    pub fn view(&self) -> ArrayView2<i8> {
        self.votes.view()
    }

    /// Returns a matrix keeping only the given rows.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            votes: self.votes.select(ndarray::Axis(0), rows),
        }
    }

    /// Checks that every vote is abstain or a class index below `cardinality`.
    pub(crate) fn check_cardinality(&self, cardinality: usize) -> Result<()> {
        if let Some(&v) = self
            .votes
            .iter()
            .find(|&&v| v != ABSTAIN && (v < 0 || v as usize >= cardinality))
        {
            return Err(ConjugalError::invalid_argument(
                "label_matrix",
                format!("vote {v} is out of range for cardinality {cardinality}"),
            ));
        }
        Ok(())
    }
}
