//! Coverage, overlap, conflict and accuracy statistics of labeling functions.

use core::fmt;
use std::collections::BTreeSet;

use crate::errors::{ConjugalError, Result};
use crate::label::ABSTAIN;
use crate::label_matrix::LabelMatrix;

/// One row of [`LfAnalysis::lf_summary`].
#[derive(Debug, Clone, PartialEq)]
pub struct LfSummaryRow {
    pub name: String,
    /// Distinct non-abstain votes cast by the labeling function.
    pub polarity: Vec<i8>,
    pub coverage: f64,
    pub overlaps: f64,
    pub conflicts: f64,
    pub correct: Option<usize>,
    pub incorrect: Option<usize>,
    /// `None` without gold labels. `Some(NaN)` when the labeling function never votes on a
    /// gold-labeled row.
    pub empirical_accuracy: Option<f64>,
}

/// Per labeling function statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct LfSummary {
    pub rows: Vec<LfSummaryRow>,
}

impl fmt::Display for LfSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(0)
            .max(4);
        let with_gold = self.rows.iter().any(|r| r.correct.is_some());
        write!(
            f,
            "{:width$}  {:>3}  {:>8}  {:>8}  {:>8}  {:>9}",
            "", "j", "Polarity", "Coverage", "Overlaps", "Conflicts"
        )?;
        if with_gold {
            write!(f, "  {:>7}  {:>9}  {:>9}", "Correct", "Incorrect", "Emp. Acc.")?;
        }
        writeln!(f)?;
        for (j, row) in self.rows.iter().enumerate() {
            let polarity = format!(
                "[{}]",
                row.polarity
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            write!(
                f,
                "{:width$}  {:>3}  {:>8}  {:>8.4}  {:>8.4}  {:>9.4}",
                row.name, j, polarity, row.coverage, row.overlaps, row.conflicts
            )?;
            if let (Some(correct), Some(incorrect), Some(acc)) =
                (row.correct, row.incorrect, row.empirical_accuracy)
            {
                write!(f, "  {:>7}  {:>9}  {:>9.4}", correct, incorrect, acc)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Statistics over a label matrix.
///
/// # Examples
///
/// ```
/// use conjugal::{LabelMatrix, LfAnalysis};
///
/// let l = LabelMatrix::from_rows(&[[1, -1], [1, 0], [-1, -1], [-1, 0]]).unwrap();
/// let analysis = LfAnalysis::new(&l);
/// assert_eq!(0.75, analysis.label_coverage());
/// assert_eq!(0.25, analysis.label_conflict());
/// ```
pub struct LfAnalysis<'a> {
    l: &'a LabelMatrix,
}

impl<'a> LfAnalysis<'a> {
    pub const fn new(l: &'a LabelMatrix) -> Self {
        Self { l }
    }

    fn n_votes(&self, row: usize) -> usize {
        self.l.row(row).iter().filter(|&&v| v != ABSTAIN).count()
    }

    fn has_conflict(&self, row: usize) -> bool {
        let mut first = None;
        for &v in self.l.row(row) {
            if v == ABSTAIN {
                continue;
            }
            match first {
                None => first = Some(v),
                Some(f) if f != v => return true,
                _ => {}
            }
        }
        false
    }

    fn fraction<F>(&self, pred: F) -> f64
    where
        F: Fn(usize) -> bool,
    {
        let n = self.l.n_rows();
        if n == 0 {
            return 0.0;
        }
        (0..n).filter(|&i| pred(i)).count() as f64 / n as f64
    }

    fn lf_fraction<F>(&self, pred: F) -> Vec<f64>
    where
        F: Fn(usize, usize) -> bool,
    {
        (0..self.l.n_lfs())
            .map(|j| self.fraction(|i| self.l.get(i, j) != ABSTAIN && pred(i, j)))
            .collect()
    }

    /// Fraction of candidates with at least one non-abstain vote.
    pub fn label_coverage(&self) -> f64 {
        self.fraction(|i| self.n_votes(i) > 0)
    }

    /// Fraction of candidates with at least two non-abstain votes.
    pub fn label_overlap(&self) -> f64 {
        self.fraction(|i| self.n_votes(i) > 1)
    }

    /// Fraction of candidates with at least two different non-abstain votes.
    pub fn label_conflict(&self) -> f64 {
        self.fraction(|i| self.has_conflict(i))
    }

    /// Distinct non-abstain votes per labeling function.
    pub fn lf_polarities(&self) -> Vec<Vec<i8>> {
        (0..self.l.n_lfs())
            .map(|j| {
                self.l
                    .column(j)
                    .iter()
                    .copied()
                    .filter(|&v| v != ABSTAIN)
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .collect()
    }

    /// Fraction of candidates each labeling function votes on.
    pub fn lf_coverages(&self) -> Vec<f64> {
        self.lf_fraction(|_, _| true)
    }

    /// Fraction of candidates each labeling function votes on together with another one.
    pub fn lf_overlaps(&self) -> Vec<f64> {
        self.lf_fraction(|i, _| self.n_votes(i) > 1)
    }

    /// Fraction of candidates where each labeling function votes and another one disagrees.
    pub fn lf_conflicts(&self) -> Vec<f64> {
        self.lf_fraction(|i, j| {
            let v = self.l.get(i, j);
            self.l.row(i).iter().any(|&w| w != ABSTAIN && w != v)
        })
    }

    /// Counts correct and incorrect non-abstain votes against gold labels.
    ///
    /// Rows whose gold label is `-1` are skipped.
    ///
    /// # Errors
    ///
    /// If `gold` is not aligned with the matrix, an error variant will be returned.
    pub fn lf_correct_incorrect(&self, gold: &[i8]) -> Result<Vec<(usize, usize)>> {
        if gold.len() != self.l.n_rows() {
            return Err(ConjugalError::invalid_argument(
                "gold",
                format!(
                    "expected {} labels, got {}",
                    self.l.n_rows(),
                    gold.len()
                ),
            ));
        }
        Ok((0..self.l.n_lfs())
            .map(|j| {
                let mut correct = 0;
                let mut incorrect = 0;
                for (&v, &y) in self.l.column(j).iter().zip(gold) {
                    if v == ABSTAIN || y == ABSTAIN {
                        continue;
                    }
                    if v == y {
                        correct += 1;
                    } else {
                        incorrect += 1;
                    }
                }
                (correct, incorrect)
            })
            .collect())
    }

    /// Empirical accuracy of each labeling function on its non-abstain votes.
    ///
    /// # Errors
    ///
    /// See [`LfAnalysis::lf_correct_incorrect`].
    pub fn lf_empirical_accuracies(&self, gold: &[i8]) -> Result<Vec<f64>> {
        Ok(self
            .lf_correct_incorrect(gold)?
            .into_iter()
            .map(|(c, i)| c as f64 / (c + i) as f64)
            .collect())
    }

    /// Builds the per labeling function summary.
    ///
    /// # Arguments
    ///
    /// * `names` - Names of labeling functions in column order.
    /// * `gold` - Optional gold labels enabling the accuracy columns.
    ///
    /// # Errors
    ///
    /// If `names` or `gold` do not match the matrix, an error variant will be returned.
    pub fn lf_summary<S>(&self, names: &[S], gold: Option<&[i8]>) -> Result<LfSummary>
    where
        S: AsRef<str>,
    {
        if names.len() != self.l.n_lfs() {
            return Err(ConjugalError::invalid_argument(
                "names",
                format!("expected {} names, got {}", self.l.n_lfs(), names.len()),
            ));
        }
        let counts = gold.map(|g| self.lf_correct_incorrect(g)).transpose()?;
        let rows = names
            .iter()
            .zip(self.lf_polarities())
            .zip(self.lf_coverages())
            .zip(self.lf_overlaps())
            .zip(self.lf_conflicts())
            .enumerate()
            .map(
                |(j, ((((name, polarity), coverage), overlaps), conflicts))| {
                    let count = counts.as_ref().map(|c| c[j]);
                    LfSummaryRow {
                        name: name.as_ref().to_string(),
                        polarity,
                        coverage,
                        overlaps,
                        conflicts,
                        correct: count.map(|(c, _)| c),
                        incorrect: count.map(|(_, i)| i),
                        empirical_accuracy: count.map(|(c, i)| c as f64 / (c + i) as f64),
                    }
                },
            )
            .collect();
        Ok(LfSummary { rows })
    }
}
