use ndarray::{Array2, Axis};

use crate::candidate::Candidate;
use crate::errors::{ConjugalError, Result};
use crate::label::ABSTAIN;
use crate::label_matrix::LabelMatrix;

/// Indices of rows where at least one labeling function voted.
pub fn labeled_rows(l: &LabelMatrix) -> Vec<usize> {
    (0..l.n_rows())
        .filter(|&i| l.row(i).iter().any(|&v| v != ABSTAIN))
        .collect()
}

/// Drops candidates on which every labeling function abstained.
///
/// # Arguments
///
/// * `candidates` - Candidates.
/// * `probs` - Probabilistic labels aligned with `candidates`.
/// * `l` - Label matrix aligned with `candidates`.
///
/// # Returns
///
/// The kept candidates and their probabilistic labels.
///
/// # Errors
///
/// If the inputs are not aligned, an error variant will be returned.
pub fn filter_unlabeled(
    candidates: &[Candidate],
    probs: &Array2<f64>,
    l: &LabelMatrix,
) -> Result<(Vec<Candidate>, Array2<f64>)> {
    if candidates.len() != l.n_rows() || probs.nrows() != l.n_rows() {
        return Err(ConjugalError::invalid_argument(
            "candidates",
            "candidates, probabilities and label matrix must have the same number of rows",
        ));
    }
    let rows = labeled_rows(l);
    let kept = rows.iter().map(|&i| candidates[i].clone()).collect();
    Ok((kept, probs.select(Axis(0), &rows)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    use crate::candidate::Span;

    #[test]
    fn test_filter_unlabeled() {
        let candidates: Vec<_> = ["a b", "c d", "e f"]
            .iter()
            .map(|s| Candidate::from_tokenized(s, Span::new(0, 0), Span::new(1, 1)).unwrap())
            .collect();
        let probs = array![[0.1, 0.9], [0.5, 0.5], [0.7, 0.3]];
        let l = LabelMatrix::from_rows(&[[1, -1], [-1, -1], [-1, 0]]).unwrap();
        let (kept, kept_probs) = filter_unlabeled(&candidates, &probs, &l).unwrap();

        assert_eq!(vec![0, 2], labeled_rows(&l));
        assert_eq!(2, kept.len());
        assert_eq!("e f", kept[1].sentence());
        assert_eq!(array![[0.1, 0.9], [0.7, 0.3]], kept_probs);
    }

    #[test]
    fn test_filter_unlabeled_misaligned() {
        let probs = array![[0.1, 0.9]];
        let l = LabelMatrix::from_rows(&[[1]]).unwrap();

        assert!(filter_unlabeled(&[], &probs, &l).is_err());
    }
}
