//! Conversions from probabilistic labels to predictions and their scores.

use core::fmt;
use core::str::FromStr;

use ndarray::ArrayView2;

use crate::errors::{ConjugalError, Result};
use crate::label::ABSTAIN;

// Probabilities closer than this are considered tied.
const TIE_TOLERANCE: f64 = 1e-5;

/// Policy to resolve rows whose highest probability is shared by several classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieBreakPolicy {
    /// Predicts `-1`.
    Abstain,

    /// Picks one of the tied classes by row index. Deterministic.
    Random,
}

impl FromStr for TieBreakPolicy {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abstain" => Ok(Self::Abstain),
            "random" => Ok(Self::Random),
            _ => Err("Could not parse a tie-break policy"),
        }
    }
}

/// Evaluation metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Accuracy,
    Precision,
    Recall,
    F1,

    /// Fraction of non-abstain predictions.
    Coverage,
}

impl FromStr for Metric {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accuracy" => Ok(Self::Accuracy),
            "precision" => Ok(Self::Precision),
            "recall" => Ok(Self::Recall),
            "f1" => Ok(Self::F1),
            "coverage" => Ok(Self::Coverage),
            _ => Err("Could not parse a metric value"),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Accuracy => "accuracy",
            Self::Precision => "precision",
            Self::Recall => "recall",
            Self::F1 => "f1",
            Self::Coverage => "coverage",
        };
        f.write_str(name)
    }
}

/// Converts probabilistic labels to hard predictions.
///
/// # Arguments
///
/// * `probs` - A `n x k` matrix of class probabilities.
/// * `policy` - Tie-break policy.
///
/// # Returns
///
/// One class index (or `-1`) per row.
pub fn probs_to_preds(probs: ArrayView2<f64>, policy: TieBreakPolicy) -> Vec<i8> {
    probs
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let max_idxs: Vec<usize> = row
                .iter()
                .enumerate()
                .filter(|(_, &p)| (max - p).abs() < TIE_TOLERANCE)
                .map(|(y, _)| y)
                .collect();
            match (max_idxs.len(), policy) {
                (0, _) => ABSTAIN,
                (1, _) => max_idxs[0] as i8,
                (_, TieBreakPolicy::Abstain) => ABSTAIN,
                (n, TieBreakPolicy::Random) => max_idxs[i % n] as i8,
            }
        })
        .collect()
}

/// Scores predictions against gold labels.
///
/// Rows with an abstained prediction or a missing (`-1`) gold label are ignored, except for
/// [`Metric::Coverage`]. Precision, recall and F1 treat class `1` as positive. Scores that have
/// no support are `0.0`.
///
/// # Errors
///
/// If `golds` and `preds` have different lengths, an error variant will be returned.
pub fn metric_score(golds: &[i8], preds: &[i8], metric: Metric) -> Result<f64> {
    if golds.len() != preds.len() {
        return Err(ConjugalError::invalid_argument(
            "preds",
            format!("expected {} predictions, got {}", golds.len(), preds.len()),
        ));
    }
    if metric == Metric::Coverage {
        if preds.is_empty() {
            return Ok(0.0);
        }
        let n_voted = preds.iter().filter(|&&p| p != ABSTAIN).count();
        return Ok(n_voted as f64 / preds.len() as f64);
    }
    let pairs = golds
        .iter()
        .zip(preds)
        .filter(|(&y, &p)| y != ABSTAIN && p != ABSTAIN);
    let mut n_tp = 0;
    let mut n_fp = 0;
    let mut n_fn = 0;
    let mut n_correct = 0;
    let mut n_total = 0;
    for (&y, &p) in pairs {
        n_total += 1;
        if y == p {
            n_correct += 1;
        }
        match (y == 1, p == 1) {
            (true, true) => n_tp += 1,
            (false, true) => n_fp += 1,
            (true, false) => n_fn += 1,
            (false, false) => {}
        }
    }
    let ratio = |a: usize, b: usize| if b == 0 { 0.0 } else { a as f64 / b as f64 };
    let precision = ratio(n_tp, n_tp + n_fp);
    let recall = ratio(n_tp, n_tp + n_fn);
    Ok(match metric {
        Metric::Accuracy => ratio(n_correct, n_total),
        Metric::Precision => precision,
        Metric::Recall => recall,
        Metric::F1 => {
            if precision + recall == 0.0 {
                0.0
            } else {
                2. * precision * recall / (precision + recall)
            }
        }
        Metric::Coverage => unreachable!(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    #[test]
    fn test_probs_to_preds() {
        let probs = array![[0.2, 0.8], [0.9, 0.1], [0.5, 0.5], [0.5, 0.5]];

        assert_eq!(
            vec![1, 0, -1, -1],
            probs_to_preds(probs.view(), TieBreakPolicy::Abstain)
        );
        assert_eq!(
            vec![1, 0, 0, 1],
            probs_to_preds(probs.view(), TieBreakPolicy::Random)
        );
    }

    #[test]
    fn test_metric_score() {
        let golds = [1, 1, 0, 0, 1, -1];
        let preds = [1, 0, 0, 1, -1, 1];

        assert_eq!(0.5, metric_score(&golds, &preds, Metric::Accuracy).unwrap());
        assert_eq!(0.5, metric_score(&golds, &preds, Metric::Precision).unwrap());
        assert_eq!(0.5, metric_score(&golds, &preds, Metric::Recall).unwrap());
        assert_eq!(0.5, metric_score(&golds, &preds, Metric::F1).unwrap());
        assert_eq!(
            5.0 / 6.0,
            metric_score(&golds, &preds, Metric::Coverage).unwrap()
        );
    }

    #[test]
    fn test_metric_score_no_positive_predictions() {
        let golds = [1, 0];
        let preds = [0, 0];

        assert_eq!(0.0, metric_score(&golds, &preds, Metric::Precision).unwrap());
        assert_eq!(0.0, metric_score(&golds, &preds, Metric::F1).unwrap());
    }

    #[test]
    fn test_metric_score_length_mismatch() {
        assert!(metric_score(&[1], &[1, 0], Metric::Accuracy).is_err());
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!(Ok(Metric::F1), "f1".parse());
        assert!("auc".parse::<Metric>().is_err());
        assert_eq!(Ok(TieBreakPolicy::Random), "random".parse());
    }
}
