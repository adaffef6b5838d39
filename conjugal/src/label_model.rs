use std::io::{Read, Write};

use bincode::{Decode, Encode};
use ndarray::{Array1, Array2};

use crate::errors::{ConjugalError, Result};
use crate::label::ABSTAIN;
use crate::label_matrix::LabelMatrix;
use crate::metrics::{self, Metric, TieBreakPolicy};

// Lower bound of LF weights.
pub(crate) const MIN_WEIGHT: f64 = 1e-6;

// Conditional probabilities are clipped into this range before prediction.
const MU_CLIP: (f64, f64) = (0.01, 0.99);

#[derive(Decode, Encode)]
struct LabelModelData {
    cardinality: u32,
    lf_names: Vec<String>,
    mu: Vec<f64>,
    class_balance: Vec<f64>,
    coverage: Vec<f64>,
}

/// Generative model aggregating labeling function votes into probabilistic labels.
///
/// `mu` holds the estimated conditional probabilities `P(λ_j = c | Y = y)` of every labeling
/// function `j`, laid out as rows `j * k + c` and columns `y`:
///
/// ```text
///               Y=0   Y=1
/// lf0, vote 0   .     .
/// lf0, vote 1   .     .
/// lf1, vote 0   .     .
/// ...
/// ```
///
/// Fitting requires **crate feature** `train`. See [`LabelModel::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct LabelModel {
    pub(crate) cardinality: usize,
    pub(crate) lf_names: Vec<String>,
    pub(crate) mu: Array2<f64>,
    pub(crate) class_balance: Array1<f64>,
    pub(crate) coverage: Vec<f64>,
}

impl LabelModel {
    pub const fn cardinality(&self) -> usize {
        self.cardinality
    }

    pub fn n_lfs(&self) -> usize {
        self.lf_names.len()
    }

    /// Names of the labeling functions the model was fitted on, in column order.
    pub fn lf_names(&self) -> &[String] {
        &self.lf_names
    }

    pub fn class_balance(&self) -> &Array1<f64> {
        &self.class_balance
    }

    /// Conditional probability matrix. See [`LabelModel`] for the layout.
    pub fn mu(&self) -> &Array2<f64> {
        &self.mu
    }

    /// Estimated accuracy of each labeling function on the candidates it votes on.
    ///
    /// Labeling functions that never voted in training get the lowest weight.
    pub fn get_weights(&self) -> Vec<f64> {
        let k = self.cardinality;
        self.coverage
            .iter()
            .enumerate()
            .map(|(j, &cov)| {
                if cov <= 0.0 {
                    return MIN_WEIGHT;
                }
                let acc: f64 = (0..k)
                    .map(|y| self.mu[[j * k + y, y]] * self.class_balance[y])
                    .sum();
                (acc / cov).clamp(MIN_WEIGHT, 1.0)
            })
            .collect()
    }

    fn check_matrix(&self, l: &LabelMatrix) -> Result<()> {
        if l.n_lfs() != self.n_lfs() {
            return Err(ConjugalError::invalid_argument(
                "label_matrix",
                format!(
                    "expected {} labeling functions, got {}",
                    self.n_lfs(),
                    l.n_lfs()
                ),
            ));
        }
        l.check_cardinality(self.cardinality)
    }

    /// Computes probabilistic labels.
    ///
    /// # Arguments
    ///
    /// * `l` - A label matrix built with the same labeling functions as the training matrix.
    ///
    /// # Returns
    ///
    /// A `n x k` matrix whose rows sum to one.
    ///
    /// # Errors
    ///
    /// If `l` has a different number of columns or out-of-range votes, an error variant will be
    /// returned.
    pub fn predict_proba(&self, l: &LabelMatrix) -> Result<Array2<f64>> {
        self.check_matrix(l)?;
        let k = self.cardinality;
        let log_mu = self.mu.mapv(|v| v.clamp(MU_CLIP.0, MU_CLIP.1).ln());
        let log_p = self.class_balance.mapv(f64::ln);
        let mut probs = Array2::zeros((l.n_rows(), k));
        for (i, mut row) in probs.rows_mut().into_iter().enumerate() {
            row.assign(&log_p);
            for (j, &v) in l.row(i).iter().enumerate() {
                if v != ABSTAIN {
                    row += &log_mu.row(j * k + v as usize);
                }
            }
            let max = row.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            row.mapv_inplace(|x| (x - max).exp());
            let z = row.sum();
            row /= z;
        }
        Ok(probs)
    }

    /// Computes hard predictions.
    ///
    /// # Errors
    ///
    /// See [`LabelModel::predict_proba`].
    pub fn predict(&self, l: &LabelMatrix, policy: TieBreakPolicy) -> Result<Vec<i8>> {
        let probs = self.predict_proba(l)?;
        Ok(metrics::probs_to_preds(probs.view(), policy))
    }

    /// Scores predictions against gold labels.
    ///
    /// # Errors
    ///
    /// If `golds` is not aligned with `l`, or see [`LabelModel::predict_proba`].
    pub fn score(
        &self,
        l: &LabelMatrix,
        golds: &[i8],
        metrics: &[Metric],
        policy: TieBreakPolicy,
    ) -> Result<Vec<(Metric, f64)>> {
        let preds = self.predict(l, policy)?;
        metrics
            .iter()
            .map(|&metric| Ok((metric, metrics::metric_score(golds, &preds, metric)?)))
            .collect()
    }

    /// Exports the model data.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        let data = LabelModelData {
            cardinality: u32::try_from(self.cardinality)
                .map_err(|e| ConjugalError::invalid_model(e.to_string()))?,
            lf_names: self.lf_names.clone(),
            mu: self.mu.iter().copied().collect(),
            class_balance: self.class_balance.to_vec(),
            coverage: self.coverage.clone(),
        };
        bincode::encode_into_std_write(data, wtr, bincode::config::standard())?;
        Ok(())
    }

    /// Creates a model from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// A model data read from `rdr`.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error or the data is inconsistent, an error variant will be
    /// returned.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let data: LabelModelData = bincode::decode_from_std_read(rdr, bincode::config::standard())?;
        let k = data.cardinality as usize;
        let m = data.lf_names.len();
        if k < 2 {
            return Err(ConjugalError::invalid_model("cardinality must be at least 2"));
        }
        if data.class_balance.len() != k || data.coverage.len() != m {
            return Err(ConjugalError::invalid_model(
                "class balance or coverage does not match the model shape",
            ));
        }
        if data.mu.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(ConjugalError::invalid_model(
                "conditional probabilities must be in [0, 1]",
            ));
        }
        if data.coverage.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(ConjugalError::invalid_model("coverage must be in [0, 1]"));
        }
        if data.class_balance.iter().any(|&v| v.is_nan() || v <= 0.0)
            || (data.class_balance.iter().sum::<f64>() - 1.0).abs() > 1e-6
        {
            return Err(ConjugalError::invalid_model(
                "class balance must be positive and sum to one",
            ));
        }
        let mu = Array2::from_shape_vec((m * k, k), data.mu)
            .map_err(|e| ConjugalError::invalid_model(e.to_string()))?;
        Ok(Self {
            cardinality: k,
            lf_names: data.lf_names,
            mu,
            class_balance: Array1::from(data.class_balance),
            coverage: data.coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    // Two binary labeling functions: lf0 is 80% accurate, lf1 is 60% accurate. Both vote on
    // every candidate.
    fn model() -> LabelModel {
        LabelModel {
            cardinality: 2,
            lf_names: vec!["lf0".to_string(), "lf1".to_string()],
            mu: array![[0.8, 0.2], [0.2, 0.8], [0.6, 0.4], [0.4, 0.6]],
            class_balance: array![0.5, 0.5],
            coverage: vec![1.0, 1.0],
        }
    }

    #[test]
    fn test_predict_proba() {
        let l = LabelMatrix::from_rows(&[[1, 1], [0, 1], [-1, -1]]).unwrap();
        let probs = model().predict_proba(&l).unwrap();

        // 0.2 * 0.4 vs 0.8 * 0.6
        assert!((probs[[0, 1]] - 0.48 / 0.56).abs() < 1e-12);
        // 0.8 * 0.4 vs 0.2 * 0.6
        assert!((probs[[1, 0]] - 0.32 / 0.44).abs() < 1e-12);
        assert!((probs[[2, 0]] - 0.5).abs() < 1e-12);
        for row in probs.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_predict() {
        let l = LabelMatrix::from_rows(&[[1, 1], [0, 1], [-1, -1], [-1, 0]]).unwrap();
        let m = model();

        assert_eq!(
            vec![1, 0, -1, 0],
            m.predict(&l, TieBreakPolicy::Abstain).unwrap()
        );
        assert_eq!(
            vec![1, 0, 0, 0],
            m.predict(&l, TieBreakPolicy::Random).unwrap()
        );
    }

    #[test]
    fn test_score() {
        let l = LabelMatrix::from_rows(&[[1, 1], [0, 1], [1, 0]]).unwrap();
        let scores = model()
            .score(
                &l,
                &[1, 1, 1],
                &[Metric::Accuracy, Metric::Coverage],
                TieBreakPolicy::Abstain,
            )
            .unwrap();

        assert_eq!(Metric::Accuracy, scores[0].0);
        assert!((scores[0].1 - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!((Metric::Coverage, 1.0), scores[1]);
    }

    #[test]
    fn test_predict_proba_wrong_width() {
        let l = LabelMatrix::from_rows(&[[1, 1, 1]]).unwrap();

        assert!(model().predict_proba(&l).is_err());
    }

    #[test]
    fn test_predict_proba_out_of_range_vote() {
        let l = LabelMatrix::from_rows(&[[2, 1]]).unwrap();

        assert!(model().predict_proba(&l).is_err());
    }

    #[test]
    fn test_get_weights() {
        let weights = model().get_weights();

        assert!((weights[0] - 0.8).abs() < 1e-12);
        assert!((weights[1] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_write_read() {
        let m = model();
        let mut buf = vec![];
        m.write(&mut buf).unwrap();
        let m2 = LabelModel::read(&mut buf.as_slice()).unwrap();

        assert_eq!(m, m2);
    }

    #[test]
    fn test_predict_proba_clips_extreme_probabilities() {
        let m = LabelModel {
            cardinality: 2,
            lf_names: vec!["lf0".to_string()],
            mu: array![[0.9999, 0.0001], [0.0001, 0.9999]],
            class_balance: array![0.5, 0.5],
            coverage: vec![1.0],
        };
        let l = LabelMatrix::from_rows(&[[1]]).unwrap();
        let probs = m.predict_proba(&l).unwrap();

        assert!((probs[[0, 0]] - 0.01).abs() < 1e-12);
        assert!((probs[[0, 1]] - 0.99).abs() < 1e-12);
        assert_eq!(0.9999, m.mu()[[0, 0]]);
    }

    #[test]
    fn test_predict_proba_zero_probabilities() {
        let m = LabelModel {
            mu: array![[0.0, 0.5], [0.5, 0.0], [0.5, 0.0], [0.0, 0.5]],
            ..model()
        };
        let l = LabelMatrix::from_rows(&[[0, 0]]).unwrap();
        let probs = m.predict_proba(&l).unwrap();

        assert!(probs.iter().all(|v| v.is_finite()));
        assert!((probs.row(0).sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_read_rejects_invalid_parameters() {
        let invalid = [
            LabelModel {
                mu: array![[1.5, 0.2], [0.2, 0.8], [0.6, 0.4], [0.4, 0.6]],
                ..model()
            },
            LabelModel {
                mu: array![[f64::NAN, 0.2], [0.2, 0.8], [0.6, 0.4], [0.4, 0.6]],
                ..model()
            },
            LabelModel {
                class_balance: array![0.0, 1.0],
                ..model()
            },
            LabelModel {
                class_balance: array![0.5, 0.6],
                ..model()
            },
            LabelModel {
                coverage: vec![1.0, f64::INFINITY],
                ..model()
            },
        ];
        for m in invalid {
            let mut buf = vec![];
            m.write(&mut buf).unwrap();

            assert!(matches!(
                LabelModel::read(&mut buf.as_slice()),
                Err(ConjugalError::InvalidModel(_))
            ));
        }
    }

    #[test]
    fn test_accessors() {
        let m = model();

        assert_eq!(2, m.cardinality());
        assert_eq!(2, m.n_lfs());
        assert_eq!(&array![0.5, 0.5], m.class_balance());
        assert_eq!((4, 2), m.mu().dim());
    }

    #[test]
    fn test_read_truncated() {
        let mut buf = vec![];
        model().write(&mut buf).unwrap();
        buf.truncate(buf.len() / 2);

        assert!(LabelModel::read(&mut buf.as_slice()).is_err());
    }
}
