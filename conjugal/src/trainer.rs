use std::collections::BTreeMap;

use ndarray::{s, Array1, Array2, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{info, warn};

use crate::errors::{ConjugalError, Result};
use crate::label::ABSTAIN;
use crate::label_matrix::LabelMatrix;
use crate::label_model::LabelModel;

// Groups of classes with equal priors larger than this keep their column order.
const MAX_PERMUTATION_GROUP: usize = 8;

/// Hyperparameters of [`LabelModel::fit`].
#[cfg_attr(docsrs, doc(cfg(feature = "train")))]
#[derive(Clone, Debug)]
pub struct TrainConfig {
    /// The number of gradient steps.
    pub n_epochs: usize,

    /// Learning rate.
    pub lr: f64,

    /// L2 penalty pulling parameters towards their initial values.
    pub l2: f64,

    /// SGD momentum.
    pub momentum: f64,

    /// Prior accuracy of every labeling function.
    pub prec_init: f64,

    /// Loss is logged every `log_freq` epochs. `0` disables logging.
    pub log_freq: usize,

    /// Seed of the parameter initialization.
    pub seed: u64,

    /// Class prior. Estimated from dev labels or set uniform when `None`.
    pub class_balance: Option<Vec<f64>>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            n_epochs: 100,
            lr: 0.01,
            l2: 0.0,
            momentum: 0.9,
            prec_init: 0.7,
            log_freq: 10,
            seed: 0,
            class_balance: None,
        }
    }
}

impl TrainConfig {
    fn validate(&self) -> Result<()> {
        if !(self.lr > 0.0 && self.lr.is_finite()) {
            return Err(ConjugalError::invalid_argument("lr", "must be positive"));
        }
        if self.l2.is_nan() || self.l2 < 0.0 {
            return Err(ConjugalError::invalid_argument("l2", "must not be negative"));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(ConjugalError::invalid_argument(
                "momentum",
                "must be in [0, 1)",
            ));
        }
        if !(self.prec_init > 0.0 && self.prec_init <= 1.0) {
            return Err(ConjugalError::invalid_argument(
                "prec_init",
                "must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// Resolves the class prior from the explicit setting, dev labels, or a uniform prior.
fn class_balance(
    cardinality: usize,
    explicit: Option<&[f64]>,
    y_dev: Option<&[i8]>,
) -> Result<Array1<f64>> {
    let p = if let Some(p) = explicit {
        if p.len() != cardinality {
            return Err(ConjugalError::invalid_argument(
                "class_balance",
                format!("expected {} classes, got {}", cardinality, p.len()),
            ));
        }
        Array1::from(p.to_vec())
    } else if let Some(y) = y_dev.filter(|y| y.iter().any(|&v| v != ABSTAIN)) {
        let mut counts = Array1::<f64>::zeros(cardinality);
        for &v in y {
            if v == ABSTAIN {
                continue;
            }
            if v < 0 || v as usize >= cardinality {
                return Err(ConjugalError::invalid_argument(
                    "y_dev",
                    format!("label {v} is out of range for cardinality {cardinality}"),
                ));
            }
            counts[v as usize] += 1.0;
        }
        let total = counts.sum();
        counts / total
    } else {
        Array1::from_elem(cardinality, 1.0 / cardinality as f64)
    };
    if p.iter().any(|&v| v.is_nan() || v <= 0.0) || (p.sum() - 1.0).abs() > 1e-6 {
        return Err(ConjugalError::invalid_argument(
            "class_balance",
            "every class needs a positive prior and priors must sum to one",
        ));
    }
    Ok(p)
}

/// One-hot encodes votes: vote `c` of LF `j` sets column `j * k + c`. Abstains are all zero.
fn augment(l: &LabelMatrix, k: usize) -> Array2<f64> {
    let mut l_aug = Array2::zeros((l.n_rows(), l.n_lfs() * k));
    for ((i, j), &v) in l.view().indexed_iter() {
        if v != ABSTAIN {
            l_aug[[i, j * k + v as usize]] = 1.0;
        }
    }
    l_aug
}

/// Finds the permutation `perm` of `0..n` maximizing `Σ score(a, perm[a])`.
fn best_permutation<F>(n: usize, score: F) -> Vec<usize>
where
    F: Fn(usize, usize) -> f64,
{
    fn search<F>(
        a: usize,
        used: &mut [bool],
        current: &mut Vec<usize>,
        total: f64,
        best: &mut (f64, Vec<usize>),
        score: &F,
    ) where
        F: Fn(usize, usize) -> f64,
    {
        if a == used.len() {
            if total > best.0 {
                *best = (total, current.clone());
            }
            return;
        }
        for b in 0..used.len() {
            if used[b] {
                continue;
            }
            used[b] = true;
            current.push(b);
            search(a + 1, used, current, total + score(a, b), best, score);
            current.pop();
            used[b] = false;
        }
    }

    let mut best = (f64::NEG_INFINITY, (0..n).collect());
    search(0, &mut vec![false; n], &mut vec![], 0.0, &mut best, &score);
    best.1
}

/// Reorders the columns of `mu` so that each LF's conditional probabilities are largest on the
/// diagonal. Only classes with equal priors are exchangeable.
fn break_col_permutation_symmetry(mu: &Array2<f64>, p: &Array1<f64>, m: usize) -> Array2<f64> {
    let k = p.len();
    let mut probs_sum = Array2::<f64>::zeros((k, k));
    for j in 0..m {
        probs_sum += &mu.slice(s![j * k..(j + 1) * k, ..]);
    }
    let probs_sum = probs_sum * p;

    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (y, &prior) in p.iter().enumerate() {
        groups
            .entry((prior * 1000.0).round() as i64)
            .or_default()
            .push(y);
    }
    let mut z = Array2::<f64>::zeros((k, k));
    for group in groups.values() {
        if group.len() == 1 || group.len() > MAX_PERMUTATION_GROUP {
            if group.len() > 1 {
                warn!(size = group.len(), "too many exchangeable classes, keep column order");
            }
            for &y in group {
                z[[y, y]] = 1.0;
            }
            continue;
        }
        let perm = best_permutation(group.len(), |a, b| probs_sum[[group[a], group[b]]]);
        for (a, &b) in perm.iter().enumerate() {
            // The new column `a` takes the old column `perm[a]`.
            z[[group[b], group[a]]] = 1.0;
        }
    }
    mu.dot(&z)
}

impl LabelModel {
    /// Fits a label model on an unlabeled label matrix.
    ///
    /// Minimizes the squared distance between the observed LF agreement matrix and the one
    /// implied by the conditional probabilities, assuming labeling functions are conditionally
    /// independent given the true label.
    ///
    /// # Arguments
    ///
    /// * `cardinality` - The number of classes.
    /// * `lf_names` - Names of labeling functions in column order.
    /// * `l_train` - The training label matrix.
    /// * `y_dev` - Optional dev gold labels used to estimate the class prior.
    /// * `config` - Hyperparameters.
    ///
    /// # Returns
    ///
    /// A trained model.
    ///
    /// # Errors
    ///
    /// If the arguments are inconsistent, [`ConjugalError::InvalidArgument`] will be returned.
    /// If the loss becomes non-finite, [`ConjugalError::InvalidModel`] will be returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use conjugal::{LabelMatrix, LabelModel, TieBreakPolicy, TrainConfig};
    ///
    /// let l = LabelMatrix::from_rows(&[[1, 1, -1], [0, 0, 0], [1, -1, 1], [0, 0, -1]]).unwrap();
    /// let config = TrainConfig { n_epochs: 200, seed: 123, ..Default::default() };
    /// let model = LabelModel::fit(2, &["a", "b", "c"], &l, None, &config).unwrap();
    /// let probs = model.predict_proba(&l).unwrap();
    /// assert_eq!((4, 2), probs.dim());
    /// let preds = model.predict(&l, TieBreakPolicy::Abstain).unwrap();
    /// assert_eq!(4, preds.len());
    /// ```
    #[cfg_attr(docsrs, doc(cfg(feature = "train")))]
    pub fn fit<S>(
        cardinality: usize,
        lf_names: &[S],
        l_train: &LabelMatrix,
        y_dev: Option<&[i8]>,
        config: &TrainConfig,
    ) -> Result<Self>
    where
        S: AsRef<str>,
    {
        if !(2..=i8::MAX as usize).contains(&cardinality) {
            return Err(ConjugalError::invalid_argument(
                "cardinality",
                "must be in [2, 127]",
            ));
        }
        if lf_names.len() != l_train.n_lfs() {
            return Err(ConjugalError::invalid_argument(
                "lf_names",
                format!(
                    "expected {} names, got {}",
                    l_train.n_lfs(),
                    lf_names.len()
                ),
            ));
        }
        if l_train.n_rows() == 0 || l_train.n_lfs() == 0 {
            return Err(ConjugalError::invalid_argument(
                "l_train",
                "label matrix is empty",
            ));
        }
        l_train.check_cardinality(cardinality)?;
        config.validate()?;

        let k = cardinality;
        let m = l_train.n_lfs();
        let n = l_train.n_rows();
        let d = m * k;

        let p = class_balance(k, config.class_balance.as_deref(), y_dev)?;
        let pm = Array2::from_diag(&p);
        info!(class_balance = ?p.to_vec(), "resolved class balance");

        let l_aug = augment(l_train, k);
        let o = l_aug.t().dot(&l_aug) / n as f64;
        let o_diag = o.diag().to_owned();
        let mask = Array2::from_shape_fn((d, d), |(a, b)| if a / k != b / k { 1.0 } else { 0.0 });

        let mut mu_init = Array2::<f64>::zeros((d, k));
        for j in 0..m {
            for y in 0..k {
                let idx = j * k + y;
                mu_init[[idx, y]] += (o_diag[idx] * config.prec_init / p[y]).clamp(0.0, 1.0);
            }
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut mu = &mu_init * rng.random::<f64>();
        let mut velocity = Array2::<f64>::zeros((d, k));
        let l2_sq = config.l2 * config.l2;

        info!(n_epochs = config.n_epochs, n, m, "start training");
        for epoch in 0..config.n_epochs {
            let mu_p = mu.dot(&pm);
            let e = (mu_p.dot(&mu.t()) - &o) * &mask;
            let s = mu_p.sum_axis(Axis(1)) - &o_diag;
            let diff = &mu - &mu_init;

            let loss = e.iter().map(|v| v * v).sum::<f64>()
                + s.iter().map(|v| v * v).sum::<f64>()
                + l2_sq * diff.iter().map(|v| v * v).sum::<f64>();
            if !loss.is_finite() {
                return Err(ConjugalError::invalid_model(format!(
                    "loss diverged at epoch {epoch}"
                )));
            }
            if config.log_freq != 0 && epoch % config.log_freq == 0 {
                info!(epoch, loss, "training label model");
            }

            let mut grad = (e.dot(&mu) + e.t().dot(&mu)) * &p * 2.0;
            grad += &(&s.view().insert_axis(Axis(1)) * &p.view().insert_axis(Axis(0)) * 2.0);
            grad.scaled_add(2.0 * l2_sq, &diff);

            velocity *= config.momentum;
            velocity += &grad;
            mu.scaled_add(-config.lr, &velocity);
        }
        info!("finished training");

        let eps = 0.01f64.min(10f64.powf(-(n as f64).log10().ceil()));
        mu.mapv_inplace(|v| v.clamp(eps, 1.0 - eps));
        let mu = break_col_permutation_symmetry(&mu, &p, m);

        Ok(Self {
            cardinality: k,
            lf_names: lf_names.iter().map(|s| s.as_ref().to_string()).collect(),
            mu,
            class_balance: p,
            coverage: (0..m)
                .map(|j| (0..k).map(|y| o_diag[j * k + y]).sum())
                .collect(),
        })
    }
}
