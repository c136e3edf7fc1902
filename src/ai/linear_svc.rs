use std::collections::BTreeSet;

use linfa::{traits::Fit, Dataset};
use linfa_svm::{Svm, SvmError};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::inference::InferenceError;

#[derive(Debug, Clone)]
pub struct SvcParams {
    /// Penalty on margin violations, applied to both sides of every binary
    /// problem.
    pub c: f64,
}

impl Default for SvcParams {
    fn default() -> Self {
        Self { c: 1.0 }
    }
}

#[derive(Debug, Error)]
pub enum SvcError {
    #[error("training set is empty")]
    EmptyTrainingSet,
    #[error("got {samples} samples but {labels} labels")]
    LengthMismatch { samples: usize, labels: usize },
    #[error("need at least two classes to fit a classifier, found {0:?}")]
    SingleClass(Vec<String>),
    #[error("failed to fit the binary problem for class {class}")]
    Fit {
        class: String,
        #[source]
        source: SvmError,
    },
    #[error(
        "classifier holds {weights} weight rows and {intercepts} intercepts for {classes} classes"
    )]
    ShapeMismatch {
        classes: usize,
        weights: usize,
        intercepts: usize,
    },
    #[error("coefficients for class {class} are not finite")]
    NonFinite { class: String },
}

/// One-vs-rest linear support vector classifier.
///
/// Each class gets a binary linear-kernel SVM from linfa-svm. The fitted
/// hyperplanes are kept in primal form, one weight row and one intercept per
/// class, so scoring is a single matrix-vector product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvc {
    classes: Vec<String>,
    weights: Array2<f64>,
    intercepts: Array1<f64>,
}

/// Winning class of a decision together with its raw decision value.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub class: String,
    pub margin: f64,
}

impl LinearSvc {
    pub fn fit(
        params: &SvcParams,
        samples: &Array2<f64>,
        labels: &[String],
    ) -> Result<Self, SvcError> {
        if samples.nrows() == 0 {
            return Err(SvcError::EmptyTrainingSet);
        }
        if samples.nrows() != labels.len() {
            return Err(SvcError::LengthMismatch {
                samples: samples.nrows(),
                labels: labels.len(),
            });
        }

        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(SvcError::SingleClass(classes));
        }

        let n_features = samples.ncols();
        let mut weights = Array2::zeros((classes.len(), n_features));
        let mut intercepts = Array1::zeros(classes.len());
        for (index, class) in classes.iter().enumerate() {
            let targets: Array1<bool> = labels.iter().map(|label| label == class).collect();
            let svm = Svm::<f64, bool>::params()
                .pos_neg_weights(params.c, params.c)
                .linear_kernel()
                .fit(&Dataset::new(samples.clone(), targets))
                .map_err(|source| SvcError::Fit {
                    class: class.clone(),
                    source,
                })?;
            tracing::debug!(
                target: "train",
                class = %class,
                support_vectors = svm.nsupport(),
                "binary problem fitted"
            );
            let (w, b) = primal_form(&svm, n_features);
            weights.row_mut(index).assign(&w);
            intercepts[index] = b;
        }

        Ok(Self {
            classes,
            weights,
            intercepts,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    /// Checks that a decoded classifier is usable: one weight row and one
    /// intercept per class, all finite.
    pub fn validate(&self) -> Result<(), SvcError> {
        let classes = self.classes.len();
        if classes < 2 {
            return Err(SvcError::SingleClass(self.classes.clone()));
        }
        if self.weights.nrows() != classes || self.intercepts.len() != classes {
            return Err(SvcError::ShapeMismatch {
                classes,
                weights: self.weights.nrows(),
                intercepts: self.intercepts.len(),
            });
        }
        let rows = self.classes.iter().zip(self.weights.rows()).zip(&self.intercepts);
        for ((class, row), intercept) in rows {
            if !(intercept.is_finite() && row.iter().all(|w| w.is_finite())) {
                return Err(SvcError::NonFinite {
                    class: class.clone(),
                });
            }
        }
        Ok(())
    }

    /// Signed distance of `x` to each per-class hyperplane, in class order.
    pub fn decision_function(
        &self,
        x: ArrayView1<'_, f64>,
    ) -> Result<Array1<f64>, InferenceError> {
        if x.len() != self.n_features() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.n_features(),
                actual: x.len(),
            });
        }
        let scores = self.weights.dot(&x) + &self.intercepts;
        if let Some(index) = scores.iter().position(|score| !score.is_finite()) {
            return Err(InferenceError::NonFiniteScore {
                class: self.classes.get(index).cloned().unwrap_or_default(),
            });
        }
        Ok(scores)
    }

    /// Highest-scoring class; ties go to the class that sorts first.
    pub fn predict(&self, x: ArrayView1<'_, f64>) -> Result<Decision, InferenceError> {
        let scores = self.decision_function(x)?;
        let mut best: Option<(usize, f64)> = None;
        for (index, &score) in scores.iter().enumerate() {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }
        let (index, margin) = best.ok_or(InferenceError::NoClasses)?;
        let class = self.classes.get(index).ok_or(InferenceError::NoClasses)?;
        Ok(Decision {
            class: class.clone(),
            margin,
        })
    }
}

/// Reads `w` and `b` of a linear-kernel SVM off its decision function
/// `weighted_sum(x) - rho`, evaluated at the origin and at each unit vector.
fn primal_form(svm: &Svm<f64, bool>, n_features: usize) -> (Array1<f64>, f64) {
    let mut basis = Array1::<f64>::zeros(n_features);
    let offset = svm.weighted_sum(&basis);
    let mut weights = Array1::zeros(n_features);
    for j in 0..n_features {
        basis[j] = 1.0;
        weights[j] = svm.weighted_sum(&basis) - offset;
        basis[j] = 0.0;
    }
    (weights, offset - svm.rho)
}
