//! Pairwise distance computations for the ordering engine.
//!
//! Distances are either computed on demand from a feature matrix under a
//! named metric, or read from a precomputed square distance matrix.
//! The engine only ever needs one full row at a time (distances from one
//! point to all others), so rows are computed lazily and never cached.
//!
//! Metrics are assumed symmetric and non-negative. No triangle inequality
//! is required.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use num_traits::Float;

use crate::error::OpticsError;

/// The distance metrics understood by [`PairDistances`].
///
/// `Precomputed` means the input matrix already contains pairwise distances
/// and must be square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Euclidean,
    Manhattan,
    Cosine,
    Precomputed,
} // end of Metric

impl Metric {
    /// parse a metric from its name, case insensitive.
    pub fn from_name(name: &str) -> Result<Self, OpticsError> {
        match name.to_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Metric::Euclidean),
            "manhattan" | "l1" => Ok(Metric::Manhattan),
            "cosine" => Ok(Metric::Cosine),
            "precomputed" => Ok(Metric::Precomputed),
            _ => Err(OpticsError::Metric(format!("unknown metric : {}", name))),
        }
    } // end of from_name

    /// distance between two points, computed in f64.
    pub fn eval<F: Float>(&self, a: &ArrayView1<F>, b: &ArrayView1<F>) -> f64 {
        match self {
            Metric::Euclidean => {
                let mut s = 0.;
                for (x, y) in a.iter().zip(b.iter()) {
                    let d = x.to_f64().unwrap() - y.to_f64().unwrap();
                    s += d * d;
                }
                s.sqrt()
            }
            Metric::Manhattan => {
                let mut s = 0.;
                for (x, y) in a.iter().zip(b.iter()) {
                    s += (x.to_f64().unwrap() - y.to_f64().unwrap()).abs();
                }
                s
            }
            Metric::Cosine => {
                let mut dot = 0.;
                let mut na = 0.;
                let mut nb = 0.;
                for (x, y) in a.iter().zip(b.iter()) {
                    let (x, y) = (x.to_f64().unwrap(), y.to_f64().unwrap());
                    dot += x * y;
                    na += x * x;
                    nb += y * y;
                }
                if na <= 0. || nb <= 0. {
                    // at least one null vector, maximal dissimilarity unless both are null
                    if na <= 0. && nb <= 0. {
                        0.
                    } else {
                        1.
                    }
                } else {
                    1. - dot / (na.sqrt() * nb.sqrt())
                }
            }
            Metric::Precomputed => {
                // rows of a precomputed matrix are read directly, never evaluated
                unreachable!("Metric::eval called on a precomputed metric")
            }
        }
    } // end of eval
} // end of impl Metric

//====================================================================================================

/// Access to the pairwise distances of a point set.
///
/// Borrows the caller's data. For a symmetric metric [`Self::row`] and
/// [`Self::full`] are consistent : `full().row(i) == row(i)`.
pub enum PairDistances<'a, F: Float> {
    /// a precomputed square distance matrix
    Matrix(ArrayView2<'a, F>),
    /// a (nbpoints, dim) feature matrix and the metric to apply pairwise
    Points(ArrayView2<'a, F>, Metric),
} // end of PairDistances

impl<'a, F: Float> PairDistances<'a, F> {
    /// build a provider from the input matrix and a metric.
    /// With [`Metric::Precomputed`] the matrix must be square.
    pub fn new(x: ArrayView2<'a, F>, metric: Metric) -> Result<Self, OpticsError> {
        match metric {
            Metric::Precomputed => {
                if x.nrows() != x.ncols() {
                    return Err(OpticsError::Configuration(format!(
                        "precomputed distance matrix must be square, got ({}, {})",
                        x.nrows(),
                        x.ncols()
                    )));
                }
                Ok(PairDistances::Matrix(x))
            }
            _ => Ok(PairDistances::Points(x, metric)),
        }
    } // end of new

    /// number of points described
    pub fn nb_points(&self) -> usize {
        match self {
            PairDistances::Matrix(d) => d.nrows(),
            PairDistances::Points(x, _) => x.nrows(),
        }
    }

    /// distances from point i to every point (including itself)
    pub fn row(&self, i: usize) -> Array1<f64> {
        match self {
            PairDistances::Matrix(d) => d.row(i).map(|v| v.to_f64().unwrap()),
            PairDistances::Points(x, metric) => {
                let pt_i = x.row(i);
                let mut row = Array1::<f64>::zeros(x.nrows());
                for (j, val) in row.iter_mut().enumerate() {
                    *val = metric.eval(&pt_i, &x.row(j));
                }
                row
            }
        }
    } // end of row

    /// the full pairwise distance matrix
    pub fn full(&self) -> Array2<f64> {
        let n = self.nb_points();
        let mut dmat = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            dmat.row_mut(i).assign(&self.row(i));
        }
        dmat
    } // end of full
} // end of impl PairDistances

//====================================================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use ndarray::array;

    #[allow(dead_code)]
    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_metric_names() {
        log_init_test();
        //
        assert_eq!(Metric::from_name("Euclidean").unwrap(), Metric::Euclidean);
        assert_eq!(Metric::from_name("l1").unwrap(), Metric::Manhattan);
        assert_eq!(Metric::from_name("precomputed").unwrap(), Metric::Precomputed);
        assert!(Metric::from_name("mahalanobis").is_err());
    } // end of test_metric_names

    #[test]
    fn test_metric_eval() {
        log_init_test();
        //
        let a = array![0.0f64, 0.];
        let b = array![3.0f64, 4.];
        assert!((Metric::Euclidean.eval(&a.view(), &b.view()) - 5.).abs() < 1.0E-10);
        assert!((Metric::Manhattan.eval(&a.view(), &b.view()) - 7.).abs() < 1.0E-10);
        //
        let u = array![1.0f64, 0.];
        let v = array![0.0f64, 2.];
        assert!((Metric::Cosine.eval(&u.view(), &v.view()) - 1.).abs() < 1.0E-10);
        assert!(Metric::Cosine.eval(&u.view(), &u.view()).abs() < 1.0E-10);
    } // end of test_metric_eval

    #[test]
    fn test_row_matches_full() {
        log_init_test();
        //
        let x = array![[0.0f64, 0.], [1., 0.], [0., 2.], [3., 3.]];
        let dists = PairDistances::new(x.view(), Metric::Euclidean).unwrap();
        let full = dists.full();
        for i in 0..x.nrows() {
            let row = dists.row(i);
            for j in 0..x.nrows() {
                assert!((row[j] - full[[i, j]]).abs() < 1.0E-12);
                assert!((row[j] - full[[j, i]]).abs() < 1.0E-12);
            }
            assert_eq!(row[i], 0.);
        }
    } // end of test_row_matches_full

    #[test]
    fn test_precomputed_must_be_square() {
        log_init_test();
        //
        let x = array![[0.0f64, 1., 2.], [1., 0., 3.]];
        let res = PairDistances::new(x.view(), Metric::Precomputed);
        match res {
            Err(OpticsError::Configuration(_)) => (),
            _ => panic!("expected a configuration error on a non square matrix"),
        }
    } // end of test_precomputed_must_be_square
} // end of mod tests
