//! module optics
//!
//! OPTICS density-based clustering : a reachability ordering of the points
//! followed by extraction of a flat clustering from the reachability plot.
//!
//! The computation has two engines. The ordering engine visits every point
//! once, greedily jumping to the unprocessed point of smallest reachability,
//! and records for each point its core distance and its reachability
//! distance. The extraction engine reads the reachability distances in
//! ordering sequence (the reachability plot) and recursively splits the plot
//! at its significant local maxima, yielding one cluster per tree leaf and
//! the noise label -1 elsewhere.
//!
//! The following papers describe the algorithms implemented here :
//!
//! - OPTICS: ordering points to identify the clustering structure.
//!   Ankerst, Breunig, Kriegel, Sander. ACM SIGMOD Record (1999)
//!
//! - Automatic extraction of clusters from hierarchical clustering
//!   representations. Sander, Qin, Lu, Niu, Kovarsky (2003)

pub mod hierarchical;
pub mod ordering;
pub mod params;

use ndarray::{Array1, ArrayView2};

use num_traits::Float;

use crate::dist::{Metric, PairDistances};
use crate::error::OpticsError;

use self::hierarchical::hierarchical_extraction;
use self::ordering::reachability_ordering;
use self::params::{ExtractionMethod, HierarchicalParams};

/// The four outputs of a clustering run. `core_distances`, `reachability`
/// and `labels` are indexed by point index; `ordering` maps ordering
/// positions to point indices.
#[derive(Clone)]
pub struct OpticsResult {
    pub core_distances: Array1<f64>,
    pub ordering: Vec<usize>,
    pub reachability: Array1<f64>,
    pub labels: Array1<i64>,
} // end of OpticsResult

/// Runs the whole OPTICS clustering.
///
/// `x` is either a (n, d) feature matrix, or a (n, n) precomputed distance
/// matrix when the metric is [`Metric::Precomputed`]. The metric is taken
/// as the typed enum; callers holding a metric name can go through
/// [`Metric::from_name`] first.
/// `extraction` selects the extraction strategy by name (only
/// "hierarchical" is registered); an unknown name fails before any
/// clustering work. As in the reference extraction, `min_samples` also
/// serves as the minimal cluster size.
pub fn run_optics<F: Float>(
    x: &ArrayView2<F>,
    eps: f64,
    min_samples: usize,
    metric: Metric,
    extraction: &str,
    ext_params: &HierarchicalParams,
) -> Result<OpticsResult, OpticsError> {
    let method = ExtractionMethod::from_name(extraction)?;
    run_with_method(x, eps, min_samples, metric, method, ext_params)
} // end of run_optics

pub(crate) fn run_with_method<F: Float>(
    x: &ArrayView2<F>,
    eps: f64,
    min_samples: usize,
    metric: Metric,
    method: ExtractionMethod,
    ext_params: &HierarchicalParams,
) -> Result<OpticsResult, OpticsError> {
    //
    let dists = PairDistances::new(x.view(), metric)?;
    let ordered = reachability_ordering(&dists, eps, min_samples)?;
    let labels = match method {
        ExtractionMethod::Hierarchical => hierarchical_extraction(
            &ordered.ordering,
            &ordered.reachability,
            min_samples,
            ext_params,
        ),
    };
    Ok(OpticsResult {
        core_distances: ordered.core_distances,
        ordering: ordered.ordering,
        reachability: ordered.reachability,
        labels,
    })
} // end of run_with_method

//====================================================================================================

/// Stateful front to [`run_optics`] : stores the configuration, runs the
/// clustering on [`Self::fit`] and keeps the four result arrays accessible.
pub struct Optics {
    /// neighbourhood radius. default +inf
    eps: f64,
    /// rank of the neighbour defining the core distance, also the minimal cluster size. default 5
    min_samples: usize,
    /// pairwise distance metric. default euclidean
    metric: Metric,
    /// the extraction strategy. default hierarchical
    extraction: ExtractionMethod,
    /// parameters forwarded to the extraction
    ext_params: HierarchicalParams,
    /// results of the last fit
    results: Option<OpticsResult>,
} // end of Optics

impl Optics {
    pub fn default() -> Self {
        Optics {
            eps: f64::INFINITY,
            min_samples: 5,
            metric: Metric::Euclidean,
            extraction: ExtractionMethod::Hierarchical,
            ext_params: HierarchicalParams::default(),
            results: None,
        }
    }

    pub fn new(eps: f64, min_samples: usize, metric: Metric) -> Self {
        let mut optics = Self::default();
        optics.eps = eps;
        optics.min_samples = min_samples;
        optics.metric = metric;
        optics
    }

    pub fn log(&self) {
        log::info!("Optics");
        log::info!("\t eps : {:.3e}", self.eps);
        log::info!("\t min_samples : {}", self.min_samples);
        log::info!("\t metric : {:?}", self.metric);
        log::info!("\t extraction : {:?}", self.extraction);
        self.ext_params.log();
    }

    /// sets the neighbourhood radius. Default to +inf
    pub fn set_eps(&mut self, eps: f64) {
        self.eps = eps;
    }

    /// sets the core distance rank. Default to 5
    pub fn set_min_samples(&mut self, min_samples: usize) {
        self.min_samples = min_samples;
    }

    /// sets the pairwise distance metric. Default to euclidean
    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
    }

    /// selects the extraction strategy by name
    pub fn set_extraction(&mut self, name: &str) -> Result<(), OpticsError> {
        self.extraction = ExtractionMethod::from_name(name)?;
        Ok(())
    }

    /// sets the parameters forwarded to the extraction strategy
    pub fn set_ext_params(&mut self, params: HierarchicalParams) {
        self.ext_params = params;
    }

    /// runs the clustering and stores the results
    pub fn fit<F: Float>(&mut self, x: &ArrayView2<F>) -> Result<&mut Self, OpticsError> {
        let results = run_with_method(
            x,
            self.eps,
            self.min_samples,
            self.metric,
            self.extraction,
            &self.ext_params,
        )?;
        self.results = Some(results);
        Ok(self)
    } // end of fit

    /// core distance of each point, once fitted
    pub fn get_core_distances(&self) -> Option<&Array1<f64>> {
        self.results.as_ref().map(|r| &r.core_distances)
    }

    /// visit order of the points, once fitted
    pub fn get_ordering(&self) -> Option<&Vec<usize>> {
        self.results.as_ref().map(|r| &r.ordering)
    }

    /// reachability distance of each point, once fitted
    pub fn get_reachability(&self) -> Option<&Array1<f64>> {
        self.results.as_ref().map(|r| &r.reachability)
    }

    /// cluster label of each point (-1 for noise), once fitted
    pub fn get_labels(&self) -> Option<&Array1<i64>> {
        self.results.as_ref().map(|r| &r.labels)
    }
} // end of impl Optics

//====================================================================================================

// end of mod tests
