//! The reachability ordering of Ankerst et al. (1999).
//!
//! A greedy traversal visits every point once. Each visited point gets its
//! core distance (distance to its min_samples-th nearest neighbour, self
//! included); if that distance is within eps the point is a core point and
//! tightens the reachability of its still unprocessed neighbours, then the
//! traversal jumps to the unprocessed point of smallest reachability.
//! Points of the same density based cluster end up contiguous in the
//! ordering, so the reachability distances read in ordering sequence form
//! a plot whose valleys are the clusters.
//!
//! Complexity is O(n^2) : one full distance row and one scan of the seed
//! set per visited point.

use ndarray::Array1;

use num_traits::Float;

use crate::dist::PairDistances;
use crate::error::OpticsError;

/// Output of the traversal. All arrays are indexed by point index,
/// only `ordering` lives in ordering-position space.
pub struct OpticsOrdering {
    /// the permutation of point indices in visit order
    pub ordering: Vec<usize>,
    /// distance of each point to its min_samples-th nearest neighbour
    pub core_distances: Array1<f64>,
    /// reachability distance of each point. The first visited point gets 0
    pub reachability: Array1<f64>,
} // end of OpticsOrdering

/// Computes the OPTICS ordering, core distances and reachability distances.
///
/// `eps` is the neighbourhood radius (+inf admits every point),
/// `min_samples` the 0-based rank of the neighbour defining the core
/// distance (the rank includes the zero distance to self). `min_samples`
/// must be smaller than the number of points.
///
/// Tie breaking is pinned so results are reproducible : the seed set is
/// scanned in ascending point index, the minimum-reachability jump takes
/// the first minimum encountered, and a non core point hands over to the
/// smallest unprocessed index.
pub fn reachability_ordering<F: Float>(
    dists: &PairDistances<F>,
    eps: f64,
    min_samples: usize,
) -> Result<OpticsOrdering, OpticsError> {
    //
    let n = dists.nb_points();
    if min_samples >= n {
        return Err(OpticsError::Configuration(format!(
            "min_samples {} must be smaller than the number of points {}",
            min_samples, n
        )));
    }
    log::debug!(
        "entering reachability_ordering, nb points : {}, eps : {:.3e}, min_samples : {}",
        n,
        eps,
        min_samples
    );
    //
    let mut ordering = Vec::<usize>::with_capacity(n);
    let mut core_distances = Array1::<f64>::from_elem(n, f64::INFINITY);
    let mut reachability = Array1::<f64>::from_elem(n, f64::INFINITY);
    // unprocessed points, kept sorted in ascending index
    let mut seeds: Vec<usize> = (0..n).collect();
    //
    let mut i = 0usize;
    while seeds.len() > 1 {
        // i always comes from seeds
        let pos = seeds.binary_search(&i).unwrap();
        seeds.remove(pos);
        ordering.push(i);
        //
        let row = dists.row(i);
        let core_dist = rank_distance(&row, min_samples);
        core_distances[i] = core_dist;
        //
        if core_dist <= eps {
            // a core point tightens the reachability of its unprocessed neighbours
            for &j in seeds.iter() {
                let d = row[j];
                if d <= eps {
                    let reach = core_dist.max(d);
                    if reach < reachability[j] {
                        reachability[j] = reach;
                    }
                }
            }
            // jump to the seed of smallest reachability, first match wins
            let mut next = seeds[0];
            let mut best = f64::INFINITY;
            for &j in seeds.iter() {
                if reachability[j] < best {
                    best = reachability[j];
                    next = j;
                }
            }
            i = next;
        } else {
            // not a core point : no reachability update, resume at the
            // smallest unprocessed index
            i = seeds[0];
        }
    } // end of while
    // the last seed is appended as is; its core distance is still computed
    // so the rank property holds for every point
    let last = seeds[0];
    ordering.push(last);
    core_distances[last] = rank_distance(&dists.row(last), min_samples);
    // the start of the ordering has no predecessor to be reached from
    reachability[ordering[0]] = 0.;
    //
    log::debug!("reachability_ordering done, nb points ordered : {}", ordering.len());
    Ok(OpticsOrdering {
        ordering,
        core_distances,
        reachability,
    })
} // end of reachability_ordering

// value at the given 0-based rank of the sorted distance row
fn rank_distance(row: &Array1<f64>, rank: usize) -> f64 {
    let mut sorted: Vec<f64> = row.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
    sorted[rank]
} // end of rank_distance

//====================================================================================================

// end of mod tests
