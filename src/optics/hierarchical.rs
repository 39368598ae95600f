//! Hierarchical cluster extraction from the reachability plot,
//! following Sander et al. (2003) :
//!
//! - Automatic extraction of clusters from hierarchical clustering
//!   representations. Sander, Qin, Lu, Niu, Kovarsky (2003)
//!
//! The reachability distances read in ordering sequence form a 1-D plot.
//! Local maxima of the plot are candidate boundaries between clusters.
//! Candidates are consumed from the highest down, recursively splitting the
//! plot into a tree of contiguous ranges. A split must be a prominent
//! enough peak (significance test) and both resulting ranges must be large
//! enough or touch an end of the plot. A split of nearly the same height as
//! its parent split does not open a new hierarchy level : its children are
//! attached directly to the parent.
//! Tree leaves are the clusters; points outside every leaf are noise (-1).

use ndarray::Array1;

use crate::optics::params::HierarchicalParams;

/// index of a node inside the tree arena
type NodeId = usize;

/// A contiguous half open range [left, right) of ordering positions.
/// Children are stored as arena indices, a node without children is a leaf.
struct TreeNode {
    left: usize,
    right: usize,
    split: Option<usize>,
    children: Vec<NodeId>,
} // end of TreeNode

/// The split tree over the reachability plot. Nodes live in an arena and
/// reference each other by index, so merging a level away is just an edit
/// of the parent's child list.
struct ClusterTree<'a> {
    nodes: Vec<TreeNode>,
    /// the reachability plot (reachability in ordering sequence)
    plot: &'a [f64],
    min_cluster_size: usize,
    params: HierarchicalParams,
} // end of ClusterTree

impl<'a> ClusterTree<'a> {
    fn new(plot: &'a [f64], min_cluster_size: usize, params: HierarchicalParams) -> Self {
        let root = TreeNode {
            left: 0,
            right: plot.len(),
            split: None,
            children: Vec::new(),
        };
        ClusterTree {
            nodes: vec![root],
            plot,
            min_cluster_size,
            params,
        }
    } // end of new

    fn add_node(&mut self, left: usize, right: usize) -> NodeId {
        self.nodes.push(TreeNode {
            left,
            right,
            split: None,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Recursively splits a node at its candidate positions.
    /// Each call owns its candidate list, sorted ascending by plot value
    /// and consumed from the end (highest peak first).
    fn build(&mut self, node: NodeId, parent: Option<NodeId>, mut candidates: Vec<usize>) {
        // look for a significant split, dropping candidates that fail
        let s = loop {
            let s = match candidates.pop() {
                Some(s) => s,
                // no candidate left : the node is final
                None => return,
            };
            self.nodes[node].split = Some(s);
            let (left, right) = (self.nodes[node].left, self.nodes[node].right);
            let avg_left = mean(&self.plot[left..s]);
            let avg_right = mean(&self.plot[s..right]);
            let score = self.params.significant_ratio * self.plot[s];
            if avg_left <= score && score >= avg_right {
                break s;
            }
        };
        //
        let (left, right) = (self.nodes[node].left, self.nodes[node].right);
        let n = self.plot.len();
        // each child keeps the candidates strictly inside its own range
        let cand_left: Vec<usize> = candidates.iter().copied().filter(|&p| p < s).collect();
        let cand_right: Vec<usize> = candidates.iter().copied().filter(|&p| p > s).collect();
        // a child survives if large enough or touching an end of the plot
        let mut accepted: Vec<(NodeId, Vec<usize>)> = Vec::new();
        if s - left >= self.min_cluster_size || left == 0 {
            let child = self.add_node(left, s);
            accepted.push((child, cand_left));
        }
        if right - s >= self.min_cluster_size || right == n {
            let child = self.add_node(s, right);
            accepted.push((child, cand_right));
        }
        if accepted.is_empty() {
            // both children filtered out : abandon the split, the node is final
            return;
        }
        // a split nearly as high as its parent's does not open a new level :
        // its children replace this node in the parent
        let mut target = node;
        if let Some(p) = parent {
            let parent_split = self.nodes[p].split.unwrap();
            if self.plot[s] / self.plot[parent_split] >= self.params.similarity_ratio {
                let pos = self.nodes[p].children.iter().position(|&c| c == node).unwrap();
                for &(child, _) in accepted.iter() {
                    self.nodes[p].children.push(child);
                }
                self.nodes[p].children.remove(pos);
                target = p;
            }
        }
        if target == node {
            for &(child, _) in accepted.iter() {
                self.nodes[node].children.push(child);
            }
        }
        for (child, cands) in accepted {
            self.build(child, Some(target), cands);
        }
    } // end of build

    /// depth first traversal returning the leaves in visit order.
    /// The position of a leaf in this list is its cluster label.
    fn leaves(&self) -> Vec<NodeId> {
        let mut found = Vec::<NodeId>::new();
        let mut stack = vec![0 as NodeId];
        while let Some(node) = stack.pop() {
            let children = &self.nodes[node].children;
            if children.is_empty() {
                found.push(node);
            } else {
                for &child in children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        found
    } // end of leaves
} // end of impl ClusterTree

fn mean(v: &[f64]) -> f64 {
    if v.is_empty() {
        0.
    } else {
        v.iter().sum::<f64>() / v.len() as f64
    }
} // end of mean

// first position holding the maximum of the slice
fn argmax(v: &[f64]) -> usize {
    let mut imax = 0;
    for (i, &x) in v.iter().enumerate() {
        if x > v[imax] {
            imax = i;
        }
    }
    imax
} // end of argmax

/// Candidate split positions : positions that are the (first match) argmax
/// of the plot inside a window of half width `w` centered on them, with
/// truncated windows at both ends of the plot. A position can be flagged by
/// both an end rule and the interior rule, duplicates are tolerated later.
fn local_maxima(plot: &[f64], w: usize) -> Vec<usize> {
    let n = plot.len();
    let mut found = Vec::<usize>::new();
    if w == 0 {
        return found;
    }
    for i in 0..w.min(n) {
        // truncated window at the start of the plot
        if argmax(&plot[0..(i + w + 1).min(n)]) == i {
            found.push(i);
        }
        // mirrored truncated window at the end
        if n + i >= w {
            let start = (n + i).saturating_sub(2 * w);
            if argmax(&plot[start..n]) == i {
                found.push(n - w + i);
            }
        }
    }
    for i in w..n.saturating_sub(w) {
        if argmax(&plot[i - w..i + w + 1]) == w {
            found.push(i);
        }
    }
    found
} // end of local_maxima

/// Extracts a flat clustering from an OPTICS ordering and its reachability
/// distances. Returns one label per point (indexed by point index), noise
/// points get -1, cluster labels are contiguous from 0 in leaf order.
pub fn hierarchical_extraction(
    ordering: &[usize],
    reachability: &Array1<f64>,
    min_cluster_size: usize,
    params: &HierarchicalParams,
) -> Array1<i64> {
    //
    let n = ordering.len();
    let mut labels = Array1::<i64>::from_elem(n, -1);
    if n == 0 {
        return labels;
    }
    // the reachability plot : reachability read in ordering sequence
    let plot: Vec<f64> = ordering.iter().map(|&i| reachability[i]).collect();
    //
    let mut candidates = local_maxima(&plot, min_cluster_size);
    // ascending sort by plot value; stable, so equal peaks keep position order
    candidates.sort_by(|&a, &b| plot[a].partial_cmp(&plot[b]).unwrap());
    // low peaks relative to the highest one are not credible boundaries
    if let Some(&highest) = candidates.last() {
        let min_reach = params.min_reach_ratio * plot[highest];
        candidates.retain(|&p| plot[p] >= min_reach);
    }
    log::debug!(
        "hierarchical_extraction, nb points : {}, nb split candidates : {}",
        n,
        candidates.len()
    );
    //
    let mut tree = ClusterTree::new(&plot, min_cluster_size, *params);
    tree.build(0, None, candidates);
    //
    let leaves = tree.leaves();
    log::debug!("hierarchical_extraction, nb clusters : {}", leaves.len());
    let mut label = 0i64;
    for &leaf in leaves.iter() {
        let node = &tree.nodes[leaf];
        // an empty range can survive the size filter by touching a plot
        // boundary; it covers no point and must not consume a label
        if node.left == node.right {
            continue;
        }
        for pos in node.left..node.right {
            labels[ordering[pos]] = label;
        }
        label += 1;
    }
    labels
} // end of hierarchical_extraction

//====================================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    #[allow(dead_code)]
    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // a plot with a low valley, one high peak and another low valley
    fn two_valley_plot(n: usize, peak_pos: usize, peak: f64) -> (Vec<usize>, Array1<f64>) {
        let ordering: Vec<usize> = (0..n).collect();
        let mut reachability = Array1::<f64>::from_elem(n, 1.);
        reachability[0] = 0.;
        reachability[peak_pos] = peak;
        (ordering, reachability)
    } // end of two_valley_plot

    #[test]
    fn test_local_maxima() {
        log_init_test();
        //
        let plot = [0., 1., 5., 1., 0., 4., 0.];
        let found = local_maxima(&plot, 1);
        assert_eq!(found, vec![6, 2, 5]);
    } // end of test_local_maxima

    #[test]
    fn test_two_valleys_split() {
        log_init_test();
        //
        let (ordering, reachability) = two_valley_plot(20, 10, 100.);
        let labels = hierarchical_extraction(&ordering, &reachability, 3, &HierarchicalParams::default());
        //
        for i in 0..10 {
            assert_eq!(labels[i], 0);
        }
        for i in 10..20 {
            assert_eq!(labels[i], 1);
        }
    } // end of test_two_valleys_split

    #[test]
    fn test_flat_plot_single_cluster() {
        log_init_test();
        // no structural gap in the plot : the root must stay unsplit
        let ordering: Vec<usize> = (0..20).collect();
        let mut reachability = Array1::<f64>::from_elem(20, 2.);
        reachability[0] = 0.;
        let labels = hierarchical_extraction(&ordering, &reachability, 3, &HierarchicalParams::default());
        for i in 0..20 {
            assert_eq!(labels[i], 0);
        }
    } // end of test_flat_plot_single_cluster

    #[test]
    fn test_similar_splits_merge_into_parent() {
        log_init_test();
        // two peaks of similar height : the second split must not open a
        // deeper level, all three clusters end up siblings
        let ordering: Vec<usize> = (0..30).collect();
        let mut reachability = Array1::<f64>::from_elem(30, 1.);
        reachability[0] = 0.;
        reachability[10] = 100.;
        reachability[20] = 90.;
        let labels = hierarchical_extraction(&ordering, &reachability, 3, &HierarchicalParams::default());
        for i in 0..10 {
            assert_eq!(labels[i], 0);
        }
        for i in 10..20 {
            assert_eq!(labels[i], 1);
        }
        for i in 20..30 {
            assert_eq!(labels[i], 2);
        }
    } // end of test_similar_splits_merge_into_parent

    #[test]
    fn test_nested_splits() {
        log_init_test();
        // a second peak much lower than the first : a nested level opens,
        // the flat partition is the same
        let ordering: Vec<usize> = (0..30).collect();
        let mut reachability = Array1::<f64>::from_elem(30, 1.);
        reachability[0] = 0.;
        reachability[10] = 100.;
        reachability[20] = 20.;
        let labels = hierarchical_extraction(&ordering, &reachability, 3, &HierarchicalParams::default());
        for i in 0..10 {
            assert_eq!(labels[i], 0);
        }
        for i in 10..20 {
            assert_eq!(labels[i], 1);
        }
        for i in 20..30 {
            assert_eq!(labels[i], 2);
        }
    } // end of test_nested_splits

    #[test]
    fn test_labels_through_ordering() {
        log_init_test();
        // labels are indexed by point index, not by ordering position
        let ordering: Vec<usize> = (0..20).rev().collect();
        let mut reachability = Array1::<f64>::from_elem(20, 1.);
        // point 19 is visited first
        reachability[19] = 0.;
        // the peak sits at ordering position 10, which is point 9
        reachability[9] = 100.;
        let labels = hierarchical_extraction(&ordering, &reachability, 3, &HierarchicalParams::default());
        // first ten visited points are 19..10
        for i in 10..20 {
            assert_eq!(labels[i], 0);
        }
        for i in 0..10 {
            assert_eq!(labels[i], 1);
        }
    } // end of test_labels_through_ordering

    #[test]
    fn test_leaf_ranges_partition_or_noise() {
        log_init_test();
        // a peak right after the start : the left side is a single position
        // but touches the start of the plot and is kept as a cluster
        let ordering: Vec<usize> = (0..20).collect();
        let mut reachability = Array1::<f64>::from_elem(20, 1.);
        reachability[0] = 0.;
        reachability[1] = 100.;
        let labels = hierarchical_extraction(&ordering, &reachability, 3, &HierarchicalParams::default());
        // every label is -1 or in a contiguous range starting at 0
        let mut max_label = -1i64;
        for &l in labels.iter() {
            assert!(l >= -1);
            max_label = max_label.max(l);
        }
        for expected in 0..=max_label {
            assert!(labels.iter().any(|&l| l == expected));
        }
        // and here nothing is noise : both sides of the split are kept
        assert!(labels.iter().all(|&l| l >= 0));
        assert_eq!(max_label, 1);
        assert_eq!(labels[0], 0);
        for i in 1..20 {
            assert_eq!(labels[i], 1);
        }
    } // end of test_leaf_ranges_partition_or_noise

    #[test]
    fn test_zero_plot_labels_start_at_zero() {
        log_init_test();
        // an all zero plot makes position 0 a split candidate : the empty
        // left range survives by touching the boundary but must not be
        // numbered, labels have to stay contiguous from 0
        let ordering: Vec<usize> = (0..20).collect();
        let reachability = Array1::<f64>::zeros(20);
        let labels = hierarchical_extraction(&ordering, &reachability, 3, &HierarchicalParams::default());
        //
        assert!(labels.iter().all(|&l| l >= 0));
        assert!(labels.iter().any(|&l| l == 0));
        let max_label = labels.iter().max().unwrap();
        for expected in 0..=*max_label {
            assert!(labels.iter().any(|&l| l == expected));
        }
    } // end of test_zero_plot_labels_start_at_zero
} // end of mod tests
