//! Re-exports of the main entry points of the crate.

pub use crate::dist::{Metric, PairDistances};
pub use crate::error::OpticsError;
pub use crate::optics::hierarchical::hierarchical_extraction;
pub use crate::optics::ordering::{reachability_ordering, OpticsOrdering};
pub use crate::optics::params::{ExtractionMethod, HierarchicalParams};
pub use crate::optics::{run_optics, Optics, OpticsResult};
