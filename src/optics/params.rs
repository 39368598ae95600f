//! This module defines the parameters driving cluster extraction
//! and the registry of extraction strategies.

use crate::error::OpticsError;

/// Parameters of the hierarchical extraction of Sander et al. (2003).
///
/// The extraction analyses the reachability plot: a split candidate is a
/// local maximum of the plot, retained if it is high enough relative to the
/// whole plot (min_reach_ratio), prominent enough relative to the regions it
/// separates (significant_ratio), and kept as a separate hierarchy level only
/// if clearly smaller than its parent split (similarity_ratio).
#[derive(Clone, Copy, Debug)]
pub struct HierarchicalParams {
    /// ratio of a local maximum the averages of both neighbouring regions must stay under. default 0.75
    pub significant_ratio: f64,
    /// ratio of a split to its parent split above which the two hierarchy levels are merged. default 0.4
    pub similarity_ratio: f64,
    /// fraction of the largest reachability a local maximum must reach to be considered. default 0.1
    pub min_reach_ratio: f64,
} // end of HierarchicalParams

impl HierarchicalParams {
    pub fn default() -> Self {
        let significant_ratio = 0.75;
        let similarity_ratio = 0.4;
        let min_reach_ratio = 0.1;
        HierarchicalParams {
            significant_ratio,
            similarity_ratio,
            min_reach_ratio,
        }
    }

    pub fn log(&self) {
        log::info!("HierarchicalParams");
        log::info!("\t significant ratio : {}", self.significant_ratio);
        log::info!("\t similarity ratio : {}", self.similarity_ratio);
        log::info!("\t min reach ratio : {}", self.min_reach_ratio);
    }

    /// sets the significance ratio of a split point. Default to 0.75
    pub fn set_significant_ratio(&mut self, ratio: f64) {
        self.significant_ratio = ratio;
    }

    /// sets the similarity ratio to the parent split. Default to 0.4
    pub fn set_similarity_ratio(&mut self, ratio: f64) {
        self.similarity_ratio = ratio;
    }

    /// sets the minimal fraction of the largest reachability. Default to 0.1
    pub fn set_min_reach_ratio(&mut self, ratio: f64) {
        self.min_reach_ratio = ratio;
    }
} // end of impl HierarchicalParams

//====================================================================================================

/// The closed registry of cluster extraction strategies.
///
/// Only the hierarchical extraction is implemented at present, but the
/// dispatch point is kept so other strategies can be added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractionMethod {
    Hierarchical,
} // end of ExtractionMethod

impl ExtractionMethod {
    /// select a strategy by name, case insensitive.
    /// An unrecognized name is a configuration error raised before any clustering work.
    pub fn from_name(name: &str) -> Result<Self, OpticsError> {
        match name.to_lowercase().as_str() {
            "hierarchical" => Ok(ExtractionMethod::Hierarchical),
            _ => Err(OpticsError::Configuration(format!(
                "unknown extraction method : {}",
                name
            ))),
        }
    } // end of from_name
} // end of impl ExtractionMethod

//====================================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    #[allow(dead_code)]
    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_extraction_names() {
        log_init_test();
        //
        assert_eq!(
            ExtractionMethod::from_name("Hierarchical").unwrap(),
            ExtractionMethod::Hierarchical
        );
        let res = ExtractionMethod::from_name("steep");
        match res {
            Err(OpticsError::Configuration(_)) => (),
            _ => panic!("expected a configuration error for an unknown strategy"),
        }
    } // end of test_extraction_names
} // end of mod tests
