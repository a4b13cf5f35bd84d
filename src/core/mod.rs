// mod.rs - Core logic module

pub mod distance;
pub mod matrix;
pub mod modal;
pub mod reduce;
pub mod statistics;

// Re-export main types for convenience
pub use distance::{distance, DistanceMetric, DistanceModel, HybridDistance, MarkerCountDistance};
pub use matrix::DistanceMatrix;
pub use modal::{modal_haplotype, modal_value, MODAL_ID, MODAL_LABEL};
pub use reduce::{anonymize, filter_by_label, reduce_count, reduce_to_marker_set};
pub use statistics::{counting_rates, mean_and_std_dev, select, statistics, MarkerStatistic, MarkerStatistics};
