// lib.rs - ystrdist library root

//! # ystrdist - Genetic distance matrices from Y-STR marker values
//!
//! This library computes pairwise genetic distances between individuals from
//! Y-chromosome short tandem repeat (Y-STR) values and writes them as
//! distance matrices for phylogenetic tree software.
//!
//! ## Features
//!
//! - **Hybrid mutation model**: stepwise markers, compound DYS389ii and
//!   palindromic multi-copy regions compared as unordered multisets
//! - **Data-driven layout**: marker order, roles and regions come from a
//!   [`data::MarkerLayout`] table (built-in FTDNA 111 order or a TOML file)
//! - **Parallel matrix**: symmetric matrices built with rayon
//! - **Population tools**: modal haplotype, marker-set reduction,
//!   anonymization, marker statistics and selection
//! - **Vendor formats**: FTDNA CSV, plain text and YFull readers; PHYLIP,
//!   TSV, NEXUS, text and HTML writers
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use ystrdist::prelude::*;
//!
//! let layout = MarkerLayout::ftdna();
//! let persons = read_persons("persons.csv", &layout, 2)?;
//! let rates = read_rates("rates.json", &layout)?;
//!
//! let metric = HybridDistance::new(&layout);
//! let matrix = DistanceMatrix::build(&persons, &rates, &metric)?.rescale(25.0, 1.0);
//! write_matrix("distances.phy", MatrixFormat::Phylip, &persons, &matrix)?;
//! # Ok::<(), ystrdist::Error>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{anonymize, filter_by_label, modal_haplotype, reduce_count, reduce_to_marker_set};
    pub use crate::core::{counting_rates, mean_and_std_dev, select, statistics};
    pub use crate::core::{DistanceMatrix, DistanceMetric, DistanceModel, HybridDistance, MarkerCountDistance};
    pub use crate::data::loaders::{read_persons, read_rates};
    pub use crate::data::{MarkerLayout, MarkerVector, MutationRates, Person};
    pub use crate::error::{Error, Result};
    pub use crate::output::{write_matrix, write_persons_html, write_persons_txt, write_rates, MatrixFormat};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{DistanceMatrix, DistanceModel};
pub use data::{MarkerLayout, MarkerVector, MutationRates, Person};
pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!("ystrdist v{} - Y-STR genetic distance calculator", VERSION)
}
