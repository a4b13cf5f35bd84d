// config.rs - Configuration file support

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    // Input/Output
    pub persons: Option<String>,
    pub label_column: Option<usize>,
    pub layout: Option<String>,
    pub rates_in: Option<String>,
    pub rates_out: Option<String>,
    pub matrix_out: Option<String>,
    pub format: Option<String>,
    pub txt_out: Option<String>,
    pub html_out: Option<String>,
    pub values: Option<usize>,

    // Distance settings
    pub model: Option<String>,
    pub generation: Option<f64>,
    pub calibration: Option<f64>,

    // Population
    pub anonymize: Option<bool>,
    pub modal: Option<bool>,
    pub markers: Option<usize>,
    pub reduce: Option<usize>,
    pub include: Option<String>,
    pub exclude: Option<String>,

    // Marker statistics
    pub stats: Option<bool>,
    pub select_min_frequency: Option<f64>,
    pub select_min_values: Option<usize>,
    pub select_max_values: Option<usize>,
    pub counting_rates_out: Option<String>,

    // Performance
    pub threads: Option<usize>,
    pub progress: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# ystrdist.toml - Configuration file for ystrdist
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Persons: FTDNA .csv export, whitespace separated .txt, or a directory of
# YFull .csv files
persons = "/path/to/persons.csv"

# 1-based CSV column used for person labels
label_column = 2

# TOML marker layout (omit for the built-in FTDNA 111-marker order)
# layout = "layout.toml"

# JSON mutation rates (omit to weight every marker 1)
# rates_in = "rates.json"

# Write the mutation rates in use
# rates_out = "rates_used.json"

# Output distance matrix file
matrix_out = "distances.phy"

# Output format: phylip, tsv, nexus
format = "phylip"

# Person tables and the number of marker values they show
# txt_out = "persons.txt"
# html_out = "persons.html"
values = 67

# =============================================================================
# DISTANCE SETTINGS
# =============================================================================

# Distance model: hybrid, infinite, count
model = "hybrid"

# Generation length in years and calibration factor
generation = 25.0
calibration = 1.0

# =============================================================================
# POPULATION
# =============================================================================

# Replace IDs, names and labels by sequence numbers
anonymize = false

# Prepend the modal haplotype
modal = true

# Keep only persons tested for the first N markers
# markers = 37

# Keep only every Nth person
# reduce = 2

# Include/exclude persons by label regex
# include = "^N"
# exclude = "control"

# =============================================================================
# MARKER STATISTICS
# =============================================================================

# Print per-marker statistics
stats = false

# Marker selection thresholds
# select_min_frequency = 0.9
# select_min_values = 2
# select_max_values = 4

# Counting rate table for the selected markers
# counting_rates_out = "counting_rates.json"

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
# threads = 8

# Progress bar while computing the matrix
progress = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sample_config_parses() {
        let config = Config::from_toml_str(&Config::generate_sample()).unwrap();
        assert_eq!(config.persons.as_deref(), Some("/path/to/persons.csv"));
        assert_eq!(config.label_column, Some(2));
        assert_eq!(config.model.as_deref(), Some("hybrid"));
        assert_eq!(config.generation, Some(25.0));
        assert_eq!(config.modal, Some(true));
        assert_eq!(config.markers, None);
    }

    #[test]
    fn test_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "persons = \"p.txt\"\nmarkers = 67\n").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.persons.as_deref(), Some("p.txt"));
        assert_eq!(config.markers, Some(67));
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(Config::from_toml_str("markers = \"many\""), Err(Error::Toml(_))));
        assert!(matches!(Config::from_toml_str("cache_file = \"x\""), Err(Error::Toml(_))));
        assert!(matches!(Config::from_file("/nonexistent/ystrdist.toml"), Err(Error::Io { .. })));
    }
}
