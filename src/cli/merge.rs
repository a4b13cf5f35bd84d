// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};
use crate::error::Result;

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.persons.is_none() {
            self.persons = config.persons;
        }
        if self.label_column == 1 {
            if let Some(column) = config.label_column {
                self.label_column = column;
            }
        }
        if self.layout.is_none() {
            self.layout = config.layout;
        }
        if self.rates_in.is_none() {
            self.rates_in = config.rates_in;
        }
        if self.rates_out.is_none() {
            self.rates_out = config.rates_out;
        }
        if self.matrix_out.is_none() {
            self.matrix_out = config.matrix_out;
        }
        if self.txt_out.is_none() {
            self.txt_out = config.txt_out;
        }
        if self.html_out.is_none() {
            self.html_out = config.html_out;
        }

        // Core settings (only override defaults, not explicit CLI values)
        if self.format == "phylip" {
            if let Some(format) = config.format {
                self.format = format;
            }
        }
        if self.values == 67 {
            if let Some(values) = config.values {
                self.values = values;
            }
        }
        if self.model == "hybrid" {
            if let Some(model) = config.model {
                self.model = model;
            }
        }
        if self.generation == 25.0 {
            if let Some(generation) = config.generation {
                self.generation = generation;
            }
        }
        if self.calibration == 1.0 {
            if let Some(calibration) = config.calibration {
                self.calibration = calibration;
            }
        }

        // Population
        if self.markers.is_none() {
            self.markers = config.markers;
        }
        if self.reduce.is_none() {
            self.reduce = config.reduce;
        }
        if self.include.is_none() {
            self.include = config.include;
        }
        if self.exclude.is_none() {
            self.exclude = config.exclude;
        }

        // Marker statistics (only override defaults)
        if self.select_min_frequency == 0.0 {
            if let Some(frequency) = config.select_min_frequency {
                self.select_min_frequency = frequency;
            }
        }
        if self.select_min_values == 0 {
            if let Some(values) = config.select_min_values {
                self.select_min_values = values;
            }
        }
        if self.select_max_values.is_none() {
            self.select_max_values = config.select_max_values;
        }
        if self.counting_rates_out.is_none() {
            self.counting_rates_out = config.counting_rates_out;
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.anonymize && config.anonymize.unwrap_or(false) {
            self.anonymize = true;
        }
        if !self.modal && config.modal.unwrap_or(false) {
            self.modal = true;
        }
        if !self.stats && config.stats.unwrap_or(false) {
            self.stats = true;
        }
        if !self.progress && config.progress.unwrap_or(false) {
            self.progress = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
