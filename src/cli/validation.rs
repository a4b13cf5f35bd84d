// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::core::DistanceModel;
use crate::error::{Error, Result};
use crate::output::MatrixFormat;
use regex::Regex;
use std::str::FromStr;

pub struct ValidationResult {
    pub model: DistanceModel,
    pub format: MatrixFormat,
    pub include_regex: Option<Regex>,
    pub exclude_regex: Option<Regex>,
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidParameter(message.into())
}

fn compile(pattern: &Option<String>, option: &str) -> Result<Option<Regex>> {
    pattern
        .as_deref()
        .map(|p| Regex::new(p).map_err(|e| invalid(format!("Invalid {} regex: {}", option, e))))
        .transpose()
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult> {
    let model = DistanceModel::from_str(&args.model).map_err(invalid)?;
    let format = MatrixFormat::from_str(&args.format).map_err(invalid)?;

    if args.label_column == 0 {
        return Err(invalid("--label-column is 1-based"));
    }

    // Calendar-time scaling
    if !(args.generation.is_finite() && args.generation > 0.0) {
        return Err(invalid(format!("Generation length must be positive, got {}", args.generation)));
    }
    if !(args.calibration.is_finite() && args.calibration > 0.0) {
        return Err(invalid(format!("Calibration factor must be positive, got {}", args.calibration)));
    }

    // Reductions
    if args.markers == Some(0) {
        return Err(invalid("--markers must be at least 1"));
    }
    if args.reduce == Some(0) {
        return Err(invalid("--reduce must be at least 1"));
    }
    if args.threads == Some(0) {
        return Err(invalid("--threads must be at least 1"));
    }

    // Marker selection thresholds
    if !(0.0..=1.0).contains(&args.select_min_frequency) {
        return Err(invalid("Minimum marker frequency must be between 0.0 and 1.0"));
    }
    if let Some(max) = args.select_max_values {
        if max < args.select_min_values {
            return Err(invalid(format!(
                "Maximum distinct values ({}) is below the minimum ({})",
                max, args.select_min_values
            )));
        }
    }

    // Compile regex patterns
    let include_regex = compile(&args.include, "include")?;
    let exclude_regex = compile(&args.exclude, "exclude")?;

    Ok(ValidationResult {
        model,
        format,
        include_regex,
        exclude_regex,
    })
}
