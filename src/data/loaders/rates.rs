// rates.rs - Mutation rate tables in JSON format

use crate::data::{MarkerLayout, MutationRates};
use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Parse a JSON object mapping marker names to rates.
///
/// Unknown names are rejected; markers the object does not name get rate 0.
pub fn parse_rates(content: &str, layout: &MarkerLayout) -> Result<MutationRates> {
    let json: Value = serde_json::from_str(content)?;
    let object = json
        .as_object()
        .ok_or_else(|| Error::parse("mutation rates", "expected a JSON object"))?;

    let mut pairs = Vec::with_capacity(object.len());
    for (name, value) in object {
        let rate = value
            .as_f64()
            .ok_or_else(|| Error::parse("mutation rates", format!("rate for '{}' is not a number: {}", name, value)))?;
        pairs.push((name.as_str(), rate));
    }
    MutationRates::from_named(layout, pairs)
}

pub fn read_rates<P: AsRef<Path>>(path: P, layout: &MarkerLayout) -> Result<MutationRates> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let rates = parse_rates(&content, layout)?;
    log::info!(
        "Loaded mutation rates from {} ({} markers enabled)",
        path.display(),
        rates.enabled_count()
    );
    Ok(rates)
}
