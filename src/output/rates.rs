// rates.rs - Mutation rate tables as JSON

use super::write_file;
use crate::data::{MarkerLayout, MutationRates};
use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use std::io::Write;
use std::path::Path;

/// Rates keyed by marker name, serialized in layout order.
struct NamedRates<'a> {
    layout: &'a MarkerLayout,
    rates: &'a MutationRates,
}

impl Serialize for NamedRates<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.rates.named(self.layout))
    }
}

/// JSON object with one entry per layout slot, in layout order.
pub fn rates_to_json(layout: &MarkerLayout, rates: &MutationRates) -> Result<String> {
    if rates.len() != layout.len() {
        return Err(Error::LayoutMismatch {
            expected: layout.len(),
            found: rates.len(),
        });
    }
    let mut json = serde_json::to_string_pretty(&NamedRates { layout, rates })?;
    json.push('\n');
    Ok(json)
}

pub fn write_rates<P: AsRef<Path>>(path: P, layout: &MarkerLayout, rates: &MutationRates) -> Result<()> {
    let path = path.as_ref();
    let json = rates_to_json(layout, rates)?;
    write_file(path, |writer| writer.write_all(json.as_bytes()))?;
    log::info!("Mutation rates written to {}", path.display());
    Ok(())
}
