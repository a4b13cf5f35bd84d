// txt.rs - Whitespace separated person tables

use super::parse_value;
use crate::data::{MarkerLayout, MarkerVector, Person};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Lines this short are blank or hold no values.
const MIN_LINE_LEN: usize = 10;

/// Read persons from a text file: one person per line, the label first,
/// then values in layout order. Lines starting with `//` are comments.
pub fn read_txt<P: AsRef<Path>>(path: P, layout: &MarkerLayout) -> Result<Vec<Person>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);

    let mut persons = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        if line.len() <= MIN_LINE_LEN || line.starts_with("//") {
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else {
            continue;
        };
        let mut markers = MarkerVector::new(layout);
        for (position, field) in fields.take(layout.len()).enumerate() {
            markers[position] = parse_value(field).map_err(|e| {
                Error::parse(
                    format!("{}:{}", path.display(), line_num + 1),
                    format!("{} ({})", e, layout.name(position)),
                )
            })?;
        }
        persons.push(Person::new(label, label, markers));
    }

    log::info!("Loaded {} persons from {}", persons.len(), path.display());
    Ok(persons)
}
