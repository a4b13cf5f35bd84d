// yfull.rs - YFull STR result files (`marker;value` per line)

use crate::data::{MarkerLayout, MarkerVector, Person};
use crate::error::{Error, Result};
use crate::output::label::to_label;
use std::path::Path;

const FILE_PREFIX: &str = "STR_for_";
const ALLELE_SUFFIXES: [&str; 4] = [".a", ".c", ".g", ".t"];

/// Person ID from a file name such as `STR_for_YF01234_20160216.csv`.
pub fn id_from_file_name(file_name: &str) -> String {
    if let Some(rest) = file_name.strip_prefix(FILE_PREFIX) {
        return rest.split('_').next().unwrap_or(rest).to_string();
    }
    file_name
        .strip_suffix(".csv")
        .unwrap_or(file_name)
        .to_string()
}

fn strip_allele_suffix(value: &str) -> &str {
    ALLELE_SUFFIXES
        .iter()
        .find_map(|suffix| value.strip_suffix(suffix))
        .unwrap_or(value)
}

/// Read one person from a YFull file. Unknown markers and unreadable
/// values are skipped with a warning.
pub fn read_yfull_file<P: AsRef<Path>>(path: P, layout: &MarkerLayout) -> Result<Person> {
    let path = path.as_ref();
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_path(path)?;

    let mut markers = MarkerVector::new(layout);
    let mut records = 0;
    let mut count = 0;
    for record in reader.records() {
        let record = record?;
        records += 1;
        let (Some(name), Some(value)) = (record.get(0), record.get(1)) else {
            if records == 1 {
                return Err(Error::parse(path.display().to_string(), "expected 'marker;value' records"));
            }
            continue;
        };
        if value.is_empty() || value == "n/a" {
            continue;
        }
        let value = match strip_allele_suffix(value).parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("{}: unreadable value '{}' for {}", path.display(), value, name);
                continue;
            }
        };
        match layout.index_of(name) {
            Some(position) => {
                markers[position] = value;
                count += 1;
            }
            None => log::warn!("{}: unknown marker '{}'", path.display(), name),
        }
    }
    if records == 0 {
        return Err(Error::parse(path.display().to_string(), "no data found"));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let id = id_from_file_name(&file_name);
    log::debug!("Read {} markers for {}", count, id);

    let mut person = Person::new(id.clone(), to_label(&id), markers);
    person.name = file_name;
    Ok(person)
}

/// Read every `.csv` file in `dir` as a YFull file, in file name order.
/// Files that cannot be read are reported and skipped.
pub fn read_yfull_dir<P: AsRef<Path>>(dir: P, layout: &MarkerLayout) -> Result<Vec<Person>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && path.extension().map(|ext| ext == "csv").unwrap_or(false) {
            files.push(path);
        }
    }
    files.sort();

    let mut persons = Vec::with_capacity(files.len());
    for file in &files {
        match read_yfull_file(file, layout) {
            Ok(person) => persons.push(person),
            Err(e) => log::warn!("Could not read person from {}: {}", file.display(), e),
        }
    }

    log::info!("Loaded {} persons from {} files in {}", persons.len(), files.len(), dir.display());
    Ok(persons)
}
