// mod.rs - Output formatters module

pub mod label;
pub mod persons;
pub mod rates;

pub use label::to_label;
pub use persons::{write_persons_html, write_persons_txt};
pub use rates::write_rates;

use crate::core::DistanceMatrix;
use crate::data::Person;
use crate::error::{Error, Result};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Distance matrix file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    Phylip,
    Tsv,
    Nexus,
}

impl FromStr for MatrixFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "phylip" => Ok(MatrixFormat::Phylip),
            "tsv" => Ok(MatrixFormat::Tsv),
            "nexus" => Ok(MatrixFormat::Nexus),
            _ => Err(format!("Unsupported output format: {}. Use: phylip, tsv, nexus", s)),
        }
    }
}

impl MatrixFormat {
    pub fn description(&self) -> &str {
        match self {
            MatrixFormat::Phylip => "PHYLIP square matrix (entry count, then label and tab-separated distances)",
            MatrixFormat::Tsv => "Tab-separated matrix with a header row of labels",
            MatrixFormat::Nexus => "NEXUS DISTANCES block (lower triangle)",
        }
    }
}

/// Ensure parent directory exists before creating file
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    Ok(())
}

/// Create `path` (and its parent directory) and fill it with `write`.
pub(crate) fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io(path, e))
}

fn cell(value: Option<f64>, undefined: &str) -> String {
    match value {
        Some(d) => d.to_string(),
        None => undefined.to_string(),
    }
}

fn check_size(persons: &[Person], matrix: &DistanceMatrix) -> Result<()> {
    if persons.len() != matrix.size() {
        return Err(Error::InvalidParameter(format!(
            "{} persons for a {} × {} matrix",
            persons.len(),
            matrix.size(),
            matrix.size()
        )));
    }
    Ok(())
}

fn phylip_rows(writer: &mut impl Write, persons: &[Person], matrix: &DistanceMatrix) -> std::io::Result<()> {
    writeln!(writer, "{}", matrix.size())?;
    for (person, row) in persons.iter().zip(matrix.rows()) {
        write!(writer, "{}", person.label)?;
        for &value in row {
            write!(writer, "\t{}", cell(value, "NA"))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn tsv_rows(writer: &mut impl Write, persons: &[Person], matrix: &DistanceMatrix) -> std::io::Result<()> {
    writeln!(writer, "# Generated: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(writer, "# ystrdist v{}", env!("CARGO_PKG_VERSION"))?;

    write!(writer, "Label")?;
    for person in persons {
        write!(writer, "\t{}", person.label)?;
    }
    writeln!(writer)?;

    for (person, row) in persons.iter().zip(matrix.rows()) {
        write!(writer, "{}", person.label)?;
        for &value in row {
            write!(writer, "\t{}", cell(value, "NA"))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn nexus_rows(writer: &mut impl Write, persons: &[Person], matrix: &DistanceMatrix) -> std::io::Result<()> {
    writeln!(writer, "#NEXUS")?;
    writeln!(writer, "[Generated: {}]", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(writer, "[ystrdist v{}]", env!("CARGO_PKG_VERSION"))?;
    writeln!(writer, "BEGIN DISTANCES;")?;
    writeln!(writer, "    DIMENSIONS NTAX={};", persons.len())?;
    writeln!(writer, "    FORMAT LABELS LOWER DIAGONAL;")?;
    writeln!(writer, "    MATRIX")?;

    // Lower triangle, diagonal included
    for (i, person) in persons.iter().enumerate() {
        write!(writer, "        {}", person.label)?;
        for j in 0..=i {
            write!(writer, " {}", cell(matrix.get(i, j), "?"))?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "    ;")?;
    writeln!(writer, "END;")?;
    Ok(())
}

/// Write distance matrix in the specified format
pub fn write_matrix<P: AsRef<Path>>(
    path: P,
    format: MatrixFormat,
    persons: &[Person],
    matrix: &DistanceMatrix,
) -> Result<()> {
    let path = path.as_ref();
    check_size(persons, matrix)?;
    match format {
        MatrixFormat::Phylip => write_file(path, |w| phylip_rows(w, persons, matrix)),
        MatrixFormat::Tsv => write_file(path, |w| tsv_rows(w, persons, matrix)),
        MatrixFormat::Nexus => write_file(path, |w| nexus_rows(w, persons, matrix)),
    }?;
    log::info!("Distance matrix written to {} ({:?} format)", path.display(), format);
    Ok(())
}
