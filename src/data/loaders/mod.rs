// mod.rs - Person and mutation-rate readers

pub mod csv;
pub mod rates;
pub mod txt;
pub mod yfull;

pub use self::csv::read_ftdna_csv;
pub use self::rates::read_rates;
pub use self::txt::read_txt;
pub use self::yfull::{read_yfull_dir, read_yfull_file};

use crate::data::{MarkerLayout, Person};
use crate::error::{Error, Result};
use std::path::Path;

/// Parse one STR value; an empty field or `O` means not measured.
pub fn parse_value(field: &str) -> std::result::Result<f64, String> {
    let field = field.trim();
    if field.is_empty() || field == "O" {
        return Ok(0.0);
    }
    field
        .parse::<f64>()
        .map_err(|_| format!("invalid STR value '{}'", field))
}

/// Read persons from a directory of YFull files, an FTDNA `.csv` export or
/// a whitespace separated text file.
///
/// `label_column` is the 1-based CSV column used for labels.
pub fn read_persons<P: AsRef<Path>>(path: P, layout: &MarkerLayout, label_column: usize) -> Result<Vec<Person>> {
    let path = path.as_ref();
    if path.is_dir() {
        return read_yfull_dir(path, layout);
    }
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        if label_column == 0 {
            return Err(Error::InvalidParameter("label column is 1-based".to_string()));
        }
        read_ftdna_csv(path, layout, label_column - 1)
    } else {
        read_txt(path, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("13"), Ok(13.0));
        assert_eq!(parse_value(" 24.2 "), Ok(24.2));
        assert_eq!(parse_value(""), Ok(0.0));
        assert_eq!(parse_value("O"), Ok(0.0));
        assert!(parse_value("x").is_err());
    }

    #[test]
    fn test_read_persons_dispatch() {
        let layout = MarkerLayout::ftdna();
        let dir = TempDir::new().unwrap();

        let txt = dir.path().join("persons.txt");
        let mut file = std::fs::File::create(&txt).unwrap();
        writeln!(file, "_____Smith\t13\t24\t14").unwrap();
        writeln!(file, "_____Jones\t13\t23\t14").unwrap();
        drop(file);
        let persons = read_persons(&txt, &layout, 1).unwrap();
        assert_eq!(persons.len(), 2);

        let csv = dir.path().join("persons.CSV");
        std::fs::write(&csv, "N1,Smith,13,24,14,11,11-14,12,12,13,13,13,29,17,9-10\n").unwrap();
        let persons = read_persons(&csv, &layout, 2).unwrap();
        assert_eq!(persons.len(), 1);
        assert_eq!(persons[0].label, "_____Smith");
        assert!(matches!(
            read_persons(&csv, &layout, 0),
            Err(Error::InvalidParameter(_))
        ));

        let yfull = dir.path().join("yfull");
        std::fs::create_dir(&yfull).unwrap();
        std::fs::write(yfull.join("STR_for_YF01234_20160216.csv"), "DYS393;13\n").unwrap();
        let persons = read_persons(&yfull, &layout, 1).unwrap();
        assert_eq!(persons.len(), 1);
        assert_eq!(persons[0].id, "YF01234");
    }
}
