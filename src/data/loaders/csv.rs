// csv.rs - Family Tree DNA style CSV exports

use super::parse_value;
use crate::data::{MarkerLayout, MarkerVector, Person};
use crate::error::Result;
use crate::output::label::to_label;
use std::path::Path;

/// A sample row has an ID and at least 12 STR values.
const MIN_SAMPLE_FIELDS: usize = 13;

/// Every known DYS393 value lies in this range.
const DYS393_RANGE: std::ops::Range<f64> = 9.0..17.0;

/// Index of the first STR value if `fields` holds a sample.
fn str_start(fields: &[String]) -> Option<usize> {
    if fields.len() < MIN_SAMPLE_FIELDS {
        return None;
    }
    fields
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, field)| {
            field
                .trim()
                .parse::<f64>()
                .map(|v| DYS393_RANGE.contains(&v))
                .unwrap_or(false)
        })
        .map(|(i, _)| i)
}

/// Whether any multi-value column holds dash-separated values.
fn is_grouped(layout: &MarkerLayout, records: &[(usize, usize, Vec<String>)]) -> bool {
    let multi_value: Vec<usize> = layout
        .groups()
        .iter()
        .enumerate()
        .filter(|(_, group)| group.positions.len() > 1)
        .map(|(column, _)| column)
        .collect();
    records.iter().any(|(_, start, fields)| {
        multi_value
            .iter()
            .any(|&column| fields.get(start + column).map(|f| f.contains('-')).unwrap_or(false))
    })
}

/// Values in dash format: one column per layout group.
fn grouped_markers(layout: &MarkerLayout, fields: &[String]) -> std::result::Result<MarkerVector, String> {
    let mut markers = MarkerVector::new(layout);
    for (group, field) in layout.groups().iter().zip(fields) {
        for (&position, value) in group.positions.iter().zip(field.split('-')) {
            markers[position] = parse_value(value).map_err(|e| format!("{}: {}", group.name, e))?;
        }
    }
    Ok(markers)
}

/// Values in plain format: one column per canonical marker.
fn plain_markers(layout: &MarkerLayout, fields: &[String]) -> std::result::Result<MarkerVector, String> {
    let mut markers = MarkerVector::new(layout);
    for (position, field) in fields.iter().take(layout.canonical_len()).enumerate() {
        markers[position] = parse_value(field).map_err(|e| format!("{}: {}", layout.name(position), e))?;
    }
    Ok(markers)
}

/// Read persons from a CSV export in the layout's marker order.
///
/// Comment and header rows are skipped. The first column is the person ID,
/// `label_index` (0-based) the column used for labels. Rows that fail to
/// parse are skipped with a warning.
pub fn read_ftdna_csv<P: AsRef<Path>>(path: P, layout: &MarkerLayout, label_index: usize) -> Result<Vec<Person>> {
    let path = path.as_ref();
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_path(path)?;

    let mut samples = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let fields: Vec<String> = record?.iter().map(|f| f.to_string()).collect();
        match str_start(&fields) {
            Some(start) => samples.push((line + 1, start, fields)),
            None => log::debug!("{}:{}: not a sample row", path.display(), line + 1),
        }
    }

    let grouped = is_grouped(layout, &samples);
    log::debug!(
        "{}: {} sample rows, {} values",
        path.display(),
        samples.len(),
        if grouped { "dash separated" } else { "one column per marker" }
    );

    let mut persons = Vec::with_capacity(samples.len());
    for (line, start, fields) in &samples {
        let id = fields[0].trim();
        if id.is_empty() {
            log::warn!("{}:{}: skipping row without ID", path.display(), line);
            continue;
        }
        let Some(label) = fields.get(label_index) else {
            log::warn!("{}:{}: no label column {}", path.display(), line, label_index + 1);
            continue;
        };
        let values = &fields[*start..];
        let markers = if grouped {
            grouped_markers(layout, values)
        } else {
            plain_markers(layout, values)
        };
        match markers {
            Ok(markers) => persons.push(Person::new(id, to_label(label.trim()), markers)),
            Err(e) => log::warn!("{}:{}: skipping '{}': {}", path.display(), line, id, e),
        }
    }

    log::info!("Loaded {} persons from {}", persons.len(), path.display());
    Ok(persons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    /// One dash-format column per group: single markers 12, pairs 11-14,
    /// DYS464 with the given field.
    fn grouped_row(layout: &MarkerLayout, prefix: &str, dys464: &str, groups: usize) -> String {
        let mut fields = vec![prefix.to_string(), "13".to_string()];
        for group in layout.groups().iter().skip(1).take(groups - 1) {
            fields.push(match (group.name.as_str(), group.positions.len()) {
                ("DYS464", _) => dys464.to_string(),
                (_, 1) => "12".to_string(),
                _ => "11-14".to_string(),
            });
        }
        fields.join(",")
    }

    fn write_csv(content: &str) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn test_dash_separated_export() {
        let layout = MarkerLayout::ftdna();
        let content = format!(
            "Kit Number,Name,DYS393,DYS390\n\
             # exported list\n\
             {}\n\
             {}\n",
            grouped_row(&layout, "N123,Smith John", "15-15-17-17-18-19", 40),
            grouped_row(&layout, "N456,Jones", "14-15-16", 25),
        );
        let file = write_csv(&content);

        let persons = read_ftdna_csv(file.path(), &layout, 1).unwrap();
        assert_eq!(persons.len(), 2);

        let smith = &persons[0];
        assert_eq!(smith.id, "N123");
        assert_eq!(smith.label, "Smith_John");
        assert_eq!(smith.markers[layout.position("DYS393").unwrap()], 13.0);
        assert_eq!(smith.markers[layout.position("DYS385a").unwrap()], 11.0);
        assert_eq!(smith.markers[layout.position("DYS385b").unwrap()], 14.0);
        assert_eq!(smith.markers[layout.position("DYS464a").unwrap()], 15.0);
        assert_eq!(smith.markers[layout.position("DYS464d").unwrap()], 17.0);
        assert_eq!(smith.markers[layout.position("DYS464e").unwrap()], 18.0);
        assert_eq!(smith.markers[layout.position("DYS464f").unwrap()], 19.0);
        assert_eq!(smith.markers[layout.position("DYS464g").unwrap()], 0.0);
        assert_eq!(smith.markers[layout.position("YCAIIa").unwrap()], 11.0);

        let jones = &persons[1];
        assert_eq!(jones.label, "_____Jones");
        assert_eq!(jones.markers[layout.position("DYS464c").unwrap()], 16.0);
        assert_eq!(jones.markers[layout.position("DYS464d").unwrap()], 0.0);
        // Past the last column
        assert_eq!(jones.markers[layout.position("CDYa").unwrap()], 0.0);
    }

    #[test]
    fn test_one_column_per_marker() {
        let layout = MarkerLayout::ftdna();
        let mut values: Vec<String> = (0..37).map(|_| "12".to_string()).collect();
        values[0] = "13".to_string();
        values[4] = "11".to_string();
        values[5] = "14".to_string();
        values[21] = "15".to_string();
        values[24] = "O".to_string();
        values[30] = String::new();
        let content = format!("K1,{}\n", values.join(","));
        let file = write_csv(&content);

        let persons = read_ftdna_csv(file.path(), &layout, 0).unwrap();
        assert_eq!(persons.len(), 1);
        let person = &persons[0];
        assert_eq!(person.label, "________K1");
        assert_eq!(person.markers[4], 11.0);
        assert_eq!(person.markers[5], 14.0);
        assert_eq!(person.markers[21], 15.0);
        assert_eq!(person.markers[24], 0.0);
        assert_eq!(person.markers[30], 0.0);
        assert_eq!(person.markers[36], 12.0);
        assert_eq!(person.markers[37], 0.0);
    }

    #[test]
    fn test_non_sample_and_invalid_rows_are_skipped() {
        let layout = MarkerLayout::ftdna();
        let content = format!(
            "Group A,,,\n\
             too,short,13,24\n\
             {}\n\
             {}\n\
             N3,Label,1,2,3,4,5,6,7,8,9,10,100,100\n",
            grouped_row(&layout, "N1,Good", "15-16-17-17", 25),
            grouped_row(&layout, "N2,Bad", "15-x-17-17", 25),
        );
        let file = write_csv(&content);

        let persons = read_ftdna_csv(file.path(), &layout, 1).unwrap();
        let ids: Vec<&str> = persons.iter().map(|p| p.id.as_str()).collect();
        // N3 starts at the "9" column; it parses as a shifted row
        assert_eq!(ids, vec!["N1", "N3"]);
    }

    #[test]
    fn test_missing_label_column() {
        let layout = MarkerLayout::ftdna();
        let file = write_csv(&format!("{}\n", grouped_row(&layout, "N1,Good", "15-16", 20)));
        let persons = read_ftdna_csv(file.path(), &layout, 99).unwrap();
        assert!(persons.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let layout = MarkerLayout::ftdna();
        assert!(read_ftdna_csv("/nonexistent/persons.csv", &layout, 0).is_err());
    }
}
