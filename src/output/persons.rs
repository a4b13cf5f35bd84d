// persons.rs - Person tables as tab separated text and HTML

use super::write_file;
use crate::data::{MarkerLayout, Person};
use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Cell colours from 5 or more repeats below the reference (index 0)
/// to 5 or more above (index 10).
const DEVIATION_COLORS: [&str; 11] = [
    "rgb(0,0,200)",
    "rgb(50,255,255)",
    "rgb(50,255,200)",
    "rgb(50,255,50)",
    "rgb(180,255,180)",
    "rgb(255,255,255)",
    "rgb(255,255,200)",
    "rgb(255,255,100)",
    "rgb(255,200,0)",
    "rgb(255,100,0)",
    "rgb(255,0,0)",
];
const MISSING_COLOR: &str = "rgb(242,242,242)";

/// CSS colour for `value` given the reference value in the same column.
pub fn color_code(value: f64, reference: f64) -> &'static str {
    if value == 0.0 {
        return MISSING_COLOR;
    }
    let index = (value - reference).trunc() as i64 + 5;
    DEVIATION_COLORS[index.clamp(0, DEVIATION_COLORS.len() as i64 - 1) as usize]
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Write label and the first `n_values` marker values of every person,
/// tab separated.
pub fn write_persons_txt<P: AsRef<Path>>(path: P, persons: &[Person], n_values: usize) -> Result<()> {
    let path = path.as_ref();
    write_file(path, |writer| {
        for person in persons {
            write!(writer, "{}", person.label)?;
            for value in person.markers.iter().take(n_values) {
                write!(writer, "\t{}", value)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    })?;
    log::info!("Persons written to {}", path.display());
    Ok(())
}

/// Write an HTML table of the first `n_values` markers. Cells are coloured
/// by their deviation from the first person, usually the modal haplotype.
pub fn write_persons_html<P: AsRef<Path>>(
    path: P,
    layout: &MarkerLayout,
    persons: &[Person],
    n_values: usize,
) -> Result<()> {
    let path = path.as_ref();
    let n_values = n_values.min(layout.len());
    write_file(path, |writer| {
        writeln!(writer, "<!DOCTYPE html>")?;
        writeln!(writer, "<html lang=\"en\">")?;
        writeln!(writer, "<head><title>Y-STR Values</title></head>")?;
        writeln!(writer, "<body>")?;
        writeln!(writer, "<table>")?;

        write!(writer, "<tr><td></td>")?;
        for position in 0..n_values {
            write!(writer, "<td>{}</td>", html_escape(layout.name(position)))?;
        }
        writeln!(writer, "</tr>")?;

        if let Some(reference) = persons.first() {
            for person in persons {
                write!(writer, "<tr><td>{}</td>", html_escape(&person.label))?;
                for position in 0..n_values.min(person.markers.len()) {
                    let value = person.markers[position];
                    let reference = reference.markers.values().get(position).copied().unwrap_or(0.0);
                    write!(
                        writer,
                        "<td style=\"background-color:{};\">{}</td>",
                        color_code(value, reference),
                        value
                    )?;
                }
                writeln!(writer, "</tr>")?;
            }
        }

        writeln!(writer, "</table>")?;
        writeln!(writer, "</body>")?;
        write!(writer, "</html>")?;
        Ok(())
    })?;
    log::info!("HTML table written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MarkerVector;
    use tempfile::TempDir;

    fn persons(layout: &MarkerLayout) -> Vec<Person> {
        let make = |label: &str, values: &[(&str, f64)]| {
            Person::new(label, label, MarkerVector::from_named(layout, values.iter().copied()).unwrap())
        };
        vec![
            make("_____modal", &[("DYS393", 13.0), ("DYS390", 24.0), ("DYS19", 14.0)]),
            make("_____Smith", &[("DYS393", 13.0), ("DYS390", 25.0), ("DYS19", 7.0)]),
            make("_____Jones", &[("DYS393", 13.0), ("DYS390", 22.5)]),
        ]
    }

    #[test]
    fn test_color_code() {
        assert_eq!(color_code(0.0, 13.0), MISSING_COLOR);
        assert_eq!(color_code(13.0, 13.0), "rgb(255,255,255)");
        assert_eq!(color_code(14.0, 13.0), "rgb(255,255,200)");
        assert_eq!(color_code(12.0, 13.0), "rgb(180,255,180)");
        assert_eq!(color_code(30.0, 13.0), "rgb(255,0,0)");
        assert_eq!(color_code(1.0, 13.0), "rgb(0,0,200)");
        // Fractional differences are truncated toward zero
        assert_eq!(color_code(12.5, 13.0), "rgb(255,255,255)");
    }

    #[test]
    fn test_write_persons_txt() {
        let layout = MarkerLayout::ftdna();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("persons.txt");

        write_persons_txt(&path, &persons(&layout), 4).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "_____modal\t13\t24\t14\t0\n\
             _____Smith\t13\t25\t7\t0\n\
             _____Jones\t13\t22.5\t0\t0\n"
        );
    }

    #[test]
    fn test_write_persons_html() {
        let layout = MarkerLayout::ftdna();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("persons.html");

        write_persons_html(&path, &layout, &persons(&layout), 3).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.contains("<tr><td></td><td>DYS393</td><td>DYS390</td><td>DYS19</td></tr>"));
        assert!(content.contains(
            "<tr><td>_____Smith</td>\
             <td style=\"background-color:rgb(255,255,255);\">13</td>\
             <td style=\"background-color:rgb(255,255,200);\">25</td>\
             <td style=\"background-color:rgb(0,0,200);\">7</td></tr>"
        ));
        assert!(content.contains("<td style=\"background-color:rgb(242,242,242);\">0</td>"));
        assert!(content.ends_with("</html>"));
    }
}
