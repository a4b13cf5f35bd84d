// reduce.rs - Population reduction and anonymization

use crate::data::{MarkerLayout, MarkerRole, Person};
use crate::error::{Error, Result};
use crate::output::label::LABEL_WIDTH;
use regex::Regex;

/// Keep persons whose label matches `include` (if given) and does not
/// match `exclude` (if given).
pub fn filter_by_label(persons: Vec<Person>, include: Option<&Regex>, exclude: Option<&Regex>) -> Vec<Person> {
    let before = persons.len();
    let kept: Vec<Person> = persons
        .into_iter()
        .filter(|p| include.map(|re| re.is_match(&p.label)).unwrap_or(true))
        .filter(|p| !exclude.map(|re| re.is_match(&p.label)).unwrap_or(false))
        .collect();
    if kept.len() != before {
        log::info!("Label filter kept {} of {} persons", kept.len(), before);
    }
    kept
}

/// Restrict every person to the first `n_markers` canonical markers and
/// keep only those tested for all of them.
///
/// Overflow slots follow the canonical position of their region, and a
/// palindromic region that `n_markers` cuts through is dropped as a whole.
/// The multi-copy region is exempt from the completeness check.
pub fn reduce_to_marker_set(layout: &MarkerLayout, persons: &[Person], n_markers: usize) -> Result<Vec<Person>> {
    if n_markers == 0 || n_markers > layout.canonical_len() {
        return Err(Error::InvalidParameter(format!(
            "marker set size must be between 1 and {}, got {}",
            layout.canonical_len(),
            n_markers
        )));
    }

    let dropped: Vec<bool> = (0..layout.len())
        .map(|position| match layout.role(position) {
            MarkerRole::Palindromic { region } => layout.region(region).canonical.end > n_markers,
            _ => layout.anchor(position) >= n_markers,
        })
        .collect();

    let mut result = Vec::with_capacity(persons.len());
    for person in persons {
        if person.markers.len() != layout.len() {
            log::warn!("Skipping '{}': marker vector does not match the layout", person.label);
            continue;
        }
        let mut markers = person.markers.clone();
        for position in (0..layout.len()).filter(|&p| dropped[p]) {
            markers[position] = 0.0;
        }
        let complete = (0..n_markers)
            .all(|position| dropped[position] || markers.is_measured(position) || layout.is_multi_copy(position));
        if complete {
            result.push(person.with_markers(markers));
        }
    }

    log::info!(
        "{} of {} persons tested for the first {} markers",
        result.len(),
        persons.len(),
        n_markers
    );
    if result.len() < 2 {
        return Err(Error::insufficient(
            format!("not enough persons tested for {} markers", n_markers),
            result.len(),
        ));
    }
    Ok(result)
}

/// Keep every `factor`-th person, starting with the first.
pub fn reduce_count(persons: &[Person], factor: usize) -> Result<Vec<Person>> {
    if factor == 0 {
        return Err(Error::InvalidParameter("reduction factor must be at least 1".to_string()));
    }
    let result: Vec<Person> = persons
        .iter()
        .step_by(factor)
        .take(persons.len() / factor)
        .cloned()
        .collect();
    if result.len() < 2 {
        return Err(Error::insufficient(
            format!("reduction by {} is too large", factor),
            result.len(),
        ));
    }
    log::info!("Reduced {} persons to {} (every {}th)", persons.len(), result.len(), factor);
    Ok(result)
}

/// Drop identifying fields and label persons by sequence number.
pub fn anonymize(persons: &[Person]) -> Vec<Person> {
    persons
        .iter()
        .enumerate()
        .map(|(i, person)| person.anonymized(format!("{:0width$}", i + 1, width = LABEL_WIDTH)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MarkerVector;

    fn complete_person(layout: &MarkerLayout, label: &str, n: usize) -> Person {
        let mut markers = MarkerVector::new(layout);
        for position in 0..n {
            markers[position] = 12.0;
        }
        Person::new(label, label, markers)
    }

    #[test]
    fn test_reduce_to_marker_set_zeroes_and_filters() {
        let layout = MarkerLayout::ftdna();
        let mut partial = complete_person(&layout, "partial", 12);
        partial.markers[5] = 0.0;
        let persons = vec![
            complete_person(&layout, "a", 111),
            complete_person(&layout, "b", 37),
            complete_person(&layout, "c", 12),
            partial,
        ];

        let reduced = reduce_to_marker_set(&layout, &persons, 37).unwrap();
        assert_eq!(reduced.len(), 2);
        assert_eq!(reduced[0].label, "a");
        assert_eq!(reduced[0].markers[36], 12.0);
        assert_eq!(reduced[0].markers[37], 0.0);
        assert_eq!(reduced[0].markers.measured_count(), 37);
        // Input persons are not modified
        assert_eq!(persons[0].markers[100], 12.0);

        let twelve = reduce_to_marker_set(&layout, &persons, 12).unwrap();
        assert_eq!(twelve.len(), 3);
    }

    #[test]
    fn test_multi_copy_region_is_exempt() {
        let layout = MarkerLayout::ftdna();
        let mut persons = vec![complete_person(&layout, "a", 37), complete_person(&layout, "b", 37)];
        for position in 21..25 {
            persons[1].markers[position] = 0.0;
        }
        persons[0].markers[111] = 18.0;

        let reduced = reduce_to_marker_set(&layout, &persons, 37).unwrap();
        assert_eq!(reduced.len(), 2);
        // DYS464 overflow belongs to a marker inside the set
        assert_eq!(reduced[0].markers[111], 18.0);

        let short = reduce_to_marker_set(&layout, &persons, 12).unwrap();
        assert_eq!(short[0].markers[111], 0.0);
    }

    #[test]
    fn test_region_cut_by_marker_set_is_dropped() {
        let layout = MarkerLayout::ftdna();
        let mut persons = vec![complete_person(&layout, "a", 111), complete_person(&layout, "b", 111)];
        for position in 111..115 {
            persons[0].markers[position] = 18.0;
        }

        // n = 23 keeps DYS464a-b but cuts DYS464c-d: the whole region goes
        let reduced = reduce_to_marker_set(&layout, &persons, 23).unwrap();
        assert_eq!(reduced.len(), 2);
        for position in (21..25).chain(111..115) {
            assert_eq!(reduced[0].markers[position], 0.0);
        }
        assert_eq!(reduced[0].markers[20], 12.0);

        // n = 34 cuts CDY after CDYa; persons stay complete
        let reduced = reduce_to_marker_set(&layout, &persons, 34).unwrap();
        assert_eq!(reduced.len(), 2);
        assert_eq!(reduced[0].markers[33], 0.0);
        assert_eq!(reduced[0].markers[32], 12.0);
        assert_eq!(reduced[0].markers[21], 12.0);
        assert_eq!(reduced[0].markers[114], 18.0);
    }

    #[test]
    fn test_reduce_single_person_fails() {
        let layout = MarkerLayout::ftdna();
        let persons = vec![complete_person(&layout, "a", 111)];
        for n in [12, 37, 67, 111] {
            let err = reduce_to_marker_set(&layout, &persons, n).unwrap_err();
            assert!(err.is_insufficient_data());
        }
        assert!(matches!(
            reduce_to_marker_set(&layout, &persons, 0),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_reduce_count_stride() {
        let layout = MarkerLayout::ftdna();
        let persons: Vec<Person> = (0..7).map(|i| complete_person(&layout, &i.to_string(), 12)).collect();

        let reduced = reduce_count(&persons, 3).unwrap();
        let labels: Vec<&str> = reduced.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "3"]);

        assert_eq!(reduce_count(&persons, 1).unwrap().len(), 7);
        assert!(reduce_count(&persons, 4).unwrap_err().is_insufficient_data());
        assert!(matches!(reduce_count(&persons, 0), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_filter_by_label() {
        let layout = MarkerLayout::ftdna();
        let persons: Vec<Person> = ["N100", "N200", "test1", "M300"]
            .iter()
            .map(|label| complete_person(&layout, label, 12))
            .collect();
        let include = Regex::new("^N").unwrap();
        let exclude = Regex::new("200").unwrap();

        let labels = |persons: Vec<Person>| persons.into_iter().map(|p| p.label).collect::<Vec<_>>();
        assert_eq!(labels(filter_by_label(persons.clone(), Some(&include), None)), vec!["N100", "N200"]);
        assert_eq!(labels(filter_by_label(persons.clone(), Some(&include), Some(&exclude))), vec!["N100"]);
        assert_eq!(labels(filter_by_label(persons.clone(), None, Some(&exclude))).len(), 3);
        assert_eq!(filter_by_label(persons, None, None).len(), 4);
    }

    #[test]
    fn test_anonymize() {
        let layout = MarkerLayout::ftdna();
        let mut person = complete_person(&layout, "Müller", 12);
        person.name = "Hans Müller".to_string();
        let persons = vec![person.clone(), person];

        let anonymous = anonymize(&persons);
        assert_eq!(anonymous[0].label, "0000000001");
        assert_eq!(anonymous[1].label, "0000000002");
        assert!(anonymous[0].id.is_empty());
        assert!(anonymous[0].name.is_empty());
        assert_eq!(anonymous[0].markers, persons[0].markers);
        assert_eq!(persons[0].label, "Müller");
    }
}
