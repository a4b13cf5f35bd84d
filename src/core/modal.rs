// modal.rs - Modal haplotype of a population

use crate::data::{MarkerLayout, MarkerVector, Person};

pub const MODAL_ID: &str = "modal";
pub const MODAL_LABEL: &str = "_____modal";

/// Most frequent positive value among `values`; ties go to the lowest
/// value, and 0 is returned when nothing was measured.
pub fn modal_value(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut measured: Vec<f64> = values.into_iter().filter(|&v| v > 0.0).collect();
    measured.sort_by(f64::total_cmp);

    let mut best = 0.0;
    let mut best_count = 0;
    let mut i = 0;
    while i < measured.len() {
        let value = measured[i];
        let run = measured[i..].iter().take_while(|&&v| v == value).count();
        // Ascending order: a later run must be strictly more frequent to win
        if run > best_count {
            best = value;
            best_count = run;
        }
        i += run;
    }
    best
}

/// Synthetic person holding the modal value of every marker slot.
pub fn modal_haplotype(layout: &MarkerLayout, persons: &[Person]) -> Person {
    let mut markers = MarkerVector::new(layout);
    for position in 0..layout.len() {
        markers[position] = modal_value(
            persons
                .iter()
                .filter(|p| p.markers.len() == layout.len())
                .map(|p| p.markers[position]),
        );
    }

    let mut modal = Person::new(MODAL_ID, MODAL_LABEL, markers);
    modal.name = MODAL_ID.to_string();
    modal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_breaks_to_lowest_value() {
        assert_eq!(modal_value([12.0, 10.0, 12.0, 10.0]), 10.0);
        assert_eq!(modal_value([12.0, 12.0, 10.0, 10.0]), 10.0);
    }

    #[test]
    fn test_highest_count_wins() {
        assert_eq!(modal_value([14.0, 13.0, 14.0, 15.0]), 14.0);
        assert_eq!(modal_value([15.0, 16.0, 16.0, 13.0, 13.0, 16.0]), 16.0);
    }

    #[test]
    fn test_missing_values_are_not_tallied() {
        assert_eq!(modal_value([0.0, 0.0, 0.0, 13.0]), 13.0);
        assert_eq!(modal_value([0.0, -1.0, -1.0, 13.0]), 13.0);
        assert_eq!(modal_value([0.0, 0.0]), 0.0);
        assert_eq!(modal_value(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_modal_haplotype() {
        let layout = MarkerLayout::ftdna();
        let make = |label: &str, dys393: f64, dys390: f64| {
            let markers = MarkerVector::from_named(&layout, [("DYS393", dys393), ("DYS390", dys390)]).unwrap();
            Person::new(label, label, markers)
        };
        let persons = vec![make("a", 12.0, 24.0), make("b", 10.0, 0.0), make("c", 12.0, 23.0), make("d", 10.0, 0.0)];

        let modal = modal_haplotype(&layout, &persons);
        assert_eq!(modal.id, "modal");
        assert_eq!(modal.label, "_____modal");
        assert_eq!(modal.markers.len(), layout.len());
        assert_eq!(modal.markers[0], 10.0);
        assert_eq!(modal.markers[1], 23.0);
        assert_eq!(modal.markers[2], 0.0);
        // Inputs are untouched
        assert_eq!(persons[1].markers[1], 0.0);
    }
}
