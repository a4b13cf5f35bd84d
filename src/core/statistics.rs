// statistics.rs - Per-marker frequency and value distribution over a population

use crate::data::{MarkerLayout, MutationRates, Person};
use crate::error::{Error, Result};

/// Frequency and observed values of one marker slot.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStatistic {
    pub position: usize,
    pub name: String,
    /// Persons with a measured (positive) value.
    pub present: usize,
    /// `present / population`, 0 for an empty population.
    pub frequency: f64,
    /// Observed value and its occurrence count, ascending by value.
    pub counts: Vec<(f64, usize)>,
}

impl MarkerStatistic {
    pub fn distinct_values(&self) -> usize {
        self.counts.len()
    }

    /// Most frequent value, the lowest one on ties; 0 if never measured.
    pub fn modal_value(&self) -> f64 {
        let mut best = (0.0, 0);
        for &(value, count) in &self.counts {
            if count > best.1 {
                best = (value, count);
            }
        }
        best.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStatistics {
    pub population: usize,
    pub markers: Vec<MarkerStatistic>,
}

impl MarkerStatistics {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&MarkerStatistic> {
        self.markers.iter().find(|m| m.position == position)
    }
}

/// Compute statistics for every slot of the layout.
pub fn statistics(layout: &MarkerLayout, persons: &[Person]) -> MarkerStatistics {
    let population = persons.len();
    let markers = (0..layout.len())
        .map(|position| {
            let mut values: Vec<f64> = persons
                .iter()
                .filter(|p| p.markers.len() == layout.len())
                .map(|p| p.markers[position])
                .filter(|&v| v > 0.0)
                .collect();
            values.sort_by(f64::total_cmp);

            let mut counts: Vec<(f64, usize)> = Vec::new();
            for value in values.iter().copied() {
                match counts.last_mut() {
                    Some((last, count)) if *last == value => *count += 1,
                    _ => counts.push((value, 1)),
                }
            }

            let present = values.len();
            let frequency = if population == 0 {
                0.0
            } else {
                present as f64 / population as f64
            };
            MarkerStatistic {
                position,
                name: layout.name(position).to_string(),
                present,
                frequency,
                counts,
            }
        })
        .collect();

    MarkerStatistics { population, markers }
}

/// Keep markers with `frequency >= min_frequency` and a distinct value
/// count within `min_distinct..=max_distinct`.
pub fn select(stats: &MarkerStatistics, min_frequency: f64, min_distinct: usize, max_distinct: usize) -> MarkerStatistics {
    let markers: Vec<MarkerStatistic> = stats
        .markers
        .iter()
        .filter(|m| {
            m.frequency >= min_frequency
                && m.distinct_values() >= min_distinct
                && m.distinct_values() <= max_distinct
        })
        .cloned()
        .collect();
    log::info!(
        "Selected {} of {} markers (frequency >= {}, {}..={} distinct values)",
        markers.len(),
        stats.markers.len(),
        min_frequency,
        min_distinct,
        max_distinct
    );
    MarkerStatistics {
        population: stats.population,
        markers,
    }
}

/// Rate table weighting every retained marker with `1/n`, all others 0.
pub fn counting_rates(layout: &MarkerLayout, stats: &MarkerStatistics) -> Result<MutationRates> {
    if stats.is_empty() {
        return Err(Error::InvalidParameter(
            "no marker retained for a counting rate table".to_string(),
        ));
    }
    let weight = 1.0 / stats.len() as f64;
    let mut rates = MutationRates::zeros(layout);
    for marker in &stats.markers {
        if marker.position >= layout.len() {
            return Err(Error::LayoutMismatch {
                expected: layout.len(),
                found: marker.position + 1,
            });
        }
        rates.set(marker.position, weight);
    }
    Ok(rates)
}

/// Mean and sample standard deviation (N-1 denominator).
pub fn mean_and_std_dev(values: &[f64]) -> Result<(f64, f64)> {
    if values.len() < 2 {
        return Err(Error::insufficient("too few values for a standard deviation", values.len()));
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squares: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Ok((mean, (squares / (n - 1.0)).sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::modal::modal_value;
    use crate::data::MarkerVector;

    fn person(layout: &MarkerLayout, label: &str, values: &[(&str, f64)]) -> Person {
        let markers = MarkerVector::from_named(layout, values.iter().copied()).unwrap();
        Person::new(label, label, markers)
    }

    fn population(layout: &MarkerLayout) -> Vec<Person> {
        vec![
            person(layout, "a", &[("DYS393", 13.0), ("DYS390", 24.0), ("DYS19", 14.0)]),
            person(layout, "b", &[("DYS393", 13.0), ("DYS390", 23.0)]),
            person(layout, "c", &[("DYS393", 13.0), ("DYS390", 25.0), ("DYS19", 15.0)]),
            person(layout, "d", &[("DYS393", 13.0), ("DYS390", 23.0)]),
        ]
    }

    #[test]
    fn test_statistics_counts_and_frequency() {
        let layout = MarkerLayout::ftdna();
        let stats = statistics(&layout, &population(&layout));
        assert_eq!(stats.population, 4);
        assert_eq!(stats.len(), layout.len());

        let dys393 = stats.get(0).unwrap();
        assert_eq!(dys393.name, "DYS393");
        assert_eq!(dys393.frequency, 1.0);
        assert_eq!(dys393.counts, vec![(13.0, 4)]);

        let dys390 = stats.get(1).unwrap();
        assert_eq!(dys390.counts, vec![(23.0, 2), (24.0, 1), (25.0, 1)]);
        assert_eq!(dys390.distinct_values(), 3);
        assert_eq!(dys390.modal_value(), 23.0);

        let dys19 = stats.get(2).unwrap();
        assert_eq!(dys19.present, 2);
        assert_eq!(dys19.frequency, 0.5);

        let dys391 = stats.get(3).unwrap();
        assert_eq!(dys391.frequency, 0.0);
        assert!(dys391.counts.is_empty());
        assert_eq!(dys391.modal_value(), 0.0);
    }

    #[test]
    fn test_modal_value_matches_modal_haplotype() {
        let layout = MarkerLayout::ftdna();
        let persons = vec![
            person(&layout, "a", &[("DYS393", 14.0)]),
            person(&layout, "b", &[("DYS393", 12.0)]),
        ];
        let stats = statistics(&layout, &persons);
        assert_eq!(stats.get(0).unwrap().modal_value(), modal_value([14.0, 12.0]));
        assert_eq!(stats.get(0).unwrap().modal_value(), 12.0);
    }

    #[test]
    fn test_empty_population() {
        let layout = MarkerLayout::ftdna();
        let stats = statistics(&layout, &[]);
        assert_eq!(stats.population, 0);
        assert!(stats.markers.iter().all(|m| m.frequency == 0.0));
    }

    #[test]
    fn test_select_thresholds() {
        let layout = MarkerLayout::ftdna();
        let stats = statistics(&layout, &population(&layout));

        let frequent = select(&stats, 0.75, 1, usize::MAX);
        let names: Vec<&str> = frequent.markers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["DYS393", "DYS390"]);

        let variable = select(&stats, 0.0, 2, usize::MAX);
        let names: Vec<&str> = variable.markers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["DYS390", "DYS19"]);

        let stable = select(&stats, 0.5, 1, 1);
        let names: Vec<&str> = stable.markers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["DYS393"]);
        assert_eq!(stable.population, 4);
    }

    #[test]
    fn test_counting_rates() {
        let layout = MarkerLayout::ftdna();
        let stats = statistics(&layout, &population(&layout));
        let selected = select(&stats, 0.5, 1, usize::MAX);
        assert_eq!(selected.len(), 3);

        let rates = counting_rates(&layout, &selected).unwrap();
        assert_eq!(rates.len(), layout.len());
        assert_eq!(rates.rate(0), 1.0 / 3.0);
        assert_eq!(rates.rate(2), 1.0 / 3.0);
        assert_eq!(rates.rate(3), 0.0);
        assert_eq!(rates.enabled_count(), 3);

        let none = select(&stats, 1.1, 0, usize::MAX);
        assert!(matches!(counting_rates(&layout, &none), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_mean_and_std_dev() {
        let (mean, std_dev) = mean_and_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(mean, 5.0);
        assert!((std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);

        let (mean, std_dev) = mean_and_std_dev(&[1.0, 3.0]).unwrap();
        assert_eq!(mean, 2.0);
        assert!((std_dev - 2.0f64.sqrt()).abs() < 1e-12);

        assert!(mean_and_std_dev(&[1.0]).unwrap_err().is_insufficient_data());
        assert!(mean_and_std_dev(&[]).unwrap_err().is_insufficient_data());
    }
}
