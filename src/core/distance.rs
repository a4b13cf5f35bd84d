// distance.rs - Hybrid mutation-model distance between two marker vectors

use crate::data::{MarkerLayout, MarkerRole, MarkerVector, MutationRates, PalindromicRegion};
use crate::error::{Error, Result};
use std::str::FromStr;

/// Distance between two marker vectors under a rate table.
///
/// Implementations must be pure: the matrix builder calls them from many
/// threads at once and relies on identical inputs giving identical output.
pub trait DistanceMetric: Send + Sync {
    fn distance(&self, a: &MarkerVector, b: &MarkerVector, rates: &MutationRates) -> Result<f64>;

    /// Layout the compared vectors must follow.
    fn layout(&self) -> &MarkerLayout;

    /// Get a human-readable name for this metric
    fn name(&self) -> &'static str;
}

/// Mutation model applied to the non-palindromic markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceModel {
    /// Stepwise for ordinary markers, multiset comparison for palindromic regions.
    Hybrid,
    /// Infinite-alleles for every non-palindromic marker.
    InfiniteAlleles,
    /// Plain average of absolute differences, no rates and no special markers.
    MarkerCount,
}

impl FromStr for DistanceModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hybrid" | "stepwise" => Ok(DistanceModel::Hybrid),
            "infinite" | "infinite-alleles" => Ok(DistanceModel::InfiniteAlleles),
            "count" | "marker-count" => Ok(DistanceModel::MarkerCount),
            _ => Err(format!("Invalid distance model: {}. Use: hybrid, infinite, count", s)),
        }
    }
}

impl DistanceModel {
    pub fn description(&self) -> &str {
        match self {
            DistanceModel::Hybrid => "Hybrid (stepwise + palindromic multisets)",
            DistanceModel::InfiniteAlleles => "Infinite alleles (+ palindromic multisets)",
            DistanceModel::MarkerCount => "Marker count average (debugging only)",
        }
    }

    /// Metric implementing this model over `layout`.
    pub fn metric<'a>(&self, layout: &'a MarkerLayout) -> Box<dyn DistanceMetric + 'a> {
        match self {
            DistanceModel::Hybrid => Box::new(HybridDistance::new(layout)),
            DistanceModel::InfiniteAlleles => Box::new(HybridDistance::infinite_alleles(layout)),
            DistanceModel::MarkerCount => Box::new(MarkerCountDistance::new(layout)),
        }
    }
}

/// Running sum of marker contributions and the number of markers compared
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    sum: f64,
    compared: usize,
}

impl Tally {
    fn add(&mut self, contribution: Option<(f64, usize)>) {
        if let Some((distance, markers)) = contribution {
            self.sum += distance;
            self.compared += markers;
        }
    }

    fn average(self) -> Result<f64> {
        if self.compared == 0 {
            return Err(Error::NoComparableMarkers);
        }
        Ok(self.sum / self.compared as f64)
    }
}

/// The hybrid metric. Ordinary markers use the stepwise model (or the
/// infinite-alleles model when selected), compound markers compare their
/// own repeats net of the base marker, and palindromic regions compare
/// unordered multisets of repeat values.
#[derive(Debug, Clone, Copy)]
pub struct HybridDistance<'a> {
    layout: &'a MarkerLayout,
    infinite_alleles: bool,
}

impl<'a> HybridDistance<'a> {
    pub fn new(layout: &'a MarkerLayout) -> Self {
        Self {
            layout,
            infinite_alleles: false,
        }
    }

    pub fn infinite_alleles(layout: &'a MarkerLayout) -> Self {
        Self {
            layout,
            infinite_alleles: true,
        }
    }

    fn ordinary(&self, x: f64, y: f64, rate: f64) -> Option<(f64, usize)> {
        if self.infinite_alleles {
            infinite(x, y, rate)
        } else {
            stepwise(x, y, rate)
        }
    }

    fn compound(&self, a: &MarkerVector, b: &MarkerVector, position: usize, base: usize, rate: f64) -> Option<(f64, usize)> {
        let present = [a[base], a[position], b[base], b[position]].iter().all(|&v| v > 0.0);
        if !present || rate <= 0.0 {
            return None;
        }
        let own_a = a[position] - a[base];
        let own_b = b[position] - b[base];
        let distance = if self.infinite_alleles {
            if own_a != own_b {
                1.0 / rate
            } else {
                0.0
            }
        } else {
            (own_a - own_b).abs() / rate
        };
        Some((distance, 1))
    }
}

impl DistanceMetric for HybridDistance<'_> {
    fn distance(&self, a: &MarkerVector, b: &MarkerVector, rates: &MutationRates) -> Result<f64> {
        a.check_layout(self.layout)?;
        b.check_layout(self.layout)?;
        rates.as_vector().check_layout(self.layout)?;

        let mut tally = Tally::default();
        for position in 0..self.layout.len() {
            let rate = rates.rate(position);
            let contribution = match self.layout.role(position) {
                MarkerRole::Stepwise => self.ordinary(a[position], b[position], rate),
                MarkerRole::InfiniteAlleles => infinite(a[position], b[position], rate),
                MarkerRole::Compound { base } => self.compound(a, b, position, base, rate),
                MarkerRole::Palindromic { region } => {
                    let region = self.layout.region(region);
                    // Each region is evaluated once, at its first canonical slot
                    if position == region.canonical.start {
                        palindromic(region, a, b, rates)
                    } else {
                        None
                    }
                }
            };
            tally.add(contribution);
        }
        tally.average()
    }

    fn layout(&self) -> &MarkerLayout {
        self.layout
    }

    fn name(&self) -> &'static str {
        if self.infinite_alleles {
            "infinite"
        } else {
            "hybrid"
        }
    }
}

/// Average absolute difference over every canonical marker measured in
/// both vectors. Ignores rates and marker roles.
#[derive(Debug, Clone, Copy)]
pub struct MarkerCountDistance<'a> {
    layout: &'a MarkerLayout,
}

impl<'a> MarkerCountDistance<'a> {
    pub fn new(layout: &'a MarkerLayout) -> Self {
        Self { layout }
    }
}

impl DistanceMetric for MarkerCountDistance<'_> {
    fn distance(&self, a: &MarkerVector, b: &MarkerVector, _rates: &MutationRates) -> Result<f64> {
        a.check_layout(self.layout)?;
        b.check_layout(self.layout)?;

        let mut tally = Tally::default();
        for position in 0..self.layout.canonical_len() {
            tally.add(stepwise(a[position], b[position], 1.0));
        }
        tally.average()
    }

    fn layout(&self) -> &MarkerLayout {
        self.layout
    }

    fn name(&self) -> &'static str {
        "count"
    }
}

/// Hybrid distance with the stepwise model.
pub fn distance(layout: &MarkerLayout, a: &MarkerVector, b: &MarkerVector, rates: &MutationRates) -> Result<f64> {
    HybridDistance::new(layout).distance(a, b, rates)
}

fn stepwise(x: f64, y: f64, rate: f64) -> Option<(f64, usize)> {
    if x > 0.0 && y > 0.0 && rate > 0.0 {
        Some(((x - y).abs() / rate, 1))
    } else {
        None
    }
}

fn infinite(x: f64, y: f64, rate: f64) -> Option<(f64, usize)> {
    if x > 0.0 && y > 0.0 && rate > 0.0 {
        Some((if x != y { 1.0 / rate } else { 0.0 }, 1))
    } else {
        None
    }
}

/// Multiset comparison of a palindromic region, canonical and overflow
/// slots together. Counts as the canonical number of markers.
fn palindromic(
    region: &PalindromicRegion,
    a: &MarkerVector,
    b: &MarkerVector,
    rates: &MutationRates,
) -> Option<(f64, usize)> {
    let rate = rates.rate(region.rate_index());
    if rate <= 0.0 {
        return None;
    }
    if region.positions().any(|p| a[p] < 0.0 || b[p] < 0.0) {
        return None;
    }

    let values_a: Vec<f64> = region.positions().map(|p| a[p]).filter(|&v| v > 0.0).collect();
    let values_b: Vec<f64> = region.positions().map(|p| b[p]).filter(|&v| v > 0.0).collect();
    if values_a.is_empty() || values_b.is_empty() {
        return None;
    }

    Some((unmatched_values(values_a, values_b) / rate, region.canonical_len()))
}

/// A size mismatch counts 1, then every value of the smaller multiset
/// without an equal partner in the larger one counts 1.
fn unmatched_values(mut first: Vec<f64>, mut second: Vec<f64>) -> f64 {
    let mut count = 0.0;
    if first.len() != second.len() {
        count = 1.0;
        if first.len() > second.len() {
            std::mem::swap(&mut first, &mut second);
        }
    }
    for value in &first {
        match second.iter().position(|v| v == value) {
            Some(j) => {
                second.swap_remove(j);
            }
            None => count += 1.0,
        }
    }
    count
}
