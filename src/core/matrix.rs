// matrix.rs - Pairwise distance matrix construction and calibration

use crate::core::distance::DistanceMetric;
use crate::data::{MutationRates, Person};
use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Square, symmetric matrix of pairwise distances.
///
/// A cell is `None` when the two persons share no comparable marker.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    values: Vec<Vec<Option<f64>>>,
}

impl DistanceMatrix {
    /// Build the full matrix for `persons`.
    pub fn build(persons: &[Person], rates: &MutationRates, metric: &dyn DistanceMetric) -> Result<Self> {
        Self::build_with_progress(persons, rates, metric, false)
    }

    /// Build the full matrix, optionally drawing a progress bar.
    ///
    /// The metric runs once per unordered pair of distinct persons in
    /// parallel; the lower triangle is a mirror of the upper one and the
    /// diagonal is always 0. A pair without comparable markers gives an
    /// undefined cell, any other metric error aborts the build.
    pub fn build_with_progress(
        persons: &[Person],
        rates: &MutationRates,
        metric: &dyn DistanceMetric,
        show_progress: bool,
    ) -> Result<Self> {
        let layout = metric.layout();
        rates.as_vector().check_layout(layout)?;
        for person in persons {
            person.markers.check_layout(layout)?;
        }

        let n = persons.len();
        let mut values = vec![vec![None; n]; n];
        for (i, row) in values.iter_mut().enumerate() {
            row[i] = Some(0.0);
        }
        if n < 2 {
            return Ok(Self { values });
        }

        let start = Instant::now();
        let total_comparisons = n * (n - 1) / 2;
        log::info!(
            "Computing {} distance matrix ({} persons, {} comparisons)",
            metric.name(),
            n,
            total_comparisons
        );

        let pb = if show_progress {
            let pb = ProgressBar::new(total_comparisons as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        // Update every 1%
        let update_interval = std::cmp::max(1, total_comparisons / 100);
        let progress_counter = Arc::new(AtomicUsize::new(0));

        let upper_triangle: Result<Vec<(usize, usize, Option<f64>)>> = (0..n)
            .into_par_iter()
            .flat_map(|i| {
                let progress = progress_counter.clone();
                let pb = pb.clone();
                (i + 1..n).into_par_iter().map(move |j| {
                    let distance = match metric.distance(&persons[i].markers, &persons[j].markers, rates) {
                        Ok(d) => Some(d),
                        Err(Error::NoComparableMarkers) => None,
                        Err(e) => return Err(e),
                    };

                    let count = progress.fetch_add(1, Ordering::Relaxed) + 1;
                    if count % update_interval == 0 {
                        pb.set_position(count as u64);
                    }

                    Ok((i, j, distance))
                })
            })
            .collect();

        pb.finish_and_clear();
        let upper_triangle = upper_triangle?;

        let mut undefined = 0;
        for (i, j, distance) in upper_triangle {
            if distance.is_none() {
                undefined += 1;
            }
            values[i][j] = distance;
            values[j][i] = distance;
        }

        if undefined > 0 {
            log::warn!(
                "{} pairs share no comparable marker; their distance is undefined",
                undefined
            );
        }
        log::info!("Distance matrix computed in {:.2}s", start.elapsed().as_secs_f64());

        Ok(Self { values })
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values[row][col]
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    /// Cells whose distance is undefined, counted once per unordered pair.
    pub fn undefined_count(&self) -> usize {
        (0..self.size())
            .map(|i| (i..self.size()).filter(|&j| self.values[i][j].is_none()).count())
            .sum()
    }

    /// Defined distances from `col` to every other person.
    pub fn distances_to(&self, col: usize) -> Vec<f64> {
        (0..self.size())
            .filter(|&row| row != col)
            .filter_map(|row| self.values[row][col])
            .collect()
    }

    /// New matrix in calendar-time units: each cell multiplied by
    /// `generation_length * calibration` and truncated toward zero.
    pub fn rescale(&self, generation_length: f64, calibration: f64) -> Self {
        let factor = generation_length * calibration;
        let values = self
            .values
            .iter()
            .map(|row| row.iter().map(|cell| cell.map(|d| (factor * d).trunc())).collect())
            .collect();
        Self { values }
    }
}
