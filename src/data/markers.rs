// markers.rs - Marker vectors and mutation rate tables

use crate::data::layout::MarkerLayout;
use crate::error::{Error, Result};
use std::fmt::Write as _;
use std::ops::{Index, IndexMut};

/// One person's values for every slot of a [`MarkerLayout`].
///
/// `0` means "not measured"; negative values are invalid readings and are
/// never used for comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerVector {
    values: Vec<f64>,
}

impl MarkerVector {
    /// All slots of the layout, set to 0.
    pub fn new(layout: &MarkerLayout) -> Self {
        Self::zeros(layout.len())
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    pub fn from_values(layout: &MarkerLayout, values: Vec<f64>) -> Result<Self> {
        let vector = Self { values };
        vector.check_layout(layout)?;
        Ok(vector)
    }

    /// Build from `(marker name, value)` pairs; unnamed markers stay 0.
    pub fn from_named<'a, I>(layout: &MarkerLayout, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut vector = Self::new(layout);
        for (name, value) in pairs {
            vector.values[layout.position(name)?] = value;
        }
        Ok(vector)
    }

    pub fn check_layout(&self, layout: &MarkerLayout) -> Result<()> {
        if self.values.len() != layout.len() {
            return Err(Error::LayoutMismatch {
                expected: layout.len(),
                found: self.values.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Strictly positive, i.e. a usable reading.
    pub fn is_measured(&self, position: usize) -> bool {
        self.values[position] > 0.0
    }

    pub fn measured_count(&self) -> usize {
        self.values.iter().filter(|&&v| v > 0.0).count()
    }

    /// `name: value, ` listing of every slot
    pub fn describe(&self, layout: &MarkerLayout) -> String {
        let mut text = String::new();
        for (marker, value) in layout.markers().iter().zip(&self.values) {
            let _ = write!(text, "{}: {}, ", marker.name, value);
        }
        text
    }
}

impl Index<usize> for MarkerVector {
    type Output = f64;

    fn index(&self, position: usize) -> &f64 {
        &self.values[position]
    }
}

impl IndexMut<usize> for MarkerVector {
    fn index_mut(&mut self, position: usize) -> &mut f64 {
        &mut self.values[position]
    }
}

/// Per-marker weights for the distance metric; 0 excludes a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRates(MarkerVector);

impl MutationRates {
    /// Every marker weighted 1: the metric becomes a mutation count average.
    pub fn ones(layout: &MarkerLayout) -> Self {
        Self(MarkerVector {
            values: vec![1.0; layout.len()],
        })
    }

    /// Every marker disabled.
    pub fn zeros(layout: &MarkerLayout) -> Self {
        Self(MarkerVector::new(layout))
    }

    pub fn from_vector(layout: &MarkerLayout, vector: MarkerVector) -> Result<Self> {
        vector.check_layout(layout)?;
        if let Some((position, value)) = vector
            .values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(Error::InvalidParameter(format!(
                "mutation rate for '{}' must be a non-negative number, got {}",
                layout.name(position),
                value
            )));
        }
        Ok(Self(vector))
    }

    /// Rates keyed by marker name; markers not named get rate 0.
    pub fn from_named<'a, I>(layout: &MarkerLayout, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        Self::from_vector(layout, MarkerVector::from_named(layout, pairs)?)
    }

    pub fn rate(&self, position: usize) -> f64 {
        self.0[position]
    }

    pub fn set(&mut self, position: usize, rate: f64) {
        self.0[position] = rate;
    }

    pub fn as_vector(&self) -> &MarkerVector {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of markers with a positive rate.
    pub fn enabled_count(&self) -> usize {
        self.0.measured_count()
    }

    /// `(marker name, rate)` pairs in layout order.
    pub fn named<'a>(&'a self, layout: &'a MarkerLayout) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        layout
            .markers()
            .iter()
            .zip(self.0.values.iter())
            .map(|(marker, &rate)| (marker.name.as_str(), rate))
    }
}
