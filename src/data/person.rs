// person.rs - Tested individuals

use crate::data::markers::MarkerVector;

/// A tested individual. Derivations (reduction, anonymization, modal
/// synthesis) return new persons and never touch the input vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// Kit number or other identifier
    pub id: String,
    pub name: String,
    /// Display label written to distance matrices
    pub label: String,
    pub markers: MarkerVector,
}

impl Person {
    pub fn new(id: impl Into<String>, label: impl Into<String>, markers: MarkerVector) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            label: label.into(),
            markers,
        }
    }

    /// Copy of this person with every identifying field cleared.
    pub fn anonymized(&self, label: String) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            label,
            markers: self.markers.clone(),
        }
    }

    /// Copy of this person with a different marker vector.
    pub fn with_markers(&self, markers: MarkerVector) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            label: self.label.clone(),
            markers,
        }
    }
}
