// mod.rs - Data structures module

pub mod layout;
pub mod loaders;
pub mod markers;
pub mod person;

// Re-export main types for convenience
pub use layout::{LayoutDescription, MarkerGroup, MarkerInfo, MarkerLayout, MarkerRole, PalindromicRegion};
pub use markers::{MarkerVector, MutationRates};
pub use person::Person;
