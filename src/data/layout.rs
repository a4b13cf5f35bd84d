// layout.rs - Marker layout table: names, roles, groups and palindromic regions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::path::Path;

/// The first 111 markers in Family Tree DNA order.
const FTDNA_111: [&str; 111] = [
    "DYS393", "DYS390", "DYS19", "DYS391", "DYS385a", "DYS385b", "DYS426", "DYS388",
    "DYS439", "DYS389i", "DYS392", "DYS389ii", "DYS458", "DYS459a", "DYS459b", "DYS455",
    "DYS454", "DYS447", "DYS437", "DYS448", "DYS449", "DYS464a", "DYS464b", "DYS464c",
    "DYS464d", "DYS460", "Y-GATA-H4", "YCAIIa", "YCAIIb", "DYS456", "DYS607", "DYS576",
    "DYS570", "CDYa", "CDYb", "DYS442", "DYS438", "DYS531", "DYS578", "DYF395S1a",
    "DYF395S1b", "DYS590", "DYS537", "DYS641", "DYS472", "DYF406S1", "DYS511", "DYS425",
    "DYS413a", "DYS413b", "DYS557", "DYS594", "DYS436", "DYS490", "DYS534", "DYS450",
    "DYS444", "DYS481", "DYS520", "DYS446", "DYS617", "DYS568", "DYS487", "DYS572",
    "DYS640", "DYS492", "DYS565", "DYS710", "DYS485", "DYS632", "DYS495", "DYS540",
    "DYS714", "DYS716", "DYS717", "DYS505", "DYS556", "DYS549", "DYS589", "DYS522",
    "DYS494", "DYS533", "DYS636", "DYS575", "DYS638", "DYS462", "DYS452", "DYS445",
    "Y-GATA-A10", "DYS463", "DYS441", "Y-GGAAT-1B07", "DYS525", "DYS712", "DYS593", "DYS650",
    "DYS532", "DYS715", "DYS504", "DYS513", "DYS561", "DYS552", "DYS726", "DYS635",
    "DYS587", "DYS643", "DYS497", "DYS510", "DYS434", "DYS461", "DYS435",
];

/// Markers reported as several values in a single vendor column.
const FTDNA_GROUPS: [&str; 7] = ["DYS385", "DYS459", "DYS464", "YCAII", "CDY", "DYF395S1", "DYS413"];

const FTDNA_ALIASES: [(&str, &[&str]); 5] = [
    ("DYS389i", &["DYS389-1"]),
    ("DYS389ii", &["DYS389-2"]),
    ("Y-GATA-H4", &["YGATAH4", "GATA-H4", "GATAH4"]),
    ("Y-GATA-A10", &["YGATAA10", "GATA-A10", "GATAA10"]),
    ("Y-GGAAT-1B07", &["YGGAAT1B07", "GGAAT-1B07"]),
];

const FTDNA_REGIONS: [(&str, &[&str]); 4] = [
    ("DYS464", &["DYS464a", "DYS464b", "DYS464c", "DYS464d"]),
    ("CDY", &["CDYa", "CDYb"]),
    ("DYF395S1", &["DYF395S1a", "DYF395S1b"]),
    ("DYS413", &["DYS413a", "DYS413b"]),
];

/// Extra DYS464 copies beyond the four canonical columns.
const FTDNA_DYS464_OVERFLOW: [&str; 4] = ["DYS464e", "DYS464f", "DYS464g", "DYS464h"];

/// How a marker position takes part in distance computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRole {
    /// Stepwise mutation model: absolute repeat difference.
    Stepwise,
    /// Infinite-alleles model: same or different.
    InfiniteAlleles,
    /// Repeat count includes the count of the `base` marker.
    Compound { base: usize },
    /// Member of a palindromic region, compared as an unordered multiset.
    Palindromic { region: usize },
}

#[derive(Debug, Clone)]
pub struct MarkerInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub role: MarkerRole,
}

/// Contiguous run of positions compared as a multiset, optionally
/// extended by overflow slots appended after the canonical markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalindromicRegion {
    pub name: String,
    pub canonical: Range<usize>,
    pub overflow: Range<usize>,
}

impl PalindromicRegion {
    /// Number of compared markers this region counts for.
    pub fn canonical_len(&self) -> usize {
        self.canonical.len()
    }

    /// The region's mutation rate is read at its last canonical position.
    pub fn rate_index(&self) -> usize {
        self.canonical.end - 1
    }

    pub fn has_overflow(&self) -> bool {
        !self.overflow.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> {
        self.canonical.clone().chain(self.overflow.clone())
    }
}

/// Markers sharing one column in vendor exports (e.g. DYS385 = "11-14")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerGroup {
    pub name: String,
    pub positions: Vec<usize>,
}

// =============================================================================
// Serializable description
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleSpec {
    #[default]
    Stepwise,
    Infinite,
    Compound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub role: RoleSpec,
    /// Base marker of a compound marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSpec {
    pub name: String,
    pub markers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overflow: Vec<String>,
}

/// Layout as written in a TOML layout file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDescription {
    pub markers: Vec<MarkerSpec>,
    #[serde(default)]
    pub regions: Vec<RegionSpec>,
}

impl LayoutDescription {
    /// Family Tree DNA 111-marker order with four DYS464 overflow slots.
    pub fn ftdna() -> Self {
        let markers = FTDNA_111
            .iter()
            .map(|&name| {
                let aliases = FTDNA_ALIASES
                    .iter()
                    .find(|(marker, _)| *marker == name)
                    .map(|(_, aliases)| aliases.iter().map(|a| a.to_string()).collect())
                    .unwrap_or_default();
                let group = FTDNA_GROUPS
                    .iter()
                    .find(|group| {
                        name.strip_prefix(**group)
                            .map(|suffix| suffix.len() == 1 && suffix.chars().all(|c| c.is_ascii_lowercase()))
                            .unwrap_or(false)
                    })
                    .map(|group| group.to_string());
                let (role, base) = match name {
                    "DYS389ii" => (RoleSpec::Compound, Some("DYS389i".to_string())),
                    "YCAIIa" | "YCAIIb" => (RoleSpec::Infinite, None),
                    _ => (RoleSpec::Stepwise, None),
                };
                MarkerSpec {
                    name: name.to_string(),
                    aliases,
                    role,
                    base,
                    group,
                }
            })
            .collect();

        let regions = FTDNA_REGIONS
            .iter()
            .map(|(name, members)| RegionSpec {
                name: name.to_string(),
                markers: members.iter().map(|m| m.to_string()).collect(),
                overflow: if *name == "DYS464" {
                    FTDNA_DYS464_OVERFLOW.iter().map(|m| m.to_string()).collect()
                } else {
                    Vec::new()
                },
            })
            .collect();

        Self { markers, regions }
    }
}

// =============================================================================
// Resolved layout
// =============================================================================

/// Immutable marker table shared read-only by all components.
///
/// Positions `0..canonical_len()` hold the canonical markers in order; the
/// overflow slots of the multi-copy region follow at
/// `canonical_len()..len()`.
#[derive(Debug, Clone)]
pub struct MarkerLayout {
    markers: Vec<MarkerInfo>,
    regions: Vec<PalindromicRegion>,
    groups: Vec<MarkerGroup>,
    canonical_len: usize,
    index: HashMap<String, usize>,
    group_index: HashMap<String, usize>,
}

impl MarkerLayout {
    /// Built-in Family Tree DNA 111-marker layout.
    pub fn ftdna() -> Self {
        Self::from_description(LayoutDescription::ftdna())
            .expect("built-in FTDNA layout is valid")
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let description: LayoutDescription = toml::from_str(content)?;
        Self::from_description(description)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let layout = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded marker layout from {} ({} markers, {} overflow slots)",
            path.display(),
            layout.canonical_len(),
            layout.overflow_len()
        );
        Ok(layout)
    }

    pub fn from_description(description: LayoutDescription) -> Result<Self> {
        if description.markers.is_empty() {
            return Err(Error::InvalidLayout("layout defines no markers".to_string()));
        }

        let mut markers: Vec<MarkerInfo> = Vec::with_capacity(description.markers.len());
        let mut index = HashMap::new();

        for spec in &description.markers {
            let position = markers.len();
            register_name(&mut index, &spec.name, position)?;
            for alias in &spec.aliases {
                register_name(&mut index, alias, position)?;
            }
            markers.push(MarkerInfo {
                name: spec.name.clone(),
                aliases: spec.aliases.clone(),
                role: match spec.role {
                    RoleSpec::Stepwise => MarkerRole::Stepwise,
                    RoleSpec::Infinite => MarkerRole::InfiniteAlleles,
                    // Resolved below once every name is known
                    RoleSpec::Compound => MarkerRole::Compound { base: position },
                },
            });
        }
        let canonical_len = markers.len();

        // Compound bases
        for (position, spec) in description.markers.iter().enumerate() {
            if spec.role != RoleSpec::Compound {
                if spec.base.is_some() {
                    return Err(Error::InvalidLayout(format!(
                        "marker '{}' has a base but is not compound",
                        spec.name
                    )));
                }
                continue;
            }
            let base_name = spec.base.as_deref().ok_or_else(|| {
                Error::InvalidLayout(format!("compound marker '{}' has no base", spec.name))
            })?;
            let base = lookup(&index, base_name).ok_or_else(|| {
                Error::InvalidLayout(format!(
                    "compound marker '{}' refers to unknown base '{}'",
                    spec.name, base_name
                ))
            })?;
            if base == position || description.markers[base].role == RoleSpec::Compound {
                return Err(Error::InvalidLayout(format!(
                    "compound marker '{}' must be based on a non-compound marker",
                    spec.name
                )));
            }
            markers[position].role = MarkerRole::Compound { base };
        }

        // Palindromic regions
        if description.regions.iter().filter(|r| !r.overflow.is_empty()).count() > 1 {
            return Err(Error::InvalidLayout(
                "only one region may carry overflow slots".to_string(),
            ));
        }
        let mut regions = Vec::with_capacity(description.regions.len());
        for spec in &description.regions {
            let region_id = regions.len();
            let mut positions = Vec::with_capacity(spec.markers.len());
            for name in &spec.markers {
                let position = lookup(&index, name).filter(|&p| p < canonical_len).ok_or_else(|| {
                    Error::InvalidLayout(format!("region '{}' refers to unknown marker '{}'", spec.name, name))
                })?;
                positions.push(position);
            }
            if positions.len() < 2 {
                return Err(Error::InvalidLayout(format!(
                    "region '{}' needs at least two markers",
                    spec.name
                )));
            }
            let start = positions[0];
            if positions.iter().enumerate().any(|(offset, &p)| p != start + offset) {
                return Err(Error::InvalidLayout(format!(
                    "region '{}' must name contiguous markers in layout order",
                    spec.name
                )));
            }
            for &position in &positions {
                match markers[position].role {
                    MarkerRole::Palindromic { .. } => {
                        return Err(Error::InvalidLayout(format!(
                            "marker '{}' belongs to more than one region",
                            markers[position].name
                        )))
                    }
                    MarkerRole::Compound { .. } => {
                        return Err(Error::InvalidLayout(format!(
                            "compound marker '{}' cannot be palindromic",
                            markers[position].name
                        )))
                    }
                    _ => {}
                }
                if markers.iter().any(|m| m.role == MarkerRole::Compound { base: position }) {
                    return Err(Error::InvalidLayout(format!(
                        "palindromic marker '{}' cannot be a compound base",
                        markers[position].name
                    )));
                }
                markers[position].role = MarkerRole::Palindromic { region: region_id };
            }
            regions.push(PalindromicRegion {
                name: spec.name.clone(),
                canonical: start..start + positions.len(),
                overflow: 0..0,
            });
        }

        // Overflow slots go after every canonical marker
        for (region_id, spec) in description.regions.iter().enumerate() {
            if spec.overflow.is_empty() {
                continue;
            }
            let start = markers.len();
            for name in &spec.overflow {
                register_name(&mut index, name, markers.len())?;
                markers.push(MarkerInfo {
                    name: name.clone(),
                    aliases: Vec::new(),
                    role: MarkerRole::Palindromic { region: region_id },
                });
            }
            regions[region_id].overflow = start..markers.len();
        }

        let groups = build_groups(&description, &regions)?;
        let group_index = groups
            .iter()
            .enumerate()
            .map(|(i, group)| (group.name.to_lowercase(), i))
            .collect();

        Ok(Self {
            markers,
            regions,
            groups,
            canonical_len,
            index,
            group_index,
        })
    }

    /// Total number of slots in a marker vector (canonical + overflow).
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn canonical_len(&self) -> usize {
        self.canonical_len
    }

    pub fn overflow_len(&self) -> usize {
        self.markers.len() - self.canonical_len
    }

    pub fn markers(&self) -> &[MarkerInfo] {
        &self.markers
    }

    pub fn name(&self, position: usize) -> &str {
        &self.markers[position].name
    }

    pub fn role(&self, position: usize) -> MarkerRole {
        self.markers[position].role
    }

    pub fn regions(&self) -> &[PalindromicRegion] {
        &self.regions
    }

    pub fn region(&self, id: usize) -> &PalindromicRegion {
        &self.regions[id]
    }

    /// The region that owns the overflow slots, if any.
    pub fn multi_copy_region(&self) -> Option<&PalindromicRegion> {
        self.regions.iter().find(|region| region.has_overflow())
    }

    /// Column groups in canonical order; single markers are their own group.
    pub fn groups(&self) -> &[MarkerGroup] {
        &self.groups
    }

    /// Case-insensitive lookup over canonical names and aliases.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        lookup(&self.index, name)
    }

    pub fn position(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| Error::UnknownMarker(name.to_string()))
    }

    pub fn group(&self, name: &str) -> Option<&MarkerGroup> {
        self.group_index
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.groups[i])
    }

    /// Canonical position a slot belongs to: overflow slots map to the
    /// first position of their region.
    pub fn anchor(&self, position: usize) -> usize {
        match self.markers[position].role {
            MarkerRole::Palindromic { region } if position >= self.canonical_len => {
                self.regions[region].canonical.start
            }
            _ => position,
        }
    }

    /// Whether a position belongs to the multi-copy region.
    pub fn is_multi_copy(&self, position: usize) -> bool {
        match self.markers[position].role {
            MarkerRole::Palindromic { region } => self.regions[region].has_overflow(),
            _ => false,
        }
    }
}

impl Default for MarkerLayout {
    fn default() -> Self {
        Self::ftdna()
    }
}

fn register_name(index: &mut HashMap<String, usize>, name: &str, position: usize) -> Result<()> {
    let key = name.trim().to_lowercase();
    if key.is_empty() {
        return Err(Error::InvalidLayout("empty marker name".to_string()));
    }
    // An alias that differs from its own marker's name only in case is harmless
    match index.insert(key, position) {
        Some(previous) if previous != position => {
            Err(Error::InvalidLayout(format!("duplicate marker name '{}'", name)))
        }
        _ => Ok(()),
    }
}

fn lookup(index: &HashMap<String, usize>, name: &str) -> Option<usize> {
    index.get(&name.trim().to_lowercase()).copied()
}

fn build_groups(description: &LayoutDescription, regions: &[PalindromicRegion]) -> Result<Vec<MarkerGroup>> {
    let mut groups: Vec<MarkerGroup> = Vec::new();
    for (position, spec) in description.markers.iter().enumerate() {
        match &spec.group {
            Some(name) => {
                if let Some(last) = groups.last_mut() {
                    if last.name == *name && last.positions.last() == Some(&(position - 1)) {
                        last.positions.push(position);
                        continue;
                    }
                }
                if groups.iter().any(|g| g.name.eq_ignore_ascii_case(name)) {
                    return Err(Error::InvalidLayout(format!(
                        "group '{}' must name contiguous markers",
                        name
                    )));
                }
                groups.push(MarkerGroup {
                    name: name.clone(),
                    positions: vec![position],
                });
            }
            None => groups.push(MarkerGroup {
                name: spec.name.clone(),
                positions: vec![position],
            }),
        }
    }

    for region in regions.iter().filter(|r| r.has_overflow()) {
        let owner = groups
            .iter_mut()
            .find(|g| g.positions.contains(&region.canonical.start))
            .ok_or_else(|| Error::InvalidLayout(format!("region '{}' has no column group", region.name)))?;
        owner.positions.extend(region.overflow.clone());
    }

    let mut seen = HashSet::new();
    for group in &groups {
        if !seen.insert(group.name.to_lowercase()) {
            return Err(Error::InvalidLayout(format!("duplicate group name '{}'", group.name)));
        }
    }
    Ok(groups)
}
