//! Elevation bands and first-match classification.

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// A named elevation band.
///
/// A height belongs to the first band in a table whose `threshold_height`
/// is at or above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainType {
    pub name: String,
    pub threshold_height: f64,
    pub display_color: Srgb<u8>,
}

impl TerrainType {
    pub fn new(name: impl Into<String>, threshold_height: f64, rgb: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            threshold_height,
            display_color: Srgb::new(rgb[0], rgb[1], rgb[2]),
        }
    }
}

/// Scan `regions` in order and return the first whose threshold is `>= height`.
///
/// Order decides ties and overlaps, not threshold magnitude: with thresholds
/// that are not non-decreasing an earlier, higher band shadows later ones.
pub fn classify(height: f64, regions: &[TerrainType]) -> Result<&TerrainType> {
    if regions.is_empty() {
        return Err(TerrainError::EmptyRegionTable);
    }
    first_match(height, regions)
        .map(|i| &regions[i])
        .ok_or(TerrainError::UnmatchedRegion { height })
}

#[inline]
fn first_match(height: f64, regions: &[TerrainType]) -> Option<usize> {
    regions.iter().position(|r| r.threshold_height >= height)
}

/// Validated, ordered list of terrain bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TerrainType>", into = "Vec<TerrainType>")]
pub struct RegionTable {
    regions: Vec<TerrainType>,
}

impl RegionTable {
    /// Build a table, rejecting empty lists, duplicate names and thresholds
    /// outside [0, 1]. Decreasing thresholds are accepted with a warning.
    pub fn new(regions: Vec<TerrainType>) -> Result<Self> {
        if regions.is_empty() {
            return Err(TerrainError::EmptyRegionTable);
        }
        for (i, region) in regions.iter().enumerate() {
            let t = region.threshold_height;
            if !(0.0..=1.0).contains(&t) {
                return Err(TerrainError::ThresholdOutOfRange {
                    name: region.name.clone(),
                    threshold: t,
                });
            }
            if regions[..i].iter().any(|r| r.name == region.name) {
                return Err(TerrainError::DuplicateRegion(region.name.clone()));
            }
        }
        if let Some(pair) = regions
            .windows(2)
            .find(|w| w[1].threshold_height < w[0].threshold_height)
        {
            log::warn!(
                "region `{}` ({}) follows higher threshold `{}` ({}); classification is order-dependent",
                pair[1].name,
                pair[1].threshold_height,
                pair[0].name,
                pair[0].threshold_height
            );
        }
        Ok(Self { regions })
    }

    /// Five bands from deep water to snow caps.
    pub fn classic() -> Self {
        Self {
            regions: vec![
                TerrainType::new("Water", 0.3, [0, 128, 255]),
                TerrainType::new("Sand", 0.4, [194, 178, 128]),
                TerrainType::new("Grass", 0.6, [34, 139, 34]),
                TerrainType::new("Rock", 0.8, [128, 128, 128]),
                TerrainType::new("Snow", 1.0, [255, 255, 255]),
            ],
        }
    }

    /// Ten bands ordered peak-to-sea, for fields shaped with an inverted falloff
    /// where the island interior is low and the boundary high.
    pub fn inverted_island() -> Self {
        Self {
            regions: vec![
                TerrainType::new("Mountain2", 0.1, [74, 89, 100]),
                TerrainType::new("Mountain", 0.2, [63, 73, 75]),
                TerrainType::new("Ground", 0.3, [79, 49, 1]),
                TerrainType::new("Grass2", 0.4, [102, 136, 59]),
                TerrainType::new("Grass", 0.5, [183, 183, 71]),
                TerrainType::new("Sand2", 0.6, [183, 183, 71]),
                TerrainType::new("Sand", 0.7, [242, 223, 152]),
                TerrainType::new("Water3", 0.8, [104, 172, 214]),
                TerrainType::new("Water2", 0.9, [65, 125, 201]),
                TerrainType::new("Water", 1.0, [56, 103, 175]),
            ],
        }
    }

    pub fn classify(&self, height: f64) -> Result<&TerrainType> {
        classify(height, &self.regions)
    }

    /// Position of the matching band, or `None` when nothing covers `height`.
    pub fn classify_index(&self, height: f64) -> Option<usize> {
        first_match(height, &self.regions)
    }

    pub fn regions(&self) -> &[TerrainType] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl TryFrom<Vec<TerrainType>> for RegionTable {
    type Error = TerrainError;

    fn try_from(regions: Vec<TerrainType>) -> Result<Self> {
        Self::new(regions)
    }
}

impl From<RegionTable> for Vec<TerrainType> {
    fn from(table: RegionTable) -> Self {
        table.regions
    }
}
