use crate::error::Result;
use crate::regions::{RegionTable, TerrainType};

/// Normalized elevation grid, row-major, every value in [0, 1].
///
/// Read-only once built: a new generation call produces a new map instead of
/// updating an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    width: usize,
    height: usize,
    values: Vec<f64>,
    seed: u64,
    degenerate: bool,
}

impl HeightMap {
    pub(crate) fn from_parts(
        width: usize,
        height: usize,
        values: Vec<f64>,
        seed: u64,
        degenerate: bool,
    ) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            width,
            height,
            values,
            seed,
            degenerate,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Seed the octave offsets were drawn from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// True when the raw field was flat and every cell holds the fallback level.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Value at column `x`, row `y`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.values[y * self.width + x])
        } else {
            None
        }
    }

    pub fn row(&self, y: usize) -> Option<&[f64]> {
        (y < self.height).then(|| &self.values[y * self.width..(y + 1) * self.width])
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        self.values.chunks_exact(self.width)
    }

    /// Flat row-major view, length `width * height`.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Copy into nested rows, accessed as `map[y][x]`.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    pub fn min_max(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Classify every cell lazily, row by row.
    ///
    /// Nothing is stored; each item is computed when the iterator reaches it.
    pub fn classify_cells<'a>(
        &'a self,
        table: &'a RegionTable,
    ) -> impl Iterator<Item = Result<&'a TerrainType>> + 'a {
        self.values.iter().map(move |&h| table.classify(h))
    }
}
