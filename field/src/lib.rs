#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative field state for Tractor Plough.
//!
//! A [`FieldGrid`] owns the physical, bordered tile layout. Callers address
//! the ploughable interior in logical coordinates; the grid translates them
//! through its [`BorderInset`] and refuses to touch anything outside the
//! interior.

use std::slice::Chunks;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};
use tractor_plough_core::{
    BorderInset, BorderKind, CellCoord, FieldError, GridCell, InteriorView, SoilVariant, TileKind,
};

const DEFAULT_FIELD_WIDTH: u32 = 20;
const DEFAULT_FIELD_HEIGHT: u32 = 20;

/// Largest number of physical cells a single field may allocate.
pub const MAX_FIELD_CELLS: u64 = 1 << 24;

/// Parameters used to generate a [`FieldGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldConfig {
    /// Number of ploughable columns.
    pub width: u32,
    /// Number of ploughable rows.
    pub height: u32,
    /// Seed driving soil texture selection. A fresh seed is drawn when absent.
    pub seed: Option<u64>,
    /// Number of grass rings drawn outside the border ring.
    pub grass_margin: u32,
}

impl FieldConfig {
    /// Creates a configuration for a `width` × `height` interior without a grass margin.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            seed: None,
            grass_margin: 0,
        }
    }

    /// Fixes the seed used for soil texture selection.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Surrounds the border ring with the provided number of grass rings.
    #[must_use]
    pub const fn with_grass_margin(mut self, grass_margin: u32) -> Self {
        self.grass_margin = grass_margin;
        self
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT)
    }
}

/// Result of a successful plough request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PloughOutcome {
    /// The cell held soil and is now ploughed.
    Ploughed,
    /// The cell was already ploughed and remains unchanged.
    AlreadyPloughed,
}

/// Bordered tile grid surrounding a ploughable interior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldGrid {
    width: u32,
    height: u32,
    inset: BorderInset,
    seed: u64,
    physical_rows: u32,
    physical_columns: u32,
    tiles: Vec<TileKind>,
}

impl FieldGrid {
    /// Generates a `width` × `height` interior with a single border ring and a random seed.
    pub fn generate(width: u32, height: u32) -> Result<Self, FieldError> {
        Self::generate_with(FieldConfig::new(width, height))
    }

    /// Generates a field from an explicit configuration.
    ///
    /// Fails with [`FieldError::InvalidDimensions`] when either dimension is
    /// zero or the bordered grid would exceed [`MAX_FIELD_CELLS`].
    pub fn generate_with(config: FieldConfig) -> Result<Self, FieldError> {
        let invalid = FieldError::InvalidDimensions {
            width: config.width,
            height: config.height,
        };
        if config.width == 0 || config.height == 0 {
            return Err(invalid);
        }

        let inset = config.grass_margin.checked_add(1).ok_or(invalid)?;
        let span = inset.checked_mul(2).ok_or(invalid)?;
        let physical_columns = config.width.checked_add(span).ok_or(invalid)?;
        let physical_rows = config.height.checked_add(span).ok_or(invalid)?;
        let cell_count = u64::from(physical_rows) * u64::from(physical_columns);
        if cell_count > MAX_FIELD_CELLS {
            return Err(invalid);
        }
        let capacity = usize::try_from(cell_count).map_err(|_| invalid)?;

        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut field = Self {
            width: config.width,
            height: config.height,
            inset: BorderInset::new(inset),
            seed,
            physical_rows,
            physical_columns,
            tiles: vec![TileKind::Grass; capacity],
        };
        field.lay_border();
        field.sow_soil(&mut ChaCha8Rng::seed_from_u64(seed));

        debug!(
            width = field.width,
            height = field.height,
            seed,
            "generated field"
        );
        Ok(field)
    }

    fn lay_border(&mut self) {
        let top = self.inset.get() - 1;
        let left = top;
        let bottom = self.height + self.inset.get();
        let right = self.width + self.inset.get();

        self.set(GridCell::new(top, left), BorderKind::CornerTopLeft);
        self.set(GridCell::new(top, right), BorderKind::CornerTopRight);
        self.set(GridCell::new(bottom, left), BorderKind::CornerBottomLeft);
        self.set(GridCell::new(bottom, right), BorderKind::CornerBottomRight);

        for column in left + 1..right {
            self.set(GridCell::new(top, column), BorderKind::Top);
            self.set(GridCell::new(bottom, column), BorderKind::Bottom);
        }
        for row in top + 1..bottom {
            self.set(GridCell::new(row, left), BorderKind::Left);
            self.set(GridCell::new(row, right), BorderKind::Right);
        }
    }

    fn set(&mut self, cell: GridCell, border: BorderKind) {
        if let Some(index) = self.physical_index(cell) {
            self.tiles[index] = TileKind::Border(border);
        }
    }

    fn sow_soil(&mut self, rng: &mut ChaCha8Rng) {
        for row in 0..self.height {
            for column in 0..self.width {
                let variant = SoilVariant::ALL[rng.gen_range(0..SoilVariant::ALL.len())];
                if let Some(index) = self.interior_index(CellCoord::new(row, column)) {
                    self.tiles[index] = TileKind::Soil(variant);
                }
            }
        }
    }

    /// Ploughs the logical interior cell.
    ///
    /// Cells outside the interior are rejected with [`FieldError::OutOfBounds`]
    /// and leave the grid untouched. Ploughing an already ploughed cell
    /// succeeds without changing anything.
    pub fn plough(&mut self, cell: CellCoord) -> Result<PloughOutcome, FieldError> {
        let Some(index) = self.interior_index(cell) else {
            warn!(%cell, "rejected plough outside the field interior");
            return Err(FieldError::OutOfBounds { cell });
        };

        let tile = &mut self.tiles[index];
        if tile.is_ploughed() {
            return Ok(PloughOutcome::AlreadyPloughed);
        }

        *tile = TileKind::Ploughed;
        debug!(%cell, "ploughed cell");
        Ok(PloughOutcome::Ploughed)
    }

    /// Reports whether the logical interior cell has been ploughed.
    ///
    /// Cells outside the interior are never ploughed.
    #[must_use]
    pub fn is_ploughed(&self, cell: CellCoord) -> bool {
        self.interior_index(cell)
            .is_some_and(|index| self.tiles[index].is_ploughed())
    }

    /// Captures a read-only snapshot of the ploughable interior.
    #[must_use]
    pub fn interior_view(&self) -> InteriorView {
        let mut tiles = Vec::with_capacity(self.interior_cell_count());
        for row in 0..self.height {
            for column in 0..self.width {
                if let Some(index) = self.interior_index(CellCoord::new(row, column)) {
                    tiles.push(self.tiles[index]);
                }
            }
        }
        InteriorView::new(self.height, self.width, tiles)
    }

    /// Physical layout as an iterator over rows, border and margin included.
    #[must_use]
    pub fn layout(&self) -> Chunks<'_, TileKind> {
        self.tiles.chunks(self.physical_columns as usize)
    }

    /// Tile kind stored at the physical grid cell, if it exists.
    #[must_use]
    pub fn tile(&self, cell: GridCell) -> Option<TileKind> {
        self.physical_index(cell).map(|index| self.tiles[index])
    }

    /// Translates a logical interior cell into its physical grid cell.
    ///
    /// Returns `None` when the cell lies outside the interior.
    #[must_use]
    pub fn to_physical(&self, cell: CellCoord) -> Option<GridCell> {
        self.contains(cell).then(|| self.inset.to_physical(cell))
    }

    /// Reports whether the logical cell lies inside the ploughable interior.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.height && cell.column() < self.width
    }

    /// Number of ploughable columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of ploughable rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions of the physical grid as `(rows, columns)`.
    #[must_use]
    pub const fn physical_dimensions(&self) -> (u32, u32) {
        (self.physical_rows, self.physical_columns)
    }

    /// Translation between logical and physical coordinates.
    #[must_use]
    pub const fn border_inset(&self) -> BorderInset {
        self.inset
    }

    /// Seed that produced the soil textures.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of ploughable interior cells.
    #[must_use]
    pub fn interior_cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of interior cells that have been ploughed.
    #[must_use]
    pub fn ploughed_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_ploughed()).count()
    }

    fn interior_index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            self.physical_index(self.inset.to_physical(cell))
        } else {
            None
        }
    }

    fn physical_index(&self, cell: GridCell) -> Option<usize> {
        if cell.row() < self.physical_rows && cell.column() < self.physical_columns {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.physical_columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Query functions that provide read-only access to the field state.
pub mod query {
    use tractor_plough_core::{GridCell, TileKind};

    use super::FieldGrid;

    /// Enumerates every physical cell outside the interior together with its tile.
    ///
    /// Cells are reported in row-major order and cover the border ring and
    /// any grass margin.
    #[must_use]
    pub fn frame_tiles(field: &FieldGrid) -> Vec<(GridCell, TileKind)> {
        let inset = field.border_inset();
        field
            .layout()
            .enumerate()
            .flat_map(|(row, tiles)| {
                tiles
                    .iter()
                    .enumerate()
                    .map(move |(column, tile)| (GridCell::new(row as u32, column as u32), *tile))
            })
            .filter(|(cell, _)| {
                inset
                    .to_logical(*cell)
                    .map_or(true, |logical| !field.contains(logical))
            })
            .collect()
    }

    /// Number of interior cells that still hold soil.
    #[must_use]
    pub fn unploughed_count(field: &FieldGrid) -> usize {
        field.interior_cell_count() - field.ploughed_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(width: u32, height: u32, seed: u64) -> FieldGrid {
        FieldGrid::generate_with(FieldConfig::new(width, height).with_seed(seed)).expect("valid")
    }

    #[test]
    fn generate_rejects_zero_dimensions() {
        assert_eq!(
            FieldGrid::generate(0, 4),
            Err(FieldError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            FieldGrid::generate(4, 0),
            Err(FieldError::InvalidDimensions {
                width: 4,
                height: 0
            })
        );
    }

    #[test]
    fn generate_rejects_oversized_fields() {
        let error = FieldGrid::generate(u32::MAX, 2).expect_err("field cannot fit in memory");
        assert!(matches!(error, FieldError::InvalidDimensions { .. }));
        let error = FieldGrid::generate(5_000, 5_000).expect_err("field exceeds cell budget");
        assert!(matches!(error, FieldError::InvalidDimensions { .. }));
    }

    #[test]
    fn single_cell_field_has_full_border_ring() {
        let field = FieldGrid::generate_with(FieldConfig::new(1, 1).with_seed(1)).expect("valid");
        let rows: Vec<Vec<TileKind>> = field.layout().map(<[TileKind]>::to_vec).collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            vec![
                TileKind::Border(BorderKind::CornerTopLeft),
                TileKind::Border(BorderKind::Top),
                TileKind::Border(BorderKind::CornerTopRight),
            ]
        );
        assert_eq!(rows[1][0], TileKind::Border(BorderKind::Left));
        assert!(rows[1][1].is_soil());
        assert_eq!(rows[1][2], TileKind::Border(BorderKind::Right));
        assert_eq!(
            rows[2],
            vec![
                TileKind::Border(BorderKind::CornerBottomLeft),
                TileKind::Border(BorderKind::Bottom),
                TileKind::Border(BorderKind::CornerBottomRight),
            ]
        );
    }

    #[test]
    fn grass_margin_surrounds_the_border_ring() {
        let field = FieldGrid::generate_with(
            FieldConfig::new(3, 2).with_seed(9).with_grass_margin(1),
        )
        .expect("valid");

        assert_eq!(field.physical_dimensions(), (6, 7));
        assert_eq!(field.border_inset(), BorderInset::new(2));
        assert_eq!(field.tile(GridCell::new(0, 0)), Some(TileKind::Grass));
        assert_eq!(field.tile(GridCell::new(5, 6)), Some(TileKind::Grass));
        assert_eq!(
            field.tile(GridCell::new(1, 1)),
            Some(TileKind::Border(BorderKind::CornerTopLeft))
        );
        assert_eq!(
            field.tile(GridCell::new(4, 5)),
            Some(TileKind::Border(BorderKind::CornerBottomRight))
        );
        assert_eq!(
            field.to_physical(CellCoord::new(0, 0)),
            Some(GridCell::new(2, 2))
        );
    }

    #[test]
    fn plough_marks_cell_and_is_idempotent() {
        let mut field = seeded(3, 3, 3);
        let cell = CellCoord::new(1, 2);

        assert_eq!(field.plough(cell), Ok(PloughOutcome::Ploughed));
        assert!(field.is_ploughed(cell));
        assert_eq!(field.plough(cell), Ok(PloughOutcome::AlreadyPloughed));
        assert_eq!(field.ploughed_count(), 1);
        assert_eq!(field.tile(GridCell::new(2, 3)), Some(TileKind::Ploughed));
    }

    #[test]
    fn plough_outside_interior_leaves_field_untouched() {
        let mut field = seeded(2, 2, 5);
        let before = field.clone();

        for cell in [CellCoord::new(2, 0), CellCoord::new(0, 2), CellCoord::new(9, 9)] {
            assert_eq!(field.plough(cell), Err(FieldError::OutOfBounds { cell }));
        }

        assert_eq!(field, before);
        assert!(!field.is_ploughed(CellCoord::new(2, 0)));
    }

    #[test]
    fn interior_view_trims_border() {
        let mut field = seeded(4, 2, 11);
        let _ = field.plough(CellCoord::new(1, 3)).expect("inside interior");

        let view = field.interior_view();
        assert_eq!((view.rows(), view.columns()), (2, 4));
        assert!(view.is_ploughed(CellCoord::new(1, 3)));
        assert!(view.iter().all(|(_, kind)| kind.is_soil() || kind.is_ploughed()));
        assert_eq!(view.ploughed_count(), 1);
    }

    #[test]
    fn recorded_seed_reproduces_textures() {
        let first = FieldGrid::generate(6, 5).expect("valid");
        let replay = FieldGrid::generate_with(FieldConfig::new(6, 5).with_seed(first.seed()))
            .expect("valid");
        assert_eq!(first, replay);
    }

    #[test]
    fn unploughed_count_tracks_ploughing() {
        let mut field = seeded(2, 3, 2);
        assert_eq!(query::unploughed_count(&field), 6);
        let _ = field.plough(CellCoord::new(2, 1)).expect("inside interior");
        assert_eq!(query::unploughed_count(&field), 5);
    }
}
