#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tractor Plough engine.
//!
//! This crate defines the value types that connect the field model, the
//! plough session, pilots and adapters. Pilots receive an [`InteriorView`]
//! and answer with untrusted [`Move`] values, the session normalizes each move
//! into a logical [`CellCoord`], ploughs the field and broadcasts [`Event`]
//! values so adapters can follow the replay deterministically.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Border inset applied to fields generated without an outer grass margin.
pub const DEFAULT_BORDER_INSET: BorderInset = BorderInset::new(1);

/// Location of a ploughable interior cell expressed in logical coordinates.
///
/// Logical coordinates are zero-based and exclude the border ring, so
/// `CellCoord::new(0, 0)` is always the top-left ploughable cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new logical cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Location of a cell within the physical, bordered grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    row: u32,
    column: u32,
}

impl GridCell {
    /// Creates a new physical grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based physical row index.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based physical column index.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Number of physical cells separating the grid edge from the first interior cell.
///
/// The inset counts the border ring plus any grass margin surrounding it, so
/// the same translation applies on every side of the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorderInset(u32);

impl BorderInset {
    /// Creates a new border inset.
    #[must_use]
    pub const fn new(cells: u32) -> Self {
        Self(cells)
    }

    /// Retrieves the inset measured in cells.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Translates a logical interior cell into its physical grid cell.
    #[must_use]
    pub const fn to_physical(&self, cell: CellCoord) -> GridCell {
        GridCell::new(
            cell.row().saturating_add(self.0),
            cell.column().saturating_add(self.0),
        )
    }

    /// Translates a physical grid cell back into logical coordinates.
    ///
    /// Returns `None` for cells that lie above or to the left of the interior.
    /// Callers remain responsible for checking the far edges against the
    /// interior dimensions.
    #[must_use]
    pub fn to_logical(&self, cell: GridCell) -> Option<CellCoord> {
        let row = cell.row().checked_sub(self.0)?;
        let column = cell.column().checked_sub(self.0)?;
        Some(CellCoord::new(row, column))
    }
}

/// Texture variations available for unploughed soil.
///
/// Variants are interchangeable for gameplay and only influence presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilVariant {
    /// First soil texture.
    One,
    /// Second soil texture.
    Two,
    /// Third soil texture.
    Three,
}

impl SoilVariant {
    /// Every soil texture in a stable order.
    pub const ALL: [SoilVariant; 3] = [Self::One, Self::Two, Self::Three];
}

/// Edge and corner pieces composing the ring around the ploughable interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorderKind {
    /// Edge running along the top of the interior.
    Top,
    /// Edge running along the bottom of the interior.
    Bottom,
    /// Edge running down the left side of the interior.
    Left,
    /// Edge running down the right side of the interior.
    Right,
    /// Corner joining the top and left edges.
    CornerTopLeft,
    /// Corner joining the top and right edges.
    CornerTopRight,
    /// Corner joining the bottom and left edges.
    CornerBottomLeft,
    /// Corner joining the bottom and right edges.
    CornerBottomRight,
}

/// Kind of tile occupying a single physical grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Grass surrounding the field.
    Grass,
    /// Border piece framing the ploughable interior.
    Border(BorderKind),
    /// Unploughed soil rendered with the provided texture.
    Soil(SoilVariant),
    /// Soil that has been ploughed by the tractor.
    Ploughed,
}

impl TileKind {
    /// Reports whether the tile has been ploughed.
    #[must_use]
    pub const fn is_ploughed(self) -> bool {
        matches!(self, Self::Ploughed)
    }

    /// Reports whether the tile is unploughed soil of any texture.
    #[must_use]
    pub const fn is_soil(self) -> bool {
        matches!(self, Self::Soil(_))
    }

    /// Reports whether the tile belongs to the surrounding border or grass.
    #[must_use]
    pub const fn is_frame(self) -> bool {
        matches!(self, Self::Grass | Self::Border(_))
    }

    /// Collapses the tile into the coarse category exposed to pilots.
    #[must_use]
    pub const fn category(self) -> TileCategory {
        match self {
            Self::Grass => TileCategory::Margin,
            Self::Border(_) => TileCategory::Border,
            Self::Soil(_) => TileCategory::Unploughed,
            Self::Ploughed => TileCategory::Ploughed,
        }
    }
}

/// Coarse gameplay category of a tile, without texture detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileCategory {
    /// Grass outside the border ring.
    Margin,
    /// Border ring.
    Border,
    /// Soil that still needs ploughing.
    Unploughed,
    /// Soil that has already been ploughed.
    Ploughed,
}

/// Cardinal directions available for relative tractor steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Row and column delta applied by a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }
}

/// Movement instruction emitted by a pilot.
///
/// Pilots are untrusted, so moves carry signed and possibly missing
/// coordinates. Every move must be normalized with [`Move::resolve`] before
/// the engine acts on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Absolute destination expressed in logical interior coordinates.
    To {
        /// Destination row.
        row: i64,
        /// Destination column.
        column: i64,
    },
    /// Single-cell step relative to the tractor's current position.
    Step(Direction),
    /// Destination with one or both coordinates missing.
    Partial {
        /// Destination row, if supplied.
        row: Option<i64>,
        /// Destination column, if supplied.
        column: Option<i64>,
    },
}

impl Move {
    /// Creates an absolute move toward the provided logical cell.
    #[must_use]
    pub const fn to(cell: CellCoord) -> Self {
        Self::To {
            row: cell.row() as i64,
            column: cell.column() as i64,
        }
    }

    /// Normalizes the move into an absolute logical cell within a `rows` × `columns` interior.
    ///
    /// `from` is the tractor's current position and anchors relative steps.
    pub fn resolve(self, from: CellCoord, rows: u32, columns: u32) -> Result<CellCoord, MoveError> {
        let (row, column) = match self {
            Self::To { row, column } => (row, column),
            Self::Step(direction) => {
                let (row_delta, column_delta) = direction.delta();
                (
                    i64::from(from.row()) + row_delta,
                    i64::from(from.column()) + column_delta,
                )
            }
            Self::Partial { row, column } => {
                let reason = match (row, column) {
                    (None, None) => "destination has no coordinates",
                    (None, Some(_)) => "destination is missing its row",
                    (Some(_), None) => "destination is missing its column",
                    (Some(row), Some(column)) => {
                        return Self::To { row, column }.resolve(from, rows, columns);
                    }
                };
                return Err(MoveError::Malformed {
                    reason: reason.to_owned(),
                });
            }
        };

        let in_range =
            (0..i64::from(rows)).contains(&row) && (0..i64::from(columns)).contains(&column);
        match (u32::try_from(row), u32::try_from(column)) {
            (Ok(row), Ok(column)) if in_range => Ok(CellCoord::new(row, column)),
            _ => Err(MoveError::OutOfBounds { row, column }),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coordinate =
            |value: Option<i64>| value.map_or_else(|| "?".to_owned(), |value| value.to_string());
        match self {
            Self::To { row, column } => write!(f, "({row}, {column})"),
            Self::Step(direction) => write!(f, "step {direction:?}"),
            Self::Partial { row, column } => {
                write!(f, "({}, {})", coordinate(*row), coordinate(*column))
            }
        }
    }
}

/// Visual identity applied to a tractor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TractorColor {
    /// Red paintwork.
    #[default]
    Red,
    /// Blue paintwork.
    Blue,
    /// Green paintwork.
    Green,
    /// Yellow paintwork.
    Yellow,
}

impl TractorColor {
    /// Lowercase name used to resolve the tractor's image asset.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
        }
    }
}

/// Read-only snapshot of the ploughable interior handed to pilots and renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteriorView {
    rows: u32,
    columns: u32,
    tiles: Vec<TileKind>,
}

impl InteriorView {
    /// Captures a new view from row-major interior tiles.
    ///
    /// `tiles` must hold exactly `rows` × `columns` entries. Debug builds
    /// panic on a mismatch; release builds pad with unploughed soil or drop
    /// the surplus so the view keeps its advertised shape.
    #[must_use]
    pub fn new(rows: u32, columns: u32, mut tiles: Vec<TileKind>) -> Self {
        let capacity = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(0);
        debug_assert_eq!(
            tiles.len(),
            capacity,
            "interior view of {rows}x{columns} needs {capacity} tiles"
        );
        tiles.resize(capacity, TileKind::Soil(SoilVariant::One));
        Self {
            rows,
            columns,
            tiles,
        }
    }

    /// Number of interior rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of interior columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the logical cell lies inside the interior.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Tile kind at the provided logical cell, if it lies inside the interior.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<TileKind> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Coarse category at the provided logical cell, if it lies inside the interior.
    #[must_use]
    pub fn category(&self, cell: CellCoord) -> Option<TileCategory> {
        self.kind(cell).map(TileKind::category)
    }

    /// Reports whether the provided cell has been ploughed.
    #[must_use]
    pub fn is_ploughed(&self, cell: CellCoord) -> bool {
        self.kind(cell).is_some_and(TileKind::is_ploughed)
    }

    /// Iterator over every interior cell and its kind in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, TileKind)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, kind)| {
            let index = index as u64;
            let row = (index / u64::from(columns)) as u32;
            let column = (index % u64::from(columns)) as u32;
            (CellCoord::new(row, column), *kind)
        })
    }

    /// Iterator over the cells that still need ploughing, in row-major order.
    pub fn unploughed_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.iter()
            .filter(|(_, kind)| !kind.is_ploughed())
            .map(|(cell, _)| cell)
    }

    /// Number of ploughed cells captured by the view.
    #[must_use]
    pub fn ploughed_count(&self) -> usize {
        self.tiles.iter().filter(|kind| kind.is_ploughed()).count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Events broadcast by a plough session while replaying moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The session validated the tractor's start cell and began replaying moves.
    SessionStarted {
        /// Cell the tractor occupies when the replay begins.
        start: CellCoord,
    },
    /// The tractor's start cell lies outside the field, so no move was replayed.
    StartRejected {
        /// Start cell that failed validation.
        start: CellCoord,
    },
    /// The tractor moved to the destination of a move.
    TractorMoved {
        /// Position of the move within the pilot's sequence.
        index: usize,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// A previously unploughed cell was ploughed and scored.
    CellPloughed {
        /// Cell that was ploughed.
        cell: CellCoord,
        /// Score after ploughing the cell.
        score: u32,
    },
    /// The tractor revisited a cell that was already ploughed.
    CellRevisited {
        /// Cell that was revisited.
        cell: CellCoord,
    },
    /// A move could not be applied and the session aborted.
    MoveRejected {
        /// Position of the move within the pilot's sequence.
        index: usize,
        /// Move as emitted by the pilot.
        attempted: Move,
        /// Reason the move was rejected.
        error: MoveError,
    },
    /// Every move was consumed without error.
    SessionCompleted {
        /// Final score.
        score: u32,
    },
}

/// Reasons a field operation may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum FieldError {
    /// Fields must have a positive width and height.
    #[error("field dimensions must be positive (received {width}x{height})")]
    InvalidDimensions {
        /// Requested interior width.
        width: u32,
        /// Requested interior height.
        height: u32,
    },
    /// The logical cell lies outside the ploughable interior.
    #[error("cell {cell} lies outside the ploughable interior")]
    OutOfBounds {
        /// Offending logical cell.
        cell: CellCoord,
    },
}

/// Reasons a pilot move may be rejected by the session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MoveError {
    /// The move targets a cell outside the ploughable interior.
    #[error("destination ({row}, {column}) lies outside the ploughable interior")]
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        column: i64,
    },
    /// The move cannot be normalized into a destination.
    #[error("malformed move: {reason}")]
    Malformed {
        /// Description of the defect.
        reason: String,
    },
    /// The pilot emitted more moves than the session accepts.
    #[error("move limit of {limit} exceeded")]
    LimitExceeded {
        /// Maximum number of moves accepted by the session.
        limit: usize,
    },
}
