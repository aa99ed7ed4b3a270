#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tractor Plough adapters.
//!
//! The engine never draws anything itself. Adapters capture a [`Scene`] from
//! a running session, map every tile to a sprite name and pixel position
//! using an explicit [`RenderConfig`], and hand the result to a
//! [`RenderingBackend`].

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt};
use tractor_plough_core::{BorderKind, GridCell, SoilVariant, TileKind, TractorColor};
use tractor_plough_session::{PloughSession, SessionState};

/// Name of the tileset entry used to draw the tile.
#[must_use]
pub const fn tile_sprite(kind: TileKind) -> &'static str {
    match kind {
        TileKind::Grass => "grass",
        TileKind::Border(BorderKind::CornerTopLeft) => "soil_bottom_right",
        TileKind::Border(BorderKind::CornerTopRight) => "soil_bottom_left",
        TileKind::Border(BorderKind::CornerBottomLeft) => "soil_top_right",
        TileKind::Border(BorderKind::CornerBottomRight) => "soil_top_left",
        TileKind::Border(BorderKind::Top) => "soil_bottom",
        TileKind::Border(BorderKind::Bottom) => "soil_top",
        TileKind::Border(BorderKind::Left) => "soil_right",
        TileKind::Border(BorderKind::Right) => "soil_left",
        TileKind::Soil(SoilVariant::One) => "soil1",
        TileKind::Soil(SoilVariant::Two) => "soil2",
        TileKind::Soil(SoilVariant::Three) => "soil3",
        TileKind::Ploughed => "ploughed_soil",
    }
}

/// Path of the image asset depicting a tractor of the provided color.
#[must_use]
pub fn tractor_sprite_path(color: TractorColor, tractor_size: u32) -> String {
    format!(
        "assets/{}_tractor_{tractor_size}x{tractor_size}.png",
        color.name()
    )
}

/// Pixel dimensions used to lay out a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    tile_size: u32,
    tractor_size: u32,
}

impl RenderConfig {
    /// Default edge length of a tile in pixels.
    pub const DEFAULT_TILE_SIZE: u32 = 16;

    /// Default edge length of the tractor sprite in pixels.
    pub const DEFAULT_TRACTOR_SIZE: u32 = 12;

    /// Creates a new render configuration.
    ///
    /// Returns an error when the tile has no area or the tractor would not
    /// fit inside a single tile.
    pub fn new(tile_size: u32, tractor_size: u32) -> Result<Self, RenderingError> {
        if tile_size == 0 {
            return Err(RenderingError::InvalidTileSize { tile_size });
        }
        if tractor_size == 0 || tractor_size > tile_size {
            return Err(RenderingError::InvalidTractorSize {
                tile_size,
                tractor_size,
            });
        }

        Ok(Self {
            tile_size,
            tractor_size,
        })
    }

    /// Edge length of a tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Edge length of the tractor sprite in pixels.
    #[must_use]
    pub const fn tractor_size(&self) -> u32 {
        self.tractor_size
    }

    /// Top-left pixel of the physical grid cell.
    #[must_use]
    pub fn tile_origin(&self, cell: GridCell) -> Vec2 {
        Vec2::new(cell.column() as f32, cell.row() as f32) * self.tile_size as f32
    }

    /// Top-left pixel of a tractor centred inside the physical grid cell.
    #[must_use]
    pub fn tractor_origin(&self, cell: GridCell) -> Vec2 {
        let padding = ((self.tile_size - self.tractor_size) / 2) as f32;
        self.tile_origin(cell) + Vec2::splat(padding)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_size: Self::DEFAULT_TILE_SIZE,
            tractor_size: Self::DEFAULT_TRACTOR_SIZE,
        }
    }
}

/// Tile positioned for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Physical grid cell of the tile.
    pub cell: GridCell,
    /// Kind of tile to draw.
    pub kind: TileKind,
    /// Tileset entry depicting the tile.
    pub sprite: &'static str,
    /// Top-left pixel of the tile.
    pub position: Vec2,
}

/// Tractor positioned for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct TractorPresentation {
    /// Physical grid cell occupied by the tractor.
    pub cell: GridCell,
    /// Paintwork of the tractor.
    pub color: TractorColor,
    /// Image asset depicting the tractor.
    pub sprite_path: String,
    /// Top-left pixel of the tractor sprite.
    pub position: Vec2,
    /// Edge length of the tractor sprite in pixels.
    pub size: f32,
}

/// Scene description combining the field layout, the tractor and the score.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of physical rows in the layout.
    pub rows: u32,
    /// Number of physical columns in the layout.
    pub columns: u32,
    /// Edge length of a tile in pixels.
    pub tile_size: f32,
    /// Every tile of the physical layout in row-major order.
    pub tiles: Vec<TilePresentation>,
    /// Tractor drawn on top of the tiles.
    pub tractor: TractorPresentation,
    /// Score accumulated so far.
    pub score: u32,
    /// Short description of the session state.
    pub status: String,
}

impl Scene {
    /// Captures the current state of a session.
    #[must_use]
    pub fn capture(session: &PloughSession, config: &RenderConfig) -> Self {
        let field = session.field();
        let (rows, columns) = field.physical_dimensions();
        let tiles = field
            .layout()
            .enumerate()
            .flat_map(|(row, tiles)| {
                tiles.iter().enumerate().map(move |(column, kind)| {
                    let cell = GridCell::new(row as u32, column as u32);
                    TilePresentation {
                        cell,
                        kind: *kind,
                        sprite: tile_sprite(*kind),
                        position: config.tile_origin(cell),
                    }
                })
            })
            .collect();

        let tractor = session.tractor();
        let tractor_cell = tractor.physical_position(field.border_inset());
        let status = match session.state() {
            SessionState::Ready => "ready".to_owned(),
            SessionState::Running => "running".to_owned(),
            SessionState::Completed => "completed".to_owned(),
            SessionState::Aborted(reason) => format!("aborted: {reason}"),
        };

        Self {
            rows,
            columns,
            tile_size: config.tile_size() as f32,
            tiles,
            tractor: TractorPresentation {
                cell: tractor_cell,
                color: tractor.color(),
                sprite_path: tractor_sprite_path(tractor.color(), config.tractor_size()),
                position: config.tractor_origin(tractor_cell),
                size: config.tractor_size() as f32,
            },
            score: session.score(),
            status,
        }
    }

    /// Total size of the scene in pixels.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.columns as f32, self.rows as f32) * self.tile_size
    }

    /// Text shown in the score overlay.
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("Score : {}", self.score)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown above the scene.
    pub window_title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tractor Plough scenes.
pub trait RenderingBackend {
    /// Draws a single frame of the provided presentation.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Tiles must span at least one pixel.
    InvalidTileSize {
        /// Provided tile size that failed validation.
        tile_size: u32,
    },
    /// The tractor sprite must be visible and fit inside a tile.
    InvalidTractorSize {
        /// Tile size the tractor must fit into.
        tile_size: u32,
        /// Provided tractor size that failed validation.
        tractor_size: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileSize { tile_size } => {
                write!(f, "tile_size must be positive (received {tile_size})")
            }
            Self::InvalidTractorSize {
                tile_size,
                tractor_size,
            } => write!(
                f,
                "tractor_size must be between 1 and {tile_size} (received {tractor_size})"
            ),
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tractor_plough_core::{CellCoord, Move};
    use tractor_plough_field::{FieldConfig, FieldGrid};
    use tractor_plough_session::Tractor;

    fn session(moves: Vec<Move>) -> PloughSession {
        let field = FieldGrid::generate_with(FieldConfig::new(3, 2).with_seed(4)).expect("valid");
        PloughSession::new(field, Tractor::at_origin(TractorColor::Blue), moves)
    }

    #[test]
    fn render_config_rejects_zero_tile_size() {
        let error = RenderConfig::new(0, 0).expect_err("zero tile size must be rejected");
        assert_eq!(error, RenderingError::InvalidTileSize { tile_size: 0 });
    }

    #[test]
    fn render_config_rejects_tractor_larger_than_tile() {
        let error = RenderConfig::new(16, 20).expect_err("tractor must fit");
        assert!(matches!(
            error,
            RenderingError::InvalidTractorSize {
                tile_size: 16,
                tractor_size: 20
            }
        ));
    }

    #[test]
    fn tractor_is_centred_in_its_tile() {
        let config = RenderConfig::default();
        let origin = config.tractor_origin(GridCell::new(1, 1));
        assert_eq!(origin, Vec2::new(18.0, 18.0));
    }

    #[test]
    fn scene_covers_the_physical_layout() {
        let scene = Scene::capture(&session(Vec::new()), &RenderConfig::default());

        assert_eq!((scene.rows, scene.columns), (4, 5));
        assert_eq!(scene.tiles.len(), 20);
        assert_eq!(scene.size(), Vec2::new(80.0, 64.0));
        assert_eq!(scene.tiles[0].sprite, "soil_bottom_right");
        assert_eq!(scene.tiles[19].position, Vec2::new(64.0, 48.0));
        assert_eq!(scene.status, "ready");
    }

    #[test]
    fn scene_tracks_tractor_and_ploughed_tiles() {
        let mut session = session(vec![Move::to(CellCoord::new(1, 2))]);
        let _ = session.run(&mut Vec::new());

        let scene = Scene::capture(&session, &RenderConfig::default());

        assert_eq!(scene.tractor.cell, GridCell::new(2, 3));
        assert_eq!(scene.tractor.position, Vec2::new(50.0, 34.0));
        assert_eq!(scene.tractor.sprite_path, "assets/blue_tractor_12x12.png");
        assert_eq!(scene.score_label(), "Score : 1");
        assert_eq!(scene.status, "completed");
        let ploughed: Vec<_> = scene
            .tiles
            .iter()
            .filter(|tile| tile.sprite == "ploughed_soil")
            .map(|tile| tile.cell)
            .collect();
        assert_eq!(ploughed, vec![GridCell::new(2, 3)]);
    }

    #[test]
    fn presentation_carries_title_and_scene() {
        let scene = Scene::capture(&session(Vec::new()), &RenderConfig::default());
        let presentation = Presentation::new("Tractor Plough", scene.clone());

        assert_eq!(presentation.window_title, "Tractor Plough");
        assert_eq!(presentation.scene, scene);
    }
}
