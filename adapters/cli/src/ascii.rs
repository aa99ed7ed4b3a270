use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use tractor_plough_core::{BorderKind, TileKind};
use tractor_plough_rendering::{Presentation, RenderingBackend};

const TRACTOR_GLYPH: char = 'T';

/// Character used to draw a tile in a terminal.
const fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Grass => ',',
        TileKind::Border(
            BorderKind::CornerTopLeft
            | BorderKind::CornerTopRight
            | BorderKind::CornerBottomLeft
            | BorderKind::CornerBottomRight,
        ) => '+',
        TileKind::Border(BorderKind::Top | BorderKind::Bottom) => '-',
        TileKind::Border(BorderKind::Left | BorderKind::Right) => '|',
        TileKind::Soil(_) => '.',
        TileKind::Ploughed => '#',
    }
}

/// Backend that draws scenes as text, one character per physical tile.
#[derive(Debug)]
pub(crate) struct AsciiBackend<W> {
    out: W,
}

impl<W: Write> AsciiBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for AsciiBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        let scene = &presentation.scene;
        let columns = scene.columns as usize;

        writeln!(self.out, "{}", presentation.window_title)?;
        if columns > 0 {
            for row in scene.tiles.chunks(columns) {
                let line: String = row
                    .iter()
                    .map(|tile| {
                        if tile.cell == scene.tractor.cell {
                            TRACTOR_GLYPH
                        } else {
                            glyph(tile.kind)
                        }
                    })
                    .collect();
                writeln!(self.out, "{line}")?;
            }
        }
        writeln!(self.out, "{}  [{}]", scene.score_label(), scene.status)?;
        writeln!(self.out)?;

        self.out.flush().context("failed to flush rendered frame")
    }
}
