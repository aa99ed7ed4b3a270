use tractor_plough_core::{BorderInset, CellCoord, GridCell, TractorColor};

/// Tractor driven across the field by a plough session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tractor {
    position: CellCoord,
    color: TractorColor,
}

impl Tractor {
    /// Creates a tractor parked at the provided logical cell.
    ///
    /// The position is not validated here; the session checks it against the
    /// field before replaying any move.
    #[must_use]
    pub const fn new(position: CellCoord, color: TractorColor) -> Self {
        Self { position, color }
    }

    /// Creates a tractor parked on the top-left ploughable cell.
    #[must_use]
    pub const fn at_origin(color: TractorColor) -> Self {
        Self::new(CellCoord::new(0, 0), color)
    }

    /// Logical cell currently occupied by the tractor.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Paintwork used when rendering the tractor.
    #[must_use]
    pub const fn color(&self) -> TractorColor {
        self.color
    }

    /// Moves the tractor to the provided cell without any bounds checking.
    pub fn move_to(&mut self, position: CellCoord) {
        self.position = position;
    }

    /// Physical grid cell occupied by the tractor once the border inset is applied.
    #[must_use]
    pub const fn physical_position(&self, inset: BorderInset) -> GridCell {
        inset.to_physical(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_to_overwrites_position() {
        let mut tractor = Tractor::at_origin(TractorColor::Blue);
        tractor.move_to(CellCoord::new(4, 7));

        assert_eq!(tractor.position(), CellCoord::new(4, 7));
        assert_eq!(tractor.color(), TractorColor::Blue);
    }

    #[test]
    fn physical_position_applies_inset() {
        let tractor = Tractor::new(CellCoord::new(1, 3), TractorColor::Red);
        assert_eq!(
            tractor.physical_position(BorderInset::new(2)),
            GridCell::new(3, 5)
        );
    }
}
