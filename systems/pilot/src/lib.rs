#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pilot capability that turns a field snapshot into a movement path.
//!
//! Pilots are authored outside the engine and their output is never trusted:
//! the session validates every [`Move`] they return. This crate provides the
//! [`Pilot`] trait together with a few stock implementations and a parser for
//! hand-written routes.

use thiserror::Error;
use tractor_plough_core::{CellCoord, Direction, InteriorView, Move};

/// Capability that computes the moves a tractor should follow.
pub trait Pilot {
    /// Produces the movement path for the provided interior snapshot.
    fn compute_moves(&mut self, view: &InteriorView) -> Vec<Move>;
}

impl<F> Pilot for F
where
    F: FnMut(&InteriorView) -> Vec<Move>,
{
    fn compute_moves(&mut self, view: &InteriorView) -> Vec<Move> {
        self(view)
    }
}

/// How a [`SerpentinePilot`] expresses its path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Encoding {
    Absolute,
    Steps,
}

/// Pilot that sweeps the interior row by row, reversing direction on every row.
///
/// The sweep starts at the top-left cell and visits every interior cell once.
#[derive(Clone, Copy, Debug)]
pub struct SerpentinePilot {
    encoding: Encoding,
}

impl Default for SerpentinePilot {
    fn default() -> Self {
        Self {
            encoding: Encoding::Absolute,
        }
    }
}

impl SerpentinePilot {
    /// Creates a pilot that emits absolute destinations.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            encoding: Encoding::Absolute,
        }
    }

    /// Creates a pilot that moves to the top-left cell and then emits relative steps.
    #[must_use]
    pub const fn steps() -> Self {
        Self {
            encoding: Encoding::Steps,
        }
    }
}

impl Pilot for SerpentinePilot {
    fn compute_moves(&mut self, view: &InteriorView) -> Vec<Move> {
        let path = serpentine_path(view.rows(), view.columns());
        match self.encoding {
            Encoding::Absolute => path.into_iter().map(Move::to).collect(),
            Encoding::Steps => {
                let Some(first) = path.first().copied() else {
                    return Vec::new();
                };
                let mut moves = Vec::with_capacity(path.len());
                moves.push(Move::to(first));
                moves.extend(path.windows(2).filter_map(|pair| {
                    direction_between(pair[0], pair[1]).map(Move::Step)
                }));
                moves
            }
        }
    }
}

/// Pilot that replays a fixed list of moves regardless of the field state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedPilot {
    moves: Vec<Move>,
}

impl ScriptedPilot {
    /// Creates a pilot that always answers with the provided moves.
    #[must_use]
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    /// Parses a route with [`parse_route`] and wraps it in a scripted pilot.
    pub fn from_route(route: &str) -> Result<Self, RouteParseError> {
        parse_route(route).map(Self::new)
    }

    /// Moves replayed by the pilot.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }
}

impl Pilot for ScriptedPilot {
    fn compute_moves(&mut self, _view: &InteriorView) -> Vec<Move> {
        self.moves.clone()
    }
}

/// Errors raised while parsing a hand-written route.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RouteParseError {
    /// A coordinate could not be parsed as an integer.
    #[error("route entry {position} ('{token}') has a non-numeric coordinate")]
    InvalidCoordinate {
        /// Zero-based position of the entry within the route.
        position: usize,
        /// Offending entry.
        token: String,
    },
    /// The entry is neither a coordinate pair nor a direction.
    #[error("route entry {position} ('{token}') is not a coordinate pair or direction")]
    UnknownToken {
        /// Zero-based position of the entry within the route.
        position: usize,
        /// Offending entry.
        token: String,
    },
}

/// Parses a route written as whitespace or semicolon separated entries.
///
/// `row,column` entries become absolute moves and `N`, `E`, `S`, `W` (or the
/// full direction names) become relative steps. Entries with an empty
/// coordinate such as `3,` are kept as [`Move::Partial`] so the session can
/// reject them at their position in the route.
pub fn parse_route(route: &str) -> Result<Vec<Move>, RouteParseError> {
    route
        .split(|c: char| c.is_whitespace() || c == ';')
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(position, token)| parse_entry(position, token))
        .collect()
}

fn parse_entry(position: usize, token: &str) -> Result<Move, RouteParseError> {
    if let Some((row, column)) = token.split_once(',') {
        let coordinate = |value: &str| -> Result<Option<i64>, RouteParseError> {
            let value = value.trim();
            if value.is_empty() {
                return Ok(None);
            }
            value
                .parse::<i64>()
                .map(Some)
                .map_err(|_| RouteParseError::InvalidCoordinate {
                    position,
                    token: token.to_owned(),
                })
        };

        return Ok(match (coordinate(row)?, coordinate(column)?) {
            (Some(row), Some(column)) => Move::To { row, column },
            (row, column) => Move::Partial { row, column },
        });
    }

    let direction = match token.to_ascii_lowercase().as_str() {
        "n" | "north" => Direction::North,
        "e" | "east" => Direction::East,
        "s" | "south" => Direction::South,
        "w" | "west" => Direction::West,
        _ => {
            return Err(RouteParseError::UnknownToken {
                position,
                token: token.to_owned(),
            })
        }
    };
    Ok(Move::Step(direction))
}

fn serpentine_path(rows: u32, columns: u32) -> Vec<CellCoord> {
    let mut path = Vec::with_capacity(rows as usize * columns as usize);
    for row in 0..rows {
        if row % 2 == 0 {
            path.extend((0..columns).map(|column| CellCoord::new(row, column)));
        } else {
            path.extend((0..columns).rev().map(|column| CellCoord::new(row, column)));
        }
    }
    path
}

fn direction_between(from: CellCoord, to: CellCoord) -> Option<Direction> {
    let column_diff = from.column().abs_diff(to.column());
    let row_diff = from.row().abs_diff(to.row());

    if column_diff + row_diff != 1 {
        return None;
    }

    if column_diff == 1 {
        if to.column() > from.column() {
            Some(Direction::East)
        } else {
            Some(Direction::West)
        }
    } else if to.row() > from.row() {
        Some(Direction::South)
    } else {
        Some(Direction::North)
    }
}
