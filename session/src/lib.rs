#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Plough session that replays a pilot's path across a field.
//!
//! A [`PloughSession`] exclusively owns a [`FieldGrid`] and a [`Tractor`].
//! Each call to [`PloughSession::step`] applies at most one move and leaves the
//! session in a well-defined [`SessionState`], so adapters can render between
//! steps or stop replaying at any point. [`PloughSession::run`] drives the
//! replay to completion and summarises it as a [`SessionReport`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use tractor_plough_core::{CellCoord, Event, Move, MoveError};
use tractor_plough_field::{FieldGrid, PloughOutcome};
use tractor_plough_system_pilot::Pilot;

mod tractor;

pub use tractor::Tractor;

/// Lifecycle of a plough session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed; the start cell has not been validated yet.
    Ready,
    /// Replaying moves.
    Running,
    /// Every move was applied without error.
    Completed,
    /// Replay stopped early.
    Aborted(AbortReason),
}

impl SessionState {
    /// Reports whether the session reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted(_))
    }
}

/// Reason a session aborted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AbortReason {
    /// The tractor was parked outside the field when the session started.
    #[error("tractor start {start} lies outside the ploughable interior")]
    InvalidStart {
        /// Start cell that failed validation.
        start: CellCoord,
    },
    /// A pilot move could not be applied.
    #[error("move {index} to {attempted} rejected: {error}")]
    RejectedMove {
        /// Position of the move within the pilot's sequence.
        index: usize,
        /// Move as emitted by the pilot.
        attempted: Move,
        /// Reason the move was rejected.
        #[source]
        error: MoveError,
    },
}

/// Terminal outcome exported with a [`SessionReport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every move was applied.
    Completed,
    /// The session stopped at an invalid start or move.
    Aborted,
}

/// Summary of a finished session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Number of distinct cells ploughed during the session.
    pub score: u32,
    /// Terminal state reached by the session.
    pub final_state: Outcome,
    /// Number of ploughed interior cells when the session ended.
    pub ploughed_cell_count: usize,
    /// Number of ploughable interior cells.
    pub total_interior_cells: usize,
    /// Human-readable explanation when the session aborted.
    pub reason: Option<String>,
}

/// Replays a pilot's moves across a field, ploughing every visited cell.
#[derive(Clone, Debug)]
pub struct PloughSession {
    field: FieldGrid,
    tractor: Tractor,
    moves: VecDeque<Move>,
    next_index: usize,
    move_limit: Option<usize>,
    score: u32,
    state: SessionState,
}

impl PloughSession {
    /// Creates a session that will replay `moves` in order.
    #[must_use]
    pub fn new(field: FieldGrid, tractor: Tractor, moves: Vec<Move>) -> Self {
        Self {
            field,
            tractor,
            moves: moves.into(),
            next_index: 0,
            move_limit: None,
            score: 0,
            state: SessionState::Ready,
        }
    }

    /// Creates a session whose moves are computed by the pilot from the field's interior view.
    #[must_use]
    pub fn with_pilot<P>(field: FieldGrid, tractor: Tractor, pilot: &mut P) -> Self
    where
        P: Pilot + ?Sized,
    {
        let moves = pilot.compute_moves(&field.interior_view());
        Self::new(field, tractor, moves)
    }

    /// Aborts the session when the pilot emits more than `limit` moves.
    #[must_use]
    pub fn with_move_limit(mut self, limit: usize) -> Self {
        self.move_limit = Some(limit);
        self
    }

    /// Applies the next transition of the session.
    ///
    /// A `Ready` session validates the tractor's start cell, a `Running`
    /// session applies one move, and terminal sessions are left untouched.
    pub fn step(&mut self, out_events: &mut Vec<Event>) -> &SessionState {
        match self.state {
            SessionState::Ready => self.start(out_events),
            SessionState::Running => self.advance(out_events),
            SessionState::Completed | SessionState::Aborted(_) => {}
        }
        &self.state
    }

    /// Steps the session until it reaches a terminal state.
    pub fn run(&mut self, out_events: &mut Vec<Event>) -> SessionReport {
        loop {
            if let Some(report) = self.report() {
                return report;
            }
            let _ = self.step(out_events);
        }
    }

    /// Summary of the session, available once it reached a terminal state.
    #[must_use]
    pub fn report(&self) -> Option<SessionReport> {
        let (final_state, reason) = match &self.state {
            SessionState::Ready | SessionState::Running => return None,
            SessionState::Completed => (Outcome::Completed, None),
            SessionState::Aborted(reason) => (Outcome::Aborted, Some(reason.to_string())),
        };

        Some(SessionReport {
            score: self.score,
            final_state,
            ploughed_cell_count: self.field.ploughed_count(),
            total_interior_cells: self.field.interior_cell_count(),
            reason,
        })
    }

    fn start(&mut self, out_events: &mut Vec<Event>) {
        let start = self.tractor.position();
        if !self.field.contains(start) {
            warn!(%start, "tractor start lies outside the field");
            out_events.push(Event::StartRejected { start });
            self.state = SessionState::Aborted(AbortReason::InvalidStart { start });
            return;
        }

        out_events.push(Event::SessionStarted { start });
        self.state = SessionState::Running;
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        let Some(attempted) = self.moves.pop_front() else {
            self.complete(out_events);
            return;
        };
        let index = self.next_index;
        self.next_index += 1;

        if let Some(limit) = self.move_limit.filter(|limit| index >= *limit) {
            self.abort(index, attempted, MoveError::LimitExceeded { limit }, out_events);
            return;
        }

        let from = self.tractor.position();
        let destination =
            match attempted.resolve(from, self.field.height(), self.field.width()) {
                Ok(destination) => destination,
                Err(error) => {
                    self.abort(index, attempted, error, out_events);
                    return;
                }
            };

        let outcome = match self.field.plough(destination) {
            Ok(outcome) => outcome,
            Err(_) => {
                let error = MoveError::OutOfBounds {
                    row: i64::from(destination.row()),
                    column: i64::from(destination.column()),
                };
                self.abort(index, attempted, error, out_events);
                return;
            }
        };

        self.tractor.move_to(destination);
        out_events.push(Event::TractorMoved {
            index,
            from,
            to: destination,
        });
        match outcome {
            PloughOutcome::Ploughed => {
                self.score += 1;
                out_events.push(Event::CellPloughed {
                    cell: destination,
                    score: self.score,
                });
            }
            PloughOutcome::AlreadyPloughed => {
                out_events.push(Event::CellRevisited { cell: destination });
            }
        }

        if self.moves.is_empty() {
            self.complete(out_events);
        }
    }

    fn complete(&mut self, out_events: &mut Vec<Event>) {
        info!(score = self.score, moves = self.next_index, "plough session completed");
        out_events.push(Event::SessionCompleted { score: self.score });
        self.state = SessionState::Completed;
    }

    fn abort(
        &mut self,
        index: usize,
        attempted: Move,
        error: MoveError,
        out_events: &mut Vec<Event>,
    ) {
        warn!(index, %attempted, %error, "aborting plough session");
        out_events.push(Event::MoveRejected {
            index,
            attempted,
            error: error.clone(),
        });
        self.state = SessionState::Aborted(AbortReason::RejectedMove {
            index,
            attempted,
            error,
        });
    }

    /// Field being ploughed.
    #[must_use]
    pub const fn field(&self) -> &FieldGrid {
        &self.field
    }

    /// Tractor driven by the session.
    #[must_use]
    pub const fn tractor(&self) -> &Tractor {
        &self.tractor
    }

    /// Number of distinct cells ploughed so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Number of moves not yet consumed.
    #[must_use]
    pub fn remaining_moves(&self) -> usize {
        self.moves.len()
    }

    /// Consumes the session, returning the field and tractor in their final state.
    #[must_use]
    pub fn into_parts(self) -> (FieldGrid, Tractor) {
        (self.field, self.tractor)
    }
}
