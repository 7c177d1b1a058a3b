/*
oracle.rs

Copyright 2025 Hervé Quatremain

This file is part of Sporepath.

Sporepath is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Sporepath is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Sporepath. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Answer questions about a game in progress.
//!
//! The functions work on the live board, where the visit progress is encoded in the tile types:
//! consumed grass is a mushroom and half-visited dirt is grass. The tile under the player is not
//! consumed yet; it is consumed when the player walks off.
//!
//! [`is_stuck`] only runs a breadth-first search, and is cheap enough to call after every move.
//! [`is_solvable`] and [`hint`] run the bounded solver and can answer [`Solvability::Unsure`]
//! when the search is cut short. An unsure answer must not be reported as unsolvable.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::generator::grid::Grid;
use crate::generator::path::Path;
use crate::generator::solver::{Solver, SolverError};
use crate::generator::tiles::{Position, TileType};
use crate::generator::traversal::{Conditions, Terrain};
use crate::generator::visits::Visits;

/// Number of moves returned by [`hint`].
pub const HINT_MOVES: usize = 3;

/// Default solver iterations for the runtime questions.
pub const HINT_ITERATIONS: usize = 10_000;

/// Result of [`is_solvable`].
#[derive(Debug, Clone, PartialEq)]
pub enum Solvability {
    /// The board can be completed by following the path. The path starts on the player.
    Solved(Path),

    /// No move sequence completes the board.
    Unsolvable,

    /// The solver gave up before reaching a conclusion.
    Unsure,
}

/// Result of [`hint`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    /// The player already won.
    Complete,

    /// The board cannot be completed. The positions around the player help locating the
    /// moves to undo.
    Undo(Vec<Position>),

    /// The next stops of a solution.
    Moves(Vec<Position>),

    /// No answer within the iteration limit.
    Unsure,
}

/// Whether the player stands on the last tile that needs a visit.
pub fn is_won(grid: &Grid, player: Position) -> bool {
    grid.remaining_visits() == 1 && grid.tile(player).visits_needed() == 1
}

/// Whether a tile that still needs a visit cannot be reached from the player position.
///
/// The tile under the player is considered consumed, because the player has to walk off it.
pub fn is_stuck<C: Conditions + ?Sized>(grid: &Grid, player: Position, conditions: &C) -> bool {
    let mut visits: Visits<Grid> = Visits::new(grid);
    visits.visit(player);
    visits.first_lost(conditions, player).is_some()
}

/// Run the bounded solver from the player position.
pub fn is_solvable<C: Conditions + ?Sized, R: Rng + ?Sized>(
    grid: &Grid,
    player: Position,
    conditions: &C,
    max_iterations: usize,
    rng: &mut R,
) -> Solvability {
    match Solver::new(grid, conditions, max_iterations).solve(player, rng) {
        Ok(path) => Solvability::Solved(path),
        Err(SolverError::NoPath) => Solvability::Unsolvable,
        Err(SolverError::IterationLimit) => Solvability::Unsure,
    }
}

/// Suggest what the player should do next.
pub fn hint<C: Conditions + ?Sized, R: Rng + ?Sized>(
    grid: &Grid,
    player: Position,
    conditions: &C,
    max_iterations: usize,
    rng: &mut R,
) -> Hint {
    if is_won(grid, player) {
        return Hint::Complete;
    }
    if is_stuck(grid, player, conditions) {
        return Hint::Undo(undo_candidates(grid, player));
    }
    match is_solvable(grid, player, conditions, max_iterations, rng) {
        Solvability::Solved(path) => Hint::Moves(path.next_moves(HINT_MOVES)),
        Solvability::Unsolvable => Hint::Undo(undo_candidates(grid, player)),
        Solvability::Unsure => Hint::Unsure,
    }
}

/// Tiles around the player, in [`crate::generator::tiles::Direction::ALL`] order.
fn undo_candidates(grid: &Grid, player: Position) -> Vec<Position> {
    player
        .neighbors()
        .into_iter()
        .filter(|p| grid.tile(*p) != TileType::Void)
        .collect()
}
