/*
checkpoint.rs

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

//! Game checkpoint.
//!
//! A checkpoint is taken before every move, so that the player can undo moves one at a time.
//! It saves the board, the player position, and the conditions state.
//!
//! See [`crate::game`] where the checkpoints are organized as a stack: undoing a move reverts
//! back to the last checkpoint, which is then deleted.

use crate::game::Game;
use crate::generator::grid::Grid;
use crate::generator::tiles::Position;
use crate::generator::traversal::ConditionState;

/// Checkpoint representation.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckPoint {
    /// Board before the move.
    pub grid: Grid,

    /// Player position before the move.
    pub player: Position,

    pub conditions: ConditionState,
}

impl CheckPoint {
    /// Create a [`CheckPoint`] object for the provided [`Game`] object.
    pub fn new(game: &Game) -> Self {
        Self {
            grid: game.grid().clone(),
            player: game.player(),
            conditions: game.conditions.clone(),
        }
    }
}
