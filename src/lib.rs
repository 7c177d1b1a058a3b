/*
lib.rs

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

//! Sporepath puzzle core.
//!
//! The player walks on a grid of tiles. Walking off a grass tile turns it into a mushroom, and
//! dirt needs two visits. The player wins when the last tile that needs a visit is reached.
//!
//! * [`generator`] builds random levels that are guaranteed to be solvable.
//! * [`oracle`] answers questions about a game in progress: is the player stuck, and what
//!   should be played next.
//! * [`game`] applies the player moves to a live board, with undo.

pub mod checkpoint;
pub mod game;
pub mod generator;
pub mod oracle;
