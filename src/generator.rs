/*
generator.rs

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

//! Generate random levels and solve them.
//!
//! The movement rules live in [`traversal`]. They work on any [`traversal::Terrain`]: the
//! sparse [`draft::Draft`] used during generation, the dense [`grid::Grid`] of a game in
//! progress, or a [`visits::Visits`] view used by the solver.
//!
//! To generate a level, use [`level_generator::generate_level`].
//! An attempt goes through the following steps:
//!
//! * A footprint is built by [`shape::generate_shape`], either from overlapping rectangles or
//!   from rooms joined by corridors.
//!
//! * [`obstacles::ObstaclePlacer`] turns some grass into dirt, brambles, stones, rivers, and ice.
//!   Every change goes through [`obstacles::try_place`], which reverts the change if the required
//!   tiles are no longer connected.
//!
//! * [`solver::Solver`] searches for a path that visits every required tile the number of times
//!   it needs. If it takes too many iterations, then the solver gives up and the attempt is
//!   discarded.
//!
//! * [`portals::PortalPlacer`] adds teleport pairs and solves the level again.
//!
//! * [`level::build_level`] rebases the coordinates and verifies the result.
//!
//! If all the attempts fail, then predefined levels from [`fallback`] can be used.

pub mod config;
pub mod draft;
pub mod fallback;
pub mod grid;
pub mod level;
pub mod level_generator;
pub mod level_parse;
pub mod obstacles;
pub mod path;
pub mod portals;
pub mod reach;
pub mod shape;
pub mod solver;
pub mod tiles;
pub mod traversal;
pub mod visits;

pub use config::{GeneratorConfig, WorldElement, WorldElements};
pub use level::Level;
pub use level_generator::generate_level;
