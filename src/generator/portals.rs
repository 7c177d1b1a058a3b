/*
portals.rs

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

//! Place teleport pairs once the level has a solution.
//!
//! Each pair takes two grass tiles, preferably far from each other. Portals are not required
//! tiles, so a pair changes the set of tiles the player must visit. The pair is kept only if the
//! level can still be solved from the same start position, and the new path replaces the old
//! solution.

use log::debug;
use rand::Rng;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;

use super::config::GeneratorConfig;
use super::draft::Draft;
use super::obstacles::{FEATURE_FLOOR, try_place};
use super::path::Path;
use super::solver::Solver;
use super::tiles::{PortalType, Position, TileType};
use super::traversal::AlwaysOpen;

/// Preferred smallest distance between the two portals of a pair.
pub const PORTAL_MIN_DISTANCE: i32 = 4;

// Relative weights for one, two, and three pairs.
const PAIR_WEIGHTS: [u32; PortalType::COUNT] = [50, 35, 15];

// Pair proposals per color.
const PAIR_ATTEMPTS: usize = 4;

/// Number of portal pairs to place: the configured number, or a random number between one and
/// three.
pub fn pair_count<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> usize {
    if let Some(n) = config.portal_pairs {
        return n.min(PortalType::COUNT);
    }
    match WeightedIndex::new(PAIR_WEIGHTS) {
        Ok(dist) => rng.sample(&dist) + 1,
        Err(_) => 1,
    }
}

/// [`PortalPlacer`] object.
pub struct PortalPlacer<'a, R: ?Sized> {
    config: &'a GeneratorConfig,
    rng: &'a mut R,

    /// Number of pairs committed.
    pub placed: usize,

    /// Solver iterations spent on re-solving the level.
    pub iteration: usize,
}

impl<'a, R: Rng + ?Sized> PortalPlacer<'a, R> {
    pub fn new(config: &'a GeneratorConfig, rng: &'a mut R) -> Self {
        Self {
            config,
            rng,
            placed: 0,
            iteration: 0,
        }
    }

    /// Place the portal pairs and return the solution of the resulting draft.
    ///
    /// `solution` must be a solution of `draft` from `start`. It is returned unchanged when no
    /// pair could be placed.
    pub fn place(&mut self, draft: &mut Draft, start: Position, solution: Path) -> Path {
        let count: usize = pair_count(self.config, self.rng);
        let mut solution: Path = solution;

        for color in (0..count).filter_map(|i| PortalType::from_repr(i as u8)) {
            for _ in 0..PAIR_ATTEMPTS {
                let Some((a, b)) = self.propose_pair(draft, start) else {
                    break;
                };
                let tile: TileType = TileType::Portal(color);
                if !try_place(draft, &[(a, tile), (b, tile)], &[], FEATURE_FLOOR) {
                    continue;
                }

                let mut solver = Solver::new(&*draft, &AlwaysOpen, self.config.solver_iterations);
                let result = solver.solve(start, self.rng);
                self.iteration += solver.iteration;
                match result {
                    Ok(path) => {
                        debug!("{color:?} portals at {a} and {b}");
                        solution = path;
                        self.placed += 1;
                        break;
                    }
                    Err(e) => {
                        debug!("{color:?} portals at {a} and {b} rejected: {e}");
                        draft.set(a, TileType::Grass);
                        draft.set(b, TileType::Grass);
                    }
                }
            }
        }
        solution
    }

    /// Pick two grass tiles other than the start, far apart when possible.
    fn propose_pair(&mut self, draft: &Draft, start: Position) -> Option<(Position, Position)> {
        let grass: Vec<Position> = draft
            .positions_of(TileType::Grass)
            .into_iter()
            .filter(|p| *p != start)
            .collect();
        let a: Position = *grass.choose(self.rng)?;
        let far: Vec<Position> = grass
            .iter()
            .copied()
            .filter(|p| p.distance(a) >= PORTAL_MIN_DISTANCE)
            .collect();
        let b: Position = match far.choose(self.rng) {
            Some(p) => *p,
            None => *grass
                .iter()
                .filter(|p| **p != a)
                .collect::<Vec<_>>()
                .choose(self.rng)
                .copied()?,
        };
        Some((a, b))
    }
}
