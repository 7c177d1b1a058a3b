/*
solver.rs

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

//! Find a random path that consumes every required tile.
//!
//! The search is a randomized depth-first search with backtracking. It keeps an explicit stack
//! of frames instead of recursing, and undoes visits with a trail: each frame remembers whether
//! arriving on its tile consumed a visit.
//!
//! Moves come from the [`Traversal`] rules, so jumps, water and ice slides, portals, and bounce
//! pads are all taken into account. Candidate moves are shuffled to produce a different path on
//! each run.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::fmt;

use super::path::Path;
use super::tiles::Position;
use super::traversal::{Conditions, Terrain, Traversal};
use super::visits::Visits;

/// Type of errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// No possible path.
    NoPath,

    /// No path found before the iteration limit. A path might still exist.
    IterationLimit,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolverError::NoPath => write!(f, "no solution"),
            SolverError::IterationLimit => write!(f, "iteration limit reached"),
        }
    }
}

/// Bridge stop: the player stood on this non-required tile after this many visits.
/// Standing there again without consuming anything in between would be a loop.
type BridgeStop = (Position, usize);

/// One level of the search.
struct Frame {
    pos: Position,

    /// Shuffled destinations to explore from [`Frame::pos`].
    candidates: Vec<Position>,

    /// Index of the next candidate.
    next: usize,

    /// Whether arriving on [`Frame::pos`] consumed a visit.
    consumed: bool,

    bridge: Option<BridgeStop>,
}

/// [`Solver`] object.
pub struct Solver<'a, T: ?Sized, C: ?Sized> {
    terrain: &'a T,
    conditions: &'a C,

    /// Number of moves tried before giving up.
    pub max_iterations: usize,

    /// Number of iterations it took to run the last search.
    pub iteration: usize,
}

impl<'a, T: Terrain + ?Sized, C: Conditions + ?Sized> Solver<'a, T, C> {
    /// Create the object.
    pub fn new(terrain: &'a T, conditions: &'a C, max_iterations: usize) -> Self {
        Self {
            terrain,
            conditions,
            max_iterations,
            iteration: 0,
        }
    }

    /// Search for a path from the given start position and return it.
    ///
    /// The start position counts as the first stop of the path.
    ///
    /// # Errors
    ///
    /// The method returns [`SolverError::NoPath`] when every move sequence has been explored,
    /// and [`SolverError::IterationLimit`] when the search was cut short. In that later case,
    /// the method can be retried.
    pub fn solve<R: Rng + ?Sized>(
        &mut self,
        start: Position,
        rng: &mut R,
    ) -> Result<Path, SolverError> {
        self.iteration = 0;

        let mut visits: Visits<'a, T> = Visits::new(self.terrain);
        let mut bridges: HashSet<BridgeStop> = HashSet::new();
        let mut path: Path = Path::new(visits.remaining_total() * 2);

        debug!(
            "Start = {start}  Visits needed = {}",
            visits.remaining_total()
        );
        if !Traversal::new(&visits, self.conditions).is_walkable(start) {
            return Err(SolverError::NoPath);
        }

        let consumed: bool = visits.visit(start);
        path.push(start);
        if visits.remaining_total() == 0 {
            return Ok(path);
        }
        let bridge: Option<BridgeStop> = Self::mark_bridge(&visits, &mut bridges, start, consumed);
        let candidates: Vec<Position> = self.candidates(&visits, start, &bridges, rng);
        let mut stack: Vec<Frame> = vec![Frame {
            pos: start,
            candidates,
            next: 0,
            consumed,
            bridge,
        }];

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };

            if frame.next >= frame.candidates.len() {
                let (pos, consumed, bridge) = (frame.pos, frame.consumed, frame.bridge);
                stack.pop();
                debug!("    Back: no eligible move from {pos}");
                Self::retreat(&mut visits, &mut bridges, &mut path, pos, consumed, bridge);
                continue;
            }
            let pos: Position = frame.candidates[frame.next];
            frame.next += 1;

            self.iteration += 1;
            if self.iteration > self.max_iterations {
                debug!("Iteration limit reached ({})", self.max_iterations);
                return Err(SolverError::IterationLimit);
            }

            let consumed: bool = visits.visit(pos);
            path.push(pos);
            if visits.remaining_total() == 0 {
                debug!("Path found in {} iterations", self.iteration);
                return Ok(path);
            }
            let bridge: Option<BridgeStop> =
                Self::mark_bridge(&visits, &mut bridges, pos, consumed);

            // Give up on this move early if some tile can never be reached again
            if let Some(lost) = visits.first_lost(self.conditions, pos) {
                debug!("    Back: {lost} unreachable from {pos}");
                Self::retreat(&mut visits, &mut bridges, &mut path, pos, consumed, bridge);
                continue;
            }

            let candidates: Vec<Position> = self.candidates(&visits, pos, &bridges, rng);
            stack.push(Frame {
                pos,
                candidates,
                next: 0,
                consumed,
                bridge,
            });
        }
        debug!("No path after {} iterations", self.iteration);
        Err(SolverError::NoPath)
    }

    /// Destinations worth exploring from the given position, in random order.
    fn candidates<R: Rng + ?Sized>(
        &self,
        visits: &Visits<'a, T>,
        pos: Position,
        bridges: &HashSet<BridgeStop>,
        rng: &mut R,
    ) -> Vec<Position> {
        let progress: usize = visits.progress();
        let mut candidates: Vec<Position> = Traversal::new(visits, self.conditions)
            .destinations(pos)
            .into_iter()
            .filter(|d| visits.is_pending(*d) || !bridges.contains(&(*d, progress)))
            .collect();
        candidates.shuffle(rng);
        candidates
    }

    fn mark_bridge(
        visits: &Visits<'a, T>,
        bridges: &mut HashSet<BridgeStop>,
        pos: Position,
        consumed: bool,
    ) -> Option<BridgeStop> {
        if consumed {
            return None;
        }
        let stop: BridgeStop = (pos, visits.progress());
        bridges.insert(stop);
        Some(stop)
    }

    /// Undo the arrival on a position.
    fn retreat(
        visits: &mut Visits<'a, T>,
        bridges: &mut HashSet<BridgeStop>,
        path: &mut Path,
        pos: Position,
        consumed: bool,
        bridge: Option<BridgeStop>,
    ) {
        if consumed {
            visits.unvisit(pos);
        }
        if let Some(stop) = bridge {
            bridges.remove(&stop);
        }
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::grid::Grid;
    use crate::generator::level::Level;
    use crate::generator::traversal::AlwaysOpen;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn solve(ascii: &str, max_iterations: usize, seed: u64) -> Result<Path, SolverError> {
        let level = Level::parse(ascii).unwrap();
        let grid: Grid = level.grid();
        let mut rng = Pcg64::seed_from_u64(seed);
        Solver::new(&grid, &AlwaysOpen, max_iterations).solve(level.start(), &mut rng)
    }

    #[test]
    fn test_solves_small_rectangle() {
        let path = solve("@GG\nGGG\nGGG", 10_000, 1).unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(path.get_first(), Some(Position::new(0, 0)));
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(path.visit_count(Position::new(x, y)), 1);
            }
        }
    }

    #[test]
    fn test_dirt_needs_two_visits() {
        assert_eq!(solve("@D", 1_000, 1), Err(SolverError::NoPath));

        let path = solve("@DS", 1_000, 1).unwrap();
        assert_eq!(
            path.get(),
            &vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(1, 0)
            ]
        );
        assert_eq!(path.visit_count(Position::new(1, 0)), 2);
    }

    #[test]
    fn test_uses_jumps_and_slides() {
        let path = solve("@BG\n.SG\nG<<", 10_000, 3).unwrap();
        let stops: Vec<Position> = path.get().clone();
        assert_eq!(stops.first(), Some(&Position::new(0, 0)));
        assert_eq!(stops.last(), Some(&Position::new(0, 2)));
        assert_eq!(path.visit_count(Position::new(2, 0)), 1);
        assert_eq!(path.visit_count(Position::new(2, 1)), 1);
    }

    #[test]
    fn test_unsolvable_board() {
        // Three dead ends around the start
        assert_eq!(solve("G@G\n.G.", 1_000, 5), Err(SolverError::NoPath));
    }

    #[test]
    fn test_stop_on_ice_once_grass_is_consumed() {
        let path = solve("...@\nGIGG\n.G..", 10_000, 4).unwrap();
        assert_eq!(
            path.get(),
            &vec![
                Position::new(3, 0),
                Position::new(3, 1),
                Position::new(2, 1),
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(1, 2)
            ]
        );
    }

    #[test]
    fn test_iteration_limit_is_not_no_path() {
        assert_eq!(
            solve("GGGGG\nGGGGG\nGG@GG\nGGGGG\nGGGGG", 1, 2),
            Err(SolverError::IterationLimit)
        );
    }

    #[test]
    fn test_same_seed_same_path() {
        let board = "@GGG\nGGGG\nGGGG\nGGGG";
        assert_eq!(solve(board, 50_000, 9), solve(board, 50_000, 9));
    }
}
