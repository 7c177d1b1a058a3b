/*
fallback.rs

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

//! Predefined levels.
//!
//! They are used when the generator cannot produce a level. Each one is solvable; the solution
//! is computed when the level is loaded.

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::grid::Grid;
use super::level::Level;
use super::solver::Solver;
use super::traversal::AlwaysOpen;

// Enough for the small boards below.
const FALLBACK_ITERATIONS: usize = 100_000;

/// Predefined levels, in the [`Level::parse`] format.
pub const FALLBACK_LEVELS: [&str; 5] = [
    // Snake around a bramble wall
    "
    @GGG
    BBBG
    GGGG
    ",
    // Dirt in the corner: come back to it over the consumed grass
    "
    @GGD
    GSBG
    GGGG
    ",
    // A short river down to a stone
    "
    @GG>S
    GGGGG
    ",
    // Ice shortcut through the middle row
    "
    GGGG
    @IIG
    GGGG
    ",
    // Pink portals between the two halves
    "
    @GG.GG1
    .1G.GGG
    ",
];

/// Parse a predefined level and attach a solution.
fn load<R: Rng + ?Sized>(source: &str, rng: &mut R) -> Option<Level> {
    let level: Level = Level::parse(source).ok()?;
    let grid: Grid = level.grid();
    let mut solver = Solver::new(&grid, &AlwaysOpen, FALLBACK_ITERATIONS);
    match solver.solve(level.start(), rng) {
        Ok(path) => Some(level.with_solution(&path)),
        Err(e) => {
            debug!("Predefined level without solution: {e}");
            Some(level)
        }
    }
}

/// Return all the predefined levels.
pub fn fallback_levels<R: Rng + ?Sized>(rng: &mut R) -> Vec<Level> {
    FALLBACK_LEVELS.iter().filter_map(|s| load(s, rng)).collect()
}

/// Return a random predefined level.
pub fn fallback_level<R: Rng + ?Sized>(rng: &mut R) -> Option<Level> {
    let source: &str = FALLBACK_LEVELS.choose(rng)?;
    load(source, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::path::Path;
    use crate::generator::tiles::{Position, TileType};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_fallback_levels_are_valid() {
        let levels = fallback_levels(&mut Pcg64::seed_from_u64(0));
        assert_eq!(levels.len(), FALLBACK_LEVELS.len());
        for level in levels {
            assert_eq!(level.verify(), Ok(()), "{}", level.to_ascii());
            let solution = level.solution().expect("solvable");
            assert_eq!(solution.first(), Some(&level.start()));
        }
    }

    #[test]
    fn test_dirt_level_solution() {
        let level = load(FALLBACK_LEVELS[1], &mut Pcg64::seed_from_u64(0)).unwrap();
        let dirt = Position::new(3, 0);
        assert_eq!(level.tile(dirt), TileType::Dirt);
        let path = Path::from_positions(level.solution().unwrap());
        assert_eq!(path.visit_count(dirt), 2);
    }

    #[test]
    fn test_random_fallback() {
        let mut rng = Pcg64::seed_from_u64(8);
        for _ in 0..10 {
            assert!(fallback_level(&mut rng).is_some());
        }
    }
}
