/*
levels.rs

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

//! Properties of generated and predefined levels.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::collections::HashSet;

use sporepath::game::Game;
use sporepath::generator::config::{GeneratorConfig, WorldElement, WorldElements};
use sporepath::generator::fallback::fallback_levels;
use sporepath::generator::grid::Grid;
use sporepath::generator::level::{Level, MIN_REQUIRED_TILES};
use sporepath::generator::level_generator::generate_level;
use sporepath::generator::reach::reachable_from;
use sporepath::generator::tiles::{Position, TileType};
use sporepath::generator::traversal::{AlwaysOpen, Terrain, Traversal};

fn elements(selector: u8) -> WorldElements {
    [
        WorldElement::Rivers,
        WorldElement::Ice,
        WorldElement::Dirt,
        WorldElement::Fairy,
    ]
    .into_iter()
    .enumerate()
    .filter(|(i, _)| selector & (1 << i) != 0)
    .map(|(_, e)| e)
    .collect()
}

/// Check the invariants of a valid level, and replay its solution.
fn check_level(level: &Level) -> Result<(), TestCaseError> {
    let start: Position = level.start();
    prop_assert_eq!(level.tile(start), TileType::Grass);
    prop_assert!(level.required_count() >= MIN_REQUIRED_TILES);

    // Every required tile is reachable before anything is consumed
    let grid: Grid = level.grid();
    let reached: HashSet<Position> = reachable_from(&Traversal::new(&grid, &AlwaysOpen), start);
    for p in grid.positions() {
        if p != start && grid.tile(p).is_required() {
            prop_assert!(reached.contains(&p), "{} unreachable\n{}", p, level.to_ascii());
        }
    }

    // Portals come in pairs
    for color in 0..3u8 {
        let n: usize = grid
            .iter()
            .filter(|(_, t)| matches!(t, TileType::Portal(c) if *c as u8 == color))
            .count();
        prop_assert!(n == 0 || n == 2);
    }

    let mut game: Game = Game::new(level.clone());
    prop_assert!(!game.is_stuck());

    let solution: Vec<Position> = level.solution().map(<[Position]>::to_vec).unwrap_or_default();
    prop_assert_eq!(solution.first(), Some(&start));
    for p in &solution[1..] {
        prop_assert!(game.move_to(*p).is_ok(), "no move to {}\n{}", p, game.to_ascii());
    }
    prop_assert!(game.is_won(), "{}", game.to_ascii());
    Ok(())
}

/// Generate a level, moving on to the next seeds when the generator gives up.
fn generate(seed: u64, selector: u8) -> Option<Level> {
    (0..4).find_map(|i| {
        let mut rng = Pcg64::seed_from_u64(seed.wrapping_add(i));
        generate_level(&GeneratorConfig::default(), &elements(selector), &mut rng)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn generated_levels_are_valid_and_solvable(seed in any::<u64>(), selector in 0_u8..16) {
        let level = generate(seed, selector);
        prop_assert!(level.is_some(), "no level for seed {} and elements {:?}", seed, elements(selector));
        if let Some(level) = level {
            check_level(&level)?;
        }
    }
}

#[test]
fn test_every_element_selection_produces_levels() {
    let config = GeneratorConfig::default();
    for selector in 0..16 {
        let generated: usize = (0..8)
            .filter(|seed| {
                generate_level(&config, &elements(selector), &mut Pcg64::seed_from_u64(*seed))
                    .is_some()
            })
            .count();
        assert!(generated >= 4, "{generated} levels for {:?}", elements(selector));
    }
}

#[test]
fn test_generation_is_reproducible() {
    let config = GeneratorConfig::default();
    for seed in 0..4 {
        let a = generate_level(&config, &WorldElements::all(), &mut Pcg64::seed_from_u64(seed));
        let b = generate_level(&config, &WorldElements::all(), &mut Pcg64::seed_from_u64(seed));
        assert_eq!(a, b);
    }
}

#[test]
fn test_fallback_levels_are_valid_and_solvable() {
    for level in fallback_levels(&mut Pcg64::seed_from_u64(11)) {
        assert_eq!(level.verify(), Ok(()));
        check_level(&level).unwrap();
    }
}
