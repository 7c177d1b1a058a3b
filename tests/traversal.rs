/*
traversal.rs

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

//! Properties of the movement rules on random boards.

use proptest::prelude::*;

use sporepath::generator::grid::Grid;
use sporepath::generator::level::Level;
use sporepath::generator::tiles::{Direction, Position};
use sporepath::generator::traversal::{AlwaysOpen, ConditionState, Traversal};

const TILE_CHARS: &[char] = &[
    'G', 'G', 'G', 'D', 'S', 'B', 'M', 'I', 'W', '>', '<', '^', 'v', 'L', 'O', 'J', 'H', 'T',
    '~', 'A', 'Q', '1', '2', '.',
];

fn board() -> impl Strategy<Value = String> {
    (2_usize..6, 2_usize..6)
        .prop_flat_map(|(w, h)| prop::collection::vec(prop::sample::select(TILE_CHARS), w * h)
            .prop_map(move |tiles| {
                let mut s = String::from("@");
                for (i, c) in tiles.iter().enumerate().skip(1) {
                    if i % w == 0 {
                        s.push('\n');
                    }
                    s.push(*c);
                }
                s
            }))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn moves_are_deterministic_and_leave_the_start(ascii in board()) {
        let grid: Grid = Level::parse(&ascii).unwrap().grid();
        let open = Traversal::new(&grid, &AlwaysOpen);
        let state = ConditionState { high_tide: true, ..ConditionState::default() };
        let live = Traversal::new(&grid, &state);

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let from = Position::new(x, y);
                for d in Direction::ALL {
                    let m = open.step(from, d);
                    prop_assert_eq!(m, open.step(from, d));
                    if let Some(m) = m {
                        prop_assert_ne!(m.destination, from);
                        prop_assert!(open.is_walkable(m.destination));
                    }
                    if let Some(m) = live.step(from, d) {
                        prop_assert!(live.is_walkable(m.destination));
                    }
                }
                let dests = open.destinations(from);
                let mut unique = dests.clone();
                unique.sort();
                unique.dedup();
                prop_assert_eq!(dests.len(), unique.len());
            }
        }
    }
}
