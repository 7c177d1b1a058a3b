/*
reach.rs

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

//! Breadth-first reachability over the movement rules.

use std::collections::{HashMap, HashSet, VecDeque};

use super::tiles::Position;
use super::traversal::{Conditions, Terrain, Traversal};

/// Return every position the player can stop on, starting from `from`.
///
/// `from` itself is part of the result only if the player can come back to it.
pub fn reachable_from<T, C>(traversal: &Traversal<'_, T, C>, from: Position) -> HashSet<Position>
where
    T: Terrain + ?Sized,
    C: Conditions + ?Sized,
{
    let mut reached: HashSet<Position> = HashSet::new();
    let mut queue: VecDeque<Position> = VecDeque::new();

    queue.push_back(from);
    while let Some(pos) = queue.pop_front() {
        for next in traversal.destinations(pos) {
            if reached.insert(next) {
                queue.push_back(next);
            }
        }
    }
    reached
}

/// Return every position the player might stop on, starting from `from`, when the tiles for
/// which `fading` returns `true` can turn into obstacles along the way.
///
/// The result is a superset of what [`reachable_from`] returns for any of those future
/// terrains, so a tile missing from it can never be reached.
pub fn possibly_reachable_from<T, C, F>(
    traversal: &Traversal<'_, T, C>,
    from: Position,
    fading: &F,
) -> HashSet<Position>
where
    T: Terrain + ?Sized,
    C: Conditions + ?Sized,
    F: Fn(Position) -> bool + ?Sized,
{
    let mut reached: HashSet<Position> = HashSet::new();
    let mut queue: VecDeque<Position> = VecDeque::new();

    queue.push_back(from);
    while let Some(pos) = queue.pop_front() {
        for next in traversal.possible_destinations(pos, fading) {
            if reached.insert(next) {
                queue.push_back(next);
            }
        }
    }
    reached
}

/// Whether every required tile can reach every other required tile.
///
/// A forward search from the first required tile must cover all required tiles, and so must a
/// search over the reversed move graph. Slides are one-way, so both directions are checked.
pub fn is_connected<T, C>(traversal: &Traversal<'_, T, C>) -> bool
where
    T: Terrain + ?Sized,
    C: Conditions + ?Sized,
{
    let terrain: &T = traversal.terrain();
    let positions: Vec<Position> = terrain.positions();
    let required: Vec<Position> = positions
        .iter()
        .filter(|p| terrain.tile(**p).is_required())
        .copied()
        .collect();
    let Some(root) = required.first().copied() else {
        return true;
    };

    let mut forward: HashSet<Position> = reachable_from(traversal, root);
    forward.insert(root);
    if !required.iter().all(|p| forward.contains(p)) {
        return false;
    }

    let mut reverse: HashMap<Position, Vec<Position>> = HashMap::new();
    for pos in positions.iter().filter(|p| traversal.is_walkable(**p)) {
        for dest in traversal.destinations(*pos) {
            reverse.entry(dest).or_default().push(*pos);
        }
    }

    let mut backward: HashSet<Position> = HashSet::from([root]);
    let mut queue: VecDeque<Position> = VecDeque::from([root]);
    while let Some(pos) = queue.pop_front() {
        if let Some(sources) = reverse.get(&pos) {
            for src in sources {
                if backward.insert(*src) {
                    queue.push_back(*src);
                }
            }
        }
    }
    required.iter().all(|p| backward.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::grid::Grid;
    use crate::generator::level::Level;
    use crate::generator::traversal::AlwaysOpen;

    fn grid(ascii: &str) -> Grid {
        Level::parse(ascii).expect("valid level").grid()
    }

    #[test]
    fn test_reachable_excludes_start_unless_revisited() {
        let g = grid("@G");
        let t = Traversal::new(&g, &AlwaysOpen);
        let r = reachable_from(&t, Position::new(0, 0));
        assert!(r.contains(&Position::new(1, 0)));
        assert!(r.contains(&Position::new(0, 0)));

        let g = grid("@.G");
        let t = Traversal::new(&g, &AlwaysOpen);
        assert!(reachable_from(&t, Position::new(0, 0)).is_empty());
    }

    #[test]
    fn test_connected_through_jump() {
        let g = grid("@BG\nGBG");
        assert!(is_connected(&Traversal::new(&g, &AlwaysOpen)));
    }

    #[test]
    fn test_isolated_tiles_break_connectivity() {
        let g = grid("@GGGG..\n....BGG");
        assert!(!is_connected(&Traversal::new(&g, &AlwaysOpen)));
    }

    #[test]
    fn test_one_way_river_is_not_connected() {
        // The river carries the player to the right but nothing brings them back.
        let g = grid("@>S.\n...G");
        assert!(!is_connected(&Traversal::new(&g, &AlwaysOpen)));
        let g = grid("@>SG");
        assert!(!is_connected(&Traversal::new(&g, &AlwaysOpen)));
        let g = grid("@>SG\nGGGG");
        assert!(is_connected(&Traversal::new(&g, &AlwaysOpen)));
    }
}
