/*
visits.rs

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

//! Visit counters over a terrain snapshot.
//!
//! The terrain is never modified. [`Visits`] keeps the number of visits each required tile
//! still needs and presents the tiles the way a live board would show them: consumed tiles
//! become mushrooms, half-visited dirt becomes grass. Backtracking only has to increment a
//! counter back.

use std::collections::{HashMap, HashSet};

use super::reach;
use super::tiles::{Direction, Position, TileType};
use super::traversal::{Conditions, Terrain, Traversal};

/// Remaining visits for every required tile of a terrain.
pub struct Visits<'a, T: ?Sized> {
    terrain: &'a T,
    remaining: HashMap<Position, u8>,

    /// Required positions, in terrain order.
    required: Vec<Position>,

    /// Visits still needed.
    total: usize,

    /// Visits needed at creation time.
    initial: usize,
}

impl<'a, T: Terrain + ?Sized> Visits<'a, T> {
    /// Create a [`Visits`] object with the visits needed by the terrain tiles.
    pub fn new(terrain: &'a T) -> Self {
        let mut remaining: HashMap<Position, u8> = HashMap::new();
        let mut required: Vec<Position> = Vec::new();
        for pos in terrain.positions() {
            let n: u8 = terrain.tile(pos).visits_needed();
            if n > 0 {
                remaining.insert(pos, n);
                required.push(pos);
            }
        }
        let total: usize = remaining.values().map(|n| *n as usize).sum();
        Self {
            terrain,
            remaining,
            required,
            total,
            initial: total,
        }
    }

    /// Record a stop on the given position.
    ///
    /// Return `true` if the stop consumed a visit, `false` for bridges and consumed tiles.
    pub fn visit(&mut self, pos: Position) -> bool {
        match self.remaining.get_mut(&pos) {
            Some(n) if *n > 0 => {
                *n -= 1;
                self.total -= 1;
                true
            }
            _ => false,
        }
    }

    /// Undo a [`Visits::visit`] call that returned `true`.
    pub fn unvisit(&mut self, pos: Position) {
        if let Some(n) = self.remaining.get_mut(&pos) {
            *n += 1;
            self.total += 1;
        }
    }

    /// Visits still needed on the given position.
    pub fn remaining(&self, pos: Position) -> u8 {
        self.remaining.get(&pos).copied().unwrap_or(0)
    }

    /// Visits still needed on the whole terrain.
    pub fn remaining_total(&self) -> usize {
        self.total
    }

    /// Visits made since creation.
    pub fn progress(&self) -> usize {
        self.initial - self.total
    }

    pub fn is_pending(&self, pos: Position) -> bool {
        self.remaining(pos) > 0
    }

    /// Required positions that still need a visit, in terrain order.
    pub fn pending(&self) -> impl Iterator<Item = Position> + '_ {
        self.required.iter().copied().filter(|p| self.is_pending(*p))
    }

    /// Return the first pending tile that the player cannot reach from `from`.
    pub fn first_unreachable<C: Conditions + ?Sized>(
        &self,
        conditions: &C,
        from: Position,
    ) -> Option<Position> {
        if self.total == 0 {
            return None;
        }
        let traversal = Traversal::new(self, conditions);
        let reached: HashSet<Position> = reach::reachable_from(&traversal, from);
        self.pending().find(|p| !reached.contains(p))
    }

    /// Return the first pending tile that no sequence of moves from `from` can reach.
    ///
    /// Pending tiles become obstacles once consumed, which can stop a slide earlier or make a
    /// jump possible, so a tile that [`Visits::first_unreachable`] reports can still become
    /// reachable later. This method takes that into account and can be used to prune a
    /// search.
    pub fn first_lost<C: Conditions + ?Sized>(
        &self,
        conditions: &C,
        from: Position,
    ) -> Option<Position> {
        if self.total == 0 {
            return None;
        }
        let traversal = Traversal::new(self, conditions);
        let reached: HashSet<Position> =
            reach::possibly_reachable_from(&traversal, from, &|p: Position| self.is_pending(p));
        self.pending().find(|p| !reached.contains(p))
    }
}

impl<T: Terrain + ?Sized> Terrain for Visits<'_, T> {
    fn tile(&self, pos: Position) -> TileType {
        let tile: TileType = self.terrain.tile(pos);
        match self.remaining.get(&pos) {
            Some(n) => tile.with_remaining(*n),
            None => tile,
        }
    }

    fn flow(&self, pos: Position) -> Option<Direction> {
        self.terrain.flow(pos)
    }

    fn positions(&self) -> Vec<Position> {
        self.terrain.positions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::grid::Grid;
    use crate::generator::level::Level;
    use crate::generator::traversal::AlwaysOpen;

    #[test]
    fn test_visits_present_live_tiles() {
        let grid: Grid = Level::parse("@DS").unwrap().grid();
        let mut v = Visits::new(&grid);
        assert_eq!(v.remaining_total(), 3);
        assert!(v.visit(Position::new(0, 0)));
        assert!(v.visit(Position::new(1, 0)));
        assert!(!v.visit(Position::new(2, 0)));
        assert_eq!(v.tile(Position::new(0, 0)), TileType::Mushroom);
        assert_eq!(v.tile(Position::new(1, 0)), TileType::Grass);
        assert_eq!(v.tile(Position::new(2, 0)), TileType::Stone);
        assert_eq!(v.progress(), 2);

        v.unvisit(Position::new(1, 0));
        assert_eq!(v.tile(Position::new(1, 0)), TileType::Dirt);
        assert_eq!(v.remaining_total(), 2);
    }

    #[test]
    fn test_consumed_start_blocks_the_way_back() {
        let grid: Grid = Level::parse("G@G").unwrap().grid();
        let mut v = Visits::new(&grid);
        v.visit(Position::new(1, 0));
        assert_eq!(
            v.first_unreachable(&AlwaysOpen, Position::new(1, 0)),
            None,
            "the start can still go either way"
        );
        v.visit(Position::new(2, 0));
        assert_eq!(
            v.first_unreachable(&AlwaysOpen, Position::new(2, 0)),
            None,
            "jumping over the mushroom reaches the left tile"
        );
        let grid: Grid = Level::parse("G@\n.G").unwrap().grid();
        let mut v = Visits::new(&grid);
        v.visit(Position::new(1, 0));
        v.visit(Position::new(1, 1));
        assert_eq!(
            v.first_unreachable(&AlwaysOpen, Position::new(1, 1)),
            Some(Position::new(0, 0))
        );
    }
}
