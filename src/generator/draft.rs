/*
draft.rs

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

//! Work-in-progress level used during generation.
//!
//! A [`Draft`] maps the footprint positions to their tile types. Positions are not rebased yet
//! and can be negative; cells outside the footprint are void.

use std::collections::BTreeMap;

use super::grid::Grid;
use super::level::Room;
use super::shape::Shape;
use super::tiles::{Direction, Position, TileType};
use super::traversal::Terrain;

/// Sparse level under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    tiles: BTreeMap<Position, TileType>,
    flows: BTreeMap<Position, Direction>,

    /// Source rectangles of the shape. Metadata only.
    pub rooms: Vec<Room>,
}

impl Draft {
    /// Create a [`Draft`] object where every footprint cell is grass.
    pub fn from_shape(shape: &Shape) -> Self {
        Self {
            tiles: shape.cells.iter().map(|p| (*p, TileType::Grass)).collect(),
            flows: BTreeMap::new(),
            rooms: shape.rects.clone(),
        }
    }

    /// Create a [`Draft`] object from the non-void tiles of a grid.
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            tiles: grid.iter().filter(|(_, t)| *t != TileType::Void).collect(),
            flows: grid.flows().iter().map(|(p, d)| (*p, *d)).collect(),
            rooms: Vec::new(),
        }
    }

    /// Whether the position belongs to the footprint.
    pub fn contains(&self, pos: Position) -> bool {
        self.tiles.contains_key(&pos)
    }

    /// Change the type of a footprint tile. Positions outside the footprint are ignored.
    pub fn set(&mut self, pos: Position, tile: TileType) {
        if let Some(t) = self.tiles.get_mut(&pos) {
            *t = tile;
        }
    }

    pub fn set_flow(&mut self, pos: Position, flow: Option<Direction>) {
        match flow {
            Some(d) => {
                self.flows.insert(pos, d);
            }
            None => {
                self.flows.remove(&pos);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Footprint tiles, ordered by position.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, TileType)> + '_ {
        self.tiles.iter().map(|(p, t)| (*p, *t))
    }

    pub fn flows(&self) -> &BTreeMap<Position, Direction> {
        &self.flows
    }

    /// Positions of the tiles of the given type, ordered by position.
    pub fn positions_of(&self, tile: TileType) -> Vec<Position> {
        self.tiles
            .iter()
            .filter(|(_, t)| **t == tile)
            .map(|(p, _)| *p)
            .collect()
    }

    /// Number of required tiles.
    pub fn required_count(&self) -> usize {
        self.tiles.values().filter(|t| t.is_required()).count()
    }

    /// Smallest and largest coordinates of the footprint.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut it = self.tiles.keys();
        let first: Position = *it.next()?;
        let (mut min, mut max) = (first, first);
        for p in it {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((min, max))
    }
}

impl Terrain for Draft {
    fn tile(&self, pos: Position) -> TileType {
        self.tiles.get(&pos).copied().unwrap_or_default()
    }

    fn flow(&self, pos: Position) -> Option<Direction> {
        self.flows.get(&pos).copied()
    }

    fn positions(&self) -> Vec<Position> {
        self.tiles
            .iter()
            .filter(|(_, t)| **t != TileType::Void)
            .map(|(p, _)| *p)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_set_outside_footprint_is_ignored() {
        let shape = Shape {
            cells: BTreeSet::from([Position::new(-1, 2), Position::new(0, 2)]),
            rects: Vec::new(),
        };
        let mut d = Draft::from_shape(&shape);
        d.set(Position::new(4, 4), TileType::Stone);
        assert_eq!(d.len(), 2);
        assert_eq!(d.tile(Position::new(4, 4)), TileType::Void);
        assert_eq!(d.required_count(), 2);
        assert_eq!(
            d.bounds(),
            Some((Position::new(-1, 2), Position::new(0, 2)))
        );
    }
}
