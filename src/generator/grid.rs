/*
grid.rs

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

//! Dense tile matrix used by live games.
//!
//! A [`Grid`] is a mutable copy of a [`super::level::Level`]: the level stays untouched while
//! the game converts tiles as the player walks.

use std::collections::HashMap;

use super::tiles::{Direction, Position, TileType};
use super::traversal::Terrain;

/// Rectangular tile matrix with water flows.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,

    /// Row-major tiles.
    tiles: Vec<TileType>,

    flows: HashMap<Position, Direction>,
}

impl Grid {
    /// Create a [`Grid`] object filled with void tiles.
    pub fn new(width: i32, height: i32) -> Self {
        let width: i32 = width.max(0);
        let height: i32 = height.max(0);
        Self {
            width,
            height,
            tiles: vec![TileType::Void; (width * height) as usize],
            flows: HashMap::new(),
        }
    }

    /// Create a [`Grid`] object from row-major tiles.
    pub fn from_tiles(
        width: i32,
        height: i32,
        tiles: Vec<TileType>,
        flows: HashMap<Position, Direction>,
    ) -> Self {
        let mut grid: Grid = Grid::new(width, height);
        for (dst, src) in grid.tiles.iter_mut().zip(tiles) {
            *dst = src;
        }
        grid.flows = flows;
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    /// Change the tile at the given position. Positions outside the grid are ignored.
    pub fn set(&mut self, pos: Position, tile: TileType) {
        if let Some(i) = self.index(pos) {
            self.tiles[i] = tile;
        }
    }

    /// Set or clear the flow direction of a water tile.
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

    /// Row-major tiles.
    pub fn tiles(&self) -> &[TileType] {
        &self.tiles
    }

    pub fn flows(&self) -> &HashMap<Position, Direction> {
        &self.flows
    }

    /// Number of visits still required to win.
    pub fn remaining_visits(&self) -> usize {
        self.tiles.iter().map(|t| t.visits_needed() as usize).sum()
    }

    /// Iterate over the matrix, row by row.
    ///
    /// # Example:
    ///
    /// ```
    /// # use sporepath::generator::grid::Grid;
    /// # use sporepath::generator::tiles::TileType;
    /// let grid = Grid::new(2, 2);
    /// for (pos, tile) in grid.iter() {
    ///     assert_eq!(tile, TileType::Void, "{pos}");
    /// }
    /// ```
    pub fn iter(&self) -> GridIterator<'_> {
        GridIterator {
            grid: self,
            x: 0,
            y: 0,
        }
    }
}

impl Terrain for Grid {
    fn tile(&self, pos: Position) -> TileType {
        match self.index(pos) {
            Some(i) => self.tiles[i],
            None => TileType::Void,
        }
    }

    fn flow(&self, pos: Position) -> Option<Direction> {
        self.flows.get(&pos).copied()
    }

    fn positions(&self) -> Vec<Position> {
        self.iter()
            .filter(|(_, t)| *t != TileType::Void)
            .map(|(p, _)| p)
            .collect()
    }
}

/// Iterator for the tile matrix.
pub struct GridIterator<'a> {
    grid: &'a Grid,
    x: i32,
    y: i32,
}

impl Iterator for GridIterator<'_> {
    type Item = (Position, TileType);

    fn next(&mut self) -> Option<Self::Item> {
        if self.grid.width == 0 {
            return None;
        }
        if self.x >= self.grid.width {
            self.x = 0;
            self.y += 1;
        }
        if self.y >= self.grid.height {
            return None;
        }

        let pos: Position = Position::new(self.x, self.y);
        self.x += 1;
        Some((pos, self.grid.tile(pos)))
    }
}
