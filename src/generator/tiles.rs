/*
tiles.rs

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

//! Tiles, positions, and directions of the Sporepath grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::FromRepr;

/// Grid coordinates.
///
/// Coordinates are signed because the shape generator grows footprints in every direction
/// before the level builder rebases them at (0,0).
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a [`Position`] object.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return the adjacent position in the given direction.
    pub fn step(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }

    /// Return the position `distance` tiles away in the given direction.
    pub fn offset(self, direction: Direction, distance: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }

    /// Return the four orthogonal neighbors, in [`Direction::ALL`] order.
    pub fn neighbors(self) -> [Position; 4] {
        Direction::ALL.map(|d| self.step(d))
    }

    /// Manhattan distance between two positions.
    pub fn distance(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Cardinal directions.
///
/// Directions are used for player moves and as the flow direction of water tiles.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit vector of the direction. The y axis points down.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        Self::from_repr((self as u8 + 2) % 4).unwrap_or(self)
    }

    /// The two directions at a right angle.
    pub fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    /// Direction from `from` to the adjacent position `to`.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| from.step(*d) == to)
    }
}

/// Portal colors. Portals are always placed in pairs of the same color.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum PortalType {
    Pink,
    Violet,
    Gold,
}

impl PortalType {
    pub const COUNT: usize = 3;
}

/// Type of a grid tile.
///
/// On live boards the type also encodes visit progress: leaving a `Grass` tile turns it into a
/// `Mushroom`, and leaving a `Dirt` tile turns it into `Grass`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum TileType {
    /// Outside the playable shape.
    #[default]
    Void,
    Grass,
    Dirt,
    /// Permanent bridge, never required.
    Stone,
    Bramble,
    /// Consumed grass.
    Mushroom,
    /// Forces a slide along the tile's flow direction.
    Water,
    /// Forces a slide in the travel direction.
    Ice,
    /// Walkable unless submerged.
    LilyPad,
    DeepPond,
    /// Throws the player up to three tiles ahead.
    BouncePad,
    Honey,
    /// Walkable at low tide.
    TideZone,
    Sea,
    Acorn,
    /// Walkable when the player can feed it an acorn.
    Squirrel,
    Portal(PortalType),
}

impl TileType {
    /// Number of visits a fresh tile of this type requires.
    pub fn visits_needed(self) -> u8 {
        match self {
            TileType::Grass => 1,
            TileType::Dirt => 2,
            _ => 0,
        }
    }

    /// Whether the tile must be consumed to win.
    pub fn is_required(self) -> bool {
        self.visits_needed() > 0
    }

    /// Whether the tile is walkable regardless of any auxiliary state.
    pub fn is_always_walkable(self) -> bool {
        matches!(
            self,
            TileType::Grass
                | TileType::Stone
                | TileType::Water
                | TileType::Dirt
                | TileType::Ice
                | TileType::BouncePad
                | TileType::Honey
                | TileType::Acorn
        )
    }

    /// Whether walkability depends on a [`super::traversal::Conditions`] predicate.
    pub fn is_conditional(self) -> bool {
        matches!(
            self,
            TileType::Portal(_) | TileType::LilyPad | TileType::TideZone | TileType::Squirrel
        )
    }

    /// Whether the tile always blocks entry but can be jumped over.
    pub fn is_obstacle(self) -> bool {
        matches!(
            self,
            TileType::Bramble | TileType::Mushroom | TileType::DeepPond
        )
    }

    /// Whether a closed conditional tile of this type can be jumped over.
    pub fn is_jumpable_when_closed(self) -> bool {
        matches!(self, TileType::LilyPad | TileType::Squirrel)
    }

    /// Tile type left behind when the player walks off the tile.
    pub fn after_visit(self) -> Self {
        match self {
            TileType::Grass => TileType::Mushroom,
            TileType::Dirt => TileType::Grass,
            t => t,
        }
    }

    /// Tile that presents `remaining` visits for a tile that was originally of this type.
    pub fn with_remaining(self, remaining: u8) -> Self {
        match (self, remaining) {
            (TileType::Grass | TileType::Dirt, 0) => TileType::Mushroom,
            (TileType::Dirt, 1) => TileType::Grass,
            (t, _) => t,
        }
    }
}
