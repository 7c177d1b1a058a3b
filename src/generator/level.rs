/*
level.rs

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

//! Generated levels.
//!
//! A [`Level`] is produced once by [`build_level`] and never modified afterward. Games play on
//! a [`Grid`] copy obtained with [`Level::grid`].

use log::{Level as LogLevel, debug, log_enabled};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::draft::Draft;
use super::grid::Grid;
use super::path::Path;
use super::tiles::{Direction, Position, TileType};
use super::traversal::{AlwaysOpen, Terrain};
use super::visits::Visits;

/// Smallest number of required tiles in a valid level.
pub const MIN_REQUIRED_TILES: usize = 8;

/// Rectangle of the shape a level was generated from.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    /// Positions covered by the rectangle.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| Position::new(x, y)))
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Whether at least `margin` tiles separate the two rectangles.
    pub fn is_separated_from(&self, other: &Room, margin: i32) -> bool {
        self.x + self.width + margin <= other.x
            || other.x + other.width + margin <= self.x
            || self.y + self.height + margin <= other.y
            || other.y + other.height + margin <= self.y
    }

    fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Reasons for rejecting a candidate level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The footprint has no tile.
    Empty,

    /// The start tile is not grass.
    StartNotGrass,

    /// Not enough required tiles.
    TooFewRequired(usize),

    /// A required tile cannot be reached from the start.
    Unreachable(Position),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildError::Empty => write!(f, "the level is empty"),
            BuildError::StartNotGrass => write!(f, "the start tile is not grass"),
            BuildError::TooFewRequired(n) => write!(
                f,
                "{n} required tiles (at least {MIN_REQUIRED_TILES} are needed)"
            ),
            BuildError::Unreachable(p) => write!(f, "tile {p} cannot be reached from the start"),
        }
    }
}

/// Key of the flow map for the given position.
pub fn flow_key(pos: Position) -> String {
    format!("{},{}", pos.x, pos.y)
}

/// Position for a flow map key.
pub fn parse_flow_key(key: &str) -> Option<Position> {
    let (x, y) = key.split_once(',')?;
    Some(Position::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// A playable level.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Level {
    width: i32,
    height: i32,

    /// Row-major tiles.
    tiles: Vec<TileType>,

    start: Position,

    /// Rectangles of the generated shape. Metadata only.
    #[serde(default)]
    rooms: Vec<Room>,

    /// Water flow directions, indexed by `"x,y"` keys.
    #[serde(default)]
    flows: BTreeMap<String, Direction>,

    /// Known solution, starting at [`Level::start`].
    #[serde(default)]
    solution: Option<Vec<Position>>,
}

impl Level {
    pub(super) fn from_parts(
        width: i32,
        height: i32,
        tiles: Vec<TileType>,
        start: Position,
        flows: BTreeMap<String, Direction>,
    ) -> Self {
        Self {
            width,
            height,
            tiles,
            start,
            rooms: Vec::new(),
            flows,
            solution: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn solution(&self) -> Option<&[Position]> {
        self.solution.as_deref()
    }

    /// Attach a solution that uses the level coordinates.
    pub fn with_solution(mut self, solution: &Path) -> Self {
        self.solution = Some(solution.get().clone());
        self
    }

    pub fn flows(&self) -> &BTreeMap<String, Direction> {
        &self.flows
    }

    /// Tile at the given position. Positions outside the level are void.
    pub fn tile(&self, pos: Position) -> TileType {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return TileType::Void;
        }
        self.tiles
            .get((pos.y * self.width + pos.x) as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Return a mutable copy of the level for playing.
    pub fn grid(&self) -> Grid {
        let flows: HashMap<Position, Direction> = self
            .flows
            .iter()
            .filter_map(|(k, d)| parse_flow_key(k).map(|p| (p, *d)))
            .collect();
        Grid::from_tiles(self.width, self.height, self.tiles.clone(), flows)
    }

    pub fn required_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_required()).count()
    }

    /// Number of visits needed to win.
    pub fn required_visits(&self) -> usize {
        self.tiles.iter().map(|t| t.visits_needed() as usize).sum()
    }

    /// Verify the level invariants.
    ///
    /// # Errors
    ///
    /// The start must be grass, the level must have enough required tiles, and all of them
    /// must be reachable from the start once the player has left it.
    pub fn verify(&self) -> Result<(), BuildError> {
        if self.tiles.is_empty() {
            return Err(BuildError::Empty);
        }
        if self.tile(self.start) != TileType::Grass {
            return Err(BuildError::StartNotGrass);
        }
        let count: usize = self.required_count();
        if count < MIN_REQUIRED_TILES {
            return Err(BuildError::TooFewRequired(count));
        }

        let grid: Grid = self.grid();
        let mut visits: Visits<Grid> = Visits::new(&grid);
        visits.visit(self.start);
        match visits.first_unreachable(&AlwaysOpen, self.start) {
            Some(p) => Err(BuildError::Unreachable(p)),
            None => Ok(()),
        }
    }
}

/// Rasterize a draft into a level whose coordinates start at (0,0), and verify it.
///
/// `start` and `solution` use the draft coordinates.
///
/// # Errors
///
/// The method returns an error when the level does not pass [`Level::verify`]. The caller is
/// expected to generate another candidate.
pub fn build_level(
    draft: &Draft,
    start: Position,
    solution: Option<&Path>,
) -> Result<Level, BuildError> {
    let (min, max) = draft.bounds().ok_or(BuildError::Empty)?;
    let width: i32 = max.x - min.x + 1;
    let height: i32 = max.y - min.y + 1;
    let rebase = |p: Position| Position::new(p.x - min.x, p.y - min.y);

    let mut tiles: Vec<TileType> = vec![TileType::Void; (width * height) as usize];
    for (p, t) in draft.tiles() {
        let q: Position = rebase(p);
        tiles[(q.y * width + q.x) as usize] = t;
    }

    let level: Level = Level {
        width,
        height,
        tiles,
        start: rebase(start),
        rooms: draft
            .rooms
            .iter()
            .map(|r| r.translated(-min.x, -min.y))
            .collect(),
        flows: draft
            .flows()
            .iter()
            .map(|(p, d)| (flow_key(rebase(*p)), *d))
            .collect(),
        solution: solution.map(|s| s.get().iter().map(|p| rebase(*p)).collect()),
    };

    if log_enabled!(LogLevel::Debug) {
        debug!("Level {width}x{height}, start {}", level.start);
        for row in level.to_ascii().lines() {
            debug!("    {row}");
        }
    }

    level.verify()?;
    Ok(level)
}

impl Terrain for Level {
    fn tile(&self, pos: Position) -> TileType {
        Level::tile(self, pos)
    }

    fn flow(&self, pos: Position) -> Option<Direction> {
        self.flows.get(&flow_key(pos)).copied()
    }

    fn positions(&self) -> Vec<Position> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Position::new(x, y)))
            .filter(|p| Level::tile(self, *p) != TileType::Void)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::shape::Shape;
    use std::collections::BTreeSet;

    fn draft_from_rect(x: i32, y: i32, width: i32, height: i32) -> Draft {
        let room = Room {
            x,
            y,
            width,
            height,
        };
        Draft::from_shape(&Shape {
            cells: room.cells().collect::<BTreeSet<_>>(),
            rects: vec![room],
        })
    }

    #[test]
    fn test_build_rebases_coordinates() {
        let mut draft = draft_from_rect(-3, 5, 4, 3);
        let water = Position::new(-2, 6);
        draft.set(water, TileType::Water);
        draft.set_flow(water, Some(Direction::Right));
        draft.set(Position::new(-1, 6), TileType::Stone);

        let mut path = Path::new(2);
        path.push(Position::new(-3, 5));
        path.push(Position::new(-2, 5));
        let level = build_level(&draft, Position::new(-3, 5), Some(&path)).unwrap();

        assert_eq!((level.width(), level.height()), (4, 3));
        assert_eq!(level.start(), Position::new(0, 0));
        assert_eq!(
            level.rooms(),
            &[Room {
                x: 0,
                y: 0,
                width: 4,
                height: 3
            }]
        );
        assert_eq!(level.flows().get("1,1"), Some(&Direction::Right));
        assert_eq!(level.tile(Position::new(2, 1)), TileType::Stone);
        assert_eq!(
            level.solution(),
            Some(&[Position::new(0, 0), Position::new(1, 0)][..])
        );
        assert_eq!(level.grid().flow(Position::new(1, 1)), Some(Direction::Right));
    }

    #[test]
    fn test_non_footprint_cells_are_void() {
        let mut draft = draft_from_rect(0, 0, 3, 3);
        draft.set(Position::new(1, 1), TileType::Void);
        let level = build_level(&draft, Position::new(0, 0), None).unwrap();
        assert_eq!(level.tile(Position::new(1, 1)), TileType::Void);
        assert_eq!(level.required_count(), 8);
    }

    #[test]
    fn test_verify_rejects_bad_candidates() {
        let draft = draft_from_rect(0, 0, 3, 2);
        assert_eq!(
            build_level(&draft, Position::new(0, 0), None),
            Err(BuildError::TooFewRequired(6))
        );

        let mut draft = draft_from_rect(0, 0, 5, 2);
        draft.set(Position::new(0, 0), TileType::Stone);
        assert_eq!(
            build_level(&draft, Position::new(0, 0), None),
            Err(BuildError::StartNotGrass)
        );

        assert_eq!(
            build_level(&Draft::default(), Position::new(0, 0), None),
            Err(BuildError::Empty)
        );
    }

    #[test]
    fn test_verify_detects_unreachable_tiles() {
        let level = Level::parse("@GGGG..\n....BGG\nGGG....").unwrap();
        assert_eq!(level.verify(), Err(BuildError::Unreachable(Position::new(5, 1))));
    }

    #[test]
    fn test_flow_keys() {
        assert_eq!(flow_key(Position::new(3, 12)), "3,12");
        assert_eq!(parse_flow_key("3,12"), Some(Position::new(3, 12)));
        assert_eq!(parse_flow_key("3;12"), None);
        assert_eq!(parse_flow_key("a,1"), None);
    }

    #[test]
    fn test_serde_keeps_level() {
        let level = Level::parse("@>S\nGGD\nGGG").unwrap();
        let json = serde_json::to_string(&level).unwrap();
        let back: Level = serde_json::from_str(&json).unwrap();
        assert_eq!(back, level);
    }
}
