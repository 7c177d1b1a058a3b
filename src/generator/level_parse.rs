/*
level_parse.rs

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

//! Parse and print an "ASCII art" representation of a level.
//!
//! Each character is a tile:
//!
//! ```text
//! .  void            G  grass          @  grass, start position
//! D  dirt            S  stone          B  bramble
//! M  mushroom        I  ice            W  water without flow
//! >  water, flowing right    <  left   ^  up    v  down
//! L  lily pad        O  deep pond      J  bounce pad
//! H  honey           T  tide zone      ~  sea
//! A  acorn           Q  squirrel       1 2 3  pink, violet, gold portals
//! ```
//!
//! Leading and trailing spaces and empty lines are ignored. Short rows are padded with void.

use log::{Level as LogLevel, debug, log_enabled};
use std::collections::BTreeMap;
use std::fmt;

use super::level::{Level, flow_key};
use super::tiles::{Direction, PortalType, Position, TileType};
use super::traversal::Terrain;

/// Parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No tile in the source.
    Empty,

    /// No `@` start marker.
    MissingStart,

    /// More than one `@` start marker.
    DuplicateStart(Position),

    /// Unknown tile character.
    UnknownTile { c: char, pos: Position },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "the level is empty"),
            ParseError::MissingStart => write!(f, "the level has no start position (@)"),
            ParseError::DuplicateStart(p) => write!(f, "second start position at {p}"),
            ParseError::UnknownTile { c, pos } => write!(f, "unknown tile '{c}' at {pos}"),
        }
    }
}

/// Tile and water flow for the given character.
fn char_to_tile(c: char) -> Option<(TileType, Option<Direction>)> {
    let tile: TileType = match c {
        '.' => TileType::Void,
        'G' | '@' => TileType::Grass,
        'D' => TileType::Dirt,
        'S' => TileType::Stone,
        'B' => TileType::Bramble,
        'M' => TileType::Mushroom,
        'I' => TileType::Ice,
        'W' => TileType::Water,
        '>' => return Some((TileType::Water, Some(Direction::Right))),
        '<' => return Some((TileType::Water, Some(Direction::Left))),
        '^' => return Some((TileType::Water, Some(Direction::Up))),
        'v' => return Some((TileType::Water, Some(Direction::Down))),
        'L' => TileType::LilyPad,
        'O' => TileType::DeepPond,
        'J' => TileType::BouncePad,
        'H' => TileType::Honey,
        'T' => TileType::TideZone,
        '~' => TileType::Sea,
        'A' => TileType::Acorn,
        'Q' => TileType::Squirrel,
        '1'..='3' => TileType::Portal(PortalType::from_repr(c as u8 - b'1')?),
        _ => return None,
    };
    Some((tile, None))
}

/// Character for the given tile and water flow.
fn tile_to_char(tile: TileType, flow: Option<Direction>) -> char {
    match tile {
        TileType::Void => '.',
        TileType::Grass => 'G',
        TileType::Dirt => 'D',
        TileType::Stone => 'S',
        TileType::Bramble => 'B',
        TileType::Mushroom => 'M',
        TileType::Ice => 'I',
        TileType::Water => match flow {
            None => 'W',
            Some(Direction::Right) => '>',
            Some(Direction::Left) => '<',
            Some(Direction::Up) => '^',
            Some(Direction::Down) => 'v',
        },
        TileType::LilyPad => 'L',
        TileType::DeepPond => 'O',
        TileType::BouncePad => 'J',
        TileType::Honey => 'H',
        TileType::TideZone => 'T',
        TileType::Sea => '~',
        TileType::Acorn => 'A',
        TileType::Squirrel => 'Q',
        TileType::Portal(color) => (b'1' + color as u8) as char,
    }
}

/// Print any terrain, marking the player position with `@`.
pub fn terrain_to_ascii<T: Terrain + ?Sized>(
    terrain: &T,
    width: i32,
    height: i32,
    player: Option<Position>,
) -> String {
    let mut s: String = String::with_capacity(((width + 1) * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let pos: Position = Position::new(x, y);
            if Some(pos) == player {
                s.push('@');
            } else {
                s.push(tile_to_char(terrain.tile(pos), terrain.flow(pos)));
            }
        }
        s.push('\n');
    }
    s
}

impl Level {
    /// Parse the "ASCII art" representation of a level.
    ///
    /// Parsed levels are not verified: small boards are useful for testing. Use
    /// [`Level::verify`] before playing a parsed level.
    ///
    /// # Errors
    ///
    /// The method returns an error for unknown characters, and when the start marker is
    /// missing or duplicated.
    pub fn parse(source: &str) -> Result<Level, ParseError> {
        let rows: Vec<Vec<char>> = source
            .lines()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(|r| r.chars().collect())
            .collect();
        let width: usize = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height: usize = rows.len();
        if width == 0 {
            return Err(ParseError::Empty);
        }

        let mut tiles: Vec<TileType> = vec![TileType::Void; width * height];
        let mut flows: BTreeMap<String, Direction> = BTreeMap::new();
        let mut start: Option<Position> = None;

        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.iter().enumerate() {
                let pos: Position = Position::new(x as i32, y as i32);
                let Some((tile, flow)) = char_to_tile(*c) else {
                    return Err(ParseError::UnknownTile { c: *c, pos });
                };
                if *c == '@' {
                    if start.is_some() {
                        return Err(ParseError::DuplicateStart(pos));
                    }
                    start = Some(pos);
                }
                tiles[y * width + x] = tile;
                if let Some(d) = flow {
                    flows.insert(flow_key(pos), d);
                }
            }
        }

        let level: Level = Level::from_parts(
            width as i32,
            height as i32,
            tiles,
            start.ok_or(ParseError::MissingStart)?,
            flows,
        );
        if log_enabled!(LogLevel::Debug) {
            debug!(
                "Parsed level {width}x{height} with {} required tiles",
                level.required_count()
            );
        }
        Ok(level)
    }

    /// Return the "ASCII art" representation of the level.
    pub fn to_ascii(&self) -> String {
        let start: Option<Position> = if self.tile(self.start()) == TileType::Grass {
            Some(self.start())
        } else {
            None
        };
        terrain_to_ascii(self, self.width(), self.height(), start)
    }
}
