/*
path.rs

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

//! Path of the player across the grid.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::tiles::Position;

/// Path object.
///
/// Unlike a graph path, a player path can stop several times on the same tile: dirt tiles are
/// visited twice and bridges can be crossed any number of times.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(from = "Vec<Position>", into = "Vec<Position>")]
pub struct Path {
    /// Path as an ordered list of positions.
    path: Vec<Position>,

    /// Number of stops on each position.
    /// Instead of counting the position in the [`Path::path`] vector, this
    /// [`std::collections::HashMap`] speeds up the lookup.
    visits: HashMap<Position, usize>,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl From<Vec<Position>> for Path {
    fn from(positions: Vec<Position>) -> Self {
        Path::from_positions(&positions)
    }
}

impl From<Path> for Vec<Position> {
    fn from(path: Path) -> Self {
        path.path
    }
}

impl Path {
    /// Create a [`Path`] object.
    pub fn new(capacity: usize) -> Self {
        Self {
            path: Vec::with_capacity(capacity),
            visits: HashMap::with_capacity(capacity),
        }
    }

    /// Create a [`Path`] object from a list of positions.
    pub fn from_positions(positions: &[Position]) -> Self {
        let mut path: Path = Path::new(positions.len());
        for p in positions {
            path.push(*p);
        }
        path
    }

    /// Remove all the positions from the path.
    pub fn clear(&mut self) {
        self.path.clear();
        self.visits.clear();
    }

    /// Add a position to the path.
    pub fn push(&mut self, pos: Position) {
        self.path.push(pos);
        *self.visits.entry(pos).or_insert(0) += 1;
    }

    /// Remove the last position from the path.
    pub fn pop(&mut self) {
        if let Some(p) = self.path.pop()
            && let Some(n) = self.visits.get_mut(&p)
        {
            *n -= 1;
            if *n == 0 {
                self.visits.remove(&p);
            }
        }
    }

    /// Get the number of positions in the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of times the path stops on the given position.
    pub fn visit_count(&self, pos: Position) -> usize {
        self.visits.get(&pos).copied().unwrap_or(0)
    }

    /// Return a reference to the path vector.
    pub fn get(&self) -> &Vec<Position> {
        &self.path
    }

    /// Return the first position in the path.
    pub fn get_first(&self) -> Option<Position> {
        self.path.first().copied()
    }

    /// Return the last position in the path.
    pub fn get_last(&self) -> Option<Position> {
        self.path.last().copied()
    }

    /// Return up to `count` positions following the first one.
    pub fn next_moves(&self, count: usize) -> Vec<Position> {
        self.path.iter().skip(1).take(count).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_counts_follow_push_and_pop() {
        let a = Position::new(0, 0);
        let b = Position::new(1, 0);
        let mut p = Path::from_positions(&[a, b, a]);
        assert_eq!(p.visit_count(a), 2);
        p.pop();
        assert_eq!(p.visit_count(a), 1);
        assert_eq!(p.get_last(), Some(b));
        assert_eq!(p.next_moves(5), vec![b]);
        p.clear();
        assert!(p.is_empty());
        assert_eq!(p.visit_count(b), 0);
    }

    #[test]
    fn test_deserialized_path_counts_visits() {
        let a = Position::new(2, 1);
        let b = Position::new(3, 1);
        let json: String = serde_json::to_string(&Path::from_positions(&[a, b, a])).unwrap();
        let p: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(p.get(), &vec![a, b, a]);
        assert_eq!(p.visit_count(a), 2);
        assert_eq!(p.visit_count(b), 1);
    }
}
