/*
shape.rs

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

//! Generate the footprint of a level.
//!
//! Two strategies are available:
//!
//! * Overlapping rectangles: every new rectangle is anchored on a cell that is already part of
//!   the shape, so the shape is connected by construction.
//! * Rooms and corridors: a few separated rooms, each one joined to the next by a one-tile wide
//!   L-shaped corridor.

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::BTreeSet;

use super::config::GeneratorConfig;
use super::level::Room;
use super::tiles::Position;

// Attempts per requested rectangle or room before accepting a smaller shape.
const ATTEMPTS_PER_RECT: usize = 10;

/// Shape generation strategies.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShapeStrategy {
    Rectangles,
    Rooms,
}

/// Footprint of a level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    /// Cells of the playable area.
    pub cells: BTreeSet<Position>,

    /// Rectangles the shape was built from. Metadata only.
    pub rects: Vec<Room>,
}

impl Shape {
    fn add_rect(&mut self, rect: Room) {
        self.cells.extend(rect.cells());
        self.rects.push(rect);
    }

    /// Width and height of the bounding box of the shape extended with the given rectangle.
    fn extent_with(&self, rect: &Room) -> (i32, i32) {
        let mut min: Position = Position::new(rect.x, rect.y);
        let mut max: Position = Position::new(rect.x + rect.width - 1, rect.y + rect.height - 1);
        for p in &self.cells {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (max.x - min.x + 1, max.y - min.y + 1)
    }
}

/// Generate a shape with a randomly selected strategy.
pub fn generate_shape<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Shape {
    let strategy: ShapeStrategy = if rng.random_bool(config.room_chance.clamp(0.0, 1.0)) {
        ShapeStrategy::Rooms
    } else {
        ShapeStrategy::Rectangles
    };
    generate_shape_with(strategy, config, rng)
}

/// Generate a shape with the given strategy.
pub fn generate_shape_with<R: Rng + ?Sized>(
    strategy: ShapeStrategy,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Shape {
    let shape: Shape = match strategy {
        ShapeStrategy::Rectangles => overlapping_rectangles(config, rng),
        ShapeStrategy::Rooms => rooms_and_corridors(config, rng),
    };
    debug!(
        "Shape {strategy:?}: {} cells from {} rectangles",
        shape.cells.len(),
        shape.rects.len()
    );
    shape
}

/// Random value between the two bounds, whatever their order.
fn sample<R: Rng + ?Sized>(rng: &mut R, a: i32, b: i32) -> i32 {
    let lo: i32 = a.min(b).max(1);
    let hi: i32 = a.max(b).max(1);
    rng.random_range(lo..=hi)
}

fn overlapping_rectangles<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Shape {
    let count: usize = sample(rng, config.min_rects as i32, config.max_rects as i32) as usize;
    let mut shape: Shape = Shape::default();

    shape.add_rect(Room {
        x: 0,
        y: 0,
        width: sample(rng, config.min_rect_size, config.max_rect_size),
        height: sample(rng, config.min_rect_size, config.max_rect_size),
    });

    let mut attempts: usize = 0;
    while shape.rects.len() < count && attempts < count * ATTEMPTS_PER_RECT {
        attempts += 1;

        let cells: Vec<Position> = shape.cells.iter().copied().collect();
        let Some(anchor) = cells.choose(rng).copied() else {
            break;
        };
        let width: i32 = sample(rng, config.min_rect_size, config.max_rect_size);
        let height: i32 = sample(rng, config.min_rect_size, config.max_rect_size);
        let rect: Room = Room {
            x: anchor.x - rng.random_range(0..width),
            y: anchor.y - rng.random_range(0..height),
            width,
            height,
        };

        let (w, h) = shape.extent_with(&rect);
        if w > config.max_extent || h > config.max_extent {
            debug!("    Rectangle {rect:?} rejected: extent {w}x{h}");
            continue;
        }
        shape.add_rect(rect);
    }
    shape
}

fn rooms_and_corridors<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Shape {
    let target: usize = rng.random_range(2..=3);
    let mut rooms: Vec<Room> = Vec::with_capacity(target);

    let mut attempts: usize = 0;
    while rooms.len() < target && attempts < target * ATTEMPTS_PER_RECT {
        attempts += 1;

        let width: i32 = sample(rng, config.min_room_size, config.max_room_size);
        let height: i32 = sample(rng, config.min_room_size, config.max_room_size);
        let room: Room = Room {
            x: rng.random_range(0..=(config.room_area - width).max(0)),
            y: rng.random_range(0..=(config.room_area - height).max(0)),
            width,
            height,
        };
        if rooms
            .iter()
            .all(|r| r.is_separated_from(&room, config.room_margin))
        {
            rooms.push(room);
        } else {
            debug!("    Room {room:?} rejected: too close");
        }
    }

    let mut shape: Shape = Shape::default();
    for room in &rooms {
        shape.add_rect(*room);
    }
    for pair in rooms.windows(2) {
        let horizontal_first: bool = rng.random_bool(0.5);
        shape.cells.extend(corridor(
            pair[0].center(),
            pair[1].center(),
            horizontal_first,
        ));
    }
    shape
}

/// Cells of an L-shaped corridor between two positions.
fn corridor(from: Position, to: Position, horizontal_first: bool) -> Vec<Position> {
    let corner: Position = if horizontal_first {
        Position::new(to.x, from.y)
    } else {
        Position::new(from.x, to.y)
    };
    let mut cells: Vec<Position> = Vec::new();
    for (a, b) in [(from, corner), (corner, to)] {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                cells.push(Position::new(x, y));
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::collections::VecDeque;

    fn is_connected(cells: &BTreeSet<Position>) -> bool {
        let Some(first) = cells.first().copied() else {
            return true;
        };
        let mut seen = BTreeSet::from([first]);
        let mut queue = VecDeque::from([first]);
        while let Some(p) = queue.pop_front() {
            for n in p.neighbors() {
                if cells.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len() == cells.len()
    }

    #[test]
    fn test_rectangles_are_connected_and_bounded() {
        let config = GeneratorConfig::default();
        for seed in 0..50 {
            let mut rng = Pcg64::seed_from_u64(seed);
            let shape = generate_shape_with(ShapeStrategy::Rectangles, &config, &mut rng);
            assert!(is_connected(&shape.cells), "seed {seed}");
            let (w, h) = shape.extent_with(&shape.rects[0]);
            assert!(w <= config.max_extent && h <= config.max_extent, "seed {seed}");
            assert!(shape.rects.len() <= config.max_rects);
        }
    }

    #[test]
    fn test_rooms_are_separated_and_connected() {
        let config = GeneratorConfig::default();
        for seed in 0..50 {
            let mut rng = Pcg64::seed_from_u64(seed);
            let shape = generate_shape_with(ShapeStrategy::Rooms, &config, &mut rng);
            assert!(!shape.rects.is_empty());
            assert!(shape.rects.len() <= 3);
            for (i, a) in shape.rects.iter().enumerate() {
                for b in &shape.rects[i + 1..] {
                    assert!(a.is_separated_from(b, config.room_margin), "seed {seed}");
                }
            }
            assert!(is_connected(&shape.cells), "seed {seed}");
        }
    }

    #[test]
    fn test_corridor_shapes() {
        let from = Position::new(0, 0);
        let to = Position::new(2, 3);
        let h = corridor(from, to, true);
        assert!(h.contains(&Position::new(2, 0)));
        assert!(!h.contains(&Position::new(0, 3)));
        let v = corridor(from, to, false);
        assert!(v.contains(&Position::new(0, 3)));
        assert!(v.contains(&to));
    }

    #[test]
    fn test_degenerate_bounds_still_produce_a_shape() {
        let config = GeneratorConfig {
            min_rect_size: 5,
            max_rect_size: 0,
            min_rects: 0,
            max_rects: 0,
            max_extent: 0,
            ..GeneratorConfig::default()
        };
        let mut rng = Pcg64::seed_from_u64(7);
        let shape = generate_shape_with(ShapeStrategy::Rectangles, &config, &mut rng);
        assert_eq!(shape.rects.len(), 1);
        assert!(!shape.cells.is_empty());
    }
}
