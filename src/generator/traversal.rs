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

//! Movement rules shared by the generator, the solver, and live games.
//!
//! The rules are parameterized by a [`Terrain`] snapshot (which tile is where, and how water
//! flows) and by a [`Conditions`] predicate for the tiles whose walkability depends on
//! auxiliary state (submerged lily pads, the tide, fed squirrels, portals).
//!
//! Everything in this module is a pure function of its inputs: the solver replays moves during
//! planning, so resolving the same move twice must give the same destination.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::tiles::{Direction, PortalType, Position, TileType};

/// Read access to a grid snapshot.
pub trait Terrain {
    /// Tile at the given position. Positions outside the grid are [`TileType::Void`].
    fn tile(&self, pos: Position) -> TileType;

    /// Flow direction of the water tile at the given position.
    fn flow(&self, pos: Position) -> Option<Direction>;

    /// All the positions that are not void, in a stable order.
    fn positions(&self) -> Vec<Position>;
}

impl<T: Terrain + ?Sized> Terrain for &T {
    fn tile(&self, pos: Position) -> TileType {
        (**self).tile(pos)
    }

    fn flow(&self, pos: Position) -> Option<Direction> {
        (**self).flow(pos)
    }

    fn positions(&self) -> Vec<Position> {
        (**self).positions()
    }
}

/// Predicate for conditionally walkable tiles.
pub trait Conditions {
    /// Whether the conditional tile at `pos` can currently be entered.
    fn allows(&self, pos: Position, tile: TileType) -> bool;
}

/// Every conditional tile is open. Used at generation time.
#[derive(Debug, Copy, Clone, Default)]
pub struct AlwaysOpen;

impl Conditions for AlwaysOpen {
    fn allows(&self, _pos: Position, _tile: TileType) -> bool {
        true
    }
}

/// Auxiliary state of a live game, passed around as plain data.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ConditionState {
    /// Lily pads that are currently under water.
    pub submerged: BTreeSet<Position>,

    /// Tide zones are flooded at high tide.
    pub high_tide: bool,

    /// Acorns collected by the player. A squirrel lets the player through for an acorn.
    pub acorns: u32,
}

impl Conditions for ConditionState {
    fn allows(&self, pos: Position, tile: TileType) -> bool {
        match tile {
            TileType::LilyPad => !self.submerged.contains(&pos),
            TileType::TideZone => !self.high_tide,
            TileType::Squirrel => self.acorns > 0,
            TileType::Portal(_) => true,
            _ => false,
        }
    }
}

/// How a move started.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveKind {
    /// Direct step onto the adjacent tile.
    Step,
    /// Two-tile jump over an obstacle.
    Jump,
    WaterSlide,
    IceSlide,
    Teleport,
    Bounce,
}

/// A resolved player move.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Move {
    pub direction: Direction,
    pub kind: MoveKind,

    /// First tile entered, before any forced effect.
    pub landing: Position,

    /// Tile the player stops on.
    pub destination: Position,
}

/// Movement rules over a terrain and a conditions predicate.
pub struct Traversal<'a, T: ?Sized, C: ?Sized> {
    terrain: &'a T,
    conditions: &'a C,
}

impl<'a, T: Terrain + ?Sized, C: Conditions + ?Sized> Traversal<'a, T, C> {
    /// Create a [`Traversal`] object.
    pub fn new(terrain: &'a T, conditions: &'a C) -> Self {
        Self {
            terrain,
            conditions,
        }
    }

    pub fn terrain(&self) -> &T {
        self.terrain
    }

    /// Whether the player can stand on the tile.
    pub fn is_walkable(&self, pos: Position) -> bool {
        let tile: TileType = self.terrain.tile(pos);
        tile.is_always_walkable() || (tile.is_conditional() && self.conditions.allows(pos, tile))
    }

    /// Whether the tile blocks direct entry but can be jumped over.
    pub fn is_obstacle(&self, pos: Position) -> bool {
        let tile: TileType = self.terrain.tile(pos);
        tile.is_obstacle()
            || (tile.is_jumpable_when_closed() && !self.conditions.allows(pos, tile))
    }

    /// Try to move from `from` in the given direction.
    ///
    /// Return [`None`] if the move is blocked or if the forced effects bring the player back
    /// where they started.
    pub fn step(&self, from: Position, direction: Direction) -> Option<Move> {
        let next: Position = from.step(direction);
        let (landing, kind) = if self.is_obstacle(next) {
            let beyond: Position = next.step(direction);
            if !self.is_walkable(beyond) {
                return None;
            }
            (beyond, MoveKind::Jump)
        } else if self.is_walkable(next) {
            (next, MoveKind::Step)
        } else {
            return None;
        };

        let destination: Position = self.resolve_landing(from, landing, direction);
        if destination == from {
            return None;
        }
        let kind: MoveKind = match self.terrain.tile(landing) {
            TileType::Water => MoveKind::WaterSlide,
            TileType::Ice => MoveKind::IceSlide,
            TileType::Portal(_) => MoveKind::Teleport,
            TileType::BouncePad => MoveKind::Bounce,
            _ => kind,
        };
        Some(Move {
            direction,
            kind,
            landing,
            destination,
        })
    }

    /// Return the tile the player stops on after landing on `landing` while travelling in
    /// `direction`, chaining water, ice, portal, and bounce pad effects.
    pub fn resolve_landing(
        &self,
        from: Position,
        landing: Position,
        direction: Direction,
    ) -> Position {
        let mut pos: Position = landing;
        let mut direction: Direction = direction;
        // Effect states already resolved, to stop on loops such as circular currents.
        let mut seen: Vec<(Position, Direction)> = Vec::new();

        loop {
            let tile: TileType = self.terrain.tile(pos);
            if !matches!(
                tile,
                TileType::Water | TileType::Ice | TileType::Portal(_) | TileType::BouncePad
            ) {
                return pos;
            }
            if seen.contains(&(pos, direction)) {
                return pos;
            }
            seen.push((pos, direction));

            match tile {
                TileType::Water => {
                    let Some(flow) = self.terrain.flow(pos) else {
                        return pos;
                    };
                    let next: Position = pos.step(flow);
                    if !self.is_walkable(next) {
                        return pos;
                    }
                    pos = next;
                    direction = flow;
                }
                TileType::Ice => {
                    let next: Position = pos.step(direction);
                    if !self.is_walkable(next) {
                        return pos;
                    }
                    pos = next;
                }
                TileType::Portal(color) => {
                    return self.portal_partner(pos, color).unwrap_or(pos);
                }
                TileType::BouncePad => {
                    match [3, 2, 1]
                        .into_iter()
                        .map(|d| pos.offset(direction, d))
                        .find(|t| *t != from && self.is_walkable(*t))
                    {
                        Some(t) => pos = t,
                        None => return pos,
                    }
                }
                _ => return pos,
            }
        }
    }

    /// The unique other portal of the same color.
    fn portal_partner(&self, pos: Position, color: PortalType) -> Option<Position> {
        let others: Vec<Position> = self
            .terrain
            .positions()
            .into_iter()
            .filter(|p| *p != pos && self.terrain.tile(*p) == TileType::Portal(color))
            .collect();
        match others[..] {
            [partner] => Some(partner),
            _ => None,
        }
    }

    /// Every tile a move from `from` could stop on, now or later.
    ///
    /// Walkable tiles for which `fading` returns `true` might turn into obstacles before the
    /// move is made, for example grass that the player consumes first. Such a tile can cut a
    /// slide or a bounce short, or make a jump possible. The result is a superset of
    /// [`Traversal::destinations`] for every such future terrain, and may contain `from`.
    pub fn possible_destinations<F>(&self, from: Position, fading: &F) -> Vec<Position>
    where
        F: Fn(Position) -> bool + ?Sized,
    {
        let mut stops: Vec<Position> = Vec::new();
        let mut chain: Vec<(Position, Direction)> = Vec::new();
        for direction in Direction::ALL {
            let next: Position = from.step(direction);
            let beyond: Position = next.step(direction);
            let walkable: bool = self.is_walkable(next);
            if walkable {
                self.possible_stops(from, next, direction, fading, &mut chain, &mut stops);
            }
            if (self.is_obstacle(next) || (walkable && fading(next))) && self.is_walkable(beyond)
            {
                self.possible_stops(from, beyond, direction, fading, &mut chain, &mut stops);
            }
        }
        stops
    }

    /// Collect the tiles where [`Traversal::resolve_landing`] could stop, exploring every
    /// branch that fading tiles make possible. `chain` holds the effect states of the branch.
    fn possible_stops<F>(
        &self,
        from: Position,
        pos: Position,
        direction: Direction,
        fading: &F,
        chain: &mut Vec<(Position, Direction)>,
        stops: &mut Vec<Position>,
    ) where
        F: Fn(Position) -> bool + ?Sized,
    {
        let tile: TileType = self.terrain.tile(pos);
        if !matches!(
            tile,
            TileType::Water | TileType::Ice | TileType::Portal(_) | TileType::BouncePad
        ) || chain.contains(&(pos, direction))
        {
            push_new(stops, pos);
            return;
        }
        chain.push((pos, direction));

        match tile {
            TileType::Water => match self.terrain.flow(pos) {
                Some(flow) => self.possible_slide(from, pos, flow, fading, chain, stops),
                None => push_new(stops, pos),
            },
            TileType::Ice => self.possible_slide(from, pos, direction, fading, chain, stops),
            TileType::Portal(color) => {
                push_new(stops, self.portal_partner(pos, color).unwrap_or(pos));
            }
            TileType::BouncePad => {
                let mut can_stay: bool = true;
                for target in [3, 2, 1].into_iter().map(|d| pos.offset(direction, d)) {
                    if target == from || !self.is_walkable(target) {
                        continue;
                    }
                    self.possible_stops(from, target, direction, fading, chain, stops);
                    // A target that stays walkable is always taken
                    if !fading(target) {
                        can_stay = false;
                        break;
                    }
                }
                if can_stay {
                    push_new(stops, pos);
                }
            }
            _ => push_new(stops, pos),
        }
        chain.pop();
    }

    fn possible_slide<F>(
        &self,
        from: Position,
        pos: Position,
        direction: Direction,
        fading: &F,
        chain: &mut Vec<(Position, Direction)>,
        stops: &mut Vec<Position>,
    ) where
        F: Fn(Position) -> bool + ?Sized,
    {
        let next: Position = pos.step(direction);
        if !self.is_walkable(next) {
            push_new(stops, pos);
            return;
        }
        self.possible_stops(from, next, direction, fading, chain, stops);
        if fading(next) {
            push_new(stops, pos);
        }
    }

    /// Destinations of every legal move from the given position, in [`Direction::ALL`] order
    /// and without duplicates.
    pub fn destinations(&self, from: Position) -> Vec<Position> {
        let mut result: Vec<Position> = Vec::with_capacity(4);
        for direction in Direction::ALL {
            if let Some(m) = self.step(from, direction)
                && !result.contains(&m.destination)
            {
                result.push(m.destination);
            }
        }
        result
    }
}

fn push_new(stops: &mut Vec<Position>, pos: Position) {
    if !stops.contains(&pos) {
        stops.push(pos);
    }
}
