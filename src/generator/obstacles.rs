/*
obstacles.rs

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

//! Turn footprint grass into dirt, brambles, stones, rivers, and ice.
//!
//! Every proposal goes through [`try_place`]: the proposal is applied to the draft, and then
//! reverted if some required tile can no longer reach every other one, or if too few required
//! tiles would remain.
//!
//! The passes run in a fixed order, each one working on the grass left by the previous ones:
//! dirt, brambles, stones, rivers, and ice clusters.

use log::debug;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::config::GeneratorConfig;
use super::draft::Draft;
use super::reach;
use super::tiles::{Direction, Position, TileType};
use super::traversal::{AlwaysOpen, Terrain, Traversal};

/// Required tiles to keep when placing brambles.
pub const BRAMBLE_FLOOR: usize = 6;

/// Required tiles to keep when placing stones, rivers, and ice.
pub const FEATURE_FLOOR: usize = 8;

// Random seeds to try for each river or ice cluster.
const SEED_ATTEMPTS: usize = 10;

/// Apply the tile and flow changes to the draft, and keep them only if the required tiles stay
/// mutually reachable and at least `floor` of them remain.
///
/// Return `true` when the changes are committed. Otherwise the draft is restored exactly.
pub fn try_place(
    draft: &mut Draft,
    changes: &[(Position, TileType)],
    flows: &[(Position, Direction)],
    floor: usize,
) -> bool {
    let old_tiles: Vec<(Position, TileType)> = changes
        .iter()
        .map(|(p, _)| (*p, draft.tile(*p)))
        .collect();
    let old_flows: Vec<(Position, Option<Direction>)> = flows
        .iter()
        .map(|(p, _)| (*p, draft.flows().get(p).copied()))
        .collect();

    for (p, t) in changes {
        draft.set(*p, *t);
    }
    for (p, d) in flows {
        draft.set_flow(*p, Some(*d));
    }

    if draft.required_count() >= floor && reach::is_connected(&Traversal::new(&*draft, &AlwaysOpen))
    {
        return true;
    }

    // Restore in reverse order, in case a position appears twice
    for (p, t) in old_tiles.into_iter().rev() {
        draft.set(p, t);
    }
    for (p, d) in old_flows.into_iter().rev() {
        draft.set_flow(p, d);
    }
    false
}

/// Number of features placed by an [`ObstaclePlacer`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlacementStats {
    pub dirt: usize,
    pub brambles: usize,
    pub stones: usize,
    pub rivers: usize,
    pub ice_clusters: usize,

    /// Proposals reverted by [`try_place`].
    pub rejected: usize,
}

/// [`ObstaclePlacer`] object.
pub struct ObstaclePlacer<'a, R: ?Sized> {
    config: &'a GeneratorConfig,
    rng: &'a mut R,
    pub stats: PlacementStats,
}

impl<'a, R: Rng + ?Sized> ObstaclePlacer<'a, R> {
    /// Create the object. The configuration should already be adjusted for the world elements.
    pub fn new(config: &'a GeneratorConfig, rng: &'a mut R) -> Self {
        Self {
            config,
            rng,
            stats: PlacementStats::default(),
        }
    }

    /// Run all the passes.
    pub fn place_all(&mut self, draft: &mut Draft) -> PlacementStats {
        self.place_dirt(draft);
        self.place_brambles(draft);
        self.place_stones(draft);
        self.place_rivers(draft);
        self.place_ice(draft);
        debug!("Placement: {:?}", self.stats);
        self.stats
    }

    /// Turn grass tiles into dirt. Dirt is still required and walkable, so connectivity does
    /// not change.
    pub fn place_dirt(&mut self, draft: &mut Draft) {
        let chance: f64 = self.config.dirt_chance.clamp(0.0, 1.0);
        for p in draft.positions_of(TileType::Grass) {
            if self.rng.random_bool(chance) {
                draft.set(p, TileType::Dirt);
                self.stats.dirt += 1;
            }
        }
    }

    pub fn place_brambles(&mut self, draft: &mut Draft) {
        let placed: usize = self.scatter(
            draft,
            TileType::Bramble,
            self.config.bramble_chance,
            BRAMBLE_FLOOR,
        );
        self.stats.brambles += placed;
    }

    pub fn place_stones(&mut self, draft: &mut Draft) {
        let placed: usize =
            self.scatter(draft, TileType::Stone, self.config.stone_chance, FEATURE_FLOOR);
        self.stats.stones += placed;
    }

    /// Convert a fraction of the grass tiles, one tile at a time.
    fn scatter(&mut self, draft: &mut Draft, tile: TileType, chance: f64, floor: usize) -> usize {
        let mut candidates: Vec<Position> = draft.positions_of(TileType::Grass);
        let target: usize = (candidates.len() as f64 * chance.max(0.0)).round() as usize;
        candidates.shuffle(self.rng);

        let mut placed: usize = 0;
        for p in candidates {
            if placed >= target {
                break;
            }
            if try_place(draft, &[(p, tile)], &[], floor) {
                placed += 1;
            } else {
                self.stats.rejected += 1;
            }
        }
        debug!("{tile:?}: {placed}/{target} placed");
        placed
    }

    /// Add one or two rivers.
    ///
    /// A river is a short water path, possibly with one bend, that ends against a stone. Every
    /// water tile flows toward the next one, so the player slides down to the stone.
    pub fn place_rivers(&mut self, draft: &mut Draft) {
        if !self.rng.random_bool(self.config.river_chance.clamp(0.0, 1.0)) {
            return;
        }
        let count: usize = self.rng.random_range(1..=2);
        for _ in 0..count {
            for _ in 0..SEED_ATTEMPTS {
                let Some((changes, flows)) = self.propose_river(draft) else {
                    continue;
                };
                if try_place(draft, &changes, &flows, FEATURE_FLOOR) {
                    debug!("River from {} ({} tiles)", changes[0].0, flows.len());
                    self.stats.rivers += 1;
                    break;
                }
                self.stats.rejected += 1;
            }
        }
    }

    fn propose_river(
        &mut self,
        draft: &Draft,
    ) -> Option<(Vec<(Position, TileType)>, Vec<(Position, Direction)>)> {
        let grass: Vec<Position> = draft.positions_of(TileType::Grass);
        let seed: Position = *grass.choose(self.rng)?;
        let mut direction: Direction = *Direction::ALL.choose(self.rng)?;

        let (lo, hi) = (
            self.config.min_river_length.max(1),
            self.config.max_river_length.max(1),
        );
        let length: usize = self.rng.random_range(lo.min(hi)..=lo.max(hi));
        let bend: Option<usize> = if length >= 3 && self.rng.random_bool(0.5) {
            Some(self.rng.random_range(1..length - 1))
        } else {
            None
        };

        let mut water: Vec<Position> = vec![seed];
        let mut flows: Vec<(Position, Direction)> = Vec::with_capacity(length);
        while water.len() < length {
            if bend == Some(water.len()) {
                direction = *direction.perpendicular().choose(self.rng)?;
            }
            let last: Position = *water.last()?;
            let next: Position = last.step(direction);
            if draft.tile(next) != TileType::Grass || water.contains(&next) {
                return None;
            }
            flows.push((last, direction));
            water.push(next);
        }

        let last: Position = *water.last()?;
        let stone: Position = last.step(direction);
        let mut changes: Vec<(Position, TileType)> =
            water.iter().map(|p| (*p, TileType::Water)).collect();
        match draft.tile(stone) {
            TileType::Grass => changes.push((stone, TileType::Stone)),
            TileType::Stone => (),
            _ => return None,
        }
        flows.push((last, direction));
        Some((changes, flows))
    }

    /// Add one or two ice clusters grown from a random grass tile.
    pub fn place_ice(&mut self, draft: &mut Draft) {
        if !self.rng.random_bool(self.config.ice_chance.clamp(0.0, 1.0)) {
            return;
        }
        let count: usize = self.rng.random_range(1..=2);
        for _ in 0..count {
            for _ in 0..SEED_ATTEMPTS {
                let cluster: Vec<Position> = self.grow_cluster(draft);
                if cluster.is_empty() {
                    break;
                }
                let changes: Vec<(Position, TileType)> =
                    cluster.iter().map(|p| (*p, TileType::Ice)).collect();
                if try_place(draft, &changes, &[], FEATURE_FLOOR) {
                    debug!("Ice cluster at {} ({} tiles)", cluster[0], cluster.len());
                    self.stats.ice_clusters += 1;
                    break;
                }
                self.stats.rejected += 1;
            }
        }
    }

    /// Return a connected set of grass tiles, grown breadth-first in random order.
    fn grow_cluster(&mut self, draft: &Draft) -> Vec<Position> {
        let grass: Vec<Position> = draft.positions_of(TileType::Grass);
        let Some(seed) = grass.choose(self.rng).copied() else {
            return Vec::new();
        };
        let size: usize = self
            .rng
            .random_range(1..=self.config.ice_cluster_size.max(1));

        let mut cluster: Vec<Position> = vec![seed];
        let mut i: usize = 0;
        while i < cluster.len() && cluster.len() < size {
            let mut neighbors: [Position; 4] = cluster[i].neighbors();
            neighbors.shuffle(self.rng);
            for n in neighbors {
                if cluster.len() < size
                    && draft.tile(n) == TileType::Grass
                    && !cluster.contains(&n)
                {
                    cluster.push(n);
                }
            }
            i += 1;
        }
        cluster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::level::Level;
    use crate::generator::shape::Shape;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::collections::BTreeSet;

    fn draft(ascii: &str) -> Draft {
        Draft::from_grid(&Level::parse(ascii).unwrap().grid())
    }

    fn rect_draft(width: i32, height: i32) -> Draft {
        let cells: BTreeSet<Position> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
            .collect();
        Draft::from_shape(&Shape {
            cells,
            rects: Vec::new(),
        })
    }

    #[test]
    fn test_isolating_bramble_is_rejected() {
        let mut d = draft("@GGGG..\n....GGG");
        let before: Draft = d.clone();
        assert_eq!(d.required_count(), 8);

        assert!(!try_place(
            &mut d,
            &[(Position::new(4, 1), TileType::Bramble)],
            &[],
            BRAMBLE_FLOOR
        ));
        assert_eq!(d, before);
        assert!(d.positions_of(TileType::Bramble).is_empty());

        assert!(try_place(
            &mut d,
            &[(Position::new(6, 1), TileType::Bramble)],
            &[],
            BRAMBLE_FLOOR
        ));
        assert_eq!(d.required_count(), 7);
    }

    #[test]
    fn test_floor_rejection_restores_flows() {
        let mut d = draft("@GGG\nGGGG");
        let before: Draft = d.clone();
        let p = Position::new(1, 0);
        assert!(!try_place(
            &mut d,
            &[(p, TileType::Water)],
            &[(p, Direction::Up)],
            FEATURE_FLOOR
        ));
        assert_eq!(d, before);
        assert_eq!(d.flows().get(&p), None);
    }

    #[test]
    fn test_one_way_river_is_rejected() {
        let river: Vec<(Position, TileType)> = (5..8)
            .map(|x| (Position::new(x, 0), TileType::Water))
            .collect();
        let flows: Vec<(Position, Direction)> = (5..8)
            .map(|x| (Position::new(x, 0), Direction::Right))
            .collect();

        // The current cannot be crossed back, with a new or an existing terminal stone
        let mut d = draft("@GGGGGGGGGGGGG");
        let before: Draft = d.clone();
        let mut changes = river.clone();
        changes.push((Position::new(8, 0), TileType::Stone));
        assert!(!try_place(&mut d, &changes, &flows, FEATURE_FLOOR));
        assert_eq!(d, before);
        assert!(d.flows().is_empty());

        let mut d = draft("@GGGGGGGSGGGGG");
        let before: Draft = d.clone();
        assert!(!try_place(&mut d, &river, &flows, FEATURE_FLOOR));
        assert_eq!(d, before);
        assert_eq!(d.tile(Position::new(8, 0)), TileType::Stone);
        assert!(d.positions_of(TileType::Water).is_empty());
    }

    #[test]
    fn test_ice_skipping_a_tile_is_rejected() {
        // Nothing can stop above (5,1) once (5,0) and (6,0) are ice
        let mut d = draft("@GGGGGGGGGG\n.....G");
        let before: Draft = d.clone();
        let ice: Vec<(Position, TileType)> = vec![
            (Position::new(5, 0), TileType::Ice),
            (Position::new(6, 0), TileType::Ice),
        ];
        assert!(!try_place(&mut d, &ice, &[], FEATURE_FLOOR));
        assert_eq!(d, before);
        assert!(d.positions_of(TileType::Ice).is_empty());

        let ice: Vec<(Position, TileType)> = vec![
            (Position::new(8, 0), TileType::Ice),
            (Position::new(9, 0), TileType::Ice),
        ];
        assert!(try_place(&mut d, &ice, &[], FEATURE_FLOOR));
        assert_eq!(d.positions_of(TileType::Ice).len(), 2);
    }

    #[test]
    fn test_passes_keep_the_board_connected() {
        let config = GeneratorConfig {
            river_chance: 1.0,
            ice_chance: 1.0,
            dirt_chance: 0.2,
            ..GeneratorConfig::default()
        };
        for seed in 0..20 {
            let mut rng = Pcg64::seed_from_u64(seed);
            let mut d = rect_draft(6, 5);
            let stats = ObstaclePlacer::new(&config, &mut rng).place_all(&mut d);

            assert!(reach::is_connected(&Traversal::new(&d, &AlwaysOpen)));
            assert!(d.required_count() >= BRAMBLE_FLOOR, "seed {seed}");
            assert_eq!(d.positions_of(TileType::Dirt).len(), stats.dirt);
            for p in d.positions_of(TileType::Water) {
                assert!(d.flows().contains_key(&p), "water without flow at {p}");
            }
        }
    }

    #[test]
    fn test_disabled_features_are_not_placed() {
        let config = GeneratorConfig {
            river_chance: 0.0,
            ice_chance: 0.0,
            dirt_chance: 0.0,
            ..GeneratorConfig::default()
        };
        let mut rng = Pcg64::seed_from_u64(4);
        let mut d = rect_draft(5, 5);
        let stats = ObstaclePlacer::new(&config, &mut rng).place_all(&mut d);
        assert_eq!((stats.dirt, stats.rivers, stats.ice_clusters), (0, 0, 0));
        assert!(d.positions_of(TileType::Water).is_empty());
        assert!(d.positions_of(TileType::Ice).is_empty());
    }
}
