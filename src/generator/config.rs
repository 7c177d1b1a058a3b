/*
config.rs

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

//! Level generator parameters.
//!
//! Every knob has a default value and can be overridden individually, for example from a JSON
//! file where missing fields keep their defaults:
//!
//! ```
//! # use sporepath::generator::config::GeneratorConfig;
//! let config = GeneratorConfig::from_json(r#"{ "bramble_chance": 0.3 }"#).unwrap();
//! assert_eq!(config.bramble_chance, 0.3);
//! assert_eq!(config.max_attempts, GeneratorConfig::default().max_attempts);
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Gameplay elements that can be enabled for a world.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WorldElement {
    /// Water currents ending on a stone.
    Rivers,
    /// Ice clusters.
    Ice,
    /// Tiles that need two visits.
    Dirt,
    /// Teleport portal pairs.
    Fairy,
}

/// Set of the active [`WorldElement`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WorldElements(BTreeSet<WorldElement>);

impl WorldElements {
    /// Every element enabled.
    pub fn all() -> Self {
        WorldElement::value_variants().iter().copied().collect()
    }

    pub fn contains(&self, element: WorldElement) -> bool {
        self.0.contains(&element)
    }

    pub fn insert(&mut self, element: WorldElement) {
        self.0.insert(element);
    }
}

impl FromIterator<WorldElement> for WorldElements {
    fn from_iter<I: IntoIterator<Item = WorldElement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Generator knobs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Probability of using the rooms and corridors strategy instead of overlapping rectangles.
    pub room_chance: f64,

    /// Rectangle side bounds for the overlapping rectangles strategy.
    pub min_rect_size: i32,
    pub max_rect_size: i32,

    /// Number of rectangles for the overlapping rectangles strategy.
    pub min_rects: usize,
    pub max_rects: usize,

    /// Largest width or height of the footprint of the overlapping rectangles strategy.
    pub max_extent: i32,

    /// Room side bounds for the rooms and corridors strategy.
    pub min_room_size: i32,
    pub max_room_size: i32,

    /// Side of the square area where rooms are placed.
    pub room_area: i32,

    /// Minimum number of void tiles between two rooms.
    pub room_margin: i32,

    /// Probability that a footprint tile is dirt.
    pub dirt_chance: f64,

    /// Applied to [`GeneratorConfig::dirt_chance`] when [`WorldElement::Dirt`] is active.
    pub dirt_multiplier: f64,

    /// Fraction of the grass tiles to turn into brambles.
    pub bramble_chance: f64,

    /// Fraction of the grass tiles to turn into stones.
    pub stone_chance: f64,

    /// Probability of adding rivers to a level.
    pub river_chance: f64,

    /// Number of water tiles in a river.
    pub min_river_length: usize,
    pub max_river_length: usize,

    /// Probability of adding ice clusters to a level.
    pub ice_chance: f64,

    /// Largest number of tiles in an ice cluster.
    pub ice_cluster_size: usize,

    /// Number of portal pairs. When not set, the number is drawn at random for fairy worlds.
    pub portal_pairs: Option<usize>,

    /// Solver iterations before giving up on a start position.
    pub solver_iterations: usize,

    /// Number of start positions to try before discarding a candidate level.
    pub start_attempts: usize,

    /// Number of candidate levels to generate before giving up.
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            room_chance: 0.25,
            min_rect_size: 2,
            max_rect_size: 4,
            min_rects: 2,
            max_rects: 4,
            max_extent: 7,
            min_room_size: 2,
            max_room_size: 4,
            room_area: 9,
            room_margin: 1,
            dirt_chance: 0.05,
            dirt_multiplier: 3.0,
            bramble_chance: 0.12,
            stone_chance: 0.06,
            river_chance: 0.7,
            min_river_length: 2,
            max_river_length: 4,
            ice_chance: 0.6,
            ice_cluster_size: 4,
            portal_pairs: None,
            solver_iterations: 20_000,
            start_attempts: 4,
            max_attempts: 20,
        }
    }
}

impl GeneratorConfig {
    /// Parse a JSON configuration. Missing fields keep their default values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Return the configuration adjusted for the active world elements.
    ///
    /// Rivers and ice are disabled unless their element is active, dirt is more frequent in
    /// dirt worlds, and portals only exist in fairy worlds.
    pub fn effective(&self, elements: &WorldElements) -> Self {
        let mut config: GeneratorConfig = self.clone();
        if !elements.contains(WorldElement::Rivers) {
            config.river_chance = 0.0;
        }
        if !elements.contains(WorldElement::Ice) {
            config.ice_chance = 0.0;
        }
        if elements.contains(WorldElement::Dirt) {
            config.dirt_chance = (config.dirt_chance * config.dirt_multiplier).clamp(0.0, 1.0);
        }
        if !elements.contains(WorldElement::Fairy) {
            config.portal_pairs = Some(0);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_gate_features() {
        let base = GeneratorConfig::default();
        let none = base.effective(&WorldElements::default());
        assert_eq!(none.river_chance, 0.0);
        assert_eq!(none.ice_chance, 0.0);
        assert_eq!(none.dirt_chance, base.dirt_chance);
        assert_eq!(none.portal_pairs, Some(0));

        let all = base.effective(&WorldElements::all());
        assert_eq!(all.river_chance, base.river_chance);
        assert_eq!(all.ice_chance, base.ice_chance);
        assert!((all.dirt_chance - base.dirt_chance * base.dirt_multiplier).abs() < 1e-9);
        assert_eq!(all.portal_pairs, None);
    }

    #[test]
    fn test_fairy_keeps_explicit_portal_count() {
        let base = GeneratorConfig {
            portal_pairs: Some(2),
            ..GeneratorConfig::default()
        };
        let elements: WorldElements = [WorldElement::Fairy].into_iter().collect();
        assert_eq!(base.effective(&elements).portal_pairs, Some(2));
    }

    #[test]
    fn test_json_overrides() {
        let c = GeneratorConfig::from_json(r#"{"max_attempts": 3, "portal_pairs": 1}"#).unwrap();
        assert_eq!(c.max_attempts, 3);
        assert_eq!(c.portal_pairs, Some(1));
        assert_eq!(c.stone_chance, GeneratorConfig::default().stone_chance);
        assert!(GeneratorConfig::from_json("{\"max_attempts\": -1}").is_err());
    }
}
