/*
level_generator.rs

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

//! Generate random levels.
//!
//! One attempt goes through the whole pipeline: footprint, dirt, brambles, stones, rivers, ice,
//! solving from a few random start positions, portals, and finally building and verifying the
//! level. An attempt can fail at several steps. [`generate_level`] retries with fresh randomness
//! and returns [`None`] when every attempt failed, in which case the caller should use one of the
//! [`super::fallback`] levels.

use log::{Level as LogLevel, debug, log_enabled};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

use super::config::{GeneratorConfig, WorldElements};
use super::draft::Draft;
use super::level::{BuildError, Level, MIN_REQUIRED_TILES, build_level};
use super::obstacles::{ObstaclePlacer, PlacementStats};
use super::path::Path;
use super::portals::PortalPlacer;
use super::shape::{Shape, generate_shape};
use super::solver::{Solver, SolverError};
use super::tiles::{Position, TileType};
use super::traversal::AlwaysOpen;

/// Reasons for discarding a candidate level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The footprint has too few tiles.
    TooSmall(usize),

    /// No start position led to a solution.
    Unsolvable(SolverError),

    /// The level did not pass verification.
    Build(BuildError),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerateError::TooSmall(n) => write!(f, "footprint too small ({n} tiles)"),
            GenerateError::Unsolvable(e) => write!(f, "no solution found ({e})"),
            GenerateError::Build(e) => write!(f, "invalid level ({e})"),
        }
    }
}

impl From<BuildError> for GenerateError {
    fn from(e: BuildError) -> Self {
        GenerateError::Build(e)
    }
}

/// Statistics over the attempts of a [`LevelGenerator`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationStats {
    /// Candidate levels generated.
    pub attempts: usize,

    /// Solver iterations, for all attempts.
    pub iterations: usize,

    /// Features placed on the last candidate.
    pub placement: PlacementStats,

    /// Portal pairs placed on the last candidate.
    pub portal_pairs: usize,
}

/// [`LevelGenerator`] object.
pub struct LevelGenerator<'a, R: ?Sized> {
    /// Configuration adjusted for the world elements.
    config: GeneratorConfig,

    rng: &'a mut R,

    pub stats: GenerationStats,
}

impl<'a, R: Rng + ?Sized> LevelGenerator<'a, R> {
    /// Create the object.
    pub fn new(config: &GeneratorConfig, elements: &WorldElements, rng: &'a mut R) -> Self {
        Self {
            config: config.effective(elements),
            rng,
            stats: GenerationStats::default(),
        }
    }

    /// Configuration in use, after the world element adjustments.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate levels until one is valid, up to the configured number of attempts.
    pub fn generate(&mut self) -> Option<Level> {
        for attempt in 1..=self.config.max_attempts.max(1) {
            match self.attempt() {
                Ok(level) => {
                    debug!("Level generated after {attempt} attempt(s)");
                    return Some(level);
                }
                Err(e) => debug!("Attempt {attempt} discarded: {e}"),
            }
        }
        None
    }

    /// Generate a single candidate level.
    ///
    /// # Errors
    ///
    /// The method returns the reason for discarding the candidate.
    pub fn attempt(&mut self) -> Result<Level, GenerateError> {
        self.stats.attempts += 1;

        let shape: Shape = generate_shape(&self.config, self.rng);
        let mut draft: Draft = Draft::from_shape(&shape);
        if draft.required_count() < MIN_REQUIRED_TILES {
            return Err(GenerateError::TooSmall(draft.required_count()));
        }

        let mut placer = ObstaclePlacer::new(&self.config, self.rng);
        self.stats.placement = placer.place_all(&mut draft);

        if log_enabled!(LogLevel::Debug) {
            debug!("Draft: {} tiles, {} required", draft.len(), draft.required_count());
        }

        let (start, solution) = self.solve(&draft)?;

        let mut portals = PortalPlacer::new(&self.config, self.rng);
        let solution: Path = portals.place(&mut draft, start, solution);
        self.stats.portal_pairs = portals.placed;
        self.stats.iterations += portals.iteration;

        Ok(build_level(&draft, start, Some(&solution))?)
    }

    /// Try a few random grass start positions and return the first one with a solution.
    fn solve(&mut self, draft: &Draft) -> Result<(Position, Path), GenerateError> {
        let mut starts: Vec<Position> = draft.positions_of(TileType::Grass);
        starts.shuffle(self.rng);

        let mut error: SolverError = SolverError::NoPath;
        for start in starts.into_iter().take(self.config.start_attempts.max(1)) {
            let mut solver = Solver::new(draft, &AlwaysOpen, self.config.solver_iterations);
            let result: Result<Path, SolverError> = solver.solve(start, self.rng);
            self.stats.iterations += solver.iteration;
            match result {
                Ok(path) => {
                    debug!("Solved from {start} in {} iterations", solver.iteration);
                    return Ok((start, path));
                }
                Err(e) => {
                    debug!("No solution from {start}: {e}");
                    if e == SolverError::IterationLimit {
                        error = e;
                    }
                }
            }
        }
        Err(GenerateError::Unsolvable(error))
    }
}

/// Generate a random level for the given world elements.
///
/// Return [`None`] when no valid level could be generated within the configured attempts.
pub fn generate_level<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    elements: &WorldElements,
    rng: &mut R,
) -> Option<Level> {
    LevelGenerator::new(config, elements, rng).generate()
}
