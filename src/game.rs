/*
game.rs

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

//! Manage the status of a game in progress.
//!
//! The [`Game`] object plays on a [`Grid`] copy of the level. Walking off a tile consumes it:
//! grass becomes a mushroom, and dirt becomes grass. The player wins when standing on the last
//! tile that needs a visit.

use log::debug;
use rand::Rng;
use std::fmt;

use crate::checkpoint::CheckPoint;
use crate::generator::grid::Grid;
use crate::generator::level::Level;
use crate::generator::level_parse::terrain_to_ascii;
use crate::generator::tiles::{Direction, Position, TileType};
use crate::generator::traversal::{ConditionState, Move, Terrain, Traversal};
use crate::oracle::{self, HINT_ITERATIONS, Hint, Solvability};

/// Reasons for refusing a move.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Nothing walkable in that direction.
    Blocked(Direction),

    /// No single move leads to that position.
    NotReachable(Position),

    /// The game is already won.
    GameOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveError::Blocked(d) => write!(f, "cannot move {d:?}"),
            MoveError::NotReachable(p) => write!(f, "cannot reach {p} in one move"),
            MoveError::GameOver => write!(f, "the game is over"),
        }
    }
}

/// Manage the status of the game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    /// Level being played. Never modified.
    level: Level,

    /// Live board.
    grid: Grid,

    player: Position,

    /// Auxiliary state for the conditional tiles.
    pub conditions: ConditionState,

    /// Number of moves, undone moves excluded.
    pub moves: usize,

    /// Solver iterations for [`Game::hint`] and [`Game::is_solvable`].
    pub hint_iterations: usize,

    /// Whether the player asked for a hint.
    pub used_hint: bool,

    /// One checkpoint per move, to undo the moves.
    checkpoints: Vec<CheckPoint>,
}

impl Game {
    /// Create a [`Game`] object. The player stands on the level start position.
    pub fn new(level: Level) -> Self {
        Self {
            grid: level.grid(),
            player: level.start(),
            level,
            conditions: ConditionState::default(),
            moves: 0,
            hint_iterations: HINT_ITERATIONS,
            used_hint: false,
            checkpoints: Vec::new(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Position {
        self.player
    }

    /// Restart the game from the initial board.
    pub fn reset(&mut self) {
        self.grid = self.level.grid();
        self.player = self.level.start();
        self.conditions = ConditionState::default();
        self.moves = 0;
        self.used_hint = false;
        self.checkpoints.clear();
    }

    /// Move the player in the given direction.
    ///
    /// # Errors
    ///
    /// The method returns an error when the move is not possible. The game is not modified.
    pub fn move_player(&mut self, direction: Direction) -> Result<Move, MoveError> {
        self.play(
            |t, from| t.step(from, direction),
            MoveError::Blocked(direction),
        )
    }

    /// Make the move that stops on the given position.
    ///
    /// # Errors
    ///
    /// The method returns an error when no single move stops on the position.
    pub fn move_to(&mut self, target: Position) -> Result<Move, MoveError> {
        self.play(
            |t, from| {
                Direction::ALL
                    .into_iter()
                    .filter_map(|d| t.step(from, d))
                    .find(|m| m.destination == target)
            },
            MoveError::NotReachable(target),
        )
    }

    fn play<F>(&mut self, pick: F, error: MoveError) -> Result<Move, MoveError>
    where
        F: Fn(&Traversal<'_, Grid, ConditionState>, Position) -> Option<Move>,
    {
        if self.is_won() {
            return Err(MoveError::GameOver);
        }
        let checkpoint: CheckPoint = CheckPoint::new(self);
        let from: Position = self.player;
        let left: TileType = self.grid.tile(from);

        // The tile is consumed first, so the move cannot stop on it again
        self.grid.set(from, left.after_visit());
        let Some(m) = pick(&Traversal::new(&self.grid, &self.conditions), from) else {
            self.grid.set(from, left);
            return Err(error);
        };
        debug!("{:?} {from} -> {} ({:?})", m.direction, m.destination, m.kind);

        self.checkpoints.push(checkpoint);
        self.player = m.destination;
        self.moves += 1;

        match self.grid.tile(m.destination) {
            TileType::Acorn => {
                self.conditions.acorns += 1;
                self.grid.set(m.destination, TileType::Stone);
            }
            TileType::Squirrel => {
                self.conditions.acorns = self.conditions.acorns.saturating_sub(1);
                self.grid.set(m.destination, TileType::Stone);
            }
            _ => (),
        }
        Ok(m)
    }

    /// Return the number of moves that can be undone.
    pub fn checkpoints_len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Revert the last move. Return `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        // The checkpoint is removed
        match self.checkpoints.pop() {
            Some(c) => {
                self.grid = c.grid;
                self.player = c.player;
                self.conditions = c.conditions;
                self.moves = self.moves.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    pub fn is_won(&self) -> bool {
        oracle::is_won(&self.grid, self.player)
    }

    pub fn is_stuck(&self) -> bool {
        oracle::is_stuck(&self.grid, self.player, &self.conditions)
    }

    pub fn is_solvable<R: Rng + ?Sized>(&self, rng: &mut R) -> Solvability {
        oracle::is_solvable(
            &self.grid,
            self.player,
            &self.conditions,
            self.hint_iterations,
            rng,
        )
    }

    pub fn hint<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Hint {
        self.used_hint = true;
        oracle::hint(
            &self.grid,
            self.player,
            &self.conditions,
            self.hint_iterations,
            rng,
        )
    }

    /// Return the "ASCII art" representation of the board with the player as `@`.
    pub fn to_ascii(&self) -> String {
        terrain_to_ascii(
            &self.grid,
            self.grid.width(),
            self.grid.height(),
            Some(self.player),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::fallback::fallback_levels;
    use crate::generator::traversal::MoveKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn game(ascii: &str) -> Game {
        Game::new(Level::parse(ascii).unwrap())
    }

    #[test]
    fn test_dirt_needs_a_second_visit() {
        let mut g = game("@DS");
        g.move_player(Direction::Right).unwrap();
        assert!(!g.is_won());
        g.move_player(Direction::Right).unwrap();
        assert_eq!(g.grid().tile(Position::new(1, 0)), TileType::Grass);
        assert_eq!(g.grid().tile(Position::new(0, 0)), TileType::Mushroom);
        g.move_player(Direction::Left).unwrap();
        assert!(g.is_won());
        assert_eq!(
            g.move_player(Direction::Right),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_blocked_move_changes_nothing() {
        let mut g = game("@.G\nGGG");
        let before = g.grid().clone();
        assert_eq!(
            g.move_player(Direction::Right),
            Err(MoveError::Blocked(Direction::Right))
        );
        assert_eq!(g.grid(), &before);
        assert_eq!(g.player(), Position::new(0, 0));
        assert_eq!(g.checkpoints_len(), 0);
    }

    #[test]
    fn test_undo_restores_the_board() {
        let mut g = game("@GG\nGGG");
        let before = g.grid().clone();
        g.move_player(Direction::Right).unwrap();
        g.move_player(Direction::Down).unwrap();
        assert_eq!(g.moves, 2);
        assert!(g.undo());
        assert!(g.undo());
        assert!(!g.undo());
        assert_eq!(g.grid(), &before);
        assert_eq!(g.player(), Position::new(0, 0));
        assert_eq!(g.moves, 0);
    }

    #[test]
    fn test_acorn_feeds_the_squirrel() {
        let mut g = game("@AQG");
        g.move_player(Direction::Right).unwrap();
        assert_eq!(g.conditions.acorns, 1);
        let m = g.move_player(Direction::Right).unwrap();
        assert_eq!(m.kind, MoveKind::Step);
        assert_eq!(m.destination, Position::new(2, 0));
        assert_eq!(g.conditions.acorns, 0);
        g.move_player(Direction::Right).unwrap();
        assert!(g.is_won());
        assert_eq!(g.to_ascii(), "MSS@\n");
    }

    #[test]
    fn test_hungry_squirrel_is_jumped_over() {
        let mut g = game("@QG");
        let m = g.move_player(Direction::Right).unwrap();
        assert_eq!(m.kind, MoveKind::Jump);
        assert_eq!(g.player(), Position::new(2, 0));
    }

    #[test]
    fn test_move_to_follows_slides() {
        let mut g = game("@>S\nGGG");
        assert_eq!(
            g.move_to(Position::new(1, 0)),
            Err(MoveError::NotReachable(Position::new(1, 0)))
        );
        let m = g.move_to(Position::new(2, 0)).unwrap();
        assert_eq!(m.kind, MoveKind::WaterSlide);
    }

    #[test]
    fn test_solutions_replay_to_a_win() {
        let mut rng = Pcg64::seed_from_u64(2);
        for level in fallback_levels(&mut rng) {
            let solution: Vec<Position> = level.solution().unwrap().to_vec();
            let mut g = Game::new(level);
            assert!(!g.is_stuck());
            for p in &solution[1..] {
                g.move_to(*p).unwrap();
            }
            assert!(g.is_won(), "{}", g.to_ascii());
            assert_eq!(g.hint(&mut rng), Hint::Complete);
        }
    }
}
