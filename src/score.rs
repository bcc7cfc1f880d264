//! Distance scoreboard
//!
//! Each live player accrues a tenth of the scroll speed per playing tick.
//! Display and persistence belong to the UI.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PLAYERS;
use crate::sim::Player;

/// Score divisor applied to the scroll speed each tick
pub const SPEED_TO_SCORE: f32 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Scoreboard {
    pub scores: [f64; MAX_PLAYERS],
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all scores for a new round
    pub fn reset(&mut self) {
        self.scores = [0.0; MAX_PLAYERS];
    }

    /// Credit one tick of distance to every live player
    pub fn accrue(&mut self, players: &[Player], speed: f32) {
        let gained = f64::from(speed / SPEED_TO_SCORE);
        for player in players.iter().filter(|p| p.is_alive()) {
            if let Some(score) = self.scores.get_mut(player.id) {
                *score += gained;
            }
        }
    }

    pub fn score(&self, player: usize) -> f64 {
        self.scores.get(player).copied().unwrap_or(0.0)
    }

    /// Player ids of `players` ordered by score, best first
    ///
    /// Ties keep slot order.
    pub fn ranking(&self, players: &[Player]) -> Vec<usize> {
        let mut ids: Vec<usize> = players
            .iter()
            .filter(|p| !p.is_inactive)
            .map(|p| p.id)
            .collect();
        ids.sort_by(|a, b| self.score(*b).total_cmp(&self.score(*a)));
        ids
    }

    /// Best score of the round (if anyone scored)
    pub fn top_score(&self) -> Option<f64> {
        self.scores
            .iter()
            .copied()
            .filter(|s| *s > 0.0)
            .max_by(f64::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: usize) -> Vec<Player> {
        (0..n).map(|id| Player::new(id, 1.0, 0)).collect()
    }

    #[test]
    fn test_accrue_skips_dead_players() {
        let mut players = players(2);
        let mut board = Scoreboard::new();
        board.accrue(&players, 1.0);
        players[1].kill(1.0);
        board.accrue(&players, 1.0);

        assert!((board.score(0) - 0.2).abs() < 1e-6);
        assert!((board.score(1) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_ranking_best_first() {
        let mut players = players(3);
        players[2].is_inactive = true;
        let mut board = Scoreboard::new();
        board.scores = [1.0, 5.0, 9.0, 0.0];
        assert_eq!(board.ranking(&players), vec![1, 0]);
        assert_eq!(board.top_score(), Some(9.0));
    }

    #[test]
    fn test_reset() {
        let mut board = Scoreboard::new();
        board.accrue(&players(1), 8.0);
        board.reset();
        assert_eq!(board.top_score(), None);
    }
}
