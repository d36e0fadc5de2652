//! Zobrist hashing for position identification.
//!
//! One pseudo-random key per (row, column, player). A position's hash is the
//! XOR of the keys of its occupied cells, so placing or removing a piece is a
//! single XOR and the two operations are the same.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{Board, Player, COLS, ROWS};

/// Seed used when the configuration does not override it.
pub const DEFAULT_ZOBRIST_SEED: u64 = 0x1234_5678_9ABC_DEF0;

/// Per-cell, per-player hash keys.
pub struct ZobristKeys {
    keys: [[[u64; 2]; COLS]; ROWS],
}

impl ZobristKeys {
    /// Generate the key table from a fixed seed. The same seed always yields
    /// the same table. Keys are non-zero and pairwise distinct.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut seen = HashSet::with_capacity(ROWS * COLS * 2);
        let mut keys = [[[0u64; 2]; COLS]; ROWS];

        for cell in keys.iter_mut().flat_map(|row| row.iter_mut()) {
            for slot in cell.iter_mut() {
                *slot = loop {
                    let candidate: u64 = rng.random();
                    if candidate != 0 && seen.insert(candidate) {
                        break candidate;
                    }
                };
            }
        }

        ZobristKeys { keys }
    }

    #[inline]
    pub fn key(&self, row: usize, col: usize, player: Player) -> u64 {
        self.keys[row][col][player.index()]
    }

    /// Full hash of a board. Search updates it incrementally from here.
    pub fn hash(&self, board: &Board) -> u64 {
        let mut h = 0u64;
        for row in 0..ROWS {
            for col in 0..COLS {
                if let Some(player) = board.get(row, col).player() {
                    h ^= self.key(row, col, player);
                }
            }
        }
        h
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new(DEFAULT_ZOBRIST_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct_and_non_zero() {
        let keys = ZobristKeys::default();
        let mut seen = HashSet::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                for player in [Player::Red, Player::Yellow] {
                    let k = keys.key(row, col, player);
                    assert_ne!(k, 0);
                    assert!(seen.insert(k), "duplicate key at ({row}, {col})");
                }
            }
        }
        assert_eq!(seen.len(), ROWS * COLS * 2);
    }

    #[test]
    fn same_seed_same_keys() {
        let a = ZobristKeys::new(42);
        let b = ZobristKeys::new(42);
        let c = ZobristKeys::new(43);
        assert_eq!(a.key(3, 4, Player::Red), b.key(3, 4, Player::Red));
        assert_ne!(a.key(3, 4, Player::Red), c.key(3, 4, Player::Red));
    }

    #[test]
    fn empty_board_hashes_to_zero() {
        assert_eq!(ZobristKeys::default().hash(&Board::new()), 0);
    }

    #[test]
    fn xor_is_self_inverse() {
        let keys = ZobristKeys::default();
        let mut board = Board::new();
        board.drop_piece(3, Player::Red).unwrap();
        let base = keys.hash(&board);

        let row = board.drop_piece(2, Player::Yellow).unwrap();
        let with_piece = base ^ keys.key(row, 2, Player::Yellow);
        assert_eq!(with_piece, keys.hash(&board));

        board.remove_piece(2);
        assert_eq!(with_piece ^ keys.key(row, 2, Player::Yellow), base);
        assert_eq!(keys.hash(&board), base);
    }

    #[test]
    fn drops_commute() {
        let keys = ZobristKeys::default();

        let mut a = Board::new();
        a.drop_piece(0, Player::Red).unwrap();
        a.drop_piece(6, Player::Yellow).unwrap();
        a.drop_piece(5, Player::Red).unwrap();

        let mut b = Board::new();
        b.drop_piece(5, Player::Red).unwrap();
        b.drop_piece(6, Player::Yellow).unwrap();
        b.drop_piece(0, Player::Red).unwrap();

        assert_eq!(a, b);
        assert_eq!(keys.hash(&a), keys.hash(&b));
    }

    #[test]
    fn colors_hash_differently() {
        let keys = ZobristKeys::default();
        let red = Board::new().dropped(3, Player::Red).unwrap().0;
        let yellow = Board::new().dropped(3, Player::Yellow).unwrap().0;
        assert_ne!(keys.hash(&red), keys.hash(&yellow));
    }
}
