//! Opening book for the first few plies.
//!
//! Positions are stored as if Red moved first. A board where Yellow moved
//! first is looked up with its colors swapped; the reply column does not
//! depend on color.

use std::collections::HashMap;

use crate::game::{Board, Player, COLS};

use super::strategic::first_mover;
use super::tier::TierConfig;

/// The book is consulted only while fewer pieces than this are on the board.
pub const BOOK_MAX_PIECES: usize = 4;

const CENTER: usize = COLS / 2;

/// Move sequences from the empty board, first mover first, and the reply.
///
/// Two- and three-ply replies are solved win/draw/loss values, ties going
/// to the most central column.
const LINES: &[(&[usize], usize)] = &[
    (&[], CENTER),
    (&[0], CENTER),
    (&[1], CENTER),
    (&[2], CENTER),
    (&[3], CENTER),
    (&[4], CENTER),
    (&[5], CENTER),
    (&[6], CENTER),
    (&[3, 0], 3),
    (&[3, 1], 1),
    (&[3, 2], 5),
    (&[3, 3], 3),
    (&[0, 3], 3),
    (&[1, 3], 3),
    (&[2, 3], 3),
    (&[3, 3, 0], 3),
    (&[3, 3, 1], 2),
    (&[3, 3, 2], 4),
    (&[3, 3, 3], 3),
    (&[3, 2, 0], 3),
    (&[3, 2, 1], 3),
    (&[3, 2, 2], 2),
    (&[3, 2, 3], 3),
    (&[3, 2, 4], 3),
    (&[3, 2, 5], 3),
    (&[3, 2, 6], 3),
];

pub struct OpeningBook {
    replies: HashMap<Board, usize>,
}

impl OpeningBook {
    pub fn new() -> Self {
        let mut replies = HashMap::new();
        for &(moves, reply) in LINES {
            if let Some(board) = play_out(moves.iter().copied()) {
                replies.insert(board, reply);
            }
        }
        // Mirror images, without overriding an explicit entry.
        for &(moves, reply) in LINES {
            if let Some(board) = play_out(moves.iter().map(|&c| mirror(c))) {
                replies.entry(board).or_insert(mirror(reply));
            }
        }
        OpeningBook { replies }
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    /// Book reply for `player` to move on `board`, or `None` when the tier
    /// does not use the book or the opening is over. Positions missing from
    /// the table get the most central open column.
    pub fn lookup(&self, board: &Board, player: Player, tier: &TierConfig) -> Option<usize> {
        if !tier.opening_book || board.piece_count() >= BOOK_MAX_PIECES {
            return None;
        }

        let normalized = match first_mover(board, player) {
            Player::Red => *board,
            Player::Yellow => board.swapped_colors(),
        };
        match self.replies.get(&normalized) {
            Some(&col) if !board.is_column_full(col) => Some(col),
            _ => board.legal_columns().first().copied(),
        }
    }
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self::new()
    }
}

fn mirror(col: usize) -> usize {
    COLS - 1 - col
}

fn play_out(moves: impl Iterator<Item = usize>) -> Option<Board> {
    let mut board = Board::new();
    let mut player = Player::Red;
    for col in moves {
        board.drop_piece(col, player).ok()?;
        player = player.other();
    }
    Some(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::tier::Tier;

    fn board(moves: &[usize]) -> Board {
        play_out(moves.iter().copied()).unwrap()
    }

    #[test]
    fn book_contains_lines_and_mirrors() {
        let book = OpeningBook::new();
        assert!(!book.is_empty());
        assert_eq!(book.replies.get(&board(&[3, 2])), Some(&5));
        // "32" mirrored is "34", answered on the mirrored side
        assert_eq!(book.replies.get(&board(&[3, 4])), Some(&1));
        assert_eq!(book.replies.get(&board(&[3, 3, 4])), Some(&2));
        // "3" mirrors onto itself and is not duplicated
        assert!(book.len() < 2 * LINES.len());
    }

    #[test]
    fn center_reply_to_every_opening_move() {
        let book = OpeningBook::new();
        let config = Tier::Expert.default_config();
        for col in 0..COLS {
            assert_eq!(
                book.lookup(&board(&[col]), Player::Yellow, &config),
                Some(CENTER),
                "reply to opening at column {col}"
            );
        }
    }

    #[test]
    fn empty_board_opens_center() {
        let book = OpeningBook::new();
        let config = Tier::Hard.default_config();
        assert_eq!(book.lookup(&Board::new(), Player::Red, &config), Some(CENTER));
        assert_eq!(book.lookup(&Board::new(), Player::Yellow, &config), Some(CENTER));
    }

    #[test]
    fn disabled_for_non_book_tiers() {
        let book = OpeningBook::new();
        for tier in [Tier::Beginner, Tier::Easy, Tier::Medium] {
            let config = tier.default_config();
            assert_eq!(book.lookup(&Board::new(), Player::Red, &config), None);
            assert_eq!(book.lookup(&board(&[3]), Player::Yellow, &config), None);
        }
    }

    #[test]
    fn disabled_past_piece_threshold() {
        let book = OpeningBook::new();
        let config = Tier::Expert.default_config();
        let position = board(&[3, 3, 3, 2]);
        assert_eq!(position.piece_count(), BOOK_MAX_PIECES);
        assert_eq!(book.lookup(&position, Player::Red, &config), None);
    }

    #[test]
    fn yellow_first_positions_are_normalized() {
        let book = OpeningBook::new();
        let config = Tier::Expert.default_config();
        // Yellow opened at column 5 and Red, to move, replies.
        let mut position = Board::new();
        position.drop_piece(5, Player::Yellow).unwrap();
        assert_eq!(book.lookup(&position, Player::Red, &config), Some(CENTER));

        // Yellow 3, Red 2, with Yellow to move: the swapped board is "32".
        let mut position = Board::new();
        position.drop_piece(3, Player::Yellow).unwrap();
        position.drop_piece(2, Player::Red).unwrap();
        assert_eq!(book.lookup(&position, Player::Yellow, &config), Some(5));

        // Yellow 3, Red 2, Yellow 3: the swapped board is the "323" line.
        let mut position = Board::new();
        position.drop_piece(3, Player::Yellow).unwrap();
        position.drop_piece(2, Player::Red).unwrap();
        position.drop_piece(3, Player::Yellow).unwrap();
        assert_eq!(book.lookup(&position, Player::Red, &config), Some(CENTER));
    }

    #[test]
    fn table_replies_can_leave_the_center() {
        let book = OpeningBook::new();
        let config = Tier::Expert.default_config();
        for (moves, player, expected) in [
            (&[3, 2][..], Player::Red, 5),
            (&[3, 1][..], Player::Red, 1),
            (&[3, 4][..], Player::Red, 1),
            (&[3, 3, 2][..], Player::Yellow, 4),
            (&[3, 3, 1][..], Player::Yellow, 2),
            (&[3, 2, 2][..], Player::Yellow, 2),
        ] {
            let position = board(moves);
            let fallback = position.legal_columns()[0];
            assert_ne!(expected, fallback, "{moves:?}");
            assert_eq!(book.lookup(&position, player, &config), Some(expected), "{moves:?}");
        }
    }

    #[test]
    fn off_book_positions_fall_back_to_center() {
        let book = OpeningBook::new();
        let config = Tier::Hard.default_config();
        // Off-book opening pair.
        assert_eq!(book.lookup(&board(&[0, 6]), Player::Red, &config), Some(CENTER));
        assert_eq!(book.lookup(&board(&[0, 6, 1]), Player::Yellow, &config), Some(CENTER));
    }
}
