use crate::game::{Board, Player, COLS, LINES, ROWS};

use super::strategic;

/// Trait for evaluating a board position from a player's perspective.
/// Higher scores favor `player`.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, player: Player) -> i32;
}

/// Score of a window holding four of the player's pieces.
pub const WIN_WINDOW: i32 = 100_000;
pub const THREE_OPEN: i32 = 5;
pub const TWO_OPEN: i32 = 2;
pub const OPPONENT_THREE_OPEN: i32 = -4;
pub const CENTER_PIECE: i32 = 3;

/// Default heuristic that scans all 4-cell windows and scores threats.
pub struct ConnectFourHeuristic;

impl ConnectFourHeuristic {
    fn score_window(own: usize, opp: usize, empty: usize) -> i32 {
        if own == 4 {
            WIN_WINDOW
        } else if own == 3 && empty == 1 {
            THREE_OPEN
        } else if own == 2 && empty == 2 {
            TWO_OPEN
        } else if opp == 3 && empty == 1 {
            OPPONENT_THREE_OPEN
        } else {
            0
        }
    }
}

impl Heuristic for ConnectFourHeuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        let own_cell = player.to_cell();
        let opp_cell = player.other().to_cell();
        let mut score = 0;

        // Center column bonus
        let center = COLS / 2;
        for row in 0..ROWS {
            if board.get(row, center) == own_cell {
                score += CENTER_PIECE;
            }
        }

        for line in LINES.iter() {
            let mut own = 0;
            let mut opp = 0;
            let mut empty = 0;
            for &(row, col) in line {
                match board.get(row, col) {
                    c if c == own_cell => own += 1,
                    c if c == opp_cell => opp += 1,
                    _ => empty += 1,
                }
            }
            score += Self::score_window(own, opp, empty);
        }

        score
    }
}

/// Window heuristic plus the parity/zugzwang threat rules.
pub struct StrategicHeuristic;

impl Heuristic for StrategicHeuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        ConnectFourHeuristic.evaluate(board, player) + strategic::threat_score(board, player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_empty_board_is_zero() {
        let board = Board::new();
        let h = ConnectFourHeuristic;
        assert_eq!(h.evaluate(&board, Player::Red), 0);
        assert_eq!(h.evaluate(&board, Player::Yellow), 0);
        assert_eq!(StrategicHeuristic.evaluate(&board, Player::Red), 0);
    }

    #[test]
    fn heuristic_center_preference() {
        let h = ConnectFourHeuristic;
        // Board with one red piece in center
        let mut board_center = Board::new();
        board_center.drop_piece(3, Player::Red).unwrap();
        // Board with one red piece on edge
        let mut board_edge = Board::new();
        board_edge.drop_piece(0, Player::Red).unwrap();

        let score_center = h.evaluate(&board_center, Player::Red);
        let score_edge = h.evaluate(&board_edge, Player::Red);
        assert!(
            score_center > score_edge,
            "Center ({score_center}) should score higher than edge ({score_edge})"
        );
    }

    #[test]
    fn heuristic_three_in_a_row_scores_high() {
        let h = ConnectFourHeuristic;
        let mut board = Board::new();
        board.drop_piece(0, Player::Red).unwrap();
        board.drop_piece(1, Player::Red).unwrap();
        board.drop_piece(2, Player::Red).unwrap();
        // Bottom-row windows: cols 0-3 hold three, cols 1-4 hold two.
        assert_eq!(h.evaluate(&board, Player::Red), THREE_OPEN + TWO_OPEN);
        assert_eq!(h.evaluate(&board, Player::Yellow), OPPONENT_THREE_OPEN);
    }

    #[test]
    fn heuristic_four_is_terminal_magnitude() {
        let h = ConnectFourHeuristic;
        let mut board = Board::new();
        for col in 0..4 {
            board.drop_piece(col, Player::Yellow).unwrap();
        }
        assert!(h.evaluate(&board, Player::Yellow) >= WIN_WINDOW);
    }

    #[test]
    fn heuristic_monotonic_in_open_window() {
        let h = ConnectFourHeuristic;
        let mut board = Board::new();
        let mut previous = h.evaluate(&board, Player::Red);
        // Each added piece lands in still-open windows along the bottom row.
        for col in [3, 4, 5] {
            board.drop_piece(col, Player::Red).unwrap();
            let score = h.evaluate(&board, Player::Red);
            assert!(score > previous, "{score} should exceed {previous}");
            previous = score;
        }
    }
}
