//! Move ordering for alpha-beta search.
//!
//! Inside the tree the fixed center-out order is used, with the cached best
//! move pulled to the front. At the root of the strongest tier the
//! candidates are re-scored by what each move does to the groups through
//! its landing cell.

use crate::game::{Board, Player, COLS, LINES, MOVE_ORDER};

use super::strategic::{favors, first_mover};

const CENTER_WEIGHT: i32 = 4;
const PARITY_BONUS: i32 = 3;
/// Indexed by how many of the mover's pieces the line already holds.
const ADVANCE: [i32; 4] = [1, 4, 16, 1_000];
/// Indexed by how many opponent pieces the line already holds.
const BLOCK: [i32; 4] = [0, 2, 12, 500];

/// `MOVE_ORDER` with `first` moved to the front when present.
pub fn with_first(first: Option<usize>) -> [usize; COLS] {
    let mut order = MOVE_ORDER;
    if let Some(col) = first {
        promote(&mut order, col);
    }
    order
}

/// Move `col` to the front of a candidate list, keeping the rest in order.
pub fn promote(order: &mut [usize], col: usize) {
    if let Some(pos) = order.iter().position(|&c| c == col) {
        order[..=pos].rotate_right(1);
    }
}

/// Score of playing `col` for `player`, or `None` if the column is full.
pub fn threat_move_score(board: &Board, player: Player, col: usize) -> Option<i32> {
    let row = board.landing_row(col)?;
    let first = first_mover(board, player);
    let own_cell = player.to_cell();
    let opp_cell = player.other().to_cell();

    let center = (COLS / 2) as i32;
    let mut score = (center - (col as i32 - center).abs()) * CENTER_WEIGHT;
    if favors(row, player, first) {
        score += PARITY_BONUS;
    }

    for line in LINES.iter().filter(|line| line.contains(&(row, col))) {
        let mut own = 0;
        let mut opp = 0;
        for &(r, c) in line {
            let cell = board.get(r, c);
            if cell == own_cell {
                own += 1;
            } else if cell == opp_cell {
                opp += 1;
            }
        }
        if opp == 0 {
            score += ADVANCE[own];
        } else if own == 0 {
            score += BLOCK[opp];
        }
    }

    Some(score)
}

/// Legal columns sorted by `threat_move_score`, best first. Ties keep the
/// center-out order.
pub fn threat_order(board: &Board, player: Player) -> Vec<usize> {
    let mut scored: Vec<(usize, i32)> = board
        .legal_columns()
        .into_iter()
        .filter_map(|col| threat_move_score(board, player, col).map(|s| (col, s)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(col, _)| col).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_first_moves_column_to_front() {
        assert_eq!(with_first(None), MOVE_ORDER);
        assert_eq!(with_first(Some(0)), [0, 3, 2, 4, 1, 5, 6]);
        assert_eq!(with_first(Some(3)), MOVE_ORDER);
    }

    #[test]
    fn promote_keeps_remaining_order() {
        let mut order = vec![3, 2, 4, 1];
        promote(&mut order, 4);
        assert_eq!(order, vec![4, 3, 2, 1]);
        promote(&mut order, 9);
        assert_eq!(order, vec![4, 3, 2, 1]);
    }

    #[test]
    fn empty_board_orders_center_out() {
        let order = threat_order(&Board::new(), Player::Red);
        assert_eq!(order[0], 3);
        assert_eq!(order.len(), COLS);
    }

    #[test]
    fn blocking_three_ranks_first() {
        // Yellow has three on the bottom row; Red must take column 3.
        let board = Board::from_rows(&[
            ".......", ".......", ".......", "R......", "R......", "YYY..R.",
        ])
        .unwrap();
        assert_eq!(threat_order(&board, Player::Red)[0], 3);
    }

    #[test]
    fn full_columns_are_skipped() {
        let board = Board::from_rows(&[
            "...Y...", "...R...", "...Y...", "...R...", "...Y...", "...R...",
        ])
        .unwrap();
        let order = threat_order(&board, Player::Red);
        assert!(!order.contains(&3));
        assert_eq!(order.len(), COLS - 1);
        assert_eq!(threat_move_score(&board, Player::Red, 3), None);
    }
}
