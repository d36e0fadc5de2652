use crate::game::{Board, Player};

use super::cache::{Bound, CacheEntry, TranspositionTable};
use super::heuristic::Heuristic;
use super::ordering::{promote, with_first};
use super::zobrist::ZobristKeys;

/// Base magnitude of a forced win. Terminal scores add the remaining depth
/// so faster wins and slower losses are preferred.
pub const WIN_SCORE: i32 = 1_000_000;
const INFINITY: i32 = 10 * WIN_SCORE;

/// Outcome of the deepest completed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub column: usize,
    pub score: i32,
    pub depth: usize,
    pub nodes: u64,
}

impl SearchResult {
    /// True if the score proves a win or loss within the searched depth.
    pub fn is_decisive(&self) -> bool {
        self.score.abs() >= WIN_SCORE
    }
}

/// Negamax with alpha-beta pruning over a private working copy of the board.
///
/// The caller's board is copied on construction; moves are made and unmade
/// in place on the copy, and the position hash is updated incrementally.
pub struct Searcher<'a> {
    board: Board,
    keys: &'a ZobristKeys,
    cache: &'a mut TranspositionTable,
    heuristic: &'a dyn Heuristic,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(
        board: &Board,
        keys: &'a ZobristKeys,
        cache: &'a mut TranspositionTable,
        heuristic: &'a dyn Heuristic,
    ) -> Self {
        Searcher {
            board: *board,
            keys,
            cache,
            heuristic,
            nodes: 0,
        }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Search depth 1, 2, ... up to `max_depth`, trying each iteration's
    /// best move first in the next. `root_order` lists the candidate
    /// columns; it must contain only legal columns. Returns `None` when
    /// there is nothing to search.
    pub fn iterative_deepening(
        &mut self,
        player: Player,
        max_depth: usize,
        mut root_order: Vec<usize>,
    ) -> Option<SearchResult> {
        if root_order.is_empty() || max_depth == 0 {
            return None;
        }

        let hash = self.keys.hash(&self.board);
        let mut best = None;

        for depth in 1..=max_depth {
            let (column, score) = self.search_root(player, depth, &root_order, hash);
            let result = SearchResult {
                column,
                score,
                depth,
                nodes: self.nodes,
            };
            log::debug!(
                "depth {depth}: best column {column}, score {score}, {} nodes, {} cached",
                self.nodes,
                self.cache.len()
            );
            best = Some(result);

            if result.is_decisive() {
                break;
            }
            promote(&mut root_order, column);
        }

        best
    }

    fn search_root(
        &mut self,
        player: Player,
        depth: usize,
        order: &[usize],
        hash: u64,
    ) -> (usize, i32) {
        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best_col = order[0];
        let mut best = -INFINITY;

        for &col in order {
            let Ok(row) = self.board.drop_piece(col, player) else {
                continue;
            };
            let child_hash = hash ^ self.keys.key(row, col, player);
            let score =
                -self.negamax(depth - 1, -beta, -alpha, player.other(), child_hash, Some((row, col)));
            self.board.remove_piece(col);

            if score > best {
                best = score;
                best_col = col;
            }
            alpha = alpha.max(score);
        }

        self.cache.set(
            hash,
            CacheEntry {
                depth,
                score: best,
                bound: Bound::Exact,
                best_move: Some(best_col),
            },
        );
        (best_col, best)
    }

    /// Score of the current position for `player`, who is to move.
    /// `last_move` is the cell filled by the move that led here.
    fn negamax(
        &mut self,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        player: Player,
        hash: u64,
        last_move: Option<(usize, usize)>,
    ) -> i32 {
        self.nodes += 1;

        // The opponent just moved; only their piece can have completed a line.
        if let Some((row, col)) = last_move {
            if self.board.check_win(row, col) {
                return -(WIN_SCORE + depth as i32);
            }
        }
        if self.board.is_draw() {
            return 0;
        }
        if depth == 0 {
            return self.heuristic.evaluate(&self.board, player);
        }

        let mut cached_move = None;
        if let Some(entry) = self.cache.get(hash) {
            cached_move = entry.best_move;
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return entry.score,
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    return entry.score;
                }
            }
        }

        let alpha_start = alpha;
        let mut best = -INFINITY;
        let mut best_move = None;

        for col in with_first(cached_move) {
            let Ok(row) = self.board.drop_piece(col, player) else {
                continue;
            };
            let child_hash = hash ^ self.keys.key(row, col, player);
            let score =
                -self.negamax(depth - 1, -beta, -alpha, player.other(), child_hash, Some((row, col)));
            self.board.remove_piece(col);

            if score > best {
                best = score;
                best_move = Some(col);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        let bound = if best <= alpha_start {
            Bound::Upper
        } else if best >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.cache.set(
            hash,
            CacheEntry {
                depth,
                score: best,
                bound,
                best_move,
            },
        );

        best
    }
}
