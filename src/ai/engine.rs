use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::game::{Board, Player};

use super::book::OpeningBook;
use super::cache::TranspositionTable;
use super::heuristic::{ConnectFourHeuristic, Heuristic, StrategicHeuristic};
use super::negamax::{SearchResult, Searcher};
use super::ordering::threat_order;
use super::tier::{Tier, TierConfig};
use super::zobrist::ZobristKeys;

/// Move selection for all skill tiers.
///
/// One engine plays one game at a time. The transposition table persists
/// across calls so later moves reuse earlier work; it is cleared on
/// [`Engine::new_game`] and whenever the requested tier changes.
///
/// Searched root decisions are remembered per position and side to move
/// until the table is cleared, so asking twice gives the same column no
/// matter what other positions were searched in between.
pub struct Engine {
    config: EngineConfig,
    keys: ZobristKeys,
    cache: TranspositionTable,
    decisions: HashMap<(u64, Player), SearchResult>,
    book: OpeningBook,
    rng: StdRng,
    last_tier: Option<Tier>,
    last_search: Option<SearchResult>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Engine {
            keys: ZobristKeys::new(config.zobrist_seed),
            cache: TranspositionTable::new(config.cache_capacity),
            decisions: HashMap::new(),
            book: OpeningBook::new(),
            rng,
            last_tier: None,
            last_search: None,
            config,
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.decisions.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Forget everything carried over from the previous game.
    pub fn new_game(&mut self) {
        self.clear_cache();
        self.last_tier = None;
        self.last_search = None;
    }

    /// Statistics of the most recent call that ran a search.
    pub fn last_search(&self) -> Option<SearchResult> {
        self.last_search
    }

    /// Pick a column for `player` to play on `board` at the given tier.
    ///
    /// The board is checked first: it must obey gravity, have balanced piece
    /// counts, contain no four in a row and have an open column, and `player`
    /// must not already be a move ahead.
    pub fn select_move(
        &mut self,
        board: &Board,
        player: Player,
        tier: Tier,
    ) -> Result<usize, EngineError> {
        board.validate()?;
        if let Some(win) = board.detect_win() {
            return Err(EngineError::GameOver(win.player));
        }
        if board.count(player) > board.count(player.other()) {
            return Err(EngineError::OutOfTurn(player));
        }
        let legal = board.legal_columns();
        if legal.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        if self.last_tier != Some(tier) {
            if self.last_tier.is_some() {
                log::debug!("tier changed to {tier}, clearing transposition table");
            }
            self.clear_cache();
            self.last_tier = Some(tier);
        }
        let tier_config = *self.config.tier(tier);

        if let Some(col) = winning_column(board, player, &legal) {
            log::info!("{tier}: {} wins at column {col}", player.name());
            return Ok(col);
        }
        if let Some(col) = winning_column(board, player.other(), &legal) {
            log::info!("{tier}: blocking {} at column {col}", player.other().name());
            return Ok(col);
        }
        if let Some(col) = self.book.lookup(board, player, &tier_config) {
            log::info!("{tier}: book move {col}");
            return Ok(col);
        }
        if tier_config.blunder_rate > 0.0
            && self.rng.random_bool(tier_config.blunder_rate.clamp(0.0, 1.0))
        {
            let col = legal[self.rng.random_range(0..legal.len())];
            log::info!("{tier}: random move {col}");
            return Ok(col);
        }

        let col = self.search(board, player, &tier_config, legal);

        if tier_config.safety_check && gifts_win(board, col, player) {
            let alternative = avoid_gift(board, player, col);
            if alternative != col {
                log::info!("{tier}: column {col} hands over a win, playing {alternative}");
            }
            return Ok(alternative);
        }
        Ok(col)
    }

    fn search(
        &mut self,
        board: &Board,
        player: Player,
        tier: &TierConfig,
        legal: Vec<usize>,
    ) -> usize {
        let root = (self.keys.hash(board), player);
        if let Some(&known) = self.decisions.get(&root) {
            log::debug!("reusing root decision: column {}", known.column);
            self.last_search = Some(known);
            return known.column;
        }

        let heuristic: &dyn Heuristic = if tier.strategic {
            &StrategicHeuristic
        } else {
            &ConnectFourHeuristic
        };
        let root_order = if tier.strategic {
            threat_order(board, player)
        } else {
            legal.clone()
        };

        let mut searcher = Searcher::new(board, &self.keys, &mut self.cache, heuristic);
        let result = searcher.iterative_deepening(player, tier.depth, root_order);
        self.last_search = result;
        if let Some(result) = result {
            self.decisions.insert(root, result);
        }

        match result {
            Some(result) => result.column,
            None => legal[0],
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// First column in `candidates` where `player` completes four.
fn winning_column(board: &Board, player: Player, candidates: &[usize]) -> Option<usize> {
    candidates.iter().copied().find(|&col| {
        board
            .dropped(col, player)
            .is_some_and(|(next, row)| next.check_win(row, col))
    })
}

/// True if the opponent can win by playing directly on top of `col`.
pub fn gifts_win(board: &Board, col: usize, player: Player) -> bool {
    let Some((after, _)) = board.dropped(col, player) else {
        return false;
    };
    after
        .dropped(col, player.other())
        .is_some_and(|(reply, row)| reply.check_win(row, col))
}

/// The first center-out column other than `col` that does not gift a win,
/// or `col` itself when every alternative does.
pub fn avoid_gift(board: &Board, player: Player, col: usize) -> usize {
    board
        .legal_columns()
        .into_iter()
        .find(|&alt| alt != col && !gifts_win(board, alt, player))
        .unwrap_or(col)
}
