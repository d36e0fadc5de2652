pub mod book;
pub mod cache;
mod engine;
pub mod heuristic;
pub mod negamax;
pub mod ordering;
pub mod strategic;
pub mod tier;
pub mod zobrist;

pub use book::{OpeningBook, BOOK_MAX_PIECES};
pub use cache::{Bound, CacheEntry, TranspositionTable};
pub use engine::{avoid_gift, gifts_win, Engine};
pub use heuristic::{ConnectFourHeuristic, Heuristic, StrategicHeuristic};
pub use negamax::{SearchResult, Searcher, WIN_SCORE};
pub use strategic::first_mover;
pub use tier::{Tier, TierConfig};
pub use zobrist::ZobristKeys;
