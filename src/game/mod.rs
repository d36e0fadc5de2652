//! Core Connect Four game logic: board representation, line tables, player
//! types, and a small immutable game state used by the front end.

mod board;
mod player;
mod state;

pub use board::{
    row_from_bottom, Board, Cell, Line, WinLine, COLS, LINES, LINE_COUNT, MOVE_ORDER, ROWS,
};
pub use player::Player;
pub use state::{GameOutcome, GameState};
