//! # Connect Four Engine
//!
//! A Connect Four move-selection engine with five skill tiers, from a
//! deliberately weak beginner to a near-optimal expert. Moves are chosen by
//! negamax with alpha-beta pruning and iterative deepening over a
//! Zobrist-hashed transposition table, with an opening book and a
//! parity-based threat evaluator for the strongest tier.
//!
//! ## Modules
//!
//! - [`game`]: Board, players, win and draw detection, game state
//! - [`ai`]: Engine, search, evaluation, move ordering, opening book, tiers
//! - [`worker`]: Background search thread with request/response ids
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod worker;
