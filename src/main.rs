use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use connect_four_engine::ai::{Engine, Tier};
use connect_four_engine::config::EngineConfig;
use connect_four_engine::game::{GameOutcome, GameState, Player, COLS};

/// Play Connect Four against the engine or pit tiers against each other.
#[derive(Parser)]
#[command(name = "connect-four", about = "Connect Four engine with five skill tiers")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, default_value = "engine.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play against the engine in the terminal
    Play {
        /// Engine tier: beginner, easy, medium, hard or expert
        #[arg(long, default_value = "medium")]
        tier: Tier,

        /// Let the engine make the first move
        #[arg(long)]
        engine_first: bool,
    },
    /// Play one tier against another and report the results
    Match {
        /// Tier that moves first in odd-numbered games
        #[arg(long)]
        first: Tier,

        /// Tier that moves first in even-numbered games
        #[arg(long)]
        second: Tier,

        /// Number of games to play
        #[arg(long, default_value_t = 10)]
        games: usize,
    },
    /// Print the default configuration as TOML
    DefaultConfig,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Play { tier, engine_first } => {
            let config = load_config(&cli.config)?;
            play(Engine::new(config), tier, engine_first)
        }
        Command::Match {
            first,
            second,
            games,
        } => {
            if games == 0 {
                bail!("--games must be at least 1");
            }
            let config = load_config(&cli.config)?;
            run_match(&config, first, second, games)
        }
        Command::DefaultConfig => {
            print!("{}", EngineConfig::default_toml());
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    EngineConfig::load_or_default(path)
        .with_context(|| format!("loading config from {}", path.display()))
}

fn play(mut engine: Engine, tier: Tier, engine_first: bool) -> Result<()> {
    let engine_player = if engine_first { Player::Red } else { Player::Yellow };
    let mut state = GameState::initial();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!(
        "You are {}. Enter a column from 1 to {COLS}, or q to quit.",
        engine_player.other().name()
    );

    while !state.is_terminal() {
        println!("\n{}", state.board());

        let column = if state.current_player() == engine_player {
            let col = engine
                .select_move(state.board(), engine_player, tier)
                .context("engine failed to choose a move")?;
            println!("Engine ({tier}) plays {}", col + 1);
            col
        } else {
            print!("Your move: ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            let line = line?;
            let input = line.trim();
            if input.eq_ignore_ascii_case("q") {
                return Ok(());
            }
            match input.parse::<usize>() {
                Ok(n) if (1..=COLS).contains(&n) => n - 1,
                _ => {
                    println!("Please enter a number from 1 to {COLS}.");
                    continue;
                }
            }
        };

        match state.apply_move(column) {
            Ok(next) => state = next,
            Err(e) => println!("Illegal move: {e}"),
        }
    }

    println!("\n{}", state.board());
    match state.outcome() {
        Some(GameOutcome::Winner(p)) if p == engine_player => println!("The engine wins."),
        Some(GameOutcome::Winner(_)) => println!("You win!"),
        _ => println!("Draw."),
    }
    Ok(())
}

#[derive(Debug, Default)]
struct MatchTally {
    wins: [u64; 2],
    draws: u64,
}

fn run_match(config: &EngineConfig, first: Tier, second: Tier, games: usize) -> Result<()> {
    let tiers = [first, second];
    let mut engines = [Engine::new(config.clone()), Engine::new(config.clone())];
    let mut tally = MatchTally::default();

    for game in 0..games {
        // Alternate which side opens.
        let red = game % 2;
        let mut state = GameState::initial();
        for engine in engines.iter_mut() {
            engine.new_game();
        }

        while !state.is_terminal() {
            let side = if state.current_player() == Player::Red { red } else { 1 - red };
            let col = engines[side]
                .select_move(state.board(), state.current_player(), tiers[side])
                .with_context(|| format!("game {}: {} failed to move", game + 1, tiers[side]))?;
            state = state.apply_move(col)?;
        }

        let result = match state.outcome() {
            Some(GameOutcome::Winner(p)) => {
                let side = if p == Player::Red { red } else { 1 - red };
                tally.wins[side] += 1;
                format!("{} wins", tiers[side])
            }
            _ => {
                tally.draws += 1;
                "draw".to_string()
            }
        };
        println!("game {:>3}: {} opens, {result}", game + 1, tiers[red]);
    }

    println!(
        "\n{first}: {} wins, {second}: {} wins, {} draws",
        tally.wins[0], tally.wins[1], tally.draws
    );
    Ok(())
}
