//! CLI entry point for the squares solver.
//!
//! Usage:
//!   squares-solver solve <puzzle.json> [options]
//!   squares-solver solve --stdin [options]
//!   squares-solver solve --builtin <name> [options]
//!   squares-solver list
//!
//! Options:
//!   --depth <n>          Maximum number of moves (default: 50)
//!   --push-rule <rule>   same-color (default) or chain-only
//!   -v, -vv, -vvv        Log progress to stderr

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::TimestampPrecision;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use squares_solver::{
    catalog, solve_with_config, Color, LoadError, Puzzle, PuzzleError, PushRule, Solution,
    SolveError, SolverConfig, DEFAULT_DEPTH,
};

#[derive(Parser)]
#[command(name = "squares-solver")]
#[command(about = "Shortest-move solver for game-about-squares puzzles")]
#[command(version)]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a shortest sequence of pushes that solves a puzzle
    Solve {
        /// Path to puzzle JSON file
        #[arg(value_name = "FILE", conflicts_with_all = ["stdin", "builtin"])]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long, conflicts_with = "builtin")]
        stdin: bool,

        /// Solve one of the built-in puzzles (see `list`)
        #[arg(long, value_name = "NAME")]
        builtin: Option<String>,

        /// Maximum number of moves
        #[arg(long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,

        /// Which tokens a push carries along
        #[arg(long, value_enum, default_value_t = PushRule::SameColor)]
        push_rule: PushRule,
    },
    /// List the built-in puzzles
    List,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to read from stdin: {0}")]
    Stdin(io::Error),
    #[error("Must provide a file path, --stdin or --builtin")]
    NoInput,
    #[error("Unknown built-in puzzle {0:?}")]
    UnknownBuiltin(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Output format for a solve attempt
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    puzzle: String,
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    moves: Vec<Color>,
    move_names: Vec<String>,
    depth: usize,
    search_exhausted: bool,
    states_explored: usize,
    time_elapsed_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListEntry {
    name: String,
    tokens: usize,
    width: usize,
    height: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let outcome = run(cli.command);
    if let Err(e) = &outcome {
        eprintln!("Error: {e}");
    }
    ExitCode::from(exit_status(&outcome))
}

/// 0 when solved, 1 when the search gave up, 2 on bad input
fn exit_status(outcome: &Result<bool, CliError>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// Returns whether the command succeeded
fn run(command: Commands) -> Result<bool, CliError> {
    match command {
        Commands::Solve {
            file,
            stdin,
            builtin,
            depth,
            push_rule,
        } => {
            let puzzle = load_puzzle(file, stdin, builtin)?;
            let config = SolverConfig {
                max_depth: depth,
                push_rule,
            };

            let output = format_result(&puzzle, &config, solve_with_config(&puzzle, &config));
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(output.solved)
        }
        Commands::List => {
            let mut entries = Vec::new();
            for name in catalog::names() {
                let Some(puzzle) = catalog::builtin(name) else {
                    continue;
                };
                let puzzle = puzzle?;
                entries.push(ListEntry {
                    name: name.to_string(),
                    tokens: puzzle.initial.len(),
                    width: puzzle.board.width(),
                    height: puzzle.board.height(),
                });
            }
            println!("{}", serde_json::to_string_pretty(&entries)?);
            Ok(true)
        }
    }
}

fn load_puzzle(
    file: Option<PathBuf>,
    stdin: bool,
    builtin: Option<String>,
) -> Result<Puzzle, CliError> {
    if let Some(name) = builtin {
        return match catalog::builtin(&name) {
            Some(puzzle) => Ok(puzzle?),
            None => Err(CliError::UnknownBuiltin(name)),
        };
    }

    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(CliError::Stdin)?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path).map_err(|source| CliError::Read { path, source })?
    } else {
        return Err(CliError::NoInput);
    };

    Ok(Puzzle::from_json(&json_content)?)
}

fn format_result(
    puzzle: &Puzzle,
    config: &SolverConfig,
    result: Result<Solution, SolveError>,
) -> SolveOutput {
    match result {
        Ok(solution) => SolveOutput {
            puzzle: puzzle.display_name().to_string(),
            solved: true,
            reason: None,
            move_names: solution
                .moves
                .iter()
                .map(|&color| puzzle.color_name(color).to_string())
                .collect(),
            moves: solution.moves,
            depth: config.max_depth,
            search_exhausted: false,
            states_explored: solution.states_explored,
            time_elapsed_ms: solution.time_elapsed_ms,
        },
        Err(e) => {
            let SolveError::Unsolved {
                states_explored,
                exhausted,
                time_elapsed_ms,
                ..
            } = e;
            SolveOutput {
                puzzle: puzzle.display_name().to_string(),
                solved: false,
                reason: Some(e.to_string()),
                moves: Vec::new(),
                move_names: Vec::new(),
                depth: config.max_depth,
                search_exhausted: exhausted,
                states_explored,
                time_elapsed_ms,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squares_solver::{Board, Cell, Direction, Token};

    fn create_corridor_puzzle() -> Puzzle {
        let board = Board::new(vec![vec![Cell::Empty, Cell::Empty, Cell::Target(1)]]);
        Puzzle::new(board, &[Token::new(1, 0, 0, Direction::Right)])
            .unwrap()
            .with_name("corridor")
    }

    #[test]
    fn test_format_solved() {
        let puzzle = create_corridor_puzzle();
        let config = SolverConfig::default();
        let output = format_result(&puzzle, &config, solve_with_config(&puzzle, &config));

        assert!(output.solved);
        assert_eq!(output.moves, vec![1, 1]);
        assert_eq!(output.move_names, vec!["Red", "Red"]);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["puzzle"], "corridor");
        assert_eq!(json["moveNames"][0], "Red");
        assert_eq!(json["depth"], DEFAULT_DEPTH);
        assert_eq!(json["searchExhausted"], false);
        assert!(json.get("reason").is_none());
        assert!(json.get("statesExplored").is_some());
        assert!(json.get("timeElapsedMs").is_some());
    }

    #[test]
    fn test_format_unsolved() {
        let puzzle = create_corridor_puzzle();
        let config = SolverConfig {
            max_depth: 1,
            ..Default::default()
        };
        let output = format_result(&puzzle, &config, solve_with_config(&puzzle, &config));

        assert!(!output.solved);
        assert!(output.moves.is_empty());
        assert!(!output.search_exhausted);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["solved"], false);
        assert_eq!(json["depth"], 1);
        assert!(json["reason"].as_str().unwrap().contains("depth 1"));
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(&Ok(true)), 0);
        assert_eq!(exit_status(&Ok(false)), 1);
        assert_eq!(exit_status(&Err(CliError::NoInput)), 2);
        assert_eq!(
            exit_status(&Err(CliError::UnknownBuiltin("99".to_string()))),
            2
        );
    }

    #[test]
    fn test_cli_parses_push_rule() {
        let cli = Cli::try_parse_from([
            "squares-solver",
            "solve",
            "--builtin",
            "31",
            "--push-rule",
            "chain-only",
        ])
        .unwrap();
        match cli.command {
            Commands::Solve { push_rule, depth, .. } => {
                assert_eq!(push_rule, PushRule::ChainOnly);
                assert_eq!(depth, DEFAULT_DEPTH);
            }
            Commands::List => panic!("expected solve"),
        }
    }
}
