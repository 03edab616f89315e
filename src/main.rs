//! Terminal front-end for the rules engine.
//!
//! Usage:
//!   cargo run -- play
//!   cargo run -- play --fen "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"
//!   cargo run -- perft --depth 3 --divide
//!   cargo run -- moves e2
//!
//! In `play`, enter moves as `e2e4` (or `e2 e4`), optionally with a promotion
//! letter (`a7a8n`). Other commands: `moves <square>`, `board`, `fen`,
//! `history`, `help`, `quit`.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Result, WrapErr};

use chess_rules::perft::{divide, perft};
use chess_rules::{Game, PieceType, Square, Status};

#[derive(Parser, Debug)]
#[command(name = "chess_rules")]
#[command(about = "Play and inspect standard chess positions")]
struct Args {
    /// Log filter, e.g. `chess_rules=debug` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game on the terminal, both sides from the keyboard
    Play {
        /// Start from this FEN instead of the initial position
        #[arg(long)]
        fen: Option<String>,

        /// Draw pieces as letters instead of Unicode glyphs
        #[arg(long)]
        ascii: bool,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        #[arg(short, long, default_value_t = 3)]
        depth: u8,

        #[arg(long)]
        fen: Option<String>,

        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// List the legal moves of the piece on a square
    Moves {
        square: String,

        #[arg(long)]
        fen: Option<String>,
    },
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "chess_rules=info".into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_game(fen: Option<&str>) -> Result<Game> {
    match fen {
        Some(fen) => Game::new_from_fen(fen).wrap_err("could not load position"),
        None => Ok(Game::new()),
    }
}

/// Parse `e2e4`, `e2 e4` or `a7a8q`.
fn parse_move_input(input: &str) -> Result<(Square, Square, Option<PieceType>)> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if !compact.is_ascii() || (compact.len() != 4 && compact.len() != 5) {
        bail!("expected a move like e2e4, got {input:?}");
    }
    let from = Square::from_algebraic(&compact[0..2])?;
    let to = Square::from_algebraic(&compact[2..4])?;
    let promotion = compact.get(4..).filter(|s| !s.is_empty()).map(PieceType::from_promotion_choice);
    Ok((from, to, promotion))
}

fn prompt(stdin: &mut impl BufRead, text: &str) -> Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;
    let mut line = String::new();
    if stdin.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_moves(game: &Game, square: &str) -> Result<()> {
    let from = Square::from_algebraic(square)?;
    let moves = game.legal_moves(from);
    if moves.is_empty() {
        println!("no legal moves from {from}");
    } else {
        let list: Vec<String> = moves.iter().map(|m| m.to.to_algebraic()).collect();
        println!("{from}: {}", list.join(" "));
    }
    Ok(())
}

fn announce(game: &Game, status: Status) {
    let side = game.side_to_move();
    match status {
        Status::Checkmate => println!("Checkmate! {} wins.", side.other_color().to_human()),
        Status::Stalemate => println!("Stalemate! The game is drawn."),
        Status::Check => println!("Check!"),
        Status::None => {}
    }
}

fn play(fen: Option<&str>, ascii: bool) -> Result<()> {
    let mut game = load_game(fen)?;
    let stdin = io::stdin();
    let mut stdin = stdin.lock();

    println!("{}", game.board().draw_board(!ascii));
    announce(&game, game.status());

    loop {
        let text = format!("{} to move> ", game.side_to_move().to_human());
        let Some(line) = prompt(&mut stdin, &text)? else {
            break;
        };
        let mut words = line.split_whitespace();
        match words.next() {
            None => continue,
            Some("quit") | Some("exit") => break,
            Some("help") => {
                println!("e2e4 | e2 e4 | a7a8n | moves <square> | board | fen | history | quit")
            }
            Some("board") => println!("{}", game.board().draw_board(!ascii)),
            Some("fen") => println!("{}", game.fen()),
            Some("history") => println!("{}", game.move_list()),
            Some("moves") => match words.next() {
                Some(square) => {
                    if let Err(e) = print_moves(&game, square) {
                        println!("{e}");
                    }
                }
                None => println!("usage: moves <square>"),
            },
            Some(_) => {
                let (from, to, mut promotion) = match parse_move_input(&line) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                if promotion.is_none() && game.is_promotion(from, to) {
                    let answer = prompt(&mut stdin, "Promote to (Q, R, B, N): ")?;
                    promotion = Some(PieceType::from_promotion_choice(
                        answer.as_deref().unwrap_or(""),
                    ));
                }
                match game.play_move(from, to, promotion) {
                    Ok(status) => {
                        println!("{}", game.board().draw_board(!ascii));
                        announce(&game, status);
                        if status.is_game_over() {
                            println!("{}", game.move_list());
                            break;
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }
        }
    }
    Ok(())
}

fn run_perft(fen: Option<&str>, depth: u8, split: bool) -> Result<()> {
    let game = load_game(fen)?;
    let start = Instant::now();
    let nodes = if split {
        let mut counts = divide(game.board(), game.side_to_move(), depth);
        counts.sort_by_key(|(m, _)| m.to_algebraic());
        for (m, n) in &counts {
            println!("{m}: {n}");
        }
        counts.iter().map(|(_, n)| n).sum()
    } else {
        perft(game.board(), game.side_to_move(), depth)
    };
    let elapsed = start.elapsed();
    println!("depth {depth}: {nodes} nodes ({:.3}s)", elapsed.as_secs_f64());
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    match args.command {
        Command::Play { fen, ascii } => play(fen.as_deref(), ascii),
        Command::Perft { depth, fen, divide } => run_perft(fen.as_deref(), depth, divide),
        Command::Moves { square, fen } => {
            let game = load_game(fen.as_deref())?;
            print_moves(&game, &square)
        }
    }
}
