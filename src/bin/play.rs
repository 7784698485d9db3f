use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chess_rules::config::Setup;
use chess_rules::{Game, Square};

/// Two players at one console. Enter moves as `file rank file rank`,
/// e.g. `5 2 5 4`. `moves <file> <rank>` lists where a piece may go,
/// `quit` ends the session.
#[derive(Parser, Debug)]
struct Args {
    /// Start from a JSON setup instead of the standard position.
    #[arg(long)]
    setup: Option<PathBuf>,
    /// Print a JSON snapshot after each accepted move instead of the board.
    #[arg(long)]
    json: bool,
}

fn load(args: &Args) -> Result<Game, Box<dyn std::error::Error>> {
    match &args.setup {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(Game::from_setup(&Setup::from_json(&text)?)?)
        }
        None => Ok(Game::new()),
    }
}

fn numbers(words: &[&str]) -> Option<Vec<i8>> {
    words.iter().map(|w| w.parse().ok()).collect()
}

fn show(game: &Game, json: bool) {
    if json {
        match game.snapshot_json() {
            Ok(text) => println!("{text}"),
            Err(err) => eprintln!("could not serialize snapshot: {err}"),
        }
    } else {
        println!("{}", game.board());
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut game = match load(&args) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("failed to load setup: {err}");
            std::process::exit(1);
        }
    };

    show(&game, args.json);
    let stdin = io::stdin();
    loop {
        let side = game.side_to_move();
        let check = if game.is_in_check(side) { " (check)" } else { "" };
        print!("{side} to move{check}> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["moves", rest @ ..] => match numbers(rest).as_deref() {
                Some(&[file, rank]) => match game.legal_targets(Square::new(file, rank)) {
                    Ok(targets) => {
                        let list: Vec<String> = targets.iter().map(Square::to_string).collect();
                        println!("{}", list.join(" "));
                    }
                    Err(err) => eprintln!("{err}"),
                },
                _ => eprintln!("usage: moves <file> <rank>"),
            },
            _ => match numbers(&words).as_deref() {
                Some(&[ff, fr, tf, tr]) => {
                    match game.request_move(Square::new(ff, fr), Square::new(tf, tr)) {
                        Ok(()) => show(&game, args.json),
                        Err(err) => eprintln!("{err}"),
                    }
                }
                _ => eprintln!("usage: <file> <rank> <file> <rank>"),
            },
        }
    }
}
