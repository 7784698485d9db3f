use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use chess_rules::game::random_move;
use chess_rules::Game;

/// Play random legal moves for both sides and report how the game went.
#[derive(Parser, Debug)]
struct Args {
    /// Maximum number of plies to play.
    #[arg(long, default_value_t = 200)]
    plies: u32,
    /// RNG seed; a random one is used when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Print the board after the last ply.
    #[arg(long)]
    show: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut game = Game::new();
    let mut plies = 0;

    while plies < args.plies {
        let Some(mv) = random_move(&game, &mut rng) else {
            break;
        };
        if let Err(err) = game.request_move(mv.from, mv.to) {
            eprintln!("seed {seed}: generated move {mv} was refused: {err}");
            std::process::exit(1);
        }
        plies += 1;
    }

    let side = game.side_to_move();
    if game.legal_moves().is_empty() {
        let in_check = game.is_in_check(side);
        eprintln!("seed {seed}: {side} has no legal moves after {plies} plies (in check: {in_check})");
    } else {
        eprintln!("seed {seed}: stopped after {plies} plies, {side} to move");
    }
    if args.show {
        println!("{}", game.board());
    }
}
