use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chess_cli::prompt::parse_color;
use chess_cli::{
    complete_setup, BoardSink, Game, GameEnd, NullSink, PartialSetup, PlayMode, StdinSource,
    TextFileSink, DEFAULT_BOARD_FILE,
};
use chess_core::Color;
use chess_engine::{Difficulty, EngineConfig};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Your colour: w, white, b or black
    #[arg(short, long, value_parser = color_arg)]
    color: Option<Color>,

    /// auto, easy, medium or difficult
    #[arg(short = 'l', long)]
    difficulty: Option<Difficulty>,

    /// Search depth in plies; overrides --difficulty
    #[arg(long)]
    depth: Option<u8>,

    /// Let the engine play both sides
    #[arg(long)]
    bot: bool,

    /// Play uniformly random moves for your side
    #[arg(long)]
    crazy: bool,

    /// Seed for the engine's evaluation noise and the random player
    #[arg(long)]
    seed: Option<u64>,

    /// Turn off evaluation noise
    #[arg(long)]
    no_entropy: bool,

    /// Search root moves in parallel
    #[arg(long)]
    parallel: bool,

    /// File the board is written to after every move
    #[arg(long, default_value = DEFAULT_BOARD_FILE)]
    board_file: PathBuf,

    /// Do not write the board to a file
    #[arg(long, conflicts_with = "board_file")]
    no_board_file: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn color_arg(text: &str) -> Result<Color, String> {
    parse_color(text).ok_or_else(|| format!("expected w, white, b or black, got '{text}'"))
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .target(env_logger::Target::Stderr)
    .init();

    if let Err(e) = run(args) {
        log::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let engine = EngineConfig {
        entropy: !args.no_entropy,
        seed: args.seed,
        parallel: args.parallel,
        ..EngineConfig::default()
    };

    let mode = if args.bot || args.crazy || args.color.is_some() {
        Some(PlayMode::from_flags(args.bot, args.crazy))
    } else {
        None
    };
    let partial = PartialSetup {
        color: args.color,
        depth: args.depth.or(args.difficulty.map(Difficulty::depth)),
        mode,
    };

    let mut input = StdinSource;
    let config = complete_setup(partial, engine, &mut input).context("game setup failed")?;

    let sink: Box<dyn BoardSink> = if args.no_board_file {
        Box::new(NullSink)
    } else {
        log::info!("saving the board to {}", args.board_file.display());
        Box::new(TextFileSink::new(args.board_file))
    };

    let mut game = Game::new(config, input, sink, io::stdout())?;
    match game.play()? {
        GameEnd::Finished(outcome) => log::debug!("finished: {:?}", outcome),
        GameEnd::Terminated => log::debug!("terminated by the player"),
    }
    Ok(())
}
