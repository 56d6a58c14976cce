use anyhow::Context;
use clap::Parser;
use horseshoe_toss::engine::{Direction, GameStatus};
use horseshoe_toss::level::LevelConfig;
use horseshoe_toss::progress::Progress;
use horseshoe_toss::session::Session;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Start at this built-in level (must be unlocked)
    #[clap(short, long)]
    level: Option<u32>,

    /// Play a level from a JSON file instead of the built-in ones
    #[clap(short, long, conflicts_with = "level")]
    file: Option<PathBuf>,

    /// Where unlocked levels and the score are kept
    #[clap(short, long, default_value = "horseshoe_progress.json")]
    progress: PathBuf,
}

fn parse_direction(input: &str) -> Option<Direction> {
    match input {
        "w" => Some(Direction::Up),
        "s" => Some(Direction::Down),
        "a" => Some(Direction::Left),
        "d" => Some(Direction::Right),
        _ => None,
    }
}

fn print_state(session: &Session) {
    println!("---------------------");
    match session.level_number() {
        Some(level) => print!("Level {}", level),
        None => print!("Custom level"),
    }
    println!(", Score: {}", session.progress().score.score());
    println!("{}", session.game());
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let progress = Progress::load(&args.progress)
        .with_context(|| format!("Failed to load progress from {}", args.progress.display()))?;
    let mut session = match &args.file {
        Some(path) => {
            let config = LevelConfig::from_json_file(path)
                .with_context(|| format!("Failed to load level from {}", path.display()))?;
            Session::with_custom_level(progress, config)?
        }
        None => {
            let mut session = Session::new(progress)?;
            if let Some(level) = args.level {
                session.select_level(level)?;
            }
            session
        }
    };

    println!("Welcome to Horseshoe Toss!");

    loop {
        print_state(&session);

        match session.status() {
            GameStatus::Won => println!("🎉 You win! Enter 'n' for the next level."),
            GameStatus::Lost => println!("A horseshoe left the board. Enter 'r' to try again."),
            GameStatus::InProgress => {}
        }

        print!("Move with w/a/s/d, 't' to throw, 'r' to retry, 'n' for next level, 'q' to quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        match input.trim() {
            "q" => break,
            "r" => session.retry(),
            "n" => match session.next_level() {
                Ok(level) => println!("On to level {}.", level),
                Err(e) => println!("{}.", e),
            },
            "t" => match session.throw_horseshoes() {
                Some(outcome) => {
                    let placed = outcome.result.placed_horseshoes.len();
                    let total = outcome.result.new_positions.len();
                    println!("Thrown. {} of {} horseshoes on pegs.", placed, total);
                }
                None => println!("The attempt is over. Retry or move on."),
            },
            other => match parse_direction(other) {
                Some(direction) => {
                    if !session.move_player(direction) && session.status() == GameStatus::InProgress
                    {
                        println!("Can't move there.");
                    }
                }
                None => println!("Invalid input. Use w/a/s/d, 't', 'r', 'n' or 'q'."),
            },
        }
    }

    let progress = session.into_progress();
    progress
        .save(&args.progress)
        .with_context(|| format!("Failed to save progress to {}", args.progress.display()))?;
    println!("Thanks for playing! Final score: {}", progress.score.score());
    Ok(())
}
