use anyhow::{bail, Context};
use clap::Parser;
use horseshoe_toss::engine::Game;
use horseshoe_toss::level::{builtin_level, LevelConfig};
use horseshoe_toss::solver::solve_bfs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Built-in level to solve (1-based)
    #[clap(short, long, conflicts_with = "level_file")]
    level: Option<u32>,

    /// Longest action sequence to search
    #[clap(short = 'd', long, default_value_t = 200)]
    max_depth: u32,

    /// Path to a level JSON file
    level_file: Option<PathBuf>,
}

fn load_level(args: &Args) -> anyhow::Result<LevelConfig> {
    match (&args.level_file, args.level) {
        (Some(path), _) => LevelConfig::from_json_file(path)
            .with_context(|| format!("Failed to load level from {}", path.display())),
        (None, Some(number)) => {
            builtin_level(number).with_context(|| format!("There is no level {}", number))
        }
        (None, None) => bail!("Pass either --level N or a level file"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let game = Game::new(load_level(&args)?)?;
    println!("Initial board state:\n{}\n", game);
    println!("Searching for a solution with depth limit {}...\n", args.max_depth);

    match solve_bfs(&game, args.max_depth) {
        Some(solution) => {
            println!("Solution found:\n");
            println!("Actions ({}):", solution.actions.len());
            if solution.actions.is_empty() {
                println!("  No actions needed.");
            } else {
                for (i, action) in solution.actions.iter().enumerate() {
                    println!("  {}: {}", i + 1, action);
                }
            }
            println!("States explored: {}\n", solution.states_explored);
            println!("Final board state:\n{}\n", solution.final_game);
        }
        None => println!("No solution found.\n"),
    }

    Ok(())
}
