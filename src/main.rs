mod bean;
mod error;
mod game;
mod input;
mod panel;
mod snake;
mod term;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use game::{Ending, GameConfig, SnakeGame, Summary, DEFAULT_HEIGHT, DEFAULT_LENGTH, MIN_SIDE};
use input::{InputListener, TermKeys};
use term::TermManager;

#[derive(Debug, Parser)]
#[command(version, about = "Snake in the terminal. Arrow keys or WASD to move, q or Esc to quit.")]
struct Cli {
    /// Board width in cells
    #[arg(long, default_value_t = DEFAULT_LENGTH, value_parser = clap::value_parser!(u16).range(i64::from(MIN_SIDE)..=100))]
    length: u16,

    /// Board height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(u16).range(i64::from(MIN_SIDE)..=100))]
    height: u16,

    /// Seed for the start position and bean placement
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = GameConfig { length: cli.length, height: cli.height, seed: cli.seed };
    let game = SnakeGame::new(&config).context("Error setting up the board")?;

    // Dropping `term` restores the terminal on every early return and on panic
    let mut term = TermManager::new();
    term.setup().context("Error preparing the terminal")?;

    let listener = InputListener::spawn(game.snake().direction_cell(), TermKeys);
    let summary = game.play(&mut term, listener.quit_flag());
    listener.shutdown();

    // Restore before printing so the message lands on the normal screen,
    // but print the score even if restoring failed
    let restored = term.restore();
    if let Ending::Lost(reason) = &summary.ending {
        info!("lost: {}", reason);
    }
    println!("{}", final_message(&summary));

    restored.context("Error restoring the terminal")
}

fn final_message(summary: &Summary) -> String {
    let headline = match &summary.ending {
        Ending::Won => "You won!",
        Ending::Quit => "Bye!",
        Ending::Lost(_) => "Game over!",
    };
    format!("{} Your score is {}", headline, summary.score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::snake::Position;

    #[test]
    fn test_final_message_per_ending() {
        let lost = Summary { score: 7, ending: Ending::Lost(GameError::Collision { at: Position::new(1, 1) }) };
        let won = Summary { score: 98, ending: Ending::Won };
        let quit = Summary { score: 0, ending: Ending::Quit };

        assert_eq!(final_message(&lost), "Game over! Your score is 7");
        assert_eq!(final_message(&won), "You won! Your score is 98");
        assert_eq!(final_message(&quit), "Bye! Your score is 0");
    }

    #[test]
    fn test_cli_rejects_tiny_board() {
        assert!(Cli::try_parse_from(["snake-term", "--length", "1"]).is_err());

        let cli = Cli::try_parse_from(["snake-term", "--height", "15", "--seed", "4"]).unwrap();
        assert_eq!((cli.length, cli.height, cli.seed), (DEFAULT_LENGTH, 15, Some(4)));
    }
}
