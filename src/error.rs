use std::{error, fmt, io};

use crate::game::MIN_SIDE;
use crate::snake::Position;

/// Everything that can end a game.
#[derive(Debug)]
pub enum GameError {
    Collision { at: Position },
    OutOfBounds { at: Position },
    Io(io::Error),
    /// Board smaller than 2x2.
    InvalidSize { length: u16, height: u16 },
    /// No free cell left for a bean. The player filled the board.
    BoardFull,
}

impl GameError {
    pub fn is_win(&self) -> bool {
        matches!(self, GameError::BoardFull)
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameError::Collision { at } => write!(f, "snake ran into itself at {}", at),
            GameError::OutOfBounds { at } => write!(f, "snake left the board at {}", at),
            GameError::InvalidSize { length, height } => {
                write!(f, "a {}x{} board is too small, both sides need at least {} cells", length, height, MIN_SIDE)
            }
            GameError::Io(e) => write!(f, "failed to draw the board: {}", e),
            GameError::BoardFull => write!(f, "no free cell left for a bean"),
        }
    }
}

impl error::Error for GameError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            GameError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GameError {
    fn from(e: io::Error) -> Self {
        GameError::Io(e)
    }
}
