use std::{fmt, io};

#[derive(Debug)]
pub enum GameError {
    /// Terminal or file I/O failed
    Io(io::Error),

    /// Configuration could not be read, parsed or validated
    Config(String),

    /// The terminal cannot fit the board
    TerminalTooSmall {
        width: u16,
        height: u16,
        required_width: u16,
        required_height: u16,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Io(e) => write!(f, "I/O error: {}", e),
            GameError::Config(msg) => write!(f, "Config error: {}", msg),
            GameError::TerminalTooSmall { width, height, required_width, required_height } => {
                write!(
                    f,
                    "Terminal is {}x{}, at least {}x{} is needed",
                    width, height, required_width, required_height
                )
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
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

pub type GameResult<T> = Result<T, GameError>;
