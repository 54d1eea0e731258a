use std::{fmt, io};

/// Problems that stop the game from starting at all.
#[derive(Clone, Debug, PartialEq)]
pub enum SetupError {
    InvalidPlayfield { width: f32, height: f32 },
    InvalidTickRate { tick_ms: u64 },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlayfield { width, height } => {
                write!(f, "playfield must have a positive size, got {width}x{height}")
            }
            Self::InvalidTickRate { tick_ms } => {
                write!(f, "tick rate must be between 1 and 1000 ms, got {tick_ms}")
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Reading or writing the high-score file failed. Never fatal; the table
/// module logs these and carries on with what it has in memory.
#[derive(Debug)]
pub enum ScoreFileError {
    Io(io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for ScoreFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "high-score file i/o failed: {e}"),
            Self::Encode(e) => write!(f, "high-score entry could not be encoded: {e}"),
        }
    }
}

impl std::error::Error for ScoreFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Encode(e) => Some(e),
        }
    }
}

impl From<io::Error> for ScoreFileError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ScoreFileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}
