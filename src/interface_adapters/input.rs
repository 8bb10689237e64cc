// Line-based player input: parses text commands and forwards them to the runtime.

use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Commands a player can type, one per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Left,
    Right,
    Fire,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandParseError {
    Empty,
    Unknown(String),
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandParseError::Empty => write!(f, "empty command"),
            CommandParseError::Unknown(cmd) => write!(f, "unknown command: {cmd}"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Parses one input line. A bare space (or a line of spaces) means fire.
pub fn parse_line(line: &str) -> Result<PlayerCommand, CommandParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Err(CommandParseError::Empty);
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(PlayerCommand::Fire);
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "a" | "left" => Ok(PlayerCommand::Left),
        "d" | "right" => Ok(PlayerCommand::Right),
        "f" | "fire" | "space" => Ok(PlayerCommand::Fire),
        "q" | "quit" | "exit" => Ok(PlayerCommand::Quit),
        _ => Err(CommandParseError::Unknown(trimmed.to_string())),
    }
}

/// Reads commands until EOF, a quit command, or the receiver going away.
pub async fn command_reader_task<R>(reader: R, commands_tx: mpsc::Sender<PlayerCommand>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("input closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "failed to read input; command reader exiting");
                break;
            }
        };

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(CommandParseError::Empty) => continue,
            Err(e) => {
                warn!(error = %e, "ignoring input line");
                continue;
            }
        };

        if commands_tx.send(command).await.is_err() {
            break;
        }
        if command == PlayerCommand::Quit {
            break;
        }
    }
}
