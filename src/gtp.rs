//! Go Text Protocol (GTP) front end.
//!
//! Exposes the rules engine as a GTP version 2 referee so that GUIs and
//! other engines can drive a game through it. The engine never chooses moves
//! itself; it checks and records the moves it is told about.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Any size from 1 to 25
//! - `clear_board`
//! - `komi <value>` - Stored but unused, scoring is out of scope
//! - `play <color> <vertex>` - `color` must be the side to move
//! - `undo`
//! - `showboard`
//! - `is_legal <color> <vertex>` - `1` or `0`
//! - `captures <color>` - Stones captured by `color`
//!
//! ## Example
//!
//! ```ignore
//! use goban::gtp::GtpEngine;
//! let mut engine = GtpEngine::new(19);
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::{debug, info};

use crate::constants::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::game::Move;
use crate::history::History;
use crate::player::Player;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "captures",
    "clear_board",
    "is_legal",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "undo",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    history: History,
    board_size: usize,
    komi: f32,
}

impl GtpEngine {
    pub fn new(board_size: usize) -> Self {
        Self {
            history: History::new(board_size),
            board_size,
            komi: 7.5,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    /// Run the GTP command loop on stdin and stdout.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the GTP command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        info!(board_size = self.board_size, "GTP session started");

        for line in input.lines() {
            let line = line.context("reading GTP command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!(%command, ?args, "GTP command");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n").context("writing GTP response")?;
            output.flush().context("flushing GTP response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Parse `<color> <vertex>` arguments.
    fn parse_color_move(args: &[&str]) -> Result<(Player, Move), String> {
        if args.len() < 2 {
            return Err("missing arguments".to_string());
        }
        let color = args[0]
            .parse::<Player>()
            .map_err(|_| "invalid color".to_string())?;
        let mv = args[1]
            .parse::<Move>()
            .map_err(|_| "invalid vertex".to_string())?;
        Ok((color, mv))
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args[0].parse::<usize>() {
                    Ok(size) if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) => {
                        self.board_size = size;
                        self.history.reset(size);
                        (true, String::new())
                    }
                    Ok(_) => (false, "unacceptable size".to_string()),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.history.reset(self.board_size);
                (true, String::new())
            }

            "komi" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args[0].parse::<f32>() {
                    Ok(komi) => {
                        self.komi = komi;
                        (true, String::new())
                    }
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                let (color, mv) = match Self::parse_color_move(args) {
                    Ok(parsed) => parsed,
                    Err(message) => return (false, message),
                };
                if color != self.history.current().next_player() {
                    return (false, "wrong color".to_string());
                }
                match self.history.play(mv) {
                    Ok(_) => (true, String::new()),
                    Err(err) => {
                        debug!(%mv, %err, "rejected move");
                        (false, "illegal move".to_string())
                    }
                }
            }

            "is_legal" => {
                let (color, mv) = match Self::parse_color_move(args) {
                    Ok(parsed) => parsed,
                    Err(message) => return (false, message),
                };
                let state = self.history.current();
                let legal = color == state.next_player() && state.is_valid_move(mv);
                (true, if legal { "1" } else { "0" }.to_string())
            }

            "undo" => {
                if self.history.undo() {
                    (true, String::new())
                } else {
                    (false, "cannot undo".to_string())
                }
            }

            "showboard" => (true, format!("\n{}", self.history.current().board())),

            "captures" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args[0].parse::<Player>() {
                    Ok(color) => (true, self.history.current().captures(color).to_string()),
                    Err(_) => (false, "invalid color".to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_command() {
        let mut engine = GtpEngine::new(19);
        let (success, response) = engine.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "goban");
    }

    #[test]
    fn test_known_command() {
        let mut engine = GtpEngine::new(19);

        let (success, response) = engine.execute("known_command", &["undo"]);
        assert!(success);
        assert_eq!(response, "true");

        let (success, response) = engine.execute("known_command", &["genmove"]);
        assert!(success);
        assert_eq!(response, "false");
    }

    #[test]
    fn test_boardsize() {
        let mut engine = GtpEngine::new(19);

        let (success, _) = engine.execute("boardsize", &["9"]);
        assert!(success);
        assert_eq!(engine.history().current().board().num_rows(), 9);

        let (success, response) = engine.execute("boardsize", &["26"]);
        assert!(!success);
        assert_eq!(response, "unacceptable size");
    }

    #[test]
    fn test_play_and_clear() {
        let mut engine = GtpEngine::new(9);

        let (success, _) = engine.execute("play", &["black", "D4"]);
        assert!(success);
        assert_eq!(
            engine.history().current().board().get(Point::new(4, 4)),
            Some(Player::Black)
        );

        let (success, response) = engine.execute("play", &["black", "E5"]);
        assert!(!success);
        assert_eq!(response, "wrong color");

        let (success, response) = engine.execute("play", &["white", "D4"]);
        assert!(!success);
        assert_eq!(response, "illegal move");

        let (success, _) = engine.execute("clear_board", &[]);
        assert!(success);
        assert_eq!(engine.history().current().move_number(), 0);
    }

    #[test]
    fn test_undo() {
        let mut engine = GtpEngine::new(9);
        assert!(!engine.execute("undo", &[]).0);
        engine.execute("play", &["b", "C3"]);
        assert!(engine.execute("undo", &[]).0);
        assert_eq!(engine.history().current().board().get(Point::new(3, 3)), None);
    }

    #[test]
    fn test_is_legal_and_captures() {
        let mut engine = GtpEngine::new(9);
        for (color, vertex) in [("b", "A2"), ("w", "A1"), ("b", "B1")] {
            assert!(engine.execute("play", &[color, vertex]).0);
        }
        assert_eq!(engine.execute("captures", &["black"]), (true, "1".to_string()));
        assert_eq!(engine.execute("is_legal", &["w", "A1"]), (true, "0".to_string()));
        assert_eq!(engine.execute("is_legal", &["w", "E5"]), (true, "1".to_string()));
        assert_eq!(engine.execute("is_legal", &["b", "E5"]), (true, "0".to_string()));
    }

    #[test]
    fn test_run_with_session() {
        let mut engine = GtpEngine::new(9);
        let input = "1 boardsize 3\n# comment\nplay b B2\n2 showboard\nfoo\nquit\nname\n";
        let mut output = Vec::new();
        engine.run_with(input.as_bytes(), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "=1 \n\n= \n\n=2 \n 3 . . .\n 2 . X .\n 1 . . .\n   A B C\n\n\n? unknown command: foo\n\n= \n\n"
        );
    }
}
