//! Line-oriented text protocol for driving a game from a terminal or a
//! front end, modelled on GTP.
//!
//! Each input line is an optional numeric id followed by a command and its
//! arguments. Each reply is `=id message` on success or `?id message` on
//! failure, terminated by a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `newgame [size]` - Start a new game, replacing the current one
//! - `setboard <row>/<row>/... [human|ai]` - Load a literal position
//! - `play <row> <col>` - Play a Human stone
//! - `genmove` - Let the AI move; answers `<row> <col>`
//! - `showboard` - Print the board
//! - `score` - Print both scores
//! - `state` - Print the full state as JSON
//!
//! ## Example
//!
//! ```ignore
//! use dots_rust::protocol::TextEngine;
//! let mut engine = TextEngine::new(service, 10);
//! engine.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::board::{Board, Player};
use crate::service::{GameId, GameService};
use crate::state::GameState;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "newgame",
    "play",
    "protocol_version",
    "quit",
    "score",
    "setboard",
    "showboard",
    "state",
    "version",
];

/// Protocol session around one [`GameService`] and its current game.
pub struct TextEngine {
    service: GameService,
    game: Option<GameId>,
    default_size: usize,
}

impl TextEngine {
    pub fn new(service: GameService, default_size: usize) -> Self {
        Self {
            service,
            game: None,
            default_size,
        }
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

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
            let (success, message) = self.execute(&command, &parts[1..]);
            if !success {
                warn!(%command, %message, "command failed");
            }

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional leading numeric id from the command.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "newgame" => {
                let size = match args.first() {
                    Some(arg) => match arg.parse::<usize>() {
                        Ok(size) => size,
                        Err(_) => return (false, format!("invalid size '{arg}'")),
                    },
                    None => self.default_size,
                };
                match self.service.create_game(size) {
                    Ok(id) => {
                        self.replace_game(id);
                        (true, id.to_string())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "setboard" => {
                let Some(rows) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let to_move = match args.get(1).map(|s| s.to_lowercase()) {
                    None => Player::Human,
                    Some(p) if p == "human" || p == "h" => Player::Human,
                    Some(p) if p == "ai" || p == "a" => Player::Ai,
                    Some(p) => return (false, format!("unknown player '{p}'")),
                };
                let rows: Vec<&str> = rows.split('/').collect();
                match Board::from_rows(&rows) {
                    Ok(board) => {
                        let id = self.service.load_game(GameState::with_board(board, to_move));
                        self.replace_game(id);
                        (true, id.to_string())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let (Ok(row), Ok(col)) = (args[0].parse::<usize>(), args[1].parse::<usize>()) else {
                    return (false, "invalid coordinates".to_string());
                };
                let id = match self.current_game() {
                    Ok(id) => id,
                    Err(e) => return (false, e),
                };
                match self.service.apply_human_move(&id, row, col) {
                    Ok(_) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                let id = match self.current_game() {
                    Ok(id) => id,
                    Err(e) => return (false, e),
                };
                match self.service.apply_ai_move(&id) {
                    Ok(state) => match state.last_move {
                        Some(mv) => (true, format!("{} {}", mv.row, mv.col)),
                        None => (false, "no move recorded".to_string()),
                    },
                    Err(e) => (false, e.to_string()),
                }
            }

            "showboard" => self.with_state(|state| format!("\n{}", state.board)),

            "score" => self.with_state(|state| {
                let mut msg = format!("Human {} AI {}", state.scores.human, state.scores.ai);
                if state.is_game_over {
                    msg.push_str(&format!(" winner {}", state.winner));
                }
                msg
            }),

            "state" => {
                let id = match self.current_game() {
                    Ok(id) => id,
                    Err(e) => return (false, e),
                };
                match self.service.get_state(&id) {
                    Ok(state) => match serde_json::to_string(state) {
                        Ok(json) => (true, json),
                        Err(e) => (false, e.to_string()),
                    },
                    Err(e) => (false, e.to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn current_game(&self) -> Result<GameId, String> {
        self.game.ok_or_else(|| "no game in progress".to_string())
    }

    fn replace_game(&mut self, id: GameId) {
        if let Some(old) = self.game.replace(id) {
            let _ = self.service.end_game(&old);
        }
    }

    fn with_state(&self, f: impl FnOnce(&GameState) -> String) -> (bool, String) {
        let result = self
            .current_game()
            .and_then(|id| self.service.get_state(&id).map_err(|e| e.to_string()));
        match result {
            Ok(state) => (true, f(state)),
            Err(e) => (false, e),
        }
    }
}
