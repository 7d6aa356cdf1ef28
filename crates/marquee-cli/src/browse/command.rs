//! Line commands accepted by the interactive browser.

use std::str::FromStr;

/// Help text listing every command.
pub const HELP: &str = "\
commands:
  search <query>   search movies (empty query returns to the home rows)
  login | logout   simulated login (logout clears My List)
  add <id>         add a listed title to My List
  remove <id>      remove a title from My List
  trailer <id>     show the trailer embed URL for a movie
  close            close the trailer
  rows             show the current rows
  help             show this help
  quit             exit";

/// A parsed interactive command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Search; an empty query clears the search.
    Search(String),
    /// Simulated login.
    Login,
    /// Logout.
    Logout,
    /// Add an item to my list.
    Add(u64),
    /// Remove an item from my list.
    Remove(u64),
    /// Open the trailer view.
    Trailer(u64),
    /// Close the trailer view.
    Close,
    /// Re-render rows.
    Rows,
    /// Print help.
    Help,
    /// Leave the browser.
    Quit,
}

/// Errors when parsing a command line.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    /// Blank line.
    Empty,
    /// Unrecognized command word.
    Unknown(String),
    /// Missing or non-numeric ID argument.
    InvalidId(String),
}

impl std::fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown(word) => write!(f, "unknown command: {word} (try `help`)"),
            Self::InvalidId(command) => write!(f, "`{command}` needs a numeric ID"),
        }
    }
}

impl std::error::Error for ParseCommandError {}

impl FromStr for BrowseCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let id = |command: &str| {
            rest.parse::<u64>()
                .map_err(|_| ParseCommandError::InvalidId(String::from(command)))
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Err(ParseCommandError::Empty),
            "search" | "s" => Ok(Self::Search(String::from(rest))),
            "login" => Ok(Self::Login),
            "logout" => Ok(Self::Logout),
            "add" => id("add").map(Self::Add),
            "remove" | "rm" => id("remove").map(Self::Remove),
            "trailer" | "t" => id("trailer").map(Self::Trailer),
            "close" => Ok(Self::Close),
            "rows" | "home" => Ok(Self::Rows),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(ParseCommandError::Unknown(String::from(word))),
        }
    }
}
