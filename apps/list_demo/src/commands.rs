//! Line commands read from stdin, standing in for scroll, pull-to-refresh
//! and text-field events.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoCommand {
    /// Scroll to the last visible item.
    More,
    Refresh,
    /// Replace the search text; empty text returns to the default list.
    Search(String),
    /// Type `text` one character at a time.
    Type(String),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'; type 'help' for the list of commands")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
}

pub const HELP: &str = "\
commands:
  more            load the next page (scroll to the bottom)
  refresh         clear the list and reload page 1
  search <text>   set the search text (empty clears it)
  type <text>     type the text one keystroke at a time
  show            print the current list
  help            print this help
  quit            exit";

pub fn parse_command(line: &str) -> Result<Option<DemoCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "more" | "m" => DemoCommand::More,
        "refresh" | "r" => DemoCommand::Refresh,
        "search" | "s" => DemoCommand::Search(rest.to_string()),
        "type" | "t" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("type"));
            }
            DemoCommand::Type(rest.to_string())
        }
        "show" | "ls" => DemoCommand::Show,
        "help" | "?" => DemoCommand::Help,
        "quit" | "exit" | "q" => DemoCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
