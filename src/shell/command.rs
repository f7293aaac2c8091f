//! Command parsing.

use std::path::PathBuf;

use crate::error::CommandError;
use crate::part::FileId;

/// One operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `put <path>`
    Put(PathBuf),
    /// `get <file_id>`
    Get(FileId),
    /// `delete <file_id>`
    Delete(FileId),
    /// `list`
    List,
    /// `exit`
    Exit,
}

impl Command {
    /// Parses one input line. Words are separated by whitespace.
    ///
    /// # Example
    ///
    /// ```
    /// use partstore::Command;
    ///
    /// assert_eq!(Command::parse("get 12").unwrap(), Command::Get(12));
    /// assert!(Command::parse("get twelve").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Err(CommandError::Empty);
        };

        match name {
            "put" => match args {
                [path] => Ok(Command::Put(PathBuf::from(path))),
                _ => Err(CommandError::WrongArity { command: "put" }),
            },
            "get" => Ok(Command::Get(parse_id("get", args)?)),
            "delete" => Ok(Command::Delete(parse_id("delete", args)?)),
            "list" => Ok(Command::List),
            "exit" => Ok(Command::Exit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// The command word.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Put(_) => "put",
            Command::Get(_) => "get",
            Command::Delete(_) => "delete",
            Command::List => "list",
            Command::Exit => "exit",
        }
    }
}

fn parse_id(command: &'static str, args: &[&str]) -> Result<FileId, CommandError> {
    let [raw] = args else {
        return Err(CommandError::WrongArity { command });
    };
    // Digits only: rejects signs and other forms `u64::from_str` would accept
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CommandError::InvalidId {
            command,
            raw: raw.to_string(),
        });
    }
    raw.parse().map_err(|_| CommandError::InvalidId {
        command,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("put data/a.bin").unwrap(),
            Command::Put(PathBuf::from("data/a.bin"))
        );
        assert_eq!(Command::parse("  get   3 \n").unwrap(), Command::Get(3));
        assert_eq!(Command::parse("delete 0").unwrap(), Command::Delete(0));
        assert_eq!(Command::parse("list").unwrap(), Command::List);
        assert_eq!(Command::parse("exit").unwrap(), Command::Exit);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(Command::parse("").unwrap_err(), CommandError::Empty);
        assert_eq!(Command::parse(" \t\n").unwrap_err(), CommandError::Empty);
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Command::parse("copy a b").unwrap_err(),
            CommandError::Unknown("copy".to_string())
        );
    }

    #[test]
    fn test_wrong_arity() {
        assert_eq!(
            Command::parse("put").unwrap_err(),
            CommandError::WrongArity { command: "put" }
        );
        assert_eq!(
            Command::parse("put a b").unwrap_err(),
            CommandError::WrongArity { command: "put" }
        );
        assert_eq!(
            Command::parse("get").unwrap_err(),
            CommandError::WrongArity { command: "get" }
        );
        assert_eq!(
            Command::parse("delete 1 2").unwrap_err(),
            CommandError::WrongArity { command: "delete" }
        );
    }

    #[test]
    fn test_invalid_id() {
        for raw in ["abc", "-1", "+1", "1.5", "99999999999999999999999"] {
            assert!(
                matches!(
                    Command::parse(&format!("get {raw}")),
                    Err(CommandError::InvalidId { command: "get", .. })
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_name() {
        assert_eq!(Command::Get(1).name(), "get");
        assert_eq!(Command::List.name(), "list");
    }
}
