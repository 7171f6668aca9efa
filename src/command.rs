use std::path::PathBuf;
use std::str::FromStr;

use crate::error::CommandError;

pub const HELP: &str = "\
Commands:
  submit <path>   parse a program file and submit it
  start           start the simulation
  suspend         pause admission and dispatching
  resume          continue after suspend or stop
  stop            stop the simulation
  queues          show every queue
  help            show this message
  quit            exit and print statistics";

/// One line typed on the interactive console.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Submit(PathBuf),
    Start,
    Suspend,
    Resume,
    Stop,
    Queues,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Command, CommandError> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "submit" if rest.is_empty() => Err(CommandError::MissingPath),
            "submit" => Ok(Command::Submit(PathBuf::from(rest))),
            "start" => Ok(Command::Start),
            "suspend" | "pause" => Ok(Command::Suspend),
            "resume" => Ok(Command::Resume),
            "stop" => Ok(Command::Stop),
            "queues" => Ok(Command::Queues),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(verb.to_string())),
        }
    }
}
