use thiserror::Error;

/// Failure to turn a program description into a process.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read program: {0}")]
    Io(#[from] std::io::Error),

    #[error("program description is empty")]
    Empty,

    #[error("invalid program header on line {line}: expected `program <name>`")]
    InvalidHeader { line: usize },

    #[error("program header on line {line} is missing a name")]
    MissingName { line: usize },

    #[error("expected `begin` after header of program `{name}`")]
    MissingBegin { name: String },

    #[error("program `{name}` has no terminating `end`")]
    MissingEnd { name: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("quantum must be greater than zero")]
    ZeroQuantum,

    #[error("admission interval must be greater than zero")]
    ZeroAdmissionInterval,

    #[error("admission capacity must be greater than zero")]
    ZeroCapacity,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error("`submit` requires a file path")]
    MissingPath,
}
