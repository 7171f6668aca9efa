use std::fmt;

/// A single step of a simulated program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Consumes one quantum of CPU time.
    Execute,
    /// Waits on I/O for `n` quanta.
    Block(u32),
    /// Anything that is neither `execute` nor `block <n>`. Kept verbatim so
    /// the dispatcher can report it.
    Undefined(String),
}

impl Instruction {
    pub fn parse(line: &str) -> Instruction {
        let mut tokens = line.split_whitespace();

        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some("execute"), None, None) => Instruction::Execute,
            (Some("block"), Some(count), None) => match count.parse::<u32>() {
                Ok(count) => Instruction::Block(count),
                Err(_) => Instruction::Undefined(line.trim().to_string()),
            },
            _ => Instruction::Undefined(line.trim().to_string()),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Execute => write!(f, "execute"),
            Instruction::Block(count) => write!(f, "block {}", count),
            Instruction::Undefined(raw) => write!(f, "{}", raw),
        }
    }
}
