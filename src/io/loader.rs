use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use super::Program;

use crate::error::ParseError;
use crate::kernel::Instruction;

const HEADER_KEYWORD: &str = "program";
const BEGIN_KEYWORD: &str = "begin";
const END_KEYWORD: &str = "end";

pub fn load_program(path: impl AsRef<Path>) -> Result<Program, ParseError> {
    let file = File::open(path.as_ref())?;
    parse_program(BufReader::new(file))
}

pub fn parse_program_str(source: &str) -> Result<Program, ParseError> {
    parse_program(Cursor::new(source))
}

/// Reads `program <name>`, `begin`, one instruction per line and `end`.
/// Blank lines are skipped and anything after `end` is ignored.
pub fn parse_program(reader: impl BufRead) -> Result<Program, ParseError> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(idx, line)| line.map(|line| (idx + 1, line)))
        .filter(|line| !matches!(line, Ok((_, text)) if text.trim().is_empty()));

    let (header_line, header) = lines.next().ok_or(ParseError::Empty)??;
    let name = parse_header(header_line, header.trim())?;

    match lines.next().transpose()? {
        Some((_, line)) if line.trim() == BEGIN_KEYWORD => {}
        _ => return Err(ParseError::MissingBegin { name }),
    }

    let mut instructions = Vec::new();

    for line in lines {
        let (_, line) = line?;
        let line = line.trim();

        if line == END_KEYWORD {
            return Ok(Program { name, instructions });
        }

        instructions.push(Instruction::parse(line));
    }

    Err(ParseError::MissingEnd { name })
}

fn parse_header(line: usize, header: &str) -> Result<String, ParseError> {
    let mut tokens = header.split_whitespace();

    if tokens.next() != Some(HEADER_KEYWORD) {
        return Err(ParseError::InvalidHeader { line });
    }

    tokens
        .next()
        .map(str::to_string)
        .ok_or(ParseError::MissingName { line })
}
