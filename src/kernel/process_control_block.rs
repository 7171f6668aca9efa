use std::fmt;

use super::Instruction;

use crate::io::Program;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Blocked,
    Terminated,
}

/// How a finished process spent its time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    CpuBound,
    IoBound,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::CpuBound => write!(f, "CPU-bound"),
            Classification::IoBound => write!(f, "I/O-bound"),
        }
    }
}

/// The process control block. Holds the program and its scheduling metadata.
///
/// A block is never cloned: it moves between the staging area, the backlog,
/// the dispatcher's queues and finally the finished list.
#[derive(Debug)]
pub struct ProcessControlBlock {
    pub state: ProcessState,

    id: String,
    program: Vec<Instruction>,
    program_counter: usize,
    priority: u32,

    cpu_time_ms: u64,
    io_time_ms: u64,
}

impl ProcessControlBlock {
    pub fn new(id: impl Into<String>, program: Vec<Instruction>) -> ProcessControlBlock {
        ProcessControlBlock {
            state: ProcessState::New,
            id: id.into(),
            program,
            program_counter: 0,
            priority: 0,
            cpu_time_ms: 0,
            io_time_ms: 0,
        }
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_program(&self) -> &[Instruction] {
        &self.program
    }

    pub fn get_program_counter(&self) -> usize {
        self.program_counter
    }

    pub fn get_priority(&self) -> u32 {
        self.priority
    }

    pub fn get_cpu_time_ms(&self) -> u64 {
        self.cpu_time_ms
    }

    pub fn get_io_time_ms(&self) -> u64 {
        self.io_time_ms
    }

    pub fn has_next_instruction(&self) -> bool {
        self.program_counter < self.program.len()
    }

    pub fn is_exhausted(&self) -> bool {
        !self.has_next_instruction()
    }

    pub fn next_instruction(&self) -> Option<&Instruction> {
        self.program.get(self.program_counter)
    }

    /// Moves the cursor past the current instruction. Saturates at the end
    /// of the program.
    pub fn advance(&mut self) {
        if self.has_next_instruction() {
            self.program_counter += 1;
        }
    }

    pub fn record_cpu_time(&mut self, delta_ms: u64) {
        self.cpu_time_ms = self.cpu_time_ms.saturating_add(delta_ms);
    }

    pub fn record_io_time(&mut self, delta_ms: u64) {
        self.io_time_ms = self.io_time_ms.saturating_add(delta_ms);
    }

    pub fn classify(&self) -> Classification {
        if self.cpu_time_ms > self.io_time_ms {
            Classification::CpuBound
        } else {
            Classification::IoBound
        }
    }

    pub(crate) fn reset_priority(&mut self) {
        self.priority = 0;
    }

    pub(crate) fn raise_priority(&mut self) {
        self.priority = self.priority.saturating_add(1);
    }
}

impl From<Program> for ProcessControlBlock {
    fn from(program: Program) -> ProcessControlBlock {
        ProcessControlBlock::new(program.name, program.instructions)
    }
}
