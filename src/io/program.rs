use crate::kernel::Instruction;

/// A parsed program description, ready to become a process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    pub instructions: Vec<Instruction>,
}
