use super::ProcessControlBlock;

/// Something that accepts processes and reports how many it is holding.
pub trait Admission {
    fn enqueue(&mut self, pcb: ProcessControlBlock);

    fn load(&self) -> usize;
}
