mod admission;
mod clock;
mod instruction;
mod long_term_scheduler;
mod process_control_block;
mod short_term_scheduler;

pub use admission::Admission;
pub use clock::{EventKind, SimTime, Ticket};
pub use instruction::Instruction;
pub use long_term_scheduler::{AdmissionHold, LongTermScheduler};
pub use process_control_block::{Classification, ProcessControlBlock, ProcessState};
pub use short_term_scheduler::{Dispatch, Fault, FinishedProcess, ShortTermScheduler};

pub mod driver;

pub use driver::{Driver, QueueSnapshot, SimulationState};
