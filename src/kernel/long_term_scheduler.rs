use std::collections::VecDeque;

use super::{Admission, ProcessControlBlock, ProcessState};

use crate::notify::SharedNotifier;

/// Why an admission tick moved nothing.
#[derive(Debug, PartialEq, Eq)]
pub enum AdmissionHold {
    EmptyBacklog,
    Saturated { load: usize },
}

/// Holds processes that have not been admitted yet and feeds them to the
/// dispatcher one at a time, oldest first.
pub struct LongTermScheduler {
    program_queue: VecDeque<ProcessControlBlock>,
    capacity: usize,
    notifier: SharedNotifier,
}

impl LongTermScheduler {
    pub fn new(capacity: usize, notifier: SharedNotifier) -> LongTermScheduler {
        LongTermScheduler {
            program_queue: VecDeque::new(),
            capacity,
            notifier,
        }
    }

    /// Admits at most one process into `target`, and only while its load is
    /// below capacity.
    pub fn step(&mut self, target: &mut dyn Admission) -> Result<String, AdmissionHold> {
        if self.program_queue.is_empty() {
            return Err(AdmissionHold::EmptyBacklog);
        }

        let load = target.load();
        if load >= self.capacity {
            log::debug!("admission held: dispatcher load {} >= capacity {}", load, self.capacity);
            return Err(AdmissionHold::Saturated { load });
        }

        let pcb = self.program_queue.pop_front().ok_or(AdmissionHold::EmptyBacklog)?;
        let id = pcb.get_id().to_string();

        target.enqueue(pcb);
        self.notify(&format!("Process moved to short term scheduler: {}", id));

        Ok(id)
    }

    pub fn processes(&self) -> impl Iterator<Item = &ProcessControlBlock> + '_ {
        self.program_queue.iter()
    }

    pub fn backlog_ids(&self) -> Vec<String> {
        self.program_queue.iter().map(|pcb| pcb.get_id().to_string()).collect()
    }

    pub fn notify(&self, message: &str) {
        self.notifier.notify(message);
    }
}

impl Admission for LongTermScheduler {
    fn enqueue(&mut self, mut pcb: ProcessControlBlock) {
        pcb.state = ProcessState::New;
        self.notify(&format!("Process added to long term scheduler: {}", pcb.get_id()));
        self.program_queue.push_back(pcb);
    }

    fn load(&self) -> usize {
        self.program_queue.len()
    }
}
