use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use super::clock::{SimTime, Ticket};
use super::{Admission, Classification, Instruction, ProcessControlBlock, ProcessState};

use crate::notify::SharedNotifier;

/// A process whose instruction could not be interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    MalformedInstruction { index: usize, raw: String },
}

/// Terminal record of a process.
#[derive(Debug)]
pub struct FinishedProcess {
    pub pcb: ProcessControlBlock,
    pub classification: Classification,
    pub fault: Option<Fault>,
}

/// What a quantum tick did with the head of the ready queue.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// An instruction is in flight; its completion is due after `duration_ms`.
    InFlight { ticket: Ticket, duration_ms: SimTime },
    Finished(String),
    Faulted(String),
}

struct ReadyEntry {
    priority: u32,
    seq: u64,
    pcb: ProcessControlBlock,
}

// Highest priority first, then earliest arrival.
impl Ord for ReadyEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ReadyEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ReadyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReadyEntry {}

struct InFlight {
    pcb: ProcessControlBlock,
    duration_ms: SimTime,
}

/// The dispatcher. Runs one instruction of the highest-priority ready process
/// per quantum tick and rewards processes that block on I/O.
pub struct ShortTermScheduler {
    quantum_ms: SimTime,
    next_seq: u64,
    ready_queue: BinaryHeap<ReadyEntry>,
    running: BTreeMap<Ticket, InFlight>,
    blocked: BTreeMap<Ticket, InFlight>,
    finished: Vec<FinishedProcess>,
    notifier: SharedNotifier,
}

impl ShortTermScheduler {
    pub fn new(quantum_ms: SimTime, notifier: SharedNotifier) -> ShortTermScheduler {
        ShortTermScheduler {
            quantum_ms,
            next_seq: 0,
            ready_queue: BinaryHeap::new(),
            running: BTreeMap::new(),
            blocked: BTreeMap::new(),
            finished: Vec::new(),
            notifier,
        }
    }

    /// Pops the ready head and starts its next instruction. Returns `None`
    /// when nothing is ready.
    pub fn dispatch(&mut self) -> Option<Dispatch> {
        let ReadyEntry { mut pcb, .. } = self.ready_queue.pop()?;
        pcb.state = ProcessState::Running;

        let instruction = match pcb.next_instruction() {
            Some(instruction) => instruction.clone(),
            None => {
                let id = pcb.get_id().to_string();
                self.finish(pcb, None);
                return Some(Dispatch::Finished(id));
            }
        };

        let index = pcb.get_program_counter();
        pcb.advance();

        match instruction {
            Instruction::Execute => {
                self.notify(&format!("Executing: {} ({})", instruction, pcb.get_id()));

                let ticket = self.next_ticket();
                let duration_ms = self.quantum_ms;
                log::debug!("{} running until +{}ms (ticket {})", pcb.get_id(), duration_ms, ticket);
                self.running.insert(ticket, InFlight { pcb, duration_ms });

                Some(Dispatch::InFlight { ticket, duration_ms })
            }
            Instruction::Block(count) => {
                let duration_ms = self.quantum_ms.saturating_mul(u64::from(count));
                self.notify(&format!("Blocking for {}ms: {} ({})", duration_ms, instruction, pcb.get_id()));

                let ticket = self.next_ticket();
                pcb.state = ProcessState::Blocked;
                log::debug!("{} blocked until +{}ms (ticket {})", pcb.get_id(), duration_ms, ticket);
                self.blocked.insert(ticket, InFlight { pcb, duration_ms });

                Some(Dispatch::InFlight { ticket, duration_ms })
            }
            Instruction::Undefined(raw) => {
                let id = pcb.get_id().to_string();
                log::warn!("{}: undefined instruction `{}` at {}", id, raw, index);
                self.notify(&format!("Process {} faulted: undefined instruction `{}` at {}", id, raw, index));
                self.finish(pcb, Some(Fault::MalformedInstruction { index, raw }));

                Some(Dispatch::Faulted(id))
            }
        }
    }

    /// Lands the in-flight instruction identified by `ticket`. Unknown
    /// tickets are ignored.
    pub fn complete(&mut self, ticket: Ticket) {
        if let Some(InFlight { mut pcb, duration_ms }) = self.running.remove(&ticket) {
            pcb.record_cpu_time(duration_ms);

            if pcb.has_next_instruction() {
                pcb.reset_priority();
                self.enqueue(pcb);
            } else {
                self.finish(pcb, None);
            }
        } else if let Some(InFlight { mut pcb, duration_ms }) = self.blocked.remove(&ticket) {
            pcb.record_io_time(duration_ms);
            pcb.raise_priority();
            self.enqueue(pcb);
        } else {
            log::warn!("completion for unknown ticket {}", ticket);
        }
    }

    pub fn finished(&self) -> &[FinishedProcess] {
        &self.finished
    }

    pub fn in_flight(&self) -> usize {
        self.running.len() + self.blocked.len()
    }

    /// Ready ids in the order they would be dispatched.
    pub fn ready_ids(&self) -> Vec<String> {
        let mut entries: Vec<&ReadyEntry> = self.ready_queue.iter().collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries.into_iter().map(|entry| entry.pcb.get_id().to_string()).collect()
    }

    pub fn running_ids(&self) -> Vec<String> {
        self.running.values().map(|entry| entry.pcb.get_id().to_string()).collect()
    }

    pub fn blocked_ids(&self) -> Vec<String> {
        self.blocked.values().map(|entry| entry.pcb.get_id().to_string()).collect()
    }

    pub fn finished_ids(&self) -> Vec<String> {
        self.finished.iter().map(|entry| entry.pcb.get_id().to_string()).collect()
    }

    /// Every process the dispatcher holds, finished ones included.
    pub fn processes(&self) -> impl Iterator<Item = &ProcessControlBlock> + '_ {
        self.ready_queue
            .iter()
            .map(|entry| &entry.pcb)
            .chain(self.running.values().map(|entry| &entry.pcb))
            .chain(self.blocked.values().map(|entry| &entry.pcb))
            .chain(self.finished.iter().map(|entry| &entry.pcb))
    }

    pub fn notify(&self, message: &str) {
        self.notifier.notify(message);
    }

    fn finish(&mut self, mut pcb: ProcessControlBlock, fault: Option<Fault>) {
        pcb.state = ProcessState::Terminated;
        let classification = pcb.classify();

        self.notify(&format!("Process finished: {}", pcb.get_id()));
        self.notify(&format!("Process {} is {}.", pcb.get_id(), classification));
        log::info!(
            "{} finished: cpu {}ms, io {}ms, {}",
            pcb.get_id(),
            pcb.get_cpu_time_ms(),
            pcb.get_io_time_ms(),
            classification
        );

        self.finished.push(FinishedProcess { pcb, classification, fault });
    }

    fn next_ticket(&mut self) -> Ticket {
        let ticket = self.next_seq;
        self.next_seq += 1;
        ticket
    }
}

impl Admission for ShortTermScheduler {
    fn enqueue(&mut self, mut pcb: ProcessControlBlock) {
        pcb.state = ProcessState::Ready;
        let seq = self.next_ticket();

        self.ready_queue.push(ReadyEntry {
            priority: pcb.get_priority(),
            seq,
            pcb,
        });
    }

    /// In-flight processes count toward the set they will return to.
    fn load(&self) -> usize {
        self.ready_queue.len() + self.in_flight()
    }
}
