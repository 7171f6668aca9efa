use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use super::clock::{EventKind, EventQueue, SimTime};
use super::*;

use crate::config::SimulationConfig;
use crate::error::{ConfigError, ParseError};
use crate::io::{self, Program};
use crate::notify::SharedNotifier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
    Stopped,
    Running,
    Paused,
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationState::Stopped => write!(f, "stopped"),
            SimulationState::Running => write!(f, "running"),
            SimulationState::Paused => write!(f, "paused"),
        }
    }
}

/// Where every process currently lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub state: SimulationState,
    pub now_ms: SimTime,
    pub staging: Vec<String>,
    pub backlog: Vec<String>,
    pub ready: Vec<String>,
    pub running: Vec<String>,
    pub blocked: Vec<String>,
    pub finished: Vec<String>,
    /// Program counter and program length per process id.
    pub cursors: BTreeMap<String, (usize, usize)>,
}

impl QueueSnapshot {
    pub fn total(&self) -> usize {
        self.staging.len()
            + self.backlog.len()
            + self.ready.len()
            + self.running.len()
            + self.blocked.len()
            + self.finished.len()
    }
}

impl fmt::Display for QueueSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Queues at {}ms ({}):", self.now_ms, self.state)?;
        writeln!(f, "... staging:  [{}]", self.staging.join(", "))?;
        writeln!(f, "... backlog:  [{}]", self.backlog.join(", "))?;
        writeln!(f, "... ready:    [{}]", self.ready.join(", "))?;
        writeln!(f, "... running:  [{}]", self.running.join(", "))?;
        writeln!(f, "... blocked:  [{}]", self.blocked.join(", "))?;
        write!(f, "... finished: [{}]", self.finished.join(", "))
    }
}

/// Holds the simulated system and exposes the control and submission
/// surface. Time is driven from outside through `advance_to`.
pub struct Driver {
    config: SimulationConfig,
    state: SimulationState,
    staging: Vec<ProcessControlBlock>,
    process_ids: HashSet<String>,
    lts: LongTermScheduler,
    sts: ShortTermScheduler,
    events: EventQueue,
    notifier: SharedNotifier,
}

impl Driver {
    pub fn new(config: SimulationConfig, notifier: SharedNotifier) -> Result<Driver, ConfigError> {
        config.validate()?;

        let mut events = EventQueue::new();
        events.schedule_at(0, EventKind::AdmissionTick);
        events.schedule_at(0, EventKind::QuantumTick);

        Ok(Driver {
            config,
            state: SimulationState::Stopped,
            staging: Vec::new(),
            process_ids: HashSet::new(),
            lts: LongTermScheduler::new(config.admission_capacity, notifier.clone()),
            sts: ShortTermScheduler::new(config.quantum_ms, notifier.clone()),
            events,
            notifier,
        })
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn now(&self) -> SimTime {
        self.events.now()
    }

    pub fn submit(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();

        match io::load_program(path) {
            Ok(program) => self.submit_program(program),
            Err(err) => {
                self.report_parse_failure(&path.display().to_string(), &err);
                false
            }
        }
    }

    pub fn submit_source(&mut self, origin: &str, source: &str) -> bool {
        match io::parse_program_str(source) {
            Ok(program) => self.submit_program(program),
            Err(err) => {
                self.report_parse_failure(origin, &err);
                false
            }
        }
    }

    /// Rejects a program whose name is already held anywhere in the
    /// simulation, finished processes included.
    pub fn submit_program(&mut self, program: Program) -> bool {
        if self.process_ids.contains(&program.name) {
            log::warn!("rejected duplicate process id {}", program.name);
            self.notify(&format!("Job rejected: process {} already exists", program.name));
            return false;
        }

        self.process_ids.insert(program.name.clone());
        let pcb = ProcessControlBlock::from(program);

        if self.state == SimulationState::Running {
            let id = pcb.get_id().to_string();
            self.lts.enqueue(pcb);
            self.notify(&format!("Process immediately moved to long term scheduler: {}", id));
        } else {
            self.notify(&format!("Job submitted: {}", pcb.get_id()));
            self.staging.push(pcb);
        }

        true
    }

    pub fn start(&mut self) {
        self.run_from_halt("Simulation started.");
    }

    pub fn resume(&mut self) {
        self.run_from_halt("Simulation resumed.");
    }

    pub fn suspend(&mut self) {
        if self.state != SimulationState::Running {
            self.notify("Simulation is not running.");
            return;
        }

        self.state = SimulationState::Paused;
        log::info!("simulation paused at {}ms", self.now());
        self.notify("Simulation suspended.");
    }

    pub fn stop(&mut self) {
        if self.state == SimulationState::Stopped {
            self.notify("Simulation is already stopped.");
            return;
        }

        self.state = SimulationState::Stopped;
        log::info!("simulation stopped at {}ms", self.now());
        self.notify("Simulation stopped.");
    }

    pub fn display_queues(&self) -> QueueSnapshot {
        let snapshot = self.snapshot();
        self.notify(&snapshot.to_string());
        snapshot
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            state: self.state,
            now_ms: self.now(),
            staging: self.staging.iter().map(|pcb| pcb.get_id().to_string()).collect(),
            backlog: self.lts.backlog_ids(),
            ready: self.sts.ready_ids(),
            running: self.sts.running_ids(),
            blocked: self.sts.blocked_ids(),
            finished: self.sts.finished_ids(),
            cursors: self
                .staging
                .iter()
                .chain(self.lts.processes())
                .chain(self.sts.processes())
                .map(|pcb| {
                    (pcb.get_id().to_string(), (pcb.get_program_counter(), pcb.get_program().len()))
                })
                .collect(),
        }
    }

    pub fn finished(&self) -> &[FinishedProcess] {
        self.sts.finished()
    }

    pub fn backlog_load(&self) -> usize {
        self.lts.load()
    }

    pub fn dispatcher_load(&self) -> usize {
        self.sts.load()
    }

    /// True while anything is still queued or in flight past the staging area.
    pub fn has_pending_work(&self) -> bool {
        self.lts.load() > 0 || self.sts.load() > 0
    }

    /// Processes every event due at or before `t`, then moves the clock to `t`.
    pub fn advance_to(&mut self, t: SimTime) {
        while let Some((at, kind)) = self.events.pop_due(t) {
            self.handle(at, kind);
        }
        self.events.advance_to(t);
    }

    pub fn advance_by(&mut self, delta: SimTime) {
        self.advance_to(self.now().saturating_add(delta));
    }

    /// Steps event by event until no admitted work remains or `deadline` is
    /// reached. Returns whether all work drained.
    pub fn run_until_idle(&mut self, deadline: SimTime) -> bool {
        while self.has_pending_work() {
            let next = match self.events.peek_time() {
                Some(next) if next <= deadline => next,
                _ => {
                    self.events.advance_to(deadline);
                    return false;
                }
            };
            self.advance_to(next);
        }

        true
    }

    pub fn notify(&self, message: &str) {
        self.notifier.notify(message);
    }

    fn handle(&mut self, at: SimTime, kind: EventKind) {
        match kind {
            EventKind::AdmissionTick => {
                if self.state == SimulationState::Running {
                    if let Ok(id) = self.lts.step(&mut self.sts) {
                        log::debug!("{}ms: admitted {}", at, id);
                    }
                }
                self.events.schedule_after(self.config.admission_interval_ms, EventKind::AdmissionTick);
            }
            EventKind::QuantumTick => {
                if self.state == SimulationState::Running {
                    if let Some(Dispatch::InFlight { ticket, duration_ms }) = self.sts.dispatch() {
                        self.events.schedule_after(duration_ms, EventKind::Completion(ticket));
                    }
                }
                self.events.schedule_after(self.config.quantum_ms, EventKind::QuantumTick);
            }
            // Already-committed simulated time lands regardless of state.
            EventKind::Completion(ticket) => self.sts.complete(ticket),
        }
    }

    fn run_from_halt(&mut self, message: &str) {
        if self.state == SimulationState::Running {
            self.notify("Simulation is already running.");
            return;
        }

        self.state = SimulationState::Running;
        log::info!("simulation running at {}ms", self.now());
        self.notify(message);
        self.drain_staging();
    }

    fn drain_staging(&mut self) {
        if self.staging.is_empty() {
            return;
        }

        self.notify("Moving stored processes to long term scheduler...");
        for pcb in self.staging.drain(..) {
            self.lts.enqueue(pcb);
        }
    }

    fn report_parse_failure(&self, origin: &str, err: &ParseError) {
        log::warn!("rejected {}: {}", origin, err);
        self.notify(&format!("Failed to read {}: {}", origin, err));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    use crate::notify::RecordingNotifier;

    fn driver(config: SimulationConfig) -> (Driver, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let driver = Driver::new(config, Arc::new(notifier.clone())).unwrap();
        (driver, notifier)
    }

    fn source(name: &str, body: &[&str]) -> String {
        format!("program {}\nbegin\n{}\nend\n", name, body.join("\n"))
    }

    #[test]
    fn test_driver_rejects_invalid_config() {
        let result = Driver::new(SimulationConfig::new(0), Arc::new(RecordingNotifier::new()));

        assert!(matches!(result, Err(ConfigError::ZeroQuantum)));
    }

    #[test]
    fn test_driver_stages_until_start() {
        let (mut driver, notifier) = driver(SimulationConfig::new(100));

        assert!(driver.submit_source("a", &source("a", &["execute"])));
        assert!(driver.submit_source("b", &source("b", &["execute"])));
        assert_eq!(driver.snapshot().staging, vec!["a", "b"]);

        driver.advance_to(5_000);
        assert_eq!(driver.backlog_load(), 0);
        assert_eq!(driver.dispatcher_load(), 0);

        driver.start();
        let snapshot = driver.snapshot();
        assert!(snapshot.staging.is_empty());
        assert_eq!(snapshot.backlog, vec!["a", "b"]);
        assert!(notifier.contains("Simulation started."));
        assert!(notifier.contains("Process added to long term scheduler: a"));
    }

    #[test]
    fn test_driver_submit_while_running_goes_to_backlog() {
        let (mut driver, notifier) = driver(SimulationConfig::new(100));
        driver.start();

        assert!(driver.submit_source("late", &source("late", &["execute"])));

        assert_eq!(driver.snapshot().backlog, vec!["late"]);
        assert!(notifier.contains("Process immediately moved to long term scheduler: late"));
    }

    #[test]
    fn test_driver_submit_parse_failure() {
        let (mut driver, notifier) = driver(SimulationConfig::new(100));

        assert!(!driver.submit_source("broken.txt", "program x\nexecute\n"));
        assert!(driver.snapshot().staging.is_empty());
        assert!(notifier.contains("Failed to read broken.txt"));
    }

    #[test]
    fn test_driver_double_start_is_noop() {
        let (mut driver, notifier) = driver(SimulationConfig::new(100));
        driver.start();
        driver.start();
        driver.resume();

        assert_eq!(driver.state(), SimulationState::Running);
        let already = notifier
            .messages()
            .iter()
            .filter(|message| *message == "Simulation is already running.")
            .count();
        assert_eq!(already, 2);
    }

    #[test]
    fn test_driver_state_machine() {
        let (mut driver, notifier) = driver(SimulationConfig::new(100));

        driver.suspend();
        assert_eq!(driver.state(), SimulationState::Stopped);
        assert!(notifier.contains("Simulation is not running."));

        driver.start();
        driver.suspend();
        assert_eq!(driver.state(), SimulationState::Paused);

        driver.resume();
        assert_eq!(driver.state(), SimulationState::Running);
        assert!(notifier.contains("Simulation resumed."));

        driver.stop();
        assert_eq!(driver.state(), SimulationState::Stopped);
        driver.stop();
        assert!(notifier.contains("Simulation is already stopped."));
    }

    #[test]
    fn test_driver_admits_one_process_per_tick() {
        let config = SimulationConfig::new(100).with_admission_interval_ms(1000);
        let (mut driver, _) = driver(config);

        for name in ["a", "b", "c"] {
            driver.submit_source(name, &source(name, &["block 50"]));
        }
        driver.start();

        driver.advance_to(0);
        assert_eq!(driver.backlog_load(), 2);
        driver.advance_to(999);
        assert_eq!(driver.backlog_load(), 2);
        driver.advance_to(1000);
        assert_eq!(driver.backlog_load(), 1);
        driver.advance_to(2000);
        assert_eq!(driver.backlog_load(), 0);
    }

    #[test]
    fn test_driver_suspend_freezes_ticks_but_lands_completions() {
        let (mut driver, _) = driver(SimulationConfig::new(100));
        driver.submit_source("io", &source("io", &["block 5", "execute"]));
        driver.start();

        driver.advance_to(0);
        assert_eq!(driver.snapshot().blocked, vec!["io"]);

        driver.suspend();
        driver.advance_to(2_000);

        let snapshot = driver.snapshot();
        assert!(snapshot.blocked.is_empty());
        assert_eq!(snapshot.ready, vec!["io"]);
        assert!(snapshot.finished.is_empty());

        driver.resume();
        assert!(driver.run_until_idle(10_000));
        assert_eq!(driver.snapshot().finished, vec!["io"]);
    }

    #[test]
    fn test_driver_display_queues_notifies() {
        let (mut driver, notifier) = driver(SimulationConfig::new(100));
        driver.submit_source("a", &source("a", &["execute"]));

        let snapshot = driver.display_queues();

        assert_eq!(snapshot.total(), 1);
        assert!(notifier.contains("... staging:  [a]"));
    }

    #[test]
    fn test_driver_run_until_idle_hits_deadline() {
        let (mut driver, _) = driver(SimulationConfig::new(100));
        driver.submit_source("slow", &source("slow", &["block 100"]));
        driver.start();

        assert!(!driver.run_until_idle(1_000));
        assert_eq!(driver.now(), 1_000);
        assert!(driver.run_until_idle(20_000));
    }

    #[test]
    fn test_driver_rejects_duplicate_process_id() {
        let (mut driver, notifier) = driver(SimulationConfig::new(100));

        assert!(driver.submit_source("a1", &source("a", &["execute"])));
        assert!(!driver.submit_source("a2", &source("a", &["block 1"])));
        assert_eq!(driver.snapshot().staging, vec!["a"]);
        assert!(notifier.contains("Job rejected: process a already exists"));

        driver.start();
        assert!(!driver.submit_source("a3", &source("a", &["execute"])));
        assert!(driver.run_until_idle(10_000));
        assert_eq!(driver.snapshot().finished, vec!["a"]);

        assert!(!driver.submit_source("a4", &source("a", &["execute"])));
        assert_eq!(driver.snapshot().total(), 1);
    }

    #[test]
    fn test_driver_submit_while_running_reports_in_causal_order() {
        let (mut driver, notifier) = driver(SimulationConfig::new(100));
        driver.start();
        notifier.clear();

        driver.submit_source("late", &source("late", &["execute"]));

        assert_eq!(
            notifier.messages(),
            vec![
                "Process added to long term scheduler: late",
                "Process immediately moved to long term scheduler: late",
            ]
        );
    }

    #[test]
    fn test_driver_snapshot_tracks_cursors() {
        let (mut driver, _) = driver(SimulationConfig::new(100));
        driver.submit_source("c", &source("c", &["execute", "block 1"]));
        assert_eq!(driver.snapshot().cursors.get("c"), Some(&(0, 2)));

        driver.start();
        driver.advance_to(0);
        assert_eq!(driver.snapshot().cursors.get("c"), Some(&(1, 2)));

        assert!(driver.run_until_idle(10_000));
        assert_eq!(driver.snapshot().cursors.get("c"), Some(&(2, 2)));
    }
}
