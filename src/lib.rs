//! A two-tier process scheduling simulator.
//!
//! A long-term scheduler admits submitted programs into a short-term
//! dispatcher one at a time while the dispatcher has capacity. The dispatcher
//! runs one instruction per quantum, resets the priority of processes that
//! used the CPU and raises the priority of processes that blocked on I/O.

pub mod command;
pub mod config;
pub mod error;
pub mod io;
pub mod kernel;
pub mod notify;
pub mod realtime;

pub use config::SimulationConfig;
pub use error::{CommandError, ConfigError, ParseError};
pub use kernel::{Classification, Driver, ProcessControlBlock, QueueSnapshot, SimulationState};
pub use notify::{LogNotifier, Notify, RecordingNotifier, SharedNotifier};
