use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use process_scheduler::command::{Command, HELP};
use process_scheduler::config::{DEFAULT_ADMISSION_CAPACITY, DEFAULT_ADMISSION_INTERVAL_MS};
use process_scheduler::kernel::{Driver, FinishedProcess};
use process_scheduler::realtime::{lock, RealtimeClock};
use process_scheduler::{LogNotifier, SharedNotifier, SimulationConfig};

const CLOCK_RESOLUTION: Duration = Duration::from_millis(5);

/// Two-tier process scheduling simulator.
#[derive(Parser, Debug)]
#[command(name = "process-scheduler", version)]
struct Args {
    /// Length of one quantum in milliseconds.
    quantum: u64,

    /// Milliseconds between admission attempts.
    #[arg(long, default_value_t = DEFAULT_ADMISSION_INTERVAL_MS)]
    admission_interval_ms: u64,

    /// Dispatcher load at which admission is withheld.
    #[arg(long, default_value_t = DEFAULT_ADMISSION_CAPACITY)]
    capacity: usize,

    /// Program files to submit before reading commands.
    #[arg(long = "submit", value_name = "PATH")]
    submit: Vec<PathBuf>,

    /// Start the simulation right away.
    #[arg(long)]
    autostart: bool,

    /// Send notifications to the logger instead of stdout.
    #[arg(long)]
    log_notifications: bool,

    /// Log scheduler transitions.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = match (args.verbose, args.log_notifications) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = SimulationConfig::new(args.quantum)
        .with_admission_interval_ms(args.admission_interval_ms)
        .with_admission_capacity(args.capacity);

    let (sender, receiver) = crossbeam_channel::unbounded::<String>();
    let notifier: SharedNotifier = if args.log_notifications {
        // Closing the channel lets the printer thread exit on its own.
        drop(sender);
        Arc::new(LogNotifier)
    } else {
        Arc::new(sender)
    };

    let driver = Driver::new(config, notifier).context("invalid simulation configuration")?;
    let driver = Arc::new(Mutex::new(driver));

    let printer = thread::spawn(move || {
        for message in receiver {
            println!("{}", message);
        }
    });

    {
        let mut driver = lock(&driver);
        for path in &args.submit {
            driver.submit(path);
        }
        if args.autostart {
            driver.start();
        }
    }

    log::info!("quantum {}ms, capacity {}", config.quantum_ms, config.admission_capacity);
    let clock = RealtimeClock::spawn(driver.clone(), CLOCK_RESOLUTION);

    println!("{}", HELP);
    for line in std::io::stdin().lock().lines() {
        let line = line.context("failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => execute(&driver, command),
            Err(err) => {
                eprintln!("{}", err);
                println!("{}", HELP);
            }
        }
    }

    clock.stop();

    let stats = format_stats(lock(&driver).finished());
    drop(driver);
    if printer.join().is_err() {
        log::error!("notification printer panicked");
    }

    println!("{}", stats);

    Ok(())
}

fn execute(driver: &Mutex<Driver>, command: Command) {
    let mut driver = lock(driver);

    match command {
        Command::Submit(path) => {
            driver.submit(&path);
        }
        Command::Start => driver.start(),
        Command::Suspend => driver.suspend(),
        Command::Resume => driver.resume(),
        Command::Stop => driver.stop(),
        Command::Queues => {
            driver.display_queues();
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

fn format_stats(finished: &[FinishedProcess]) -> String {
    let mut out = String::from("Stats for finished processes:\n");
    out.push_str("... ID           | Priority | CPU (ms) | I/O (ms) | Type\n");
    out.push_str("...--------------|----------|----------|----------|----------\n");

    for entry in finished {
        let pcb = &entry.pcb;
        let kind = match &entry.fault {
            Some(_) => format!("{} (faulted)", entry.classification),
            None => entry.classification.to_string(),
        };

        out.push_str(&format!(
            "... {:<12} | {:<8} | {:<8} | {:<8} | {}\n",
            pcb.get_id(),
            pcb.get_priority(),
            pcb.get_cpu_time_ms(),
            pcb.get_io_time_ms(),
            kind
        ));
    }

    out
}
