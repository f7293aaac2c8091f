//! Command dispatch.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, error, info};

use super::Command;
use crate::error::CommandError;
use crate::store::Store;

/// Reads commands line by line and runs each one on its own thread.
///
/// The reader never waits for a command to finish before accepting the next.
/// `exit` (or end of input) is handled synchronously: outstanding commands
/// are joined, the worker pool is shut down, and [`Shell::run`] returns.
///
/// Replies are single lines written to the shared `out` sink.
pub struct Shell<W> {
    store: Arc<Store>,
    out: Arc<Mutex<W>>,
    running: Vec<JoinHandle<()>>,
}

impl<W: Write + Send + 'static> Shell<W> {
    /// Creates a shell over `store` replying to `out`.
    pub fn new(store: Arc<Store>, out: W) -> Self {
        Self {
            store,
            out: Arc::new(Mutex::new(out)),
            running: Vec::new(),
        }
    }

    /// The reply sink.
    pub fn output(&self) -> Arc<Mutex<W>> {
        Arc::clone(&self.out)
    }

    /// Processes `input` until `exit` or end of input.
    ///
    /// Malformed lines get a one-line rejection. Outstanding commands are
    /// joined and the pool is shut down even when reading `input` fails.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        let result = self.read_commands(&mut input);
        self.exit();
        result
    }

    fn read_commands<R: BufRead>(&mut self, input: &mut R) -> io::Result<()> {
        let mut raw = Vec::new();
        loop {
            raw.clear();
            if input.read_until(b'\n', &mut raw)? == 0 {
                return Ok(());
            }

            let parsed = std::str::from_utf8(&raw)
                .map_err(|_| CommandError::InvalidEncoding)
                .and_then(Command::parse);
            match parsed {
                Ok(Command::Exit) => return Ok(()),
                Ok(command) => self.spawn(command),
                Err(e) => {
                    debug!(line = %String::from_utf8_lossy(&raw).trim(), error = %e, "command rejected");
                    reply(&self.out, &[e.to_string()]);
                }
            }
        }
    }

    fn spawn(&mut self, command: Command) {
        let store = Arc::clone(&self.store);
        let out = Arc::clone(&self.out);
        let name = command.name();
        let spawned = thread::Builder::new()
            .name(format!("partstore-{name}"))
            .spawn(move || reply(&out, &execute(&store, command)));

        // Reap finished commands so the list stays short
        self.running.retain(|handle| !handle.is_finished());
        match spawned {
            Ok(handle) => self.running.push(handle),
            Err(e) => {
                error!(command = name, error = %e, "failed to start command thread");
                reply(&self.out, &[format!("{name}: failed to start: {e}.")]);
            }
        }
    }

    fn exit(&mut self) {
        for handle in self.running.drain(..) {
            if handle.join().is_err() {
                error!("command thread panicked");
            }
        }
        self.store.shutdown();
        info!("shell exited");
    }
}

/// Runs one command against the store and renders the reply lines.
pub(crate) fn execute(store: &Store, command: Command) -> Vec<String> {
    match command {
        Command::Put(path) => match store.put(&path) {
            Ok(file_id) => {
                let parts = store.file(file_id).map_or(0, |f| f.part_count);
                vec![format!(
                    "Put: {}: stored as file {} ({} parts).",
                    path.display(),
                    file_id,
                    parts
                )]
            }
            Err(e) => vec![format!("Put: {}: failed: {}.", path.display(), e)],
        },
        Command::Get(file_id) => match store.get(file_id) {
            Ok(bytes) => vec![format!("Get: file {}: restored {} bytes.", file_id, bytes)],
            Err(e) => vec![format!("Get: file {}: failed: {}.", file_id, e)],
        },
        Command::Delete(file_id) => match store.delete(file_id) {
            Ok(report) if report.is_complete() => vec![format!(
                "Delete: file {}: removed {} parts.",
                file_id, report.removed
            )],
            Ok(report) => vec![format!(
                "Delete: file {}: removed {} parts, {} could not be removed.",
                file_id, report.removed, report.failed
            )],
            Err(e) => vec![format!("Delete: file {}: failed: {}.", file_id, e)],
        },
        Command::List => store
            .list()
            .into_iter()
            .map(|(id, name)| format!("{id} {}", name.display()))
            .collect(),
        Command::Exit => Vec::new(),
    }
}

fn reply<W: Write>(out: &Mutex<W>, lines: &[String]) {
    let mut out = out.lock();
    for line in lines {
        if let Err(e) = writeln!(out, "{line}") {
            error!(error = %e, "failed to write reply");
            return;
        }
    }
    if let Err(e) = out.flush() {
        error!(error = %e, "failed to flush reply");
    }
}
