//! Background execution of external commands.
//!
//! A run launches one process whose stdout and stderr share a single OS pipe.
//! A worker thread owns the child and the read end of that pipe, and relays
//! every line to a [`RunListener`] as soon as it is read. Once the stream is
//! exhausted and the process has exited, the listener receives exactly one
//! completion for the run.
//!
//! There is no cancellation and no timeout: a started command always runs until
//! the process exits. Starting another run does not affect one already in
//! flight, so output of overlapping runs may interleave at the listener.
//!
//! Processes that leave background children holding the pipe open keep the run
//! alive until those children close it too.

use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, BufReader, PipeReader};
use std::process::{Child, ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::command_spec::CommandSpec;
use crate::error::{Error, Result};

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one run for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl RunId {
    pub fn next() -> Self {
        Self(NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for RunId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEventKind {
    /// One line of merged output, trailing whitespace removed.
    Output(String),
    /// No more events follow for this run.
    Completed,
}

/// An event from a run, tagged with the run it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEvent {
    pub run: RunId,
    pub kind: RunEventKind,
}

impl RunEvent {
    pub fn output(run: RunId, line: impl Into<String>) -> Self {
        Self {
            run,
            kind: RunEventKind::Output(line.into()),
        }
    }

    pub fn completed(run: RunId) -> Self {
        Self {
            run,
            kind: RunEventKind::Completed,
        }
    }
}

/// Receives the events of a run. Bound once, when the run starts.
///
/// Implementations are called from the run's worker thread and must hand the
/// events over to whoever owns the state they affect.
pub trait RunListener: Send + 'static {
    fn on_output(&self, run: RunId, line: String);
    fn on_complete(&self, run: RunId);
}

impl RunListener for Sender<RunEvent> {
    fn on_output(&self, run: RunId, line: String) {
        if self.send(RunEvent::output(run, line)).is_err() {
            debug!("Listener of run {run} is gone, dropping output");
        }
    }

    fn on_complete(&self, run: RunId) {
        if self.send(RunEvent::completed(run)).is_err() {
            debug!("Listener of run {run} is gone, dropping completion");
        }
    }
}

/// Handle to one started run.
///
/// Dropping the handle detaches from the worker; the run keeps going.
#[derive(Debug)]
pub struct RunHandle {
    id: RunId,
    worker: Option<JoinHandle<()>>,
}

impl RunHandle {
    /// A handle for a run that has no worker, because it ended before one was
    /// needed (for example when the launch failed).
    pub fn completed(id: RunId) -> Self {
        Self { id, worker: None }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Blocks until the worker has delivered its completion and exited.
    pub fn join(self) {
        if let Some(worker) = self.worker {
            if worker.join().is_err() {
                warn!("Worker of run {} panicked", self.id);
            }
        }
    }
}

/// Starts commands without waiting for them.
pub trait Runner {
    /// Launches `spec` and streams its events to a clone of `listener`.
    ///
    /// # Errors
    ///
    /// Returns the launch error if the process could not be started. Nothing
    /// has been sent to the listener in that case.
    fn try_start<L>(&self, spec: &CommandSpec, listener: &L) -> Result<RunHandle>
    where
        L: RunListener + Clone;

    /// Launches `spec`, turning a launch error into one output line followed
    /// by the completion, so the listener always sees the run end.
    fn start<L>(&self, spec: &CommandSpec, listener: &L) -> RunHandle
    where
        L: RunListener + Clone,
    {
        match self.try_start(spec, listener) {
            Ok(handle) => handle,
            Err(e) => report_launch_failure(listener, &e),
        }
    }
}

/// Delivers a launch failure as a run of its own: the error line, then the
/// completion.
pub fn report_launch_failure<L: RunListener>(listener: &L, error: &Error) -> RunHandle {
    let id = RunId::next();
    warn!("Run {id} failed to launch: {error}");
    listener.on_output(id, error.to_string());
    listener.on_complete(id);
    RunHandle::completed(id)
}

/// Runs commands as child processes, one worker thread per run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn try_start<L>(&self, spec: &CommandSpec, listener: &L) -> Result<RunHandle>
    where
        L: RunListener + Clone,
    {
        let (child, output) = spawn_merged(spec)?;
        let id = RunId::next();
        info!("Run {id} started: {spec}");

        // The child is shared with the worker closure and only taken back if
        // the worker never starts.
        let unstarted = Arc::new(Mutex::new(Some((child, output))));
        let handover = Arc::clone(&unstarted);
        let listener = listener.clone();
        let spawned = thread::Builder::new()
            .name(format!("uvgui-run-{}", id.0))
            .spawn(move || {
                if let Some((child, output)) = take_unstarted(&handover) {
                    stream_output(id, child, output, &listener);
                }
            });

        match spawned {
            Ok(worker) => Ok(RunHandle {
                id,
                worker: Some(worker),
            }),
            Err(e) => {
                if let Some((child, _)) = take_unstarted(&unstarted) {
                    let _ = reap(id, child);
                }
                Err(Error::launch_error(spec.to_string(), e))
            }
        }
    }
}

fn take_unstarted<T>(slot: &Mutex<Option<T>>) -> Option<T> {
    slot.lock().ok().and_then(|mut slot| slot.take())
}

/// Stops a child whose output nobody is going to read.
fn reap(id: RunId, mut child: Child) -> Option<ExitStatus> {
    warn!("Run {id} has no worker, killing process {}", child.id());
    if let Err(e) = child.kill() {
        debug!("Could not kill run {id}: {e}");
    }
    match child.wait() {
        Ok(status) => Some(status),
        Err(e) => {
            warn!("Could not wait for run {id}: {e}");
            None
        }
    }
}

/// Spawns the command with stdout and stderr both writing into one pipe.
fn spawn_merged(spec: &CommandSpec) -> Result<(Child, PipeReader)> {
    let mut command = spec.to_command()?;
    let (reader, writer) = io::pipe()?;
    let error_writer = writer.try_clone()?;

    command
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(error_writer);

    let child = command
        .spawn()
        .map_err(|e| Error::launch_error(spec.to_string(), e))?;

    // The command keeps our copies of the write end alive; the reader only
    // sees EOF once they are gone.
    drop(command);

    Ok((child, reader))
}

/// Sends the completion when dropped, so the run ends even if the worker
/// unwinds.
struct CompletionGuard<'a, L: RunListener> {
    run: RunId,
    listener: &'a L,
}

impl<L: RunListener> Drop for CompletionGuard<'_, L> {
    fn drop(&mut self) {
        self.listener.on_complete(self.run);
    }
}

fn stream_output<L: RunListener>(id: RunId, mut child: Child, output: PipeReader, listener: &L) {
    let completion = CompletionGuard { run: id, listener };

    let mut reader = BufReader::new(output);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => break,
            Ok(_) => listener.on_output(id, decode_line(&buffer)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                listener.on_output(id, format!("Error reading command output: {e}"));
                break;
            }
        }
    }

    // Close the read end before waiting so a child still writing gets a broken
    // pipe instead of blocking forever.
    drop(reader);

    match child.wait() {
        Ok(status) if status.success() => info!("Run {id} finished: {status}"),
        Ok(status) => warn!("Run {id} finished: {status}"),
        Err(e) => warn!("Could not wait for run {id}: {e}"),
    }

    drop(completion);
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end().to_string()
}
