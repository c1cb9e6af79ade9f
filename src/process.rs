//! Subprocess execution with captured output and an optional timeout

use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Result, runtime};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long output readers may keep draining after a timed-out child is killed
const READER_GRACE: Duration = Duration::from_millis(500);

/// Spawn attempts for a binary that was written moments ago
const SPAWN_ATTEMPTS: u32 = 3;

/// ETXTBSY on Linux
const TEXT_FILE_BUSY: i32 = 26;

/// Captured result of a finished subprocess
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Turn a non-zero exit into a typed failure carrying the captured output
    pub fn into_success(self, command: &str) -> Result<Self> {
        if self.status.success() {
            Ok(self)
        } else {
            Err(runtime::command_failed(
                command,
                self.status.to_string(),
                self.stdout,
                self.stderr,
            ))
        }
    }
}

/// Short description of an invocation for logs and errors: the program and
/// its first argument
pub fn describe<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> String {
    match args.first() {
        Some(first) => format!(
            "{} {}",
            program.display(),
            first.as_ref().to_string_lossy()
        ),
        None => program.display().to_string(),
    }
}

/// Run `program` with `args`, capturing stdout and stderr
///
/// A non-zero exit is not an error here; see [`CommandOutput::into_success`].
/// When `timeout` elapses the child's whole process group is killed and a
/// timeout error returned, even if descendants still hold the output pipes.
pub fn run<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    timeout: Option<Duration>,
) -> Result<CommandOutput> {
    let command_desc = describe(program, args);
    tracing::debug!(command = %command_desc, "running subprocess");

    let mut child = spawn(program, args, timeout.is_some())
        .map_err(|e| runtime::spawn_failed(&command_desc, e))?;

    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let status = match timeout {
        Some(timeout) => wait_with_deadline(&mut child, timeout)
            .map_err(|e| runtime::spawn_failed(&command_desc, e))?,
        None => Some(
            child
                .wait()
                .map_err(|e| runtime::spawn_failed(&command_desc, e))?,
        ),
    };

    match status {
        Some(status) => Ok(CommandOutput {
            status,
            stdout: join_reader(stdout),
            stderr: join_reader(stderr),
        }),
        None => {
            // Anything that escaped the group may keep the pipes open
            join_reader_within(stdout, READER_GRACE);
            join_reader_within(stderr, READER_GRACE);
            Err(runtime::timed_out(
                command_desc,
                timeout.map_or(0, |t| t.as_secs()),
            ))
        }
    }
}

fn spawn<S: AsRef<OsStr>>(program: &Path, args: &[S], own_group: bool) -> io::Result<Child> {
    let mut attempt = 1;
    loop {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            if own_group {
                command.process_group(0);
            }
        }
        #[cfg(not(unix))]
        let _ = own_group;

        let result = command.spawn();

        match result {
            Err(e) if e.raw_os_error() == Some(TEXT_FILE_BUSY) && attempt < SPAWN_ATTEMPTS => {
                attempt += 1;
                thread::sleep(POLL_INTERVAL);
            }
            other => return other,
        }
    }
}

/// Wait for the child, killing it once `timeout` has elapsed
///
/// Returns `None` if the child was killed.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        if Instant::now() >= deadline {
            kill_process_group(child);
            child.wait()?;
            return Ok(None);
        }

        thread::sleep(POLL_INTERVAL);
    }
}

/// Kill `child` and every process in its group
///
/// The child was spawned as the leader of its own group, so the group id
/// equals its pid.
#[cfg(unix)]
fn kill_process_group(child: &mut Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let killed = i32::try_from(child.id())
        .ok()
        .is_some_and(|pid| killpg(Pid::from_raw(pid), Signal::SIGKILL).is_ok());

    if !killed {
        // The child may have exited between try_wait and kill
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    let _ = child.kill();
}

fn spawn_reader<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = reader.read_to_end(&mut buffer);
        buffer
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// Give a reader until `grace` to finish, then leave it detached
fn join_reader_within(handle: Option<JoinHandle<Vec<u8>>>, grace: Duration) {
    let Some(handle) = handle else {
        return;
    };

    let deadline = Instant::now() + grace;
    while !handle.is_finished() && Instant::now() < deadline {
        thread::sleep(POLL_INTERVAL);
    }

    if handle.is_finished() {
        let _ = handle.join();
    }
}
