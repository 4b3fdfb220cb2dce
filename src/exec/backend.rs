// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The ipvs facade talks to a `CommandExecutor` instead of spawning
//! processes itself. This makes it easy to swap in a fake executor in tests
//! while keeping the production implementation in [`SystemExecutor`].
//!
//! - `SystemExecutor` is the default implementation used by `lvs`. It runs
//!   real OS processes and blocks the calling thread until they finish.
//! - Tests can provide their own `CommandExecutor` that, for example,
//!   records the argument vectors and returns scripted results.

use std::process::{Child, Stdio};
use std::sync::Arc;

use tracing::{debug, warn};

use super::failure::{MessageStyle, SubprocessFailure};
use super::invocation::Invocation;
use super::stdin::InputPipe;

pub type Result<T> = std::result::Result<T, SubprocessFailure>;

/// Capability set for running one external process per call.
///
/// None of the operations retry and none has a timeout: a hung process
/// hangs the caller.
pub trait CommandExecutor: Send + Sync {
    /// Run `exe` with `args`, wait for it, and discard its output on success.
    fn execute(&self, exe: &str, args: &[String]) -> Result<()>;

    /// Run `argv[0]` with `argv[1..]` and return its merged stdout/stderr.
    fn run(&self, argv: &[String]) -> Result<Vec<u8>>;

    /// Run `exe` with `args`, deliver `input` on its stdin, close stdin, and
    /// wait for it to exit.
    fn execute_with_stdin(&self, input: &[u8], exe: &str, args: &[String]) -> Result<()>;
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for &T {
    fn execute(&self, exe: &str, args: &[String]) -> Result<()> {
        (**self).execute(exe, args)
    }

    fn run(&self, argv: &[String]) -> Result<Vec<u8>> {
        (**self).run(argv)
    }

    fn execute_with_stdin(&self, input: &[u8], exe: &str, args: &[String]) -> Result<()> {
        (**self).execute_with_stdin(input, exe, args)
    }
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for Box<T> {
    fn execute(&self, exe: &str, args: &[String]) -> Result<()> {
        (**self).execute(exe, args)
    }

    fn run(&self, argv: &[String]) -> Result<Vec<u8>> {
        (**self).run(argv)
    }

    fn execute_with_stdin(&self, input: &[u8], exe: &str, args: &[String]) -> Result<()> {
        (**self).execute_with_stdin(input, exe, args)
    }
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for Arc<T> {
    fn execute(&self, exe: &str, args: &[String]) -> Result<()> {
        (**self).execute(exe, args)
    }

    fn run(&self, argv: &[String]) -> Result<Vec<u8>> {
        (**self).run(argv)
    }

    fn execute_with_stdin(&self, input: &[u8], exe: &str, args: &[String]) -> Result<()> {
        (**self).execute_with_stdin(input, exe, args)
    }
}

/// Real executor backend used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Spawn, collect merged output until EOF, then wait.
    fn combined_output(&self, invocation: &Invocation<'_>, style: MessageStyle) -> Result<Vec<u8>> {
        let program = invocation.program();
        debug!(command = %invocation, "spawning process");

        let (mut child, output) = invocation.spawn_merged(Stdio::null()).map_err(|err| {
            SubprocessFailure::spawn(program, err).with_style(style)
        })?;

        let captured = output.read_all();
        match child.wait() {
            Ok(status) if status.success() => {
                debug!(program, bytes = captured.len(), "process exited successfully");
                Ok(captured)
            }
            Ok(status) => {
                debug!(program, exit_code = ?status.code(), bytes = captured.len(), "process failed");
                Err(SubprocessFailure::exited(program, status)
                    .with_output(captured)
                    .with_style(style))
            }
            Err(err) => Err(SubprocessFailure::wait(program, err)
                .with_output(captured)
                .with_style(style)),
        }
    }
}

impl CommandExecutor for SystemExecutor {
    fn execute(&self, exe: &str, args: &[String]) -> Result<()> {
        let invocation = Invocation::new(exe, args);
        self.combined_output(&invocation, MessageStyle::Separator)
            .map(|_| ())
    }

    fn run(&self, argv: &[String]) -> Result<Vec<u8>> {
        let Some((exe, args)) = argv.split_first() else {
            return Err(SubprocessFailure::spawn(
                "",
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty argument vector"),
            )
            .with_style(MessageStyle::OutputMarker));
        };

        let invocation = Invocation::new(exe, args);
        self.combined_output(&invocation, MessageStyle::OutputMarker)
    }

    fn execute_with_stdin(&self, input: &[u8], exe: &str, args: &[String]) -> Result<()> {
        let invocation = Invocation::new(exe, args);
        debug!(command = %invocation, bytes = input.len(), "spawning process with stdin");

        let (mut child, output) = invocation
            .spawn_merged(Stdio::piped())
            .map_err(|err| SubprocessFailure::spawn(exe, err))?;

        let drain = output.drain_in_background();
        let mut stdin = InputPipe::new(child.stdin.take());

        if let Err(partial) = stdin.write_payload(input) {
            stdin.close();
            reap(exe, &mut child);
            let captured = drain.join();
            debug!(
                program = exe,
                written = partial.written,
                total = input.len(),
                error = %partial.source,
                "stdin write failed"
            );
            return Err(
                SubprocessFailure::write(exe, partial.source, partial.written, input.len())
                    .with_output(captured),
            );
        }

        stdin.close();

        let status = child.wait();
        let captured = drain.join();
        match status {
            Ok(status) if status.success() => {
                debug!(program = exe, bytes = captured.len(), "process exited successfully");
                Ok(())
            }
            Ok(status) => {
                debug!(program = exe, exit_code = ?status.code(), "process failed");
                Err(SubprocessFailure::exited(exe, status).with_output(captured))
            }
            Err(err) => Err(SubprocessFailure::wait(exe, err).with_output(captured)),
        }
    }
}

/// Kill and wait on a child we are abandoning, so it is not left as a zombie.
fn reap(program: &str, child: &mut Child) {
    if let Err(err) = child.kill() {
        debug!(program, error = %err, "kill after failed stdin write");
    }
    if let Err(err) = child.wait() {
        warn!(program, error = %err, "failed to reap child after stdin write failure");
    }
}
