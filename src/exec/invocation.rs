// src/exec/invocation.rs

//! A single process invocation and its merged output stream.

use std::fmt;
use std::io::{self, PipeReader, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

use tracing::warn;

/// Executable plus ordered arguments, passed to the OS exactly as given
/// (no shell, no globbing, no quoting).
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    program: &'a str,
    args: &'a [String],
}

impl<'a> Invocation<'a> {
    pub fn new(program: &'a str, args: &'a [String]) -> Self {
        Self { program, args }
    }

    pub fn program(&self) -> &'a str {
        self.program
    }

    pub fn args(&self) -> &'a [String] {
        self.args
    }

    /// Spawn the process with stdout and stderr sharing one pipe.
    ///
    /// The `Command` (and with it our copies of the pipe's write end) is
    /// dropped before returning, so the reader sees EOF once the child and
    /// any of its descendants close their ends.
    pub fn spawn_merged(&self, stdin: Stdio) -> io::Result<(Child, MergedOutput)> {
        let (reader, writer) = io::pipe()?;

        let mut cmd = Command::new(self.program);
        cmd.args(self.args)
            .stdin(stdin)
            .stdout(writer.try_clone()?)
            .stderr(writer);

        let child = cmd.spawn()?;
        Ok((child, MergedOutput { reader }))
    }
}

impl fmt::Display for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Read end of the combined stdout/stderr pipe.
pub struct MergedOutput {
    reader: PipeReader,
}

impl MergedOutput {
    /// Block until every writer has closed the pipe and return what arrived.
    ///
    /// A read error keeps whatever was read before it.
    pub fn read_all(mut self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Err(err) = self.reader.read_to_end(&mut buf) {
            warn!(error = %err, bytes = buf.len(), "error reading process output");
        }
        buf
    }

    /// Drain the pipe on a helper thread so the caller can keep writing to
    /// the child's stdin without both sides blocking on full buffers.
    pub fn drain_in_background(self) -> OutputDrain {
        OutputDrain {
            handle: thread::spawn(move || self.read_all()),
        }
    }
}

#[derive(Debug)]
pub struct OutputDrain {
    handle: JoinHandle<Vec<u8>>,
}

impl OutputDrain {
    pub fn join(self) -> Vec<u8> {
        self.handle.join().unwrap_or_else(|_| {
            warn!("output drain thread panicked; captured output discarded");
            Vec::new()
        })
    }
}
