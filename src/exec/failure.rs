// src/exec/failure.rs

//! Structured failure type for a single process invocation.
//!
//! A `SubprocessFailure` keeps the underlying cause and the captured output
//! as separate fields so callers can inspect them independently. The
//! flattened message (`Display`) is only a rendering of those fields.

use std::fmt;
use std::io;
use std::process::ExitStatus;

/// Which stage of the process lifecycle failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The process could not be created (binary missing, permission denied).
    Spawn,
    /// The stdin payload could not be fully delivered.
    Write { written: usize, total: usize },
    /// The process ran but exited unsuccessfully or could not be waited on.
    Wait,
}

/// The underlying reason a process invocation failed.
#[derive(Debug)]
pub enum Cause {
    Io(io::Error),
    Exit(ExitStatus),
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Io(err) => write!(f, "{err}"),
            Cause::Exit(status) => write!(f, "{status}"),
        }
    }
}

/// How the captured output is joined onto the cause text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageStyle {
    /// `"<cause>: <output>"`
    #[default]
    Separator,
    /// `"<cause> output: <output>"`
    OutputMarker,
}

/// A failed process invocation.
#[derive(Debug)]
pub struct SubprocessFailure {
    kind: FailureKind,
    program: String,
    cause: Cause,
    output: Vec<u8>,
    style: MessageStyle,
}

impl SubprocessFailure {
    pub fn spawn(program: impl Into<String>, err: io::Error) -> Self {
        Self::new(FailureKind::Spawn, program, Cause::Io(err))
    }

    pub fn write(program: impl Into<String>, err: io::Error, written: usize, total: usize) -> Self {
        Self::new(FailureKind::Write { written, total }, program, Cause::Io(err))
    }

    /// The process could not be waited on.
    pub fn wait(program: impl Into<String>, err: io::Error) -> Self {
        Self::new(FailureKind::Wait, program, Cause::Io(err))
    }

    /// The process ran to completion with a non-success status.
    pub fn exited(program: impl Into<String>, status: ExitStatus) -> Self {
        Self::new(FailureKind::Wait, program, Cause::Exit(status))
    }

    fn new(kind: FailureKind, program: impl Into<String>, cause: Cause) -> Self {
        Self {
            kind,
            program: program.into(),
            cause,
            output: Vec::new(),
            style: MessageStyle::default(),
        }
    }

    pub fn with_output(mut self, output: Vec<u8>) -> Self {
        self.output = output;
        self
    }

    pub fn with_style(mut self, style: MessageStyle) -> Self {
        self.style = style;
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// Merged stdout/stderr captured before the failure, if any.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Exit code, when the process ran and exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match &self.cause {
            Cause::Exit(status) => status.code(),
            Cause::Io(_) => None,
        }
    }

    fn fmt_cause(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.cause) {
            (FailureKind::Spawn, cause) => write!(f, "failed to spawn `{}`: {cause}", self.program),
            (FailureKind::Write { written, total }, cause) => write!(
                f,
                "failed writing stdin of `{}` ({written} of {total} bytes delivered): {cause}",
                self.program
            ),
            (FailureKind::Wait, Cause::Exit(status)) => {
                write!(f, "`{}` failed with {status}", self.program)
            }
            (FailureKind::Wait, Cause::Io(err)) => {
                write!(f, "failed waiting on `{}`: {err}", self.program)
            }
        }
    }
}

impl fmt::Display for SubprocessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_cause(f)?;
        let output = String::from_utf8_lossy(&self.output);
        match self.style {
            MessageStyle::Separator => write!(f, ": {output}"),
            MessageStyle::OutputMarker => write!(f, " output: {output}"),
        }
    }
}

impl std::error::Error for SubprocessFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Cause::Io(err) => Some(err),
            Cause::Exit(_) => None,
        }
    }
}
