// src/exec/stdin.rs

//! Scoped ownership of a child's stdin pipe.
//!
//! The pipe is released exactly once: either by an explicit [`InputPipe::close`]
//! or, on any early return, by `Drop`. Closing an already closed pipe is a
//! no-op.

use std::io::{self, ErrorKind, Write};
use std::process::ChildStdin;

use tracing::trace;

/// Error from [`InputPipe::write_payload`], with the number of bytes the
/// child had already consumed when the write failed.
#[derive(Debug)]
pub struct PartialWrite {
    pub written: usize,
    pub source: io::Error,
}

#[derive(Debug)]
pub struct InputPipe<W: Write = ChildStdin> {
    pipe: Option<W>,
}

impl<W: Write> InputPipe<W> {
    pub fn new(pipe: Option<W>) -> Self {
        Self { pipe }
    }

    pub fn is_open(&self) -> bool {
        self.pipe.is_some()
    }

    /// Write the whole payload, looping over short writes.
    ///
    /// The offset advances by exactly what each `write` call reports. An
    /// interrupted write is retried; a zero-length write or any other error
    /// stops the loop.
    pub fn write_payload(&mut self, payload: &[u8]) -> Result<usize, PartialWrite> {
        let Some(pipe) = self.pipe.as_mut() else {
            return Err(PartialWrite {
                written: 0,
                source: io::Error::new(ErrorKind::BrokenPipe, "stdin pipe is not open"),
            });
        };

        let mut written = 0;
        while written < payload.len() {
            match pipe.write(&payload[written..]) {
                Ok(0) => {
                    return Err(PartialWrite {
                        written,
                        source: io::Error::from(ErrorKind::WriteZero),
                    });
                }
                Ok(n) => {
                    written += n;
                    trace!(written, total = payload.len(), "wrote stdin segment");
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(source) => return Err(PartialWrite { written, source }),
            }
        }

        Ok(written)
    }

    /// Release the pipe, signalling end-of-input to the reader.
    ///
    /// Returns `true` if this call released it, `false` if it was already
    /// closed.
    pub fn close(&mut self) -> bool {
        match self.pipe.take() {
            Some(pipe) => {
                drop(pipe);
                true
            }
            None => false,
        }
    }
}

impl<W: Write> Drop for InputPipe<W> {
    fn drop(&mut self) {
        self.close();
    }
}
