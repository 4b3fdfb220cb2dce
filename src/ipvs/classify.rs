// src/ipvs/classify.rs

//! Map ipvsadm failures onto the sentinel errors.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::LvsError;
use crate::exec::{FailureKind, SubprocessFailure};

static ALREADY_EXISTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(service|destination) already exists\b").expect("valid regex")
});

static MISSING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bno such (service|destination)\b|\b(service|destination) not defined\b")
        .expect("valid regex")
});

/// Turn a failed rule edit into `Conflict` / `NotFound` when ipvsadm's
/// output says so; anything else stays a plain subprocess failure.
///
/// Only processes that actually ran are classified: a spawn failure never
/// carries ipvsadm's diagnostics.
pub fn classify(failure: SubprocessFailure) -> LvsError {
    if failure.kind() != FailureKind::Wait {
        return LvsError::Subprocess(failure);
    }

    let output = failure.output_lossy();
    if ALREADY_EXISTS.is_match(&output) {
        LvsError::Conflict
    } else if MISSING.is_match(&output) {
        LvsError::NotFound
    } else {
        LvsError::Subprocess(failure)
    }
}
