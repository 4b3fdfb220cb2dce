// tests/common/mod.rs

#![allow(dead_code)]

pub use lvs_test_utils::builders;
pub use lvs_test_utils::init_tracing;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Owned argument vector from string literals.
pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
