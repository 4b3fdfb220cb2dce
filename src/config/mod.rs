// src/config/mod.rs

//! Configuration loading and validation for lvs.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate program names, daemon settings and declared services
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, resolve};
pub use model::{ConfigFile, DaemonSection, IpvsadmSection, RawConfigFile, TimeoutSection};
pub use validate::validate_services;
