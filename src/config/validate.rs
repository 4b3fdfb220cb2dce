// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LvsError, Result};
use crate::ipvs::Service;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::LvsError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_program_name("[ipvsadm].binary", &cfg.ipvsadm.binary)?;
    validate_program_name("[ipvsadm].locate_command", &cfg.ipvsadm.locate_command)?;
    validate_daemon(cfg)?;
    validate_services(&cfg.service)?;
    Ok(())
}

fn validate_program_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LvsError::ConfigError(format!("{field} must not be empty")));
    }
    // Arguments are never passed through a shell, so a space can only be a
    // mistake (e.g. "ipvsadm -n").
    if value.chars().any(char::is_whitespace) {
        return Err(LvsError::ConfigError(format!(
            "{field} must be a single program name or path (got '{value}')"
        )));
    }
    Ok(())
}

fn validate_daemon(cfg: &RawConfigFile) -> Result<()> {
    if let Some(daemon) = &cfg.daemon {
        if daemon.interface.trim().is_empty() {
            return Err(LvsError::ConfigError(
                "[daemon].interface must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

/// Check the declared services for duplicates and inconsistent servers.
pub fn validate_services(services: &[Service]) -> Result<()> {
    let mut seen = HashSet::new();
    for service in services {
        if !seen.insert((service.protocol, service.address)) {
            return Err(LvsError::ConfigError(format!(
                "service {} is declared more than once",
                service
            )));
        }
        validate_servers(service)?;
    }
    Ok(())
}

fn validate_servers(service: &Service) -> Result<()> {
    let mut seen = HashSet::new();
    for server in &service.servers {
        if !seen.insert(server.address) {
            return Err(LvsError::ConfigError(format!(
                "server {} is declared more than once in service {}",
                server.address, service
            )));
        }
        if server.address.is_ipv4() != service.address.is_ipv4() {
            return Err(LvsError::ConfigError(format!(
                "server {} does not match the address family of service {}",
                server.address, service
            )));
        }
        if let (Some(lower), Some(upper)) = (server.lower_threshold, server.upper_threshold) {
            if lower > upper {
                return Err(LvsError::ConfigError(format!(
                    "server {} in service {} has lower_threshold {} above upper_threshold {}",
                    server.address, service, lower, upper
                )));
            }
        }
    }
    Ok(())
}
