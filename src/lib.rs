// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod ipvs;
pub mod logging;

use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::{CliArgs, LvsCommand};
use crate::exec::CommandExecutor;
use crate::ipvs::{restore_script, Ipvs};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution
/// - the system executor
/// - the ipvs facade
pub fn run(args: CliArgs) -> Result<()> {
    let cfg = config::resolve(args.config.as_deref()).context("loading configuration")?;
    debug!(services = cfg.service.len(), binary = %cfg.ipvsadm.binary, "configuration loaded");

    let ipvs = Ipvs::system(cfg);
    let stdout = std::io::stdout();
    execute_command(&ipvs, args.command, &mut stdout.lock())
}

/// Run one CLI command against `ipvs`, writing any report to `out`.
pub fn execute_command<E: CommandExecutor>(
    ipvs: &Ipvs<E>,
    command: LvsCommand,
    out: &mut impl Write,
) -> Result<()> {
    debug!(?command, "dispatching command");

    match command {
        LvsCommand::Check => ipvs.check()?,
        LvsCommand::Load => ipvs.load()?,
        LvsCommand::Clear => ipvs.clear()?,
        LvsCommand::Restore => ipvs.restore(ipvs.services())?,
        LvsCommand::Save => {
            let dump = ipvs.save()?;
            out.write_all(dump.as_bytes())?;
        }
        LvsCommand::Zero => ipvs.zero()?,
        LvsCommand::SetTimeouts => ipvs.set_timeouts()?,
        LvsCommand::StartDaemon => ipvs
            .start_daemon()?
            .into_result()
            .context("starting sync daemon")?,
        LvsCommand::StopDaemon => ipvs
            .stop_daemon()
            .into_result()
            .context("stopping sync daemon")?,
        LvsCommand::PrintRules => {
            out.write_all(restore_script(ipvs.services()).as_bytes())?;
        }
    }

    out.flush()?;
    Ok(())
}
