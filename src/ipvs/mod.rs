// src/ipvs/mod.rs

//! Named ipvsadm operations.
//!
//! `Ipvs` builds argument vectors and hands them to its `CommandExecutor`.
//! It owns the executor, so tests swap the backend with
//! [`Ipvs::with_executor`] rather than through shared global state.

pub mod classify;
pub mod service;

use tracing::{debug, info};

use crate::config::{ConfigFile, DaemonSection, IpvsadmSection, TimeoutSection};
use crate::errors::{LvsError, Result};
use crate::exec::{CommandExecutor, SystemExecutor};

pub use classify::classify;
pub use service::{restore_script, Forwarder, Protocol, Scheduler, Server, Service};

/// Connection sync daemon role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonRole {
    Master,
    Backup,
}

impl DaemonRole {
    pub fn as_str(self) -> &'static str {
        match self {
            DaemonRole::Master => "master",
            DaemonRole::Backup => "backup",
        }
    }
}

/// Result of a daemon start/stop, one entry per role.
///
/// Both roles are always attempted; a failure in one does not skip the other.
#[derive(Debug)]
pub struct DaemonOutcome {
    pub master: Result<()>,
    pub backup: Result<()>,
}

impl DaemonOutcome {
    pub fn is_ok(&self) -> bool {
        self.master.is_ok() && self.backup.is_ok()
    }

    /// Fold into the first failure (master before backup).
    pub fn into_result(self) -> Result<()> {
        self.master?;
        self.backup
    }
}

/// ipvsadm facade.
#[derive(Debug)]
pub struct Ipvs<E: CommandExecutor = SystemExecutor> {
    executor: E,
    ipvsadm: IpvsadmSection,
    timeouts: TimeoutSection,
    daemon: Option<DaemonSection>,
    services: Vec<Service>,
}

impl Ipvs<SystemExecutor> {
    /// Facade backed by real process execution.
    pub fn system(config: ConfigFile) -> Self {
        Self::new(config, SystemExecutor::new())
    }
}

impl<E: CommandExecutor> Ipvs<E> {
    pub fn new(config: ConfigFile, executor: E) -> Self {
        Self {
            executor,
            ipvsadm: config.ipvsadm,
            timeouts: config.timeouts,
            daemon: config.daemon,
            services: config.service,
        }
    }

    /// Replace the executor; every later call goes through the new one.
    pub fn with_executor<F: CommandExecutor>(self, executor: F) -> Ipvs<F> {
        Ipvs {
            executor,
            ipvsadm: self.ipvsadm,
            timeouts: self.timeouts,
            daemon: self.daemon,
            services: self.services,
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    fn binary(&self) -> &str {
        &self.ipvsadm.binary
    }

    fn ipvsadm(&self, args: &[String]) -> Result<()> {
        self.executor.execute(self.binary(), args)?;
        Ok(())
    }

    /// Verify that the ipvsadm binary can be found on the search path.
    pub fn check(&self) -> Result<()> {
        let args = [self.ipvsadm.binary.clone()];
        if let Err(err) = self.executor.execute(&self.ipvsadm.locate_command, &args) {
            debug!(error = %err, "ipvsadm lookup failed");
            return Err(LvsError::ToolMissing(self.ipvsadm.binary.clone()));
        }
        Ok(())
    }

    /// Check availability, then restore the services declared in config.
    pub fn load(&self) -> Result<()> {
        self.check()?;

        if self.services.is_empty() {
            info!("no services configured; nothing to restore");
            return Ok(());
        }
        self.restore(&self.services)
    }

    pub fn set_timeouts(&self) -> Result<()> {
        let TimeoutSection { tcp, tcp_fin, udp } = self.timeouts;
        info!(tcp, tcp_fin, udp, "setting connection timeouts");
        self.ipvsadm(&[
            "--set".to_string(),
            tcp.to_string(),
            tcp_fin.to_string(),
            udp.to_string(),
        ])
    }

    /// Start the connection sync daemon as both master and backup.
    ///
    /// Fails up front if no `[daemon]` section is configured.
    pub fn start_daemon(&self) -> Result<DaemonOutcome> {
        let daemon = self.daemon.as_ref().ok_or_else(|| {
            LvsError::ConfigError("start_daemon requires a [daemon] section".to_string())
        })?;

        let start = |role: DaemonRole| {
            info!(role = role.as_str(), interface = %daemon.interface, sync_id = daemon.sync_id, "starting sync daemon");
            self.ipvsadm(&[
                "--start-daemon".to_string(),
                role.as_str().to_string(),
                "--mcast-interface".to_string(),
                daemon.interface.clone(),
                "--syncid".to_string(),
                daemon.sync_id.to_string(),
            ])
        };

        Ok(DaemonOutcome {
            master: start(DaemonRole::Master),
            backup: start(DaemonRole::Backup),
        })
    }

    pub fn stop_daemon(&self) -> DaemonOutcome {
        let stop = |role: DaemonRole| {
            info!(role = role.as_str(), "stopping sync daemon");
            self.ipvsadm(&["--stop-daemon".to_string(), role.as_str().to_string()])
        };

        DaemonOutcome {
            master: stop(DaemonRole::Master),
            backup: stop(DaemonRole::Backup),
        }
    }

    /// Remove every virtual service.
    pub fn clear(&self) -> Result<()> {
        info!("clearing virtual server table");
        self.ipvsadm(&["-C".to_string()])
    }

    /// Replace the table with `services`.
    ///
    /// The clear is the first line of the script fed to `ipvsadm -R`, so the
    /// old table is only dropped by the same invocation that loads the new one.
    pub fn restore(&self, services: &[Service]) -> Result<()> {
        let script = format!("-C\n{}", restore_script(services));
        info!(services = services.len(), bytes = script.len(), "restoring virtual server table");
        self.executor
            .execute_with_stdin(script.as_bytes(), self.binary(), &["-R".to_string()])?;
        Ok(())
    }

    /// Dump the current table in `ipvsadm -R` format.
    pub fn save(&self) -> Result<String> {
        let argv = [self.binary().to_string(), "-S".to_string(), "-n".to_string()];
        let output = self.executor.run(&argv)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// Reset packet/byte counters.
    pub fn zero(&self) -> Result<()> {
        info!("zeroing counters");
        self.ipvsadm(&["-Z".to_string()])
    }

    pub fn add_service(&self, service: &Service) -> Result<()> {
        info!(%service, "adding service");
        self.executor
            .execute(self.binary(), &service.add_args())
            .map_err(classify)?;
        for server in &service.servers {
            self.add_server(service, server)?;
        }
        Ok(())
    }

    /// Delete a service and confirm it is gone.
    pub fn delete_service(&self, service: &Service) -> Result<()> {
        info!(%service, "deleting service");
        self.executor
            .execute(self.binary(), &service.delete_args())
            .map_err(classify)?;

        let mut argv = vec![self.binary().to_string()];
        argv.extend(service.list_args());
        match self.executor.run(&argv) {
            Ok(_) => Err(LvsError::DeleteFailed),
            Err(err) => match classify(err) {
                LvsError::NotFound => Ok(()),
                other => Err(other),
            },
        }
    }

    pub fn add_server(&self, service: &Service, server: &Server) -> Result<()> {
        info!(%service, server = %server.address, "adding server");
        self.executor
            .execute(self.binary(), &server.add_args(service))
            .map_err(classify)?;
        Ok(())
    }

    pub fn delete_server(&self, service: &Service, server: &Server) -> Result<()> {
        info!(%service, server = %server.address, "deleting server");
        self.executor
            .execute(self.binary(), &server.delete_args(service))
            .map_err(classify)?;
        Ok(())
    }
}
