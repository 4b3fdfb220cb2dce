// src/ipvs/service.rs

//! Virtual service and real server descriptions, and their rendering into
//! ipvsadm argument vectors.

use std::fmt;
use std::net::SocketAddr;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    Sctp,
}

impl Protocol {
    fn flag(self) -> &'static str {
        match self {
            Protocol::Tcp => "-t",
            Protocol::Udp => "-u",
            Protocol::Sctp => "--sctp-service",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Sctp => "sctp",
        };
        f.write_str(name)
    }
}

/// Scheduling algorithm name, passed through to ipvsadm as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheduler {
    Rr,
    Wrr,
    Lc,
    #[default]
    Wlc,
    Lblc,
    Lblcr,
    Dh,
    Sh,
    Sed,
    Nq,
    Fo,
    Ovf,
    Mh,
}

impl fmt::Display for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scheduler::Rr => "rr",
            Scheduler::Wrr => "wrr",
            Scheduler::Lc => "lc",
            Scheduler::Wlc => "wlc",
            Scheduler::Lblc => "lblc",
            Scheduler::Lblcr => "lblcr",
            Scheduler::Dh => "dh",
            Scheduler::Sh => "sh",
            Scheduler::Sed => "sed",
            Scheduler::Nq => "nq",
            Scheduler::Fo => "fo",
            Scheduler::Ovf => "ovf",
            Scheduler::Mh => "mh",
        };
        f.write_str(name)
    }
}

/// Packet forwarding method for a real server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Forwarder {
    /// Direct routing.
    #[default]
    Gatewaying,
    /// IP-in-IP tunnelling.
    Ipip,
    /// NAT.
    Masquerading,
}

impl Forwarder {
    fn flag(self) -> &'static str {
        match self {
            Forwarder::Gatewaying => "-g",
            Forwarder::Ipip => "-i",
            Forwarder::Masquerading => "-m",
        }
    }
}

/// A virtual service (`[[service]]` in config).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Service {
    pub protocol: Protocol,
    pub address: SocketAddr,

    #[serde(default)]
    pub scheduler: Scheduler,

    /// Persistence timeout in seconds.
    #[serde(default)]
    pub persistence: Option<u32>,

    #[serde(default, rename = "server")]
    pub servers: Vec<Server>,
}

/// A real server behind a virtual service (`[[service.server]]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Server {
    pub address: SocketAddr,

    #[serde(default)]
    pub forwarder: Forwarder,

    #[serde(default = "default_weight")]
    pub weight: u32,

    #[serde(default)]
    pub upper_threshold: Option<u32>,

    #[serde(default)]
    pub lower_threshold: Option<u32>,
}

fn default_weight() -> u32 {
    1
}

impl Service {
    pub fn new(protocol: Protocol, address: SocketAddr) -> Self {
        Self {
            protocol,
            address,
            scheduler: Scheduler::default(),
            persistence: None,
            servers: Vec::new(),
        }
    }

    /// `-t 10.0.0.1:80`, the part of every rule that names this service.
    pub fn target_args(&self) -> Vec<String> {
        vec![self.protocol.flag().to_string(), self.address.to_string()]
    }

    pub fn add_args(&self) -> Vec<String> {
        let mut args = vec!["-A".to_string()];
        args.extend(self.target_args());
        args.push("-s".to_string());
        args.push(self.scheduler.to_string());
        if let Some(timeout) = self.persistence {
            args.push("-p".to_string());
            args.push(timeout.to_string());
        }
        args
    }

    pub fn delete_args(&self) -> Vec<String> {
        let mut args = vec!["-D".to_string()];
        args.extend(self.target_args());
        args
    }

    /// Arguments that list only this service; succeeds iff it exists.
    pub fn list_args(&self) -> Vec<String> {
        let mut args = vec!["-L".to_string(), "-n".to_string()];
        args.extend(self.target_args());
        args
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.protocol, self.address)
    }
}

impl Server {
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            forwarder: Forwarder::default(),
            weight: default_weight(),
            upper_threshold: None,
            lower_threshold: None,
        }
    }

    pub fn add_args(&self, service: &Service) -> Vec<String> {
        let mut args = vec!["-a".to_string()];
        args.extend(service.target_args());
        args.push("-r".to_string());
        args.push(self.address.to_string());
        args.push(self.forwarder.flag().to_string());
        args.push("-w".to_string());
        args.push(self.weight.to_string());
        if let Some(upper) = self.upper_threshold {
            args.push("-x".to_string());
            args.push(upper.to_string());
        }
        if let Some(lower) = self.lower_threshold {
            args.push("-y".to_string());
            args.push(lower.to_string());
        }
        args
    }

    pub fn delete_args(&self, service: &Service) -> Vec<String> {
        let mut args = vec!["-d".to_string()];
        args.extend(service.target_args());
        args.push("-r".to_string());
        args.push(self.address.to_string());
        args
    }
}

/// Render services into the line format read by `ipvsadm -R`.
pub fn restore_script(services: &[Service]) -> String {
    let mut script = String::new();
    for service in services {
        script.push_str(&service.add_args().join(" "));
        script.push('\n');
        for server in &service.servers {
            script.push_str(&server.add_args(service).join(" "));
            script.push('\n');
        }
    }
    script
}
