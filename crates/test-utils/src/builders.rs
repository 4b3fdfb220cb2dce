#![allow(dead_code)]

use std::net::SocketAddr;

use lvs::config::{ConfigFile, DaemonSection, RawConfigFile, TimeoutSection};
use lvs::ipvs::{Forwarder, Protocol, Scheduler, Server, Service};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn binary(mut self, binary: &str) -> Self {
        self.config.ipvsadm.binary = binary.to_string();
        self
    }

    pub fn locate_command(mut self, command: &str) -> Self {
        self.config.ipvsadm.locate_command = command.to_string();
        self
    }

    pub fn timeouts(mut self, tcp: u32, tcp_fin: u32, udp: u32) -> Self {
        self.config.timeouts = TimeoutSection { tcp, tcp_fin, udp };
        self
    }

    pub fn daemon(mut self, interface: &str, sync_id: u8) -> Self {
        self.config.daemon = Some(DaemonSection {
            interface: interface.to_string(),
            sync_id,
        });
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.config.service.push(service);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Service`.
pub struct ServiceBuilder {
    service: Service,
}

impl ServiceBuilder {
    pub fn tcp(address: &str) -> Self {
        Self::new(Protocol::Tcp, address)
    }

    pub fn udp(address: &str) -> Self {
        Self::new(Protocol::Udp, address)
    }

    pub fn new(protocol: Protocol, address: &str) -> Self {
        Self {
            service: Service::new(protocol, parse_addr(address)),
        }
    }

    pub fn scheduler(mut self, scheduler: Scheduler) -> Self {
        self.service.scheduler = scheduler;
        self
    }

    pub fn persistence(mut self, seconds: u32) -> Self {
        self.service.persistence = Some(seconds);
        self
    }

    /// Add a real server with default forwarding and weight.
    pub fn server(mut self, address: &str) -> Self {
        self.service.servers.push(Server::new(parse_addr(address)));
        self
    }

    pub fn server_with(mut self, address: &str, forwarder: Forwarder, weight: u32) -> Self {
        let mut server = Server::new(parse_addr(address));
        server.forwarder = forwarder;
        server.weight = weight;
        self.service.servers.push(server);
        self
    }

    pub fn build(self) -> Service {
        self.service
    }
}

fn parse_addr(address: &str) -> SocketAddr {
    address
        .parse()
        .unwrap_or_else(|e| panic!("invalid socket address '{address}': {e}"))
}
