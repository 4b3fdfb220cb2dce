// src/config/model.rs

use serde::Deserialize;

use crate::ipvs::Service;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [ipvsadm]
/// binary = "ipvsadm"
///
/// [timeouts]
/// tcp = 900
/// tcp_fin = 120
/// udp = 300
///
/// [daemon]
/// interface = "eth0"
/// sync_id = 1
///
/// [[service]]
/// protocol = "tcp"
/// address = "10.0.0.1:80"
/// scheduler = "wlc"
///
/// [[service.server]]
/// address = "192.168.0.10:8080"
/// forwarder = "masquerading"
/// weight = 2
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub ipvsadm: IpvsadmSection,

    #[serde(default)]
    pub timeouts: TimeoutSection,

    /// Connection sync daemon settings; `start_daemon` needs this.
    #[serde(default)]
    pub daemon: Option<DaemonSection>,

    /// Virtual services restored by `load` and `restore`.
    #[serde(default)]
    pub service: Vec<Service>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub ipvsadm: IpvsadmSection,
    pub timeouts: TimeoutSection,
    pub daemon: Option<DaemonSection>,
    pub service: Vec<Service>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            ipvsadm: raw.ipvsadm,
            timeouts: raw.timeouts,
            daemon: raw.daemon,
            service: raw.service,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}

/// `[ipvsadm]` section: where to find the external binary.
#[derive(Debug, Clone, Deserialize)]
pub struct IpvsadmSection {
    /// Name or path of the ipvsadm binary.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Program used by `check` to look the binary up on the search path.
    #[serde(default = "default_locate_command")]
    pub locate_command: String,
}

fn default_binary() -> String {
    "ipvsadm".to_string()
}

fn default_locate_command() -> String {
    "which".to_string()
}

impl Default for IpvsadmSection {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            locate_command: default_locate_command(),
        }
    }
}

/// `[timeouts]` section, in seconds, as passed to `ipvsadm --set`.
///
/// A value of 0 tells ipvsadm to leave that timeout unchanged.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct TimeoutSection {
    #[serde(default = "default_tcp_timeout")]
    pub tcp: u32,

    #[serde(default = "default_tcp_fin_timeout")]
    pub tcp_fin: u32,

    #[serde(default = "default_udp_timeout")]
    pub udp: u32,
}

fn default_tcp_timeout() -> u32 {
    900
}

fn default_tcp_fin_timeout() -> u32 {
    120
}

fn default_udp_timeout() -> u32 {
    300
}

impl Default for TimeoutSection {
    fn default() -> Self {
        Self {
            tcp: default_tcp_timeout(),
            tcp_fin: default_tcp_fin_timeout(),
            udp: default_udp_timeout(),
        }
    }
}

/// `[daemon]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DaemonSection {
    /// Multicast interface used for connection sync.
    pub interface: String,

    #[serde(default)]
    pub sync_id: u8,
}
