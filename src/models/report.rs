use log::Level;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One snapshot of everything the dashboard shows, built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub server_ip: String,
    pub hostname: String,
    pub timestamp: String,
    pub services: BTreeMap<String, ServiceStatus>,
    pub system_services: BTreeMap<String, SystemServiceStatus>,
    pub vpn: VpnStatus,
    pub vpn_summary: VpnSummary,
    pub system_info: SystemInfo,
    pub disk_usage: DiskUsage,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub name: String,
    pub icon: String,
    pub url: String,
    pub status: ServiceState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Online,
    Offline,
    Error,
}

impl ServiceState {
    /// Level a probe result is logged at; anything short of online is a warning.
    pub fn log_level(&self) -> Level {
        match self {
            Self::Online => Level::Debug,
            Self::Offline | Self::Error => Level::Warn,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemServiceStatus {
    pub name: String,
    pub description: String,
    pub status: UnitState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smb_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    Running,
    Stopped,
    NotInstalled,
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::NotInstalled => "not_installed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VpnStatus {
    NotInstalled,
    Disconnected,
    NotLoggedIn,
    Connected {
        country: String,
        city: String,
        technology: String,
        server: String,
    },
    Error {
        message: String,
    },
}

impl VpnStatus {
    /// Short label shown in the pages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotInstalled => "Not installed",
            Self::Disconnected => "Disconnected",
            Self::NotLoggedIn => "Not logged in",
            Self::Connected { .. } => "Connected",
            Self::Error { .. } => "Error",
        }
    }

    /// Only a failed query is a warning; the other states are normal answers.
    pub fn log_level(&self) -> Level {
        match self {
            Self::Error { .. } => Level::Warn,
            _ => Level::Debug,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "online",
            Self::Disconnected | Self::NotLoggedIn => "offline",
            Self::NotInstalled | Self::Error { .. } => "error",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Connected {
                country,
                city,
                technology,
                server,
            } => format!("{city}, {country} via {server} ({technology})"),
            Self::Error { message } => message.clone(),
            _ => String::new(),
        }
    }
}

/// Display form of a [`VpnStatus`], so page refreshes show what the first
/// render showed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnSummary {
    pub label: String,
    pub css_class: String,
    pub detail: String,
}

impl From<&VpnStatus> for VpnSummary {
    fn from(status: &VpnStatus) -> Self {
        Self {
            label: status.label().to_string(),
            css_class: status.css_class().to_string(),
            detail: status.detail(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub uptime: String,
    pub load_avg: [String; 3],
    pub memory: MemoryInfo,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            uptime: "Unknown".to_string(),
            load_avg: ["0.0".to_string(), "0.0".to_string(), "0.0".to_string()],
            memory: MemoryInfo::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemoryInfo {
    #[serde(rename = "totalGiB", serialize_with = "two_decimals")]
    pub total_gib: f64,
    #[serde(rename = "usedGiB", serialize_with = "two_decimals")]
    pub used_gib: f64,
    #[serde(rename = "availableGiB", serialize_with = "two_decimals")]
    pub available_gib: f64,
    #[serde(rename = "percentUsed", serialize_with = "two_decimals")]
    pub percent_used: f64,
}

impl MemoryInfo {
    /// Builds the memory summary from `/proc/meminfo` style kB figures.
    pub fn from_kib(total_kib: u64, available_kib: u64) -> Self {
        let to_gib = |kib: u64| kib as f64 / 1024.0 / 1024.0;
        let total_gib = to_gib(total_kib);
        let available_gib = to_gib(available_kib);
        let used_gib = total_gib - available_gib;
        let percent_used = if total_gib > 0.0 {
            used_gib / total_gib * 100.0
        } else {
            0.0
        };
        Self {
            total_gib,
            used_gib,
            available_gib,
            percent_used,
        }
    }
}

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskUsage {
    pub total: String,
    pub used: String,
    pub available: String,
    pub percent: String,
}

impl Default for DiskUsage {
    fn default() -> Self {
        Self {
            total: "Unknown".to_string(),
            used: "Unknown".to_string(),
            available: "Unknown".to_string(),
            percent: "0%".to_string(),
        }
    }
}
