use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_file")]
    pub log_file: String,

    #[serde(default = "default_server_address")]
    pub server_address: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    #[serde(default = "default_vpn_timeout_secs")]
    pub vpn_timeout_secs: u64,

    #[serde(default = "default_disk_mount")]
    pub disk_mount: String,

    #[serde(default = "default_physical_interfaces")]
    pub physical_interfaces: Vec<String>,

    #[serde(default = "default_vpn_interface_prefixes")]
    pub vpn_interface_prefixes: Vec<String>,

    #[serde(default = "default_route_probe_target")]
    pub route_probe_target: String,

    #[serde(default = "default_quote_paths")]
    pub quote_paths: Vec<String>,

    #[serde(default)]
    pub quote_mode: QuoteMode,

    #[serde(default)]
    pub vpn_fallback: VpnFallback,

    #[serde(default = "default_vpn_binary")]
    pub vpn_binary: String,

    #[serde(default = "default_images_dirs")]
    pub images_dirs: Vec<String>,

    #[serde(default = "default_services")]
    pub services: Vec<MediaService>,

    #[serde(default = "default_system_services")]
    pub system_services: Vec<SystemService>,
}

/// A web application probed over HTTP at `http://<server ip>:<port><path>`.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaService {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub port: u16,
    #[serde(default)]
    pub path: String,
}

/// A unit checked through the service manager.
///
/// `description`, `url` and `smb_path` may contain `{server_ip}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemService {
    pub key: String,
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub check: UnitCheck,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub smb_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCheck {
    /// running / stopped / not_installed
    #[default]
    Presence,
    /// running / stopped
    Active,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteMode {
    #[default]
    Random,
    Daily,
}

/// What an unrecognised VPN status output maps to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VpnFallback {
    #[default]
    Error,
    NotLoggedIn,
}

impl Config {
    /// Loads configuration from a TOML file (optional) and `DASHBOARD_*`
    /// environment variables, falling back to defaults.
    pub fn from_file(file: &str) -> Result<Self, ConfigError> {
        let settings = ConfigLoader::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("DASHBOARD").try_parsing(true))
            .build()?;
        settings.try_deserialize::<Self>()
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn vpn_timeout(&self) -> Duration {
        Duration::from_secs(self.vpn_timeout_secs)
    }

    /// First existing directory among `images_dirs`, else the first candidate.
    pub fn resolve_images_dir(&self) -> PathBuf {
        self.images_dirs
            .iter()
            .map(PathBuf::from)
            .find(|dir| dir.is_dir())
            .or_else(|| self.images_dirs.first().map(PathBuf::from))
            .unwrap_or_else(|| Path::new("images").to_path_buf())
    }
}

fn default_server_address() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "dashboard.log".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    3
}

fn default_command_timeout_secs() -> u64 {
    5
}

fn default_vpn_timeout_secs() -> u64 {
    10
}

fn default_disk_mount() -> String {
    "/srv/serverFilesystem".to_string()
}

fn default_physical_interfaces() -> Vec<String> {
    ["eth0", "ens160", "ens192", "ens33", "enp0s3", "enp0s8", "wlan0", "wlp2s0"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_vpn_interface_prefixes() -> Vec<String> {
    ["nordlynx", "tun", "tap", "ppp", "wg"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_route_probe_target() -> String {
    "8.8.8.8".to_string()
}

fn default_quote_paths() -> Vec<String> {
    [
        "MOTD/motd-quotes.txt",
        "/opt/wawyc/MOTD/motd-quotes.txt",
        "../MOTD/motd-quotes.txt",
        "/tmp/motd-quotes.txt",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_vpn_binary() -> String {
    "nordvpn".to_string()
}

fn default_images_dirs() -> Vec<String> {
    vec!["images".to_string(), "../images".to_string()]
}

fn default_services() -> Vec<MediaService> {
    let service = |key: &str, name: &str, icon: &str, port: u16, path: &str| MediaService {
        key: key.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        port,
        path: path.to_string(),
    };
    vec![
        service("radarr", "Radarr (Movies)", "🎬", 7878, ""),
        service("sonarr", "Sonarr (TV Shows)", "📺", 8989, ""),
        service("prowlarr", "Prowlarr (Indexers)", "🔍", 9696, ""),
        service("plex", "Plex Media Server", "🎭", 32400, "/web"),
        service("overseerr", "Overseerr (Requests)", "📋", 5055, ""),
        service("qbittorrent", "qBittorrent", "🌊", 8080, ""),
        service("prometheus", "Prometheus (Monitoring)", "📊", 9090, ""),
    ]
}

fn default_system_services() -> Vec<SystemService> {
    vec![
        SystemService {
            key: "unpackerr".to_string(),
            name: "Unpackerr".to_string(),
            unit: "unpackerr".to_string(),
            description: "Auto-extracts archives".to_string(),
            check: UnitCheck::Presence,
            url: None,
            smb_path: None,
        },
        SystemService {
            key: "samba".to_string(),
            name: "Samba File Share".to_string(),
            unit: "smbd".to_string(),
            description: r"\\{server_ip}\sambashare".to_string(),
            check: UnitCheck::Active,
            url: Some("file:///{server_ip}/sambashare".to_string()),
            smb_path: Some(r"\\{server_ip}\sambashare".to_string()),
        },
    ]
}
