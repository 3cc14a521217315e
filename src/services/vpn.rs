use crate::config::VpnFallback;
use crate::models::{errors::SystemError, report::VpnStatus};
use crate::services::command::{run_checked, run_command};
use async_trait::async_trait;
use log::{debug, log, warn};
use std::time::Duration;

#[async_trait]
pub trait VpnClient: Send + Sync {
    async fn is_installed(&self) -> bool;
    /// Raw status text printed by the client.
    async fn status(&self) -> Result<String, SystemError>;
}

/// Talks to a NordVPN-style CLI (`<binary> status`).
pub struct VpnCli {
    binary: String,
    lookup_timeout: Duration,
    status_timeout: Duration,
}

impl VpnCli {
    pub fn new(binary: String, lookup_timeout: Duration, status_timeout: Duration) -> Self {
        Self {
            binary,
            lookup_timeout,
            status_timeout,
        }
    }
}

#[async_trait]
impl VpnClient for VpnCli {
    async fn is_installed(&self) -> bool {
        run_checked("which", &[self.binary.as_str()], self.lookup_timeout)
            .await
            .is_ok()
    }

    async fn status(&self) -> Result<String, SystemError> {
        let output = run_command(&self.binary, &["status"], self.status_timeout).await?;
        // the client reports "not logged in" and similar on stderr with a failure exit
        Ok(if output.success {
            output.stdout
        } else {
            output.stderr
        })
    }
}

pub async fn vpn_status(client: &dyn VpnClient, fallback: VpnFallback) -> VpnStatus {
    if !client.is_installed().await {
        debug!("VPN client not installed");
        return VpnStatus::NotInstalled;
    }

    match client.status().await {
        Ok(text) => {
            let status = parse_status(&text, fallback);
            log!(status.log_level(), "VPN status: {} {}", status.label(), status.detail());
            status
        }
        Err(e) => {
            warn!("{} ({})", SystemError::VpnStatusUnavailable, e);
            VpnStatus::Error {
                message: e.to_string(),
            }
        }
    }
}

pub fn parse_status(raw: &str, fallback: VpnFallback) -> VpnStatus {
    let text = raw.replace('\r', "");
    let text = text.trim();
    debug!("VPN status output: '{}'", text);

    if text.contains("Status: Connected") {
        VpnStatus::Connected {
            country: field(text, "Country:"),
            city: field(text, "City:"),
            technology: field(text, "Current technology:"),
            server: field(text, "Server:"),
        }
    } else if text.contains("Status: Disconnected") {
        VpnStatus::Disconnected
    } else if text.to_lowercase().contains("not logged in") {
        VpnStatus::NotLoggedIn
    } else {
        match fallback {
            VpnFallback::Error => VpnStatus::Error {
                message: format!("Unknown status: {text}"),
            },
            VpnFallback::NotLoggedIn => VpnStatus::NotLoggedIn,
        }
    }
}

/// Value following `label`, skipping any whitespace, up to the end of that line.
fn field(text: &str, label: &str) -> String {
    text.find(label)
        .map(|at| &text[at + label.len()..])
        .and_then(|rest| rest.trim_start().lines().next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONNECTED: &str = "\r-\r  \rStatus: Connected\r\nHostname: fr921.nordvpn.com\nIP: 185.0.0.1\nCountry: France\nCity: Paris\nCurrent technology: NORDLYNX\nCurrent protocol: UDP\nServer: France #921\nUptime: 1 hour\n";

    struct FakeClient {
        installed: bool,
        status: Result<String, SystemError>,
    }

    #[async_trait]
    impl VpnClient for FakeClient {
        async fn is_installed(&self) -> bool {
            self.installed
        }

        async fn status(&self) -> Result<String, SystemError> {
            self.status.clone()
        }
    }

    #[test]
    fn test_connected_fields() {
        assert_eq!(
            parse_status(CONNECTED, VpnFallback::Error),
            VpnStatus::Connected {
                country: "France".to_string(),
                city: "Paris".to_string(),
                technology: "NORDLYNX".to_string(),
                server: "France #921".to_string(),
            }
        );
    }

    #[test]
    fn test_connected_missing_fields_are_unknown() {
        let status = parse_status("Status: Connected\nCountry: France\nCity: Paris", VpnFallback::Error);
        match status {
            VpnStatus::Connected {
                country,
                city,
                technology,
                server,
            } => {
                assert_eq!(country, "France");
                assert_eq!(city, "Paris");
                assert_eq!(technology, "Unknown");
                assert_eq!(server, "Unknown");
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn test_disconnected_and_not_logged_in() {
        assert_eq!(
            parse_status("Status: Disconnected\n", VpnFallback::Error),
            VpnStatus::Disconnected
        );
        assert_eq!(
            parse_status("You are Not logged in.", VpnFallback::Error),
            VpnStatus::NotLoggedIn
        );
    }

    #[test]
    fn test_unrecognised_output_follows_policy() {
        assert_eq!(
            parse_status("Whoops, daemon is restarting", VpnFallback::Error),
            VpnStatus::Error {
                message: "Unknown status: Whoops, daemon is restarting".to_string()
            }
        );
        assert_eq!(
            parse_status("Whoops, daemon is restarting", VpnFallback::NotLoggedIn),
            VpnStatus::NotLoggedIn
        );
    }

    fn cli(binary: &str) -> VpnCli {
        VpnCli::new(binary.to_string(), Duration::from_secs(5), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_cli_reads_stdout_on_success() {
        // `echo status` exits 0 and prints its argument
        let text = cli("echo").status().await.unwrap();
        assert_eq!(text.trim(), "status");
    }

    #[tokio::test]
    async fn test_cli_reads_stderr_on_failure() {
        // `ls status` fails with nothing on stdout and the complaint on stderr
        let text = cli("ls").status().await.unwrap();
        assert!(text.contains("status"), "unexpected output {text:?}");

        match parse_status(&text, VpnFallback::Error) {
            VpnStatus::Error { message } => {
                assert!(message.starts_with("Unknown status: "));
                assert!(message.contains("status"));
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cli_missing_binary() {
        let client = cli("definitely-not-a-vpn-client");
        assert_eq!(client.status().await.unwrap_err(), SystemError::CommandUnavailable);
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_installed() {
        let client = FakeClient {
            installed: false,
            status: Ok(CONNECTED.to_string()),
        };
        assert_eq!(vpn_status(&client, VpnFallback::Error).await, VpnStatus::NotInstalled);
    }

    #[tokio::test]
    async fn test_status_command_failure_is_error() {
        let client = FakeClient {
            installed: true,
            status: Err(SystemError::CommandTimedOut),
        };
        assert_eq!(
            vpn_status(&client, VpnFallback::NotLoggedIn).await,
            VpnStatus::Error {
                message: SystemError::CommandTimedOut.message().to_string()
            }
        );
    }
}
