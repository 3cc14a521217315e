use crate::services::command::run_checked;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

pub const LOOPBACK: &str = "127.0.0.1";

/// Raw address listings from the host. `None` means the query failed.
#[async_trait]
pub trait InterfaceLister: Send + Sync {
    /// `ip addr show <name>` style output for one interface.
    async fn interface_addresses(&self, name: &str) -> Option<String>;
    /// `ip addr show` style output for every interface.
    async fn all_addresses(&self) -> Option<String>;
    /// `ip route get <target>` style output.
    async fn route_source(&self, target: &str) -> Option<String>;
    /// Whitespace separated host addresses, as printed by `hostname -I`.
    async fn host_addresses(&self) -> Option<String>;
}

pub struct IpCommandLister {
    timeout: Duration,
}

impl IpCommandLister {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl InterfaceLister for IpCommandLister {
    async fn interface_addresses(&self, name: &str) -> Option<String> {
        run_checked("ip", &["addr", "show", name], self.timeout).await.ok()
    }

    async fn all_addresses(&self) -> Option<String> {
        run_checked("ip", &["addr", "show"], self.timeout).await.ok()
    }

    async fn route_source(&self, target: &str) -> Option<String> {
        run_checked("ip", &["route", "get", target], self.timeout).await.ok()
    }

    async fn host_addresses(&self) -> Option<String> {
        run_checked("hostname", &["-I"], self.timeout).await.ok()
    }
}

/// Finds the LAN address of the host, skipping VPN tunnels.
pub struct AddressResolver {
    physical_interfaces: Vec<String>,
    vpn_prefixes: Vec<String>,
    route_target: String,
}

impl AddressResolver {
    pub fn new(physical_interfaces: Vec<String>, vpn_prefixes: Vec<String>, route_target: String) -> Self {
        Self {
            physical_interfaces,
            vpn_prefixes,
            route_target,
        }
    }

    /// Tries, in order: well-known physical interfaces, any non-VPN private
    /// address, the outbound route source, the first host address. Never
    /// returns an empty string.
    pub async fn resolve(&self, lister: &dyn InterfaceLister) -> String {
        for name in &self.physical_interfaces {
            if let Some(addr) = lister
                .interface_addresses(name)
                .await
                .and_then(|out| first_private_inet(&out))
            {
                debug!("Internal IP {} found on {}", addr, name);
                return addr.to_string();
            }
        }

        if let Some(listing) = lister.all_addresses().await {
            let candidate = parse_ip_addr(&listing)
                .into_iter()
                .filter(|(_, addr)| addr.is_private() && !addr.is_loopback())
                .find(|(iface, addr)| {
                    let vpn = self.is_vpn_interface(iface);
                    if vpn {
                        debug!("Skipping {} on VPN interface {}", addr, iface);
                    }
                    !vpn
                });
            if let Some((iface, addr)) = candidate {
                debug!("Internal IP {} found on {}", addr, iface);
                return addr.to_string();
            }
        }

        if let Some(addr) = lister
            .route_source(&self.route_target)
            .await
            .and_then(|out| route_source_addr(&out))
        {
            info!("Internal IP {} taken from route to {}", addr, self.route_target);
            return addr.to_string();
        }

        if let Some(addr) = lister
            .host_addresses()
            .await
            .and_then(|out| out.split_whitespace().next().map(str::to_string))
        {
            warn!("Internal IP {} taken from host address list", addr);
            return addr;
        }

        warn!("Could not determine internal IP, using {}", LOOPBACK);
        LOOPBACK.to_string()
    }

    fn is_vpn_interface(&self, iface: &str) -> bool {
        self.vpn_prefixes.iter().any(|prefix| iface.starts_with(prefix.as_str()))
    }
}

fn inet_addr(line: &str) -> Option<Ipv4Addr> {
    let rest = line.trim_start().strip_prefix("inet ")?;
    let token = rest.split_whitespace().next()?;
    token.split('/').next()?.parse().ok()
}

fn first_private_inet(output: &str) -> Option<Ipv4Addr> {
    output
        .lines()
        .filter_map(inet_addr)
        .find(|addr| addr.is_private())
}

/// Pairs each IPv4 address in `ip addr show` output with its interface.
fn parse_ip_addr(output: &str) -> Vec<(String, Ipv4Addr)> {
    let mut current: Option<String> = None;
    let mut pairs = Vec::new();

    for line in output.lines() {
        if line.starts_with(|c: char| c.is_ascii_digit()) {
            // "3: wg0: <POINTOPOINT,...>" or "5: veth1@if4: <...>"
            current = line
                .split(':')
                .nth(1)
                .map(|name| name.trim().split('@').next().unwrap_or_default().to_string());
        } else if let (Some(iface), Some(addr)) = (current.as_ref(), inet_addr(line)) {
            pairs.push((iface.clone(), addr));
        }
    }
    pairs
}

fn route_source_addr(output: &str) -> Option<IpAddr> {
    let mut tokens = output.split_whitespace();
    tokens.find(|token| *token == "src")?;
    tokens.next()?.parse().ok()
}
