use crate::config::{Config, MediaService, SystemService, VpnFallback};
use crate::models::report::{
    DiskUsage, ServiceState, ServiceStatus, StatusReport, SystemInfo, SystemServiceStatus,
    VpnSummary,
};
use crate::services::{
    hardware::{parse_df, parse_load_average, parse_meminfo, parse_uptime, ProcReader, ResourceReader},
    network::{AddressResolver, InterfaceLister, IpCommandLister},
    probe::ServiceProber,
    quotes::QuoteSelector,
    service_checker::{unit_state, ServiceManager, Systemctl},
    vpn::{vpn_status, VpnCli, VpnClient},
};
use chrono::Local;
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Host-facing capabilities the aggregator polls.
#[derive(Clone)]
pub struct Probes {
    pub interfaces: Arc<dyn InterfaceLister>,
    pub services: Arc<dyn ServiceManager>,
    pub resources: Arc<dyn ResourceReader>,
    pub vpn: Arc<dyn VpnClient>,
}

impl Probes {
    pub fn system(config: &Config) -> Self {
        let timeout = config.command_timeout();
        Self {
            interfaces: Arc::new(IpCommandLister::new(timeout)),
            services: Arc::new(Systemctl::new(timeout)),
            resources: Arc::new(ProcReader::new(timeout)),
            vpn: Arc::new(VpnCli::new(
                config.vpn_binary.clone(),
                timeout,
                config.vpn_timeout(),
            )),
        }
    }
}

/// Builds a [`StatusReport`] by running every check in turn. Holds no state
/// between calls.
pub struct StatusAggregator {
    probes: Probes,
    resolver: AddressResolver,
    prober: ServiceProber,
    quotes: QuoteSelector,
    media_services: Vec<MediaService>,
    system_services: Vec<SystemService>,
    disk_mount: String,
    vpn_fallback: VpnFallback,
}

impl StatusAggregator {
    pub fn new(config: &Config, probes: Probes) -> Self {
        Self {
            probes,
            resolver: AddressResolver::new(
                config.physical_interfaces.clone(),
                config.vpn_interface_prefixes.clone(),
                config.route_probe_target.clone(),
            ),
            prober: ServiceProber::new(config.probe_timeout()),
            quotes: QuoteSelector::new(
                config.quote_paths.iter().map(PathBuf::from).collect(),
                config.quote_mode,
            ),
            media_services: config.services.clone(),
            system_services: config.system_services.clone(),
            disk_mount: config.disk_mount.clone(),
            vpn_fallback: config.vpn_fallback,
        }
    }

    pub async fn internal_ip(&self) -> String {
        self.resolver.resolve(self.probes.interfaces.as_ref()).await
    }

    pub async fn collect(&self) -> StatusReport {
        info!("Collecting dashboard status");
        let server_ip = self.internal_ip().await;
        debug!("Server IP: {}", server_ip);

        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "Unknown".to_string());

        let mut services = BTreeMap::new();
        for service in &self.media_services {
            let url = format!("http://{}:{}{}", server_ip, service.port, service.path);
            let status = self.prober.probe(&url).await;
            debug!("{} -> {}", service.key, status);
            services.insert(
                service.key.clone(),
                ServiceStatus {
                    name: service.name.clone(),
                    icon: service.icon.clone(),
                    url,
                    status,
                },
            );
        }

        let mut system_services = BTreeMap::new();
        for service in &self.system_services {
            let status = unit_state(self.probes.services.as_ref(), &service.unit, service.check).await;
            debug!("{} ({}) -> {}", service.key, service.unit, status);
            let fill = |text: &str| text.replace("{server_ip}", &server_ip);
            system_services.insert(
                service.key.clone(),
                SystemServiceStatus {
                    name: service.name.clone(),
                    description: fill(&service.description),
                    status,
                    url: service.url.as_deref().map(fill),
                    smb_path: service.smb_path.as_deref().map(fill),
                },
            );
        }

        let vpn = vpn_status(self.probes.vpn.as_ref(), self.vpn_fallback).await;
        let vpn_summary = VpnSummary::from(&vpn);
        let system_info = self.system_info().await;
        let disk_usage = self.disk_usage().await;

        let now = Local::now();
        let quote = self.quotes.select(now.date_naive()).await;

        let report = StatusReport {
            server_ip,
            hostname,
            timestamp: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            services,
            system_services,
            vpn,
            vpn_summary,
            system_info,
            disk_usage,
            quote,
        };
        info!(
            "Status collected: {}/{} services online, vpn {}",
            report
                .services
                .values()
                .filter(|s| s.status == ServiceState::Online)
                .count(),
            report.services.len(),
            report.vpn.label()
        );
        report
    }

    async fn system_info(&self) -> SystemInfo {
        let defaults = SystemInfo::default();
        let resources = self.probes.resources.as_ref();

        let uptime = resources
            .uptime()
            .await
            .and_then(|content| parse_uptime(&content))
            .unwrap_or(defaults.uptime);
        let load_avg = resources
            .load_average()
            .await
            .and_then(|content| parse_load_average(&content))
            .unwrap_or(defaults.load_avg);
        let memory = resources
            .meminfo()
            .await
            .and_then(|content| parse_meminfo(&content))
            .unwrap_or(defaults.memory);

        SystemInfo {
            uptime,
            load_avg,
            memory,
        }
    }

    async fn disk_usage(&self) -> DiskUsage {
        self.probes
            .resources
            .disk_usage(&self.disk_mount)
            .await
            .and_then(|output| parse_df(&output))
            .unwrap_or_default()
    }
}
