use crate::models::errors::SystemError;
use crate::models::report::{DiskUsage, MemoryInfo};
use crate::services::command::run_checked;
use async_trait::async_trait;
use log::{error, warn};
use std::time::Duration;
use tokio::fs;

/// Raw host resource sources.
#[async_trait]
pub trait ResourceReader: Send + Sync {
    async fn uptime(&self) -> Result<String, SystemError>;
    async fn load_average(&self) -> Result<String, SystemError>;
    async fn meminfo(&self) -> Result<String, SystemError>;
    /// `df -h <mount>` output.
    async fn disk_usage(&self, mount: &str) -> Result<String, SystemError>;
}

pub struct ProcReader {
    timeout: Duration,
}

impl ProcReader {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ResourceReader for ProcReader {
    async fn uptime(&self) -> Result<String, SystemError> {
        fs::read_to_string("/proc/uptime").await.map_err(|_| {
            error!("{}", SystemError::UptimeUnavailable);
            SystemError::UptimeUnavailable
        })
    }

    async fn load_average(&self) -> Result<String, SystemError> {
        fs::read_to_string("/proc/loadavg").await.map_err(|_| {
            error!("{}", SystemError::LoadAverageUnavailable);
            SystemError::LoadAverageUnavailable
        })
    }

    async fn meminfo(&self) -> Result<String, SystemError> {
        fs::read_to_string("/proc/meminfo").await.map_err(|_| {
            error!("{}", SystemError::MemoryInfoUnavailable);
            SystemError::MemoryInfoUnavailable
        })
    }

    async fn disk_usage(&self, mount: &str) -> Result<String, SystemError> {
        run_checked("df", &["-h", mount], self.timeout).await.map_err(|e| {
            error!("{} ({}: {})", SystemError::DiskInfoUnavailable, mount, e);
            SystemError::DiskInfoUnavailable
        })
    }
}

/// Formats `/proc/uptime` as `<d>d <h>h <m>m`.
pub fn parse_uptime(content: &str) -> Result<String, SystemError> {
    let Some(uptime_seconds) = content
        .split_whitespace()
        .next()
        .and_then(|s| s.parse::<f64>().ok())
    else {
        warn!("Uptime format invalid in /proc/uptime");
        return Err(SystemError::UptimeUnavailable);
    };

    let days = (uptime_seconds / 86400.0).floor() as u64;
    let hours = ((uptime_seconds % 86400.0) / 3600.0).floor() as u64;
    let minutes = ((uptime_seconds % 3600.0) / 60.0).floor() as u64;
    Ok(format!("{}d {}h {}m", days, hours, minutes))
}

pub fn parse_load_average(content: &str) -> Result<[String; 3], SystemError> {
    let mut parts = content.split_whitespace().map(str::to_string);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(one), Some(five), Some(fifteen)) => Ok([one, five, fifteen]),
        _ => {
            warn!("Load average format invalid in /proc/loadavg");
            Err(SystemError::LoadAverageUnavailable)
        }
    }
}

pub fn parse_meminfo(meminfo: &str) -> Result<MemoryInfo, SystemError> {
    let total = extract_memory_value(meminfo, "MemTotal")?;
    let available = extract_memory_value(meminfo, "MemAvailable")?;
    Ok(MemoryInfo::from_kib(total, available))
}

fn extract_memory_value(meminfo: &str, key: &str) -> Result<u64, SystemError> {
    meminfo
        .lines()
        .find(|line| line.split(':').next() == Some(key))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|value| value.parse::<u64>().ok())
        .ok_or_else(|| {
            warn!("Key {} not found in /proc/meminfo", key);
            SystemError::MemoryInfoUnavailable
        })
}

/// Takes size, used, avail and use% from the second line of `df -h`.
pub fn parse_df(output: &str) -> Result<DiskUsage, SystemError> {
    let columns: Vec<&str> = output
        .lines()
        .nth(1)
        .map(|line| line.split_whitespace().collect())
        .unwrap_or_default();

    match columns.as_slice() {
        [_, total, used, available, percent, ..] => Ok(DiskUsage {
            total: total.to_string(),
            used: used.to_string(),
            available: available.to_string(),
            percent: percent.to_string(),
        }),
        _ => {
            warn!("Unexpected df output: {}", output.trim());
            Err(SystemError::DiskInfoUnavailable)
        }
    }
}
