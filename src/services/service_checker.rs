use crate::config::UnitCheck;
use crate::models::report::UnitState;
use crate::services::command::run_command;
use async_trait::async_trait;
use log::warn;
use std::time::Duration;

/// Queries against the init system. Failures answer `false`.
#[async_trait]
pub trait ServiceManager: Send + Sync {
    async fn is_active(&self, unit: &str) -> bool;
    async fn is_enabled(&self, unit: &str) -> bool;
}

pub struct Systemctl {
    timeout: Duration,
}

impl Systemctl {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ServiceManager for Systemctl {
    async fn is_active(&self, unit: &str) -> bool {
        match run_command("systemctl", &["is-active", unit], self.timeout).await {
            Ok(output) => output.success && output.stdout.trim() == "active",
            Err(_) => {
                warn!("Failed to check status of service {}", unit);
                false
            }
        }
    }

    async fn is_enabled(&self, unit: &str) -> bool {
        match run_command("systemctl", &["is-enabled", unit], self.timeout).await {
            Ok(output) => output.success,
            Err(_) => {
                warn!("Failed to check whether service {} is enabled", unit);
                false
            }
        }
    }
}

pub async fn unit_state(manager: &dyn ServiceManager, unit: &str, check: UnitCheck) -> UnitState {
    if manager.is_active(unit).await {
        return UnitState::Running;
    }
    match check {
        UnitCheck::Active => UnitState::Stopped,
        UnitCheck::Presence if manager.is_enabled(unit).await => UnitState::Stopped,
        UnitCheck::Presence => UnitState::NotInstalled,
    }
}
