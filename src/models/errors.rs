// models/errors.rs

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemError {
    CommandUnavailable,
    CommandFailed,
    CommandTimedOut,
    UptimeUnavailable,
    LoadAverageUnavailable,
    MemoryInfoUnavailable,
    DiskInfoUnavailable,
    VpnStatusUnavailable,
    QuotesUnreadable,
    TemplateRenderFailed,
}

impl SystemError {
    pub fn message(&self) -> &str {
        match self {
            Self::CommandUnavailable => "Failed to start external command.",
            Self::CommandFailed => "External command exited with a failure status.",
            Self::CommandTimedOut => "External command did not finish in time.",
            Self::UptimeUnavailable => "Failed to retrieve uptime information.",
            Self::LoadAverageUnavailable => "Failed to retrieve load average.",
            Self::MemoryInfoUnavailable => "Failed to retrieve memory information.",
            Self::DiskInfoUnavailable => "Failed to retrieve disk information.",
            Self::VpnStatusUnavailable => "Failed to query VPN client status.",
            Self::QuotesUnreadable => "Failed to read quotes file.",
            Self::TemplateRenderFailed => "Failed to render page template.",
        }
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SystemError {}
