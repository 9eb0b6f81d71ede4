use crate::{
    models::{ServiceEndpoint, ServiceName},
    monitor::{MonitorConfig, DEFAULT_POLL_INTERVAL, DEFAULT_PROBE_TIMEOUT},
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub scenario_url: String,
    pub visual_url: String,
    pub audio_url: String,
    pub editor_url: String,
    pub poll_interval_secs: u64,
    pub probe_timeout_ms: u64,
    pub bind_address: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            scenario_url: ServiceName::Scenario.default_base_url().to_string(),
            visual_url: ServiceName::Visual.default_base_url().to_string(),
            audio_url: ServiceName::Audio.default_base_url().to_string(),
            editor_url: ServiceName::Editor.default_base_url().to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT.as_millis() as u64,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

impl DashboardSettings {
    pub fn validate(&self) -> Result<(), String> {
        for name in ServiceName::ALL {
            let url = self.base_url(name).trim();
            if url.is_empty() {
                return Err(format!("{name}_url must not be empty"));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{name}_url must start with http:// or https://"));
            }
        }
        if self.poll_interval_secs == 0 {
            return Err("poll_interval_secs must be greater than zero".to_string());
        }
        if self.probe_timeout_ms == 0 {
            return Err("probe_timeout_ms must be greater than zero".to_string());
        }
        if self.bind_address.trim().is_empty() {
            return Err("bind_address must not be empty".to_string());
        }
        Ok(())
    }

    pub fn base_url(&self, name: ServiceName) -> &str {
        match name {
            ServiceName::Scenario => &self.scenario_url,
            ServiceName::Visual => &self.visual_url,
            ServiceName::Audio => &self.audio_url,
            ServiceName::Editor => &self.editor_url,
        }
    }

    /// One endpoint per known service, in display order, all `unknown`.
    pub fn endpoints(&self) -> Vec<ServiceEndpoint> {
        ServiceName::ALL
            .into_iter()
            .map(|name| ServiceEndpoint::new(name, self.base_url(name).trim()))
            .collect()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            poll_interval: self.poll_interval(),
            probe_timeout: self.probe_timeout(),
        }
    }
}

pub fn base_dir() -> PathBuf {
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("studio-dashboard");
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("studio-dashboard");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join("studio-dashboard");
    }
    PathBuf::from("studio-dashboard-data")
}

pub fn settings_path() -> PathBuf {
    std::env::var("STUDIO_DASHBOARD_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| base_dir().join("settings.json"))
}

pub async fn load_settings(path: &Path) -> Result<DashboardSettings, String> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => serde_json::from_str(&contents)
            .map_err(|err| format!("failed to parse settings: {err}")),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(DashboardSettings::default()),
        Err(err) => Err(format!("failed to read settings: {err}")),
    }
}
