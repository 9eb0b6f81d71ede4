use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of services the dashboard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceName {
    Scenario,
    Visual,
    Audio,
    Editor,
}

impl ServiceName {
    pub const ALL: [ServiceName; 4] = [
        ServiceName::Scenario,
        ServiceName::Visual,
        ServiceName::Audio,
        ServiceName::Editor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Scenario => "scenario",
            ServiceName::Visual => "visual",
            ServiceName::Audio => "audio",
            ServiceName::Editor => "editor",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceName::Scenario => "Scenario",
            ServiceName::Visual => "Visual",
            ServiceName::Audio => "Audio",
            ServiceName::Editor => "Editor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ServiceName::Scenario => "Generate scripts, characters and scenes.",
            ServiceName::Visual => "Generate images and visual effects for scenes.",
            ServiceName::Audio => "Generate voices, music and sound effects.",
            ServiceName::Editor => "Assemble the project and export the final cut.",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ServiceName::Scenario => "http://localhost:5000",
            ServiceName::Visual => "http://localhost:5001",
            ServiceName::Audio => "http://localhost:5002",
            ServiceName::Editor => "http://localhost:5003",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == value.trim())
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Unknown => "unknown",
            ServiceStatus::Online => "online",
            ServiceStatus::Offline => "offline",
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ServiceStatus::Online)
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub name: ServiceName,
    pub base_url: String,
    #[serde(default)]
    pub status: ServiceStatus,
}

impl ServiceEndpoint {
    pub fn new(name: ServiceName, base_url: impl Into<String>) -> Self {
        Self {
            name,
            base_url: base_url.into(),
            status: ServiceStatus::Unknown,
        }
    }

    /// URL probed by the health monitor: `{base_url}/api/`.
    pub fn health_url(&self) -> String {
        format!("{}/api/", self.base_url.trim_end_matches('/'))
    }
}

/// Complete view of every service as of one finished probe cycle.
///
/// Readers always receive a whole snapshot; a cycle never publishes a
/// partially refreshed list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub services: Vec<ServiceEndpoint>,
    pub cycle: u64,
    #[serde(default)]
    pub checked_at: Option<String>,
}

impl StatusSnapshot {
    pub fn new(services: Vec<ServiceEndpoint>) -> Self {
        Self {
            services,
            cycle: 0,
            checked_at: None,
        }
    }

    pub fn get(&self, name: ServiceName) -> Option<&ServiceEndpoint> {
        self.services.iter().find(|endpoint| endpoint.name == name)
    }

    pub fn status(&self, name: ServiceName) -> ServiceStatus {
        self.get(name)
            .map(|endpoint| endpoint.status)
            .unwrap_or_default()
    }

    pub fn is_online(&self, name: ServiceName) -> bool {
        self.status(name).is_online()
    }

    pub fn online_count(&self) -> usize {
        self.count(ServiceStatus::Online)
    }

    pub fn offline_count(&self) -> usize {
        self.count(ServiceStatus::Offline)
    }

    fn count(&self, status: ServiceStatus) -> usize {
        self.services
            .iter()
            .filter(|endpoint| endpoint.status == status)
            .count()
    }
}
