//! Dashboard data structures

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One monitored component
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ServiceStatus,
    #[serde(rename = "uptime30d", default)]
    pub uptime_30d: Option<f64>,
    #[serde(default)]
    pub last_incident_at: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Operational,
    Degraded,
    Outage,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ServiceStatus {
    /// Key used for CSS classes and bar data
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Operational => "operational",
            ServiceStatus::Degraded => "degraded",
            ServiceStatus::Outage => "outage",
            ServiceStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for ServiceStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "operational" => ServiceStatus::Operational,
            "degraded" => ServiceStatus::Degraded,
            "outage" => ServiceStatus::Outage,
            _ => ServiceStatus::Unknown,
        }
    }
}

/// One historical or ongoing event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: Severity,
    pub started_at: String,
    #[serde(default)]
    pub resolved_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<String>,
}

impl Incident {
    /// An incident without a resolution timestamp is still ongoing
    pub fn is_active(&self) -> bool {
        self.resolved_at.as_deref().is_none_or(|resolved| resolved.is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
    Critical,
    #[default]
    #[serde(other)]
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Minor => "Minor",
            Severity::Major => "Major",
            Severity::Critical => "Critical",
        }
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "major" => Severity::Major,
            "minor" => Severity::Minor,
            _ => Severity::Info,
        }
    }
}

/// Read-only view of everything a render cycle needs
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

impl Snapshot {
    pub fn new(services: Vec<Service>, incidents: Vec<Incident>) -> Self {
        Self { services, incidents }
    }

    /// Index services by id. A duplicated id resolves to its last occurrence.
    pub fn service_index(&self) -> HashMap<&str, &Service> {
        service_index(&self.services)
    }
}

pub fn service_index(services: &[Service]) -> HashMap<&str, &Service> {
    let mut index = HashMap::with_capacity(services.len());
    for service in services {
        if index.insert(service.id.as_str(), service).is_some() {
            warn!("Duplicate service id {}, later entry wins", service.id);
        }
    }
    index
}

/// Health state of a single day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SampleState {
    Up,
    Partial,
    Down,
}

/// Success percentage at or below which a day counts as down
pub const DOWN_THRESHOLD_PCT: f64 = 50.0;

/// Success percentage at or below which a day counts as a partial outage
pub const PARTIAL_THRESHOLD_PCT: f64 = 92.0;

impl SampleState {
    pub fn from_success_pct(success_pct: f64) -> Self {
        if success_pct <= DOWN_THRESHOLD_PCT {
            SampleState::Down
        } else if success_pct <= PARTIAL_THRESHOLD_PCT {
            SampleState::Partial
        } else {
            SampleState::Up
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SampleState::Up => "up",
            SampleState::Partial => "partial",
            SampleState::Down => "down",
        }
    }
}

impl std::fmt::Display for SampleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailySample {
    pub date: NaiveDate,
    pub state: SampleState,
    pub success_pct: f64,
}

impl DailySample {
    pub fn new(date: NaiveDate, success_pct: f64) -> Self {
        Self {
            date,
            state: SampleState::from_success_pct(success_pct),
            success_pct,
        }
    }
}

/// Aggregate status across all services
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    Operational,
    Degraded,
    Outage,
}

impl SystemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemStatus::Operational => "operational",
            SystemStatus::Degraded => "degraded",
            SystemStatus::Outage => "outage",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverallStatus {
    pub status: SystemStatus,
    pub status_label: String,
    pub active_incidents_count: usize,
}
