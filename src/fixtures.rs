//! Data sources feeding the dashboard

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::errors::{DashboardError, Result};
use crate::model::{Incident, Service, ServiceStatus, Severity, Snapshot};

/// Supplies the services and incidents for a render cycle
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn load(&self) -> Result<Snapshot>;
}

/// In-memory snapshot, the built-in sample data by default
#[derive(Debug, Clone)]
pub struct StaticSource {
    snapshot: Snapshot,
}

impl StaticSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::new(sample_snapshot())
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn load(&self) -> Result<Snapshot> {
        debug!(
            "Serving static snapshot with {} services and {} incidents",
            self.snapshot.services.len(),
            self.snapshot.incidents.len()
        );
        Ok(self.snapshot.clone())
    }
}

/// Snapshot stored as a JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for JsonFileSource {
    async fn load(&self) -> Result<Snapshot> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;

        if snapshot.services.iter().any(|s| s.id.trim().is_empty()) {
            return Err(DashboardError::Data(format!(
                "{} contains a service with an empty id",
                self.path.display()
            )));
        }

        info!(
            "Loaded snapshot from {}: {} services, {} incidents",
            self.path.display(),
            snapshot.services.len(),
            snapshot.incidents.len()
        );
        Ok(snapshot)
    }
}

fn service(
    id: &str,
    name: &str,
    description: &str,
    group: &str,
    status: ServiceStatus,
    uptime_30d: f64,
    last_incident_at: &str,
) -> Service {
    Service {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        group: Some(group.to_string()),
        status,
        uptime_30d: Some(uptime_30d),
        last_incident_at: Some(last_incident_at.to_string()),
    }
}

fn incident(
    id: &str,
    title: &str,
    severity: Severity,
    started_at: &str,
    resolved_at: Option<&str>,
    services: &[&str],
) -> Incident {
    Incident {
        id: id.to_string(),
        title: title.to_string(),
        severity,
        started_at: started_at.to_string(),
        resolved_at: resolved_at.map(str::to_string),
        services: services.iter().map(|s| s.to_string()).collect(),
    }
}

/// Sample services and incidents, newest incident first
pub fn sample_snapshot() -> Snapshot {
    let services = vec![
        service(
            "core-api",
            "Core API",
            "Public, authenticated RPC and REST endpoints",
            "Core",
            ServiceStatus::Operational,
            99.982,
            "2026-01-15T09:30:00Z",
        ),
        service(
            "ingest",
            "Ingest pipeline",
            "Ingestion and normalization for events",
            "Data",
            ServiceStatus::Operational,
            99.963,
            "2026-01-08T14:10:00Z",
        ),
        service(
            "dashboards",
            "Dashboards",
            "Web dashboard and configuration UI",
            "UX",
            ServiceStatus::Degraded,
            99.721,
            "2026-01-27T06:05:00Z",
        ),
        service(
            "webhooks",
            "Webhooks",
            "Outbound notifications and incident webhooks",
            "Integrations",
            ServiceStatus::Operational,
            99.901,
            "2026-01-11T18:40:00Z",
        ),
    ];

    let incidents = vec![
        incident(
            "incident-3",
            "Elevated error rates on dashboards",
            Severity::Minor,
            "2026-01-27T05:40:00Z",
            None,
            &["dashboards"],
        ),
        incident(
            "incident-2",
            "Webhook delivery delays",
            Severity::Minor,
            "2026-01-11T18:12:00Z",
            Some("2026-01-11T18:40:00Z"),
            &["webhooks"],
        ),
        incident(
            "incident-1",
            "API p99 latency increase",
            Severity::Major,
            "2026-01-08T13:32:00Z",
            Some("2026-01-08T14:10:00Z"),
            &["core-api", "ingest"],
        ),
    ];

    Snapshot::new(services, incidents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_static_source_serves_sample() {
        let snapshot = tokio_test::block_on(StaticSource::default().load()).unwrap();
        assert_eq!(snapshot.services.len(), 4);
        assert_eq!(snapshot.incidents.len(), 3);
        assert_eq!(snapshot.incidents[0].id, "incident-3");
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&sample_snapshot()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let snapshot = JsonFileSource::new(file.path()).load().await.unwrap();
        assert_eq!(snapshot, sample_snapshot());
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file() {
        let result = JsonFileSource::new("/nonexistent/status.json").load().await;
        assert!(matches!(result, Err(DashboardError::Io(_))));
    }

    #[tokio::test]
    async fn test_json_file_source_rejects_empty_id() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"services": [{"id": " ", "name": "Blank"}]}"#)
            .unwrap();

        let result = JsonFileSource::new(file.path()).load().await;
        assert!(matches!(result, Err(DashboardError::Data(_))));
    }
}
