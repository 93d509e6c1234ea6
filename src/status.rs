//! Status aggregation and uptime classification

use crate::model::{Incident, OverallStatus, Service, ServiceStatus, SystemStatus};

/// Lower bound for a healthy 30-day uptime
pub const GOOD_UPTIME_PCT: f64 = 99.95;

/// Lower bound for a degraded-but-acceptable 30-day uptime
pub const WARN_UPTIME_PCT: f64 = 99.0;

/// Reduce services and incidents to a single banner status.
///
/// The worst service status wins; the first outage ends the scan. Services
/// with an unknown status do not escalate.
pub fn summarize(services: &[Service], incidents: &[Incident]) -> OverallStatus {
    let mut status = SystemStatus::Operational;
    for service in services {
        match service.status {
            ServiceStatus::Outage => {
                status = SystemStatus::Outage;
                break;
            }
            ServiceStatus::Degraded if status == SystemStatus::Operational => {
                status = SystemStatus::Degraded;
            }
            _ => {}
        }
    }

    let active_incidents_count = incidents.iter().filter(|i| i.is_active()).count();

    let status_label = match status {
        SystemStatus::Operational if active_incidents_count == 0 => "All Systems Operational",
        SystemStatus::Operational => "Operational with active incidents",
        SystemStatus::Degraded => "Partial System Outage",
        SystemStatus::Outage => "Major Service Outage",
    };

    OverallStatus {
        status,
        status_label: status_label.to_string(),
        active_incidents_count,
    }
}

/// Severity bucket for a 30-day uptime percentage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UptimeClass {
    Unknown,
    Good,
    Warn,
    Bad,
}

impl UptimeClass {
    /// Extra CSS class applied next to `uptime-value`
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            UptimeClass::Unknown => None,
            UptimeClass::Good => Some("uptime-good"),
            UptimeClass::Warn => Some("uptime-warn"),
            UptimeClass::Bad => Some("uptime-bad"),
        }
    }
}

pub fn classify_uptime(uptime: Option<f64>) -> UptimeClass {
    match uptime {
        None => UptimeClass::Unknown,
        Some(pct) if pct >= GOOD_UPTIME_PCT => UptimeClass::Good,
        Some(pct) if pct >= WARN_UPTIME_PCT => UptimeClass::Warn,
        Some(_) => UptimeClass::Bad,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn service_with(status: ServiceStatus) -> Service {
        Service {
            id: format!("svc-{}", status),
            name: status.to_string(),
            description: String::new(),
            group: None,
            status,
            uptime_30d: None,
            last_incident_at: None,
        }
    }

    fn services(statuses: &[ServiceStatus]) -> Vec<Service> {
        statuses.iter().copied().map(service_with).collect()
    }

    fn incident(resolved_at: Option<&str>) -> Incident {
        Incident {
            id: "incident".to_string(),
            title: "Something happened".to_string(),
            severity: Severity::Minor,
            started_at: "2026-01-01T00:00:00Z".to_string(),
            resolved_at: resolved_at.map(str::to_string),
            services: vec![],
        }
    }

    #[test]
    fn test_empty_inputs() {
        let overall = summarize(&[], &[]);
        assert_eq!(overall.status, SystemStatus::Operational);
        assert_eq!(overall.status_label, "All Systems Operational");
        assert_eq!(overall.active_incidents_count, 0);
    }

    #[test]
    fn test_single_outage_dominates_any_position() {
        use ServiceStatus::*;
        for position in 0..4 {
            let mut statuses = vec![Operational; 4];
            statuses[position] = Outage;
            let overall = summarize(&services(&statuses), &[]);
            assert_eq!(overall.status, SystemStatus::Outage);
            assert_eq!(overall.status_label, "Major Service Outage");
        }
    }

    #[test]
    fn test_degraded_escalation() {
        use ServiceStatus::*;
        let overall = summarize(&services(&[Degraded, Operational]), &[]);
        assert_eq!(overall.status, SystemStatus::Degraded);
        assert_eq!(overall.status_label, "Partial System Outage");

        let overall = summarize(&services(&[Operational, Degraded, Outage]), &[]);
        assert_eq!(overall.status, SystemStatus::Outage);

        let overall = summarize(&services(&[Outage, Degraded]), &[]);
        assert_eq!(overall.status, SystemStatus::Outage);
    }

    #[test]
    fn test_unknown_status_does_not_escalate() {
        use ServiceStatus::*;
        let overall = summarize(&services(&[Unknown, Operational, Unknown]), &[]);
        assert_eq!(overall.status, SystemStatus::Operational);
    }

    #[test]
    fn test_active_incidents() {
        use ServiceStatus::*;
        let all_operational = services(&[Operational, Operational]);

        let overall = summarize(&all_operational, &[incident(None)]);
        assert_eq!(overall.status, SystemStatus::Operational);
        assert_eq!(overall.status_label, "Operational with active incidents");
        assert_eq!(overall.active_incidents_count, 1);

        let incidents = vec![
            incident(None),
            incident(Some("2026-01-02T00:00:00Z")),
            incident(None),
        ];
        let overall = summarize(&services(&[Outage]), &incidents);
        assert_eq!(overall.active_incidents_count, 2);
        assert_eq!(overall.status_label, "Major Service Outage");
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify_uptime(None), UptimeClass::Unknown);
        assert_eq!(classify_uptime(Some(100.0)), UptimeClass::Good);
        assert_eq!(classify_uptime(Some(99.95)), UptimeClass::Good);
        assert_eq!(classify_uptime(Some(99.9499)), UptimeClass::Warn);
        assert_eq!(classify_uptime(Some(99.0)), UptimeClass::Warn);
        assert_eq!(classify_uptime(Some(98.999)), UptimeClass::Bad);
        assert_eq!(classify_uptime(Some(0.0)), UptimeClass::Bad);
    }

    #[test]
    fn test_classify_is_monotonic() {
        fn rank(class: UptimeClass) -> u8 {
            match class {
                UptimeClass::Bad => 0,
                UptimeClass::Warn => 1,
                UptimeClass::Good => 2,
                UptimeClass::Unknown => unreachable!(),
            }
        }

        let mut previous = rank(classify_uptime(Some(0.0)));
        for step in 1..=10_000 {
            let pct = step as f64 / 100.0;
            let current = rank(classify_uptime(Some(pct)));
            assert!(current >= previous, "classification regressed at {}", pct);
            previous = current;
        }
    }
}
