//! Render passes for the dashboard panels
//!
//! Each pass is independent and idempotent: it rebuilds its region content
//! from the inputs and fully replaces what was there before.

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::errors::{DashboardError, Result};
use crate::format::{PLACEHOLDER, format_date, format_percent, format_short_date, short_date_in};
use crate::history::HistoryProvider;
use crate::model::{
    Incident, OverallStatus, SampleState, Service, ServiceStatus, SystemStatus, service_index,
};
use crate::status::{classify_uptime, summarize};
use crate::surface::{Element, PointerEvent, Region, Surface, TooltipAction};

pub const NO_SERVICES_TEXT: &str = "No services configured yet.";
pub const NO_INCIDENTS_TEXT: &str = "No incidents recorded yet.";

const SERVICES_TABLE_COLUMNS: usize = 5;

/// Result of the overview pass
#[derive(Debug, Clone)]
pub struct OverviewView {
    pub overall: OverallStatus,
    pub rendered_at: DateTime<Local>,
}

/// Write the overall status banner and the "last updated" stamp.
///
/// Each region is written on its own; a missing one is skipped.
pub fn render_overview<S: Surface + ?Sized>(
    surface: &mut S,
    services: &[Service],
    incidents: &[Incident],
) -> OverviewView {
    let overall = summarize(services, incidents);
    let rendered_at = Local::now();

    let pill_classes: &[&str] = match overall.status {
        SystemStatus::Operational => &[],
        SystemStatus::Degraded => &["degraded"],
        SystemStatus::Outage => &["outage"],
    };
    skip_missing(surface.set_classes(Region::OverallStatusPill, pill_classes));
    skip_missing(surface.set_text(Region::OverallStatusLabel, &overall.status_label));
    skip_missing(surface.set_text(
        Region::LastUpdatedLabel,
        &format!("Last updated: {}", rendered_at.format("%H:%M:%S")),
    ));

    info!(
        "Rendered overview: {} ({} active incidents)",
        overall.status_label, overall.active_incidents_count
    );

    OverviewView {
        overall,
        rendered_at,
    }
}

fn skip_missing(result: Result<()>) {
    if let Err(e) = result {
        debug!("Overview region skipped: {}", e);
    }
}

/// Short status labels used by the services table
pub fn table_status_label(status: ServiceStatus) -> &'static str {
    match status {
        ServiceStatus::Operational => "Operational",
        ServiceStatus::Degraded => "Degraded",
        ServiceStatus::Outage => "Outage",
        ServiceStatus::Unknown => "Unknown",
    }
}

/// One row per service, or a single placeholder row
pub fn render_services_table<S: Surface + ?Sized>(
    surface: &mut S,
    services: &[Service],
) -> Result<()> {
    if services.is_empty() {
        let row = Element::new("tr").with_child(
            Element::new("td")
                .with_attr("colspan", SERVICES_TABLE_COLUMNS.to_string())
                .with_text(NO_SERVICES_TEXT),
        );
        return surface.replace_children(Region::ServicesTableBody, vec![row]);
    }

    let rows: Vec<Element> = services.iter().map(service_table_row).collect();
    let count = rows.len();
    surface.replace_children(Region::ServicesTableBody, rows)?;
    debug!("Rendered services table with {} rows", count);
    Ok(())
}

fn service_table_row(service: &Service) -> Element {
    let name_cell = Element::new("td").with_child(
        Element::new("div")
            .with_class("service-name")
            .with_child(
                Element::new("div")
                    .with_class("service-name-primary")
                    .with_text(&service.name),
            )
            .with_child(
                Element::new("div")
                    .with_class("service-name-secondary")
                    .with_text(&service.description),
            ),
    );

    let group = service
        .group
        .as_deref()
        .filter(|g| !g.is_empty())
        .unwrap_or(PLACEHOLDER);
    let group_cell = Element::new("td").with_text(group);

    let status_cell = Element::new("td").with_child(
        Element::new("span")
            .with_class("status-pill")
            .with_class(service.status.as_str())
            .with_text(table_status_label(service.status)),
    );

    let mut uptime = Element::new("span").with_class("uptime-value");
    if let Some(class) = classify_uptime(service.uptime_30d).css_class() {
        uptime = uptime.with_class(class);
    }
    let uptime_cell =
        Element::new("td").with_child(uptime.with_text(format_percent(service.uptime_30d)));

    let last_incident_cell =
        Element::new("td").with_text(format_short_date(service.last_incident_at.as_deref()));

    Element::new("tr")
        .with_child(name_cell)
        .with_child(group_cell)
        .with_child(status_cell)
        .with_child(uptime_cell)
        .with_child(last_incident_cell)
}

/// One card per incident, in the order given
pub fn render_incident_history<S: Surface + ?Sized>(
    surface: &mut S,
    incidents: &[Incident],
    services: &[Service],
) -> Result<()> {
    if incidents.is_empty() {
        let empty = Element::new("div")
            .with_class("incident-empty")
            .with_text(NO_INCIDENTS_TEXT);
        return surface.replace_children(Region::IncidentList, vec![empty]);
    }

    let index = service_index(services);
    let mut cards = Vec::with_capacity(incidents.len());

    for incident in incidents {
        let started = format_date(Some(incident.started_at.as_str()));
        let meta = if incident.is_active() {
            format!("{} • ongoing", started)
        } else {
            format!("{} → {}", started, format_date(incident.resolved_at.as_deref()))
        };

        let left = Element::new("div")
            .with_child(
                Element::new("div")
                    .with_class("incident-title")
                    .with_text(&incident.title),
            )
            .with_child(Element::new("div").with_class("incident-meta").with_text(meta));

        let mut middle = Element::new("div").with_class("incident-services");
        for service_id in &incident.services {
            let label = match index.get(service_id.as_str()) {
                Some(service) => service.name.as_str(),
                None => {
                    debug!(
                        "Incident {} references unknown service {}",
                        incident.id, service_id
                    );
                    service_id.as_str()
                }
            };
            middle = middle.with_child(
                Element::new("span")
                    .with_class("incident-service-pill")
                    .with_text(label),
            );
        }

        let right = Element::new("div").with_child(
            Element::new("div")
                .with_class("incident-severity")
                .with_class(incident.severity.as_str())
                .with_text(incident.severity.label()),
        );

        cards.push(
            Element::new("article")
                .with_class("incident-card")
                .with_data("incident", &incident.id)
                .with_child(left)
                .with_child(middle)
                .with_child(right),
        );
    }

    let count = cards.len();
    surface.replace_children(Region::IncidentList, cards)?;
    debug!("Rendered incident history with {} cards", count);
    Ok(())
}

/// Status labels used by the uptime panel
pub fn panel_status_label(status: ServiceStatus) -> &'static str {
    match status {
        ServiceStatus::Operational => "Operational",
        ServiceStatus::Degraded => "Degraded Performance",
        ServiceStatus::Outage => "Major Outage",
        ServiceStatus::Unknown => "Status Unknown",
    }
}

/// One row of day-bars per service covering `window_days`.
///
/// Returns the number of bars rendered.
pub fn render_service_uptime_list<S, H>(
    surface: &mut S,
    services: &[Service],
    window_days: u32,
    history: &mut H,
) -> Result<usize>
where
    S: Surface + ?Sized,
    H: HistoryProvider + ?Sized,
{
    if services.is_empty() {
        let empty = Element::new("div")
            .with_class("incident-empty")
            .with_text(NO_SERVICES_TEXT);
        surface.replace_children(Region::ServiceUptimeList, vec![empty])?;
        return Ok(0);
    }

    let mut rows = Vec::with_capacity(services.len());
    let mut bar_count = 0;

    for service in services {
        let mut status_label = Element::new("div").with_class("service-status-label");
        if service.status != ServiceStatus::Unknown {
            status_label = status_label.with_class(&format!("status-{}", service.status));
        }
        let status_label = status_label.with_text(panel_status_label(service.status));

        let header = Element::new("div")
            .with_class("service-row-header")
            .with_child(
                Element::new("div")
                    .with_class("service-row-title")
                    .with_child(
                        Element::new("span")
                            .with_class("service-name-label")
                            .with_text(&service.name),
                    )
                    .with_child(Element::new("span").with_class("service-help").with_text("?")),
            )
            .with_child(status_label);

        let mut bars = Element::new("div").with_class("uptime-bars");
        for sample in history.history(service, window_days) {
            bars = bars.with_child(
                Element::new("span")
                    .with_class("uptime-bar")
                    .with_class(&format!("uptime-bar-{}", sample.state))
                    .with_attr("tabindex", "0")
                    .with_data("date", sample.date.format("%Y-%m-%d").to_string())
                    .with_data("status", sample.state.as_str())
                    .with_data("service", &service.name)
                    .with_data("pct", format!("{:.1}", sample.success_pct))
                    .with_listener(PointerEvent::MouseEnter, TooltipAction::Show)
                    .with_listener(PointerEvent::Focus, TooltipAction::Show)
                    .with_listener(PointerEvent::MouseLeave, TooltipAction::Hide)
                    .with_listener(PointerEvent::Blur, TooltipAction::Hide),
            );
            bar_count += 1;
        }

        let axis = Element::new("div")
            .with_class("uptime-axis")
            .with_child(Element::new("span").with_text(format!("{} days ago", window_days)))
            .with_child(
                Element::new("span")
                    .with_class("uptime-axis-center")
                    .with_text(format!("{} uptime", format_percent(service.uptime_30d))),
            )
            .with_child(Element::new("span").with_text("Today"));

        rows.push(
            Element::new("section")
                .with_class("service-row")
                .with_data("service-id", &service.id)
                .with_child(header)
                .with_child(
                    Element::new("div")
                        .with_class("service-row-body")
                        .with_child(bars)
                        .with_child(axis),
                ),
        );
    }

    surface.replace_children(Region::ServiceUptimeList, rows)?;
    info!(
        "Rendered uptime panel: {} services, {} day window, {} bars",
        services.len(),
        window_days,
        bar_count
    );
    Ok(bar_count)
}

/// Data attached to a rendered day-bar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarData {
    pub date: Option<String>,
    pub status: Option<String>,
    pub service: Option<String>,
    pub pct: Option<f64>,
}

impl BarData {
    pub fn from_element(bar: &Element) -> Self {
        Self {
            date: bar.data.get("date").cloned(),
            status: bar.data.get("status").cloned(),
            service: bar.data.get("service").cloned(),
            pct: bar.data.get("pct").and_then(|p| p.parse().ok()),
        }
    }
}

/// Three lines shown while a bar is hovered or focused
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub first_line: String,
    pub second_line: String,
    pub details: String,
}

pub fn describe_bar(bar: &BarData) -> Tooltip {
    let state = match bar.status.as_deref() {
        Some("up") => Some(SampleState::Up),
        Some("partial") => Some(SampleState::Partial),
        Some("down") => Some(SampleState::Down),
        _ => None,
    };
    // Zero counts as missing, matching how the fallback sentence is chosen
    let pct = bar.pct.filter(|p| *p != 0.0 && !p.is_nan());

    let (status_label, details) = match state {
        Some(SampleState::Up) => (
            "Operational",
            "No downtime recorded on this day.".to_string(),
        ),
        Some(SampleState::Partial) => (
            "Partial outage",
            pct.map(success_sentence)
                .unwrap_or_else(|| "Partial outage recorded on this day.".to_string()),
        ),
        Some(SampleState::Down) => (
            "Complete outage",
            pct.map(success_sentence)
                .unwrap_or_else(|| "Complete outage recorded on this day.".to_string()),
        ),
        None => ("Unknown", String::new()),
    };

    let date_label = short_date_in(bar.date.as_deref(), &Local);
    let service = bar.service.as_deref().filter(|s| !s.is_empty());

    let first_line = match (&date_label, service) {
        (Some(date), _) => date.clone(),
        (None, Some(service)) => service.to_string(),
        (None, None) => String::new(),
    };
    let second_line = match (&date_label, service) {
        (Some(_), Some(service)) => format!("{} – {}", service, status_label),
        _ => status_label.to_string(),
    };

    Tooltip {
        first_line,
        second_line,
        details,
    }
}

fn success_sentence(pct: f64) -> String {
    format!("{:.1}% successful checks on this day.", pct)
}

/// Fill and reveal the tooltip for a bar
pub fn show_tooltip<S: Surface + ?Sized>(surface: &mut S, bar: &BarData) -> Result<Tooltip> {
    let tooltip = describe_bar(bar);
    surface.replace_children(
        Region::UptimeTooltip,
        vec![
            Element::new("div")
                .with_class("tooltip-date")
                .with_text(&tooltip.first_line),
            Element::new("div")
                .with_class("tooltip-status")
                .with_text(&tooltip.second_line),
            Element::new("div")
                .with_class("tooltip-details")
                .with_text(&tooltip.details),
        ],
    )?;
    surface.set_classes(Region::UptimeTooltip, &["visible"])?;
    Ok(tooltip)
}

pub fn hide_tooltip<S: Surface + ?Sized>(surface: &mut S) -> Result<()> {
    surface.set_classes(Region::UptimeTooltip, &[])
}

/// Run the listener a bar registered for `event`, if any.
///
/// Returns whether a listener handled the event. A page without a tooltip
/// region swallows the event.
pub fn dispatch_bar_event<S: Surface + ?Sized>(
    surface: &mut S,
    bar: &Element,
    event: PointerEvent,
) -> Result<bool> {
    let outcome = match bar.listener_for(event) {
        None => return Ok(false),
        Some(TooltipAction::Show) => show_tooltip(surface, &BarData::from_element(bar)).map(|_| ()),
        Some(TooltipAction::Hide) => hide_tooltip(surface),
    };

    match outcome {
        Ok(()) => Ok(true),
        Err(DashboardError::MissingRegion(region)) => {
            debug!("Ignoring {} on bar, no {} region", event.as_str(), region.id());
            Ok(true)
        }
        Err(e) => Err(e),
    }
}
