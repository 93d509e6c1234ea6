//! HTML export of an in-memory surface
//!
//! Produces a standalone page with the dashboard regions filled in. Styling
//! is limited to the class hooks; the theme is supplied separately.

use std::fmt::Write;

use crate::surface::{Element, InMemorySurface, Region};

/// Render the whole page
pub fn render_page(surface: &InMemorySurface, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body>
    <header class="overview">
        <h1>{title}</h1>
        {pill}
        {last_updated}
    </header>
    <main>
        <section class="uptime-panel">
            {uptime_list}
        </section>
        <section class="services">
            <table class="services-table">
                <thead>
                    <tr><th>Service</th><th>Group</th><th>Status</th><th>30d uptime</th><th>Last incident</th></tr>
                </thead>
                {services_body}
            </table>
        </section>
        <section class="incidents">
            <h2>Incident history</h2>
            {incident_list}
        </section>
    </main>
    {tooltip}
</body>
</html>
"#,
        title = escape(title),
        pill = render_pill(surface),
        last_updated = render_region(surface, Region::LastUpdatedLabel, "div", "last-updated"),
        uptime_list = render_region(surface, Region::ServiceUptimeList, "div", "service-uptime-list"),
        services_body = render_region(surface, Region::ServicesTableBody, "tbody", ""),
        incident_list = render_region(surface, Region::IncidentList, "div", "incident-list"),
        tooltip = render_region(surface, Region::UptimeTooltip, "div", "uptime-tooltip"),
    )
}

fn render_pill(surface: &InMemorySurface) -> String {
    if !surface.has_region(Region::OverallStatusPill) {
        return String::new();
    }

    let mut classes = vec!["status-pill-large".to_string()];
    classes.extend(surface.classes(Region::OverallStatusPill).iter().cloned());
    format!(
        r#"<div id="{id}" class="{classes}">{label}</div>"#,
        id = Region::OverallStatusPill.id(),
        classes = escape(&classes.join(" ")),
        label = render_region(surface, Region::OverallStatusLabel, "span", ""),
    )
}

/// A region as an element carrying its id, base class and current state
fn render_region(surface: &InMemorySurface, region: Region, tag: &str, base_class: &str) -> String {
    if !surface.has_region(region) {
        return String::new();
    }

    let mut classes: Vec<String> = Vec::new();
    if !base_class.is_empty() {
        classes.push(base_class.to_string());
    }
    classes.extend(surface.classes(region).iter().cloned());

    let mut out = format!("<{} id=\"{}\"", tag, region.id());
    if !classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape(&classes.join(" ")));
    }
    out.push('>');
    if let Some(text) = surface.text(region) {
        out.push_str(&escape(text));
    }
    for child in surface.children(region) {
        render_element(child, &mut out);
    }
    let _ = write!(out, "</{}>", tag);
    out
}

/// Serialize one element and its subtree
pub fn render_element(element: &Element, out: &mut String) {
    let _ = write!(out, "<{}", element.tag);
    if !element.classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape(&element.classes.join(" ")));
    }
    for (key, value) in &element.attrs {
        let _ = write!(out, " {}=\"{}\"", key, escape(value));
    }
    for (key, value) in &element.data {
        let _ = write!(out, " data-{}=\"{}\"", key, escape(value));
    }
    out.push('>');
    if let Some(text) = &element.text {
        out.push_str(&escape(text));
    }
    for child in &element.children {
        render_element(child, out);
    }
    let _ = write!(out, "</{}>", element.tag);
}

/// Escape text for HTML body and attribute contexts
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
