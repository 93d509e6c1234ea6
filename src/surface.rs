//! Presentation surface abstraction
//!
//! Render passes only ever talk to a [`Surface`]: they set text and classes on
//! named regions and replace the full child content of container regions.
//! [`InMemorySurface`] keeps the resulting state plus a call log so tests can
//! assert on what a pass did, and the HTML exporter can serialize it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::errors::{DashboardError, Result};

/// Named regions of the dashboard page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    OverallStatusPill,
    OverallStatusLabel,
    LastUpdatedLabel,
    ServicesTableBody,
    IncidentList,
    ServiceUptimeList,
    UptimeTooltip,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::OverallStatusPill,
        Region::OverallStatusLabel,
        Region::LastUpdatedLabel,
        Region::ServicesTableBody,
        Region::IncidentList,
        Region::ServiceUptimeList,
        Region::UptimeTooltip,
    ];

    /// Element id of the region in the page
    pub fn id(&self) -> &'static str {
        match self {
            Region::OverallStatusPill => "overall-status-pill",
            Region::OverallStatusLabel => "overall-status-label",
            Region::LastUpdatedLabel => "last-updated-label",
            Region::ServicesTableBody => "services-table-body",
            Region::IncidentList => "incident-list",
            Region::ServiceUptimeList => "service-uptime-list",
            Region::UptimeTooltip => "uptime-tooltip",
        }
    }
}

/// Pointer and keyboard events a bar reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEvent {
    MouseEnter,
    MouseLeave,
    Focus,
    Blur,
}

impl PointerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerEvent::MouseEnter => "mouseenter",
            PointerEvent::MouseLeave => "mouseleave",
            PointerEvent::Focus => "focus",
            PointerEvent::Blur => "blur",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TooltipAction {
    Show,
    Hide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub event: PointerEvent,
    pub action: TooltipAction,
}

/// Detached element tree handed to [`Surface::replace_children`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub attrs: BTreeMap<String, String>,
    pub data: BTreeMap<String, String>,
    pub listeners: Vec<Listener>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn with_data(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn with_listener(mut self, event: PointerEvent, action: TooltipAction) -> Self {
        self.listeners.push(Listener { event, action });
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn listener_for(&self, event: PointerEvent) -> Option<TooltipAction> {
        self.listeners
            .iter()
            .find(|l| l.event == event)
            .map(|l| l.action)
    }

    /// Concatenated text of this element and its descendants
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Descendants (including self) carrying `class`, in document order
    pub fn find_all(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    pub fn find(&self, class: &str) -> Option<&Element> {
        self.find_all(class).into_iter().next()
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_class(class, found);
        }
    }
}

/// Target of every render pass
pub trait Surface {
    /// Replace the text content of a region
    fn set_text(&mut self, region: Region, text: &str) -> Result<()>;

    /// Replace the modifier classes of a region
    fn set_classes(&mut self, region: Region, classes: &[&str]) -> Result<()>;

    /// Replace the full child content of a container region
    fn replace_children(&mut self, region: Region, children: Vec<Element>) -> Result<()>;

    /// Current viewport width in CSS pixels
    fn viewport_width(&self) -> u32;
}

/// Recorded surface operation
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    SetText { region: Region, text: String },
    SetClasses { region: Region, classes: Vec<String> },
    ReplaceChildren { region: Region, count: usize },
}

#[derive(Clone, Debug, Default)]
pub struct RegionState {
    pub text: Option<String>,
    pub classes: Vec<String>,
    pub children: Vec<Element>,
}

/// Surface backed by plain data, with an operation log
#[derive(Clone, Debug)]
pub struct InMemorySurface {
    viewport_width: u32,
    regions: HashMap<Region, RegionState>,
    missing: HashSet<Region>,
    calls: Vec<SurfaceCall>,
}

impl InMemorySurface {
    pub fn new(viewport_width: u32) -> Self {
        Self {
            viewport_width,
            regions: HashMap::new(),
            missing: HashSet::new(),
            calls: Vec::new(),
        }
    }

    /// Pretend the page lacks `region`
    pub fn without_region(mut self, region: Region) -> Self {
        self.missing.insert(region);
        self
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    pub fn has_region(&self, region: Region) -> bool {
        !self.missing.contains(&region)
    }

    pub fn region(&self, region: Region) -> Option<&RegionState> {
        self.regions.get(&region)
    }

    pub fn text(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).and_then(|r| r.text.as_deref())
    }

    pub fn classes(&self, region: Region) -> &[String] {
        self.regions
            .get(&region)
            .map(|r| r.classes.as_slice())
            .unwrap_or(&[])
    }

    pub fn children(&self, region: Region) -> &[Element] {
        self.regions
            .get(&region)
            .map(|r| r.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// How many times a region had its children replaced
    pub fn replace_count(&self, region: Region) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::ReplaceChildren { region: r, .. } if *r == region))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn state_mut(&mut self, region: Region) -> Result<&mut RegionState> {
        if self.missing.contains(&region) {
            return Err(DashboardError::MissingRegion(region));
        }
        Ok(self.regions.entry(region).or_default())
    }
}

impl Surface for InMemorySurface {
    fn set_text(&mut self, region: Region, text: &str) -> Result<()> {
        self.state_mut(region)?.text = Some(text.to_string());
        self.calls.push(SurfaceCall::SetText {
            region,
            text: text.to_string(),
        });
        Ok(())
    }

    fn set_classes(&mut self, region: Region, classes: &[&str]) -> Result<()> {
        let classes: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
        self.state_mut(region)?.classes = classes.clone();
        self.calls.push(SurfaceCall::SetClasses { region, classes });
        Ok(())
    }

    fn replace_children(&mut self, region: Region, children: Vec<Element>) -> Result<()> {
        let count = children.len();
        self.state_mut(region)?.children = children;
        debug!("Replaced children of {} with {} elements", region.id(), count);
        self.calls.push(SurfaceCall::ReplaceChildren { region, count });
        Ok(())
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_queries() {
        let tree = Element::new("section")
            .with_class("service-row")
            .with_child(Element::new("span").with_class("label").with_text("Core"))
            .with_child(
                Element::new("div")
                    .with_child(Element::new("span").with_class("label").with_text(" API")),
            );

        assert_eq!(tree.find_all("label").len(), 2);
        assert_eq!(tree.text_content(), "Core API");
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn test_replace_children_is_full_replace() {
        let mut surface = InMemorySurface::new(1024);
        surface
            .replace_children(Region::IncidentList, vec![Element::new("a"), Element::new("b")])
            .unwrap();
        surface
            .replace_children(Region::IncidentList, vec![Element::new("c")])
            .unwrap();

        assert_eq!(surface.children(Region::IncidentList).len(), 1);
        assert_eq!(surface.children(Region::IncidentList)[0].tag, "c");
        assert_eq!(surface.replace_count(Region::IncidentList), 2);
    }

    #[test]
    fn test_missing_region_is_reported() {
        let mut surface = InMemorySurface::new(1024).without_region(Region::LastUpdatedLabel);
        let result = surface.set_text(Region::LastUpdatedLabel, "now");

        assert!(matches!(
            result,
            Err(DashboardError::MissingRegion(Region::LastUpdatedLabel))
        ));
        assert!(surface.calls().is_empty());
    }
}
