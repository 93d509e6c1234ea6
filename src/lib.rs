//! Service Status Dashboard Library
//!
//! This library reduces service and incident records into an overall system
//! status, synthesizes per-service uptime history, and renders the dashboard
//! panels onto an injected presentation surface.

pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod errors;
pub mod fixtures;
pub mod format;
pub mod history;
pub mod html;
pub mod model;
pub mod render;
pub mod responsive;
pub mod status;
pub mod surface;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardStats};
pub use debounce::Debouncer;
pub use errors::{DashboardError, Result};
pub use fixtures::{DataSource, JsonFileSource, StaticSource};
pub use history::{HistoryProvider, SyntheticHistory, generate_history};
pub use model::{
    DailySample, Incident, OverallStatus, SampleState, Service, ServiceStatus, Severity, Snapshot,
    SystemStatus,
};
pub use responsive::{ResponsiveController, days_for_width};
pub use status::{UptimeClass, classify_uptime, summarize};
pub use surface::{Element, InMemorySurface, Region, Surface};
