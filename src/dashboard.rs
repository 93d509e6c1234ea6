//! Dashboard orchestration: initial render and debounced resize handling

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::errors::Result;
use crate::history::HistoryProvider;
use crate::model::Snapshot;
use crate::render::{
    OverviewView, render_incident_history, render_overview, render_service_uptime_list,
    render_services_table,
};
use crate::responsive::ResponsiveController;
use crate::surface::Surface;

/// Drives every render pass against one surface
pub struct Dashboard<S, H> {
    snapshot: Snapshot,
    surface: S,
    history: H,
    controller: ResponsiveController,
    instance_id: String,
    uptime_renders: u64,
}

impl<S: Surface, H: HistoryProvider> Dashboard<S, H> {
    /// Create a dashboard whose window starts at the surface's viewport width
    pub fn new(snapshot: Snapshot, surface: S, history: H, debounce: Duration) -> Self {
        let controller = ResponsiveController::new(surface.viewport_width(), debounce);
        Self {
            snapshot,
            surface,
            history,
            controller,
            instance_id: Uuid::new_v4().to_string(),
            uptime_renders: 0,
        }
    }

    /// Run all render passes once.
    ///
    /// A pass whose target region is missing is skipped; the others still run.
    #[instrument(skip_all)]
    pub fn initialize(&mut self) -> OverviewView {
        info!(
            "Initializing dashboard with {} services, {} incidents, {} day window",
            self.snapshot.services.len(),
            self.snapshot.incidents.len(),
            self.controller.current_days()
        );

        let overview = render_overview(
            &mut self.surface,
            &self.snapshot.services,
            &self.snapshot.incidents,
        );

        if let Err(e) = render_services_table(&mut self.surface, &self.snapshot.services) {
            warn!("Skipping services table: {}", e);
        }

        if let Err(e) = render_incident_history(
            &mut self.surface,
            &self.snapshot.incidents,
            &self.snapshot.services,
        ) {
            warn!("Skipping incident history: {}", e);
        }

        let days = self.controller.current_days();
        self.render_uptime(days);

        overview
    }

    /// Consume viewport widths until the stream closes and nothing is pending.
    ///
    /// Bursts are debounced; the uptime panel is re-rendered only when the
    /// settled width changes the window length.
    #[instrument(skip_all)]
    pub async fn run(&mut self, mut resize_events: mpsc::Receiver<u32>) -> Result<()> {
        let mut events_open = true;

        loop {
            if !events_open && !self.controller.is_pending() {
                break;
            }

            tokio::select! {
                event = resize_events.recv(), if events_open => match event {
                    Some(width) => self.controller.on_resize(width),
                    None => {
                        debug!("Resize event stream closed");
                        events_open = false;
                    }
                },
                width = self.controller.settled_width() => {
                    if let Some(days) = self.controller.window_change(width) {
                        info!("Viewport {}px selects a {} day window", width, days);
                        if self.render_uptime(days) {
                            self.controller.mark_rendered(days);
                        }
                    }
                }
            }
        }

        info!(
            "Dashboard {} stopped after {} uptime renders",
            self.instance_id, self.uptime_renders
        );
        Ok(())
    }

    /// Returns whether the panel now shows a `days` window
    fn render_uptime(&mut self, days: u32) -> bool {
        match render_service_uptime_list(
            &mut self.surface,
            &self.snapshot.services,
            days,
            &mut self.history,
        ) {
            Ok(_) => {
                self.uptime_renders += 1;
                true
            }
            Err(e) => {
                warn!("Skipping uptime panel: {}", e);
                false
            }
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            instance_id: self.instance_id.clone(),
            window_days: self.controller.current_days(),
            uptime_renders: self.uptime_renders,
            services: self.snapshot.services.len(),
            incidents: self.snapshot.incidents.len(),
        }
    }
}

/// Dashboard statistics
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub instance_id: String,
    pub window_days: u32,
    pub uptime_renders: u64,
    pub services: usize,
    pub incidents: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::DEFAULT_DEBOUNCE;
    use crate::fixtures::sample_snapshot;
    use crate::history::SyntheticHistory;
    use crate::surface::{InMemorySurface, Region};
    use chrono::NaiveDate;

    fn dashboard(width: u32) -> Dashboard<InMemorySurface, SyntheticHistory> {
        let history = SyntheticHistory::seeded(42)
            .with_today(NaiveDate::from_ymd_opt(2026, 1, 30).unwrap());
        Dashboard::new(
            sample_snapshot(),
            InMemorySurface::new(width),
            history,
            DEFAULT_DEBOUNCE,
        )
    }

    #[tokio::test]
    async fn test_initialize_renders_every_pass() {
        let mut dashboard = dashboard(1280);
        let overview = dashboard.initialize();

        assert_eq!(overview.overall.status_label, "Partial System Outage");
        let surface = dashboard.surface();
        assert_eq!(surface.children(Region::ServicesTableBody).len(), 4);
        assert_eq!(surface.children(Region::IncidentList).len(), 3);
        assert_eq!(surface.children(Region::ServiceUptimeList).len(), 4);

        let stats = dashboard.stats();
        assert_eq!(stats.window_days, 90);
        assert_eq!(stats.uptime_renders, 1);
    }

    #[tokio::test]
    async fn test_missing_region_skips_only_that_pass() {
        let history = SyntheticHistory::seeded(1);
        let surface = InMemorySurface::new(1280).without_region(Region::ServicesTableBody);
        let mut dashboard = Dashboard::new(sample_snapshot(), surface, history, DEFAULT_DEBOUNCE);
        dashboard.initialize();

        let surface = dashboard.surface();
        assert!(surface.children(Region::ServicesTableBody).is_empty());
        assert_eq!(surface.children(Region::IncidentList).len(), 3);
        assert_eq!(surface.replace_count(Region::ServiceUptimeList), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_burst_triggers_single_rerender() {
        let mut dashboard = dashboard(1280);
        dashboard.initialize();

        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(async move {
            tx.send(1000).await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
            tx.send(800).await.unwrap();
            tokio::time::sleep(Duration::from_millis(40)).await;
            tx.send(700).await.unwrap();
        });

        dashboard.run(rx).await.unwrap();

        let surface = dashboard.surface();
        assert_eq!(surface.replace_count(Region::ServiceUptimeList), 2);
        let row = &surface.children(Region::ServiceUptimeList)[0];
        assert_eq!(row.find_all("uptime-bar").len(), 30);
        assert_eq!(dashboard.stats().window_days, 30);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_within_bucket_does_not_rerender() {
        let mut dashboard = dashboard(1280);
        dashboard.initialize();

        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(async move {
            tx.send(1250).await.unwrap();
            tokio::time::sleep(Duration::from_millis(300)).await;
            tx.send(1210).await.unwrap();
        });

        dashboard.run(rx).await.unwrap();

        assert_eq!(dashboard.surface().replace_count(Region::ServiceUptimeList), 1);
        assert_eq!(dashboard.stats().uptime_renders, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_rerender_each_change() {
        let mut dashboard = dashboard(500);
        dashboard.initialize();
        assert_eq!(dashboard.stats().window_days, 14);

        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(async move {
            tx.send(950).await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            tx.send(1400).await.unwrap();
        });

        dashboard.run(rx).await.unwrap();

        assert_eq!(dashboard.surface().replace_count(Region::ServiceUptimeList), 3);
        assert_eq!(dashboard.stats().window_days, 90);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skipped_uptime_pass_keeps_rendered_window() {
        let history = SyntheticHistory::seeded(7);
        let surface = InMemorySurface::new(1280).without_region(Region::ServiceUptimeList);
        let mut dashboard = Dashboard::new(sample_snapshot(), surface, history, DEFAULT_DEBOUNCE);
        dashboard.initialize();

        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(async move {
            tx.send(600).await.unwrap();
        });

        dashboard.run(rx).await.unwrap();

        let stats = dashboard.stats();
        assert_eq!(stats.uptime_renders, 0);
        assert_eq!(stats.window_days, 90);
        assert_eq!(dashboard.surface().children(Region::IncidentList).len(), 3);
    }
}
