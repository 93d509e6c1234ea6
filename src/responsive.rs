//! Viewport-driven window length for the uptime panel

use std::time::Duration;
use tracing::debug;

use crate::debounce::Debouncer;

/// `(minimum viewport width, window days)`, widest first
pub const WINDOW_BREAKPOINTS: [(u32, u32); 3] = [(1200, 90), (900, 60), (640, 30)];

/// Window used below the narrowest breakpoint
pub const MIN_WINDOW_DAYS: u32 = 14;

/// Number of days the uptime panel shows at `width`
pub fn days_for_width(width: u32) -> u32 {
    WINDOW_BREAKPOINTS
        .iter()
        .find(|(min_width, _)| width >= *min_width)
        .map(|(_, days)| *days)
        .unwrap_or(MIN_WINDOW_DAYS)
}

/// Owns the currently rendered window length and debounces resize events
#[derive(Debug)]
pub struct ResponsiveController {
    current_days: u32,
    debouncer: Debouncer<u32>,
}

impl ResponsiveController {
    pub fn new(initial_width: u32, debounce: Duration) -> Self {
        Self {
            current_days: days_for_width(initial_width),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn current_days(&self) -> u32 {
        self.current_days
    }

    /// Record a resize; only the last one in a burst is acted upon
    pub fn on_resize(&mut self, width: u32) {
        debug!("Viewport resized to {}px", width);
        self.debouncer.trigger(width);
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Width of the last resize once its burst has quieted
    pub async fn settled_width(&mut self) -> u32 {
        self.debouncer.settled().await
    }

    /// Window length for `width` when it differs from the one last rendered.
    ///
    /// Nothing is committed; call [`ResponsiveController::mark_rendered`] once
    /// the panel shows the new window.
    pub fn window_change(&self, width: u32) -> Option<u32> {
        let next_days = days_for_width(width);
        if next_days == self.current_days {
            debug!(
                "Width {}px keeps the {} day window, nothing to re-render",
                width, next_days
            );
            return None;
        }

        debug!(
            "Width {}px moves window from {} to {} days",
            width, self.current_days, next_days
        );
        Some(next_days)
    }

    /// Record that the panel now shows a `days` window
    pub fn mark_rendered(&mut self, days: u32) {
        self.current_days = days;
    }
}
