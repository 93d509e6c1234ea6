//! Synthetic day-by-day uptime history
//!
//! Stands in for a query against stored uptime samples. Whatever replaces it
//! must keep the contract: exactly `window_days` samples, one per calendar
//! day, oldest first, ending today, classified by the thresholds in
//! [`SampleState::from_success_pct`].

use chrono::{Duration, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::model::{DailySample, SampleState, Service};

/// Day offsets (days before today) forced into the down band
pub const DOWN_OFFSETS: [u32; 2] = [5, 36];

/// Day offsets (days before today) forced into the partial band
pub const PARTIAL_OFFSETS: [u32; 4] = [12, 20, 48, 72];

/// Baseline success percentage for an ordinary day
pub const BASELINE_PCT: f64 = 99.5;

/// Baseline varies by up to this much in either direction
pub const BASELINE_JITTER_PCT: f64 = 0.5;

/// Forced down days fall in `[DOWN_BAND_FLOOR_PCT, DOWN_BAND_FLOOR_PCT + DOWN_BAND_SPAN_PCT)`
pub const DOWN_BAND_FLOOR_PCT: f64 = 40.0;
pub const DOWN_BAND_SPAN_PCT: f64 = 10.0;

/// Forced partial days fall in `[PARTIAL_BAND_FLOOR_PCT, PARTIAL_BAND_FLOOR_PCT + PARTIAL_BAND_SPAN_PCT)`
pub const PARTIAL_BAND_FLOOR_PCT: f64 = 65.0;
pub const PARTIAL_BAND_SPAN_PCT: f64 = 20.0;

/// Source of per-service daily samples
pub trait HistoryProvider {
    fn history(&mut self, service: &Service, window_days: u32) -> Vec<DailySample>;
}

/// Build `window_days` samples ending on `today`, oldest first
pub fn generate_history<R: Rng + ?Sized>(
    window_days: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<DailySample> {
    (0..window_days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(i64::from(offset));
            DailySample::new(date, sample_success_pct(offset, rng))
        })
        .collect()
}

fn sample_success_pct<R: Rng + ?Sized>(offset: u32, rng: &mut R) -> f64 {
    let unit: f64 = rng.random();
    if DOWN_OFFSETS.contains(&offset) {
        DOWN_BAND_FLOOR_PCT + unit * DOWN_BAND_SPAN_PCT
    } else if PARTIAL_OFFSETS.contains(&offset) {
        PARTIAL_BAND_FLOOR_PCT + unit * PARTIAL_BAND_SPAN_PCT
    } else {
        BASELINE_PCT + (unit - 0.5) * (2.0 * BASELINE_JITTER_PCT)
    }
}

/// Randomised history with an injectable RNG and an optional fixed "today"
#[derive(Debug, Clone)]
pub struct SyntheticHistory<R = StdRng> {
    rng: R,
    today: Option<NaiveDate>,
}

impl SyntheticHistory<StdRng> {
    /// Seeded from the operating system
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SyntheticHistory<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SyntheticHistory<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng, today: None }
    }

    /// Pin the last generated day instead of using the local date
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

impl<R: Rng> HistoryProvider for SyntheticHistory<R> {
    fn history(&mut self, service: &Service, window_days: u32) -> Vec<DailySample> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let samples = generate_history(window_days, today, &mut self.rng);

        let down = samples.iter().filter(|s| s.state == SampleState::Down).count();
        let partial = samples.iter().filter(|s| s.state == SampleState::Partial).count();
        debug!(
            "Generated {} days of history for {}: {} down, {} partial",
            samples.len(),
            service.id,
            down,
            partial
        );

        samples
    }
}
