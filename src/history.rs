//! Synthetic sensor history for the charts.
//!
//! ```text
//! hours       = 24 * days
//! vibration   = sin(linspace(0, days * 2pi, hours)) * 5 + N(0, 1)
//! temperature = linspace(20, 35, hours) + N(0, 3)
//! ```
//!
//! Timestamps are hourly and the last one equals the generation time.
//! Generated series are memoised per day count for the life of the process.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::config::defaults::{
    HISTORY_TEMPERATURE_END, HISTORY_TEMPERATURE_NOISE_STD, HISTORY_TEMPERATURE_START,
    HISTORY_VIBRATION_AMPLITUDE, HISTORY_VIBRATION_NOISE_STD, HOURS_PER_DAY,
};
use crate::types::{HistoricalData, HistoryRow};

/// `n` evenly spaced values from `start` to `stop`, both inclusive.
/// A single point yields `start`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Generate `24 * days` hourly rows ending at `end`.
pub fn generate<R: Rng + ?Sized>(days: u32, end: DateTime<Utc>, rng: &mut R) -> HistoricalData {
    let hours = (days * HOURS_PER_DAY) as usize;

    // Both std-devs are positive constants, so construction cannot fail.
    let vib_noise = Normal::new(0.0, HISTORY_VIBRATION_NOISE_STD).ok();
    let temp_noise = Normal::new(0.0, HISTORY_TEMPERATURE_NOISE_STD).ok();

    let phase = linspace(0.0, f64::from(days) * 2.0 * PI, hours);
    let trend = linspace(HISTORY_TEMPERATURE_START, HISTORY_TEMPERATURE_END, hours);

    let rows = phase
        .iter()
        .zip(&trend)
        .enumerate()
        .map(|(i, (theta, base))| {
            let hours_before_end = (hours - 1 - i) as i64;
            HistoryRow {
                time: end - Duration::hours(hours_before_end),
                vibration: theta.sin() * HISTORY_VIBRATION_AMPLITUDE
                    + vib_noise.map_or(0.0, |d| d.sample(rng)),
                temperature: base + temp_noise.map_or(0.0, |d| d.sample(rng)),
            }
        })
        .collect();

    HistoricalData { days, end, rows }
}

/// Per-day-count memo of generated history, shared across requests.
#[derive(Debug, Default, Clone)]
pub struct HistoryCache {
    entries: Arc<RwLock<HashMap<u32, Arc<HistoricalData>>>>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached series for `days`, generating it on first use.
    pub fn get_or_generate(&self, days: u32) -> Arc<HistoricalData> {
        if let Ok(map) = self.entries.read() {
            if let Some(hit) = map.get(&days) {
                return Arc::clone(hit);
            }
        }

        let data = Arc::new(generate(days, Utc::now(), &mut rand::thread_rng()));
        debug!(days, rows = data.len(), "Generated synthetic history");

        match self.entries.write() {
            // Another request may have filled the slot while we generated.
            Ok(mut map) => Arc::clone(map.entry(days).or_insert(data)),
            Err(_) => data,
        }
    }

    /// Number of cached day counts.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
