//! Random zone colours with separated hues.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use parkzone_core::models::ZoneColor;

pub const DEFAULT_ATTEMPTS: u32 = 50;
pub const DEFAULT_HUE_SEPARATION: f64 = 30.0;

/// Picks colours whose hue is more than `min_separation` degrees away from
/// every existing colour.
///
/// After `attempts` rejected candidates the last candidate is returned as is,
/// so picking always terminates even when the wheel is crowded.
#[derive(Debug, Clone)]
pub struct ColorPicker<R = StdRng> {
    rng: R,
    attempts: u32,
    min_separation: f64,
}

impl ColorPicker<StdRng> {
    pub fn new(attempts: u32, min_separation: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), attempts, min_separation)
    }

    /// Deterministic picker for reproducible colours
    pub fn seeded(seed: u64, attempts: u32, min_separation: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), attempts, min_separation)
    }
}

impl Default for ColorPicker<StdRng> {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS, DEFAULT_HUE_SEPARATION)
    }
}

impl<R: Rng> ColorPicker<R> {
    pub fn with_rng(rng: R, attempts: u32, min_separation: f64) -> Self {
        Self { rng, attempts: attempts.max(1), min_separation }
    }

    pub fn pick(&mut self, existing: &[ZoneColor]) -> ZoneColor {
        let mut candidate = self.candidate();
        for attempt in 1..=self.attempts {
            if attempt > 1 {
                candidate = self.candidate();
            }
            if existing.iter().all(|c| c.hue_distance(&candidate) > self.min_separation) {
                return candidate;
            }
        }

        tracing::warn!(
            attempts = self.attempts,
            existing = existing.len(),
            hue = candidate.hue,
            "No well-separated hue found, using last candidate"
        );
        candidate
    }

    fn candidate(&mut self) -> ZoneColor {
        ZoneColor::new(
            self.rng.gen_range(0..360),
            self.rng.gen_range(70..=90),
            self.rng.gen_range(50..=70),
        )
    }
}
