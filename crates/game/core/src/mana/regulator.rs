//! Burst-then-rate-limited mana draws.

use super::ManaPool;

/// Meters mana for a single running effect.
///
/// A regulator starts with an optional pre-granted burst. Each request drains
/// the burst first and tops up any shortfall from the pool, never granting more
/// than the per-request rate ceiling.
///
/// `burst_mana_rate` is 0 both before any burst was granted and after the
/// burst has been spent. Effects check [`ManaRegulator::needs_burst`] to
/// acquire a fresh burst; the two situations are intentionally the same.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ManaRegulator {
    burst_mana: f32,
    burst_mana_rate: f32,
    rate_ceiling: f32,
}

impl ManaRegulator {
    /// Creates a regulator holding `burst_mana` with a per-request ceiling.
    pub fn new(burst_mana: f32, rate_ceiling: f32) -> Self {
        let burst_mana = burst_mana.max(0.0);
        Self {
            burst_mana,
            burst_mana_rate: if burst_mana > 0.0 { rate_ceiling } else { 0.0 },
            rate_ceiling,
        }
    }

    /// Requests `amount` mana, from the burst first and then from `pool`.
    ///
    /// Without a pool only the burst is available; once it is spent every
    /// request returns 0, which tells the caller to terminate.
    pub fn request(&mut self, pool: Option<&mut ManaPool>, amount: f32) -> f32 {
        let wanted = amount.min(self.rate_ceiling);
        if wanted <= 0.0 {
            return 0.0;
        }

        let from_burst = wanted.min(self.burst_mana);
        self.burst_mana -= from_burst;
        if self.burst_mana <= 0.0 {
            self.burst_mana = 0.0;
            self.burst_mana_rate = 0.0;
        }

        let mut granted = from_burst;
        if let Some(pool) = pool
            && granted < wanted
        {
            granted += pool.request(wanted - granted);
        }

        granted
    }

    /// True when no burst is active, either never granted or fully spent.
    pub fn needs_burst(&self) -> bool {
        self.burst_mana_rate == 0.0
    }

    pub fn burst_mana(&self) -> f32 {
        self.burst_mana
    }

    pub fn burst_mana_rate(&self) -> f32 {
        self.burst_mana_rate
    }

    pub fn rate_ceiling(&self) -> f32 {
        self.rate_ceiling
    }
}
