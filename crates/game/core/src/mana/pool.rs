//! Shared mana pool with regeneration and charging.
//!
//! The pool is the single serialization point for mana accounting: every
//! effect, regulator and charge funnels through [`ManaPool::request`] or
//! [`ManaPool::charge`], and both run inside the single-threaded tick, so no
//! two callers can be granted the same mana.

/// Static description of a mana pool, loaded from configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManaPoolDefinition {
    pub max_mana: f32,
    /// Mana regenerated per second of simulated time.
    pub mana_regen_rate: f32,
    pub power_scale: f32,
}

impl Default for ManaPoolDefinition {
    fn default() -> Self {
        Self {
            max_mana: 100.0,
            mana_regen_rate: 10.0,
            power_scale: 1.0,
        }
    }
}

/// Runtime mana state.
///
/// Invariant: `0 <= current_mana <= max_mana` and
/// `0 <= charged_mana <= max_mana` after every operation.
#[derive(Clone, Debug, PartialEq)]
pub struct ManaPool {
    max_mana: f32,
    current_mana: f32,
    charged_mana: f32,
    previous_mana: f32,
    mana_regen_rate: f32,
    power_scale: f32,
    /// Simulated seconds since init, advanced by `update`.
    clock: f32,
    last_request_time: f32,
}

impl ManaPool {
    /// Creates a full pool.
    pub fn new(definition: &ManaPoolDefinition) -> Self {
        let max_mana = definition.max_mana.max(0.0);
        Self {
            max_mana,
            current_mana: max_mana,
            charged_mana: 0.0,
            previous_mana: max_mana,
            mana_regen_rate: definition.mana_regen_rate,
            power_scale: definition.power_scale,
            clock: 0.0,
            last_request_time: 0.0,
        }
    }

    /// Resets the pool to a full, uncharged state for `definition`.
    pub fn init(&mut self, definition: &ManaPoolDefinition) {
        *self = Self::new(definition);
    }

    /// Advances the pool by one tick of `dt` seconds.
    ///
    /// Snapshots the current level as the previous-tick level, then regenerates.
    pub fn update(&mut self, dt: f32) {
        self.previous_mana = self.current_mana;
        self.clock += dt;
        self.current_mana = (self.current_mana + self.mana_regen_rate * dt).clamp(0.0, self.max_mana);
    }

    /// Takes up to `amount` mana from the pool.
    ///
    /// Returns the amount granted, which is 0 when the pool is empty or the
    /// request is not positive. Callers treat 0 as "could not act".
    pub fn request(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 {
            return 0.0;
        }

        let granted = amount.min(self.current_mana);
        self.current_mana -= granted;
        self.last_request_time = self.clock;
        granted
    }

    /// Moves up to `amount` mana from the pool into the charged reserve.
    ///
    /// Only what both the pool balance and the reserve headroom allow is moved;
    /// the rest stays in the pool.
    pub fn charge(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }

        let headroom = self.max_mana - self.charged_mana;
        let moved = amount.min(self.current_mana).min(headroom).max(0.0);
        self.current_mana -= moved;
        self.charged_mana += moved;
        self.last_request_time = self.clock;
    }

    /// Drains and returns the whole charged reserve.
    pub fn request_charged_mana(&mut self) -> f32 {
        core::mem::take(&mut self.charged_mana)
    }

    /// Mana level as of the previous tick.
    pub fn previous_mana(&self) -> f32 {
        self.previous_mana
    }

    pub fn current_mana(&self) -> f32 {
        self.current_mana
    }

    pub fn charged_mana(&self) -> f32 {
        self.charged_mana
    }

    pub fn max_mana(&self) -> f32 {
        self.max_mana
    }

    pub fn power_scale(&self) -> f32 {
        self.power_scale
    }

    /// Simulated time of the most recent request or charge.
    pub fn last_request_time(&self) -> f32 {
        self.last_request_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ManaPool {
        ManaPool::new(&ManaPoolDefinition {
            max_mana: 20.0,
            mana_regen_rate: 6.0,
            power_scale: 1.0,
        })
    }

    #[test]
    fn starts_full() {
        let pool = pool();
        assert_eq!(pool.current_mana(), 20.0);
        assert_eq!(pool.charged_mana(), 0.0);
    }

    #[test]
    fn request_never_grants_more_than_available() {
        let mut pool = pool();
        assert_eq!(pool.request(15.0), 15.0);
        assert_eq!(pool.request(15.0), 5.0);
        assert_eq!(pool.request(1.0), 0.0);
        assert_eq!(pool.current_mana(), 0.0);
    }

    #[test]
    fn negative_requests_grant_nothing() {
        let mut pool = pool();
        assert_eq!(pool.request(-5.0), 0.0);
        assert_eq!(pool.current_mana(), 20.0);
    }

    #[test]
    fn regen_is_capped_at_max() {
        let mut pool = pool();
        pool.request(2.0);
        pool.update(1.0);
        assert_eq!(pool.current_mana(), 20.0);
    }

    #[test]
    fn previous_mana_lags_one_tick() {
        let mut pool = pool();
        pool.request(10.0);
        pool.update(0.5);
        assert_eq!(pool.previous_mana(), 10.0);
        assert_eq!(pool.current_mana(), 13.0);
        pool.update(0.5);
        assert_eq!(pool.previous_mana(), 13.0);
    }

    #[test]
    fn request_records_clock() {
        let mut pool = pool();
        pool.update(0.25);
        pool.update(0.25);
        pool.request(1.0);
        assert_eq!(pool.last_request_time(), 0.5);
    }

    #[test]
    fn charge_moves_mana_into_reserve_and_drains_once() {
        let mut pool = pool();
        pool.charge(8.0);
        assert_eq!(pool.current_mana(), 12.0);
        assert_eq!(pool.charged_mana(), 8.0);

        assert_eq!(pool.request_charged_mana(), 8.0);
        assert_eq!(pool.request_charged_mana(), 0.0);
    }

    #[test]
    fn charge_is_limited_by_balance() {
        let mut pool = pool();
        pool.request(18.0);
        pool.charge(10.0);
        assert_eq!(pool.charged_mana(), 2.0);
        assert_eq!(pool.current_mana(), 0.0);
    }

    #[test]
    fn mana_stays_within_bounds_over_mixed_operations() {
        let mut pool = pool();
        let amounts = [3.0, 40.0, 0.5, 7.0, 12.0, 1.0, 25.0, 0.0, 9.0];
        for (i, amount) in amounts.iter().enumerate() {
            if i % 3 == 0 {
                pool.charge(*amount);
            } else {
                pool.request(*amount);
            }
            pool.update(1.0 / 30.0);
            assert!(pool.current_mana() >= 0.0);
            assert!(pool.current_mana() <= pool.max_mana());
            assert!(pool.charged_mana() <= pool.max_mana());
        }
    }
}
