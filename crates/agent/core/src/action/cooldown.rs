//! Cooldown bookkeeping.
//!
//! Last-use timestamps live in a [`CooldownStore`] keyed by a hash of the
//! action's form and key, so two actions bound to the same key in the same
//! form share a cooldown. The store is owned by whoever builds the actions and
//! handed to every [`ActionTimer`]; nothing is global.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::Form;

/// Millisecond clock.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Monotonic wall clock.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Clock advanced by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

/// Combined hash of `(form, key)`.
pub fn cooldown_id(form: Option<Form>, key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    form.hash(&mut hasher);
    key.hash(&mut hasher);
    hasher.finish()
}

/// Last-use timestamps by cooldown id.
///
/// Only the agent thread writes; diagnostic readers on other threads take the
/// read lock and always see whole records.
#[derive(Debug, Default)]
pub struct CooldownStore {
    last_used: RwLock<HashMap<u64, u64>>,
}

impl CooldownStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_used(&self, id: u64) -> Option<u64> {
        self.last_used
            .read()
            .map(|records| records.get(&id).copied())
            .unwrap_or(None)
    }

    pub fn stamp(&self, id: u64, now_ms: u64) {
        if let Ok(mut records) = self.last_used.write() {
            records.insert(id, now_ms);
        }
    }

    pub fn clear(&self, id: u64) {
        if let Ok(mut records) = self.last_used.write() {
            records.remove(&id);
        }
    }

    /// Copy of every record.
    pub fn snapshot(&self) -> Vec<(u64, u64)> {
        self.last_used
            .read()
            .map(|records| records.iter().map(|(&id, &at)| (id, at)).collect())
            .unwrap_or_default()
    }
}

/// Cooldown and charges of one action.
///
/// # Semantics
///
/// - `cooldown_remaining` is `max(0, cooldown - elapsed)`, `0` if never used
/// - a single-charge action stamps its cooldown on every use
/// - a multi-charge action spends a charge per use; the use that spends the
///   last charge stamps the cooldown and refills the charges
pub struct ActionTimer {
    store: Arc<CooldownStore>,
    clock: Arc<dyn Clock>,
    id: u64,
    cooldown_ms: u64,
    max_charges: u32,
    charges: AtomicU32,
}

impl ActionTimer {
    pub fn new(
        store: Arc<CooldownStore>,
        clock: Arc<dyn Clock>,
        id: u64,
        cooldown_ms: u64,
        charges: u32,
    ) -> Self {
        let max_charges = charges.max(1);
        Self {
            store,
            clock,
            id,
            cooldown_ms,
            max_charges,
            charges: AtomicU32::new(max_charges),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    pub fn max_charges(&self) -> u32 {
        self.max_charges
    }

    pub fn charges_remaining(&self) -> u32 {
        self.charges.load(Ordering::Relaxed)
    }

    pub fn elapsed_ms(&self) -> Option<u64> {
        self.store
            .last_used(self.id)
            .map(|at| self.clock.now_ms().saturating_sub(at))
    }

    pub fn cooldown_remaining(&self) -> u64 {
        self.elapsed_ms()
            .map_or(0, |elapsed| self.cooldown_ms.saturating_sub(elapsed))
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining() == 0
    }

    pub fn record_use(&self) {
        if self.max_charges > 1 {
            let left = self.charges_remaining().saturating_sub(1);
            if left > 0 {
                self.charges.store(left, Ordering::Relaxed);
                return;
            }
            self.charges.store(self.max_charges, Ordering::Relaxed);
        }
        self.store.stamp(self.id, self.clock.now_ms());
    }

    pub fn reset_cooldown(&self) {
        self.store.clear(self.id);
        self.charges.store(self.max_charges, Ordering::Relaxed);
    }
}

impl core::fmt::Debug for ActionTimer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ActionTimer")
            .field("id", &self.id)
            .field("cooldown_ms", &self.cooldown_ms)
            .field("charges", &self.charges_remaining())
            .field("max_charges", &self.max_charges)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(cooldown_ms: u64, charges: u32) -> (Arc<ManualClock>, ActionTimer) {
        let clock = Arc::new(ManualClock::new(1_000));
        let timer = ActionTimer::new(
            Arc::new(CooldownStore::new()),
            clock.clone(),
            cooldown_id(None, "1"),
            cooldown_ms,
            charges,
        );
        (clock, timer)
    }

    #[test]
    fn never_used_is_ready() {
        let (_, timer) = timer(5_000, 1);
        assert_eq!(timer.cooldown_remaining(), 0);
        assert_eq!(timer.elapsed_ms(), None);
    }

    #[test]
    fn cooldown_counts_down() {
        let (clock, timer) = timer(5_000, 1);
        timer.record_use();
        assert_eq!(timer.cooldown_remaining(), 5_000);

        clock.advance(2_000);
        assert_eq!(timer.cooldown_remaining(), 3_000);

        clock.advance(3_000);
        assert_eq!(timer.cooldown_remaining(), 0);

        clock.advance(10_000);
        assert_eq!(timer.cooldown_remaining(), 0);
    }

    #[test]
    fn reset_clears_cooldown() {
        let (_, timer) = timer(5_000, 1);
        timer.record_use();
        timer.reset_cooldown();
        assert_eq!(timer.cooldown_remaining(), 0);
    }

    #[test]
    fn charges_defer_cooldown() {
        let (_, timer) = timer(8_000, 2);
        timer.record_use();
        assert_eq!(timer.charges_remaining(), 1);
        assert_eq!(timer.cooldown_remaining(), 0);

        timer.record_use();
        assert_eq!(timer.charges_remaining(), 2);
        assert_eq!(timer.cooldown_remaining(), 8_000);
    }

    #[test]
    fn ids_depend_on_form_and_key() {
        assert_eq!(cooldown_id(None, "1"), cooldown_id(None, "1"));
        assert_ne!(cooldown_id(None, "1"), cooldown_id(Some(Form::DruidCat), "1"));
        assert_ne!(cooldown_id(None, "1"), cooldown_id(None, "2"));
    }

    #[test]
    fn shared_ids_share_cooldowns() {
        let store = Arc::new(CooldownStore::new());
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0));
        let id = cooldown_id(None, "F1");
        let a = ActionTimer::new(store.clone(), clock.clone(), id, 1_000, 1);
        let b = ActionTimer::new(store.clone(), clock, id, 1_000, 1);

        a.record_use();
        assert_eq!(b.cooldown_remaining(), 1_000);
        assert_eq!(store.snapshot(), vec![(id, 0)]);
    }
}
