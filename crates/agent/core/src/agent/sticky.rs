use arrayvec::ArrayVec;

use crate::facts::FactKey;
use crate::state::FactMap;

/// Facts that survive across ticks and only change through events.
pub const STICKY_KEYS: [FactKey; 4] = [
    FactKey::ShouldLoot,
    FactKey::ShouldSkin,
    FactKey::ConsumeCorpse,
    FactKey::ProducedCorpse,
];

/// Durable agent state, applied over every fresh world state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StickyState {
    facts: FactMap,
    kills: u32,
    /// Oldest first.
    recent: ArrayVec<u64, RECENT_KILLS>,
}

impl StickyState {
    /// Every sticky fact starts out false.
    pub fn new() -> Self {
        Self {
            facts: STICKY_KEYS.into_iter().map(|key| (key, false)).collect(),
            kills: 0,
            recent: ArrayVec::new(),
        }
    }

    pub fn is_sticky(key: FactKey) -> bool {
        STICKY_KEYS.contains(&key)
    }

    /// Sets a sticky fact. Returns `false` for keys that are not sticky.
    pub fn set(&mut self, key: FactKey, value: bool) -> bool {
        if !Self::is_sticky(key) {
            return false;
        }
        self.facts.insert(key, value);
        true
    }

    pub fn get(&self, key: FactKey) -> bool {
        self.facts.get(key).unwrap_or(false)
    }

    /// Overrides for [`crate::state::WorldStateBuilder::build`].
    pub fn overrides(&self) -> &FactMap {
        &self.facts
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn last_kill(&self) -> Option<u64> {
        self.recent.last().copied()
    }

    /// Counts a kill once. Returns `false` if `id` is among the last
    /// [`RECENT_KILLS`] credited kills.
    pub fn credit_kill(&mut self, id: u64) -> bool {
        if self.recent.contains(&id) {
            return false;
        }
        if self.recent.is_full() {
            self.recent.remove(0);
        }
        self.recent.push(id);
        self.kills += 1;
        true
    }

    /// Starts a new encounter.
    pub fn reset_kills(&mut self) {
        self.kills = 0;
    }
}

impl Default for StickyState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_sticky_keys_change() {
        let mut sticky = StickyState::new();
        assert!(sticky.set(FactKey::ShouldLoot, true));
        assert!(!sticky.set(FactKey::InCombat, true));

        assert!(sticky.get(FactKey::ShouldLoot));
        assert_eq!(sticky.overrides().get(FactKey::InCombat), None);
        assert_eq!(sticky.overrides().get(FactKey::ShouldSkin), Some(false));
    }

    #[test]
    fn kills_credit_once() {
        let mut sticky = StickyState::new();
        assert!(sticky.credit_kill(7));
        assert!(!sticky.credit_kill(7));
        assert!(sticky.credit_kill(8));
        assert_eq!(sticky.kills(), 2);

        sticky.reset_kills();
        assert_eq!(sticky.kills(), 0);
        assert_eq!(sticky.last_kill(), Some(8));
    }

    #[test]
    fn earlier_kills_are_remembered() {
        let mut sticky = StickyState::new();
        assert!(sticky.credit_kill(1));
        assert!(sticky.credit_kill(2));
        assert!(!sticky.credit_kill(1));
        assert_eq!(sticky.kills(), 2);

        for id in 100..100 + RECENT_KILLS as u64 {
            assert!(sticky.credit_kill(id));
        }
        // 1 has been pushed out.
        assert!(sticky.credit_kill(1));
        assert!(!sticky.credit_kill(100 + RECENT_KILLS as u64 - 1));
    }
}
