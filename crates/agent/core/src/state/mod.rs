//! World state and partial fact maps.
//!
//! [`WorldState`] is a `u32` where bit `i` is [`FactKey`] `i`. It is `Copy`:
//! applying effects produces a new value and the parent is left untouched,
//! which is what lets the planner keep every node's state for backtracking.
//!
//! [`FactMap`] is a partial state (preconditions, effects, targets, sticky
//! overrides). It caches a `(mask, bits)` pair so both checks are one
//! instruction:
//!
//! - satisfied: `state & mask == bits`
//! - apply: `(state & !mask) | bits`

mod builder;

pub use builder::WorldStateBuilder;

use core::fmt;

use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::facts::FactKey;

/// Snapshot of every fact key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldState(pub u32);

impl WorldState {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn get(self, key: FactKey) -> bool {
        self.0 & key.bit() != 0
    }

    /// Copy with `key` set to `value`.
    #[inline]
    #[must_use]
    pub const fn with(self, key: FactKey, value: bool) -> Self {
        if value {
            Self(self.0 | key.bit())
        } else {
            Self(self.0 & !key.bit())
        }
    }

    /// Keys that are true, in key order.
    pub fn true_facts(self) -> impl Iterator<Item = FactKey> {
        FactKey::iter().filter(move |&key| self.get(key))
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, key) in self.true_facts().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}")?;
        }
        f.write_str("}")
    }
}

/// Maximum entries of a fact map; one per fact key.
pub const MAX_FACTS: usize = 32;

/// Ordered partial state.
///
/// Keys are unique. Inserting a present key replaces its value in place, so
/// the map never holds more entries than there are fact keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FactMap {
    entries: ArrayVec<(FactKey, bool), MAX_FACTS>,
    mask: u32,
    bits: u32,
}

impl FactMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: FactKey, value: bool) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: FactKey, value: bool) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            // Distinct keys never exceed MAX_FACTS.
            None => self.entries.push((key, value)),
        }
        self.mask |= key.bit();
        if value {
            self.bits |= key.bit();
        } else {
            self.bits &= !key.bit();
        }
    }

    pub fn get(&self, key: FactKey) -> Option<bool> {
        (self.mask & key.bit() != 0).then_some(self.bits & key.bit() != 0)
    }

    pub fn contains(&self, key: FactKey) -> bool {
        self.mask & key.bit() != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactKey, bool)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn mask(&self) -> u32 {
        self.mask
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Every entry agrees with `state`. An empty map is satisfied by anything.
    #[inline]
    pub fn satisfied_by(&self, state: WorldState) -> bool {
        state.0 & self.mask == self.bits
    }

    /// `state` with every entry written over it.
    #[inline]
    #[must_use]
    pub fn apply(&self, state: WorldState) -> WorldState {
        WorldState((state.0 & !self.mask) | self.bits)
    }
}

impl FromIterator<(FactKey, bool)> for FactMap {
    fn from_iter<I: IntoIterator<Item = (FactKey, bool)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<const N: usize> From<[(FactKey, bool); N]> for FactMap {
    fn from(entries: [(FactKey, bool); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl fmt::Display for FactMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}
