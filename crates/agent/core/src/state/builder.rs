use arrayvec::ArrayVec;
use requirement::{BoolVar, Variables};

use super::{FactMap, MAX_FACTS, WorldState};
use crate::facts::FactKey;

/// Builds the world state once per tick.
///
/// Every bound key reads its sensor variable; unbound keys are `false`. The
/// overrides are applied last, so sticky facts always win over sensors.
#[derive(Clone, Default)]
pub struct WorldStateBuilder {
    bindings: ArrayVec<(FactKey, BoolVar), MAX_FACTS>,
}

impl WorldStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `key` to `var`, replacing an earlier binding.
    pub fn bind(&mut self, key: FactKey, var: BoolVar) -> &mut Self {
        match self.bindings.iter_mut().find(|(bound, _)| *bound == key) {
            Some(binding) => binding.1 = var,
            None => self.bindings.push((key, var)),
        }
        self
    }

    /// Binds `key` to the boolean variable `name`. Returns whether it exists.
    pub fn bind_named(&mut self, key: FactKey, vars: &Variables, name: &str) -> bool {
        match vars.bool_var(name) {
            Some(var) => {
                self.bind(key, var.clone());
                true
            }
            None => false,
        }
    }

    pub fn is_bound(&self, key: FactKey) -> bool {
        self.bindings.iter().any(|(bound, _)| *bound == key)
    }

    pub fn build(&self, overrides: &FactMap) -> WorldState {
        let sensed = self
            .bindings
            .iter()
            .fold(WorldState::EMPTY, |state, (key, var)| state.with(*key, var()));
        overrides.apply(sensed)
    }
}

impl core::fmt::Debug for WorldStateBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.bindings.iter().map(|(key, _)| key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn sensors_then_overrides() {
        let target = Arc::new(AtomicBool::new(true));
        let mut vars = Variables::new();
        {
            let target = Arc::clone(&target);
            vars.insert_bool("Has Target", move || target.load(Ordering::Relaxed));
        }
        vars.insert_bool("Combat", || true);

        let mut builder = WorldStateBuilder::new();
        assert!(builder.bind_named(FactKey::HasTarget, &vars, "Has Target"));
        assert!(builder.bind_named(FactKey::InCombat, &vars, "Combat"));
        assert!(!builder.bind_named(FactKey::Pulled, &vars, "Nope"));

        let overrides = FactMap::from([(FactKey::InCombat, false), (FactKey::ShouldLoot, true)]);
        let state = builder.build(&overrides);
        assert!(state.get(FactKey::HasTarget));
        assert!(!state.get(FactKey::InCombat));
        assert!(state.get(FactKey::ShouldLoot));
        assert!(!state.get(FactKey::Pulled));

        target.store(false, Ordering::Relaxed);
        assert!(!builder.build(&FactMap::new()).get(FactKey::HasTarget));
    }
}
