use crate::action::Class;
use crate::sensor::CellLayout;

/// Agent configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    pub class: Class,
    /// Set `shouldloot` when a kill is credited.
    pub loot: bool,
    /// Set `shouldskin` when a kill is credited.
    pub skin: bool,
    /// Boolean variable that makes every resource cost free while it holds.
    pub free_cast_buff: String,
    /// Requirement strings; the current target is blacklisted while any holds.
    pub blacklist: Vec<String>,
    pub layout: CellLayout,
}

impl AgentConfig {
    // ===== compile-time constants =====
    /// Goals one planner call can consider; the goal set is a `u64` mask.
    pub const MAX_GOALS: usize = 64;
    /// World-state width.
    pub const MAX_FACT_KEYS: usize = 32;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FREE_CAST_BUFF: &'static str = "Clearcasting";

    pub fn new(class: Class) -> Self {
        Self {
            class,
            loot: true,
            skin: false,
            free_cast_buff: Self::DEFAULT_FREE_CAST_BUFF.to_owned(),
            blacklist: Vec::new(),
            layout: CellLayout::default(),
        }
    }

    pub fn with_skinning(mut self, skin: bool) -> Self {
        self.skin = skin;
        self
    }

    pub fn with_blacklist(mut self, requirement: impl Into<String>) -> Self {
        self.blacklist.push(requirement.into());
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(Class::None)
    }
}
