use std::collections::HashMap;

use arrayvec::ArrayVec;

use super::Form;

/// Resource an action spends.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum PowerType {
    Mana,
    Rage,
    Energy,
    RunicPower,
    Runes,
}

/// Maximum number of distinct resources one slot can cost.
pub const MAX_COSTS: usize = 3;

/// Resource cost of the action in a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionCost {
    pub power: PowerType,
    pub amount: i32,
}

impl ActionCost {
    pub const fn new(power: PowerType, amount: i32) -> Self {
        Self { power, amount }
    }
}

/// Cost lookup supplied by the host.
///
/// Costs are read on every evaluation, so a table that tracks talents or
/// buffs may change its answers between ticks.
pub trait CostTable: Send + Sync {
    /// Costs of the action in the bound slot index.
    fn costs(&self, slot: u16) -> ArrayVec<ActionCost, MAX_COSTS>;

    /// Extra cost paid to enter `form` before casting.
    fn form_cost(&self, form: Form) -> i32;

    /// Cost of `power` in `slot`, `0` when the slot does not spend it.
    fn cost_of(&self, slot: u16, power: PowerType) -> i32 {
        self.costs(slot)
            .iter()
            .find(|cost| cost.power == power)
            .map_or(0, |cost| cost.amount)
    }
}

/// Fixed cost table.
#[derive(Clone, Debug, Default)]
pub struct StaticCostTable {
    slots: HashMap<u16, ArrayVec<ActionCost, MAX_COSTS>>,
    forms: HashMap<Form, i32>,
}

impl StaticCostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cost to `slot`, replacing an existing cost of the same power.
    ///
    /// Extra powers beyond [`MAX_COSTS`] are ignored.
    pub fn with_cost(mut self, slot: u16, cost: ActionCost) -> Self {
        let costs = self.slots.entry(slot).or_default();
        match costs.iter_mut().find(|existing| existing.power == cost.power) {
            Some(existing) => existing.amount = cost.amount,
            None => {
                let _ = costs.try_push(cost);
            }
        }
        self
    }

    pub fn with_form_cost(mut self, form: Form, amount: i32) -> Self {
        self.forms.insert(form, amount);
        self
    }
}

impl CostTable for StaticCostTable {
    fn costs(&self, slot: u16) -> ArrayVec<ActionCost, MAX_COSTS> {
        self.slots.get(&slot).cloned().unwrap_or_default()
    }

    fn form_cost(&self, form: Form) -> i32 {
        self.forms.get(&form).copied().unwrap_or(0)
    }
}
