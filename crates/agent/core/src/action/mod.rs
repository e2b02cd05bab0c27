//! Key actions and their runtime state.
//!
//! A [`KeyAction`] is one key the agent can press: where it sits on the action
//! bar, which form it needs, how long its cooldown is and which requirements
//! must hold before pressing it. Besides the authored requirement strings,
//! every action carries requirements synthesized from its own state:
//!
//! - **min-power**: enough of every resource the slot costs under the form
//!   in effect (plus the form-change surcharge), or a free-cast buff
//! - **min-cooldown**: the cooldown has run out
//! - **min-charge**: at least one charge left, reported alongside the
//!   cooldown that refills them
//!
//! The same values are exported as integer variables `CD_<name>`,
//! `Cost_<name>` and `Charge_<name>` so authored expressions can use them.

mod cooldown;
mod cost;
mod stance;

pub use cooldown::{ActionTimer, Clock, CooldownStore, ManualClock, SystemClock, cooldown_id};
pub use cost::{ActionCost, CostTable, MAX_COSTS, PowerType, StaticCostTable};
pub use stance::{Class, Form, MAIN_BAR_SLOTS, Race, bind_slot, stance_offset};

use std::sync::Arc;

use arrayvec::ArrayVec;
use requirement::{Requirement, Variables};

use crate::sensor::Sensors;

/// Authored configuration of one action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionSpec {
    pub name: String,
    /// Key sent to the actuator.
    pub key: String,
    /// 1-based action-bar slot, if the action is on a bar.
    pub slot: Option<u16>,
    /// Form the action must be used in.
    pub form: Option<Form>,
    pub cooldown_ms: u64,
    pub charges: u32,
    pub requirements: Vec<String>,
}

impl ActionSpec {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            slot: None,
            form: None,
            cooldown_ms: 0,
            charges: 1,
            requirements: Vec::new(),
        }
    }

    pub fn with_slot(mut self, slot: u16) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.form = Some(form);
        self
    }

    pub fn with_cooldown(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    pub fn with_charges(mut self, charges: u32) -> Self {
        self.charges = charges;
        self
    }

    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirements.push(requirement.into());
        self
    }
}

/// What the synthesized requirements read from.
#[derive(Clone)]
pub struct ActionContext {
    pub sensors: Sensors,
    pub costs: Arc<dyn CostTable>,
    pub class: Class,
    /// Holds while casting is free.
    pub free_cast: Requirement,
}

impl ActionContext {
    /// Slot index of `slot` for an action bound to `form`, under the current
    /// form when the action has none.
    pub fn bound_slot(&self, slot: u16, form: Option<Form>) -> u16 {
        bind_slot(slot, self.class, form.unwrap_or_else(|| self.sensors.form()))
    }

    /// Non-zero costs of `slot` as bound right now, each including the
    /// surcharge for changing into `form`.
    pub fn live_costs(&self, slot: u16, form: Option<Form>) -> ArrayVec<ActionCost, MAX_COSTS> {
        let current = self.sensors.form();
        let bound = bind_slot(slot, self.class, form.unwrap_or(current));
        let surcharge = form
            .filter(|&form| form != current)
            .map_or(0, |form| self.costs.form_cost(form));
        self.costs
            .costs(bound)
            .into_iter()
            .filter(|cost| cost.amount > 0)
            .map(|cost| ActionCost::new(cost.power, cost.amount + surcharge))
            .collect()
    }
}

/// One pressable key with its compiled requirements.
pub struct KeyAction {
    spec: ActionSpec,
    timer: Arc<ActionTimer>,
    requirements: Vec<Requirement>,
}

impl KeyAction {
    pub fn new(spec: ActionSpec, timer: ActionTimer) -> Self {
        Self {
            spec,
            timer: Arc::new(timer),
            requirements: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn key(&self) -> &str {
        &self.spec.key
    }

    pub fn slot(&self) -> Option<u16> {
        self.spec.slot
    }

    pub fn form(&self) -> Option<Form> {
        self.spec.form
    }

    pub fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    pub fn timer(&self) -> &ActionTimer {
        &self.timer
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn push_requirement(&mut self, requirement: Requirement) {
        self.requirements.push(requirement);
    }

    /// Every requirement holds.
    pub fn can_run(&self) -> bool {
        self.requirements.iter().all(Requirement::is_met)
    }

    /// Requirements that currently do not hold.
    pub fn unmet(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().filter(|req| !req.is_met())
    }

    pub fn record_use(&self) {
        self.timer.record_use();
    }

    pub fn reset_cooldown(&self) {
        self.timer.reset_cooldown();
    }

    /// Registers `CD_`, `Cost_` and `Charge_` variables for this action.
    pub fn register_variables(&self, ctx: &ActionContext, vars: &mut Variables) {
        let name = &self.spec.name;

        let timer = Arc::clone(&self.timer);
        vars.insert_int(format!("CD_{name}"), move || {
            i32::try_from(timer.cooldown_remaining()).unwrap_or(i32::MAX)
        });

        let timer = Arc::clone(&self.timer);
        vars.insert_int(format!("Charge_{name}"), move || {
            i32::try_from(timer.charges_remaining()).unwrap_or(i32::MAX)
        });

        match self.spec.slot {
            Some(slot) => {
                let (ctx, form) = (ctx.clone(), self.spec.form);
                vars.insert_int(format!("Cost_{name}"), move || {
                    ctx.live_costs(slot, form)
                        .first()
                        .map_or(0, |cost| cost.amount)
                });
            }
            None => {
                vars.insert_int(format!("Cost_{name}"), || 0);
            }
        }
    }

    /// Requirements derived from cooldown, charges and costs.
    pub fn synthesize(&self, ctx: &ActionContext) -> Vec<Requirement> {
        let mut synthesized = Vec::new();

        if let Some(slot) = self.spec.slot {
            synthesized.push(self.min_power(ctx, slot));
        }
        if self.timer.cooldown_ms() > 0 {
            synthesized.push(self.min_cooldown());
        }
        if self.timer.max_charges() > 1 {
            synthesized.push(self.min_charge());
        }

        synthesized
    }

    /// Every resource the slot costs under the form in effect, or a
    /// free-cast buff. Resources the slot does not cost always pass.
    fn min_power(&self, ctx: &ActionContext, slot: u16) -> Requirement {
        let form = self.spec.form;
        let predicate = {
            let ctx = ctx.clone();
            move || {
                ctx.live_costs(slot, form)
                    .iter()
                    .all(|cost| ctx.sensors.power(cost.power) >= cost.amount)
            }
        };
        let describe = {
            let (ctx, name) = (ctx.clone(), self.spec.name.clone());
            move || {
                let costs = ctx.live_costs(slot, form);
                let shown = costs
                    .iter()
                    .find(|cost| ctx.sensors.power(cost.power) < cost.amount)
                    .or_else(|| costs.first());
                match shown {
                    Some(cost) => format!(
                        "{} {} >= {}",
                        cost.power,
                        ctx.sensors.power(cost.power),
                        cost.amount
                    ),
                    None => format!("Cost_{name} 0"),
                }
            }
        };
        ctx.free_cast.or(&Requirement::new(predicate, describe))
    }

    fn min_cooldown(&self) -> Requirement {
        let name = self.spec.name.clone();
        let (ready, remaining) = (Arc::clone(&self.timer), Arc::clone(&self.timer));
        Requirement::new(
            move || ready.is_ready(),
            move || format!("CD_{name} {} == 0", remaining.cooldown_remaining()),
        )
    }

    /// Spending the last charge starts the cooldown and refills the charges,
    /// so this never fails on its own; [`Self::min_cooldown`] does the gating.
    fn min_charge(&self) -> Requirement {
        let name = self.spec.name.clone();
        let (charged, charges) = (Arc::clone(&self.timer), Arc::clone(&self.timer));
        Requirement::new(
            move || charged.charges_remaining() >= 1,
            move || format!("Charge_{name} {} >= 1", charges.charges_remaining()),
        )
    }
}

impl core::fmt::Debug for KeyAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyAction")
            .field("spec", &self.spec)
            .field("timer", &self.timer)
            .field("requirements", &self.requirements.len())
            .finish()
    }
}
