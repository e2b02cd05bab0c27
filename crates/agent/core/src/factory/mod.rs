//! Domain requirement grammar and action preparation.
//!
//! [`RequirementFactory`] is the [`Grammar`] that adds the game forms
//! (`BagItem:`, `Form:`, `Usable:`, `Current:`, ...) to the generic
//! comparison grammar, and the place where authored [`ActionSpec`]s become runnable
//! [`KeyAction`]s:
//!
//! 1. validate names and slots
//! 2. give every action a timer on the shared [`CooldownStore`]
//! 3. register `CD_`, `Cost_` and `Charge_` variables
//! 4. attach synthesized requirements, then compile the authored ones
//!
//! Variables are registered for all actions before any requirement is
//! compiled, so an action may refer to another action's `CD_` variable or
//! `Usable:` bit regardless of order.

mod kind;
mod sources;
mod structured;

pub use kind::RequirementKind;
pub use sources::{GameData, StaticGameData};
pub use structured::{ARGUMENT_SEPARATOR, LIST_SEPARATOR};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use requirement::{CompileError, Compiler, Grammar, Requirement, Variables};

use crate::action::{
    ActionContext, ActionSpec, ActionTimer, Class, Clock, CooldownStore, CostTable, Form,
    KeyAction, SystemClock, cooldown_id,
};
use crate::config::AgentConfig;
use crate::error::ProfileError;
use crate::sensor::Sensors;

/// Compiles requirement strings with the game grammar and prepares actions.
pub struct RequirementFactory {
    ctx: ActionContext,
    game: Arc<dyn GameData>,
    cooldowns: Arc<CooldownStore>,
    clock: Arc<dyn Clock>,
    slots: HashMap<String, (u16, Option<Form>)>,
}

impl RequirementFactory {
    /// `vars` must already hold the sensor variables; the free-cast buff is
    /// looked up there.
    pub fn new(
        sensors: Sensors,
        game: Arc<dyn GameData>,
        costs: Arc<dyn CostTable>,
        config: &AgentConfig,
        vars: &Variables,
    ) -> Self {
        let free_cast = match vars.bool_var(&config.free_cast_buff) {
            Some(var) => {
                let var = var.clone();
                Requirement::labeled(move || var(), config.free_cast_buff.clone())
            }
            None => {
                tracing::warn!(
                    "free-cast buff `{}` is not a variable, costs always apply",
                    config.free_cast_buff
                );
                Requirement::never(config.free_cast_buff.clone())
            }
        };

        Self {
            ctx: ActionContext {
                sensors,
                costs,
                class: config.class,
                free_cast,
            },
            game,
            cooldowns: Arc::new(CooldownStore::new()),
            clock: Arc::new(SystemClock::new()),
            slots: HashMap::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_cooldowns(mut self, cooldowns: Arc<CooldownStore>) -> Self {
        self.cooldowns = cooldowns;
        self
    }

    pub fn sensors(&self) -> &Sensors {
        &self.ctx.sensors
    }

    pub fn game(&self) -> &Arc<dyn GameData> {
        &self.game
    }

    pub fn class(&self) -> Class {
        self.ctx.class
    }

    pub fn cooldowns(&self) -> &Arc<CooldownStore> {
        &self.cooldowns
    }

    pub fn context(&self) -> &ActionContext {
        &self.ctx
    }

    /// Configured slot and form of a prepared action.
    pub fn action_slot(&self, name: &str) -> Option<(u16, Option<Form>)> {
        self.slots.get(name).copied()
    }

    /// Compiles one requirement string.
    pub fn compile(&self, vars: &Variables, text: &str) -> Result<Requirement, CompileError> {
        Compiler::new(vars, self).compile(text)
    }

    /// Turns authored specs into runnable actions.
    ///
    /// # Errors
    ///
    /// The first duplicate name, zero slot or requirement that fails to
    /// compile. Nothing is kept from a failed call except the variables
    /// registered before the failure.
    pub fn prepare(
        &mut self,
        specs: Vec<ActionSpec>,
        vars: &mut Variables,
    ) -> Result<Vec<KeyAction>, ProfileError> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.name.as_str()) || self.slots.contains_key(&spec.name) {
                return Err(ProfileError::DuplicateAction(spec.name.clone()));
            }
            if spec.slot == Some(0) {
                return Err(ProfileError::InvalidSlot {
                    action: spec.name.clone(),
                    slot: 0,
                });
            }
        }

        for spec in &specs {
            if let Some(slot) = spec.slot {
                self.slots.insert(spec.name.clone(), (slot, spec.form));
            }
        }

        let mut actions: Vec<KeyAction> = specs
            .into_iter()
            .map(|spec| {
                let timer = ActionTimer::new(
                    Arc::clone(&self.cooldowns),
                    Arc::clone(&self.clock),
                    cooldown_id(spec.form, &spec.key),
                    spec.cooldown_ms,
                    spec.charges,
                );
                KeyAction::new(spec, timer)
            })
            .collect();

        for action in &actions {
            action.register_variables(&self.ctx, vars);
        }

        let compiler = Compiler::new(&*vars, &*self);
        for action in &mut actions {
            for requirement in action.synthesize(&self.ctx) {
                action.push_requirement(requirement);
            }
            let texts = action.spec().requirements.clone();
            for text in &texts {
                let requirement = compiler
                    .compile(text)
                    .map_err(|source| ProfileError::requirement(action.name(), source))?;
                action.push_requirement(requirement);
            }
            tracing::debug!(
                "prepared action {} with {} requirements",
                action.name(),
                action.requirements().len()
            );
        }

        Ok(actions)
    }
}

impl Grammar for &RequirementFactory {
    type Kind = RequirementKind;

    fn detect(&self, text: &str) -> Option<RequirementKind> {
        RequirementKind::detect(text)
    }

    fn build(
        &self,
        kind: RequirementKind,
        text: &str,
        vars: &Variables,
    ) -> Result<Requirement, CompileError> {
        match kind.comparison() {
            Some(comparison) => comparison.compile(text, vars),
            None => structured::build(self, kind, text, vars),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionCost, ManualClock, PowerType, StaticCostTable};
    use crate::facts::FactRegistry;
    use crate::sensor::{CellFeed, CellLayout};

    struct Rig {
        feed: Arc<CellFeed>,
        layout: CellLayout,
        game: Arc<StaticGameData>,
        vars: Variables,
        factory: RequirementFactory,
    }

    fn rig() -> Rig {
        let layout = CellLayout::default();
        let feed = Arc::new(CellFeed::for_layout(&layout));
        let sensors = Sensors::new(feed.clone(), layout.clone());
        let mut vars = Variables::new();
        FactRegistry::new(sensors.clone()).register(&mut vars);

        let game = Arc::new(StaticGameData::new());
        let costs = StaticCostTable::new().with_cost(0, ActionCost::new(PowerType::Mana, 25));
        let factory = RequirementFactory::new(
            sensors,
            game.clone(),
            Arc::new(costs),
            &AgentConfig::new(Class::Druid),
            &vars,
        )
        .with_clock(Arc::new(ManualClock::new(0)));

        Rig {
            feed,
            layout,
            game,
            vars,
            factory,
        }
    }

    #[test]
    fn negated_structured_form() {
        let rig = rig();
        let req = rig.factory.compile(&rig.vars, "not Form:DruidCat").unwrap();
        assert!(req.is_met());
        assert_eq!(req.describe(), "not Form DruidCat");

        rig.feed.set(rig.layout.form, Form::DruidCat as i32);
        assert!(!req.is_met());
    }

    #[test]
    fn unknown_names_are_errors() {
        let rig = rig();
        for text in [
            "Form:Dragon",
            "Race:Elf",
            "Spell:Fireball",
            "Talent:Ferocity",
            "Usable:Nope",
            "Current:Nope",
        ] {
            assert!(
                matches!(
                    rig.factory.compile(&rig.vars, text),
                    Err(CompileError::UnknownName { .. })
                ),
                "{text}"
            );
        }
    }

    #[test]
    fn spells_and_talents() {
        let rig = rig();
        rig.game.add_spell("Rejuvenation", 774, true);
        rig.game.add_spell("Starfire", 2912, false);
        rig.game.set_talent("Ferocity", 3);

        let compile = |text: &str| rig.factory.compile(&rig.vars, text).unwrap();
        assert!(compile("Spell:Rejuvenation").is_met());
        assert!(!compile("Spell:Starfire").is_met());
        assert!(compile("Spell:774").is_met());
        assert!(compile("Talent:Ferocity").is_met());
        assert!(compile("Talent:Ferocity:3").is_met());
        assert!(!compile("Talent:Ferocity:4").is_met());
        assert_eq!(compile("Talent:Ferocity:4").describe(), "Talent Ferocity (Rank 4)");
    }

    #[test]
    fn combined_with_comparisons() {
        let rig = rig();
        let req = rig
            .factory
            .compile(&rig.vars, "npcID:42,43 && TargetHealth% < 50")
            .unwrap();

        rig.feed.set(rig.layout.target_npc_id, 43);
        rig.feed.set(rig.layout.target_health, 10);
        rig.feed.set(rig.layout.target_max_health, 100);
        assert!(req.is_met());

        rig.feed.set(rig.layout.target_npc_id, 44);
        assert!(!req.is_met());
    }

    #[test]
    fn prepare_wires_cross_references() {
        let mut rig = rig();
        let specs = vec![
            ActionSpec::new("Heal", "1")
                .with_slot(1)
                .with_requirement("Health% < 60"),
            ActionSpec::new("Bash", "2")
                .with_slot(2)
                .with_cooldown(5_000)
                .with_requirement("CD_Heal == 0 && Usable:Heal"),
        ];
        let actions = rig.factory.prepare(specs, &mut rig.vars).unwrap();

        assert_eq!(actions.len(), 2);
        // min-power + authored
        assert_eq!(actions[0].requirements().len(), 2);
        // min-power + min-cooldown + authored
        assert_eq!(actions[1].requirements().len(), 3);

        rig.feed.set(rig.layout.mana, 100);
        rig.feed.set(rig.layout.health, 50);
        rig.feed.set(rig.layout.max_health, 100);
        assert!(actions[0].can_run());

        assert!(!actions[1].can_run());
        rig.feed.set_bit(rig.layout.usable_actions, 0, true);
        assert!(actions[1].can_run());

        actions[1].record_use();
        assert!(!actions[1].can_run());
        assert_eq!(rig.factory.cooldowns().snapshot().len(), 1);
    }

    #[test]
    fn prepare_rejects_bad_profiles() {
        let mut rig = rig();
        let duplicate = vec![ActionSpec::new("Heal", "1"), ActionSpec::new("Heal", "2")];
        assert_eq!(
            rig.factory.prepare(duplicate, &mut rig.vars).err(),
            Some(ProfileError::DuplicateAction("Heal".into()))
        );

        let zero = vec![ActionSpec::new("Heal", "1").with_slot(0)];
        assert!(matches!(
            rig.factory.prepare(zero, &mut rig.vars),
            Err(ProfileError::InvalidSlot { slot: 0, .. })
        ));

        let broken = vec![ActionSpec::new("Heal", "1").with_requirement("Mana >= lots")];
        assert!(matches!(
            rig.factory.prepare(broken, &mut rig.vars),
            Err(ProfileError::Requirement { .. })
        ));
    }
}
