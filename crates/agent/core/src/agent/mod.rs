//! The tick loop.
//!
//! Each [`GoapAgent::tick`]:
//!
//! 1. builds the world state with the sticky facts applied over it
//! 2. if the blacklist holds, stops attacking, clears the target and builds
//!    the world state again
//! 3. plans over the goals whose `can_run` gate passes
//! 4. makes the first step the current goal (running `on_exit` / `on_enter`
//!    on change) and updates it
//!
//! Sticky facts only change through [`GoapAgent::on_action_event`] and
//! [`GoapAgent::on_kill_credit`].

mod goal;
mod sticky;

pub use goal::{ActionEvent, ActionGoal, Goal};
pub use sticky::{STICKY_KEYS, StickyState};

use std::sync::Arc;

use requirement::{CompileError, Requirement, Variables};

use crate::config::AgentConfig;
use crate::facts::FactKey;
use crate::factory::RequirementFactory;
use crate::planner::{Plan, PlanError, Planner};
use crate::state::{FactMap, WorldState, WorldStateBuilder};

/// Input side supplied by the host.
pub trait Actuator: Send + Sync {
    /// Presses the key bound to an action.
    fn press(&self, key: &str);

    fn stop_attack(&self);

    fn clear_target(&self);
}

/// Compiles the configured blacklist; it holds while any entry holds.
pub fn compile_blacklist(
    config: &AgentConfig,
    factory: &RequirementFactory,
    vars: &Variables,
) -> Result<Requirement, CompileError> {
    let entries = config
        .blacklist
        .iter()
        .map(|text| factory.compile(vars, text))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(requirement::builder::any(&entries))
}

/// Goal-oriented agent.
pub struct GoapAgent {
    goals: Vec<Box<dyn Goal>>,
    planner: Planner,
    builder: WorldStateBuilder,
    sticky: StickyState,
    blacklist: Requirement,
    actuator: Arc<dyn Actuator>,
    target: FactMap,
    loot: bool,
    skin: bool,
    current: Option<usize>,
    plan: Plan,
    state: WorldState,
}

impl GoapAgent {
    /// # Errors
    ///
    /// [`PlanError::TooManyGoals`] when the planner cannot hold `goals`.
    pub fn new(
        goals: Vec<Box<dyn Goal>>,
        builder: WorldStateBuilder,
        blacklist: Requirement,
        actuator: Arc<dyn Actuator>,
        config: &AgentConfig,
    ) -> Result<Self, PlanError> {
        if goals.len() > AgentConfig::MAX_GOALS {
            return Err(PlanError::TooManyGoals { count: goals.len() });
        }
        Ok(Self {
            goals,
            planner: Planner::new(),
            builder,
            sticky: StickyState::new(),
            blacklist,
            actuator,
            target: FactMap::new(),
            loot: config.loot,
            skin: config.skin,
            current: None,
            plan: Plan::default(),
            state: WorldState::EMPTY,
        })
    }

    /// Partial state the agent plans towards. Empty means "run the cheapest
    /// applicable goal".
    #[must_use]
    pub fn with_target(mut self, target: FactMap) -> Self {
        self.target = target;
        self
    }

    pub fn set_target(&mut self, target: FactMap) {
        self.target = target;
    }

    pub fn goals(&self) -> &[Box<dyn Goal>] {
        &self.goals
    }

    pub fn current_goal(&self) -> Option<&dyn Goal> {
        self.current.map(|index| &*self.goals[index])
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// World state of the last tick.
    pub fn world_state(&self) -> WorldState {
        self.state
    }

    pub fn sticky(&self) -> &StickyState {
        &self.sticky
    }

    /// Runs one decision step and returns the index of the current goal.
    pub fn tick(&mut self) -> Result<Option<usize>, PlanError> {
        self.state = self.builder.build(self.sticky.overrides());

        if self.blacklist.is_met() {
            tracing::warn!("target blacklisted: {}", self.blacklist.describe());
            self.actuator.stop_attack();
            self.actuator.clear_target();
            self.state = self.builder.build(self.sticky.overrides());
        }

        let usable = self
            .goals
            .iter()
            .enumerate()
            .filter(|(_, goal)| goal.can_run())
            .fold(0u64, |mask, (index, _)| mask | (1u64 << index));

        self.plan = self
            .planner
            .plan(&self.goals, usable, self.state, &self.target)?;
        self.switch_to(self.plan.first());

        if let Some(index) = self.current {
            self.goals[index].update(&*self.actuator);
        }
        Ok(self.current)
    }

    fn switch_to(&mut self, next: Option<usize>) {
        if next == self.current {
            return;
        }
        if let Some(previous) = self.current {
            self.goals[previous].on_exit();
        }
        match next {
            Some(index) => {
                tracing::info!("new goal: {} in {}", self.goals[index].name(), self.state);
                self.goals[index].on_enter();
            }
            None => tracing::info!("no goal in {}", self.state),
        }
        self.current = next;
    }

    /// Delivers an action event: sticky keys are stored, and every goal sees
    /// the event.
    pub fn on_action_event(&mut self, event: ActionEvent) {
        if self.sticky.set(event.key, event.value) {
            tracing::debug!("sticky {} = {}", event.key, event.value);
        }
        for goal in &mut self.goals {
            goal.on_action_event(&event);
        }
    }

    /// Closes the encounter: the kill counter starts over. Sticky facts and
    /// the ids already credited are kept, so a late duplicate still counts
    /// once.
    pub fn end_encounter(&mut self) {
        tracing::info!("encounter over after {} kills", self.sticky.kills());
        self.sticky.reset_kills();
    }

    /// Credits a kill. Returns `false` when `id` is among the recent kills.
    ///
    /// Sets `producedcorpse`, and `shouldloot` / `shouldskin` when enabled,
    /// then tells the current goal, or every goal when there is none.
    pub fn on_kill_credit(&mut self, id: u64) -> bool {
        if !self.sticky.credit_kill(id) {
            tracing::debug!("kill {} already credited", id);
            return false;
        }

        self.sticky.set(FactKey::ProducedCorpse, true);
        if self.loot {
            self.sticky.set(FactKey::ShouldLoot, true);
        }
        if self.skin {
            self.sticky.set(FactKey::ShouldSkin, true);
        }
        tracing::info!("kill {} credited, {} this encounter", id, self.sticky.kills());

        let event = ActionEvent::new(FactKey::ProducedCorpse, true);
        match self.current {
            Some(index) => self.goals[index].on_action_event(&event),
            None => {
                for goal in &mut self.goals {
                    goal.on_action_event(&event);
                }
            }
        }
        true
    }
}
