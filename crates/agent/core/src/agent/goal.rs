use crate::action::KeyAction;
use crate::facts::FactKey;
use crate::state::FactMap;

use super::Actuator;

/// A fact changed because of something a goal did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionEvent {
    pub key: FactKey,
    pub value: bool,
}

impl ActionEvent {
    pub const fn new(key: FactKey, value: bool) -> Self {
        Self { key, value }
    }
}

/// Something the planner can schedule.
///
/// Preconditions, effects and cost are fixed for the goal's lifetime; only
/// internal counters change between ticks.
pub trait Goal {
    fn name(&self) -> &str;

    fn preconditions(&self) -> &FactMap;

    fn effects(&self) -> &FactMap;

    fn cost(&self) -> f32;

    /// Gate outside the fact alphabet (resources, cooldowns, charges).
    fn can_run(&self) -> bool {
        true
    }

    /// The goal became the current goal.
    fn on_enter(&mut self) {}

    /// Called every tick while the goal is current.
    fn update(&mut self, _actuator: &dyn Actuator) {}

    /// Another goal (or none) replaced this one.
    fn on_exit(&mut self) {}

    fn on_action_event(&mut self, _event: &ActionEvent) {}
}

impl<T: Goal + ?Sized> Goal for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn preconditions(&self) -> &FactMap {
        (**self).preconditions()
    }

    fn effects(&self) -> &FactMap {
        (**self).effects()
    }

    fn cost(&self) -> f32 {
        (**self).cost()
    }

    fn can_run(&self) -> bool {
        (**self).can_run()
    }

    fn on_enter(&mut self) {
        (**self).on_enter();
    }

    fn update(&mut self, actuator: &dyn Actuator) {
        (**self).update(actuator);
    }

    fn on_exit(&mut self) {
        (**self).on_exit();
    }

    fn on_action_event(&mut self, event: &ActionEvent) {
        (**self).on_action_event(event);
    }
}

/// Goal that presses one key action.
///
/// Runnable while every requirement of the action holds; each update presses
/// the key and records the use on the action's timer.
#[derive(Debug)]
pub struct ActionGoal {
    action: KeyAction,
    preconditions: FactMap,
    effects: FactMap,
    cost: f32,
}

impl ActionGoal {
    pub fn new(action: KeyAction, cost: f32) -> Self {
        Self {
            action,
            preconditions: FactMap::new(),
            effects: FactMap::new(),
            cost,
        }
    }

    #[must_use]
    pub fn with_precondition(mut self, key: FactKey, value: bool) -> Self {
        self.preconditions.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, key: FactKey, value: bool) -> Self {
        self.effects.insert(key, value);
        self
    }

    pub fn action(&self) -> &KeyAction {
        &self.action
    }
}

impl Goal for ActionGoal {
    fn name(&self) -> &str {
        self.action.name()
    }

    fn preconditions(&self) -> &FactMap {
        &self.preconditions
    }

    fn effects(&self) -> &FactMap {
        &self.effects
    }

    fn cost(&self) -> f32 {
        self.cost
    }

    fn can_run(&self) -> bool {
        self.action.can_run()
    }

    fn update(&mut self, actuator: &dyn Actuator) {
        actuator.press(self.action.key());
        self.action.record_use();
    }
}
