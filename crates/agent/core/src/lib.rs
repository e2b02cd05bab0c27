//! Decision core for a scripted game agent.
//!
//! `agent-core` turns a live feed of sensor cells into a 32-bit world state,
//! compiles human-authored requirement strings into predicates, and plans the
//! cheapest chain of goals that reaches a target partial state.
//!
//! # Architecture
//!
//! - [`sensor`]: the cell feed boundary, bit masks and typed readers
//! - [`facts`]: fact keys and the explicit variable registration table
//! - [`state`]: [`WorldState`], [`FactMap`] and the per-tick builder
//! - [`factory`]: the domain requirement grammar (`BagItem:`, `Form:`, ...)
//! - [`action`]: key actions, cooldowns, charges, costs and slot binding
//! - [`planner`]: exhaustive cost-minimizing search
//! - [`agent`]: goals, sticky facts and the tick loop
//!
//! Everything runs on the agent thread. Sensor cells are atomics written by an
//! ingestion thread and read without locks.

pub mod action;
pub mod agent;
pub mod config;
pub mod error;
pub mod factory;
pub mod facts;
pub mod planner;
pub mod sensor;
pub mod state;

pub use action::{
    ActionCost, ActionSpec, ActionTimer, Class, Clock, CooldownStore, CostTable, Form, KeyAction,
    ManualClock, PowerType, Race, StaticCostTable, SystemClock, bind_slot, stance_offset,
};
pub use agent::{
    ActionEvent, ActionGoal, Actuator, GoapAgent, Goal, STICKY_KEYS, StickyState,
    compile_blacklist,
};
pub use config::AgentConfig;
pub use error::{CoreError, ErrorSeverity, ProfileError};
pub use factory::{GameData, RequirementFactory, RequirementKind, StaticGameData};
pub use facts::{FactKey, FactRegistry};
pub use planner::{Plan, PlanError, Planner};
pub use sensor::{CellFeed, CellLayout, MASK, PlayerBits, SensorFeed, Sensors};
pub use state::{FactMap, WorldState, WorldStateBuilder};

pub use requirement::{CompileError, Requirement, Variables};
