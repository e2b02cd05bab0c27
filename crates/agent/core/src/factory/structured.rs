//! One parse function per structured [`RequirementKind`].
//!
//! Arguments follow the keyword after `:` and are separated by `:`; list
//! arguments are separated by `,`. Numeric arguments may name an integer
//! variable instead of a literal and are then read live.

use std::str::FromStr;
use std::sync::Arc;

use requirement::{CompileError, IntVar, Requirement, Variables};

use super::{RequirementFactory, RequirementKind};
use crate::action::{Form, Race};
use crate::sensor::Sensors;

/// Separates arguments.
pub const ARGUMENT_SEPARATOR: char = ':';
/// Separates list items inside one argument.
pub const LIST_SEPARATOR: char = ',';

pub(super) fn build(
    factory: &RequirementFactory,
    kind: RequirementKind,
    text: &str,
    vars: &Variables,
) -> Result<Requirement, CompileError> {
    let args = Arguments::split(text);
    match kind {
        RequirementKind::NpcId => npc_id(factory, &args, vars),
        RequirementKind::BagItem => bag_item(factory, &args, vars),
        RequirementKind::SpellInRange => spell_in_range(factory, &args),
        RequirementKind::TargetCastingSpell => target_casting_spell(factory, &args, vars),
        RequirementKind::Form => form(factory, &args),
        RequirementKind::Race => race(factory, &args),
        RequirementKind::Spell => spell(factory, &args),
        RequirementKind::Talent => talent(factory, &args, vars),
        RequirementKind::Trigger => trigger(factory, &args),
        RequirementKind::Usable => action_bar(factory, &args, "Usable", Sensors::action_usable),
        RequirementKind::Current => action_bar(factory, &args, "Current", Sensors::action_current),
        comparison => Err(CompileError::Malformed {
            expression: text.to_owned(),
            reason: comparison.keyword(),
        }),
    }
}

/// Trimmed arguments after the keyword.
struct Arguments<'t> {
    text: &'t str,
    parts: Vec<&'t str>,
}

impl<'t> Arguments<'t> {
    fn split(text: &'t str) -> Self {
        let parts = text
            .split_once(ARGUMENT_SEPARATOR)
            .map(|(_, rest)| rest.split(ARGUMENT_SEPARATOR).map(str::trim).collect())
            .unwrap_or_default();
        Self { text, parts }
    }

    fn optional(&self, index: usize) -> Option<&'t str> {
        self.parts.get(index).copied().filter(|arg| !arg.is_empty())
    }

    fn required(&self, index: usize) -> Result<&'t str, CompileError> {
        self.optional(index)
            .ok_or_else(|| CompileError::MissingArgument(self.text.to_owned()))
    }

    fn unknown(&self, kind: &'static str, name: &str) -> CompileError {
        CompileError::UnknownName {
            kind,
            name: name.to_owned(),
            expression: self.text.to_owned(),
        }
    }

    /// Each `,`-separated item as an integer source.
    fn int_list(&self, arg: &str, vars: &Variables) -> Result<Vec<IntVar>, CompileError> {
        arg.split(LIST_SEPARATOR)
            .map(|item| vars.resolve_int(item, self.text))
            .collect()
    }

    /// A bit index in 0..32.
    fn bit(&self, index: usize) -> Result<usize, CompileError> {
        let arg = self.required(index)?;
        arg.parse::<usize>()
            .ok()
            .filter(|&bit| bit < 32)
            .ok_or_else(|| CompileError::InvalidOperand {
                operand: arg.to_owned(),
                expression: self.text.to_owned(),
            })
    }
}

fn npc_id(
    factory: &RequirementFactory,
    args: &Arguments<'_>,
    vars: &Variables,
) -> Result<Requirement, CompileError> {
    let arg = args.required(0)?;
    let ids = args.int_list(arg, vars)?;
    let sensors = factory.sensors().clone();
    Ok(Requirement::labeled(
        move || {
            let target = sensors.target_npc_id();
            ids.iter().any(|id| id() == target)
        },
        format!("npcID {arg}"),
    ))
}

fn bag_item(
    factory: &RequirementFactory,
    args: &Arguments<'_>,
    vars: &Variables,
) -> Result<Requirement, CompileError> {
    let item = vars.resolve_int(args.required(0)?, args.text)?;
    let count: IntVar = match args.optional(1) {
        Some(count) => vars.resolve_int(count, args.text)?,
        None => Arc::new(|| 1),
    };

    let predicate = {
        let (game, item, count) = (Arc::clone(factory.game()), item.clone(), count.clone());
        move || game.bag_item_count(item()) >= count()
    };
    let game = Arc::clone(factory.game());
    Ok(Requirement::new(predicate, move || {
        let item = item();
        format!("BagItem {item} {} >= {}", game.bag_item_count(item), count())
    }))
}

fn spell_in_range(
    factory: &RequirementFactory,
    args: &Arguments<'_>,
) -> Result<Requirement, CompileError> {
    let bit = args.bit(0)?;
    let sensors = factory.sensors().clone();
    Ok(Requirement::labeled(
        move || sensors.spell_in_range(bit),
        format!("SpellInRange {bit}"),
    ))
}

fn target_casting_spell(
    factory: &RequirementFactory,
    args: &Arguments<'_>,
    vars: &Variables,
) -> Result<Requirement, CompileError> {
    let sensors = factory.sensors().clone();
    let Some(arg) = args.optional(0) else {
        return Ok(Requirement::labeled(
            move || sensors.target_casting_spell() != 0,
            "Target casting",
        ));
    };

    let ids = args.int_list(arg, vars)?;
    Ok(Requirement::labeled(
        move || {
            let casting = sensors.target_casting_spell();
            casting != 0 && ids.iter().any(|id| id() == casting)
        },
        format!("Target casting {arg}"),
    ))
}

fn form(factory: &RequirementFactory, args: &Arguments<'_>) -> Result<Requirement, CompileError> {
    let name = args.required(0)?;
    let form = Form::from_str(name).map_err(|_| args.unknown("form", name))?;
    let sensors = factory.sensors().clone();
    Ok(Requirement::labeled(
        move || sensors.form() == form,
        format!("Form {form}"),
    ))
}

fn race(factory: &RequirementFactory, args: &Arguments<'_>) -> Result<Requirement, CompileError> {
    let name = args.required(0)?;
    let race = Race::from_str(name).map_err(|_| args.unknown("race", name))?;
    let sensors = factory.sensors().clone();
    Ok(Requirement::labeled(
        move || sensors.race() == race,
        format!("Race {race}"),
    ))
}

fn spell(factory: &RequirementFactory, args: &Arguments<'_>) -> Result<Requirement, CompileError> {
    let name = args.required(0)?;
    let id = match name.parse::<i32>() {
        Ok(id) => id,
        Err(_) => factory
            .game()
            .spell_id(name)
            .ok_or_else(|| args.unknown("spell", name))?,
    };
    let game = Arc::clone(factory.game());
    Ok(Requirement::labeled(
        move || game.knows_spell(id),
        format!("Spell {name}"),
    ))
}

fn talent(
    factory: &RequirementFactory,
    args: &Arguments<'_>,
    vars: &Variables,
) -> Result<Requirement, CompileError> {
    let name = args.required(0)?;
    if !factory.game().is_talent(name) {
        return Err(args.unknown("talent", name));
    }
    let rank: IntVar = match args.optional(1) {
        Some(rank) => vars.resolve_int(rank, args.text)?,
        None => Arc::new(|| 1),
    };

    let predicate = {
        let (game, name, rank) = (Arc::clone(factory.game()), name.to_owned(), rank.clone());
        move || game.talent_rank(&name) >= rank()
    };
    let name = name.to_owned();
    Ok(Requirement::new(predicate, move || {
        format!("Talent {name} (Rank {})", rank())
    }))
}

fn trigger(factory: &RequirementFactory, args: &Arguments<'_>) -> Result<Requirement, CompileError> {
    let bit = args.bit(0)?;
    let label = args
        .optional(1)
        .map_or_else(|| format!("Trigger {bit}"), str::to_owned);
    let sensors = factory.sensors().clone();
    Ok(Requirement::labeled(move || sensors.trigger(bit), label))
}

/// `Usable:` and `Current:` read one bit of an action-bar bitmap at the
/// slot the named action is bound to under its form, or the current one.
fn action_bar(
    factory: &RequirementFactory,
    args: &Arguments<'_>,
    label: &str,
    read: fn(&Sensors, u16) -> bool,
) -> Result<Requirement, CompileError> {
    let name = args.required(0)?;
    let (slot, form) = factory
        .action_slot(name)
        .ok_or_else(|| args.unknown("action", name))?;
    let ctx = factory.context().clone();
    Ok(Requirement::labeled(
        move || read(&ctx.sensors, ctx.bound_slot(slot, form)),
        format!("{label} {name}"),
    ))
}
