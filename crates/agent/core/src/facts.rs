//! Fact keys and the sensor variable table.
//!
//! [`FactKey`] is the planner's whole vocabulary. [`FactRegistry`] is the
//! explicit table that names every sensor reader for the requirement compiler
//! and says which boolean variable feeds which fact key.

use requirement::Variables;

use crate::action::PowerType;
use crate::sensor::{PlayerBits, Sensors};
use crate::state::WorldStateBuilder;

/// One boolean proposition of the world state; the discriminant is its bit.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum FactKey {
    HasTarget = 0,
    TargetIsAlive = 1,
    InCombat = 2,
    IsDead = 3,
    IsSwimming = 4,
    ItemsBroken = 5,
    HasPet = 6,
    PetHasTarget = 7,
    IsCasting = 8,
    IsMounted = 9,
    InCombatRange = 10,
    InMeleeRange = 11,
    Pulled = 12,
    TargetTargetsPlayer = 13,
    BagFull = 14,
    ShouldLoot = 15,
    ShouldSkin = 16,
    ConsumeCorpse = 17,
    ProducedCorpse = 18,
}

impl FactKey {
    #[inline]
    pub const fn bit(self) -> u32 {
        1 << self as u8
    }
}

const _: () = assert!(<FactKey as strum::EnumCount>::COUNT <= 32);

/// Boolean variables backed by a single player flag.
const FLAG_VARIABLES: [(&str, PlayerBits); 22] = [
    ("Has Target", PlayerBits::HAS_TARGET),
    ("Target Dead", PlayerBits::TARGET_DEAD),
    ("Combat", PlayerBits::IN_COMBAT),
    ("Target Combat", PlayerBits::TARGET_IN_COMBAT),
    ("Dead", PlayerBits::IS_DEAD),
    ("Swimming", PlayerBits::IS_SWIMMING),
    ("Items Broken", PlayerBits::ITEMS_BROKEN),
    ("Has Pet", PlayerBits::HAS_PET),
    ("Pet Target", PlayerBits::PET_HAS_TARGET),
    ("Pet Dead", PlayerBits::PET_DEAD),
    ("Casting", PlayerBits::IS_CASTING),
    ("Mounted", PlayerBits::IS_MOUNTED),
    ("Falling", PlayerBits::IS_FALLING),
    ("Melee Range", PlayerBits::IN_MELEE_RANGE),
    ("Combat Range", PlayerBits::IN_COMBAT_RANGE),
    ("Target Targets Player", PlayerBits::TARGET_TARGETS_PLAYER),
    ("Clearcasting", PlayerBits::FREE_CAST),
    ("Bag Full", PlayerBits::BAG_FULL),
    ("Indoors", PlayerBits::IS_INDOORS),
    ("Target Is Player", PlayerBits::TARGET_IS_PLAYER),
    ("Auto Attacking", PlayerBits::AUTO_ATTACKING),
    ("Pulled", PlayerBits::PULLED),
];

/// Boolean variable that feeds each sensed fact key.
///
/// Keys missing here are sticky and only change through agent events.
pub const FACT_VARIABLES: [(FactKey, &str); 15] = [
    (FactKey::HasTarget, "Has Target"),
    (FactKey::TargetIsAlive, "Target Alive"),
    (FactKey::InCombat, "Combat"),
    (FactKey::IsDead, "Dead"),
    (FactKey::IsSwimming, "Swimming"),
    (FactKey::ItemsBroken, "Items Broken"),
    (FactKey::HasPet, "Has Pet"),
    (FactKey::PetHasTarget, "Pet Target"),
    (FactKey::IsCasting, "Casting"),
    (FactKey::IsMounted, "Mounted"),
    (FactKey::InCombatRange, "Combat Range"),
    (FactKey::InMeleeRange, "Melee Range"),
    (FactKey::Pulled, "Pulled"),
    (FactKey::TargetTargetsPlayer, "Target Targets Player"),
    (FactKey::BagFull, "Bag Full"),
];

fn mana(s: &Sensors) -> i32 {
    s.power(PowerType::Mana)
}

fn rage(s: &Sensors) -> i32 {
    s.power(PowerType::Rage)
}

fn energy(s: &Sensors) -> i32 {
    s.power(PowerType::Energy)
}

fn runic_power(s: &Sensors) -> i32 {
    s.power(PowerType::RunicPower)
}

fn runes(s: &Sensors) -> i32 {
    s.power(PowerType::Runes)
}

/// Integer variables.
const INT_VARIABLES: [(&str, fn(&Sensors) -> i32); 15] = [
    ("Health", Sensors::health),
    ("Health%", Sensors::health_percent),
    ("TargetHealth%", Sensors::target_health_percent),
    ("Mana", mana),
    ("Mana%", Sensors::mana_percent),
    ("Rage", rage),
    ("Energy", energy),
    ("RunicPower", runic_power),
    ("Runes", runes),
    ("Combo Point", Sensors::combo_points),
    ("MobCount", Sensors::mob_count),
    ("MinRange", Sensors::min_range),
    ("MaxRange", Sensors::max_range),
    ("Level", Sensors::level),
    ("TargetId", Sensors::target_npc_id),
];

/// Explicit name → reader registration.
#[derive(Clone)]
pub struct FactRegistry {
    sensors: Sensors,
}

impl FactRegistry {
    pub fn new(sensors: Sensors) -> Self {
        Self { sensors }
    }

    pub fn sensors(&self) -> &Sensors {
        &self.sensors
    }

    /// Registers every boolean and integer sensor variable.
    pub fn register(&self, vars: &mut Variables) {
        for (name, flag) in FLAG_VARIABLES {
            let sensors = self.sensors.clone();
            vars.insert_bool(name, move || sensors.has(flag));
        }

        let sensors = self.sensors.clone();
        vars.insert_bool("Target Alive", move || sensors.player_bits().target_alive());

        for (name, read) in INT_VARIABLES {
            let sensors = self.sensors.clone();
            vars.insert_int(name, move || read(&sensors));
        }
    }

    /// Builder with every sensed fact key bound to its variable.
    ///
    /// Keys whose variable is not registered in `vars` stay unbound and read
    /// as `false`.
    pub fn world_state_builder(&self, vars: &Variables) -> WorldStateBuilder {
        let mut builder = WorldStateBuilder::new();
        for (key, name) in FACT_VARIABLES {
            if !builder.bind_named(key, vars, name) {
                tracing::warn!("fact {} has no variable `{}`", key, name);
            }
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::Arc;
    use strum::IntoEnumIterator;

    use crate::sensor::{CellFeed, CellLayout};

    #[test]
    fn keys_are_dense_and_lowercase() {
        for (index, key) in FactKey::iter().enumerate() {
            assert_eq!(key as usize, index);
            assert_eq!(FactKey::from_repr(index as u8), Some(key));
            assert_eq!(key.as_ref(), key.as_ref().to_lowercase());
        }
        assert_eq!(FactKey::ShouldLoot.to_string(), "shouldloot");
        assert_eq!(FactKey::from_str("producedcorpse"), Ok(FactKey::ProducedCorpse));
    }

    #[test]
    fn every_fact_variable_is_registered() {
        let layout = CellLayout::default();
        let feed = Arc::new(CellFeed::for_layout(&layout));
        let registry = FactRegistry::new(Sensors::new(feed, layout));
        let mut vars = Variables::new();
        registry.register(&mut vars);

        for (_, name) in FACT_VARIABLES {
            assert!(vars.bool_var(name).is_some(), "{name}");
        }
        for (name, _) in INT_VARIABLES {
            assert!(vars.int_var(name).is_some(), "{name}");
        }
    }

    #[test]
    fn variables_read_live_cells() {
        let layout = CellLayout::default();
        let feed = Arc::new(CellFeed::for_layout(&layout));
        let registry = FactRegistry::new(Sensors::new(feed.clone(), layout.clone()));
        let mut vars = Variables::new();
        registry.register(&mut vars);

        let alive = vars.bool_var("Target Alive").cloned().unwrap();
        let health = vars.int_var("Health%").cloned().unwrap();
        assert!(!alive());
        assert_eq!(health(), 0);

        feed.set(layout.player_bits, PlayerBits::HAS_TARGET.bits() as i32);
        feed.set(layout.health, 30);
        feed.set(layout.max_health, 120);
        assert!(alive());
        assert_eq!(health(), 25);
    }
}
