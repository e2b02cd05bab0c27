use crate::action::PowerType;

/// Cell indices of every reader the core uses.
///
/// The ingestion side decides where values land; the agent only needs to know
/// the index. Action-bar bits span [`CellLayout::ACTION_BAR_CELLS`] consecutive
/// cells starting at `usable_actions` / `current_actions`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CellLayout {
    pub player_bits: usize,
    pub health: usize,
    pub max_health: usize,
    pub target_health: usize,
    pub target_max_health: usize,
    pub mana: usize,
    pub max_mana: usize,
    pub rage: usize,
    pub energy: usize,
    pub runic_power: usize,
    pub runes: usize,
    pub level: usize,
    pub form: usize,
    /// `race * 100 + class`.
    pub race_class: usize,
    pub target_npc_id: usize,
    pub target_casting_spell: usize,
    pub combo_points: usize,
    pub mob_count: usize,
    pub min_range: usize,
    pub max_range: usize,
    pub spell_in_range: usize,
    pub custom_trigger: usize,
    pub usable_actions: usize,
    pub current_actions: usize,
}

impl CellLayout {
    /// Action-bar bits stored per cell.
    pub const ACTION_BITS_PER_CELL: usize = 24;
    /// Cells per action-bar bitmap; covers every bonus bar.
    pub const ACTION_BAR_CELLS: usize = 5;

    pub const fn power(&self, power: PowerType) -> usize {
        match power {
            PowerType::Mana => self.mana,
            PowerType::Rage => self.rage,
            PowerType::Energy => self.energy,
            PowerType::RunicPower => self.runic_power,
            PowerType::Runes => self.runes,
        }
    }

    /// Highest cell index referenced by this layout, plus one.
    pub fn cell_count(&self) -> usize {
        let fields = [
            self.player_bits,
            self.health,
            self.max_health,
            self.target_health,
            self.target_max_health,
            self.mana,
            self.max_mana,
            self.rage,
            self.energy,
            self.runic_power,
            self.runes,
            self.level,
            self.form,
            self.race_class,
            self.target_npc_id,
            self.target_casting_spell,
            self.combo_points,
            self.mob_count,
            self.min_range,
            self.max_range,
            self.spell_in_range,
            self.custom_trigger,
            self.usable_actions + Self::ACTION_BAR_CELLS - 1,
            self.current_actions + Self::ACTION_BAR_CELLS - 1,
        ];
        fields.into_iter().max().unwrap_or(0) + 1
    }
}

impl Default for CellLayout {
    fn default() -> Self {
        Self {
            player_bits: 0,
            health: 1,
            max_health: 2,
            target_health: 3,
            target_max_health: 4,
            mana: 5,
            max_mana: 6,
            rage: 7,
            energy: 8,
            runic_power: 9,
            runes: 10,
            level: 11,
            form: 12,
            race_class: 13,
            target_npc_id: 14,
            target_casting_spell: 15,
            combo_points: 16,
            mob_count: 17,
            min_range: 18,
            max_range: 19,
            spell_in_range: 20,
            custom_trigger: 21,
            usable_actions: 22,
            current_actions: 27,
        }
    }
}
