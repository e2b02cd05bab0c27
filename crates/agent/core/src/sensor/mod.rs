//! Sensor cell boundary.
//!
//! The ingestion side decodes telemetry into a flat array of `i32` cells; the
//! core reads them through [`SensorFeed`]. Reads never fail: a missing cell
//! is `0`, which every reader maps to "false" or "nothing".
//!
//! [`Sensors`] bundles a feed with a [`CellLayout`] and exposes typed readers.
//! It is cheap to clone and is captured by the compiled requirements.

mod bits;
mod layout;

pub use bits::PlayerBits;
pub use layout::CellLayout;

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::action::{Class, Form, PowerType, Race};

/// Single-bit masks, `MASK[n] == 1 << n` with `MASK[31]` on the sign bit.
pub const MASK: [i32; 32] = {
    let mut table = [0i32; 32];
    let mut bit = 0;
    while bit < 32 {
        table[bit] = 1i32.wrapping_shl(bit as u32);
        bit += 1;
    }
    table
};

/// Whether `bit` of `value` is set. Bits outside 0..32 are never set.
#[inline]
pub fn bit_set(value: i32, bit: usize) -> bool {
    MASK.get(bit).is_some_and(|mask| value & mask != 0)
}

/// `current / max` as a whole percentage; `0` when `max` is `0`.
#[inline]
pub fn percent(current: i32, max: i32) -> i32 {
    if max == 0 {
        return 0;
    }
    (i64::from(current) * 100 / i64::from(max)) as i32
}

/// Cell-addressable integer feed.
pub trait SensorFeed: Send + Sync {
    /// Raw cell value; `0` for a cell that does not exist.
    fn get_int(&self, index: usize) -> i32;

    /// Fixed-point cell with five decimal places.
    fn get_fixed(&self, index: usize) -> f32 {
        self.get_int(index) as f32 / 100_000.0
    }

    /// Three characters packed as two-digit codes into a six-digit decimal.
    ///
    /// `0`, negative values and values wider than six digits decode to an
    /// empty string. `00` code points are skipped.
    fn get_string(&self, index: usize) -> String {
        let value = self.get_int(index);
        if value <= 0 || value > 999_999 {
            return String::new();
        }
        let digits = format!("{value:06}");
        digits
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| {
                let code = (pair[0] - b'0') * 10 + (pair[1] - b'0');
                (code != 0).then_some(char::from(code))
            })
            .collect()
    }
}

/// In-memory feed with one atomic per cell.
///
/// Writers and readers never block each other. Two reads in the same tick may
/// observe different writes.
#[derive(Debug, Default)]
pub struct CellFeed {
    cells: Vec<AtomicI32>,
}

impl CellFeed {
    pub fn new(len: usize) -> Self {
        Self {
            cells: (0..len).map(|_| AtomicI32::new(0)).collect(),
        }
    }

    /// A feed large enough for every cell of `layout`.
    pub fn for_layout(layout: &CellLayout) -> Self {
        Self::new(layout.cell_count())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Stores `value`; writes past the end are dropped.
    pub fn set(&self, index: usize, value: i32) {
        if let Some(cell) = self.cells.get(index) {
            cell.store(value, Ordering::Relaxed);
        }
    }

    /// Sets or clears one bit of a cell.
    pub fn set_bit(&self, index: usize, bit: usize, on: bool) {
        let (Some(cell), Some(&mask)) = (self.cells.get(index), MASK.get(bit)) else {
            return;
        };
        if on {
            cell.fetch_or(mask, Ordering::Relaxed);
        } else {
            cell.fetch_and(!mask, Ordering::Relaxed);
        }
    }
}

impl SensorFeed for CellFeed {
    fn get_int(&self, index: usize) -> i32 {
        self.cells
            .get(index)
            .map_or(0, |cell| cell.load(Ordering::Relaxed))
    }
}

/// Typed readers over a feed.
#[derive(Clone)]
pub struct Sensors {
    feed: Arc<dyn SensorFeed>,
    layout: Arc<CellLayout>,
}

impl Sensors {
    pub fn new(feed: Arc<dyn SensorFeed>, layout: CellLayout) -> Self {
        Self {
            feed,
            layout: Arc::new(layout),
        }
    }

    pub fn layout(&self) -> &CellLayout {
        &self.layout
    }

    #[inline]
    pub fn int(&self, cell: usize) -> i32 {
        self.feed.get_int(cell)
    }

    pub fn player_bits(&self) -> PlayerBits {
        PlayerBits::from_cell(self.int(self.layout.player_bits))
    }

    #[inline]
    pub fn has(&self, flag: PlayerBits) -> bool {
        self.player_bits().contains(flag)
    }

    pub fn health(&self) -> i32 {
        self.int(self.layout.health)
    }

    pub fn health_percent(&self) -> i32 {
        percent(self.health(), self.int(self.layout.max_health))
    }

    pub fn target_health_percent(&self) -> i32 {
        percent(
            self.int(self.layout.target_health),
            self.int(self.layout.target_max_health),
        )
    }

    pub fn power(&self, power: PowerType) -> i32 {
        self.int(self.layout.power(power))
    }

    pub fn mana_percent(&self) -> i32 {
        percent(self.power(PowerType::Mana), self.int(self.layout.max_mana))
    }

    pub fn level(&self) -> i32 {
        self.int(self.layout.level)
    }

    /// Current shapeshift form; unknown values read as [`Form::None`].
    pub fn form(&self) -> Form {
        u8::try_from(self.int(self.layout.form))
            .ok()
            .and_then(Form::from_repr)
            .unwrap_or_default()
    }

    pub fn race(&self) -> Race {
        u8::try_from(self.int(self.layout.race_class) / 100)
            .ok()
            .and_then(Race::from_repr)
            .unwrap_or_default()
    }

    pub fn class(&self) -> Class {
        u8::try_from(self.int(self.layout.race_class) % 100)
            .ok()
            .and_then(Class::from_repr)
            .unwrap_or_default()
    }

    pub fn target_npc_id(&self) -> i32 {
        self.int(self.layout.target_npc_id)
    }

    /// Spell id the target is casting, `0` when idle.
    pub fn target_casting_spell(&self) -> i32 {
        self.int(self.layout.target_casting_spell)
    }

    pub fn combo_points(&self) -> i32 {
        self.int(self.layout.combo_points)
    }

    pub fn mob_count(&self) -> i32 {
        self.int(self.layout.mob_count)
    }

    pub fn min_range(&self) -> i32 {
        self.int(self.layout.min_range)
    }

    pub fn max_range(&self) -> i32 {
        self.int(self.layout.max_range)
    }

    pub fn spell_in_range(&self, bit: usize) -> bool {
        bit_set(self.int(self.layout.spell_in_range), bit)
    }

    pub fn trigger(&self, bit: usize) -> bool {
        bit_set(self.int(self.layout.custom_trigger), bit)
    }

    /// Whether the action in the bound slot index is usable.
    pub fn action_usable(&self, slot: u16) -> bool {
        self.action_bit(self.layout.usable_actions, slot)
    }

    /// Whether the action in the bound slot index is the one in effect.
    pub fn action_current(&self, slot: u16) -> bool {
        self.action_bit(self.layout.current_actions, slot)
    }

    fn action_bit(&self, base: usize, slot: u16) -> bool {
        let slot = usize::from(slot);
        let cell = slot / CellLayout::ACTION_BITS_PER_CELL;
        if cell >= CellLayout::ACTION_BAR_CELLS {
            return false;
        }
        bit_set(
            self.int(base + cell),
            slot % CellLayout::ACTION_BITS_PER_CELL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_table() {
        assert_eq!(MASK[0], 1);
        assert_eq!(MASK[1], 2);
        assert_eq!(MASK[30], 1 << 30);
        assert_eq!(MASK[31], i32::MIN);
        assert!(bit_set(-1, 31));
        assert!(!bit_set(-1, 32));
    }

    #[test]
    fn percent_of_zero_max_is_zero() {
        assert_eq!(percent(50, 0), 0);
        assert_eq!(percent(50, 200), 25);
        assert_eq!(percent(i32::MAX, i32::MAX), 100);
    }

    #[test]
    fn missing_cells_read_zero() {
        let feed = CellFeed::new(2);
        feed.set(5, 9);
        assert_eq!(feed.get_int(5), 0);
        assert_eq!(feed.get_int(1), 0);
    }

    #[test]
    fn fixed_point() {
        let feed = CellFeed::new(1);
        feed.set(0, 250_000);
        assert!((feed.get_fixed(0) - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn packed_strings() {
        let feed = CellFeed::new(1);
        // 'A' = 65, 'B' = 66, 'C' = 67
        feed.set(0, 656_667);
        assert_eq!(feed.get_string(0), "ABC");

        // leading zero pair is a NUL
        feed.set(0, 6_566);
        assert_eq!(feed.get_string(0), "AB");

        feed.set(0, 0);
        assert_eq!(feed.get_string(0), "");

        feed.set(0, 1_000_000);
        assert_eq!(feed.get_string(0), "");
    }

    #[test]
    fn set_bit_round_trip() {
        let feed = CellFeed::new(1);
        feed.set_bit(0, 31, true);
        feed.set_bit(0, 3, true);
        assert_eq!(feed.get_int(0), i32::MIN | 8);
        feed.set_bit(0, 31, false);
        assert_eq!(feed.get_int(0), 8);
    }

    #[test]
    fn action_bar_spans_cells() {
        let layout = CellLayout::default();
        let feed = Arc::new(CellFeed::for_layout(&layout));
        feed.set_bit(layout.usable_actions, 5, true);
        feed.set_bit(layout.usable_actions + 3, 1, true);
        let sensors = Sensors::new(feed, layout);

        assert!(sensors.action_usable(5));
        assert!(sensors.action_usable(73));
        assert!(!sensors.action_usable(72));
        assert!(!sensors.action_usable(500));
    }

    #[test]
    fn race_and_class_share_a_cell() {
        let layout = CellLayout::default();
        let feed = Arc::new(CellFeed::for_layout(&layout));
        feed.set(layout.race_class, 4 * 100 + 11);
        let sensors = Sensors::new(feed, layout);

        assert_eq!(sensors.race(), Race::NightElf);
        assert_eq!(sensors.class(), Class::Druid);
    }
}
