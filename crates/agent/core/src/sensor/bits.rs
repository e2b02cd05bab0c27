use bitflags::bitflags;

bitflags! {
    /// Status flags packed into the player bit cell.
    ///
    /// The cell is a signed 32-bit integer on the wire; bit 31 is reserved
    /// and lands on the sign bit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PlayerBits: u32 {
        const HAS_TARGET           = 1 << 0;
        const TARGET_DEAD          = 1 << 1;
        const IN_COMBAT            = 1 << 2;
        const TARGET_IN_COMBAT     = 1 << 3;
        const IS_DEAD              = 1 << 4;
        const IS_SWIMMING          = 1 << 5;
        const ITEMS_BROKEN         = 1 << 6;
        const HAS_PET              = 1 << 7;
        const PET_HAS_TARGET       = 1 << 8;
        const PET_DEAD             = 1 << 9;
        const IS_CASTING           = 1 << 10;
        const IS_MOUNTED           = 1 << 11;
        const IS_FALLING           = 1 << 12;
        const IN_MELEE_RANGE       = 1 << 13;
        const IN_COMBAT_RANGE      = 1 << 14;
        const TARGET_TARGETS_PLAYER = 1 << 15;
        const FREE_CAST            = 1 << 16;
        const BAG_FULL             = 1 << 17;
        const IS_INDOORS           = 1 << 18;
        const TARGET_IS_PLAYER     = 1 << 19;
        const AUTO_ATTACKING       = 1 << 20;
        const PULLED               = 1 << 21;
    }
}

impl PlayerBits {
    /// Decodes the raw cell value, ignoring bits without a flag.
    #[inline]
    pub const fn from_cell(value: i32) -> Self {
        Self::from_bits_truncate(value as u32)
    }

    /// Target exists and is not dead.
    #[inline]
    pub const fn target_alive(self) -> bool {
        self.contains(Self::HAS_TARGET) && !self.contains(Self::TARGET_DEAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_cells_decode() {
        let bits = PlayerBits::from_cell(i32::MIN | 0b101);
        assert!(bits.contains(PlayerBits::HAS_TARGET | PlayerBits::IN_COMBAT));
        assert!(!bits.contains(PlayerBits::TARGET_DEAD));
    }

    #[test]
    fn target_alive_requires_target() {
        assert!(!PlayerBits::empty().target_alive());
        assert!(PlayerBits::HAS_TARGET.target_alive());
        assert!(!(PlayerBits::HAS_TARGET | PlayerBits::TARGET_DEAD).target_alive());
    }
}
