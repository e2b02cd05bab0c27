use requirement::Comparison;

/// Structured requirement forms, in detection order.
///
/// Detection is by substring containment and the first match wins, so the
/// order is part of the grammar: comparisons come first, and `SpellInRange:`
/// and `TargetCastingSpell` are tried before the bare `Spell` keyword they
/// contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::AsRefStr)]
pub enum RequirementKind {
    GreaterOrEqual,
    LessOrEqual,
    Greater,
    Less,
    Equal,
    Modulo,
    /// `npcID:<id>[,<id>...]`
    NpcId,
    /// `BagItem:<item>[:<count>]`
    BagItem,
    /// `SpellInRange:<bit>`
    SpellInRange,
    /// `TargetCastingSpell[:<id>,<id>...]`
    TargetCastingSpell,
    /// `Form:<form>`
    Form,
    /// `Race:<race>`
    Race,
    /// `Spell:<name or id>`
    Spell,
    /// `Talent:<name>[:<rank>]`
    Talent,
    /// `Trigger:<bit>[:<label>]`
    Trigger,
    /// `Usable:<action>`
    Usable,
    /// `Current:<action>`
    Current,
}

impl RequirementKind {
    pub const ALL: [RequirementKind; 17] = [
        Self::GreaterOrEqual,
        Self::LessOrEqual,
        Self::Greater,
        Self::Less,
        Self::Equal,
        Self::Modulo,
        Self::NpcId,
        Self::BagItem,
        Self::SpellInRange,
        Self::TargetCastingSpell,
        Self::Form,
        Self::Race,
        Self::Spell,
        Self::Talent,
        Self::Trigger,
        Self::Usable,
        Self::Current,
    ];

    pub const fn keyword(self) -> &'static str {
        match self {
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::Less => "<",
            Self::Equal => "==",
            Self::Modulo => "%",
            Self::NpcId => "npcID:",
            Self::BagItem => "BagItem:",
            Self::SpellInRange => "SpellInRange:",
            Self::TargetCastingSpell => "TargetCastingSpell",
            Self::Form => "Form",
            Self::Race => "Race",
            Self::Spell => "Spell",
            Self::Talent => "Talent",
            Self::Trigger => "Trigger:",
            Self::Usable => "Usable:",
            Self::Current => "Current:",
        }
    }

    /// The comparison operator behind an arithmetic kind.
    pub const fn comparison(self) -> Option<Comparison> {
        match self {
            Self::GreaterOrEqual => Some(Comparison::GreaterOrEqual),
            Self::LessOrEqual => Some(Comparison::LessOrEqual),
            Self::Greater => Some(Comparison::Greater),
            Self::Less => Some(Comparison::Less),
            Self::Equal => Some(Comparison::Equal),
            Self::Modulo => Some(Comparison::Modulo),
            _ => None,
        }
    }

    pub fn detect(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| text.contains(kind.keyword()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn table_matches_declaration_order() {
        assert!(RequirementKind::iter().eq(RequirementKind::ALL));
    }

    #[test]
    fn first_keyword_wins() {
        use RequirementKind as K;
        assert_eq!(K::detect("SpellInRange:2"), Some(K::SpellInRange));
        assert_eq!(K::detect("TargetCastingSpell"), Some(K::TargetCastingSpell));
        assert_eq!(K::detect("Spell:Fireball"), Some(K::Spell));
        assert_eq!(K::detect("BagItem:6948"), Some(K::BagItem));
        assert_eq!(K::detect("Form:DruidCat"), Some(K::Form));
        assert_eq!(K::detect("Usable:Heal"), Some(K::Usable));
        assert_eq!(K::detect("Current:Attack"), Some(K::Current));
        assert_eq!(K::detect("Mana% >= 40"), Some(K::GreaterOrEqual));
        assert_eq!(K::detect("Has Pet"), None);
    }

    #[test]
    fn comparisons_agree_with_generic_detection() {
        for text in ["a >= 1", "a <= 1", "a > 1", "a < 1", "a == 1", "a % 2"] {
            let kind = RequirementKind::detect(text).and_then(RequirementKind::comparison);
            assert_eq!(kind, Comparison::detect(text), "{text}");
        }
    }
}
