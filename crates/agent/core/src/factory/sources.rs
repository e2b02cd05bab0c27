use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Game database and inventory lookups supplied by the host.
pub trait GameData: Send + Sync {
    /// Number of `item_id` across all bags.
    fn bag_item_count(&self, item_id: i32) -> i32;

    /// Spell id of a spell name, if the name is known at all.
    fn spell_id(&self, name: &str) -> Option<i32>;

    /// Whether the spell book contains `spell_id`.
    fn knows_spell(&self, spell_id: i32) -> bool;

    /// Whether `name` is a talent of the player's class.
    fn is_talent(&self, name: &str) -> bool;

    /// Points spent in talent `name`; `0` when untrained.
    fn talent_rank(&self, name: &str) -> i32;
}

#[derive(Debug, Default)]
struct Tables {
    bags: HashMap<i32, i32>,
    spell_ids: HashMap<String, i32>,
    known_spells: HashSet<i32>,
    talents: HashMap<String, i32>,
}

/// Table-backed [`GameData`] that can be updated while requirements hold it.
#[derive(Debug, Default)]
pub struct StaticGameData {
    tables: RwLock<Tables>,
}

impl StaticGameData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bag_count(&self, item_id: i32, count: i32) {
        if let Ok(mut tables) = self.tables.write() {
            tables.bags.insert(item_id, count);
        }
    }

    /// Declares a spell name; `known` adds it to the spell book.
    pub fn add_spell(&self, name: &str, spell_id: i32, known: bool) {
        if let Ok(mut tables) = self.tables.write() {
            tables.spell_ids.insert(name.to_owned(), spell_id);
            if known {
                tables.known_spells.insert(spell_id);
            } else {
                tables.known_spells.remove(&spell_id);
            }
        }
    }

    /// Declares a talent with the points spent in it.
    pub fn set_talent(&self, name: &str, rank: i32) {
        if let Ok(mut tables) = self.tables.write() {
            tables.talents.insert(name.to_owned(), rank);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T, fallback: T) -> T {
        self.tables.read().map(|tables| f(&tables)).unwrap_or(fallback)
    }
}

impl GameData for StaticGameData {
    fn bag_item_count(&self, item_id: i32) -> i32 {
        self.read(|t| t.bags.get(&item_id).copied().unwrap_or(0), 0)
    }

    fn spell_id(&self, name: &str) -> Option<i32> {
        self.read(|t| t.spell_ids.get(name).copied(), None)
    }

    fn knows_spell(&self, spell_id: i32) -> bool {
        self.read(|t| t.known_spells.contains(&spell_id), false)
    }

    fn is_talent(&self, name: &str) -> bool {
        self.read(|t| t.talents.contains_key(name), false)
    }

    fn talent_rank(&self, name: &str) -> i32 {
        self.read(|t| t.talents.get(name).copied().unwrap_or(0), 0)
    }
}
