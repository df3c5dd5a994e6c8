//! Name-keyed dense storage shared by the detector and subscriber registries.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

/// Dense entries with an O(1) name index.
///
/// Iteration follows insertion order until a removal, which moves the last
/// entry into the freed slot.
pub(crate) struct NamedSlots<T> {
    entries: Vec<(String, T)>,
    index: FxHashMap<String, usize>,
}

impl<T> NamedSlots<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Inserts the value built by `make` unless `name` is taken.
    ///
    /// `make` only runs when the name is vacant. Returns `true` if inserted.
    pub(crate) fn insert_if_absent(&mut self, name: String, make: impl FnOnce() -> T) -> bool {
        match self.index.entry(name) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                let slot = self.entries.len();
                self.entries.push((vacant.key().clone(), make()));
                vacant.insert(slot);
                true
            }
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<T> {
        let slot = self.index.remove(name)?;
        let (_, value) = self.entries.swap_remove(slot);
        if let Some((moved, _)) = self.entries.get(slot)
            && let Some(moved_slot) = self.index.get_mut(moved)
        {
            *moved_slot = slot;
        }
        Some(value)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        let slot = *self.index.get(name)?;
        self.entries.get_mut(slot).map(|(_, value)| value)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&T> {
        let slot = *self.index.get(name)?;
        self.entries.get(slot).map(|(_, value)| value)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|(_, value)| value)
    }
}
