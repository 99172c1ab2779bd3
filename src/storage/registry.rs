//! Sparse id-keyed arena.
//!
//! Slots live in a `Vec<Option<T>>`; released slots go to a sorted free set
//! so the smallest free id is always handed out next. Ids are stable: a
//! release never shifts any other item.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Registered, SlotId};

/// Growable store of `T` with first-fit id reuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry<T> {
    slots: Vec<Option<T>>,
    free: BTreeSet<usize>,
    live: usize,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: BTreeSet::new(),
            live: 0,
        }
    }
}

impl<T: Registered> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next `register` call will assign.
    pub fn peek_id(&self) -> T::Id {
        let index = self.free.first().copied().unwrap_or(self.slots.len());
        T::Id::from_index(index)
    }

    /// Store `item` under the smallest free id and tell the item its id.
    pub fn register(&mut self, mut item: T) -> T::Id {
        let index = match self.free.pop_first() {
            Some(index) => index,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        let id = T::Id::from_index(index);
        item.assign_id(id);
        self.slots[index] = Some(item);
        self.live += 1;
        id
    }

    /// Free the slot of `id`, returning what was stored there.
    pub fn release(&mut self, id: T::Id) -> Option<T> {
        let index = id.index();
        let item = self.slots.get_mut(index)?.take()?;
        self.free.insert(index);
        self.live -= 1;
        Some(item)
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.slots.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.get(id).is_some()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Occupied slots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (T::Id, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (T::Id::from_index(index), item)))
    }

    pub fn ids(&self) -> impl Iterator<Item = T::Id> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

// ============================================================================
// Tests
// ============================================================================
