//! Sparse, index-addressed tables with tombstones.
//!
//! A [`Table`] only ever grows. Removing an entry replaces it with
//! [`Slot::Dead`], so every index handed out stays valid (as "dead") for the
//! lifetime of the table.

use serde::{Deserialize, Serialize};

/// One slot of a [`Table`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot<T> {
    Live(T),
    Dead,
}

impl<T> Slot<T> {
    #[inline]
    pub fn as_live(&self) -> Option<&T> {
        match self {
            Slot::Live(v) => Some(v),
            Slot::Dead => None,
        }
    }

    #[inline]
    pub fn as_live_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Live(v) => Some(v),
            Slot::Dead => None,
        }
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self, Slot::Live(_))
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Slot::Dead, Slot::Live)
    }
}

impl<T> From<Slot<T>> for Option<T> {
    fn from(s: Slot<T>) -> Self {
        match s {
            Slot::Live(v) => Some(v),
            Slot::Dead => None,
        }
    }
}

/// Append-only table of tombstoned slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a live entry and returns its index.
    #[inline]
    pub fn push(&mut self, value: T) -> usize {
        self.slots.push(Slot::Live(value));
        self.slots.len() - 1
    }

    /// Appends a slot as-is (live or dead).
    #[inline]
    pub fn push_slot(&mut self, slot: Slot<T>) -> usize {
        self.slots.push(slot);
        self.slots.len() - 1
    }

    /// Number of allocated slots, dead ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Slot::as_live)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Slot::as_live_mut)
    }

    #[inline]
    pub fn is_live(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// `true` only for slots that were allocated and then tombstoned.
    #[inline]
    pub fn is_dead(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Slot::Dead))
    }

    /// Tombstones `index`, returning the previous value if it was live.
    pub fn kill(&mut self, index: usize) -> Option<T> {
        let slot = self.slots.get_mut(index)?;
        match std::mem::replace(slot, Slot::Dead) {
            Slot::Live(v) => Some(v),
            Slot::Dead => None,
        }
    }

    /// Indices of live slots, ascending.
    pub fn live_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.is_live().then_some(i))
    }

    /// `(index, value)` for every live slot, ascending.
    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_live().map(|v| (i, v)))
    }

    pub fn num_live(&self) -> usize {
        self.slots.iter().filter(|s| s.is_live()).count()
    }

    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }
}

impl<T> FromIterator<Slot<T>> for Table<T> {
    fn from_iter<I: IntoIterator<Item = Slot<T>>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_survive_kill() {
        let mut t = Table::new();
        let a = t.push('a');
        let b = t.push('b');
        assert_eq!((a, b), (0, 1));
        assert_eq!(t.kill(a), Some('a'));
        assert_eq!(t.kill(a), None);
        assert!(t.is_dead(a));
        assert!(!t.is_dead(7));
        assert_eq!(t.len(), 2);
        assert_eq!(t.num_live(), 1);
        assert_eq!(t.push('c'), 2);
        assert_eq!(t.live_indices().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn option_conversion() {
        let s: Slot<u8> = None.into();
        assert_eq!(s, Slot::Dead);
        let o: Option<u8> = Slot::Live(3).into();
        assert_eq!(o, Some(3));
    }
}
