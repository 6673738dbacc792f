//! Collection hierarchy and membership.
//!
//! Collections form a forest: each has at most one parent. Membership of
//! objects is mirrored (collection → objects, object → collections), while
//! the parent link is stored only on the child and child lists are derived
//! by scanning.

use crate::kernel_error::KernelError;
use crate::topology::edit::{push_unique, remove_value};
use crate::topology::kind::EntKind;
use crate::topology::store::EntityStore;
use hashbrown::HashSet;

impl EntityStore {
    /// Adds an object or a sub-collection to `coll`.
    ///
    /// For `EntKind::Coll` this is [`EntityStore::coll_set_parent`] and
    /// refuses to create a cycle.
    pub fn coll_add_child(&mut self, coll: usize, kind: EntKind, child: usize) -> Result<(), KernelError> {
        match kind {
            EntKind::Coll => self.coll_set_parent(child, Some(coll)),
            k if k.is_obj() => self.coll_add_obj(coll, k, child),
            _ => Err(KernelError::violation(format!(
                "collections hold points, plines, pgons and colls, not {kind}"
            ))),
        }
    }

    /// Removes an object or a sub-collection from `coll`. Absent members
    /// are ignored.
    pub fn coll_remove_child(&mut self, coll: usize, kind: EntKind, child: usize) -> Result<(), KernelError> {
        match kind {
            EntKind::Coll => {
                self.require(EntKind::Coll, coll)?;
                self.require(EntKind::Coll, child)?;
                if self.coll_parent[child] == Some(coll) {
                    self.coll_parent[child] = None;
                }
                Ok(())
            }
            k if k.is_obj() => self.coll_remove_obj(coll, k, child),
            _ => Err(KernelError::violation(format!(
                "collections hold points, plines, pgons and colls, not {kind}"
            ))),
        }
    }

    /// Adds an object to `coll` directly.
    pub fn coll_add_obj(&mut self, coll: usize, kind: EntKind, obj: usize) -> Result<(), KernelError> {
        self.require(EntKind::Coll, coll)?;
        self.require(kind, obj)?;
        let Some(list) = self.colls.get_mut(coll).and_then(|c| c.objs_mut(kind)) else {
            return Err(KernelError::violation(format!("{kind} is not an object kind")));
        };
        push_unique(list, obj);
        if let Some(table) = self.obj_colls_table_mut(kind) {
            push_unique(&mut table[obj], coll);
        }
        Ok(())
    }

    /// Removes an object from `coll`.
    pub fn coll_remove_obj(&mut self, coll: usize, kind: EntKind, obj: usize) -> Result<(), KernelError> {
        self.require(EntKind::Coll, coll)?;
        self.require(kind, obj)?;
        if let Some(list) = self.colls.get_mut(coll).and_then(|c| c.objs_mut(kind)) {
            remove_value(list, obj);
        }
        if let Some(table) = self.obj_colls_table_mut(kind) {
            remove_value(&mut table[obj], coll);
        }
        Ok(())
    }

    /// Sets (or clears, with `None`) the parent of `coll`.
    ///
    /// Refuses a parent equal to `coll` or descending from it.
    pub fn coll_set_parent(&mut self, coll: usize, parent: Option<usize>) -> Result<(), KernelError> {
        self.require(EntKind::Coll, coll)?;
        if let Some(p) = parent {
            self.require(EntKind::Coll, p)?;
            if p == coll || self.coll_is_ancestor(coll, p) {
                return Err(KernelError::violation(format!(
                    "coll {p} cannot be the parent of coll {coll}: it would create a cycle"
                )));
            }
        }
        self.coll_parent[coll] = parent;
        Ok(())
    }

    pub fn coll_clear_parent(&mut self, coll: usize) -> Result<(), KernelError> {
        self.coll_set_parent(coll, None)
    }

    /// Parent chain of `coll`, nearest first.
    ///
    /// The walk stops at the first repeated collection, so a corrupted chain
    /// still terminates.
    pub fn coll_ancestors(&self, coll: usize) -> Vec<usize> {
        let mut out = Vec::new();
        if !self.colls.is_live(coll) {
            return out;
        }
        let mut seen = HashSet::new();
        seen.insert(coll);
        let mut cur = self.coll_parent[coll];
        while let Some(p) = cur {
            if !seen.insert(p) {
                log::warn!("cycle in collection parents at coll {p}");
                break;
            }
            out.push(p);
            cur = self.coll_parent.get(p).copied().flatten();
        }
        out
    }

    /// Collections whose ancestor chain contains `coll`, ascending.
    pub fn coll_descendants(&self, coll: usize) -> Vec<usize> {
        self.colls
            .live_indices()
            .filter(|&c| c != coll && self.coll_ancestors(c).contains(&coll))
            .collect()
    }

    /// Direct sub-collections of `coll`, ascending.
    pub fn coll_children(&self, coll: usize) -> Vec<usize> {
        self.colls
            .live_indices()
            .filter(|&c| self.coll_parent[c] == Some(coll))
            .collect()
    }

    /// `true` if `a` is a strict ancestor of `b`.
    pub fn coll_is_ancestor(&self, a: usize, b: usize) -> bool {
        self.coll_ancestors(b).contains(&a)
    }

    /// `coll` followed by its descendants.
    pub(crate) fn coll_and_descendants(&self, coll: usize) -> Vec<usize> {
        let mut out = vec![coll];
        out.extend(self.coll_descendants(coll));
        out
    }
}
