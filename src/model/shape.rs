//! Shape edits that keep every index: reversing wires and welding or
//! unwelding positions.

use super::Model;
use crate::attribs::Attribs;
use crate::kernel_error::KernelError;
use crate::topology::kind::EntKind;
use crate::topology::store::WireOwner;

impl<A: Attribs> Model<A> {
    /// Reverses the direction of `wire`. A face owning it is
    /// re-triangulated so its triangles follow the new winding.
    pub fn reverse_wire(&mut self, wire: usize) -> Result<(), KernelError> {
        self.store.reverse_wire_edges(wire)?;
        if let Some(WireOwner::Face(face)) = self.store.wire_owner(wire) {
            self.triangulate_face(face)?;
        }
        self.debug_check();
        Ok(())
    }

    /// Moves every vertex in `verts` onto `posi`. Returns the positions
    /// that were left without vertices; they are not deleted.
    pub fn weld_posis(&mut self, verts: &[usize], posi: usize) -> Result<Vec<usize>, KernelError> {
        self.store.require(EntKind::Posi, posi)?;
        let mut old = Vec::with_capacity(verts.len());
        for &v in verts {
            old.push(
                self.store
                    .vert_posi(v)
                    .ok_or_else(|| KernelError::not_found(EntKind::Vert, v))?,
            );
        }
        self.store.replace_posis(verts, &vec![posi; verts.len()])?;
        let mut unused: Vec<usize> = old
            .into_iter()
            .filter(|&p| self.store.posi_verts(p).is_some_and(|vs| vs.is_empty()))
            .collect();
        unused.sort_unstable();
        unused.dedup();
        self.retriangulate_around(verts)?;
        self.debug_check();
        Ok(unused)
    }

    /// Gives every vertex in `verts` that shares its position with another
    /// vertex a fresh copy of that position. Returns the new positions.
    pub fn unweld_verts(&mut self, verts: &[usize]) -> Result<Vec<usize>, KernelError> {
        let mut fresh = Vec::new();
        for &v in verts {
            let posi = self
                .store
                .vert_posi(v)
                .ok_or_else(|| KernelError::not_found(EntKind::Vert, v))?;
            if self.store.posi_verts(posi).map_or(0, |vs| vs.len()) < 2 {
                continue;
            }
            let p = self.store.add_posi();
            if let Some(xyz) = self.attribs.posi_coords(posi) {
                self.attribs.set_posi_coords(p, xyz);
            }
            self.store.replace_vert_posi(v, p)?;
            fresh.push(p);
        }
        self.debug_check();
        Ok(fresh)
    }

    /// Re-triangulates every face whose wires pass through `verts`.
    fn retriangulate_around(&mut self, verts: &[usize]) -> Result<(), KernelError> {
        let mut faces = Vec::new();
        for &v in verts {
            for f in self.store.nav_any_to_any(EntKind::Vert, EntKind::Face, v)? {
                if !faces.contains(&f) {
                    faces.push(f);
                }
            }
        }
        for f in faces {
            self.triangulate_face(f)?;
        }
        Ok(())
    }
}
