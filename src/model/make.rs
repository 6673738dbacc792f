//! Building objects from positions.

use super::Model;
use crate::attribs::Attribs;
use crate::kernel_error::KernelError;
use crate::topology::kind::EntKind;

impl<A: Attribs> Model<A> {
    /// Adds a position and sets its coordinates.
    pub fn add_posi_at(&mut self, xyz: [f64; 3]) -> usize {
        let p = self.store.add_posi();
        self.attribs.set_posi_coords(p, xyz);
        p
    }

    /// Adds a point object on `posi`.
    pub fn add_point(&mut self, posi: usize) -> Result<usize, KernelError> {
        let v = self.store.add_vert(posi)?;
        let pt = self.store.add_point_ent(v)?;
        self.debug_check();
        Ok(pt)
    }

    /// Adds a polyline through `posis`, closed back to the first position
    /// when `closed`.
    pub fn add_pline(&mut self, posis: &[usize], closed: bool) -> Result<usize, KernelError> {
        self.check_ring(posis, if closed { 3 } else { 2 }, false)?;
        let wire = self.add_path(posis, closed)?;
        let pl = self.store.add_pline_ent(wire)?;
        self.debug_check();
        Ok(pl)
    }

    /// Adds a polygon with boundary `posis` and one hole per entry of
    /// `holes`, then triangulates it.
    pub fn add_pgon(&mut self, posis: &[usize], holes: &[Vec<usize>]) -> Result<usize, KernelError> {
        self.check_ring(posis, 3, true)?;
        for hole in holes {
            self.check_ring(hole, 3, true)?;
        }
        let mut wires = Vec::with_capacity(1 + holes.len());
        wires.push(self.add_path(posis, true)?);
        for hole in holes {
            wires.push(self.add_path(hole, true)?);
        }
        let face = self.store.add_face(&wires)?;
        let pg = self.store.add_pgon_ent(face)?;
        self.triangulate_face(face)?;
        self.debug_check();
        Ok(pg)
    }

    /// Cuts a hole through `posis` into `pgon` and re-triangulates it.
    /// Returns the new hole wire.
    pub fn add_pgon_hole(&mut self, pgon: usize, posis: &[usize]) -> Result<usize, KernelError> {
        let face = self
            .store
            .pgon_face(pgon)
            .ok_or_else(|| KernelError::not_found(EntKind::Pgon, pgon))?;
        self.check_ring(posis, 3, true)?;
        let wire = self.add_path(posis, true)?;
        self.store.link_face_wire(face, wire)?;
        self.triangulate_face(face)?;
        self.debug_check();
        Ok(wire)
    }

    /// One fresh vertex per position, joined into a wire.
    fn add_path(&mut self, posis: &[usize], closed: bool) -> Result<usize, KernelError> {
        let mut verts = Vec::with_capacity(posis.len());
        for &p in posis {
            verts.push(self.store.add_vert(p)?);
        }
        let edges = self.store.add_edge_chain(&verts, closed)?;
        self.store.add_wire(&edges)
    }

    /// Checks up front so a bad input does not leave half an object behind.
    /// Rings that will be triangulated also need coordinates on every
    /// position.
    fn check_ring(&self, posis: &[usize], min: usize, needs_coords: bool) -> Result<(), KernelError> {
        if posis.len() < min {
            return Err(KernelError::violation(format!(
                "need at least {min} positions, got {}",
                posis.len()
            )));
        }
        for &p in posis {
            self.store.require(EntKind::Posi, p)?;
            if needs_coords && self.attribs.posi_coords(p).is_none() {
                return Err(KernelError::not_found(EntKind::Posi, p));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::attribs::AttribTable;
    use crate::kernel_error::KernelError;
    use crate::model::Model;
    use crate::topology::kind::EntKind;
    use crate::topology::store::WireOwner;

    fn square(m: &mut Model) -> Vec<usize> {
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]
            .into_iter()
            .map(|xyz| m.add_posi_at(xyz))
            .collect()
    }

    #[test]
    fn pgon_from_square() {
        let mut m: Model<AttribTable> = Model::new();
        let posis = square(&mut m);
        let pg = m.add_pgon(&posis, &[]).unwrap();
        let s = m.store();
        let face = s.pgon_face(pg).unwrap();
        let wire = m.get_face_boundary(face).unwrap();
        assert_eq!(s.wire_edges(wire).unwrap().len(), 4);
        assert_eq!(s.face_tris(face).unwrap().len(), 2);
        assert_eq!(s.wire_owner(wire), Some(WireOwner::Face(face)));
        assert!(m.check().is_empty(), "{:?}", m.check());
    }

    #[test]
    fn pline_shares_posis_with_pgon() {
        let mut m: Model = Model::new();
        let posis = square(&mut m);
        m.add_pgon(&posis, &[]).unwrap();
        let pl = m.add_pline(&posis[..3], false).unwrap();
        let s = m.store();
        assert_eq!(s.nav_any_to_posi(EntKind::Pline, pl).unwrap(), posis[..3].to_vec());
        // every shared posi now has two verts
        assert_eq!(s.posi_verts(posis[0]).unwrap().len(), 2);
        assert!(m.check().is_empty());
    }

    #[test]
    fn bad_input_adds_nothing() {
        let mut m: Model = Model::new();
        let posis = square(&mut m);
        assert!(m.add_pline(&posis[..1], false).is_err());
        assert!(m.add_pgon(&posis[..2], &[]).is_err());
        assert!(m.add_pgon(&[posis[0], posis[1], 99], &[]).is_err());
        assert_eq!(m.store().count(EntKind::Vert), 0);

        // a position without coordinates cannot be triangulated
        let bare = m.store_mut().add_posi();
        assert_eq!(
            m.add_pgon(&[posis[0], posis[1], posis[2], bare], &[]),
            Err(KernelError::NotFound {
                kind: EntKind::Posi,
                index: bare
            })
        );
        let pg = m.add_pgon(&posis, &[]).unwrap();
        let before = m.store().clone();
        assert!(m.add_pgon_hole(pg, &[posis[0], posis[1], bare]).is_err());
        assert!(m.add_pgon(&posis, &[vec![posis[0], posis[1], bare]]).is_err());
        assert_eq!(m.store(), &before);
        for kind in [EntKind::Pgon, EntKind::Face, EntKind::Wire] {
            assert_eq!(m.store().num_live(kind), 1, "{kind}");
        }
        // plines are never triangulated, so bare positions are fine there
        assert!(m.add_pline(&[posis[0], bare], false).is_ok());
    }

    #[test]
    fn point_on_posi() {
        let mut m: Model = Model::new();
        let p = m.add_posi_at([2.0, 2.0, 2.0]);
        let pt = m.add_point(p).unwrap();
        assert_eq!(m.store().nav_any_to_posi(EntKind::Point, pt).unwrap(), vec![p]);
    }
}
