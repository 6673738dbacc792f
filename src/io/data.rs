//! Plain-data snapshot of an [`EntityStore`].
//!
//! [`StoreData`] mirrors the store table by table as nested vectors, down
//! tables and up tables alike. Down tables carry the tombstones: `None`
//! (`null` in JSON) is a deleted slot, while a live entity with no links is
//! an empty list. Positions have no down-link, so their entry is the list of
//! vertices using them: `null` for a deleted position, `[]` for a live but
//! unused one.

use crate::kernel_error::KernelError;
use crate::topology::arena::{Slot, Table};
use crate::topology::kind::EntKind;
use crate::topology::store::{CollDown, EntityStore, FaceDown, VertUp, WireOwner};
use crate::topology::validation::{CheckOptions, check_store_with};
use serde::{Deserialize, Serialize};

/// Serializable copy of every table of an [`EntityStore`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    pub posis: Vec<Option<Vec<usize>>>,
    pub verts: Vec<Option<usize>>,
    pub vert_up: Vec<VertUp>,
    pub vert_tris: Vec<Vec<usize>>,
    pub edges: Vec<Option<[usize; 2]>>,
    pub edge_wire: Vec<Option<usize>>,
    pub wires: Vec<Option<Vec<usize>>>,
    pub wire_owner: Vec<Option<WireOwner>>,
    pub tris: Vec<Option<[usize; 3]>>,
    pub tri_face: Vec<Option<usize>>,
    pub faces: Vec<Option<FaceDown>>,
    pub face_pgon: Vec<Option<usize>>,
    pub points: Vec<Option<usize>>,
    pub point_colls: Vec<Vec<usize>>,
    pub plines: Vec<Option<usize>>,
    pub pline_colls: Vec<Vec<usize>>,
    pub pgons: Vec<Option<usize>>,
    pub pgon_colls: Vec<Vec<usize>>,
    pub colls: Vec<Option<CollDown>>,
    pub coll_parent: Vec<Option<usize>>,
}

fn table_to_vec<T: Clone>(t: &Table<T>) -> Vec<Option<T>> {
    t.slots().iter().map(|s| s.as_live().cloned()).collect()
}

fn vec_to_table<T>(v: Vec<Option<T>>) -> Table<T> {
    v.into_iter().map(Slot::from).collect()
}

fn same_len(kind: EntKind, down: usize, up: usize, what: &str) -> Result<(), KernelError> {
    if down == up {
        Ok(())
    } else {
        Err(KernelError::violation(format!(
            "{kind} data has {down} slots but {up} {what} entries"
        )))
    }
}

impl StoreData {
    fn check_lengths(&self) -> Result<(), KernelError> {
        same_len(EntKind::Vert, self.verts.len(), self.vert_up.len(), "vert_up")?;
        same_len(EntKind::Vert, self.verts.len(), self.vert_tris.len(), "vert_tris")?;
        same_len(EntKind::Edge, self.edges.len(), self.edge_wire.len(), "edge_wire")?;
        same_len(EntKind::Wire, self.wires.len(), self.wire_owner.len(), "wire_owner")?;
        same_len(EntKind::Tri, self.tris.len(), self.tri_face.len(), "tri_face")?;
        same_len(EntKind::Face, self.faces.len(), self.face_pgon.len(), "face_pgon")?;
        same_len(EntKind::Point, self.points.len(), self.point_colls.len(), "point_colls")?;
        same_len(EntKind::Pline, self.plines.len(), self.pline_colls.len(), "pline_colls")?;
        same_len(EntKind::Pgon, self.pgons.len(), self.pgon_colls.len(), "pgon_colls")?;
        same_len(EntKind::Coll, self.colls.len(), self.coll_parent.len(), "coll_parent")?;
        Ok(())
    }
}

impl EntityStore {
    /// Copies every table out of the store.
    pub fn get_data(&self) -> StoreData {
        StoreData {
            posis: (0..self.posis.len())
                .map(|p| self.posis.is_live(p).then(|| self.posi_verts[p].clone()))
                .collect(),
            verts: table_to_vec(&self.verts),
            vert_up: self.vert_up.clone(),
            vert_tris: self.vert_tris.clone(),
            edges: table_to_vec(&self.edges),
            edge_wire: self.edge_wire.clone(),
            wires: table_to_vec(&self.wires),
            wire_owner: self.wire_owner.clone(),
            tris: table_to_vec(&self.tris),
            tri_face: self.tri_face.clone(),
            faces: table_to_vec(&self.faces),
            face_pgon: self.face_pgon.clone(),
            points: table_to_vec(&self.points),
            point_colls: self.point_colls.clone(),
            plines: table_to_vec(&self.plines),
            pline_colls: self.pline_colls.clone(),
            pgons: table_to_vec(&self.pgons),
            pgon_colls: self.pgon_colls.clone(),
            colls: table_to_vec(&self.colls),
            coll_parent: self.coll_parent.clone(),
        }
    }

    /// Replaces the whole store with `data`.
    ///
    /// Fails with `StructuralViolation` if a kind's down and up vectors
    /// differ in length or the loaded tables are not consistent; the store
    /// is left untouched in that case.
    ///
    /// Only consistent stores round-trip. A snapshot taken part way through
    /// a composite edit (e.g. after removing a position a vertex still
    /// sits on) links to deleted slots; load it with
    /// [`EntityStore::set_data_with`] and `check_dangling` off.
    pub fn set_data(&mut self, data: StoreData) -> Result<(), KernelError> {
        self.set_data_with(data, CheckOptions::all())
    }

    /// [`EntityStore::set_data`] running only the checks selected by
    /// `options`. Links past the end of a table are always rejected.
    pub fn set_data_with(&mut self, data: StoreData, options: CheckOptions) -> Result<(), KernelError> {
        data.check_lengths()?;
        let posi_verts = data
            .posis
            .iter()
            .map(|p| p.clone().unwrap_or_default())
            .collect();
        let loaded = EntityStore {
            posis: data.posis.into_iter().map(|p| Slot::from(p.map(|_| ()))).collect(),
            verts: vec_to_table(data.verts),
            edges: vec_to_table(data.edges),
            wires: vec_to_table(data.wires),
            tris: vec_to_table(data.tris),
            faces: vec_to_table(data.faces),
            points: vec_to_table(data.points),
            plines: vec_to_table(data.plines),
            pgons: vec_to_table(data.pgons),
            colls: vec_to_table(data.colls),
            posi_verts,
            vert_up: data.vert_up,
            vert_tris: data.vert_tris,
            edge_wire: data.edge_wire,
            wire_owner: data.wire_owner,
            tri_face: data.tri_face,
            face_pgon: data.face_pgon,
            point_colls: data.point_colls,
            pline_colls: data.pline_colls,
            pgon_colls: data.pgon_colls,
            coll_parent: data.coll_parent,
        };
        if let Some(first) = check_store_with(&loaded, options).into_iter().next() {
            return Err(KernelError::StructuralViolation(format!(
                "inconsistent store data: {first}"
            )));
        }
        *self = loaded;
        log::debug!(
            "loaded store data: {} posis, {} verts, {} faces",
            self.count(EntKind::Posi),
            self.count(EntKind::Vert),
            self.count(EntKind::Face)
        );
        Ok(())
    }

    /// Builds a store from `data`. See [`EntityStore::set_data`].
    pub fn from_data(data: StoreData) -> Result<Self, KernelError> {
        let mut s = EntityStore::new();
        s.set_data(data)?;
        Ok(s)
    }
}
