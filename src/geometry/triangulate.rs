//! Face triangulation.
//!
//! [`triangulate`] is the pure polygon routine: rings of 3D points in, local
//! index triples out. It projects the rings onto the coordinate plane most
//! aligned with the boundary's Newell normal and runs ear clipping with hole
//! bridging (`earcutr`).
//!
//! [`triangulate_face`] is the adapter around it: it reads a face's wires,
//! resolves vertex coordinates through the attribute store, replaces the
//! face's cached triangles and re-links them.
//!
//! # Triangle count
//! A simple ring with `n` vertices yields `n - 2` triangles. Every hole adds
//! its vertex count plus two (the bridge edge is walked twice), so a face
//! with `n` boundary vertices and `h` holes holding `hv` vertices in total
//! yields `n + hv + 2h - 2`.

use crate::attribs::Attribs;
use crate::kernel_error::KernelError;
use crate::topology::kind::EntKind;
use crate::topology::store::EntityStore;

const EPS: f64 = 1e-12;

/// Newell normal of a ring (not normalised; its length is twice the area).
pub fn newell_normal(ring: &[[f64; 3]]) -> [f64; 3] {
    let mut n = [0.0; 3];
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        n[0] += (a[1] - b[1]) * (a[2] + b[2]);
        n[1] += (a[2] - b[2]) * (a[0] + b[0]);
        n[2] += (a[0] - b[0]) * (a[1] + b[1]);
    }
    n
}

/// Axes kept when projecting along the dominant normal component, ordered so
/// that the projected winding agrees with the normal's sign.
fn projection_axes(n: [f64; 3]) -> (usize, usize) {
    let (ax, ay, az) = (n[0].abs(), n[1].abs(), n[2].abs());
    if az >= ax && az >= ay {
        (0, 1)
    } else if ax >= ay {
        (1, 2)
    } else {
        (2, 0)
    }
}

fn signed_area_2d(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
}

/// Triangulates a boundary ring with holes.
///
/// Local indices number the boundary points first, then each hole in order.
/// Triangles wind the same way as the boundary. Rings with fewer than three
/// points, or a boundary with no area, give no triangles.
pub fn triangulate(boundary: &[[f64; 3]], holes: &[Vec<[f64; 3]>]) -> Result<Vec<[usize; 3]>, KernelError> {
    if boundary.len() < 3 {
        return Ok(Vec::new());
    }
    let normal = newell_normal(boundary);
    let len = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
    if len < EPS {
        log::warn!("degenerate boundary ring of {} points, no triangles", boundary.len());
        return Ok(Vec::new());
    }
    let (u, v) = projection_axes(normal);
    let winding = if normal[3 - u - v] >= 0.0 { 1.0 } else { -1.0 };

    let mut flat: Vec<f64> = Vec::with_capacity(2 * boundary.len());
    let mut pts: Vec<[f64; 2]> = Vec::with_capacity(boundary.len());
    let mut hole_starts = Vec::with_capacity(holes.len());
    for p in boundary {
        pts.push([p[u], p[v]]);
    }
    for hole in holes.iter().filter(|h| h.len() >= 3) {
        hole_starts.push(pts.len());
        for p in hole {
            pts.push([p[u], p[v]]);
        }
    }
    for p in &pts {
        flat.extend_from_slice(p);
    }

    let idx = earcutr::earcut(&flat, &hole_starts, 2)
        .map_err(|e| KernelError::Triangulation(format!("{e:?}")))?;

    Ok(idx
        .chunks_exact(3)
        .map(|t| {
            let area = signed_area_2d(pts[t[0]], pts[t[1]], pts[t[2]]);
            if area * winding < 0.0 {
                [t[0], t[2], t[1]]
            } else {
                [t[0], t[1], t[2]]
            }
        })
        .collect())
}

/// Rebuilds the triangles of `face` from its wires.
///
/// Old triangles are removed, new ones are added and linked to the face.
/// Returns the new triangle indices. Holes with fewer than three vertices
/// are skipped.
pub fn triangulate_face<A: Attribs + ?Sized>(
    store: &mut EntityStore,
    attribs: &mut A,
    face: usize,
) -> Result<Vec<usize>, KernelError> {
    store.require(EntKind::Face, face)?;
    let wires = store.face_wires(face).unwrap_or_default();

    let mut rings: Vec<Vec<usize>> = Vec::with_capacity(wires.len());
    for &w in &wires {
        rings.push(store.wire_verts(w).ok_or_else(|| KernelError::not_found(EntKind::Wire, w))?);
    }
    let mut xyz: Vec<Vec<[f64; 3]>> = Vec::with_capacity(rings.len());
    for ring in &rings {
        let mut pts = Vec::with_capacity(ring.len());
        for &v in ring {
            let posi = store
                .vert_posi(v)
                .ok_or_else(|| KernelError::not_found(EntKind::Vert, v))?;
            let p = attribs
                .posi_coords(posi)
                .ok_or_else(|| KernelError::not_found(EntKind::Posi, posi))?;
            pts.push(p);
        }
        xyz.push(pts);
    }

    // local indices skip holes that triangulate() skips
    let mut local_to_vert: Vec<usize> = Vec::new();
    let (boundary, holes) = match xyz.split_first() {
        Some((b, h)) => (b.as_slice(), h),
        None => (&[][..], &[][..]),
    };
    if let Some(first) = rings.first() {
        local_to_vert.extend_from_slice(first);
    }
    for ring in rings.iter().skip(1).filter(|r| r.len() >= 3) {
        local_to_vert.extend_from_slice(ring);
    }
    let local = triangulate(boundary, holes)?;

    for t in store.face_tris(face).unwrap_or_default() {
        store.remove(EntKind::Tri, t, &mut *attribs)?;
    }
    let mut tris = Vec::with_capacity(local.len());
    for [a, b, c] in local {
        let t = store.add_tri([local_to_vert[a], local_to_vert[b], local_to_vert[c]])?;
        store.link_face_tri(face, t)?;
        tris.push(t);
    }
    log::debug!(
        "triangulated face {face}: {} wires, {} tris",
        wires.len(),
        tris.len()
    );
    Ok(tris)
}
