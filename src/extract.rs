//! Table-driven isosurface extraction.
//!
//! No vertex or index buffer exists anywhere: every triangle corner is
//! derived independently from its integer vertex-slot index, the scalar
//! volume and the triangulation table. [`vertex`] is the whole algorithm;
//! the WGSL vertex stage in `marching_cubes.wgsl` is a transliteration of
//! it, and [`triangles`] is the serial CPU driver used by tests. Slots are
//! independent of each other, so any parallel schedule over them is valid.

use glam::Vec3;

use crate::field::ScalarVolume;
use crate::tables::{TriTable, CORNER_OFFSETS, EDGE_CORNERS, SENTINEL};

/// Vertex slots per cube: up to 5 triangles of 3 corners each.
pub const VERTS_PER_CELL: usize = 15;

/// One derived triangle corner, in field-index space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Derives the triangle corner for one vertex slot.
///
/// The slot decomposes as `cube = slot / 15`, `local = slot % 15`; the cube
/// index unravels over the interior dimensions (`dim - 1` per axis). Slots
/// whose table entry is the sentinel collapse to a zero-area triangle at
/// the cube origin.
///
/// # Panics
///
/// A slot at or beyond `cell_count() * 15` is a contract violation by the
/// caller and panics rather than clamping.
pub fn vertex(slot: usize, volume: &ScalarVolume, isolevel: f32, table: &TriTable) -> MeshVertex {
    let cells = volume.cell_count();
    assert!(
        slot < cells * VERTS_PER_CELL,
        "vertex slot {slot} out of range for {cells} cubes"
    );

    let cube = slot / VERTS_PER_CELL;
    let local = slot % VERTS_PER_CELL;
    let (cx, cy, cz) = cube_position(volume, cube);

    let samples = corner_samples(volume, cx, cy, cz);
    let mask = corner_mask(&samples, isolevel);
    let origin = Vec3::new(cx as f32, cy as f32, cz as f32);

    let edge = table.edge(mask, local);
    if edge == SENTINEL {
        return MeshVertex {
            position: origin,
            normal: Vec3::ZERO,
        };
    }

    let [a, b] = EDGE_CORNERS[edge as usize];
    let va = samples[a];
    let vb = samples[b];
    // A crossed edge with equal endpoint values has no unique crossing;
    // pin it to the midpoint instead of dividing by zero.
    let t = if va == vb {
        0.5
    } else {
        ((isolevel - va) / (vb - va)).clamp(0.0, 1.0)
    };

    let pa = origin + corner_offset(a);
    let pb = origin + corner_offset(b);
    let position = pa.lerp(pb, t);

    let ga = field_gradient(volume, cx + CORNER_OFFSETS[a][0], cy + CORNER_OFFSETS[a][1], cz + CORNER_OFFSETS[a][2]);
    let gb = field_gradient(volume, cx + CORNER_OFFSETS[b][0], cy + CORNER_OFFSETS[b][1], cz + CORNER_OFFSETS[b][2]);
    let gradient = ga.lerp(gb, t);
    // The gradient points toward higher samples, i.e. into the surface;
    // the outward normal is its negation.
    let normal = if gradient.length_squared() > 0.0 {
        -gradient.normalize()
    } else {
        Vec3::ZERO
    };

    MeshVertex { position, normal }
}

/// Collects the non-degenerate triangles of the whole volume by walking
/// every cube's table row. Serial counterpart of the GPU path, for tests
/// and CPU-side consumers.
pub fn triangles(volume: &ScalarVolume, isolevel: f32, table: &TriTable) -> Vec<[MeshVertex; 3]> {
    let mut out = Vec::new();
    for cube in 0..volume.cell_count() {
        let (cx, cy, cz) = cube_position(volume, cube);
        let samples = corner_samples(volume, cx, cy, cz);
        let row = table.row(corner_mask(&samples, isolevel));

        let base = cube * VERTS_PER_CELL;
        for tri in 0..5 {
            if row[tri * 3] == SENTINEL {
                break;
            }
            out.push([
                vertex(base + tri * 3, volume, isolevel, table),
                vertex(base + tri * 3 + 1, volume, isolevel, table),
                vertex(base + tri * 3 + 2, volume, isolevel, table),
            ]);
        }
    }
    out
}

fn cube_position(volume: &ScalarVolume, cube: usize) -> (usize, usize, usize) {
    let ix = volume.width() - 1;
    let iy = volume.height() - 1;
    (cube % ix, (cube / ix) % iy, cube / (ix * iy))
}

fn corner_offset(corner: usize) -> Vec3 {
    let [dx, dy, dz] = CORNER_OFFSETS[corner];
    Vec3::new(dx as f32, dy as f32, dz as f32)
}

fn corner_samples(volume: &ScalarVolume, cx: usize, cy: usize, cz: usize) -> [f32; 8] {
    let mut samples = [0.0; 8];
    for (i, [dx, dy, dz]) in CORNER_OFFSETS.iter().enumerate() {
        samples[i] = volume.get(cx + dx, cy + dy, cz + dz) as f32;
    }
    samples
}

/// Bit i set when corner i's sample exceeds the isolevel.
fn corner_mask(samples: &[f32; 8], isolevel: f32) -> u8 {
    let mut mask = 0u8;
    for (i, &s) in samples.iter().enumerate() {
        if s > isolevel {
            mask |= 1 << i;
        }
    }
    mask
}

/// Central-difference gradient of the sample grid, falling back to
/// one-sided differences on the volume boundary.
fn field_gradient(volume: &ScalarVolume, x: usize, y: usize, z: usize) -> Vec3 {
    let axis = |lo: usize, hi: usize, sample_lo: f32, sample_hi: f32| {
        (sample_hi - sample_lo) / (hi - lo).max(1) as f32
    };

    let (xl, xh) = (x.saturating_sub(1), (x + 1).min(volume.width() - 1));
    let (yl, yh) = (y.saturating_sub(1), (y + 1).min(volume.height() - 1));
    let (zl, zh) = (z.saturating_sub(1), (z + 1).min(volume.depth() - 1));

    Vec3::new(
        axis(xl, xh, volume.get(xl, y, z) as f32, volume.get(xh, y, z) as f32),
        axis(yl, yh, volume.get(x, yl, z) as f32, volume.get(x, yh, z) as f32),
        axis(zl, zh, volume.get(x, y, zl) as f32, volume.get(x, y, zh) as f32),
    )
}
