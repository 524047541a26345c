//! Fixed marching-cubes lookup data.
//!
//! The triangulation table ships as a binary asset: 256 rows (one per
//! corner mask) of 16 bytes, each byte an edge index 0-11 or the sentinel
//! 255, up to five triangles per row. It is validated once at startup and
//! never mutated afterwards.

use std::path::Path;

use anyhow::{ensure, Context, Result};

/// Terminates a triangulation row; every vertex slot at or past it
/// degenerates to a zero-area triangle.
pub const SENTINEL: u8 = 255;

/// The built-in copy of the table asset.
pub const TRI_TABLE_BYTES: &[u8] = include_bytes!("../assets/tri-table-256x16.bin");

const ROWS: usize = 256;
const COLS: usize = 16;

/// Offsets of the 8 cube corners from the cube origin, in mask bit order:
///
/// ```text
///     7----6          Y
///    /|   /|          |
///   3----2 |          *-- X
///   | 4--|-5         /
///   |/   |/         Z
///   0----1
/// ```
pub const CORNER_OFFSETS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// The two corners joined by each of the 12 cube edges. Edges 0-3 ring the
/// near face, 4-7 the far face, 8-11 connect the two.
pub const EDGE_CORNERS: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Validated triangulation table, indexed by corner mask and vertex slot.
pub struct TriTable {
    bytes: Box<[u8; ROWS * COLS]>,
}

impl TriTable {
    /// Parses and validates a raw table blob. Any malformed input is fatal:
    /// the extractor cannot produce a single valid triangle without the
    /// table, so there is nothing to degrade to.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure!(
            bytes.len() == ROWS * COLS,
            "triangulation table must be {} bytes (256 rows x 16 columns), got {}",
            ROWS * COLS,
            bytes.len()
        );

        for (i, &b) in bytes.iter().enumerate() {
            ensure!(
                b < 12 || b == SENTINEL,
                "triangulation table row {} column {}: {} is not an edge index or sentinel",
                i / COLS,
                i % COLS,
                b
            );
        }

        for mask in 0..ROWS {
            let row = &bytes[mask * COLS..(mask + 1) * COLS];
            let edges = row.iter().position(|&b| b == SENTINEL).unwrap_or(COLS);
            ensure!(
                row[edges..].iter().all(|&b| b == SENTINEL),
                "triangulation table row {mask}: edge index after the terminator"
            );
            ensure!(
                edges % 3 == 0,
                "triangulation table row {mask}: {edges} edge indices do not form whole triangles"
            );
        }

        let mut owned = Box::new([SENTINEL; ROWS * COLS]);
        owned.copy_from_slice(bytes);
        Ok(Self { bytes: owned })
    }

    /// Reads and validates a table asset from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading triangulation table {}", path.display()))?;
        Self::from_bytes(&bytes)
            .with_context(|| format!("malformed triangulation table {}", path.display()))
    }

    /// The edge index for a corner mask and triangle-corner slot, or
    /// [`SENTINEL`] when that slot emits no geometry.
    #[inline]
    pub fn edge(&self, mask: u8, slot: usize) -> u8 {
        assert!(slot < COLS, "vertex slot {slot} outside 0..{COLS}");
        self.bytes[mask as usize * COLS + slot]
    }

    /// One 16-column row of the table.
    #[inline]
    pub fn row(&self, mask: u8) -> &[u8] {
        &self.bytes[mask as usize * COLS..(mask as usize + 1) * COLS]
    }

    /// The raw blob, for GPU upload as a 16x256 R8Uint texture.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_validates() {
        let table = TriTable::from_bytes(TRI_TABLE_BYTES).unwrap();
        assert_eq!(table.as_bytes().len(), 4096);
    }

    #[test]
    fn fully_inside_and_outside_masks_emit_nothing() {
        let table = TriTable::from_bytes(TRI_TABLE_BYTES).unwrap();
        assert!(table.row(0).iter().all(|&b| b == SENTINEL));
        assert!(table.row(255).iter().all(|&b| b == SENTINEL));
    }

    #[test]
    fn single_corner_masks_emit_one_triangle() {
        let table = TriTable::from_bytes(TRI_TABLE_BYTES).unwrap();
        for bit in 0..8 {
            let row = table.row(1 << bit);
            let edges = row.iter().filter(|&&b| b != SENTINEL).count();
            assert_eq!(edges, 3, "mask {} should cut exactly one triangle", 1 << bit);
        }
    }

    #[test]
    fn rejects_truncated_blob() {
        assert!(TriTable::from_bytes(&TRI_TABLE_BYTES[..4095]).is_err());
    }

    #[test]
    fn rejects_out_of_range_edge_index() {
        let mut bytes = TRI_TABLE_BYTES.to_vec();
        bytes[16] = 12;
        assert!(TriTable::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_partial_triangle() {
        let mut bytes = TRI_TABLE_BYTES.to_vec();
        // Row 1 is a single triangle; chopping one edge index leaves two.
        bytes[16 + 2] = SENTINEL;
        assert!(TriTable::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_edge_after_terminator() {
        let mut bytes = TRI_TABLE_BYTES.to_vec();
        bytes[16 + 5] = 3;
        assert!(TriTable::from_bytes(&bytes).is_err());
    }

    #[test]
    fn edge_corner_pairs_cover_all_corners() {
        let mut seen = [false; 8];
        for [a, b] in EDGE_CORNERS {
            assert_ne!(a, b);
            seen[a] = true;
            seen[b] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
