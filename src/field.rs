//! Dense `u8` scalar volume sampled from the noise functions.

use crate::noise::{noise3, noise4};

/// A `width x height x depth` grid of 8-bit samples, row-major with x
/// fastest, then y, then z. Noise output in [-1, 1] is remapped to 0..=255
/// on fill. The buffer length always equals `width * height * depth`.
pub struct ScalarVolume {
    width: usize,
    height: usize,
    depth: usize,
    data: Vec<u8>,
}

impl ScalarVolume {
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        assert!(
            width >= 2 && height >= 2 && depth >= 2,
            "volume needs at least one cube per axis, got {width}x{height}x{depth}"
        );
        Self {
            width,
            height,
            depth,
            data: vec![0; width * height * depth],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The raw sample buffer, laid out exactly as uploaded to the GPU.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of interior cubes: a cube needs its +1 neighbor samples on
    /// every axis, so each axis contributes `dim - 1`.
    pub fn cell_count(&self) -> usize {
        (self.width - 1) * (self.height - 1) * (self.depth - 1)
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.width && y < self.height && z < self.depth);
        z * self.width * self.height + y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        self.data[self.index(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: u8) {
        let idx = self.index(x, y, z);
        self.data[idx] = value;
    }

    /// Fills every sample from `noise3` at `offset + index * scale`.
    pub fn fill_noise3(&mut self, offset: [f64; 3], scale: f64) {
        for z in 0..self.depth {
            for y in 0..self.height {
                for x in 0..self.width {
                    let value = noise3(
                        offset[0] + x as f64 * scale,
                        offset[1] + y as f64 * scale,
                        offset[2] + z as f64 * scale,
                    );
                    let idx = self.index(x, y, z);
                    self.data[idx] = quantize(value);
                }
            }
        }
    }

    /// Fills every sample from a 3D slice of `noise4`, with the fourth
    /// coordinate at `offset[3] + time * scale`. Called once per animation
    /// frame with the elapsed time.
    pub fn fill_noise4(&mut self, offset: [f64; 4], scale: f64, time: f64) {
        let w = offset[3] + time * scale;
        for z in 0..self.depth {
            for y in 0..self.height {
                for x in 0..self.width {
                    let value = noise4(
                        offset[0] + x as f64 * scale,
                        offset[1] + y as f64 * scale,
                        offset[2] + z as f64 * scale,
                        w,
                    );
                    let idx = self.index(x, y, z);
                    self.data[idx] = quantize(value);
                }
            }
        }
    }
}

/// Maps a noise value in [-1, 1] to the 8-bit sample range.
#[inline]
pub(crate) fn quantize(value: f64) -> u8 {
    (255.0 * (value + 1.0) * 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_length_matches_dimensions() {
        let volume = ScalarVolume::new(7, 5, 3);
        assert_eq!(volume.data().len(), 7 * 5 * 3);
        assert_eq!(volume.cell_count(), 6 * 4 * 2);
    }

    #[test]
    fn layout_is_row_major_x_fastest() {
        let mut volume = ScalarVolume::new(4, 3, 2);
        volume.set(1, 2, 1, 200);
        assert_eq!(volume.data()[1 * 4 * 3 + 2 * 4 + 1], 200);
        assert_eq!(volume.get(1, 2, 1), 200);
        assert_eq!(volume.index(3, 0, 0), 3);
        assert_eq!(volume.index(0, 1, 0), 4);
        assert_eq!(volume.index(0, 0, 1), 12);
    }

    #[test]
    fn quantize_covers_full_byte_range() {
        assert_eq!(quantize(-1.0), 0);
        assert_eq!(quantize(0.0), 127);
        assert_eq!(quantize(1.0), 255);
    }

    #[test]
    fn refill_is_deterministic() {
        let offset = [0.31, 0.15, 0.92];
        let mut a = ScalarVolume::new(8, 8, 8);
        let mut b = ScalarVolume::new(8, 8, 8);
        a.fill_noise3(offset, 0.173);
        b.fill_noise3(offset, 0.173);
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn time_slice_animates_the_field() {
        let offset = [0.31, 0.15, 0.92, 0.48];
        let mut a = ScalarVolume::new(8, 8, 8);
        let mut b = ScalarVolume::new(8, 8, 8);
        a.fill_noise4(offset, 0.173, 0.0);
        b.fill_noise4(offset, 0.173, 5.0);
        assert_ne!(a.data(), b.data());
    }
}
