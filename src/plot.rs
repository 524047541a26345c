//! CPU-rendered images of the 1D and 2D noise.
//!
//! The low-dimensional scenes have no geometry to extract; they draw the
//! noise directly, as a polyline trace (1D) or a grayscale raster (2D),
//! and the renderer shows the result as a screen-filling textured quad.

use crate::field::quantize;
use crate::noise::{noise1, noise2};

/// Grayscale image, one byte per pixel, row-major from the top row.
pub struct PlotImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PlotImage {
    /// Traces `noise1` as a black polyline on white: one sample per pixel
    /// column, value -1 at the top row and +1 at the bottom. Neighboring
    /// samples are joined by filling the vertical span between them, so the
    /// trace never breaks.
    pub fn noise1_polyline(width: u32, height: u32, offset: f64, scale: f64) -> Self {
        let mut plot = Self::blank(width, height, 255);
        let row = |value: f64| {
            let y = (height as f64 * (value + 1.0) / 2.0) as i64;
            y.clamp(0, height as i64 - 1) as u32
        };

        let mut prev = row(noise1(offset));
        for x in 0..width {
            let next = row(noise1(offset + x as f64 * scale));
            for y in prev.min(next)..=prev.max(next) {
                plot.set(x, y, 0);
            }
            prev = next;
        }
        plot
    }

    /// Rasterizes `noise2`, one sample per pixel, remapped to 0..=255.
    pub fn noise2_raster(width: u32, height: u32, offset: [f64; 2], scale: f64) -> Self {
        let mut plot = Self::blank(width, height, 0);
        for y in 0..height {
            for x in 0..width {
                let value = noise2(
                    offset[0] + x as f64 * scale,
                    offset[1] + y as f64 * scale,
                );
                plot.set(x, y, quantize(value));
            }
        }
        plot
    }

    fn blank(width: u32, height: u32, value: u8) -> Self {
        assert!(width > 0 && height > 0, "empty plot {width}x{height}");
        Self {
            width,
            height,
            data: vec![value; (width * height) as usize],
        }
    }

    fn set(&mut self, x: u32, y: u32, value: u8) {
        let idx = (y * self.width + x) as usize;
        self.data[idx] = value;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw pixel buffer, laid out exactly as uploaded to the GPU.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_span(plot: &PlotImage, x: u32) -> Option<(u32, u32)> {
        let dark: Vec<u32> = (0..plot.height())
            .filter(|&y| plot.data()[(y * plot.width() + x) as usize] == 0)
            .collect();
        dark.first().map(|&lo| (lo, *dark.last().unwrap()))
    }

    #[test]
    fn polyline_is_black_on_white_in_every_column() {
        let plot = PlotImage::noise1_polyline(256, 128, 0.37, 0.05678);
        assert!(plot.data().iter().all(|&p| p == 0 || p == 255));
        for x in 0..plot.width() {
            assert!(column_span(&plot, x).is_some(), "column {x} has no trace");
        }
    }

    #[test]
    fn polyline_columns_form_a_connected_trace() {
        let plot = PlotImage::noise1_polyline(256, 128, 0.37, 0.05678);
        let mut prev = column_span(&plot, 0).unwrap();
        for x in 1..plot.width() {
            let span = column_span(&plot, x).unwrap();
            // Each column's span starts at the previous column's sample, so
            // neighboring spans always share at least one row.
            assert!(
                span.0 <= prev.1 && prev.0 <= span.1,
                "trace breaks between columns {} and {x}",
                x - 1
            );
            prev = span;
        }
    }

    #[test]
    fn raster_pixels_are_the_quantized_samples() {
        let offset = [0.37, 0.91];
        let scale = 0.05678;
        let plot = PlotImage::noise2_raster(64, 48, offset, scale);
        for (x, y) in [(0u32, 0u32), (13, 7), (63, 47)] {
            let expected = quantize(noise2(
                offset[0] + x as f64 * scale,
                offset[1] + y as f64 * scale,
            ));
            assert_eq!(plot.data()[(y * 64 + x) as usize], expected);
        }
    }

    #[test]
    fn raster_lattice_origin_maps_to_midgray() {
        // noise2 is zero at the lattice origin, which quantizes to 127.
        let plot = PlotImage::noise2_raster(8, 8, [0.0, 0.0], 0.25);
        assert_eq!(plot.data()[0], 127);
    }
}
