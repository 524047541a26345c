//! Isosurface viewer for coherent gradient noise fields.
//!
//! The pipeline: [`noise`] produces deterministic lattice noise at 1-4
//! dimensions, [`field`] samples it into a dense `u8` volume, [`extract`]
//! turns the volume into triangles purely from per-vertex slot indices and
//! the [`tables`] lookup data, and [`render`] runs the same derivation as a
//! WGSL vertex stage so no vertex or index buffer ever exists. [`camera`]
//! supplies the orbit/dolly/pan view matrices. The low-dimensional noise
//! has nothing to extract; [`plot`] draws it directly as a polyline trace
//! or grayscale raster.

pub mod camera;
pub mod extract;
pub mod field;
pub mod noise;
pub mod plot;
pub mod render;
pub mod tables;
