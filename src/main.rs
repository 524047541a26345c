use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use glam::{Vec2, Vec3};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, KeyCode, NamedKey, PhysicalKey};
use winit::window::WindowBuilder;

use isofield::camera::{DragMode, OrbitalCamera};
use isofield::field::ScalarVolume;
use isofield::plot::PlotImage;
use isofield::render::{ImageRenderer, Renderer};
use isofield::tables::{TriTable, TRI_TABLE_BYTES};

/// Isolevel at the midpoint of the u8 sample range, where the noise field
/// crosses zero.
const ISOLEVEL: f32 = 128.0;

/// Sampling step for the static 1D, 2D and 3D noise scenes.
const FIELD_SCALE: f64 = 0.05678;

/// How fast the animated scene's fourth noise coordinate advances, in
/// lattice steps per `scale` second.
const ANIMATION_RATE: f64 = 10.0;

enum Scene {
    /// `noise1` as a polyline trace.
    Plot1d,
    /// `noise2` as a grayscale raster.
    Plot2d,
    /// Isosurface of a volumetric field.
    Volume(VolumeScene),
}

struct VolumeScene {
    dim: usize,
    scale: f64,
    eye: Vec3,
    target: Vec3,
    animated: bool,
}

fn scene_from_arg(arg: &str) -> Result<Scene> {
    match arg {
        "1d" => Ok(Scene::Plot1d),
        "2d" => Ok(Scene::Plot2d),
        // Static field at high resolution, viewed from outside the cube.
        "3d" => Ok(Scene::Volume(VolumeScene {
            dim: 128,
            scale: FIELD_SCALE,
            eye: Vec3::splat(216.0),
            target: Vec3::splat(64.0),
            animated: false,
        })),
        // Smaller volume refilled every frame from a moving 4D time slice.
        "4d" => Ok(Scene::Volume(VolumeScene {
            dim: 32,
            scale: 0.1234,
            eye: Vec3::splat(64.0),
            target: Vec3::splat(16.0),
            animated: true,
        })),
        other => bail!("unknown scene {other:?}: expected \"1d\", \"2d\", \"3d\" or \"4d\""),
    }
}

fn button_bit(button: MouseButton) -> u32 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Right => 2,
        MouseButton::Middle => 4,
        _ => 0,
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let arg = std::env::args().nth(1).unwrap_or_else(|| "4d".to_string());
    match scene_from_arg(&arg)? {
        Scene::Plot1d => run_plot(&arg, PlotImage::noise1_polyline(1024, 256, 0.0, FIELD_SCALE)),
        Scene::Plot2d => run_plot(&arg, PlotImage::noise2_raster(512, 512, [0.0; 2], FIELD_SCALE)),
        Scene::Volume(scene) => run_volume(&arg, scene),
    }
}

fn run_plot(name: &str, image: PlotImage) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(format!("isofield {name}"))
            .with_inner_size(PhysicalSize::new(image.width(), image.height()))
            .build(&event_loop)?,
    );
    let mut renderer = ImageRenderer::new(window.clone(), &image)?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => elwt.exit(),
            WindowEvent::Resized(size) => renderer.resize(size.width, size.height),
            WindowEvent::RedrawRequested => match renderer.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = window.inner_size();
                    renderer.resize(size.width, size.height);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("out of graphics memory");
                    elwt.exit();
                }
                Err(err) => log::warn!("frame skipped: {err}"),
            },
            _ => {}
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;

    Ok(())
}

fn run_volume(name: &str, scene: VolumeScene) -> Result<()> {
    let table = TriTable::from_bytes(TRI_TABLE_BYTES).context("triangulation table asset")?;

    let offset = [0.0; 4];
    let mut volume = ScalarVolume::new(scene.dim, scene.dim, scene.dim);
    if scene.animated {
        volume.fill_noise4(offset, scene.scale, 0.0);
    } else {
        volume.fill_noise3([offset[0], offset[1], offset[2]], scene.scale);
    }

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(format!("isofield {name}"))
            .with_inner_size(PhysicalSize::new(1024, 768))
            .build(&event_loop)?,
    );

    let mut renderer = Renderer::new(window.clone(), &volume, &table, ISOLEVEL)?;
    let mut camera = OrbitalCamera::new(scene.eye, scene.target, renderer.aspect());

    let start = Instant::now();
    let mut buttons = 0u32;
    let mut space = false;
    let mut shift = false;
    let mut ctrl = false;
    let mut drag: Option<DragMode> = None;
    let mut cursor = Vec2::ZERO;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::ModifiersChanged(modifiers) => {
                shift = modifiers.state().shift_key();
                ctrl = modifiers.state().control_key();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
                {
                    elwt.exit();
                }
                if event.physical_key == PhysicalKey::Code(KeyCode::Space) && !event.repeat {
                    match event.state {
                        ElementState::Pressed => {
                            space = true;
                            if drag.is_none() {
                                drag = DragMode::from_input(buttons, space, shift, ctrl);
                            }
                        }
                        ElementState::Released => {
                            space = false;
                            if buttons == 0 {
                                drag = None;
                            }
                        }
                    }
                }
            }
            WindowEvent::Resized(size) => {
                renderer.resize(size.width, size.height);
                camera.set_aspect(renderer.aspect());
            }
            WindowEvent::MouseInput { state, button, .. } => {
                match state {
                    ElementState::Pressed => {
                        buttons |= button_bit(button);
                        // The mode chosen at gesture start holds until every
                        // button and Space are released.
                        if drag.is_none() {
                            drag = DragMode::from_input(buttons, space, shift, ctrl);
                        }
                    }
                    ElementState::Released => {
                        buttons &= !button_bit(button);
                        if buttons == 0 && !space {
                            drag = None;
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let point = Vec2::new(position.x as f32, position.y as f32);
                let delta = point - cursor;
                cursor = point;
                if let Some(mode) = drag {
                    let size = window.inner_size();
                    let viewport = Vec2::new(size.width.max(1) as f32, size.height.max(1) as f32);
                    camera.drag(mode, point, delta, viewport);
                }
            }
            WindowEvent::RedrawRequested => {
                if scene.animated {
                    // Fill completes before the upload below; the texture
                    // never observes a partially written buffer.
                    let elapsed = start.elapsed().as_secs_f64();
                    volume.fill_noise4(offset, scene.scale, elapsed * ANIMATION_RATE);
                    renderer.upload_volume(&volume);
                }
                camera.update_matrices();
                match renderer.render(camera.view_projection()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = window.inner_size();
                        renderer.resize(size.width, size.height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of graphics memory");
                        elwt.exit();
                    }
                    Err(err) => log::warn!("frame skipped: {err}"),
                }
            }
            _ => {}
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;

    Ok(())
}
