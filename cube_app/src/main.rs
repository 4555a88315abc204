//! Spinning-cube demo application
//!
//! Drives the software rasterizer against a minifb window: builds the
//! scene from an optional TOML config, maps the keyboard onto the
//! renderer's mode flags and camera, paces the loop, and blits whichever
//! buffer the renderer currently presents.
//!
//! Keys: `1`-`4` wire/fill modes, `7`/`8` textured modes, `5`/`6` flat
//! shading on/off, `c`/`d` backface culling on/off, `z` color/z-buffer
//! view, `g` grid, `p` pause, `f` FPS log, F9 screenshot, `w`/`s` to move
//! and the arrow keys to look around, Esc to quit.

use std::time::{SystemTime, UNIX_EPOCH};

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use raster_engine::config::SceneObjectConfig;
use raster_engine::prelude::*;
use raster_engine::render::{CullMethod, RenderBufferMethod, RenderMethod, ShadingMethod};

/// Scratch arena for OBJ imports, sized for hobby-scale models
const IMPORT_ARENA_BYTES: usize = 4 * 1024 * 1024;

const CAMERA_MOVE_SPEED: f32 = 5.0;
const CAMERA_TURN_SPEED: f32 = 1.0;
const MESH_SPIN_SPEED: f32 = 0.6;

fn build_mesh(entry: &SceneObjectConfig, arena: &mut Arena) -> Option<Mesh> {
    let texture = match &entry.texture {
        Some(path) => match ImageData::from_file(path) {
            Ok(image) => Texture::from_image(&image),
            Err(e) => {
                log::error!("Skipping texture {path:?}: {e}");
                Texture::checkerboard(64, 8, Color::WHITE, Color::GRAY)
            }
        },
        None => Texture::checkerboard(64, 8, Color::WHITE, Color::GRAY),
    };

    let mut mesh = match &entry.obj {
        Some(path) => {
            let data = match ObjLoader::load_obj(path, arena) {
                Ok(data) => data,
                Err(e) => {
                    // A broken asset skips this mesh; the rest of the
                    // scene still renders.
                    log::error!("Skipping mesh {path:?}: {e}");
                    return None;
                }
            };
            match Mesh::new(data.vertices, data.faces, texture) {
                Ok(mesh) => mesh,
                Err(e) => {
                    log::error!("Skipping mesh {path:?}: {e}");
                    return None;
                }
            }
        }
        None => Mesh::cube(texture),
    };

    mesh.translation = Vec3::from(entry.translation);
    mesh.scale = Vec3::from(entry.scale);
    mesh.rotation = Vec3::from(entry.rotation);
    Some(mesh)
}

fn save_screenshot(pixels: &[u32], width: usize, height: usize) {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let file_name = format!("screenshot-{timestamp}.png");

    let mut bytes = Vec::with_capacity(pixels.len() * 4);
    for &pixel in pixels {
        let color = Color(pixel);
        bytes.extend_from_slice(&[color.r(), color.g(), color.b(), color.a()]);
    }

    match image::save_buffer(
        &file_name,
        &bytes,
        width as u32,
        height as u32,
        image::ExtendedColorType::Rgba8,
    ) {
        Ok(()) => log::info!("Saved screenshot {file_name}"),
        Err(e) => log::error!("Failed to save screenshot: {e}"),
    }
}

fn handle_toggles(window: &Window, renderer: &mut Renderer, paused: &mut bool, print_fps: &mut bool, grid: &mut bool) -> bool {
    let mut screenshot = false;

    for key in window.get_keys_pressed(KeyRepeat::No) {
        match key {
            Key::Key1 => {
                renderer.set_render_method(RenderMethod::WireVertex);
                log::info!("Render method: WireVertex");
            }
            Key::Key2 => {
                renderer.set_render_method(RenderMethod::Wire);
                log::info!("Render method: Wire");
            }
            Key::Key3 => {
                renderer.set_render_method(RenderMethod::FillTriangle);
                log::info!("Render method: FillTriangle");
            }
            Key::Key4 => {
                renderer.set_render_method(RenderMethod::FillTriangleWire);
                log::info!("Render method: FillTriangleWire");
            }
            Key::Key5 => {
                renderer.set_shading_method(ShadingMethod::Flat);
                log::info!("Shading: Flat");
            }
            Key::Key6 => {
                renderer.set_shading_method(ShadingMethod::None);
                log::info!("Shading: None");
            }
            Key::Key7 => {
                renderer.set_render_method(RenderMethod::Textured);
                log::info!("Render method: Textured");
            }
            Key::Key8 => {
                renderer.set_render_method(RenderMethod::WireTextured);
                log::info!("Render method: WireTextured");
            }
            Key::C => {
                renderer.set_cull_method(CullMethod::Backface);
                log::info!("Culling: Backface");
            }
            Key::D => {
                renderer.set_cull_method(CullMethod::None);
                log::info!("Culling: None");
            }
            Key::Z => {
                let next = match renderer.render_buffer_method() {
                    RenderBufferMethod::ColorBuffer => RenderBufferMethod::ZBuffer,
                    RenderBufferMethod::ZBuffer => RenderBufferMethod::ColorBuffer,
                };
                renderer.set_render_buffer_method(next);
                log::info!("Presenting: {next:?}");
            }
            Key::G => {
                *grid = !*grid;
                renderer.set_grid_enabled(*grid);
                log::info!("Grid: {grid}");
            }
            Key::P => {
                *paused = !*paused;
                log::info!("Paused: {paused}");
            }
            Key::F => {
                *print_fps = !*print_fps;
                log::info!("FPS reporting: {print_fps}");
            }
            Key::F9 => screenshot = true,
            _ => {}
        }
    }

    screenshot
}

fn handle_camera(window: &Window, renderer: &mut Renderer, delta: f32) {
    let camera = renderer.camera_mut();

    if window.is_key_down(Key::W) {
        camera.advance(CAMERA_MOVE_SPEED * delta);
    }
    if window.is_key_down(Key::S) {
        camera.advance(-CAMERA_MOVE_SPEED * delta);
    }
    if window.is_key_down(Key::Right) {
        camera.rotate_yaw(CAMERA_TURN_SPEED * delta);
    }
    if window.is_key_down(Key::Left) {
        camera.rotate_yaw(-CAMERA_TURN_SPEED * delta);
    }
    if window.is_key_down(Key::Up) {
        camera.rotate_pitch(-CAMERA_TURN_SPEED * delta);
    }
    if window.is_key_down(Key::Down) {
        camera.rotate_pitch(CAMERA_TURN_SPEED * delta);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => ApplicationConfig::load_from_file(&path)?,
        None => {
            log::info!("No config given, using defaults (spinning cube)");
            ApplicationConfig::default()
        }
    };

    let mut arena = Arena::with_capacity(IMPORT_ARENA_BYTES);
    let entries = if config.meshes.is_empty() {
        vec![SceneObjectConfig::default()]
    } else {
        config.meshes.clone()
    };
    let mut meshes: Vec<Mesh> = entries
        .iter()
        .filter_map(|entry| build_mesh(entry, &mut arena))
        .collect();
    arena.reset();

    if meshes.is_empty() {
        return Err("no mesh in the scene could be loaded".into());
    }

    let mut renderer = Renderer::new(&config);

    let width = config.window.width;
    let height = config.window.height;
    let mut window = Window::new(&config.window.title, width, height, WindowOptions::default())?;

    let mut pacer = FramePacer::new(config.window.target_fps);
    let mut fps = FpsCounter::new();
    let mut paused = false;
    let mut print_fps = false;
    let mut grid = false;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let delta = pacer.begin_frame();

        let screenshot = handle_toggles(&window, &mut renderer, &mut paused, &mut print_fps, &mut grid);
        handle_camera(&window, &mut renderer, delta);

        if !paused {
            for mesh in &mut meshes {
                mesh.rotation.x += MESH_SPIN_SPEED * delta;
                mesh.rotation.y += MESH_SPIN_SPEED * delta;
                mesh.rotation.z += MESH_SPIN_SPEED * delta;
            }
        }

        renderer.render_scene(&meshes);

        if screenshot {
            save_screenshot(renderer.presentable_pixels(), width, height);
        }

        window.update_with_buffer(renderer.presentable_pixels(), width, height)?;

        if let Some((frames, avg_ms)) = fps.tick() {
            if print_fps {
                log::info!("fps: {frames:3}, avg frame time: {avg_ms:3} ms");
            }
        }
    }

    log::info!("Shutting down...");
    Ok(())
}
