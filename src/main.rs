//! Prism Engine: software 3D rendering pipeline
//!
//! Every triangle is transformed, culled, lit, clipped, projected and
//! rasterized on the CPU; macroquad only provides the window, input
//! and the final framebuffer blit.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod renderer;
mod scene;

use macroquad::prelude::*;

use renderer::math::Vec3;
use renderer::{Framebuffer, RenderConfig, Renderer};
use scene::{Camera, Light, Mesh};

const CONFIG_PATH: &str = "assets/render.ron";
const MODEL_PATH: &str = "assets/models/level.obj";
const TEXTURE_PATH: &str = "assets/textures/level.png";

const CAMERA_TRANSLATE_SPEED: f32 = 2.0;
const CAMERA_ROTATE_SPEED: f32 = 0.002;

fn window_conf() -> Conf {
    let config = RenderConfig::load_or_default(CONFIG_PATH);
    Conf {
        window_title: format!("Prism Engine v{}", VERSION),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

/// The demo mesh: the level model if present, a checkerboard cube
/// otherwise
fn load_scene_mesh() -> Mesh {
    match Mesh::with_texture(MODEL_PATH, TEXTURE_PATH) {
        Ok(mut mesh) => {
            mesh.translate(Vec3::new(0.0, 0.0, 2.0));
            mesh.scale_by(Vec3::splat(0.2));
            mesh
        }
        Err(e) => {
            println!("{} - falling back to built-in cube", e);
            let mut mesh = Mesh::cube();
            mesh.set_texture(renderer::Texture::checkerboard(
                64,
                64,
                renderer::Color::new(200, 200, 200),
                renderer::Color::new(90, 60, 140),
            ));
            mesh.translate(Vec3::new(0.0, 0.0, 3.0));
            mesh
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = RenderConfig::load_or_default(CONFIG_PATH);

    let mut renderer = match Renderer::new(config.clone()) {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("Failed to initialize renderer: {}", e);
            return;
        }
    };
    let mut fb = Framebuffer::new(config.width, config.height);

    let mesh = load_scene_mesh();
    let mut camera = Camera::new();
    let light = Light::new(Vec3::new(0.8, 1.0, -0.5));

    let mut mouse_locked = true;
    set_cursor_grab(true);
    show_mouse(false);
    let mut last_mouse = mouse_position();

    println!("=== Prism Engine v{} ===", VERSION);

    loop {
        let delta = get_frame_time();

        // Escape toggles mouse capture
        if is_key_pressed(KeyCode::Escape) {
            mouse_locked = !mouse_locked;
            set_cursor_grab(mouse_locked);
            show_mouse(!mouse_locked);
        }

        // Camera movement
        let speed = CAMERA_TRANSLATE_SPEED * delta;
        if is_key_down(KeyCode::W) {
            camera.translate_forward_no_y(speed);
        }
        if is_key_down(KeyCode::S) {
            camera.translate_back_no_y(speed);
        }
        if is_key_down(KeyCode::A) {
            camera.translate_left(speed);
        }
        if is_key_down(KeyCode::D) {
            camera.translate_right(speed);
        }
        if is_key_down(KeyCode::Space) {
            camera.translate_up(speed);
        }
        if is_key_down(KeyCode::LeftShift) {
            camera.translate_down(speed);
        }

        // Mouse look
        let mouse = mouse_position();
        if mouse_locked {
            let dx = mouse.0 - last_mouse.0;
            let dy = mouse.1 - last_mouse.1;
            if dx != 0.0 {
                camera.rotate_horizontal(dx * CAMERA_ROTATE_SPEED);
            }
            if dy != 0.0 {
                camera.rotate_vertical(-dy * CAMERA_ROTATE_SPEED);
            }
        }
        last_mouse = mouse;

        // Render the frame
        fb.clear(renderer::Color::BLACK);
        renderer.update(&camera);
        renderer.render(std::slice::from_ref(&mesh), &light, &camera, &mut fb);

        // Present
        clear_background(BLACK);
        let screen_tex = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        screen_tex.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &screen_tex,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 20.0, 20.0, GREEN);

        next_frame().await;
    }
}
