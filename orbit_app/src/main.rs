//! Demo scene: two meshes orbiting above a tinted ground plane, lit by a
//! single shadow-casting light.

use std::time::Instant;

use cinder_engine::prelude::*;
use cinder_engine::foundation::math::{self, Vec3, Vec4};

const WINDOW_WIDTH: u32 = 1000;
const WINDOW_HEIGHT: u32 = 750;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("fatal: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = RendererConfig::new("orbit demo");
    let mut window = Window::new(WINDOW_WIDTH, WINDOW_HEIGHT, "orbit demo")?;
    let mut renderer = Renderer::new(&mut window, &config)?;

    let sphere = renderer.register_mesh(&Mesh::uv_sphere(0.5, 24, 16))?;
    let cube = renderer.register_mesh(&Mesh::cube())?;
    let ground = renderer.register_mesh(&Mesh::quad())?;

    renderer.set_camera(Vec3::new(0.0, 1.5, 3.0), Vec3::new(0.0, 0.0, -2.0));
    renderer.set_scene_lighting(
        Vec3::new(4.0, 8.0, 2.0),
        Vec3::zeros(),
        Vec4::new(0.8, 0.8, 0.8, 1.0),
        Vec4::new(0.05, 0.05, 0.05, 1.0),
    );

    let ground_tint = Vec4::new(0.8, 0.1, 0.05, 1.0);
    let ground_model =
        math::translation(Vec3::new(0.0, -0.5, 0.0)) * math::scaling(30.0);

    let start = Instant::now();
    let up = Vec3::new(0.0, 1.0, 0.0);
    while !window.should_close() {
        let t = start.elapsed().as_secs_f32();

        let sphere_model = math::translation(Vec3::new(t.cos(), 0.2, -4.0 + t.sin()))
            * math::rotation(up, t);
        let cube_model = math::translation(Vec3::new(0.0, t.sin().abs(), -4.0 + t.cos()))
            * math::rotation(up, t);

        renderer.submit_draw_call(sphere, sphere_model)?;
        renderer.submit_draw_call(cube, cube_model)?;
        renderer.submit_draw_call_tinted(ground, ground_model, ground_tint)?;
        renderer.render_frame()?;

        for event in window.poll_events() {
            if let glfw::WindowEvent::Key(glfw::Key::Escape, _, glfw::Action::Press, _) = event {
                window.set_should_close(true);
            }
        }
    }

    renderer.wait_idle()?;
    Ok(())
}
