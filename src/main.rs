use std::env;

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use trirender::config::{Settings, DEFAULT_SETTINGS_PATH};
use trirender::prelude::*;

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Everything input can change between frames.
struct State {
    context: RenderContext,
    mode: RenderMode,
    orbiting: bool,
    show_texture: bool,
    show_gradient: bool,
    sketches: Vec<CanvasSketch>,
    rng: SmallRng,
}

impl State {
    fn apply(&mut self, action: InputAction, settings: &Settings, engine: &Engine) {
        let camera = &mut self.context.camera;
        match action {
            InputAction::MoveCamera(direction) => camera.translate(direction * settings.move_step),
            InputAction::RotateCamera(axis, sign) => {
                camera.rotate_camera(axis, sign * settings.rotate_step())
            }
            InputAction::ChangeOrientation(axis, sign) => {
                camera.change_orientation(axis, sign * settings.rotate_step())
            }
            InputAction::Reaim => camera.reaim(),
            InputAction::ToggleOrbit => {
                self.orbiting = !self.orbiting;
                debug!("Orbit {}", if self.orbiting { "on" } else { "off" });
            }
            InputAction::MoveLight(direction) => {
                self.context.light.translate(direction * settings.move_step);
                debug!("Light moved to {:?}", self.context.light.position);
            }
            InputAction::SelectMode(mode) => {
                if mode == RenderMode::Unselected {
                    warn!("No render mode selected; frames will be blank");
                }
                debug!("Render mode: {}", mode);
                self.mode = mode;
            }
            InputAction::ToggleTexture => self.show_texture = !self.show_texture,
            InputAction::Sketch { filled } => {
                let sketch =
                    CanvasSketch::random(&mut self.rng, engine.width(), engine.height(), filled);
                let style = if filled { "filled" } else { "outlined" };
                debug!("Added {} sketch at {:?}", style, sketch.points);
                self.sketches.push(sketch);
            }
            InputAction::ClearSketches => self.sketches.clear(),
            InputAction::ToggleGradient => self.show_gradient = !self.show_gradient,
            InputAction::Export => {
                if let Err(err) = engine.save_frame(&settings.export_path) {
                    warn!("Failed to export frame: {}", err);
                }
            }
        }
    }
}

fn main() -> trirender::Result<()> {
    init_logging();

    let settings_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_SETTINGS_PATH.into());
    let settings = Settings::load_from_path(&settings_path);

    // A malformed scene is fatal: there's nothing to render without it.
    let scene = Scene::from_obj(&settings.model_path, settings.model_scale)?;

    let texture = match &settings.texture_path {
        Some(path) => match TextureMap::from_file(path) {
            Ok(texture) => Some(texture),
            Err(err) => {
                warn!("Failed to load texture {:?}: {}", path, err);
                None
            }
        },
        None => None,
    };

    let mut window = Window::new("trirender", settings.width, settings.height)?;
    let mut engine = Engine::new(settings.width, settings.height);
    let mut state = State {
        context: RenderContext::new(settings.camera(), settings.light()),
        mode: settings.initial_mode.unwrap_or_default(),
        orbiting: false,
        show_texture: false,
        show_gradient: false,
        sketches: Vec::new(),
        rng: SmallRng::from_entropy(),
    };
    info!(
        "Rendering {} triangles at {}x{}, mode {}",
        scene.len(),
        settings.width,
        settings.height,
        state.mode
    );

    'running: loop {
        for event in window.poll_events() {
            match event {
                WindowEvent::Quit => break 'running,
                WindowEvent::Resize(width, height) => {
                    window.resize(width, height)?;
                    engine.resize(width, height);
                    state.context.camera.set_canvas_size(width, height);
                }
                WindowEvent::Action(action) => state.apply(action, &settings, &engine),
            }
        }

        state.context.camera.orbit(state.orbiting);
        engine.render(state.mode, &scene, &state.context);
        if state.show_gradient {
            engine.draw_gradient();
        }
        if state.show_texture {
            match &texture {
                Some(texture) => engine.draw_textured_overlay(texture),
                None => {
                    warn!("No texture loaded; set texture_path to enable the overlay");
                    state.show_texture = false;
                }
            }
        }
        for sketch in &state.sketches {
            engine.draw_sketch(sketch);
        }

        window.present(engine.frame_buffer())?;
    }

    Ok(())
}
