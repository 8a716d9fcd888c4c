//! SDL2 window, frame presentation and input mapping.
//!
//! Input is reduced to [`InputAction`]s; the binary applies them to the
//! camera, light and render mode between frames.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::engine::RenderMode;
use crate::error::{Error, Result};
use crate::math::mat3::Axis;
use crate::math::vec3::Vec3;

/// A discrete, named operation triggered by one input event.
///
/// Directions and signs are unit-sized; the caller scales them by its
/// configured step sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    MoveCamera(Vec3),
    /// Rotate the camera position about a world axis by `sign` steps.
    RotateCamera(Axis, f32),
    /// Turn the orientation basis in place by `sign` steps.
    ChangeOrientation(Axis, f32),
    Reaim,
    ToggleOrbit,
    MoveLight(Vec3),
    SelectMode(RenderMode),
    ToggleTexture,
    /// Add a random canvas triangle, outlined or filled.
    Sketch { filled: bool },
    ClearSketches,
    ToggleGradient,
    Export,
}

impl InputAction {
    pub fn from_keycode(keycode: Keycode) -> Option<Self> {
        use InputAction::*;

        let action = match keycode {
            Keycode::Left => MoveCamera(-Vec3::RIGHT),
            Keycode::Right => MoveCamera(Vec3::RIGHT),
            Keycode::Up => MoveCamera(Vec3::UP),
            Keycode::Down => MoveCamera(-Vec3::UP),
            Keycode::W => MoveCamera(-Vec3::FORWARD),
            Keycode::S => MoveCamera(Vec3::FORWARD),

            Keycode::A => RotateCamera(Axis::Y, -1.0),
            Keycode::D => RotateCamera(Axis::Y, 1.0),
            Keycode::R => RotateCamera(Axis::X, -1.0),
            Keycode::F => RotateCamera(Axis::X, 1.0),

            Keycode::J => ChangeOrientation(Axis::Y, 1.0),
            Keycode::L => ChangeOrientation(Axis::Y, -1.0),
            Keycode::I => ChangeOrientation(Axis::X, 1.0),
            Keycode::K => ChangeOrientation(Axis::X, -1.0),

            Keycode::Space => Reaim,
            Keycode::O => ToggleOrbit,

            Keycode::Z => MoveLight(-Vec3::RIGHT),
            Keycode::X => MoveLight(Vec3::RIGHT),
            Keycode::C => MoveLight(-Vec3::UP),
            Keycode::V => MoveLight(Vec3::UP),
            Keycode::B => MoveLight(-Vec3::FORWARD),
            Keycode::N => MoveLight(Vec3::FORWARD),

            Keycode::Num0 => SelectMode(RenderMode::Unselected),
            Keycode::Num1 => SelectMode(RenderMode::Wireframe),
            Keycode::Num2 => SelectMode(RenderMode::Rasterized),
            Keycode::Num3 => SelectMode(RenderMode::RayTraced),

            Keycode::T => ToggleTexture,
            Keycode::U => Sketch { filled: false },
            Keycode::G => Sketch { filled: true },
            Keycode::Backspace => ClearSketches,
            Keycode::H => ToggleGradient,
            Keycode::P => Export,
            _ => return None,
        };
        Some(action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    Quit,
    Resize(u32, u32),
    Action(InputAction),
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    // `texture` borrows from `texture_creator`; it must be declared first so
    // it is dropped first.
    texture: sdl2::render::Texture<'static>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    event_pump: sdl2::EventPump,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(Error::Window)?;
        let video_subsystem = sdl_context.video().map_err(Error::Window)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| Error::Window(e.to_string()))?;

        let canvas = window
            .into_canvas()
            .build()
            .map_err(|e| Error::Window(e.to_string()))?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump().map_err(Error::Window)?;
        let texture = streaming_texture(&texture_creator, width, height)?;

        Ok(Self {
            canvas,
            texture,
            texture_creator,
            event_pump,
            width,
            height,
        })
    }

    /// Drains pending SDL events. Escape and window close map to
    /// [`WindowEvent::Quit`]; a mouse click exports the frame.
    pub fn poll_events(&mut self) -> Vec<WindowEvent> {
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => events.push(WindowEvent::Quit),
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => events.push(WindowEvent::Resize(w.max(1) as u32, h.max(1) as u32)),
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(action) = InputAction::from_keycode(keycode) {
                        events.push(WindowEvent::Action(action));
                    }
                }
                Event::MouseButtonDown { .. } => {
                    events.push(WindowEvent::Action(InputAction::Export))
                }
                _ => {}
            }
        }
        events
    }

    /// Uploads an ARGB8888 frame of the window's size and shows it.
    pub fn present(&mut self, buffer: &[u8]) -> Result<()> {
        self.texture
            .update(None, buffer, (self.width * 4) as usize)
            .map_err(|e| Error::Window(e.to_string()))?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))
            .map_err(Error::Window)?;
        self.canvas.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.texture = streaming_texture(&self.texture_creator, width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

fn streaming_texture(
    creator: &sdl2::render::TextureCreator<sdl2::video::WindowContext>,
    width: u32,
    height: u32,
) -> Result<sdl2::render::Texture<'static>> {
    // SAFETY: the creator is boxed inside `Window`, so its address is stable,
    // and `Window` drops the texture before the creator.
    let creator: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
        unsafe { &*(creator as *const _) };
    creator
        .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
        .map_err(|e| Error::Window(e.to_string()))
}
