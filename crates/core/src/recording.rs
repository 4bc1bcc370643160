//! In-memory surface that keeps every command it is given.
//!
//! Backs the WASM bridge (where the page replays the list onto a canvas) and
//! the tests.

use allocpad_protocol::{Rect, RenderCommand};

use crate::surface::{ClientBounds, Surface};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    pixel_width: f64,
    pixel_height: f64,
    client_left: f64,
    client_top: f64,
    container_width: f64,
    stretched: bool,
    log: Vec<RenderCommand>,
}

impl RecordingSurface {
    /// A surface laid out `container_width` pixels wide inside its container,
    /// with a backing store of `pixel_width` × `pixel_height`.
    pub fn new(pixel_width: f64, pixel_height: f64, container_width: f64) -> Self {
        Self {
            pixel_width,
            pixel_height,
            client_left: 0.0,
            client_top: 0.0,
            container_width,
            stretched: false,
            log: Vec::new(),
        }
    }

    pub fn with_client_origin(mut self, left: f64, top: f64) -> Self {
        self.client_left = left;
        self.client_top = top;
        self
    }

    pub fn set_client_bounds(&mut self, left: f64, top: f64, container_width: f64) {
        self.client_left = left;
        self.client_top = top;
        self.container_width = container_width;
    }

    pub fn is_stretched(&self) -> bool {
        self.stretched
    }

    /// Every command drawn so far, oldest first.
    pub fn log(&self) -> &[RenderCommand] {
        &self.log
    }

    /// Commands still visible: everything after the last full clear.
    pub fn visible(&self) -> &[RenderCommand] {
        let from = self
            .log
            .iter()
            .rposition(|cmd| self.clears_everything(cmd))
            .map_or(0, |i| i + 1);
        &self.log[from..]
    }

    pub fn take_log(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.log)
    }

    fn clears_everything(&self, cmd: &RenderCommand) -> bool {
        match cmd {
            RenderCommand::Clear { rect } => {
                rect.x <= 0.0
                    && rect.y <= 0.0
                    && rect.w >= self.pixel_width
                    && rect.h >= self.pixel_height
            }
            _ => false,
        }
    }

    /// The full-surface rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.pixel_width, self.pixel_height)
    }
}

impl Surface for RecordingSurface {
    fn pixel_width(&self) -> f64 {
        self.pixel_width
    }

    fn set_pixel_width(&mut self, width: f64) {
        self.pixel_width = width;
    }

    fn pixel_height(&self) -> f64 {
        self.pixel_height
    }

    fn client_bounds(&self) -> ClientBounds {
        let width = if self.stretched {
            self.container_width * 2.0
        } else {
            self.container_width
        };
        ClientBounds {
            left: self.client_left,
            top: self.client_top,
            width,
        }
    }

    fn set_stretched(&mut self, stretched: bool) {
        self.stretched = stretched;
    }

    fn draw(&mut self, commands: &[RenderCommand]) {
        self.log.extend_from_slice(commands);
    }
}
