//! Host capabilities the pad draws through.

use allocpad_protocol::RenderCommand;

/// Laid-out position and width of the surface in the host's client
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
}

/// A drawing surface with a backing store whose resolution may differ from
/// its laid-out size.
pub trait Surface {
    /// Backing-store width in device pixels.
    fn pixel_width(&self) -> f64;

    fn set_pixel_width(&mut self, width: f64);

    /// Backing-store height in device pixels.
    fn pixel_height(&self) -> f64;

    fn client_bounds(&self) -> ClientBounds;

    /// Widen the laid-out surface past its container (used when the trace
    /// had to be reduced).
    fn set_stretched(&mut self, stretched: bool);

    /// Execute a command list in order.
    fn draw(&mut self, commands: &[RenderCommand]);
}

/// Receives the text of one of the pad's extrema labels.
pub trait LabelSink {
    fn set_text(&mut self, text: &str);
}

impl LabelSink for String {
    fn set_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// The host elements a pad is bound to.
#[derive(Debug, Clone, Default)]
pub struct PadElements<S, L> {
    pub pad: S,
    pub positive_max: L,
    pub negative_max: L,
}

impl<S, L> PadElements<S, L> {
    pub fn new(pad: S, positive_max: L, negative_max: L) -> Self {
        Self {
            pad,
            positive_max,
            negative_max,
        }
    }
}
