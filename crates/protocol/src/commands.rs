use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless drawing instruction for the pad surface.
///
/// The view emits a `Vec<RenderCommand>` per render pass. Hosts replay the
/// list in order; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Erase a rectangular region of the surface.
    Clear { rect: Rect },

    /// Stroke a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },
}
