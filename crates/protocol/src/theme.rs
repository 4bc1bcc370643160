use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Semantic color tokens for the pad's strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    /// Non-negative magnitude (net allocation).
    Allocation,
    /// Negative magnitude (net release).
    Release,
    /// Zero line through the middle of the pad.
    Midline,
}

impl ThemeToken {
    /// The fixed stroke color of the pad: red, blue, light gray.
    pub fn color(self) -> Color {
        match self {
            Self::Allocation => Color::rgb8(0xff, 0x00, 0x00),
            Self::Release => Color::rgb8(0x00, 0x00, 0xff),
            Self::Midline => Color::rgb8(0xc8, 0xc8, 0xc8),
        }
    }
}
