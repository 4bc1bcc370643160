//! Scale factors between data space and the pad surface.

use crate::pool::RenderPool;

/// Horizontal spacing of consecutive plotted units, in backing pixels.
pub const BASE_WIDTH: f64 = 10.0;
/// Left margin before the first plotted unit, in backing pixels.
pub const BASE_OFFSET: f64 = 10.0;
/// Extra horizontal spacing per millisecond gap: `round(Δt) * 4 / 1000`.
const DURATION_FACTOR: f64 = 4.0;
const DURATION_SCALE: f64 = 1000.0;

/// Scale factors derived on every render pass.
///
/// Both ratios are always ≥ 1; degenerate layouts and empty or all-zero
/// pools fall back to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub width_ratio: f64,
    pub height_ratio: f64,
    pub pad_height: f64,
    pub max_label: u64,
}

impl ViewState {
    /// A state with unit ratios, used before the first render pass.
    pub fn new(pad_height: f64) -> Self {
        Self::with_ratios(1.0, 1.0, pad_height)
    }

    pub fn with_ratios(width_ratio: f64, height_ratio: f64, pad_height: f64) -> Self {
        Self {
            width_ratio,
            height_ratio,
            pad_height,
            max_label: 0,
        }
    }

    /// Derive both ratios from the surface size and the pool's extrema.
    pub fn compute(pixel_width: f64, client_width: f64, pool: &RenderPool, pad_height: f64) -> Self {
        Self::with_ratios(
            width_ratio(pixel_width, client_width),
            height_ratio(pool.max_abs_size(), pad_height),
            pad_height,
        )
    }

    /// Screen x (relative to the surface's left edge) to plotted-unit
    /// coordinates.
    pub fn screen_to_index(&self, screen_x: f64) -> f64 {
        screen_x / self.width_ratio
    }

    /// Inverse of [`ViewState::screen_to_index`].
    pub fn index_to_screen(&self, index: f64) -> f64 {
        index * self.width_ratio
    }

    /// Signed pixel offset from the midline for a magnitude.
    pub fn magnitude_offset(&self, size: i64) -> f64 {
        size as f64 / self.height_ratio
    }

    /// y of the zero line.
    pub fn baseline(&self) -> f64 {
        self.pad_height / 2.0
    }
}

/// `round(pixel_width / client_width)`: backing pixels per laid-out pixel.
pub fn width_ratio(pixel_width: f64, client_width: f64) -> f64 {
    if client_width <= 0.0 {
        return 1.0;
    }
    guard_ratio((pixel_width / client_width).round())
}

/// `round(max_abs / pad_height)`: magnitude per pixel.
pub fn height_ratio(max_abs: u64, pad_height: f64) -> f64 {
    if pad_height <= 0.0 {
        return 1.0;
    }
    guard_ratio((max_abs as f64 / pad_height).round())
}

fn guard_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio >= 1.0 {
        ratio
    } else {
        1.0
    }
}

/// Time-proportional gap before a unit, 0 for the first unit.
pub fn entry_duration(previous: Option<f64>, timestamp: f64) -> f64 {
    match previous {
        Some(prev) => (timestamp - prev).round() * DURATION_FACTOR / DURATION_SCALE,
        None => 0.0,
    }
}

/// Backing-pixel x of the `index`-th plotted unit.
pub fn unit_x(index: usize, duration: f64) -> f64 {
    duration + BASE_OFFSET + index as f64 * BASE_WIDTH
}
