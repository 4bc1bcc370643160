pub mod commands;
pub mod theme;
pub mod trace;
pub mod types;

pub use commands::RenderCommand;
pub use theme::ThemeToken;
pub use trace::{Bucket, Plottable, RangeAllocated, Sample, TraceStore, saturating_total};
pub use types::{Color, Point, Rect};
