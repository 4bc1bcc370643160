//! Allocation-trace pad: reduces a trace to a bounded render pool, maps it
//! onto a drawing surface, and turns pointer drags into range selections.
//!
//! ```text
//!   TraceStore ──▶ pool::reduce ──▶ ViewState ──▶ RenderCommand[] ──▶ Surface
//!                                       ▲
//!   PadEvent ──▶ SelectionState ────────┘──▶ RangeAllocated ──▶ listeners
//! ```

pub mod mapper;
pub mod pad;
pub mod parsers;
pub mod pool;
pub mod recording;
pub mod selection;
pub mod surface;
pub mod svg;

pub use pad::{EventKind, PadEvent, PointerEvent, TraceView};
pub use pool::{Reduction, RenderPool};
pub use surface::{ClientBounds, LabelSink, PadElements, Surface};
