//! The trace pad: owns the render pool, view state, and selection, and
//! reacts to host events.

use std::sync::mpsc::{self, Receiver, Sender};

use allocpad_protocol::{Point, RangeAllocated, Rect, RenderCommand, ThemeToken, TraceStore};

use crate::mapper::{self, BASE_WIDTH, ViewState};
use crate::pool::{self, RenderPool};
use crate::selection::SelectionState;
use crate::surface::{LabelSink, PadElements, Surface};

/// Most plotted units drawn per pass.
pub const VISUAL_LIMIT: usize = 1000;
/// Pad height in backing pixels; the midline sits at half of it.
pub const PAD_HEIGHT: f64 = 800.0;
pub const TRACE_STROKE: f64 = 5.0;
pub const MIDLINE_STROKE: f64 = 1.0;

/// Pointer position in the host's client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// Everything a pad reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadEvent {
    /// The trace store has new data; re-render.
    DataReady,
    /// Clear the pad and abandon any selection.
    ResetRecord,
    Press(PointerEvent),
    Move(PointerEvent),
    Release(PointerEvent),
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DataReady,
    ResetRecord,
    Press,
    Move,
    Release,
    Leave,
}

impl PadEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::DataReady => EventKind::DataReady,
            Self::ResetRecord => EventKind::ResetRecord,
            Self::Press(_) => EventKind::Press,
            Self::Move(_) => EventKind::Move,
            Self::Release(_) => EventKind::Release,
            Self::Leave => EventKind::Leave,
        }
    }
}

/// Renders an allocation trace onto a surface and reports drag-selected
/// ranges.
///
/// Events are only handled between [`TraceView::start`] and
/// [`TraceView::stop`]; pointer move and leave are only handled while a
/// selection is in progress.
pub struct TraceView<S, L> {
    elements: PadElements<S, L>,
    store: TraceStore,
    pool: RenderPool,
    view: ViewState,
    selection: SelectionState,
    started: bool,
    listeners: Vec<Sender<RangeAllocated>>,
}

impl<S: Surface, L: LabelSink> TraceView<S, L> {
    pub fn new(elements: PadElements<S, L>, store: TraceStore) -> Self {
        Self {
            elements,
            store,
            pool: RenderPool::default(),
            view: ViewState::new(PAD_HEIGHT),
            selection: SelectionState::default(),
            started: false,
            listeners: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.started = true;
    }

    /// Stop handling events. An in-progress selection is dropped.
    pub fn stop(&mut self) {
        self.started = false;
        self.selection.cancel();
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether events of `kind` currently reach a handler.
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        if !self.started {
            return false;
        }
        match kind {
            EventKind::DataReady
            | EventKind::ResetRecord
            | EventKind::Press
            | EventKind::Release => true,
            EventKind::Move | EventKind::Leave => self.selection.is_selecting(),
        }
    }

    /// Register for `range-allocated` notifications. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<RangeAllocated> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    pub fn handle(&mut self, event: PadEvent) {
        if !self.is_subscribed(event.kind()) {
            return;
        }
        match event {
            PadEvent::DataReady => self.draw_trace(),
            PadEvent::ResetRecord => self.reset(),
            PadEvent::Press(pointer) => self.init_range(pointer),
            PadEvent::Move(pointer) => self.update_range(pointer),
            PadEvent::Release(pointer) => self.setup_range(pointer),
            PadEvent::Leave => self.close_range(),
        }
    }

    /// Replace the data source. Takes effect on the next `DataReady`.
    pub fn set_store(&mut self, store: TraceStore) {
        self.store = store;
    }

    pub fn store(&self) -> &TraceStore {
        &self.store
    }

    pub fn pool(&self) -> &RenderPool {
        &self.pool
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn elements(&self) -> &PadElements<S, L> {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut PadElements<S, L> {
        &mut self.elements
    }

    /// Reduce the store, size the surface, and derive fresh ratios.
    ///
    /// A selection in progress is dropped: its start point belongs to the
    /// previous pool's coordinates.
    fn setup_surface(&mut self) {
        if self.selection.is_selecting() {
            log::debug!("pool rebuilt mid-selection: cancelling range");
            self.selection.cancel();
        }
        let source = &self.store.allocated;
        let reduction = pool::reduce(source, VISUAL_LIMIT);
        let count = source.len().min(VISUAL_LIMIT);
        if count > 0 {
            self.elements.pad.set_stretched(reduction.pool.is_reduced());
            self.elements.pad.set_pixel_width(count as f64 * BASE_WIDTH);
        }
        self.selection.set_step(reduction.step);
        self.pool = reduction.pool;

        let bounds = self.elements.pad.client_bounds();
        self.view = ViewState::compute(
            self.elements.pad.pixel_width(),
            bounds.width,
            &self.pool,
            PAD_HEIGHT,
        );
        log::debug!(
            "pad setup: {} units, step {}, width ratio {}, height ratio {}",
            self.pool.len(),
            self.selection.step(),
            self.view.width_ratio,
            self.view.height_ratio
        );
    }

    /// Run the full render pipeline: reduce, map, clear, stroke every unit,
    /// publish the labels, and draw the midline.
    pub fn draw_trace(&mut self) {
        self.setup_surface();

        let baseline = self.view.baseline();
        let mut commands = Vec::with_capacity(self.pool.len() + 2);
        commands.push(self.clear_command());

        let mut max_label = 0u64;
        let mut previous: Option<f64> = None;
        let mut target_x = 0.0;
        for (i, unit) in self.pool.units().enumerate() {
            max_label = max_label.max(unit.size().unsigned_abs());

            let height = self.view.magnitude_offset(unit.size());
            let duration = mapper::entry_duration(previous, unit.timestamp());
            previous = Some(unit.timestamp());

            target_x = mapper::unit_x(i, duration);
            commands.push(RenderCommand::DrawLine {
                from: Point::new(target_x, baseline),
                to: Point::new(target_x, baseline - height),
                color: if height < 0.0 {
                    ThemeToken::Release
                } else {
                    ThemeToken::Allocation
                },
                width: TRACE_STROKE,
            });
        }

        self.view.max_label = max_label;
        self.set_labels();

        commands.push(RenderCommand::DrawLine {
            from: Point::new(0.0, baseline),
            to: Point::new(target_x, baseline),
            color: ThemeToken::Midline,
            width: MIDLINE_STROKE,
        });
        self.elements.pad.draw(&commands);
    }

    /// Erase the whole surface.
    pub fn clean_pad(&mut self) {
        let clear = self.clear_command();
        self.elements.pad.draw(&[clear]);
    }

    /// Clear the surface and force the selection back to idle.
    pub fn reset(&mut self) {
        self.clean_pad();
        self.selection.cancel();
    }

    fn clear_command(&self) -> RenderCommand {
        RenderCommand::Clear {
            rect: Rect::new(
                0.0,
                0.0,
                self.elements.pad.pixel_width(),
                self.elements.pad.pixel_height(),
            ),
        }
    }

    fn set_labels(&mut self) {
        let (positive, negative) = format_labels(self.view.max_label);
        self.elements.positive_max.set_text(&positive);
        self.elements.negative_max.set_text(&negative);
    }

    /// Pointer position relative to the surface's top-left corner.
    fn surface_position(&self, pointer: PointerEvent) -> (f64, f64) {
        let bounds = self.elements.pad.client_bounds();
        (pointer.client_x - bounds.left, pointer.client_y - bounds.top)
    }

    fn init_range(&mut self, pointer: PointerEvent) {
        let (x, _) = self.surface_position(pointer);
        self.selection.press(x, self.pool.is_empty(), &self.view);
    }

    fn update_range(&mut self, pointer: PointerEvent) {
        let (x, y) = self.surface_position(pointer);
        self.selection.track(x, y);
    }

    fn setup_range(&mut self, pointer: PointerEvent) {
        let (x, _) = self.surface_position(pointer);
        let Some(range) = self.selection.release(x, &self.view) else {
            return;
        };
        self.clean_pad();
        self.close_range();
        log::debug!(
            "range allocated: {} -> {}",
            range.start_point,
            range.end_point
        );
        self.listeners.retain(|tx| tx.send(range).is_ok());
    }

    fn close_range(&mut self) {
        self.selection.cancel();
    }
}

/// Text for the positive and negative extrema labels.
pub fn format_labels(max_label: u64) -> (String, String) {
    (max_label.to_string(), format!("-{max_label}"))
}
