use std::sync::mpsc::Receiver;

use allocpad_core::pad::PAD_HEIGHT;
use allocpad_core::recording::RecordingSurface;
use allocpad_core::{PadElements, PadEvent, PointerEvent, Surface, TraceView};
use allocpad_protocol::{RangeAllocated, TraceStore};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A trace pad driven from JavaScript.
///
/// The page forwards its canvas events, then replays [`TracePad::commands`]
/// onto the canvas and copies the two labels into the DOM.
#[wasm_bindgen]
pub struct TracePad {
    view: TraceView<RecordingSurface, String>,
    ranges: Receiver<RangeAllocated>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PadSnapshot<'a> {
    pixel_width: f64,
    pixel_height: f64,
    stretched: bool,
    positive_max: &'a str,
    negative_max: &'a str,
}

#[wasm_bindgen]
impl TracePad {
    /// Create a pad laid out at `client_left`, `client_top` with the given
    /// container width, and start listening.
    #[wasm_bindgen(constructor)]
    pub fn new(client_left: f64, client_top: f64, container_width: f64) -> TracePad {
        let surface = RecordingSurface::new(container_width, PAD_HEIGHT, container_width)
            .with_client_origin(client_left, client_top);
        let elements = PadElements::new(surface, String::new(), String::new());
        let mut view = TraceView::new(elements, TraceStore::default());
        view.start();
        let ranges = view.subscribe();
        TracePad { view, ranges }
    }

    /// Replace the trace (JSON or `timestamp size` lines) and re-render.
    pub fn load(&mut self, data: &[u8]) -> Result<usize, JsError> {
        let store = allocpad_core::parsers::parse_auto(data)
            .map_err(|e| JsError::new(&e.to_string()))?;
        let len = store.len();
        self.view.set_store(store);
        self.view.handle(PadEvent::DataReady);
        Ok(len)
    }

    /// Update the canvas's laid-out position after a page reflow.
    pub fn set_client_bounds(&mut self, left: f64, top: f64, container_width: f64) {
        self.view
            .elements_mut()
            .pad
            .set_client_bounds(left, top, container_width);
    }

    pub fn data_ready(&mut self) {
        self.view.handle(PadEvent::DataReady);
    }

    pub fn reset(&mut self) {
        self.view.handle(PadEvent::ResetRecord);
    }

    pub fn pointer_down(&mut self, client_x: f64, client_y: f64) {
        self.view
            .handle(PadEvent::Press(PointerEvent::new(client_x, client_y)));
    }

    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) {
        self.view
            .handle(PadEvent::Move(PointerEvent::new(client_x, client_y)));
    }

    pub fn pointer_up(&mut self, client_x: f64, client_y: f64) {
        self.view
            .handle(PadEvent::Release(PointerEvent::new(client_x, client_y)));
    }

    pub fn pointer_leave(&mut self) {
        self.view.handle(PadEvent::Leave);
    }

    pub fn stop(&mut self) {
        self.view.stop();
    }

    pub fn start(&mut self) {
        self.view.start();
    }

    /// Drain the commands drawn since the last call, as JSON.
    pub fn commands(&mut self) -> Result<String, JsError> {
        let commands = self.view.elements_mut().pad.take_log();
        serde_json::to_string(&commands).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Surface size and label text, as JSON.
    pub fn snapshot(&self) -> Result<String, JsError> {
        let elements = self.view.elements();
        let snapshot = PadSnapshot {
            pixel_width: elements.pad.pixel_width(),
            pixel_height: elements.pad.pixel_height(),
            stretched: elements.pad.is_stretched(),
            positive_max: &elements.positive_max,
            negative_max: &elements.negative_max,
        };
        serde_json::to_string(&snapshot).map_err(|e| JsError::new(&e.to_string()))
    }

    /// The oldest undelivered `range-allocated` notification as JSON, if
    /// any.
    pub fn take_range(&mut self) -> Result<Option<String>, JsError> {
        match self.ranges.try_recv() {
            Ok(range) => serde_json::to_string(&range)
                .map(Some)
                .map_err(|e| JsError::new(&e.to_string())),
            Err(_) => Ok(None),
        }
    }
}
