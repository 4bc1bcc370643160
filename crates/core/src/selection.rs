//! Drag-to-select state machine: `Idle -> Selecting -> Idle`.

use allocpad_protocol::RangeAllocated;

use crate::mapper::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPhase {
    #[default]
    Idle,
    Selecting,
}

/// Range bounds are held in plotted-unit coordinates and scaled by `step`
/// only when the selection is emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    drawable: bool,
    range_start: f64,
    range_end: f64,
    step: usize,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            drawable: false,
            range_start: 0.0,
            range_end: 0.0,
            step: 1,
        }
    }
}

impl SelectionState {
    pub fn phase(&self) -> SelectionPhase {
        if self.drawable {
            SelectionPhase::Selecting
        } else {
            SelectionPhase::Idle
        }
    }

    pub fn is_selecting(&self) -> bool {
        self.drawable
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn range_start(&self) -> f64 {
        self.range_start
    }

    pub fn range_end(&self) -> f64 {
        self.range_end
    }

    /// Source samples per plotted unit. 0 is clamped to 1.
    pub fn set_step(&mut self, step: usize) {
        self.step = step.max(1);
    }

    /// Begin a selection at `screen_x`. Ignored when there is nothing
    /// plotted. A press while already selecting restarts the range from the
    /// new point.
    ///
    /// Returns whether a selection is now in progress.
    pub fn press(&mut self, screen_x: f64, pool_is_empty: bool, view: &ViewState) -> bool {
        if pool_is_empty {
            log::debug!("press at {screen_x} ignored: nothing plotted");
            return false;
        }
        if self.drawable {
            log::debug!("press while selecting: restarting range at {screen_x}");
        }
        self.drawable = true;
        self.range_start = view.screen_to_index(screen_x);
        true
    }

    /// Pointer feedback while dragging. Has no effect on the range.
    pub fn track(&self, screen_x: f64, screen_y: f64) {
        if self.drawable {
            log::debug!("selecting {screen_x}:{screen_y}");
        }
    }

    /// Finish the selection at `screen_x`, returning the range in
    /// original-sample units. `None` when no press preceded it.
    pub fn release(&mut self, screen_x: f64, view: &ViewState) -> Option<RangeAllocated> {
        if !self.drawable {
            return None;
        }
        self.range_end = view.screen_to_index(screen_x);
        self.drawable = false;
        let step = self.step as f64;
        Some(RangeAllocated {
            start_point: self.range_start * step,
            end_point: self.range_end * step,
        })
    }

    /// Abandon an in-progress selection without emitting anything.
    pub fn cancel(&mut self) {
        self.drawable = false;
    }
}
