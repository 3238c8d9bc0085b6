// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounce timers: at most one live `setTimeout` per [`TimerKind`].

use vizir_heatmap::TimerKind;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use crate::error::WidgetError;

#[derive(Debug)]
struct Pending {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

/// One timeout slot per gesture timer.
#[derive(Debug)]
pub(crate) struct Timers {
    window: Window,
    slots: [Option<Pending>; TimerKind::ALL.len()],
}

impl Timers {
    pub(crate) fn new(window: Window) -> Self {
        Self {
            window,
            slots: [const { None }; TimerKind::ALL.len()],
        }
    }

    /// Arms `kind`, replacing a live timer of the same kind.
    pub(crate) fn schedule(
        &mut self,
        kind: TimerKind,
        on_fire: impl FnOnce() + 'static,
    ) -> Result<(), WidgetError> {
        self.cancel(kind);
        let callback = Closure::once(on_fire);
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                i32::try_from(kind.delay_ms()).unwrap_or(i32::MAX),
            )?;
        self.slots[slot(kind)] = Some(Pending {
            handle,
            _callback: callback,
        });
        Ok(())
    }

    /// Disarms `kind`. Harmless if it already fired.
    pub(crate) fn cancel(&mut self, kind: TimerKind) {
        if let Some(pending) = self.slots[slot(kind)].take() {
            self.window.clear_timeout_with_handle(pending.handle);
        }
    }

    /// Forgets a timer that has fired.
    pub(crate) fn fired(&mut self, kind: TimerKind) {
        self.slots[slot(kind)] = None;
    }
}

fn slot(kind: TimerKind) -> usize {
    match kind {
        TimerKind::Press => 0,
        TimerKind::Release => 1,
        TimerKind::Click => 2,
    }
}
