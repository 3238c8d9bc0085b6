// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives a [`Heatmap`] with scripted mouse gestures on a simulated clock.

use kurbo::Point;
use vizir_heatmap::{Effect, Effects, Heatmap, PointerEvent, TimerKind};

/// A heatmap plus the timers it has asked for.
#[derive(Debug)]
pub(crate) struct Driver {
    heatmap: Heatmap,
    now_ms: u64,
    pending: Vec<(TimerKind, u64)>,
}

impl Driver {
    pub(crate) fn new(heatmap: Heatmap) -> Self {
        Self {
            heatmap,
            now_ms: 0,
            pending: Vec::new(),
        }
    }

    pub(crate) fn heatmap(&self) -> &Heatmap {
        &self.heatmap
    }

    pub(crate) fn heatmap_mut(&mut self) -> &mut Heatmap {
        &mut self.heatmap
    }

    pub(crate) fn pointer(&mut self, event: PointerEvent) {
        let effects = self.heatmap.pointer(event);
        self.apply(effects);
    }

    /// Moves the clock forward, firing due timers in deadline order.
    pub(crate) fn advance(&mut self, ms: u64) {
        let until = self.now_ms + ms;
        while let Some(i) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (_, due))| *due <= until)
            .min_by_key(|(_, (_, due))| *due)
            .map(|(i, _)| i)
        {
            let (kind, due) = self.pending.swap_remove(i);
            self.now_ms = due;
            let effects = self.heatmap.on_timer(kind);
            self.apply(effects);
        }
        self.now_ms = until;
    }

    /// Press, hold past the drag delay and move to `to`, leaving the drag open.
    pub(crate) fn begin_drag(&mut self, from: Point, to: Point) {
        self.pointer(PointerEvent::Down(from));
        self.advance(u64::from(TimerKind::Press.delay_ms()) + 50);
        self.pointer(PointerEvent::Move(to));
    }

    /// Releases an open drag at `at`, including the click the browser sends after it.
    pub(crate) fn end_drag(&mut self, at: Point) {
        self.pointer(PointerEvent::Up(at));
        self.pointer(PointerEvent::Click(at));
        self.advance(u64::from(TimerKind::Release.delay_ms()) + 50);
    }

    /// A quick single click, settled past the double-click window.
    pub(crate) fn click(&mut self, at: Point) {
        self.pointer(PointerEvent::Down(at));
        self.advance(40);
        self.pointer(PointerEvent::Up(at));
        self.pointer(PointerEvent::Click(at));
        self.advance(u64::from(TimerKind::Click.delay_ms()) + 50);
    }

    /// The full browser event sequence for a double-click.
    pub(crate) fn double_click(&mut self, at: Point) {
        for _ in 0..2 {
            self.pointer(PointerEvent::Down(at));
            self.advance(40);
            self.pointer(PointerEvent::Up(at));
            self.pointer(PointerEvent::Click(at));
            self.advance(40);
        }
        self.pointer(PointerEvent::DoubleClick(at));
        self.advance(300);
    }

    fn apply(&mut self, effects: Effects) {
        for effect in effects {
            match effect {
                Effect::Schedule(kind) => {
                    self.pending.retain(|(k, _)| *k != kind);
                    self.pending
                        .push((kind, self.now_ms + u64::from(kind.delay_ms())));
                }
                Effect::Cancel(kind) => self.pending.retain(|(k, _)| *k != kind),
                Effect::Cursor(report) => log::debug!("{report}"),
                Effect::ViewChanged => log::info!("view is now {:?}", self.heatmap.window()),
                Effect::PolygonChanged => {
                    log::info!("polygon vertices: {:?}", self.heatmap.polygon().to_pairs());
                }
                Effect::Selection(_) | Effect::Crosshair(_) => {}
            }
        }
    }
}
