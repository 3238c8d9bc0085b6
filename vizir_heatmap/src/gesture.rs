// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-to-zoom and click-to-annotate gesture recognition.
//!
//! A mouse-down, the first half of a double-click and a single click look the same
//! until a short interval passes without a follow-up event. The machine therefore
//! asks its host to schedule debounce timers ([`GestureCommand::Schedule`]) and is
//! told when they fire ([`GestureMachine::timer_fired`]). Pixels become bins only
//! when a timer completes a gesture, using the grid current at that moment.
//!
//! There is at most one live timer per [`TimerKind`]: scheduling a kind that is
//! already pending replaces it. A timer that fires in a state that no longer
//! expects it is ignored, so a host that fails to cancel cannot double-fire.
//!
//! ```text
//!            down              press timer
//!   Idle ───────────▶ ArmedForDrag ─────────▶ Dragging ──move──▶ Dragging
//!    ▲ ▲                 │ up/out               │ up/out
//!    │ └─────────────────┘                      ▼
//!    │              release timer (zoom)   release pending
//!    ├──────────────────────────────────────────┘
//!    │ click timer (vertex)
//!    └──────────────── ArmedForClick ◀──click── Idle
//!
//!   any ──dblclick──▶ Idle (cancel all timers, reset view)
//! ```

use kurbo::Point;
use smallvec::SmallVec;

use crate::grid::{Bin, GridTransform};

/// A raw pointer event, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// The pointer moved.
    Move(Point),
    /// A button was pressed.
    Down(Point),
    /// A button was released.
    Up(Point),
    /// The pointer left the drawing surface.
    Out(Point),
    /// A click (press and release without a drag).
    Click(Point),
    /// A double-click.
    DoubleClick(Point),
}

impl PointerEvent {
    /// The pixel position carried by the event.
    pub fn position(&self) -> Point {
        match *self {
            Self::Move(p)
            | Self::Down(p)
            | Self::Up(p)
            | Self::Out(p)
            | Self::Click(p)
            | Self::DoubleClick(p) => p,
        }
    }
}

/// The debounce timers the machine can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Mouse-down held long enough to start a drag.
    Press,
    /// Mouse-up settled; completes the zoom.
    Release,
    /// Click not followed by a double-click; adds a vertex.
    Click,
}

impl TimerKind {
    /// Every timer kind.
    pub const ALL: [Self; 3] = [Self::Press, Self::Release, Self::Click];

    /// Debounce delay in milliseconds.
    pub const fn delay_ms(self) -> u32 {
        match self {
            Self::Press => 250,
            Self::Release => 100,
            Self::Click => 250,
        }
    }
}

/// The anchor of an in-progress drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
    /// Bin under the press position.
    pub start_bin: Bin,
    /// Press position in pixels.
    pub start_px: Point,
    /// Most recent pointer position seen during the drag.
    pub last_px: Point,
}

/// Gesture recognizer state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GestureState {
    /// Nothing in progress.
    #[default]
    Idle,
    /// Mouse is down; waiting for the press timer.
    ArmedForDrag {
        /// Where the button went down.
        press: Point,
    },
    /// Drag-selecting a zoom rectangle.
    Dragging {
        /// The drag anchor.
        drag: DragState,
        /// Release position once the button is up and the release timer is pending.
        release: Option<Point>,
    },
    /// A click happened; waiting to rule out a double-click.
    ArmedForClick {
        /// Where the click happened.
        at: Point,
    },
}

/// Instructions for the host, in the order they must be applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureCommand {
    /// Start (or restart) the timer of this kind.
    Schedule(TimerKind),
    /// Cancel the timer of this kind, if live.
    Cancel(TimerKind),
    /// Draw the live selection rectangle between two pixels.
    ShowSelection {
        /// Drag anchor.
        from: Point,
        /// Current pointer position.
        to: Point,
    },
    /// Remove the selection rectangle.
    ClearSelection,
    /// Zoom to the rectangle spanned by two corner bins.
    Zoom {
        /// Corner where the drag started.
        a: Bin,
        /// Corner where the drag ended.
        b: Bin,
    },
    /// Append a polygon vertex.
    AddVertex(Bin),
    /// Return to the full extent.
    ResetView,
}

/// Commands produced by one input.
pub type GestureCommands = SmallVec<[GestureCommand; 4]>;

/// The gesture recognizer.
#[derive(Clone, Debug, Default)]
pub struct GestureMachine {
    state: GestureState,
}

impl GestureMachine {
    /// A machine in [`GestureState::Idle`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Whether a drag is in progress (including a pending release).
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Feeds a pointer event.
    pub fn pointer(&mut self, event: PointerEvent) -> GestureCommands {
        let mut out = GestureCommands::new();
        match (self.state, event) {
            (_, PointerEvent::DoubleClick(_)) => {
                out.extend(TimerKind::ALL.map(GestureCommand::Cancel));
                out.push(GestureCommand::ClearSelection);
                out.push(GestureCommand::ResetView);
                self.state = GestureState::Idle;
            }

            (GestureState::Idle, PointerEvent::Down(p)) => {
                self.state = GestureState::ArmedForDrag { press: p };
                out.push(GestureCommand::Schedule(TimerKind::Press));
            }
            (GestureState::ArmedForDrag { .. }, PointerEvent::Up(_) | PointerEvent::Out(_)) => {
                self.state = GestureState::Idle;
                out.push(GestureCommand::Cancel(TimerKind::Press));
            }

            (
                GestureState::Dragging {
                    mut drag,
                    release: None,
                },
                PointerEvent::Move(p),
            ) => {
                drag.last_px = p;
                self.state = GestureState::Dragging {
                    drag,
                    release: None,
                };
                out.push(GestureCommand::ShowSelection {
                    from: drag.start_px,
                    to: p,
                });
            }
            (
                GestureState::Dragging {
                    mut drag,
                    release: None,
                },
                PointerEvent::Up(p),
            ) => {
                drag.last_px = p;
                self.state = GestureState::Dragging {
                    drag,
                    release: Some(p),
                };
                out.push(GestureCommand::Schedule(TimerKind::Release));
            }
            (
                GestureState::Dragging {
                    drag,
                    release: None,
                },
                PointerEvent::Out(_),
            ) => {
                // Leaving the surface ends the drag where the pointer was last seen.
                self.state = GestureState::Dragging {
                    drag,
                    release: Some(drag.last_px),
                };
                out.push(GestureCommand::Schedule(TimerKind::Release));
            }

            (GestureState::Idle | GestureState::ArmedForClick { .. }, PointerEvent::Click(p)) => {
                self.state = GestureState::ArmedForClick { at: p };
                out.push(GestureCommand::Schedule(TimerKind::Click));
            }

            _ => {}
        }
        out
    }

    /// Reports that a timer of `kind` elapsed.
    pub fn timer_fired(&mut self, kind: TimerKind, grid: &GridTransform) -> GestureCommands {
        let mut out = GestureCommands::new();
        match (self.state, kind) {
            (GestureState::ArmedForDrag { press }, TimerKind::Press) => {
                self.state = GestureState::Dragging {
                    drag: DragState {
                        start_bin: grid.pixel_to_bin(press),
                        start_px: press,
                        last_px: press,
                    },
                    release: None,
                };
            }
            (
                GestureState::Dragging {
                    drag,
                    release: Some(end),
                },
                TimerKind::Release,
            ) => {
                self.state = GestureState::Idle;
                out.push(GestureCommand::ClearSelection);
                out.push(GestureCommand::Zoom {
                    a: drag.start_bin,
                    b: grid.pixel_to_bin(end),
                });
            }
            (GestureState::ArmedForClick { at }, TimerKind::Click) => {
                self.state = GestureState::Idle;
                out.push(GestureCommand::AddVertex(grid.pixel_to_bin(at)));
            }
            (state, kind) => {
                log::trace!("ignoring stale {kind:?} timer in {state:?}");
            }
        }
        out
    }

    /// Abandons any gesture in progress, cancelling every timer.
    pub fn reset(&mut self) -> GestureCommands {
        let mut out = GestureCommands::new();
        if self.state != GestureState::Idle {
            out.extend(TimerKind::ALL.map(GestureCommand::Cancel));
            if self.is_dragging() {
                out.push(GestureCommand::ClearSelection);
            }
            self.state = GestureState::Idle;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use kurbo::Rect;

    use super::*;
    use crate::window::BinRect;

    /// A host that keeps one pending slot per timer kind, like the browser widget.
    struct Driver {
        machine: GestureMachine,
        grid: GridTransform,
        pending: Vec<TimerKind>,
        emitted: Vec<GestureCommand>,
    }

    impl Driver {
        fn new() -> Self {
            let grid =
                GridTransform::new(Rect::new(0.0, 0.0, 400.0, 400.0), BinRect::full(4, 4).unwrap())
                    .unwrap();
            Self {
                machine: GestureMachine::new(),
                grid,
                pending: Vec::new(),
                emitted: Vec::new(),
            }
        }

        fn apply(&mut self, commands: GestureCommands) {
            for c in commands {
                match c {
                    GestureCommand::Schedule(k) => {
                        self.pending.retain(|p| *p != k);
                        self.pending.push(k);
                    }
                    GestureCommand::Cancel(k) => self.pending.retain(|p| *p != k),
                    other => self.emitted.push(other),
                }
            }
        }

        fn send(&mut self, event: PointerEvent) {
            let c = self.machine.pointer(event);
            self.apply(c);
        }

        fn fire(&mut self, kind: TimerKind) {
            assert!(self.pending.contains(&kind), "{kind:?} not pending");
            self.pending.retain(|p| *p != kind);
            let c = self.machine.timer_fired(kind, &self.grid);
            self.apply(c);
        }
    }

    fn centre(x: i64, y: i64) -> Point {
        Point::new(x as f64 * 100.0 + 50.0, 400.0 - (y as f64 * 100.0 + 50.0))
    }

    #[test]
    fn drag_select_zooms_to_normalized_corners() {
        let mut d = Driver::new();
        d.send(PointerEvent::Down(centre(3, 3)));
        d.fire(TimerKind::Press);
        assert!(d.machine.is_dragging());
        d.send(PointerEvent::Move(centre(2, 2)));
        d.send(PointerEvent::Move(centre(1, 1)));
        d.send(PointerEvent::Up(centre(1, 1)));
        // The browser's trailing click is swallowed while the release is pending.
        d.send(PointerEvent::Click(centre(1, 1)));
        d.fire(TimerKind::Release);

        assert_eq!(d.machine.state(), &GestureState::Idle);
        assert!(d.pending.is_empty());
        assert_eq!(
            d.emitted.last(),
            Some(&GestureCommand::Zoom {
                a: Bin::new(3, 3),
                b: Bin::new(1, 1)
            })
        );
        assert!(d.emitted.contains(&GestureCommand::ShowSelection {
            from: centre(3, 3),
            to: centre(1, 1)
        }));
    }

    #[test]
    fn quick_release_becomes_a_click() {
        let mut d = Driver::new();
        d.send(PointerEvent::Down(centre(2, 1)));
        d.send(PointerEvent::Up(centre(2, 1)));
        assert!(d.pending.is_empty(), "press timer cancelled");
        d.send(PointerEvent::Click(centre(2, 1)));
        d.fire(TimerKind::Click);
        assert_eq!(d.emitted, [GestureCommand::AddVertex(Bin::new(2, 1))]);
    }

    #[test]
    fn double_click_cancels_everything_and_resets() {
        let mut d = Driver::new();
        d.send(PointerEvent::Down(centre(0, 0)));
        d.send(PointerEvent::Up(centre(0, 0)));
        d.send(PointerEvent::Click(centre(0, 0)));
        // Second half of the double-click does not arm a drag.
        d.send(PointerEvent::Down(centre(0, 0)));
        assert!(matches!(d.machine.state(), GestureState::ArmedForClick { .. }));
        d.send(PointerEvent::Up(centre(0, 0)));
        d.send(PointerEvent::Click(centre(0, 0)));
        assert_eq!(d.pending, [TimerKind::Click], "single slot per kind");
        d.send(PointerEvent::DoubleClick(centre(0, 0)));

        assert!(d.pending.is_empty());
        assert!(!d.emitted.iter().any(|c| matches!(c, GestureCommand::AddVertex(_))));
        assert_eq!(d.emitted.last(), Some(&GestureCommand::ResetView));
    }

    #[test]
    fn mouse_out_during_drag_releases_at_last_position() {
        let mut d = Driver::new();
        d.send(PointerEvent::Down(centre(0, 0)));
        d.fire(TimerKind::Press);
        d.send(PointerEvent::Move(centre(2, 3)));
        d.send(PointerEvent::Out(Point::new(-5.0, -5.0)));
        d.fire(TimerKind::Release);
        assert_eq!(
            d.emitted.last(),
            Some(&GestureCommand::Zoom {
                a: Bin::new(0, 0),
                b: Bin::new(2, 3)
            })
        );
    }

    #[test]
    fn mouse_out_while_armed_cancels_press() {
        let mut d = Driver::new();
        d.send(PointerEvent::Down(centre(1, 1)));
        d.send(PointerEvent::Out(centre(1, 1)));
        assert!(d.pending.is_empty());
        assert_eq!(d.machine.state(), &GestureState::Idle);
    }

    #[test]
    fn stale_timers_are_ignored() {
        let mut m = GestureMachine::new();
        let d = Driver::new();
        for kind in TimerKind::ALL {
            assert!(m.timer_fired(kind, &d.grid).is_empty());
            assert_eq!(m.state(), &GestureState::Idle);
        }
        m.pointer(PointerEvent::Click(centre(1, 1)));
        assert!(m.timer_fired(TimerKind::Release, &d.grid).is_empty());
        assert!(matches!(m.state(), GestureState::ArmedForClick { .. }));
    }

    #[test]
    fn reset_cancels_pending_timers() {
        let mut d = Driver::new();
        d.send(PointerEvent::Down(centre(1, 1)));
        let c = d.machine.reset();
        d.apply(c);
        assert!(d.pending.is_empty());
        assert!(d.machine.reset().is_empty());
    }

    #[test]
    fn debounce_delays() {
        assert_eq!(TimerKind::Press.delay_ms(), 250);
        assert_eq!(TimerKind::Release.delay_ms(), 100);
        assert_eq!(TimerKind::Click.delay_ms(), 250);
    }
}
