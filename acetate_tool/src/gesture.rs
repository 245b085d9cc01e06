// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-gesture pointer state machine shared by all drawing tools.
//!
//! A gesture runs **Idle → Drawing → Idle**. The pointer goes down, but the
//! tool counts as "not yet started" until the first pointer move: at that
//! point the one-shot `start_selection` callback fires with the local start
//! coordinates and the phase becomes [`GesturePhase::Drawing`]. A
//! pointer-down immediately followed by pointer-up with no intervening move
//! therefore never fires `start_selection` and produces no draft.
//!
//! The machine converts device coordinates into surface-local space on
//! behalf of tool implementations, so every handler receives pre-converted
//! positions. The attached-listener set is exposed as [`ListenerFlags`] for
//! the host's windowing glue: move and double-click listeners belong on the
//! drawing surface, while the up listener belongs on the document root so a
//! fast drag ending outside the surface bounds is still detected as gesture
//! completion.

use alloc::boxed::Box;
use core::fmt;

use acetate_surface::{PointerButton, PointerInput, SurfaceFrame};
use kurbo::Point;

use crate::DrawingTool;

bitflags::bitflags! {
    /// Which gesture listeners are currently attached.
    ///
    /// The host's windowing glue reads this set to place real event
    /// listeners on the right targets.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ListenerFlags: u8 {
        /// Pointer-move listener; registered on the drawing surface.
        const MOVE = 0b0000_0001;
        /// Pointer-up listener; registered on the document root, so that
        /// gestures ending outside the surface still complete.
        const UP = 0b0000_0010;
        /// Double-click listener; registered on the drawing surface.
        const DOUBLE_CLICK = 0b0000_0100;
    }
}

/// Phase of the gesture state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    /// No shape is being drawn.
    Idle,
    /// A shape is under construction (the first move has happened).
    Drawing,
}

/// Handler for a converted pointer position plus the raw input it came from.
pub type PointHandler = Box<dyn FnMut(Point, &PointerInput)>;

/// The gesture handlers a tool attaches; any subset may be present.
#[derive(Default)]
pub struct ToolHandlers {
    /// Invoked on every pointer move while attached.
    pub on_move: Option<PointHandler>,
    /// Invoked on primary-button pointer up.
    pub on_up: Option<PointHandler>,
    /// Invoked on double click.
    pub on_double_click: Option<PointHandler>,
}

impl fmt::Debug for ToolHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolHandlers")
            .field("on_move", &self.on_move.is_some())
            .field("on_up", &self.on_up.is_some())
            .field("on_double_click", &self.on_double_click.is_some())
            .finish()
    }
}

/// Per-gesture state machine turning raw pointer events into tool handler
/// invocations with surface-local coordinates.
pub struct ToolGesture {
    frame: SurfaceFrame,
    started: bool,
    attached: ListenerFlags,
    handlers: ToolHandlers,
    on_start_selection: Option<Box<dyn FnMut(Point)>>,
}

impl ToolGesture {
    /// Creates an idle gesture over the given surface frame.
    #[must_use]
    pub fn new(frame: SurfaceFrame) -> Self {
        Self {
            frame,
            started: false,
            attached: ListenerFlags::empty(),
            handlers: ToolHandlers::default(),
            on_start_selection: None,
        }
    }

    /// Replaces the surface frame (pan/zoom or layout change).
    pub fn set_frame(&mut self, frame: SurfaceFrame) {
        self.frame = frame;
    }

    /// Returns the surface frame used for coordinate conversion.
    #[must_use]
    pub fn frame(&self) -> &SurfaceFrame {
        &self.frame
    }

    /// Registers the one-shot callback fired on the first move of a
    /// gesture, with the local start coordinates.
    pub fn on_start_selection(&mut self, callback: impl FnMut(Point) + 'static) {
        self.on_start_selection = Some(Box::new(callback));
    }

    /// Attaches gesture listeners; the attached set reflects which
    /// handlers were provided.
    pub fn attach_listeners(&mut self, handlers: ToolHandlers) {
        let mut attached = ListenerFlags::empty();
        attached.set(ListenerFlags::MOVE, handlers.on_move.is_some());
        attached.set(ListenerFlags::UP, handlers.on_up.is_some());
        attached.set(ListenerFlags::DOUBLE_CLICK, handlers.on_double_click.is_some());

        self.handlers = handlers;
        self.attached = attached;
    }

    /// Detaches exactly the listeners that were attached.
    ///
    /// Safe to call when none were attached.
    pub fn detach_listeners(&mut self) {
        self.handlers = ToolHandlers::default();
        self.attached = ListenerFlags::empty();
    }

    /// Returns the currently attached listener set.
    #[must_use]
    pub fn attached(&self) -> ListenerFlags {
        self.attached
    }

    /// Returns the current gesture phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        if self.started {
            GesturePhase::Drawing
        } else {
            GesturePhase::Idle
        }
    }

    /// Returns `true` while the gesture is in the Drawing phase.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.started
    }

    /// Feeds a pointer-move event through the machine.
    ///
    /// The first move of a gesture fires `start_selection` exactly once
    /// before the move handler runs.
    pub fn pointer_move(&mut self, input: &PointerInput) {
        if !self.attached.contains(ListenerFlags::MOVE) {
            return;
        }
        let pos = self.frame.to_local(input);

        if !self.started {
            self.started = true;
            if let Some(callback) = self.on_start_selection.as_mut() {
                callback(pos);
            }
        }

        if let Some(handler) = self.handlers.on_move.as_mut() {
            handler(pos, input);
        }
    }

    /// Feeds a pointer-up event through the machine.
    ///
    /// Non-primary buttons are ignored.
    pub fn pointer_up(&mut self, input: &PointerInput) {
        if !self.attached.contains(ListenerFlags::UP) {
            return;
        }
        if input.button != PointerButton::Primary {
            return;
        }
        let pos = self.frame.to_local(input);
        if let Some(handler) = self.handlers.on_up.as_mut() {
            handler(pos, input);
        }
    }

    /// Feeds a double-click event through the machine.
    pub fn double_click(&mut self, input: &PointerInput) {
        if !self.attached.contains(ListenerFlags::DOUBLE_CLICK) {
            return;
        }
        let pos = self.frame.to_local(input);
        if let Some(handler) = self.handlers.on_double_click.as_mut() {
            handler(pos, input);
        }
    }

    /// Converts the pointer-down position and forwards it to the tool's
    /// shape-specific start.
    pub fn start(&self, tool: &mut dyn DrawingTool, input: &PointerInput) {
        let pos = self.frame.to_local(input);
        tool.start_drawing(pos, input);
    }

    /// Ends the gesture (commit or abandon) and returns to Idle.
    pub fn finish(&mut self) {
        self.started = false;
    }
}

impl fmt::Debug for ToolGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolGesture")
            .field("phase", &self.phase())
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}
