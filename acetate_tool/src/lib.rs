// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Acetate Tool: the drawing tool contract and per-gesture state machine.
//!
//! Concrete shape tools (rectangle, polygon, …) live outside this crate;
//! here is everything they plug into:
//!
//! - [`DrawingTool`] / [`ToolKind`]: the extension contract a shape tool
//!   implements. `DrawingTool` carries the per-instance capabilities
//!   (drawing state, starting a shape, producing an editable
//!   representation); `ToolKind` carries the type-level ones (a stable
//!   identifier and the `supports` predicate that says which annotations
//!   the tool can edit). The required methods make "implementation
//!   missing" a compile error rather than a runtime throw.
//! - [`ToolRegistry`]: a variant registry keyed by tool identifier, with
//!   `supports`-based dispatch for picking the tool that can handle a
//!   given annotation. Contract violations (duplicate registration,
//!   activating an unknown tool) fail loudly with a panic.
//! - [`ToolGesture`]: the pointer-down/move/up/double-click state machine
//!   shared by all tools. It converts device coordinates to surface-local
//!   space on behalf of tool implementations and fires a one-shot
//!   `start_selection` callback on the first pointer move of a gesture.
//!
//! ## Minimal example
//!
//! ```rust
//! use acetate_surface::{PointerInput, SurfaceFrame};
//! use acetate_tool::{ListenerFlags, ToolGesture, ToolHandlers};
//! use kurbo::{Affine, Point, Vec2};
//!
//! let frame = SurfaceFrame::new(Point::ZERO, Vec2::ZERO, Affine::IDENTITY);
//! let mut gesture = ToolGesture::new(frame);
//!
//! gesture.attach_listeners(ToolHandlers {
//!     on_move: Some(Box::new(|pos, _input| {
//!         // extend the shape under construction to `pos`
//!         let _ = pos;
//!     })),
//!     on_up: None,
//!     on_double_click: None,
//! });
//! assert!(gesture.attached().contains(ListenerFlags::MOVE));
//!
//! gesture.pointer_move(&PointerInput::mouse(Point::new(4.0, 4.0)));
//! assert!(gesture.is_drawing());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod contract;
mod gesture;
mod registry;

pub use contract::{DrawingTool, EditableShape, ToolConfig, ToolKind};
pub use gesture::{GesturePhase, ListenerFlags, PointHandler, ToolGesture, ToolHandlers};
pub use registry::{ToolRegistration, ToolRegistry};
