// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Acetate Surface: pointer input model and device → surface coordinate mapping.
//!
//! Pointer events arrive in device coordinates; drawing tools and hit
//! testing want coordinates in the drawing surface's local space, after
//! compensating for pan/zoom and for how the surface is embedded in its
//! host document. [`SurfaceFrame`] performs that conversion.
//!
//! The conversion is modality-dependent:
//!
//! - **Touch** events do not reliably report target-relative offsets, so
//!   the local position is reconstructed from the client position: offset
//!   relative to the surface's bounding rectangle, plus the surface's own
//!   offset within its positioned ancestor, through the inverse of the
//!   surface-to-screen transform.
//! - **Mouse/pointer** events already carry a surface-relative offset,
//!   which only needs the inverse of the drawing group's *local* transform
//!   (not the full screen transform, which would double-count
//!   ancestor transforms).
//!
//! Both branches must agree: the same logical pointer position maps to the
//! same local point regardless of modality.
//!
//! ## Minimal example
//!
//! ```rust
//! use acetate_surface::{PointerInput, SurfaceFrame};
//! use kurbo::{Affine, Point, Vec2};
//!
//! // Surface at (100, 50) in client space, zoomed 2x, not offset inside
//! // its positioned ancestor.
//! let frame = SurfaceFrame::new(Point::new(100.0, 50.0), Vec2::ZERO, Affine::scale(2.0));
//!
//! // A mouse event 40px right, 20px down of the surface origin.
//! let mouse = PointerInput::mouse(Point::new(40.0, 20.0));
//! assert_eq!(frame.to_local(&mouse), Point::new(20.0, 10.0));
//!
//! // A touch at the same physical position reports only client coordinates.
//! let touch = PointerInput::touch(Point::new(140.0, 70.0));
//! assert_eq!(frame.to_local(&touch), Point::new(20.0, 10.0));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Affine, Point, Vec2};

/// Input modality of a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerModality {
    /// Mouse or pointer-capable device reporting surface-relative offsets.
    Mouse,
    /// Touch device reporting client coordinates only.
    Touch,
}

/// Pointer button associated with an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Left / primary button (or a touch contact).
    Primary,
    /// Right / secondary button.
    Secondary,
    /// Middle / auxiliary button.
    Auxiliary,
}

/// One pointer event, in device coordinates.
///
/// `client` is the position relative to the host document's viewport;
/// `offset` is the position relative to the drawing surface. Touch devices
/// populate only `client` meaningfully; mouse devices populate both.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerInput {
    /// Position relative to the host viewport.
    pub client: Point,
    /// Position relative to the drawing surface.
    pub offset: Point,
    /// Input modality this event arrived through.
    pub modality: PointerModality,
    /// Button that produced the event.
    pub button: PointerButton,
}

impl PointerInput {
    /// Creates a primary-button mouse event from a surface-relative offset.
    #[must_use]
    pub fn mouse(offset: Point) -> Self {
        Self {
            client: offset,
            offset,
            modality: PointerModality::Mouse,
            button: PointerButton::Primary,
        }
    }

    /// Creates a touch event from a client-space position.
    #[must_use]
    pub fn touch(client: Point) -> Self {
        Self {
            client,
            offset: Point::ZERO,
            modality: PointerModality::Touch,
            button: PointerButton::Primary,
        }
    }

    /// Sets the button, builder style.
    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

/// Placement of a drawing surface in its host document, with the transforms
/// needed to map device coordinates into surface-local space.
///
/// The frame caches the inverse transforms and rebuilds them whenever a
/// transform is replaced, so conversion itself is a single matrix apply.
#[derive(Clone, Debug)]
pub struct SurfaceFrame {
    bounds_origin: Point,
    surface_offset: Vec2,
    local_transform: Affine,
    screen_transform: Affine,
    inv_local: Affine,
    inv_screen: Affine,
}

impl SurfaceFrame {
    /// Creates a frame from the surface's bounding-rect origin (client
    /// space), its offset within its positioned ancestor, and the drawing
    /// group's local pan/zoom transform.
    ///
    /// The surface-to-screen transform is derived so that both conversion
    /// branches agree by construction. Callers that track the screen
    /// transform independently can replace it with
    /// [`SurfaceFrame::with_screen_transform`].
    #[must_use]
    pub fn new(bounds_origin: Point, surface_offset: Vec2, local_transform: Affine) -> Self {
        let screen_transform = Affine::translate(surface_offset) * local_transform;
        let mut frame = Self {
            bounds_origin,
            surface_offset,
            local_transform,
            screen_transform,
            inv_local: Affine::IDENTITY,
            inv_screen: Affine::IDENTITY,
        };
        frame.rebuild_inverses();
        frame
    }

    /// Replaces the surface-to-screen transform, builder style.
    #[must_use]
    pub fn with_screen_transform(mut self, screen_transform: Affine) -> Self {
        self.screen_transform = screen_transform;
        self.rebuild_inverses();
        self
    }

    /// Returns the surface's bounding-rect origin in client space.
    #[must_use]
    pub fn bounds_origin(&self) -> Point {
        self.bounds_origin
    }

    /// Sets the surface's bounding-rect origin in client space.
    pub fn set_bounds_origin(&mut self, origin: Point) {
        self.bounds_origin = origin;
    }

    /// Returns the surface's offset within its positioned ancestor.
    #[must_use]
    pub fn surface_offset(&self) -> Vec2 {
        self.surface_offset
    }

    /// Returns the drawing group's local transform.
    #[must_use]
    pub fn local_transform(&self) -> Affine {
        self.local_transform
    }

    /// Sets the drawing group's local transform (pan/zoom change).
    ///
    /// The derived surface-to-screen transform is kept consistent; use
    /// [`SurfaceFrame::set_screen_transform`] afterwards when the screen
    /// matrix is tracked separately.
    pub fn set_local_transform(&mut self, local_transform: Affine) {
        self.local_transform = local_transform;
        self.screen_transform = Affine::translate(self.surface_offset) * local_transform;
        self.rebuild_inverses();
    }

    /// Returns the surface-to-screen transform.
    #[must_use]
    pub fn screen_transform(&self) -> Affine {
        self.screen_transform
    }

    /// Sets the surface-to-screen transform.
    pub fn set_screen_transform(&mut self, screen_transform: Affine) {
        self.screen_transform = screen_transform;
        self.rebuild_inverses();
    }

    /// Returns the frame's uniform zoom factor.
    ///
    /// This reads the x-scale coefficient of the local transform; frames
    /// are axis-aligned with uniform zoom, matching the viewport model.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.local_transform.as_coeffs()[0]
    }

    /// Maps a pointer event into surface-local coordinates.
    ///
    /// See the [crate docs](crate) for the two modality branches.
    #[must_use]
    pub fn to_local(&self, input: &PointerInput) -> Point {
        match input.modality {
            PointerModality::Touch => {
                let in_bounds = input.client - self.bounds_origin;
                let reconstructed = (in_bounds + self.surface_offset).to_point();
                self.inv_screen * reconstructed
            }
            PointerModality::Mouse => self.inv_local * input.offset,
        }
    }

    fn rebuild_inverses(&mut self) {
        self.inv_local = self.local_transform.inverse();
        self.inv_screen = self.screen_transform.inverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_offset_through_identity_is_unchanged() {
        let frame = SurfaceFrame::new(Point::new(10.0, 10.0), Vec2::ZERO, Affine::IDENTITY);
        let input = PointerInput::mouse(Point::new(3.0, 4.0));
        assert_eq!(frame.to_local(&input), Point::new(3.0, 4.0));
    }

    #[test]
    fn mouse_offset_uses_inverse_local_transform() {
        let local = Affine::scale(2.0).then_translate(Vec2::new(10.0, 0.0));
        let frame = SurfaceFrame::new(Point::ZERO, Vec2::ZERO, local);

        let input = PointerInput::mouse(Point::new(30.0, 8.0));
        let p = frame.to_local(&input);
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn touch_and_mouse_agree_on_the_same_physical_position() {
        let origin = Point::new(100.0, 50.0);
        let offset_in_ancestor = Vec2::new(7.0, 3.0);
        let local = Affine::scale(2.5).then_translate(Vec2::new(-4.0, 9.0));
        let frame = SurfaceFrame::new(origin, offset_in_ancestor, local);

        let surface_relative = Point::new(42.0, 17.0);
        let mouse = PointerInput::mouse(surface_relative);
        let touch = PointerInput::touch(surface_relative + origin.to_vec2());

        let a = frame.to_local(&mouse);
        let b = frame.to_local(&touch);
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((a.y - b.y).abs() < 1e-9);
    }

    #[test]
    fn explicit_screen_transform_drives_the_touch_branch() {
        let frame = SurfaceFrame::new(Point::ZERO, Vec2::ZERO, Affine::IDENTITY)
            .with_screen_transform(Affine::scale(4.0));

        let touch = PointerInput::touch(Point::new(8.0, 12.0));
        assert_eq!(frame.to_local(&touch), Point::new(2.0, 3.0));

        // The mouse branch still uses the local transform.
        let mouse = PointerInput::mouse(Point::new(8.0, 12.0));
        assert_eq!(frame.to_local(&mouse), Point::new(8.0, 12.0));
    }

    #[test]
    fn zoom_reads_the_local_scale() {
        let mut frame = SurfaceFrame::new(Point::ZERO, Vec2::ZERO, Affine::scale(3.0));
        assert!((frame.zoom() - 3.0).abs() < 1e-12);

        frame.set_local_transform(Affine::scale(0.5));
        assert!((frame.zoom() - 0.5).abs() < 1e-12);
    }
}
