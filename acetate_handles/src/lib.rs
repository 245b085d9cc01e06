// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Acetate Handles: a headless model of circular drag handles.
//!
//! Editable shapes expose draggable affordances ("handles") at their
//! corners and vertices. A handle is a pair of concentric circles (an
//! inner fill and an outer stroke ring) that always share a center. This
//! crate tracks the set of active handles for one editable shape and
//! answers create/move/query/scale operations; actual drawing is left to a
//! rendering layer, which consumes [`HandleGraphic`] descriptions.
//!
//! Handle sizes follow the surface zoom: when the surface zooms, callers
//! invoke [`HandleSet::scale`] with the inverse zoom factor so handles stay
//! a consistent on-screen size.
//!
//! ## Minimal example
//!
//! ```rust
//! use acetate_handles::{HandleConfig, HandleSet};
//! use kurbo::Point;
//!
//! let mut handles = HandleSet::new(HandleConfig::default());
//! let h = handles.create(10.0, 20.0);
//!
//! handles.move_to(h, 15.0, 25.0);
//! assert_eq!(handles.position(h), Some(Point::new(15.0, 25.0)));
//!
//! // Surface zoomed to 2x: shrink handles to keep their apparent size.
//! handles.scale(0.5);
//! assert_eq!(handles.graphic(h).unwrap().inner.radius, 3.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Circle, Point};
use peniko::Color;
use peniko::color::palette;

/// Default handle radius, in surface units.
pub const DEFAULT_HANDLE_RADIUS: f64 = 6.0;

/// Configuration for a [`HandleSet`].
#[derive(Clone, Debug)]
pub struct HandleConfig {
    /// Radius of the inner circle at scale 1.0.
    pub base_radius: f64,
    /// Fill color of the inner circle.
    pub inner_fill: Color,
    /// Stroke color of the outer ring.
    pub outer_stroke: Color,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            base_radius: DEFAULT_HANDLE_RADIUS,
            inner_fill: palette::css::WHITE,
            outer_stroke: palette::css::BLACK,
        }
    }
}

/// Identifier of one handle within a [`HandleSet`].
///
/// Ids are only meaningful within the set that created them; a removed
/// handle's id is never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandleId(u32);

/// Display description of one handle: two concentric circles.
///
/// Rendering layers draw `outer` as a stroked ring underneath `inner`.
#[derive(Clone, Debug, PartialEq)]
pub struct HandleGraphic {
    /// Inner filled circle.
    pub inner: Circle,
    /// Outer stroked circle.
    pub outer: Circle,
    /// Fill color for `inner`.
    pub inner_fill: Color,
    /// Stroke color for `outer`.
    pub outer_stroke: Color,
}

#[derive(Clone, Debug)]
struct Handle {
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
}

/// The set of active drag handles for one editable shape.
///
/// Storage is a slot vector with tombstones; handle counts are tiny, so
/// linear operations are fine.
#[derive(Clone)]
pub struct HandleSet {
    config: HandleConfig,
    slots: Vec<Option<Handle>>,
}

impl HandleSet {
    /// Creates an empty set with the given configuration.
    #[must_use]
    pub fn new(config: HandleConfig) -> Self {
        Self {
            config,
            slots: Vec::new(),
        }
    }

    /// Returns the configuration this set was created with.
    #[must_use]
    pub fn config(&self) -> &HandleConfig {
        &self.config
    }

    /// Creates a handle centered at `(x, y)`.
    ///
    /// The inner circle gets the configured base radius; the outer ring is
    /// one unit larger.
    pub fn create(&mut self, x: f64, y: f64) -> HandleId {
        let id = HandleId(u32::try_from(self.slots.len()).expect("handle slots exceed u32"));
        self.slots.push(Some(Handle {
            center: Point::new(x, y),
            inner_radius: self.config.base_radius,
            outer_radius: self.config.base_radius + 1.0,
        }));
        id
    }

    /// Moves a handle to `(x, y)`. Both circles move together.
    ///
    /// Moving a removed handle is a no-op.
    pub fn move_to(&mut self, id: HandleId, x: f64, y: f64) {
        if let Some(Some(handle)) = self.slots.get_mut(id.0 as usize) {
            handle.center = Point::new(x, y);
        }
    }

    /// Returns a handle's center, or `None` if it was removed.
    #[must_use]
    pub fn position(&self, id: HandleId) -> Option<Point> {
        self.get(id).map(|h| h.center)
    }

    /// Resizes every active handle to `factor × base_radius`.
    ///
    /// Used when the surface zoom changes so handle affordances keep a
    /// consistent apparent size. Inner and outer circles share the scaled
    /// radius afterwards.
    pub fn scale(&mut self, factor: f64) {
        let radius = factor * self.config.base_radius;
        for handle in self.slots.iter_mut().flatten() {
            handle.inner_radius = radius;
            handle.outer_radius = radius;
        }
    }

    /// Returns the display description for a handle.
    #[must_use]
    pub fn graphic(&self, id: HandleId) -> Option<HandleGraphic> {
        self.get(id).map(|h| HandleGraphic {
            inner: Circle::new(h.center, h.inner_radius),
            outer: Circle::new(h.center, h.outer_radius),
            inner_fill: self.config.inner_fill,
            outer_stroke: self.config.outer_stroke,
        })
    }

    /// Removes a handle. Removing twice is a no-op.
    pub fn remove(&mut self, id: HandleId) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    /// Removes all handles.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Returns the number of active handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns `true` if no handles are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the ids of all active handles, in creation order.
    #[expect(clippy::cast_possible_truncation, reason = "slots are created from u32 ids")]
    pub fn ids(&self) -> impl Iterator<Item = HandleId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| HandleId(i as u32)))
    }

    fn get(&self, id: HandleId) -> Option<&Handle> {
        self.slots.get(id.0 as usize).and_then(|s| s.as_ref())
    }
}

impl fmt::Debug for HandleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleSet")
            .field("total_slots", &self.slots.len())
            .field("alive", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_places_concentric_circles() {
        let mut handles = HandleSet::new(HandleConfig::default());
        let id = handles.create(4.0, 9.0);

        let graphic = handles.graphic(id).unwrap();
        assert_eq!(graphic.inner.center, graphic.outer.center);
        assert_eq!(graphic.inner.radius, DEFAULT_HANDLE_RADIUS);
        assert_eq!(graphic.outer.radius, DEFAULT_HANDLE_RADIUS + 1.0);
    }

    #[test]
    fn move_to_moves_both_circles() {
        let mut handles = HandleSet::new(HandleConfig::default());
        let id = handles.create(0.0, 0.0);

        handles.move_to(id, 7.0, -2.0);

        let graphic = handles.graphic(id).unwrap();
        assert_eq!(graphic.inner.center, Point::new(7.0, -2.0));
        assert_eq!(graphic.outer.center, Point::new(7.0, -2.0));
        assert_eq!(handles.position(id), Some(Point::new(7.0, -2.0)));
    }

    #[test]
    fn scale_applies_factor_times_base_radius_to_all() {
        let config = HandleConfig {
            base_radius: 10.0,
            ..HandleConfig::default()
        };
        let mut handles = HandleSet::new(config);
        let a = handles.create(0.0, 0.0);
        let b = handles.create(5.0, 5.0);

        handles.scale(0.25);

        for id in [a, b] {
            let graphic = handles.graphic(id).unwrap();
            assert_eq!(graphic.inner.radius, 2.5);
            assert_eq!(graphic.outer.radius, 2.5);
        }
    }

    #[test]
    fn removed_handles_stay_gone() {
        let mut handles = HandleSet::new(HandleConfig::default());
        let a = handles.create(0.0, 0.0);
        let b = handles.create(1.0, 1.0);

        handles.remove(a);
        handles.remove(a);

        assert_eq!(handles.position(a), None);
        assert_eq!(handles.graphic(a), None);
        assert_eq!(handles.len(), 1);
        assert_eq!(handles.ids().collect::<alloc::vec::Vec<_>>(), [b]);

        // Moving a removed handle does nothing.
        handles.move_to(a, 9.0, 9.0);
        assert_eq!(handles.position(a), None);
    }

    #[test]
    fn clear_empties_the_set() {
        let mut handles = HandleSet::new(HandleConfig::default());
        handles.create(0.0, 0.0);
        handles.create(1.0, 1.0);

        handles.clear();
        assert!(handles.is_empty());
    }
}
