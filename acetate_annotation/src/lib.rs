// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Acetate Annotation: the annotation data model.
//!
//! An [`Annotation`] is an immutable-by-convention value combining zero or
//! more content [`Body`]s with a spatial [`Target`] (a geometry plus a
//! reference to the coordinate space it lives in). Annotations come in two
//! flavors:
//!
//! - **Draft**: an in-progress, uncommitted shape produced by a drawing
//!   gesture. Drafts have no durable identity ([`Annotation::id`] is
//!   `None`) and are promoted to committed form with
//!   [`Annotation::into_committed`].
//! - **Committed**: persisted in a store under a durable [`AnnotationId`].
//!
//! Representing draftness as the *absence* of an identifier makes the
//! "draft with durable id" state unrepresentable; callers branch on
//! [`Annotation::is_draft`].
//!
//! All types here are plain owned values: `Clone` produces a deep copy,
//! which is what higher layers rely on when they hand annotations across
//! the host boundary.
//!
//! ## Minimal example
//!
//! ```rust
//! use acetate_annotation::{Annotation, AnnotationId, Body, Geometry, Target};
//! use kurbo::Rect;
//!
//! // A drawing gesture produced a rectangle on "page-1".
//! let target = Target::new("page-1", Geometry::Rect(Rect::new(10.0, 10.0, 60.0, 40.0)));
//! let draft = Annotation::draft(target).with_body(Body::new("a comment"));
//! assert!(draft.is_draft());
//!
//! // Committing assigns the durable identifier.
//! let committed = draft.into_committed(AnnotationId::new("#1"));
//! assert!(!committed.is_draft());
//! assert_eq!(committed.id().unwrap().as_str(), "#1");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

/// Durable identifier of a committed annotation.
///
/// Ids are opaque strings. The lifecycle controller autogenerates them from
/// a per-instance counter; hosts that need globally meaningful ids (URIs,
/// database keys) override the autogenerated value through the controller's
/// id-override protocol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnnotationId(String);

impl AnnotationId {
    /// Creates an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AnnotationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One content body attached to an annotation.
///
/// A body is a value string plus an optional purpose tag (for example
/// `"commenting"` or `"tagging"`). Most annotations carry exactly one body;
/// drafts frequently carry none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Body {
    value: String,
    purpose: Option<String>,
}

impl Body {
    /// Creates a body with no purpose tag.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            purpose: None,
        }
    }

    /// Sets the purpose tag.
    #[must_use]
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Returns the body value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the purpose tag, if any.
    #[must_use]
    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }
}

/// Discriminant of a [`Geometry`], used by drawing tools to declare which
/// shapes they support.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// Axis-aligned rectangle.
    Rect,
    /// Closed polygon.
    Polygon,
}

/// Shape of an annotation's spatial target, in surface-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Closed polygon described by its vertices.
    Polygon(Vec<Point>),
}

impl Geometry {
    /// Returns the kind discriminant of this geometry.
    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Rect(_) => GeometryKind::Rect,
            Self::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Returns the axis-aligned bounding box of this geometry.
    ///
    /// The bounds of an empty polygon are the zero rectangle.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect(rect) => *rect,
            Self::Polygon(points) => {
                let Some(first) = points.first() else {
                    return Rect::ZERO;
                };
                points.iter().skip(1).fold(
                    Rect::from_points(*first, *first),
                    |acc, p| acc.union_pt(*p),
                )
            }
        }
    }
}

/// Spatial target of an annotation: a geometry plus a reference to the
/// coordinate space (annotated resource) it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    source: String,
    geometry: Geometry,
}

impl Target {
    /// Creates a target on the given source.
    pub fn new(source: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            source: source.into(),
            geometry,
        }
    }

    /// Returns the coordinate-space / resource reference.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the target geometry.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Returns a copy of this target with a different geometry.
    #[must_use]
    pub fn with_geometry(&self, geometry: Geometry) -> Self {
        Self {
            source: self.source.clone(),
            geometry,
        }
    }
}

/// A user annotation: content bodies attached to a spatial target.
///
/// See the [crate docs](crate) for the draft vs. committed distinction.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    id: Option<AnnotationId>,
    bodies: SmallVec<[Body; 1]>,
    target: Target,
}

impl Annotation {
    /// Creates a draft annotation (no identifier, no bodies).
    #[must_use]
    pub fn draft(target: Target) -> Self {
        Self {
            id: None,
            bodies: SmallVec::new(),
            target,
        }
    }

    /// Creates a committed annotation with the given identifier.
    #[must_use]
    pub fn committed(id: AnnotationId, target: Target) -> Self {
        Self {
            id: Some(id),
            bodies: SmallVec::new(),
            target,
        }
    }

    /// Appends a body, builder style.
    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.bodies.push(body);
        self
    }

    /// Returns `true` if this annotation is an uncommitted draft.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// Returns the durable identifier, or `None` for drafts.
    #[must_use]
    pub fn id(&self) -> Option<&AnnotationId> {
        self.id.as_ref()
    }

    /// Returns the content bodies.
    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Returns the spatial target.
    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Promotes a draft to committed form under `id`.
    ///
    /// Bodies and target are carried over unchanged. Calling this on an
    /// already committed annotation replaces its identifier; the id-override
    /// protocol in the lifecycle controller is the supported way to rename.
    #[must_use]
    pub fn into_committed(mut self, id: AnnotationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns a copy of this annotation with a different target.
    #[must_use]
    pub fn with_target(&self, target: Target) -> Self {
        Self {
            id: self.id.clone(),
            bodies: self.bodies.clone(),
            target,
        }
    }

    /// Returns a copy of this annotation with a different set of bodies.
    #[must_use]
    pub fn with_bodies(&self, bodies: impl IntoIterator<Item = Body>) -> Self {
        Self {
            id: self.id.clone(),
            bodies: bodies.into_iter().collect(),
            target: self.target.clone(),
        }
    }

    /// Returns `true` if `self` and `other` denote the same annotation.
    ///
    /// Committed annotations compare by identifier, so a content edit does
    /// not change identity. Drafts have no identifier and compare
    /// structurally. A draft never shares identity with a committed value.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self == other,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn rect_target() -> Target {
        Target::new("page-1", Geometry::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)))
    }

    #[test]
    fn draft_has_no_id() {
        let draft = Annotation::draft(rect_target());
        assert!(draft.is_draft());
        assert_eq!(draft.id(), None);
        assert!(draft.bodies().is_empty());
    }

    #[test]
    fn into_committed_keeps_bodies_and_target() {
        let draft = Annotation::draft(rect_target()).with_body(Body::new("note"));
        let committed = draft.clone().into_committed(AnnotationId::new("#1"));

        assert!(!committed.is_draft());
        assert_eq!(committed.bodies(), draft.bodies());
        assert_eq!(committed.target(), draft.target());
    }

    #[test]
    fn with_target_replaces_only_the_target() {
        let a = Annotation::committed(AnnotationId::new("#1"), rect_target())
            .with_body(Body::new("note"));
        let moved = a.with_target(Target::new(
            "page-1",
            Geometry::Rect(Rect::new(5.0, 5.0, 15.0, 15.0)),
        ));

        assert_eq!(moved.id(), a.id());
        assert_eq!(moved.bodies(), a.bodies());
        assert_ne!(moved.target(), a.target());
    }

    #[test]
    fn same_identity_is_id_based_for_committed_values() {
        let a = Annotation::committed(AnnotationId::new("#1"), rect_target());
        let edited = a.with_bodies([Body::new("changed")]);
        assert!(a.same_identity(&edited));

        let other = Annotation::committed(AnnotationId::new("#2"), rect_target());
        assert!(!a.same_identity(&other));
    }

    #[test]
    fn same_identity_is_structural_for_drafts() {
        let a = Annotation::draft(rect_target());
        let b = Annotation::draft(rect_target());
        assert!(a.same_identity(&b));

        let c = b.with_body(Body::new("note"));
        assert!(!a.same_identity(&c));

        let committed = a.clone().into_committed(AnnotationId::new("#1"));
        assert!(!a.same_identity(&committed));
    }

    #[test]
    fn polygon_bounds_cover_all_vertices() {
        let poly = Geometry::Polygon(vec![
            Point::new(2.0, 3.0),
            Point::new(-1.0, 7.0),
            Point::new(5.0, 0.5),
        ]);
        let bounds = poly.bounds();
        assert_eq!(bounds, Rect::new(-1.0, 0.5, 5.0, 7.0));

        assert_eq!(Geometry::Polygon(vec![]).bounds(), Rect::ZERO);
    }

    #[test]
    fn clones_are_deep() {
        let a = Annotation::committed(AnnotationId::new("#1"), rect_target())
            .with_body(Body::new("original"));
        let copy = a.clone().with_bodies([Body::new("mutated")]);

        assert_eq!(a.bodies()[0].value(), "original");
        assert_eq!(copy.bodies()[0].value(), "mutated");
    }
}
