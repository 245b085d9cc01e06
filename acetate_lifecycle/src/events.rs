// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed notifications delivered to the host application.

use acetate_annotation::{Annotation, Target};
use kurbo::Point;

/// One notification from the controller to the host.
///
/// Every annotation carried by an event is an owned deep copy taken at
/// emission time: mutating it can never touch controller or store state.
///
/// `E` is the store's opaque element handle type.
#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent<E> {
    /// A drawing gesture produced its first pointer move, at this
    /// surface-local position.
    SelectionStarted {
        /// Local start coordinates of the gesture.
        point: Point,
    },
    /// A freshly drawn draft became the current selection.
    SelectionCreated {
        /// The draft annotation.
        annotation: Annotation,
    },
    /// An existing committed annotation became the current selection.
    AnnotationSelected {
        /// The selected annotation.
        annotation: Annotation,
        /// Its on-surface representation.
        element: E,
    },
    /// A draft was committed into the store.
    ///
    /// The autogenerated identifier can be replaced through
    /// [`Annotator::override_annotation_id`](crate::Annotator::override_annotation_id).
    AnnotationCreated {
        /// The committed annotation.
        annotation: Annotation,
        /// The draft it was promoted from, when the commit happened
        /// through an implicit save.
        previous: Option<Annotation>,
    },
    /// A committed annotation was updated in the store.
    AnnotationUpdated {
        /// The new value.
        annotation: Annotation,
        /// The value before the editing episode began.
        previous: Annotation,
    },
    /// An annotation was removed from the store.
    AnnotationDeleted {
        /// The removed annotation.
        annotation: Annotation,
    },
    /// The current edit was abandoned (selection change, Escape, or the
    /// editor's cancel action).
    CancelSelected {
        /// The annotation whose edit was cancelled.
        annotation: Annotation,
    },
    /// Direct manipulation changed the selection's geometry (handle drag).
    SelectionTargetChanged {
        /// The pending, uncommitted target.
        target: Target,
    },
    /// The pointer entered an annotation's shape.
    PointerEnterAnnotation {
        /// The hovered annotation.
        annotation: Annotation,
        /// Its on-surface representation.
        element: E,
    },
    /// The pointer left an annotation's shape.
    PointerLeaveAnnotation {
        /// The previously hovered annotation.
        annotation: Annotation,
        /// Its on-surface representation.
        element: E,
    },
    /// An annotation's shape was clicked.
    AnnotationClicked {
        /// The clicked annotation.
        annotation: Annotation,
        /// Its on-surface representation.
        element: E,
    },
}
