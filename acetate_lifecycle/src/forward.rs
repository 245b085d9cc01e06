// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forwarding of layer hover/click events to the host.
//!
//! The layer reports pointer interaction with annotation shapes; the host
//! wants to hear about it, but must never receive a reference into the
//! layer's own state. Each forwarder therefore clones the annotation value
//! before emission; the host can mutate what it gets without any effect
//! on controller or store state.

use acetate_annotation::Annotation;

use crate::annotator::Annotator;
use crate::events::LifecycleEvent;
use crate::store::AnnotationStore;

impl<S: AnnotationStore> Annotator<S> {
    /// Forwards a pointer-enter on an annotation's shape to the host.
    pub fn notify_pointer_enter(&mut self, annotation: &Annotation, element: S::Element) {
        self.emit(LifecycleEvent::PointerEnterAnnotation {
            annotation: annotation.clone(),
            element,
        });
    }

    /// Forwards a pointer-leave on an annotation's shape to the host.
    pub fn notify_pointer_leave(&mut self, annotation: &Annotation, element: S::Element) {
        self.emit(LifecycleEvent::PointerLeaveAnnotation {
            annotation: annotation.clone(),
            element,
        });
    }

    /// Forwards a click on an annotation's shape to the host.
    pub fn notify_click(&mut self, annotation: &Annotation, element: S::Element) {
        self.emit(LifecycleEvent::AnnotationClicked {
            annotation: annotation.clone(),
            element,
        });
    }
}
