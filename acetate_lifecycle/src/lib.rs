// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Acetate Lifecycle: the selection & annotation lifecycle controller.
//!
//! This crate is the center of the Acetate workspace. [`Annotator`] owns
//! "what is currently selected", mediates between pointer-drawn drafts and
//! the annotation store, runs the create/update/cancel/delete protocols,
//! and implements the headless-vs-interactive save asymmetry:
//!
//! - **Interactive mode**: a visual editor is open for the selection;
//!   changing selection implicitly *cancels* unsaved work on the outgoing
//!   annotation.
//! - **Headless mode**: no editor is shown and the host drives changes
//!   programmatically ([`Annotator::update_selected`],
//!   [`Annotator::save_selected`]); changing selection implicitly
//!   *commits* pending work instead.
//!
//! The controller consumes an [`AnnotationStore`] (the shape layer/index
//! of a rendering integration; [`MemoryStore`] is the flat reference
//! backend) and notifies the host through a single registered sink of
//! typed [`LifecycleEvent`]s. Every annotation crossing that boundary is
//! an owned deep copy, so hosts can never mutate controller state from the
//! outside. All flows run to completion before their entry point returns:
//! the cancel notification for an outgoing selection always precedes any
//! notification for an incoming one.
//!
//! ## Minimal example
//!
//! ```rust
//! use acetate_annotation::{Annotation, Body, Geometry, Target};
//! use acetate_lifecycle::{
//!     Annotator, AnnotatorConfig, ElementId, LifecycleEvent, MemoryStore, SaveOutcome,
//!     StoreSelection,
//! };
//! use kurbo::Rect;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let events = Rc::new(RefCell::new(Vec::new()));
//! let sink = {
//!     let events = events.clone();
//!     move |event| events.borrow_mut().push(event)
//! };
//!
//! let config = AnnotatorConfig {
//!     headless: true,
//!     ..AnnotatorConfig::default()
//! };
//! let mut annotator = Annotator::new(MemoryStore::new(), config, sink);
//!
//! // A drawing gesture produced a draft; the layer reports it as selected.
//! let draft = Annotation::draft(Target::new(
//!     "page-1",
//!     Geometry::Rect(Rect::new(10.0, 10.0, 60.0, 40.0)),
//! ))
//! .with_body(Body::new("a comment"));
//! annotator.handle_select(
//!     Some(StoreSelection {
//!         annotation: draft,
//!         element: ElementId::new(100),
//!     }),
//!     false,
//! );
//!
//! // Headless save: the draft is committed and the host notified once.
//! assert_eq!(annotator.save_selected(), SaveOutcome::Created);
//! let created = events
//!     .borrow()
//!     .iter()
//!     .filter(|e| matches!(e, LifecycleEvent::AnnotationCreated { .. }))
//!     .count();
//! assert_eq!(created, 1);
//! assert_eq!(annotator.get_annotations().len(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod annotator;
mod events;
mod forward;
mod store;

pub use annotator::{Annotator, AnnotatorConfig, EditorContext, LifecycleError, SaveOutcome};
pub use events::LifecycleEvent;
pub use store::{AnnotationStore, ElementId, MemoryStore, StoreSelection};
