// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The annotation store interface the controller writes to, and a flat
//! in-memory reference backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use acetate_annotation::{Annotation, AnnotationId};
use hashbrown::HashMap;

/// A selection as reported by the store/layer: the annotation plus the
/// opaque handle to its on-surface representation.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreSelection<E> {
    /// The selected annotation (a draft from the drawing layer, or a
    /// committed value from the store).
    pub annotation: Annotation,
    /// Opaque handle to the annotation's on-surface representation, owned
    /// by the layer. The controller only reads and forwards it.
    pub element: E,
}

/// Storage and selection surface the lifecycle controller drives.
///
/// Implementations are the annotation layer/index of a rendering
/// integration; [`MemoryStore`] is the flat reference backend. The
/// controller is the store's single writer: it owns the store value and
/// serializes every mutation through `&mut self` entry points.
pub trait AnnotationStore {
    /// Opaque handle to an annotation's on-surface representation.
    type Element: Clone + PartialEq + Debug;

    /// Inserts `annotation`, or replaces the stored value it supersedes.
    ///
    /// `previous` names the value being replaced when the identifier
    /// changed in flight (a draft promoted under a fresh id, or an update
    /// racing an id override); stores use it to find the entry to replace.
    fn add_or_update(&mut self, annotation: Annotation, previous: Option<&Annotation>);

    /// Removes an annotation. Removing a draft or an unknown id is a no-op.
    fn remove(&mut self, annotation: &Annotation);

    /// Returns copies of all stored annotations, in insertion order.
    fn annotations(&self) -> Vec<Annotation>;

    /// Returns the store's current selection, if any.
    fn selected(&self) -> Option<StoreSelection<Self::Element>>;

    /// Selects the annotation stored under `id` and returns it with its
    /// element handle, or `None` when the id is unknown.
    fn select_by_id(&mut self, id: &AnnotationId) -> Option<StoreSelection<Self::Element>>;

    /// Clears the store's selection.
    fn deselect(&mut self);

    /// Renames the annotation stored under `old` to `new`.
    fn override_id(&mut self, old: &AnnotationId, new: AnnotationId);

    /// Replaces the entire contents with `annotations`.
    fn init(&mut self, annotations: Vec<Annotation>);

    /// Shows or hides the layer.
    fn set_visible(&mut self, visible: bool);

    /// Propagates the read-only mode flag to the layer.
    fn set_read_only(&mut self, read_only: bool);

    /// Enables or disables pointer-driven selection in the layer.
    fn set_disable_select(&mut self, disable: bool);

    /// Returns whether pointer-driven selection is disabled.
    fn disable_select(&self) -> bool;

    /// Releases the store and everything it owns.
    fn destroy(&mut self);
}

/// Opaque element handle issued by [`MemoryStore`].
///
/// Handles for stored annotations are issued by the store and never
/// reused. Drafts are owned by the drawing layer, not the store, so
/// integrations fabricate handles for them with [`ElementId::new`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(u32);

impl ElementId {
    /// Creates a handle with an integration-chosen value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }
}

/// Flat in-memory store backend with linear scans.
///
/// Small and simple; good for tiny sets and tests. Entries live in a slot
/// vector with tombstones, plus a hash index from annotation id to slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slots: Vec<Option<(ElementId, Annotation)>>,
    by_id: HashMap<AnnotationId, usize>,
    selected: Option<usize>,
    next_element: u32,
    visible: bool,
    read_only: bool,
    disable_select: bool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    /// Returns `true` if the layer is visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Returns `true` if the layer is read-only.
    #[must_use]
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Returns the number of stored annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns `true` if the store holds no annotations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, annotation: Annotation) {
        let Some(id) = annotation.id().cloned() else {
            // Drafts have no durable identity and are never stored.
            return;
        };
        let element = ElementId(self.next_element);
        self.next_element += 1;
        self.by_id.insert(id, self.slots.len());
        self.slots.push(Some((element, annotation)));
    }

    fn slot_of(&self, id: &AnnotationId) -> Option<usize> {
        self.by_id.get(id).copied()
    }
}

impl AnnotationStore for MemoryStore {
    type Element = ElementId;

    fn add_or_update(&mut self, annotation: Annotation, previous: Option<&Annotation>) {
        let Some(id) = annotation.id().cloned() else {
            return;
        };

        if let Some(slot) = self.slot_of(&id) {
            if let Some(Some((_, stored))) = self.slots.get_mut(slot) {
                *stored = annotation;
            }
            return;
        }

        // The identifier changed in flight: replace the superseded entry,
        // keeping its slot and element handle.
        if let Some(prev_id) = previous.and_then(|p| p.id())
            && let Some(slot) = self.slot_of(prev_id)
        {
            let prev_id = prev_id.clone();
            if let Some(Some((_, stored))) = self.slots.get_mut(slot) {
                *stored = annotation;
                self.by_id.remove(&prev_id);
                self.by_id.insert(id, slot);
            }
            return;
        }

        self.insert(annotation);
    }

    fn remove(&mut self, annotation: &Annotation) {
        let Some(id) = annotation.id() else {
            return;
        };
        if let Some(slot) = self.by_id.remove(id) {
            self.slots[slot] = None;
            if self.selected == Some(slot) {
                self.selected = None;
            }
        }
    }

    fn annotations(&self) -> Vec<Annotation> {
        self.slots
            .iter()
            .filter_map(|s| s.as_ref().map(|(_, a)| a.clone()))
            .collect()
    }

    fn selected(&self) -> Option<StoreSelection<ElementId>> {
        let slot = self.selected?;
        let (element, annotation) = self.slots.get(slot)?.as_ref()?;
        Some(StoreSelection {
            annotation: annotation.clone(),
            element: *element,
        })
    }

    fn select_by_id(&mut self, id: &AnnotationId) -> Option<StoreSelection<ElementId>> {
        let slot = self.slot_of(id)?;
        let (element, annotation) = self.slots.get(slot)?.as_ref()?;
        let selection = StoreSelection {
            annotation: annotation.clone(),
            element: *element,
        };
        self.selected = Some(slot);
        Some(selection)
    }

    fn deselect(&mut self) {
        self.selected = None;
    }

    fn override_id(&mut self, old: &AnnotationId, new: AnnotationId) {
        if let Some(slot) = self.by_id.remove(old) {
            if let Some(Some((_, stored))) = self.slots.get_mut(slot) {
                *stored = stored.clone().into_committed(new.clone());
            }
            self.by_id.insert(new, slot);
        }
    }

    fn init(&mut self, annotations: Vec<Annotation>) {
        self.slots.clear();
        self.by_id.clear();
        self.selected = None;
        for annotation in annotations {
            self.insert(annotation);
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn set_disable_select(&mut self, disable: bool) {
        self.disable_select = disable;
    }

    fn disable_select(&self) -> bool {
        self.disable_select
    }

    fn destroy(&mut self) {
        self.slots.clear();
        self.by_id.clear();
        self.selected = None;
    }
}
