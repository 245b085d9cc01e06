// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The selection & annotation lifecycle controller.

use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use core::fmt;

use acetate_annotation::{Annotation, AnnotationId, Target};
use acetate_handles::HandleConfig;
use acetate_tool::{DrawingTool, ToolConfig, ToolKind, ToolRegistration, ToolRegistry};
use kurbo::Point;

use crate::events::LifecycleEvent;
use crate::store::{AnnotationStore, StoreSelection};

/// Configuration surface of an [`Annotator`].
#[derive(Clone, Debug)]
pub struct AnnotatorConfig {
    /// Suppresses all edits.
    pub read_only: bool,
    /// Runs without the embedded editor; selection changes implicitly
    /// commit pending edits instead of cancelling them.
    pub headless: bool,
    /// Allows committing drafts that carry no content bodies.
    pub allow_empty: bool,
    /// Base radius for drag handles, in surface units.
    pub handle_radius: f64,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            headless: false,
            allow_empty: false,
            handle_radius: acetate_handles::DEFAULT_HANDLE_RADIUS,
        }
    }
}

/// Error from the imperative editing API.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LifecycleError {
    /// The operation requires an active selection and none exists.
    NoActiveSelection,
    /// The controller is in read-only mode.
    ReadOnly,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveSelection => f.write_str("no active selection"),
            Self::ReadOnly => f.write_str("annotator is read-only"),
        }
    }
}

impl core::error::Error for LifecycleError {}

/// How [`Annotator::save_selected`] resolved the current selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// There was no selection to resolve.
    NothingSelected,
    /// A draft was promoted and written to the store.
    Created,
    /// A committed annotation was updated in the store.
    Updated,
    /// The selection was unmodified; its edit was cancelled.
    Cancelled,
    /// An empty draft was dropped under the restrictive empty-content
    /// policy, with no notification.
    DiscardedEmpty,
}

/// Everything the embedded editor widget needs about the open selection.
///
/// Only available in interactive mode while a selection is open; see
/// [`Annotator::editor_context`].
#[derive(Debug)]
pub struct EditorContext<'a, E> {
    /// The selected annotation.
    pub annotation: &'a Annotation,
    /// Pending geometry-only modification, if a handle drag happened.
    pub modified_target: Option<&'a Target>,
    /// The selection's on-surface representation.
    pub element: Option<&'a E>,
    /// Whether editing controls must be suppressed.
    pub read_only: bool,
    /// Whether the editor may save annotations with no content.
    pub allow_empty: bool,
}

/// Selection state: one episode of editing focus.
struct SelectionState<E> {
    annotation: Option<Annotation>,
    element: Option<E>,
    modified_target: Option<Target>,
    before_modify: Option<Annotation>,
}

impl<E> SelectionState<E> {
    fn clear(&mut self) {
        self.annotation = None;
        self.element = None;
        self.modified_target = None;
        self.before_modify = None;
    }
}

impl<E> Default for SelectionState<E> {
    fn default() -> Self {
        Self {
            annotation: None,
            element: None,
            modified_target: None,
            before_modify: None,
        }
    }
}

enum CommitKind {
    Create { previous: Option<Annotation> },
    Update { previous: Annotation },
}

/// The selection & annotation lifecycle controller.
///
/// An `Annotator` owns the annotation store, the selection state, and the
/// registry of drawing tools, and is the single writer for all of them:
/// every entry point takes `&mut self`, so all state transitions are
/// serialized by construction. Host notifications are delivered to the
/// sink registered at construction, and every notification completes
/// before the operation that caused it returns: the cancel flow for an
/// outgoing selection always finishes before the select flow for an
/// incoming one begins.
///
/// See the [crate docs](crate) for the interactive vs. headless
/// asymmetry.
pub struct Annotator<S: AnnotationStore> {
    store: S,
    config: AnnotatorConfig,
    sink: Box<dyn FnMut(LifecycleEvent<S::Element>)>,
    selection: SelectionState<S::Element>,
    tools: ToolRegistry,
    tool_config: ToolConfig,
    next_id: u64,
}

impl<S: AnnotationStore> Annotator<S> {
    /// Creates a controller over `store`, delivering notifications to
    /// `sink`.
    pub fn new(
        store: S,
        config: AnnotatorConfig,
        sink: impl FnMut(LifecycleEvent<S::Element>) + 'static,
    ) -> Self {
        let tool_config = ToolConfig {
            handles: HandleConfig {
                base_radius: config.handle_radius,
                ..HandleConfig::default()
            },
        };
        Self {
            store,
            config,
            sink: Box::new(sink),
            selection: SelectionState::default(),
            tools: ToolRegistry::new(),
            tool_config,
            next_id: 0,
        }
    }

    pub(crate) fn emit(&mut self, event: LifecycleEvent<S::Element>) {
        (self.sink)(event);
    }

    fn next_auto_id(&mut self) -> AnnotationId {
        self.next_id += 1;
        AnnotationId::new(format!("#{}", self.next_id))
    }

    // ----- selection entry points ---------------------------------------

    /// Forwards a gesture's one-shot start notification to the host.
    pub fn handle_start_selection(&mut self, point: Point) {
        self.emit(LifecycleEvent::SelectionStarted { point });
    }

    /// Entry point from the drawing/layer subsystem whenever pointer
    /// interaction yields a draft, a committed annotation, or nothing
    /// (empty-space click).
    ///
    /// `skip_event` suppresses the outbound select notification; the host
    /// passes `true` when it initiated the selection itself, to avoid echo
    /// loops.
    pub fn handle_select(
        &mut self,
        selection: Option<StoreSelection<S::Element>>,
        skip_event: bool,
    ) {
        if self.config.headless {
            self.headless_select(selection, skip_event);
        } else {
            self.normal_select(selection, skip_event);
        }
    }

    /// Selection processing in interactive mode: changing selection
    /// abandons unsaved work on the outgoing annotation.
    fn normal_select(&mut self, selection: Option<StoreSelection<S::Element>>, skip_event: bool) {
        match selection {
            Some(StoreSelection {
                annotation,
                element,
            }) => {
                // An outgoing, different selection is cancelled first, and
                // its notification completes before the new selection is
                // announced.
                if let Some(previous) = self.selection.annotation.clone()
                    && !previous.same_identity(&annotation)
                {
                    self.selection.clear();
                    self.emit(LifecycleEvent::CancelSelected {
                        annotation: previous,
                    });
                }

                self.selection.annotation = Some(annotation.clone());
                self.selection.element = Some(element.clone());
                self.selection.modified_target = None;
                self.selection.before_modify = None;

                if !skip_event {
                    if annotation.is_draft() {
                        self.emit(LifecycleEvent::SelectionCreated { annotation });
                    } else {
                        self.emit(LifecycleEvent::AnnotationSelected {
                            annotation,
                            element,
                        });
                    }
                }
            }
            None => {
                let previous = self.selection.annotation.take();
                self.selection.clear();
                if let Some(annotation) = previous {
                    self.emit(LifecycleEvent::CancelSelected { annotation });
                }
            }
        }
    }

    /// Selection processing in headless mode: the outgoing selection's
    /// fate is resolved (saved or cancelled) before the new target is
    /// processed, and committed targets are immediately re-selected so the
    /// host can keep manipulating them.
    fn headless_select(&mut self, selection: Option<StoreSelection<S::Element>>, skip_event: bool) {
        self.save_selected();
        self.normal_select(selection.clone(), skip_event);

        if let Some(incoming) = selection
            && !incoming.annotation.is_draft()
            && let Some(id) = incoming.annotation.id()
            && let Some(reselected) = self.store.select_by_id(id)
        {
            self.selection.element = Some(reselected.element);
        }
    }

    /// Records a direct-manipulation geometry change (handle drag) and
    /// notifies the host with a copy of the pending target.
    pub fn handle_update_target(&mut self, element: S::Element, target: Target) {
        self.selection.element = Some(element);
        self.selection.modified_target = Some(target.clone());
        self.emit(LifecycleEvent::SelectionTargetChanged { target });
    }

    // ----- save / update / cancel / delete flows ------------------------

    /// Resolves the current selection's pending state.
    ///
    /// All resulting notifications complete before this returns; the
    /// outcome reports which flow ran.
    pub fn save_selected(&mut self) -> SaveOutcome {
        let Some(annotation) = self.selection.annotation.clone() else {
            return SaveOutcome::NothingSelected;
        };

        if annotation.is_draft() {
            if !annotation.bodies().is_empty() || self.config.allow_empty {
                self.commit(
                    annotation.clone(),
                    CommitKind::Create {
                        previous: Some(annotation),
                    },
                );
                SaveOutcome::Created
            } else {
                // The empty draft disappears from the layer's view with no
                // notification; controller state is replaced by whatever
                // selection comes next.
                self.store.deselect();
                SaveOutcome::DiscardedEmpty
            }
        } else if let Some(previous) = self.selection.before_modify.clone() {
            // Content was modified through `update_selected`; diff against
            // the pre-modification snapshot.
            self.commit(annotation, CommitKind::Update { previous });
            SaveOutcome::Updated
        } else if self.selection.modified_target.is_some() {
            // Geometry-only change: the annotation acts as its own
            // "previous", signalling a target-only update.
            self.commit(
                annotation.clone(),
                CommitKind::Update {
                    previous: annotation,
                },
            );
            SaveOutcome::Updated
        } else {
            self.cancel_annotation(annotation);
            SaveOutcome::Cancelled
        }
    }

    /// Common tail of the create and update flows: merge the pending
    /// geometry change, close the selection, write to the store, notify.
    fn commit(&mut self, annotation: Annotation, kind: CommitKind) {
        let annotation = if annotation.is_draft() {
            let id = self.next_auto_id();
            annotation.into_committed(id)
        } else {
            annotation
        };

        let annotation = match self.selection.modified_target.take() {
            Some(target) => annotation.with_target(target),
            None => annotation,
        };

        self.selection.clear();
        self.store.deselect();

        let previous_ref = match &kind {
            CommitKind::Create { previous } => previous.as_ref(),
            CommitKind::Update { previous } => Some(previous),
        };
        self.store.add_or_update(annotation.clone(), previous_ref);

        match kind {
            CommitKind::Create { previous } => {
                self.emit(LifecycleEvent::AnnotationCreated {
                    annotation,
                    previous,
                });
            }
            CommitKind::Update { previous } => {
                self.emit(LifecycleEvent::AnnotationUpdated {
                    annotation,
                    previous,
                });
            }
        }
    }

    fn cancel_annotation(&mut self, annotation: Annotation) {
        self.store.deselect();
        self.emit(LifecycleEvent::CancelSelected { annotation });
        self.selection.clear();
    }

    /// Imperative, host-driven modification of the current selection.
    ///
    /// With `save_immediately`, the new value is committed at once (create
    /// flow for drafts, update flow for committed annotations). Otherwise
    /// the value is staged in memory, and the first staged modification of
    /// a selection episode records the pre-modification snapshot that
    /// [`Annotator::save_selected`] later reports as "previous".
    pub fn update_selected(
        &mut self,
        annotation: Annotation,
        save_immediately: bool,
    ) -> Result<(), LifecycleError> {
        if self.config.read_only {
            return Err(LifecycleError::ReadOnly);
        }
        let Some(current) = self.selection.annotation.clone() else {
            return Err(LifecycleError::NoActiveSelection);
        };

        if save_immediately {
            if current.is_draft() {
                self.commit(annotation, CommitKind::Create { previous: None });
            } else {
                self.commit(annotation, CommitKind::Update { previous: current });
            }
        } else {
            if self.selection.before_modify.is_none() {
                self.selection.before_modify = Some(current);
            }
            self.selection.annotation = Some(annotation);
        }
        Ok(())
    }

    /// Deletes the currently selected annotation.
    pub fn delete_selected(&mut self) -> Result<(), LifecycleError> {
        if self.config.read_only {
            return Err(LifecycleError::ReadOnly);
        }
        let Some(annotation) = self.selection.annotation.clone() else {
            return Err(LifecycleError::NoActiveSelection);
        };

        self.selection.clear();
        self.store.remove(&annotation);
        self.emit(LifecycleEvent::AnnotationDeleted { annotation });
        Ok(())
    }

    /// Commits the editor widget's OK action: create flow when `previous`
    /// is absent, update flow otherwise.
    pub fn commit_from_editor(
        &mut self,
        annotation: Annotation,
        previous: Option<Annotation>,
    ) -> Result<(), LifecycleError> {
        if self.config.read_only {
            return Err(LifecycleError::ReadOnly);
        }
        match previous {
            Some(previous) => self.commit(annotation, CommitKind::Update { previous }),
            None => self.commit(annotation, CommitKind::Create { previous: None }),
        }
        Ok(())
    }

    /// Abandons the current edit from the editor widget's cancel action,
    /// with a cancel notification.
    pub fn cancel_from_editor(&mut self) {
        if let Some(annotation) = self.selection.annotation.clone() {
            self.cancel_annotation(annotation);
        }
    }

    /// Deselects and clears selection state, without any notification.
    pub fn cancel_selected(&mut self) {
        self.store.deselect();
        if self.selection.annotation.is_some() {
            self.selection.clear();
        }
    }

    /// Cancels the current selection in response to the Escape key: the
    /// selection is closed and a cancel notification follows. Inert when
    /// nothing is selected.
    pub fn on_escape(&mut self) {
        if let Some(annotation) = self.selection.annotation.clone() {
            self.cancel_selected();
            self.emit(LifecycleEvent::CancelSelected { annotation });
        }
    }

    // ----- programmatic selection & id override -------------------------

    /// Selects the annotation stored under `id` and routes it through
    /// [`Annotator::handle_select`]. Returns a copy of the selected value,
    /// or clears selection state when the id is unknown.
    pub fn select_annotation(
        &mut self,
        id: &AnnotationId,
        skip_event: bool,
    ) -> Option<Annotation> {
        match self.store.select_by_id(id) {
            Some(selection) => {
                let annotation = selection.annotation.clone();
                self.handle_select(Some(selection), skip_event);
                Some(annotation)
            }
            None => {
                self.selection.clear();
                None
            }
        }
    }

    /// Replaces an annotation's autogenerated identifier with `forced`.
    ///
    /// If a selection is still open it is force-closed first; renaming
    /// under an open edit would leave the edit referencing a stale
    /// identifier.
    pub fn override_annotation_id(&mut self, original: &AnnotationId, forced: AnnotationId) {
        if self.selection.annotation.is_some() {
            self.selection.clear();
        }
        self.store.override_id(original, forced);
    }

    // ----- store passthroughs -------------------------------------------

    /// Adds (or replaces) an annotation in the store.
    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.store.add_or_update(annotation, None);
    }

    /// Removes an annotation from the store.
    pub fn remove_annotation(&mut self, annotation: &Annotation) {
        self.store.remove(annotation);
    }

    /// Replaces the store's contents.
    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.store.init(annotations);
    }

    /// Returns copies of all stored annotations.
    #[must_use]
    pub fn get_annotations(&self) -> Vec<Annotation> {
        self.store.annotations()
    }

    /// Returns a copy of the store's current selection, if any.
    #[must_use]
    pub fn get_selected(&self) -> Option<Annotation> {
        self.store.selected().map(|s| s.annotation)
    }

    /// Shows or hides the layer; hiding clears selection state silently.
    pub fn set_visible(&mut self, visible: bool) {
        self.store.set_visible(visible);
        if !visible {
            self.selection.clear();
        }
    }

    /// Releases the store and clears all controller state.
    pub fn destroy(&mut self) {
        self.selection.clear();
        self.store.destroy();
    }

    // ----- configuration ------------------------------------------------

    /// Returns the controller configuration.
    #[must_use]
    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Sets read-only mode, propagating the flag to the store.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.config.read_only = read_only;
        self.store.set_read_only(read_only);
    }

    /// Switches between headless and interactive mode.
    pub fn set_headless(&mut self, headless: bool) {
        self.config.headless = headless;
    }

    /// Enables or disables pointer-driven selection in the layer.
    pub fn set_disable_select(&mut self, disable: bool) {
        self.store.set_disable_select(disable);
    }

    /// Returns whether pointer-driven selection is disabled.
    #[must_use]
    pub fn disable_select(&self) -> bool {
        self.store.disable_select()
    }

    // ----- drawing tools ------------------------------------------------

    /// Registers a drawing tool kind.
    ///
    /// # Panics
    ///
    /// Panics if a tool with the same identifier is already registered.
    pub fn register_tool<T: ToolKind>(&mut self) {
        self.tools.register::<T>();
    }

    /// Makes `identifier` the active drawing tool.
    ///
    /// # Panics
    ///
    /// Panics if no tool with that identifier is registered.
    pub fn set_drawing_tool(&mut self, identifier: &str) {
        self.tools.set_active(identifier);
    }

    /// Returns the identifiers of all registered drawing tools.
    pub fn list_drawing_tools(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.list()
    }

    /// Returns the registered tool that can handle `annotation`, if any.
    #[must_use]
    pub fn find_tool_for(&self, annotation: &Annotation) -> Option<&ToolRegistration> {
        self.tools.find_for(annotation)
    }

    /// Instantiates the active drawing tool for one gesture, configured
    /// with this controller's handle settings.
    #[must_use]
    pub fn instantiate_drawing_tool(&self) -> Option<Box<dyn DrawingTool>> {
        self.tools.active().map(|t| t.instantiate(&self.tool_config))
    }

    // ----- introspection ------------------------------------------------

    /// Returns the annotation currently under focus, if any.
    #[must_use]
    pub fn selected_annotation(&self) -> Option<&Annotation> {
        self.selection.annotation.as_ref()
    }

    /// Returns the selection's on-surface element handle, if any.
    #[must_use]
    pub fn selected_element(&self) -> Option<&S::Element> {
        self.selection.element.as_ref()
    }

    /// Returns the pending geometry-only modification, if any.
    #[must_use]
    pub fn modified_target(&self) -> Option<&Target> {
        self.selection.modified_target.as_ref()
    }

    /// Returns the store. Read access only; the controller is the single
    /// writer.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the embedded-editor interface: present exactly when a
    /// selection is open and the controller is not headless.
    #[must_use]
    pub fn editor_context(&self) -> Option<EditorContext<'_, S::Element>> {
        if self.config.headless {
            return None;
        }
        let annotation = self.selection.annotation.as_ref()?;
        Some(EditorContext {
            annotation,
            modified_target: self.selection.modified_target.as_ref(),
            element: self.selection.element.as_ref(),
            read_only: self.config.read_only,
            allow_empty: self.config.allow_empty,
        })
    }
}

impl<S: AnnotationStore + fmt::Debug> fmt::Debug for Annotator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotator")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("selected", &self.selection.annotation)
            .field("modified_target", &self.selection.modified_target.is_some())
            .finish_non_exhaustive()
    }
}
