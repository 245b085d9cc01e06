// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `acetate_lifecycle` controller.
//!
//! These exercise the selection lifecycle end to end against the in-memory
//! reference store, with a focus on notification ordering, the
//! interactive-vs-headless save asymmetry, and the snapshot/diff rules of
//! the imperative editing API.

use std::cell::RefCell;
use std::rc::Rc;

use acetate_annotation::{Annotation, AnnotationId, Body, Geometry, Target};
use acetate_lifecycle::{
    Annotator, AnnotatorConfig, ElementId, LifecycleError, LifecycleEvent, MemoryStore,
    SaveOutcome, StoreSelection,
};
use kurbo::Rect;

type Event = LifecycleEvent<ElementId>;
type Recorded = Rc<RefCell<Vec<Event>>>;

fn recording_annotator(config: AnnotatorConfig) -> (Annotator<MemoryStore>, Recorded) {
    let events: Recorded = Rc::default();
    let sink_events = events.clone();
    let annotator = Annotator::new(MemoryStore::new(), config, move |event| {
        sink_events.borrow_mut().push(event)
    });
    (annotator, events)
}

fn interactive() -> (Annotator<MemoryStore>, Recorded) {
    recording_annotator(AnnotatorConfig::default())
}

fn headless() -> (Annotator<MemoryStore>, Recorded) {
    recording_annotator(AnnotatorConfig {
        headless: true,
        ..AnnotatorConfig::default()
    })
}

fn rect_target(x0: f64, y0: f64) -> Target {
    Target::new(
        "page-1",
        Geometry::Rect(Rect::new(x0, y0, x0 + 50.0, y0 + 30.0)),
    )
}

fn note(id: &str, body: &str) -> Annotation {
    Annotation::committed(AnnotationId::new(id), rect_target(0.0, 0.0)).with_body(Body::new(body))
}

fn draft_with_body(body: &str) -> Annotation {
    Annotation::draft(rect_target(10.0, 10.0)).with_body(Body::new(body))
}

fn draft_selection(annotation: Annotation) -> Option<StoreSelection<ElementId>> {
    Some(StoreSelection {
        annotation,
        element: ElementId::new(900),
    })
}

fn id(s: &str) -> AnnotationId {
    AnnotationId::new(s)
}

// ----- selection invariants & ordering ----------------------------------

#[test]
fn at_most_one_annotation_is_selected_at_any_instant() {
    let (mut annotator, _events) = interactive();
    annotator.add_annotation(note("#a", "a"));
    annotator.add_annotation(note("#b", "b"));

    annotator.select_annotation(&id("#a"), true);
    assert_eq!(
        annotator.selected_annotation().unwrap().id(),
        Some(&id("#a"))
    );

    annotator.select_annotation(&id("#b"), true);
    assert_eq!(
        annotator.selected_annotation().unwrap().id(),
        Some(&id("#b"))
    );

    annotator.handle_select(None, false);
    assert_eq!(annotator.selected_annotation(), None);
}

#[test]
fn interactive_switch_fires_cancel_for_a_before_anything_for_b() {
    let (mut annotator, events) = interactive();
    annotator.add_annotation(note("#a", "a"));
    annotator.add_annotation(note("#b", "b"));

    annotator.select_annotation(&id("#a"), false);
    annotator.select_annotation(&id("#b"), false);

    let events = events.borrow();
    assert_eq!(events.len(), 3);
    assert!(
        matches!(&events[0], Event::AnnotationSelected { annotation, .. } if annotation.id() == Some(&id("#a")))
    );
    assert!(
        matches!(&events[1], Event::CancelSelected { annotation } if annotation.id() == Some(&id("#a")))
    );
    assert!(
        matches!(&events[2], Event::AnnotationSelected { annotation, .. } if annotation.id() == Some(&id("#b")))
    );
}

#[test]
fn reselecting_the_same_annotation_does_not_cancel() {
    let (mut annotator, events) = interactive();
    annotator.add_annotation(note("#a", "a"));

    annotator.select_annotation(&id("#a"), false);
    annotator.select_annotation(&id("#a"), false);

    assert!(
        events
            .borrow()
            .iter()
            .all(|e| matches!(e, Event::AnnotationSelected { .. }))
    );
}

#[test]
fn selecting_nothing_with_nothing_selected_is_a_no_op() {
    let (mut annotator, events) = interactive();
    annotator.handle_select(None, false);
    assert!(events.borrow().is_empty());
}

#[test]
fn headless_switch_saves_the_modified_outgoing_selection_first() {
    let (mut annotator, events) = headless();
    annotator.add_annotation(note("#a", "a"));
    annotator.add_annotation(note("#b", "b"));

    annotator.select_annotation(&id("#a"), true);
    let edited = note("#a", "a-edited");
    annotator.update_selected(edited.clone(), false).unwrap();

    events.borrow_mut().clear();
    annotator.select_annotation(&id("#b"), false);

    let events = events.borrow();
    assert!(
        matches!(&events[0], Event::AnnotationUpdated { annotation, previous }
            if *annotation == edited && *previous == note("#a", "a")),
        "expected the update for #a to be the first notification, got {:?}",
        events[0]
    );
    assert!(
        matches!(&events[1], Event::AnnotationSelected { annotation, .. } if annotation.id() == Some(&id("#b")))
    );
}

#[test]
fn headless_selection_of_a_committed_annotation_is_reestablished_in_the_store() {
    let (mut annotator, _events) = headless();
    annotator.add_annotation(note("#a", "a"));

    annotator.select_annotation(&id("#a"), false);

    // The store's selection survives the select flow, so the host can keep
    // manipulating the annotation without an explicit selection action.
    assert_eq!(annotator.get_selected(), Some(note("#a", "a")));
    assert!(annotator.selected_element().is_some());
}

// ----- save_selected ----------------------------------------------------

#[test]
fn headless_draft_save_fires_exactly_one_created_notification() {
    let (mut annotator, events) = headless();
    let draft = draft_with_body("a comment");

    annotator.handle_select(draft_selection(draft.clone()), true);
    assert_eq!(annotator.save_selected(), SaveOutcome::Created);

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::AnnotationCreated {
            annotation,
            previous,
        } => {
            assert!(!annotation.is_draft());
            assert_eq!(annotation.bodies(), draft.bodies());
            assert_eq!(previous.as_ref(), Some(&draft));
        }
        other => panic!("expected AnnotationCreated, got {other:?}"),
    }

    // The committed counterpart replaced the draft in the store.
    let stored = annotator.get_annotations();
    assert_eq!(stored.len(), 1);
    assert!(!stored[0].is_draft());
}

#[test]
fn empty_draft_is_committed_under_a_permissive_policy() {
    let (mut annotator, events) = recording_annotator(AnnotatorConfig {
        headless: true,
        allow_empty: true,
        ..AnnotatorConfig::default()
    });

    annotator.handle_select(draft_selection(Annotation::draft(rect_target(0.0, 0.0))), true);
    assert_eq!(annotator.save_selected(), SaveOutcome::Created);

    assert_eq!(events.borrow().len(), 1);
    let stored = annotator.get_annotations();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].bodies().is_empty());
}

#[test]
fn empty_draft_is_discarded_without_notification_under_a_restrictive_policy() {
    let (mut annotator, events) = headless();

    annotator.handle_select(draft_selection(Annotation::draft(rect_target(0.0, 0.0))), true);
    assert_eq!(annotator.save_selected(), SaveOutcome::DiscardedEmpty);

    assert!(events.borrow().is_empty());
    assert!(annotator.get_annotations().is_empty());
}

#[test]
fn saving_an_unmodified_committed_selection_cancels() {
    let (mut annotator, events) = headless();
    annotator.add_annotation(note("#a", "a"));
    annotator.select_annotation(&id("#a"), true);

    assert_eq!(annotator.save_selected(), SaveOutcome::Cancelled);

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert!(
        matches!(&events[0], Event::CancelSelected { annotation } if annotation.id() == Some(&id("#a")))
    );
    assert_eq!(annotator.selected_annotation(), None);
}

#[test]
fn save_with_no_selection_resolves_immediately() {
    let (mut annotator, events) = headless();
    assert_eq!(annotator.save_selected(), SaveOutcome::NothingSelected);
    assert!(events.borrow().is_empty());
}

#[test]
fn geometry_only_drag_reports_the_annotation_as_its_own_previous() {
    let (mut annotator, events) = headless();
    let original = note("#a", "a");
    annotator.add_annotation(original.clone());
    annotator.select_annotation(&id("#a"), true);

    let dragged = rect_target(99.0, 99.0);
    let element = *annotator.selected_element().unwrap();
    annotator.handle_update_target(element, dragged.clone());

    // Deselect: in headless mode this implicitly saves.
    annotator.handle_select(None, true);

    let events = events.borrow();
    let mut updates = events
        .iter()
        .filter(|e| matches!(e, Event::AnnotationUpdated { .. }));
    match updates.next() {
        Some(Event::AnnotationUpdated {
            annotation,
            previous,
        }) => {
            // Previous is the pre-drag value; the update differs only in target.
            assert_eq!(*previous, original);
            assert_eq!(annotation.target(), &dragged);
            assert_eq!(annotation.bodies(), original.bodies());
            assert_eq!(annotation.id(), original.id());
        }
        other => panic!("expected AnnotationUpdated, got {other:?}"),
    }
    assert!(updates.next().is_none(), "exactly one update expected");
}

#[test]
fn target_changes_are_forwarded_as_they_happen() {
    let (mut annotator, events) = interactive();
    annotator.add_annotation(note("#a", "a"));
    annotator.select_annotation(&id("#a"), true);

    let dragged = rect_target(5.0, 5.0);
    let element = *annotator.selected_element().unwrap();
    annotator.handle_update_target(element, dragged.clone());

    assert!(
        matches!(events.borrow().last(), Some(Event::SelectionTargetChanged { target }) if *target == dragged)
    );
    assert_eq!(annotator.modified_target(), Some(&dragged));
}

// ----- update_selected --------------------------------------------------

#[test]
fn staged_updates_diff_against_the_value_selected_before_the_first_one() {
    let (mut annotator, events) = headless();
    let original = note("#a", "a");
    annotator.add_annotation(original.clone());
    annotator.select_annotation(&id("#a"), true);

    let v1 = note("#a", "v1");
    let v2 = note("#a", "v2");
    annotator.update_selected(v1, false).unwrap();
    annotator.update_selected(v2.clone(), false).unwrap();

    assert_eq!(annotator.save_selected(), SaveOutcome::Updated);

    let events = events.borrow();
    let updates: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::AnnotationUpdated {
                annotation,
                previous,
            } => Some((annotation.clone(), previous.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(updates.len(), 1);

    let (annotation, previous) = &updates[0];
    assert_eq!(*annotation, v2);
    // The snapshot reflects the pre-modification original, not v1.
    assert_eq!(*previous, original);
}

#[test]
fn update_selected_with_save_immediately_runs_the_update_flow_at_once() {
    let (mut annotator, events) = headless();
    let original = note("#a", "a");
    annotator.add_annotation(original.clone());
    annotator.select_annotation(&id("#a"), true);

    let edited = note("#a", "edited");
    annotator.update_selected(edited.clone(), true).unwrap();

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], Event::AnnotationUpdated { annotation, previous }
        if *annotation == edited && *previous == original));

    assert_eq!(annotator.selected_annotation(), None);
    assert_eq!(annotator.get_annotations(), [edited]);
}

#[test]
fn update_selected_on_a_draft_with_save_immediately_runs_the_create_flow() {
    let (mut annotator, events) = headless();
    annotator.handle_select(draft_selection(draft_with_body("first")), true);

    let revised = Annotation::draft(rect_target(10.0, 10.0)).with_body(Body::new("revised"));
    annotator.update_selected(revised, true).unwrap();

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::AnnotationCreated {
            annotation,
            previous,
        } => {
            assert!(!annotation.is_draft());
            assert_eq!(annotation.bodies()[0].value(), "revised");
            assert_eq!(*previous, None);
        }
        other => panic!("expected AnnotationCreated, got {other:?}"),
    }
}

#[test]
fn update_selected_without_a_selection_fails_fast() {
    let (mut annotator, events) = headless();
    let result = annotator.update_selected(note("#a", "a"), false);
    assert_eq!(result, Err(LifecycleError::NoActiveSelection));
    assert!(events.borrow().is_empty());
}

#[test]
fn editing_is_rejected_in_read_only_mode() {
    let (mut annotator, _events) = recording_annotator(AnnotatorConfig {
        read_only: true,
        ..AnnotatorConfig::default()
    });
    annotator.add_annotation(note("#a", "a"));
    annotator.select_annotation(&id("#a"), true);

    assert_eq!(
        annotator.update_selected(note("#a", "edited"), true),
        Err(LifecycleError::ReadOnly)
    );
    assert_eq!(annotator.delete_selected(), Err(LifecycleError::ReadOnly));
    assert_eq!(annotator.get_annotations(), [note("#a", "a")]);
}

// ----- escape & cancellation --------------------------------------------

#[test]
fn escape_with_an_open_empty_draft_fires_exactly_one_cancel() {
    let (mut annotator, events) = interactive();
    annotator.handle_select(draft_selection(Annotation::draft(rect_target(0.0, 0.0))), true);

    annotator.on_escape();

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], Event::CancelSelected { annotation } if annotation.is_draft()));
    assert_eq!(annotator.selected_annotation(), None);
}

#[test]
fn escape_without_a_selection_is_inert() {
    let (mut annotator, events) = interactive();
    annotator.on_escape();
    assert!(events.borrow().is_empty());
}

#[test]
fn cancel_selected_is_silent() {
    let (mut annotator, events) = interactive();
    annotator.add_annotation(note("#a", "a"));
    annotator.select_annotation(&id("#a"), true);

    annotator.cancel_selected();

    assert!(events.borrow().is_empty());
    assert_eq!(annotator.selected_annotation(), None);
    assert_eq!(annotator.get_selected(), None);
}

// ----- delete & editor flows --------------------------------------------

#[test]
fn delete_selected_removes_from_the_store_and_notifies() {
    let (mut annotator, events) = interactive();
    annotator.add_annotation(note("#a", "a"));
    annotator.select_annotation(&id("#a"), true);

    annotator.delete_selected().unwrap();

    assert!(
        matches!(events.borrow().last(), Some(Event::AnnotationDeleted { annotation })
            if annotation.id() == Some(&id("#a")))
    );
    assert!(annotator.get_annotations().is_empty());
    assert_eq!(annotator.selected_annotation(), None);
}

#[test]
fn editor_commit_merges_the_pending_geometry_change() {
    let (mut annotator, events) = interactive();
    let original = note("#a", "a");
    annotator.add_annotation(original.clone());
    annotator.select_annotation(&id("#a"), true);

    let dragged = rect_target(40.0, 40.0);
    let element = *annotator.selected_element().unwrap();
    annotator.handle_update_target(element, dragged.clone());

    let edited = note("#a", "edited");
    annotator
        .commit_from_editor(edited, Some(original.clone()))
        .unwrap();

    match events.borrow().last() {
        Some(Event::AnnotationUpdated {
            annotation,
            previous,
        }) => {
            assert_eq!(annotation.bodies()[0].value(), "edited");
            assert_eq!(annotation.target(), &dragged);
            assert_eq!(*previous, original);
        }
        other => panic!("expected AnnotationUpdated, got {other:?}"),
    }
}

#[test]
fn editor_context_exists_only_interactively_with_an_open_selection() {
    let (mut annotator, _events) = interactive();
    assert!(annotator.editor_context().is_none());

    annotator.add_annotation(note("#a", "a"));
    annotator.select_annotation(&id("#a"), true);
    {
        let context = annotator.editor_context().unwrap();
        assert_eq!(context.annotation.id(), Some(&id("#a")));
        assert!(!context.read_only);
        assert!(context.element.is_some());
    }

    annotator.set_headless(true);
    assert!(annotator.editor_context().is_none());
}

// ----- id override ------------------------------------------------------

#[test]
fn id_override_with_an_open_selection_force_closes_it_first() {
    let (mut annotator, _events) = headless();
    annotator.handle_select(draft_selection(draft_with_body("note")), true);
    annotator.save_selected();

    let auto_id = annotator.get_annotations()[0].id().unwrap().clone();
    annotator.select_annotation(&auto_id, true);
    assert!(annotator.selected_annotation().is_some());

    annotator.override_annotation_id(&auto_id, id("urn:example:1"));

    assert_eq!(annotator.selected_annotation(), None);
    let stored = annotator.get_annotations();
    assert_eq!(stored[0].id(), Some(&id("urn:example:1")));
}

#[test]
fn autogenerated_ids_are_unique_per_controller() {
    let (mut annotator, _events) = headless();

    annotator.handle_select(draft_selection(draft_with_body("one")), true);
    annotator.save_selected();
    annotator.handle_select(draft_selection(draft_with_body("two")), true);
    annotator.save_selected();

    let stored = annotator.get_annotations();
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].id(), stored[1].id());
}

// ----- programmatic selection misses & visibility -----------------------

#[test]
fn selecting_an_unknown_id_clears_selection_state() {
    let (mut annotator, _events) = interactive();
    annotator.add_annotation(note("#a", "a"));
    annotator.select_annotation(&id("#a"), true);

    assert_eq!(annotator.select_annotation(&id("#missing"), true), None);
    assert_eq!(annotator.selected_annotation(), None);
}

#[test]
fn hiding_the_layer_clears_selection_silently() {
    let (mut annotator, events) = interactive();
    annotator.add_annotation(note("#a", "a"));
    annotator.select_annotation(&id("#a"), true);

    annotator.set_visible(false);

    assert!(events.borrow().is_empty());
    assert_eq!(annotator.selected_annotation(), None);
}

// ----- drawing tools ----------------------------------------------------

mod rect_tool {
    use acetate_annotation::{Annotation, GeometryKind};
    use acetate_surface::PointerInput;
    use acetate_tool::{DrawingTool, EditableShape, ToolConfig, ToolKind};
    use kurbo::Point;

    struct RectShape(Annotation);

    impl EditableShape for RectShape {
        fn annotation(&self) -> &Annotation {
            &self.0
        }
        fn scale_handles(&mut self, _factor: f64) {}
    }

    #[derive(Default)]
    pub struct RectTool {
        drawing: bool,
    }

    impl DrawingTool for RectTool {
        fn is_drawing(&self) -> bool {
            self.drawing
        }
        fn start_drawing(&mut self, _pos: Point, _input: &PointerInput) {
            self.drawing = true;
        }
        fn create_editable_shape(&self, annotation: &Annotation) -> Box<dyn EditableShape> {
            Box::new(RectShape(annotation.clone()))
        }
    }

    impl ToolKind for RectTool {
        const IDENTIFIER: &'static str = "rect";
        fn supports(annotation: &Annotation) -> bool {
            annotation.target().geometry().kind() == GeometryKind::Rect
        }
        fn create(_config: &ToolConfig) -> Box<dyn DrawingTool> {
            Box::new(Self::default())
        }
    }
}

#[test]
fn drawing_tool_registration_and_dispatch() {
    let (mut annotator, _events) = interactive();
    annotator.register_tool::<rect_tool::RectTool>();

    assert_eq!(annotator.list_drawing_tools().collect::<Vec<_>>(), ["rect"]);
    annotator.set_drawing_tool("rect");

    let stored = note("#a", "a");
    assert_eq!(
        annotator.find_tool_for(&stored).unwrap().identifier(),
        "rect"
    );

    let mut tool = annotator.instantiate_drawing_tool().unwrap();
    assert!(!tool.is_drawing());
    tool.start_drawing(
        kurbo::Point::new(1.0, 1.0),
        &acetate_surface::PointerInput::mouse(kurbo::Point::new(1.0, 1.0)),
    );
    assert!(tool.is_drawing());
}

// ----- host boundary cloning --------------------------------------------

#[test]
fn values_crossing_the_host_boundary_are_deep_copies() {
    let (mut annotator, events) = interactive();
    annotator.add_annotation(note("#a", "a"));
    annotator.select_annotation(&id("#a"), false);

    // Take the annotation out of the notification and derive a mutated
    // value from it; internal state must be unaffected.
    let received = match &events.borrow()[0] {
        Event::AnnotationSelected { annotation, .. } => annotation.clone(),
        other => panic!("expected AnnotationSelected, got {other:?}"),
    };
    let _mutated = received.with_bodies([Body::new("mutated")]);

    assert_eq!(
        annotator.selected_annotation().unwrap().bodies()[0].value(),
        "a"
    );
    assert_eq!(annotator.get_annotations()[0].bodies()[0].value(), "a");
}

#[test]
fn hover_and_click_forwarding_carries_clones() {
    let (mut annotator, events) = interactive();
    let stored = note("#a", "a");
    annotator.add_annotation(stored.clone());
    let selection = annotator.select_annotation(&id("#a"), true).unwrap();
    let element = *annotator.selected_element().unwrap();

    annotator.notify_pointer_enter(&selection, element);
    annotator.notify_click(&selection, element);
    annotator.notify_pointer_leave(&selection, element);

    let events = events.borrow();
    assert!(matches!(&events[0], Event::PointerEnterAnnotation { annotation, .. } if *annotation == stored));
    assert!(matches!(&events[1], Event::AnnotationClicked { annotation, .. } if *annotation == stored));
    assert!(matches!(&events[2], Event::PointerLeaveAnnotation { annotation, .. } if *annotation == stored));
}
