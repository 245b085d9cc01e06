// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The extension contract concrete shape tools implement.

use alloc::boxed::Box;

use acetate_annotation::Annotation;
use acetate_handles::HandleConfig;
use acetate_surface::PointerInput;
use kurbo::Point;

/// Configuration handed to tools when they are instantiated.
#[derive(Clone, Debug, Default)]
pub struct ToolConfig {
    /// Handle configuration for editable shapes produced by the tool.
    pub handles: HandleConfig,
}

/// Per-instance capabilities of a drawing tool.
///
/// One instance exists per drawing gesture; the layer creates it through
/// [`ToolKind::create`] when a gesture begins on empty space.
pub trait DrawingTool {
    /// Returns `true` while a shape is under construction.
    fn is_drawing(&self) -> bool;

    /// Begins a new shape at `pos` (surface-local coordinates).
    fn start_drawing(&mut self, pos: Point, input: &PointerInput);

    /// Produces the handle-manipulable editable representation of an
    /// existing committed annotation, used when an annotation of this
    /// tool's shape kind is selected for interactive reshaping.
    fn create_editable_shape(&self, annotation: &Annotation) -> Box<dyn EditableShape>;
}

/// Type-level capabilities of a drawing tool, used for registration.
pub trait ToolKind {
    /// Stable identifier of the tool, unique within a registry.
    const IDENTIFIER: &'static str;

    /// Returns `true` if this tool can draw and edit `annotation`'s
    /// geometry kind.
    fn supports(annotation: &Annotation) -> bool;

    /// Instantiates the tool for one gesture.
    fn create(config: &ToolConfig) -> Box<dyn DrawingTool>;
}

/// The editable, handle-manipulable representation of a committed
/// annotation, produced by [`DrawingTool::create_editable_shape`].
pub trait EditableShape {
    /// Returns the annotation this shape edits.
    fn annotation(&self) -> &Annotation;

    /// Rescales the shape's drag handles; see
    /// [`HandleSet::scale`](acetate_handles::HandleSet::scale).
    fn scale_handles(&mut self, factor: f64);

    /// Releases any resources owned by the shape.
    fn destroy(&mut self) {}
}
