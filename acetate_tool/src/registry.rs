// Copyright 2026 the Acetate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Variant registry of drawing tools, keyed by tool identifier.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use acetate_annotation::Annotation;
use hashbrown::HashMap;

use crate::{DrawingTool, ToolConfig, ToolKind};

/// A registration entry for one tool kind.
pub struct ToolRegistration {
    identifier: &'static str,
    supports: fn(&Annotation) -> bool,
    create: fn(&ToolConfig) -> Box<dyn DrawingTool>,
}

impl ToolRegistration {
    /// Returns the tool identifier.
    #[must_use]
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// Returns `true` if this tool can handle `annotation`.
    #[must_use]
    pub fn supports(&self, annotation: &Annotation) -> bool {
        (self.supports)(annotation)
    }

    /// Instantiates the tool for one gesture.
    #[must_use]
    pub fn instantiate(&self, config: &ToolConfig) -> Box<dyn DrawingTool> {
        (self.create)(config)
    }
}

impl fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// A registry of drawing tools.
///
/// Tools are registered once at startup; the registry answers lookup by
/// identifier, `supports`-based dispatch for a given annotation, and tracks
/// the tool currently active for drawing (the first registered tool by
/// default).
///
/// # Example
///
/// ```rust
/// use acetate_annotation::{Annotation, Geometry, GeometryKind, Target};
/// use acetate_tool::{DrawingTool, ToolConfig, ToolKind, ToolRegistry};
/// # use acetate_annotation::AnnotationId;
/// # use acetate_tool::EditableShape;
/// # use acetate_surface::PointerInput;
/// # use kurbo::{Point, Rect};
/// # #[derive(Default)]
/// # struct RectTool;
/// # impl DrawingTool for RectTool {
/// #     fn is_drawing(&self) -> bool {
/// #         false
/// #     }
/// #     fn start_drawing(&mut self, _: Point, _: &PointerInput) {}
/// #     fn create_editable_shape(&self, _: &Annotation) -> Box<dyn EditableShape> {
/// #         unimplemented!()
/// #     }
/// # }
/// # impl ToolKind for RectTool {
/// #     const IDENTIFIER: &'static str = "rect";
/// #     fn supports(annotation: &Annotation) -> bool {
/// #         annotation.target().geometry().kind() == GeometryKind::Rect
/// #     }
/// #     fn create(_: &ToolConfig) -> Box<dyn DrawingTool> {
/// #         Box::new(RectTool)
/// #     }
/// # }
///
/// let mut registry = ToolRegistry::new();
/// registry.register::<RectTool>();
///
/// let rect = Annotation::committed(
///     AnnotationId::new("#1"),
///     Target::new("page-1", Geometry::Rect(Rect::new(0.0, 0.0, 1.0, 1.0))),
/// );
/// assert_eq!(registry.find_for(&rect).unwrap().identifier(), "rect");
/// ```
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolRegistration>,
    by_identifier: HashMap<&'static str, usize>,
    active: Option<usize>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool kind.
    ///
    /// # Panics
    ///
    /// Panics if a tool with the same identifier is already registered.
    pub fn register<T: ToolKind>(&mut self) {
        assert!(
            !self.by_identifier.contains_key(T::IDENTIFIER),
            "Tool '{}' is already registered",
            T::IDENTIFIER
        );

        let index = self.tools.len();
        self.tools.push(ToolRegistration {
            identifier: T::IDENTIFIER,
            supports: T::supports,
            create: T::create,
        });
        self.by_identifier.insert(T::IDENTIFIER, index);
    }

    /// Returns the registration for `identifier`, if any.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&ToolRegistration> {
        self.by_identifier.get(identifier).map(|&i| &self.tools[i])
    }

    /// Returns the first registered tool whose `supports` predicate accepts
    /// `annotation`.
    #[must_use]
    pub fn find_for(&self, annotation: &Annotation) -> Option<&ToolRegistration> {
        self.tools.iter().find(|t| t.supports(annotation))
    }

    /// Makes `identifier` the active drawing tool.
    ///
    /// # Panics
    ///
    /// Panics if no tool with that identifier is registered.
    pub fn set_active(&mut self, identifier: &str) {
        let index = self
            .by_identifier
            .get(identifier)
            .unwrap_or_else(|| panic!("Tool '{identifier}' is not registered"));
        self.active = Some(*index);
    }

    /// Returns the active drawing tool: the one chosen with
    /// [`ToolRegistry::set_active`], or the first registered tool.
    #[must_use]
    pub fn active(&self) -> Option<&ToolRegistration> {
        match self.active {
            Some(index) => self.tools.get(index),
            None => self.tools.first(),
        }
    }

    /// Returns the identifiers of all registered tools, in registration
    /// order.
    pub fn list(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().map(|t| t.identifier)
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
