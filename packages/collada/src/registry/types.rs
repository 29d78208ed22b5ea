//! Types for the element registry system.

use std::collections::BTreeSet;
use std::fmt;

/// Runtime kind of an element, decided once when the node is created.
///
/// Each built-in kind has a typed view in [`crate::elements`]. Host code can
/// introduce further kinds through [`ElementKind::Custom`]; anything the
/// registry does not know becomes [`ElementKind::Generic`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Collada,
    Asset,
    Unit,
    /// Any `library_*` container.
    Library,
    Image,
    Effect,
    ProfileCommon,
    NewParam,
    Surface,
    Sampler2D,
    Technique,
    TechniqueCommon,
    /// `phong`, `lambert`, `blinn` or `constant`.
    Shader,
    /// `diffuse`, `ambient`, `emission`, `specular` and friends.
    ColorOrTexture,
    Texture,
    Color,
    Material,
    InstanceEffect,
    Geometry,
    Mesh,
    Source,
    FloatArray,
    Accessor,
    Param,
    Input,
    Vertices,
    Triangles,
    VisualScene,
    /// A scene graph `<node>`.
    SceneNode,
    Matrix,
    InstanceGeometry,
    InstanceMaterial,
    Scene,
    InstanceVisualScene,
    /// A kind registered by host code.
    Custom(String),
    /// Fallback for unregistered elements: fields only, no typed view.
    Generic,
}

impl ElementKind {
    /// Whether this is the fallback kind.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        matches!(self, ElementKind::Generic)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Custom(name) => write!(f, "Custom({name})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Recipe for building the nodes of one element key.
///
/// A factory names the [`ElementKind`] it produces and the child fields that
/// collect every occurrence instead of keeping the last one. Factories are
/// plain data and compare by value, so registering an identical factory
/// twice is recognizable as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementFactory {
    kind: ElementKind,
    multi_valued: BTreeSet<String>,
}

impl ElementFactory {
    /// Create a factory for `kind` with only single-valued fields.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            multi_valued: BTreeSet::new(),
        }
    }

    /// Mark child fields as multi-valued.
    #[must_use]
    pub fn with_multi_valued(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.multi_valued
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// The kind of node this factory builds.
    #[must_use]
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Whether `field` collects all occurrences.
    #[must_use]
    pub fn is_multi_valued(&self, field: &str) -> bool {
        self.multi_valued.contains(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_multi_valued() {
        let factory =
            ElementFactory::new(ElementKind::Triangles).with_multi_valued(["input"]);
        assert_eq!(factory.kind(), &ElementKind::Triangles);
        assert!(factory.is_multi_valued("input"));
        assert!(!factory.is_multi_valued("p"));
    }

    #[test]
    fn test_factory_equality_ignores_declaration_order() {
        let a = ElementFactory::new(ElementKind::Mesh).with_multi_valued(["source", "triangles"]);
        let b = ElementFactory::new(ElementKind::Mesh).with_multi_valued(["triangles", "source"]);
        assert_eq!(a, b);
        assert_ne!(a, ElementFactory::new(ElementKind::Mesh));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ElementKind::NewParam.to_string(), "NewParam");
        assert_eq!(
            ElementKind::Custom("light".to_string()).to_string(),
            "Custom(light)"
        );
        assert!(ElementKind::Generic.is_generic());
        assert!(!ElementKind::Image.is_generic());
    }
}
