//! Typed views over document elements.
//!
//! A view is a `Copy` wrapper around a [`Node`] whose [`ElementKind`] it has
//! checked. Getters read the node's field store and return `None` (or an
//! empty list) when a field is missing or has an unexpected shape; they
//! never fail.

mod effects;
mod geometry;
mod scene;

pub use effects::{
    Color, ColorOrTexture, Effect, Image, InstanceEffect, Material, NewParam, ProfileCommon,
    Sampler2D, Shader, Surface, Technique, Texture,
};
pub use geometry::{Accessor, FloatArray, Geometry, Input, Mesh, Param, Source, Triangles, Vertices};
pub use scene::{
    Asset, Collada, InstanceGeometry, InstanceMaterial, InstanceVisualScene, Library, Matrix,
    Scene, SceneNode, Unit, VisualScene,
};

use crate::document::Node;
use crate::registry::ElementKind;

/// A typed view of an element kind.
///
/// Host code that registers [`ElementKind::Custom`] kinds can implement
/// this for its own wrappers and then use [`Node::cast`] and
/// [`Document::resolve`](crate::Document::resolve) with them.
pub trait TypedElement<'a>: Sized + Copy {
    /// Whether nodes of `kind` can be viewed as `Self`.
    fn can_cast(kind: &ElementKind) -> bool;

    /// View `node` as `Self`; `None` if its kind does not match.
    fn cast(node: Node<'a>) -> Option<Self>;

    /// The underlying node.
    fn node(&self) -> Node<'a>;
}

/// Declare a view struct over one or more element kinds.
macro_rules! element_view {
    ($(#[$meta:meta])* $name:ident => $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'a>(Node<'a>);

        impl<'a> $crate::elements::TypedElement<'a> for $name<'a> {
            fn can_cast(kind: &$crate::registry::ElementKind) -> bool {
                matches!(kind, $($crate::registry::ElementKind::$kind)|+)
            }

            fn cast(node: Node<'a>) -> Option<Self> {
                Self::can_cast(node.kind()).then_some(Self(node))
            }

            fn node(&self) -> Node<'a> {
                self.0
            }
        }
    };
}

pub(crate) use element_view;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    #[test]
    fn test_cast_checks_kind() {
        let doc = Document::parse_str(r#"<newparam sid="p"><surface/></newparam>"#).unwrap();
        let root = doc.root();

        assert!(root.cast::<NewParam>().is_some());
        assert!(root.cast::<Surface>().is_none());
        assert_eq!(root.cast::<NewParam>().map(|p| p.node()), Some(root));
    }

    #[test]
    fn test_generic_node_has_no_view() {
        let doc = Document::parse_str("<extra/>").unwrap();
        let root = doc.root();
        assert!(root.kind().is_generic());
        assert!(root.cast::<Image>().is_none());
        assert!(root.cast::<Collada>().is_none());
    }
}
