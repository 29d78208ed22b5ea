//! Registry configuration for COLLADA documents.

use super::core::ElementRegistry;
use super::types::{ElementFactory, ElementKind};
use crate::config::{COLLADA_1_4_NAMESPACE, COLLADA_1_5_NAMESPACE};
use crate::error::DuplicateRegistrationError;

/// Namespaces the built-in elements are registered under.
///
/// The empty namespace covers fragments and exporters that omit `xmlns`.
pub const COLLADA_NAMESPACES: [&str; 3] = ["", COLLADA_1_4_NAMESPACE, COLLADA_1_5_NAMESPACE];

/// Library containers and the element each one collects.
const LIBRARIES: [(&str, &str); 7] = [
    ("library_images", "image"),
    ("library_effects", "effect"),
    ("library_materials", "material"),
    ("library_geometries", "geometry"),
    ("library_visual_scenes", "visual_scene"),
    ("library_nodes", "node"),
    ("library_cameras", "camera"),
];

/// Shading models that share the `Shader` view.
pub const SHADER_TAGS: [&str; 4] = ["phong", "lambert", "blinn", "constant"];

/// Color-or-texture channels of a shader.
const CHANNEL_TAGS: [&str; 6] = [
    "emission",
    "ambient",
    "diffuse",
    "specular",
    "reflective",
    "transparent",
];

/// Every built-in `(tag, factory)` pair.
fn collada_factories() -> Vec<(&'static str, ElementFactory)> {
    let mut factories = vec![
        (
            "COLLADA",
            ElementFactory::new(ElementKind::Collada)
                .with_multi_valued(LIBRARIES.iter().map(|(library, _)| *library)),
        ),
        ("asset", ElementFactory::new(ElementKind::Asset)),
        ("unit", ElementFactory::new(ElementKind::Unit)),
        ("image", ElementFactory::new(ElementKind::Image)),
        (
            "effect",
            ElementFactory::new(ElementKind::Effect).with_multi_valued(["newparam"]),
        ),
        (
            "profile_COMMON",
            ElementFactory::new(ElementKind::ProfileCommon).with_multi_valued(["newparam"]),
        ),
        ("newparam", ElementFactory::new(ElementKind::NewParam)),
        ("surface", ElementFactory::new(ElementKind::Surface)),
        ("sampler2D", ElementFactory::new(ElementKind::Sampler2D)),
        ("technique", ElementFactory::new(ElementKind::Technique)),
        (
            "technique_common",
            ElementFactory::new(ElementKind::TechniqueCommon)
                .with_multi_valued(["instance_material"]),
        ),
        ("texture", ElementFactory::new(ElementKind::Texture)),
        ("color", ElementFactory::new(ElementKind::Color)),
        ("material", ElementFactory::new(ElementKind::Material)),
        ("instance_effect", ElementFactory::new(ElementKind::InstanceEffect)),
        ("geometry", ElementFactory::new(ElementKind::Geometry)),
        (
            "mesh",
            ElementFactory::new(ElementKind::Mesh)
                .with_multi_valued(["source", "triangles", "lines", "polylist"]),
        ),
        ("source", ElementFactory::new(ElementKind::Source)),
        ("float_array", ElementFactory::new(ElementKind::FloatArray)),
        (
            "accessor",
            ElementFactory::new(ElementKind::Accessor).with_multi_valued(["param"]),
        ),
        ("param", ElementFactory::new(ElementKind::Param)),
        ("input", ElementFactory::new(ElementKind::Input)),
        (
            "vertices",
            ElementFactory::new(ElementKind::Vertices).with_multi_valued(["input"]),
        ),
        (
            "triangles",
            ElementFactory::new(ElementKind::Triangles).with_multi_valued(["input"]),
        ),
        (
            "visual_scene",
            ElementFactory::new(ElementKind::VisualScene).with_multi_valued(["node"]),
        ),
        (
            "node",
            ElementFactory::new(ElementKind::SceneNode).with_multi_valued([
                "node",
                "instance_geometry",
                "instance_node",
            ]),
        ),
        ("matrix", ElementFactory::new(ElementKind::Matrix)),
        ("instance_geometry", ElementFactory::new(ElementKind::InstanceGeometry)),
        ("instance_material", ElementFactory::new(ElementKind::InstanceMaterial)),
        ("scene", ElementFactory::new(ElementKind::Scene)),
        (
            "instance_visual_scene",
            ElementFactory::new(ElementKind::InstanceVisualScene),
        ),
    ];

    for (library, member) in LIBRARIES {
        factories.push((
            library,
            ElementFactory::new(ElementKind::Library).with_multi_valued([member]),
        ));
    }
    for tag in SHADER_TAGS {
        factories.push((tag, ElementFactory::new(ElementKind::Shader)));
    }
    for tag in CHANNEL_TAGS {
        factories.push((tag, ElementFactory::new(ElementKind::ColorOrTexture)));
    }

    factories
}

/// Register the built-in COLLADA elements into an existing registry.
///
/// Host code that adds its own kinds can call this on a registry it has
/// already populated; conflicting keys are reported, not overwritten.
///
/// # Errors
/// Returns `DuplicateRegistrationError` if the registry already maps one of
/// the built-in keys to a different factory.
pub fn register_collada_elements(
    registry: &mut ElementRegistry,
) -> Result<(), DuplicateRegistrationError> {
    for (tag, factory) in collada_factories() {
        registry.register_in(&COLLADA_NAMESPACES, tag, &factory)?;
    }
    Ok(())
}

/// Create a registry configured for COLLADA 1.4 and 1.5 documents.
///
/// # Examples
/// ```
/// use collada_model::registry::{create_collada_registry, ElementKind};
///
/// let registry = create_collada_registry();
/// let factory = registry.resolve("", "newparam").unwrap();
/// assert_eq!(factory.kind(), &ElementKind::NewParam);
/// ```
#[must_use]
pub fn create_collada_registry() -> ElementRegistry {
    let mut registry = ElementRegistry::new();
    for (tag, factory) in collada_factories() {
        for namespace in COLLADA_NAMESPACES {
            // Only reachable if the table repeats a key with another kind
            if let Err(err) = registry.register(namespace, tag, factory.clone()) {
                tracing::warn!(error = %err, "Skipping conflicting built-in registration");
            }
        }
    }
    registry
}
