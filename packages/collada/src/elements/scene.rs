//! Views for the document root, libraries and the scene graph.

use super::{element_view, Effect, Geometry, Image, Material, TypedElement};
use crate::document::Node;
use crate::field::parse_list;

element_view!(
    /// The `<COLLADA>` root element.
    Collada => Collada
);

impl<'a> Collada<'a> {
    /// The schema `version` attribute, e.g. `1.4.1`.
    #[must_use]
    pub fn version(&self) -> Option<&'a str> {
        self.0.attribute("version")
    }

    #[must_use]
    pub fn asset(&self) -> Option<Asset<'a>> {
        self.0.child_as("asset")
    }

    /// Every `library_*` element, in document order.
    #[must_use]
    pub fn libraries(&self) -> Vec<Library<'a>> {
        self.0.children().filter_map(Library::cast).collect()
    }

    /// The first library with the given tag, e.g. `library_images`.
    #[must_use]
    pub fn library(&self, tag: &str) -> Option<Library<'a>> {
        self.library_elements(tag).into_iter().next()
    }

    fn library_elements(&self, tag: &str) -> Vec<Library<'a>> {
        self.0.children_as(tag)
    }

    /// Members of every library with the given tag, viewed as `T`.
    fn members<T: TypedElement<'a>>(&self, tag: &str) -> Vec<T> {
        self.library_elements(tag)
            .iter()
            .flat_map(|library| library.node().children())
            .filter_map(T::cast)
            .collect()
    }

    #[must_use]
    pub fn images(&self) -> Vec<Image<'a>> {
        self.members("library_images")
    }

    #[must_use]
    pub fn effects(&self) -> Vec<Effect<'a>> {
        self.members("library_effects")
    }

    #[must_use]
    pub fn materials(&self) -> Vec<Material<'a>> {
        self.members("library_materials")
    }

    #[must_use]
    pub fn geometries(&self) -> Vec<Geometry<'a>> {
        self.members("library_geometries")
    }

    #[must_use]
    pub fn visual_scenes(&self) -> Vec<VisualScene<'a>> {
        self.members("library_visual_scenes")
    }

    #[must_use]
    pub fn scene(&self) -> Option<Scene<'a>> {
        self.0.child_as("scene")
    }

    /// The visual scene instantiated by `<scene>`.
    #[must_use]
    pub fn active_visual_scene(&self) -> Option<VisualScene<'a>> {
        self.scene()?.instance_visual_scene()?.visual_scene()
    }
}

element_view!(
    /// Document metadata.
    Asset => Asset
);

impl<'a> Asset<'a> {
    #[must_use]
    pub fn unit(&self) -> Option<Unit<'a>> {
        self.0.child_as("unit")
    }

    /// `X_UP`, `Y_UP` or `Z_UP`; `Y_UP` when not declared.
    #[must_use]
    pub fn up_axis(&self) -> &'a str {
        self.0.child_text("up_axis").unwrap_or("Y_UP")
    }

    /// Scale of one distance unit in meters; 1 when not declared.
    #[must_use]
    pub fn meters_per_unit(&self) -> f64 {
        self.unit().and_then(|unit| unit.meter()).unwrap_or(1.0)
    }

    #[must_use]
    pub fn created(&self) -> Option<&'a str> {
        self.0.child_text("created")
    }

    #[must_use]
    pub fn modified(&self) -> Option<&'a str> {
        self.0.child_text("modified")
    }
}

element_view!(
    /// The `<unit>` of an asset.
    Unit => Unit
);

impl<'a> Unit<'a> {
    #[must_use]
    pub fn meter(&self) -> Option<f64> {
        self.0.get("meter")
    }

    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.0.display_name()
    }
}

element_view!(
    /// A `library_*` container.
    Library => Library
);

impl<'a> Library<'a> {
    /// The library tag, e.g. `library_effects`.
    #[must_use]
    pub fn tag(&self) -> &'a str {
        self.0.tag()
    }

    /// Members in document order.
    #[must_use]
    pub fn elements(&self) -> Vec<Node<'a>> {
        self.0.children().collect()
    }
}

element_view!(
    /// A `<visual_scene>`.
    VisualScene => VisualScene
);

impl<'a> VisualScene<'a> {
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.0.display_name()
    }

    /// Top-level nodes.
    #[must_use]
    pub fn nodes(&self) -> Vec<SceneNode<'a>> {
        self.0.children_as("node")
    }
}

element_view!(
    /// A scene graph `<node>`.
    SceneNode => SceneNode
);

impl<'a> SceneNode<'a> {
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.0.display_name()
    }

    /// `NODE` or `JOINT`; `NODE` when not declared.
    #[must_use]
    pub fn node_type(&self) -> &'a str {
        self.0.attribute("type").unwrap_or("NODE")
    }

    /// Child nodes.
    #[must_use]
    pub fn nodes(&self) -> Vec<SceneNode<'a>> {
        self.0.children_as("node")
    }

    #[must_use]
    pub fn matrix(&self) -> Option<Matrix<'a>> {
        self.0.child_as("matrix")
    }

    #[must_use]
    pub fn instance_geometries(&self) -> Vec<InstanceGeometry<'a>> {
        self.0.children_as("instance_geometry")
    }
}

element_view!(
    /// A `<matrix>` transform.
    Matrix => Matrix
);

impl Matrix<'_> {
    /// The 16 values in row-major order; `None` unless exactly 16 numbers.
    #[must_use]
    pub fn values(&self) -> Option<[f64; 16]> {
        parse_list::<f64>(self.0.text()?)?.try_into().ok()
    }
}

element_view!(
    /// An `<instance_geometry>` in a node.
    InstanceGeometry => InstanceGeometry
);

impl<'a> InstanceGeometry<'a> {
    #[must_use]
    pub fn url(&self) -> Option<&'a str> {
        self.0.attribute("url")
    }

    #[must_use]
    pub fn geometry(&self) -> Option<Geometry<'a>> {
        self.0.document().resolve(self.url()?)
    }

    /// Material bindings from `<bind_material><technique_common>`.
    #[must_use]
    pub fn instance_materials(&self) -> Vec<InstanceMaterial<'a>> {
        self.0
            .child("bind_material")
            .and_then(|bind| bind.child("technique_common"))
            .map(|common| common.children_as("instance_material"))
            .unwrap_or_default()
    }
}

element_view!(
    /// Binds a primitive's material symbol to a material.
    InstanceMaterial => InstanceMaterial
);

impl<'a> InstanceMaterial<'a> {
    #[must_use]
    pub fn symbol(&self) -> Option<&'a str> {
        self.0.attribute("symbol")
    }

    #[must_use]
    pub fn target(&self) -> Option<&'a str> {
        self.0.attribute("target")
    }

    #[must_use]
    pub fn material(&self) -> Option<Material<'a>> {
        self.0.document().resolve(self.target()?)
    }
}

element_view!(
    /// The `<scene>` element.
    Scene => Scene
);

impl<'a> Scene<'a> {
    #[must_use]
    pub fn instance_visual_scene(&self) -> Option<InstanceVisualScene<'a>> {
        self.0.child_as("instance_visual_scene")
    }
}

element_view!(
    /// An `<instance_visual_scene>`.
    InstanceVisualScene => InstanceVisualScene
);

impl<'a> InstanceVisualScene<'a> {
    #[must_use]
    pub fn url(&self) -> Option<&'a str> {
        self.0.attribute("url")
    }

    #[must_use]
    pub fn visual_scene(&self) -> Option<VisualScene<'a>> {
        self.0.document().resolve(self.url()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use pretty_assertions::assert_eq;

    const SCENE: &str = r##"
        <COLLADA version="1.4.1">
          <asset>
            <created>2024-01-01T00:00:00</created>
            <unit name="centimeter" meter="0.01"/>
            <up_axis>Z_UP</up_axis>
          </asset>
          <library_images>
            <image id="a"><init_from>a.png</init_from></image>
          </library_images>
          <library_images>
            <image id="b"><init_from>b.png</init_from></image>
          </library_images>
          <library_materials>
            <material id="mat"><instance_effect url="#fx"/></material>
          </library_materials>
          <library_geometries>
            <geometry id="box"><mesh/></geometry>
          </library_geometries>
          <library_visual_scenes>
            <visual_scene id="main" name="Main">
              <node id="parent" name="Parent">
                <matrix>1 0 0 5  0 1 0 0  0 0 1 0  0 0 0 1</matrix>
                <instance_geometry url="#box">
                  <bind_material>
                    <technique_common>
                      <instance_material symbol="brick" target="#mat"/>
                    </technique_common>
                  </bind_material>
                </instance_geometry>
                <node id="child" type="JOINT"/>
              </node>
            </visual_scene>
          </library_visual_scenes>
          <scene><instance_visual_scene url="#main"/></scene>
        </COLLADA>"##;

    #[test]
    fn test_root_and_asset() {
        let doc = Document::parse_str(SCENE).unwrap();
        let collada = doc.root().cast::<Collada>().unwrap();
        assert_eq!(collada.version(), Some("1.4.1"));

        let asset = collada.asset().unwrap();
        assert_eq!(asset.up_axis(), "Z_UP");
        assert_eq!(asset.meters_per_unit(), 0.01);
        assert_eq!(asset.unit().and_then(|u| u.name()), Some("centimeter"));
        assert_eq!(asset.created(), Some("2024-01-01T00:00:00"));
        assert_eq!(asset.modified(), None);
    }

    #[test]
    fn test_asset_defaults() {
        let doc = Document::parse_str("<asset/>").unwrap();
        let asset = doc.root().cast::<Asset>().unwrap();
        assert_eq!(asset.up_axis(), "Y_UP");
        assert_eq!(asset.meters_per_unit(), 1.0);
    }

    #[test]
    fn test_libraries() {
        let doc = Document::parse_str(SCENE).unwrap();
        let collada = doc.root().cast::<Collada>().unwrap();

        let tags: Vec<_> = collada.libraries().iter().map(|l| l.tag()).collect();
        assert_eq!(
            tags,
            vec![
                "library_images",
                "library_images",
                "library_materials",
                "library_geometries",
                "library_visual_scenes",
            ]
        );

        let first = collada.library("library_images").unwrap();
        assert_eq!(first.elements().len(), 1);
        assert!(collada.library("library_cameras").is_none());

        let images: Vec<_> = collada
            .images()
            .iter()
            .filter_map(|i| i.init_from())
            .collect();
        assert_eq!(images, vec!["a.png", "b.png"]);
        assert_eq!(collada.materials().len(), 1);
        assert_eq!(collada.geometries().len(), 1);
        assert!(collada.effects().is_empty());
    }

    #[test]
    fn test_scene_graph() {
        let doc = Document::parse_str(SCENE).unwrap();
        let collada = doc.root().cast::<Collada>().unwrap();
        let scene = collada.active_visual_scene().unwrap();
        assert_eq!(scene.name(), Some("Main"));
        assert_eq!(collada.visual_scenes(), vec![scene]);

        let parent = scene.nodes()[0];
        assert_eq!(parent.name(), Some("Parent"));
        assert_eq!(parent.node_type(), "NODE");
        assert_eq!(parent.matrix().and_then(|m| m.values()).map(|m| m[3]), Some(5.0));

        let children = parent.nodes();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].node_type(), "JOINT");
        assert!(children[0].matrix().is_none());

        let instance = parent.instance_geometries()[0];
        assert_eq!(instance.url(), Some("#box"));
        assert!(instance.geometry().and_then(|g| g.mesh()).is_some());

        let bindings = instance.instance_materials();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].symbol(), Some("brick"));
        assert_eq!(bindings[0].target(), Some("#mat"));
        assert!(bindings[0].material().is_some());
    }

    #[test]
    fn test_matrix_requires_sixteen_values() {
        let doc = Document::parse_str("<matrix>1 0 0 1</matrix>").unwrap();
        assert_eq!(doc.root().cast::<Matrix>().unwrap().values(), None);
    }
}
