//! Views for geometry and mesh data.

use super::{element_view, TypedElement};
use crate::document::Node;
use crate::field::parse_list;

element_view!(
    /// A `<geometry>` in `library_geometries`.
    Geometry => Geometry
);

impl<'a> Geometry<'a> {
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.0.display_name()
    }

    #[must_use]
    pub fn mesh(&self) -> Option<Mesh<'a>> {
        self.0.child_as("mesh")
    }
}

element_view!(
    /// A `<mesh>`.
    Mesh => Mesh
);

impl<'a> Mesh<'a> {
    #[must_use]
    pub fn sources(&self) -> Vec<Source<'a>> {
        self.0.children_as("source")
    }

    /// Resolve a `#source-id` reference to one of this mesh's sources.
    #[must_use]
    pub fn source(&self, reference: &str) -> Option<Source<'a>> {
        let source: Source<'a> = self.0.document().resolve(reference)?;
        (source.node().parent() == Some(self.0)).then_some(source)
    }

    #[must_use]
    pub fn vertices(&self) -> Option<Vertices<'a>> {
        self.0.child_as("vertices")
    }

    #[must_use]
    pub fn triangles(&self) -> Vec<Triangles<'a>> {
        self.0.children_as("triangles")
    }

    /// Flat vertex positions, following `<vertices>` to its `POSITION` source.
    #[must_use]
    pub fn positions(&self) -> Option<Vec<f64>> {
        let input = self.vertices()?.input("POSITION")?;
        self.source(input.source()?)?.float_array()?.values()
    }
}

element_view!(
    /// A data `<source>`.
    Source => Source
);

impl<'a> Source<'a> {
    #[must_use]
    pub fn float_array(&self) -> Option<FloatArray<'a>> {
        self.0.child_as("float_array")
    }

    #[must_use]
    pub fn accessor(&self) -> Option<Accessor<'a>> {
        self.0.child("technique_common")?.child_as("accessor")
    }
}

element_view!(
    /// A `<float_array>`.
    FloatArray => FloatArray
);

impl FloatArray<'_> {
    /// Declared element count.
    #[must_use]
    pub fn count(&self) -> Option<usize> {
        self.0.get("count")
    }

    /// Parsed values; empty when the array has no text, `None` if any
    /// entry is not a number.
    #[must_use]
    pub fn values(&self) -> Option<Vec<f64>> {
        self.0.text().map_or_else(|| Some(Vec::new()), parse_list)
    }
}

element_view!(
    /// An `<accessor>` describing how to read a source array.
    Accessor => Accessor
);

impl<'a> Accessor<'a> {
    #[must_use]
    pub fn count(&self) -> Option<usize> {
        self.0.get("count")
    }

    /// Values per element; 1 when not declared.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.0.get("stride").unwrap_or(1)
    }

    #[must_use]
    pub fn source(&self) -> Option<&'a str> {
        self.0.attribute("source")
    }

    #[must_use]
    pub fn params(&self) -> Vec<Param<'a>> {
        self.0.children_as("param")
    }
}

element_view!(
    /// An accessor `<param>`.
    Param => Param
);

impl<'a> Param<'a> {
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.0.display_name()
    }

    #[must_use]
    pub fn param_type(&self) -> Option<&'a str> {
        self.0.attribute("type")
    }
}

element_view!(
    /// An `<input>` binding a semantic to a source.
    Input => Input
);

impl<'a> Input<'a> {
    #[must_use]
    pub fn semantic(&self) -> Option<&'a str> {
        self.0.attribute("semantic")
    }

    #[must_use]
    pub fn source(&self) -> Option<&'a str> {
        self.0.attribute("source")
    }

    /// Offset into each index tuple; absent on `<vertices>` inputs.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        self.0.get("offset")
    }

    #[must_use]
    pub fn set(&self) -> Option<usize> {
        self.0.get("set")
    }
}

fn find_input<'a>(inputs: Vec<Input<'a>>, semantic: &str) -> Option<Input<'a>> {
    inputs
        .into_iter()
        .find(|input| input.semantic() == Some(semantic))
}

element_view!(
    /// The `<vertices>` of a mesh.
    Vertices => Vertices
);

impl<'a> Vertices<'a> {
    #[must_use]
    pub fn inputs(&self) -> Vec<Input<'a>> {
        self.0.children_as("input")
    }

    #[must_use]
    pub fn input(&self, semantic: &str) -> Option<Input<'a>> {
        find_input(self.inputs(), semantic)
    }
}

element_view!(
    /// A `<triangles>` primitive list.
    Triangles => Triangles
);

impl<'a> Triangles<'a> {
    /// Number of triangles.
    #[must_use]
    pub fn count(&self) -> Option<usize> {
        self.0.get("count")
    }

    /// Material symbol, bound by `<instance_material>`.
    #[must_use]
    pub fn material(&self) -> Option<&'a str> {
        self.0.attribute("material")
    }

    #[must_use]
    pub fn inputs(&self) -> Vec<Input<'a>> {
        self.0.children_as("input")
    }

    #[must_use]
    pub fn input(&self, semantic: &str) -> Option<Input<'a>> {
        find_input(self.inputs(), semantic)
    }

    /// Indices per vertex: one past the largest input offset.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.inputs()
            .iter()
            .filter_map(Input::offset)
            .max()
            .map_or(1, |offset| offset + 1)
    }

    /// Parsed `<p>` indices; `None` if missing or not all integers.
    #[must_use]
    pub fn indices(&self) -> Option<Vec<usize>> {
        parse_list(self.0.child_text("p")?)
    }
}
