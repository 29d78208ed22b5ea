//! Document root: owns the parsed element graph and its id index.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::TEXT_FIELD;
use crate::elements::TypedElement;
use crate::error::Result;
use crate::field::{FieldCast, FieldStore};
use crate::loader::DocumentLoader;
use crate::registry::ElementKind;
use crate::tokens::QName;

/// Index of an element inside its [`Document`].
///
/// Ids are assigned in document order, so comparing two ids of the same
/// document compares their position in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the element in document order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Storage for one element. Only the builder writes these.
#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub(crate) name: QName,
    pub(crate) kind: ElementKind,
    pub(crate) fields: FieldStore,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

/// A fully parsed document.
///
/// The document owns every element; [`Node`] handles borrow from it. Once
/// built it is never mutated, so it can be shared between threads freely.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<ElementData>,
    root: NodeId,
    ids: HashMap<String, NodeId>,
    sids: HashMap<String, NodeId>,
    source: Option<PathBuf>,
}

impl Document {
    /// Assemble a document and index its identifiers.
    pub(crate) fn from_parts(nodes: Vec<ElementData>, root: NodeId, index_sids: bool) -> Self {
        let mut document = Self {
            nodes,
            root,
            ids: HashMap::new(),
            sids: HashMap::new(),
            source: None,
        };

        let mut ids = HashMap::new();
        let mut sids = HashMap::new();
        for node in document.root().descendants() {
            if let Some(id) = node.element_id() {
                index_first(&mut ids, id, node, "id");
            }
            if index_sids {
                if let Some(sid) = node.sid() {
                    index_first(&mut sids, sid, node, "sid");
                }
            }
        }
        document.ids = ids;
        document.sids = sids;
        document
    }

    pub(crate) fn with_source(mut self, path: &Path) -> Self {
        self.source = Some(path.to_path_buf());
        self
    }

    /// Parse a COLLADA document with the built-in registry and default limits.
    ///
    /// # Examples
    /// ```
    /// use collada_model::Document;
    ///
    /// let doc = Document::parse_str(r#"<image id="brick"><init_from>brick.png</init_from></image>"#)?;
    /// assert_eq!(doc.root().tag(), "image");
    /// assert!(doc.lookup_by_id("brick").is_some());
    /// # Ok::<(), collada_model::ColladaError>(())
    /// ```
    pub fn parse_str(xml: &str) -> Result<Self> {
        DocumentLoader::default().load_str(xml)
    }

    /// The top-level element.
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        Node {
            document: self,
            id: self.root,
        }
    }

    /// Get an element by its [`NodeId`].
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then_some(Node { document: self, id })
    }

    /// Number of elements in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a document has at least its root element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All elements in document order.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.nodes.len()).map(move |index| Node {
            document: self,
            id: NodeId(index),
        })
    }

    /// File the document was loaded from, if any.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Find the element that declared `id`.
    ///
    /// `id` attributes are searched first, then `sid` attributes (unless
    /// sid indexing was disabled in the loader configuration). When several
    /// elements declare the same value, the first in document order wins.
    #[must_use]
    pub fn lookup_by_id(&self, id: &str) -> Option<Node<'_>> {
        self.ids
            .get(id)
            .or_else(|| self.sids.get(id))
            .and_then(|node_id| self.node(*node_id))
    }

    /// Resolve a URL-style reference such as `#effect-1`.
    ///
    /// Bare identifiers are accepted as well. References into other
    /// documents (`other.dae#node`) are not followed and resolve to `None`.
    #[must_use]
    pub fn resolve_reference(&self, reference: &str) -> Option<Node<'_>> {
        let reference = reference.trim();
        let fragment = match reference.split_once('#') {
            Some(("", fragment)) => fragment,
            Some((document, _)) => {
                tracing::debug!(%reference, %document, "Not following external reference");
                return None;
            }
            None => reference,
        };
        if fragment.is_empty() {
            return None;
        }
        self.lookup_by_id(fragment)
    }

    /// Resolve a reference and view the target as `T`.
    #[must_use]
    pub fn resolve<'a, T: TypedElement<'a>>(&'a self, reference: &str) -> Option<T> {
        self.resolve_reference(reference).and_then(T::cast)
    }

    fn data(&self, id: NodeId) -> &ElementData {
        &self.nodes[id.0]
    }
}

fn index_first(index: &mut HashMap<String, NodeId>, key: &str, node: Node<'_>, attribute: &str) {
    match index.entry(key.to_string()) {
        Entry::Vacant(entry) => {
            entry.insert(node.id());
        }
        Entry::Occupied(entry) => {
            tracing::warn!(
                %attribute,
                value = %key,
                kept = entry.get().index(),
                ignored = node.id().index(),
                "Duplicate identifier, keeping the first declaration"
            );
        }
    }
}

/// Borrowed handle to one element of a [`Document`].
///
/// Two handles are equal when they point at the same element of the same
/// document instance.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    document: &'a Document,
    id: NodeId,
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.document, other.document) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id.0)
            .field("name", &self.name().to_string())
            .field("kind", self.kind())
            .finish()
    }
}

impl<'a> Node<'a> {
    fn data(&self) -> &'a ElementData {
        self.document.data(self.id)
    }

    fn wrap(&self, id: NodeId) -> Node<'a> {
        Node {
            document: self.document,
            id,
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The document this element belongs to.
    #[must_use]
    pub fn document(&self) -> &'a Document {
        self.document
    }

    #[must_use]
    pub fn name(&self) -> &'a QName {
        &self.data().name
    }

    /// Local tag name.
    #[must_use]
    pub fn tag(&self) -> &'a str {
        &self.data().name.local
    }

    #[must_use]
    pub fn namespace(&self) -> &'a str {
        &self.data().name.namespace
    }

    #[must_use]
    pub fn kind(&self) -> &'a ElementKind {
        &self.data().kind
    }

    #[must_use]
    pub fn fields(&self) -> &'a FieldStore {
        &self.data().fields
    }

    /// Get a field converted to `T`; `None` if absent or of another shape.
    #[must_use]
    pub fn get<T: FieldCast<'a>>(&self, name: &str) -> Option<T> {
        self.fields().get_typed(name)
    }

    /// An attribute (or any text field) by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.get(name)
    }

    /// The document-wide `id` attribute.
    #[must_use]
    pub fn element_id(&self) -> Option<&'a str> {
        self.attribute("id")
    }

    /// The scoped `sid` attribute.
    #[must_use]
    pub fn sid(&self) -> Option<&'a str> {
        self.attribute("sid")
    }

    /// The `name` attribute.
    #[must_use]
    pub fn display_name(&self) -> Option<&'a str> {
        self.attribute("name")
    }

    /// Character data of the element, trimmed.
    #[must_use]
    pub fn text(&self) -> Option<&'a str> {
        self.get::<&str>(TEXT_FIELD).map(str::trim)
    }

    /// The child stored under `name`; the last one for multi-valued fields.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<Node<'a>> {
        self.get::<NodeId>(name).map(|id| self.wrap(id))
    }

    /// All children stored under `name`, in document order.
    #[must_use]
    pub fn children_named(&self, name: &str) -> Vec<Node<'a>> {
        self.get::<&[NodeId]>(name)
            .map(|ids| ids.iter().map(|id| self.wrap(*id)).collect())
            .unwrap_or_default()
    }

    /// Character data of the child stored under `name`.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&'a str> {
        self.child(name).and_then(|child| child.text())
    }

    /// The child stored under `name`, viewed as `T`.
    #[must_use]
    pub fn child_as<T: TypedElement<'a>>(&self, name: &str) -> Option<T> {
        self.child(name).and_then(T::cast)
    }

    /// All children stored under `name` that can be viewed as `T`.
    #[must_use]
    pub fn children_as<T: TypedElement<'a>>(&self, name: &str) -> Vec<T> {
        self.children_named(name)
            .into_iter()
            .filter_map(T::cast)
            .collect()
    }

    /// Child elements in document order, whatever their field name.
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let document = self.document;
        self.data()
            .children
            .iter()
            .map(move |id| Node { document, id: *id })
    }

    #[must_use]
    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| self.wrap(id))
    }

    /// Parent, grandparent and so on up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'a>> {
        std::iter::successors(self.parent(), Node::parent)
    }

    /// This element and everything below it, in document order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            document: self.document,
            stack: vec![self.id],
        }
    }

    /// Nearest ancestor that can be viewed as `T`.
    #[must_use]
    pub fn ancestor_as<T: TypedElement<'a>>(&self) -> Option<T> {
        self.ancestors().find_map(T::cast)
    }

    /// View this element as `T`, if its kind matches.
    #[must_use]
    pub fn cast<T: TypedElement<'a>>(self) -> Option<T> {
        T::cast(self)
    }

    /// Slash-separated tag path from the root, e.g. `COLLADA/asset/unit`.
    #[must_use]
    pub fn path(&self) -> String {
        let mut tags: Vec<&str> = self.ancestors().map(|node| node.tag()).collect();
        tags.reverse();
        tags.push(self.tag());
        tags.join("/")
    }
}

/// Pre-order iterator over an element and its descendants.
pub struct Descendants<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.document.data(id).children.iter().rev().copied());
        Some(Node {
            document: self.document,
            id,
        })
    }
}
