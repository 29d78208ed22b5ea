//! Builder that turns a token stream into a [`Document`].
//!
//! The builder keeps a stack of open elements. Each start tag is resolved
//! through the [`ElementRegistry`]; unknown tags become generic nodes so the
//! rest of the document is still built. When an element closes it is stored
//! on its parent under its tag name, appended if the parent's factory marks
//! that field multi-valued and overwriting otherwise.

use crate::config::{LoaderConfig, TEXT_FIELD};
use crate::document::{Document, ElementData, NodeId};
use crate::error::{ColladaError, MalformedDocumentError, Result};
use crate::field::FieldStore;
use crate::registry::{ElementFactory, ElementKind, ElementRegistry};
use crate::tokens::{QName, Token, TokenSource};

/// Where the builder is relative to the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No element seen yet.
    AwaitRoot,
    /// Inside the root element.
    InRoot,
    /// The root has closed; only blank text may follow.
    Done(NodeId),
}

/// An element whose end tag has not been seen yet.
struct Frame<'r> {
    id: NodeId,
    factory: Option<&'r ElementFactory>,
    text: String,
}

/// Single-use builder for one document.
///
/// Dropping the builder (or an error from [`DocumentBuilder::build`])
/// discards everything built so far.
pub struct DocumentBuilder<'r> {
    registry: &'r ElementRegistry,
    config: &'r LoaderConfig,
    nodes: Vec<ElementData>,
    stack: Vec<Frame<'r>>,
    phase: Phase,
}

impl<'r> DocumentBuilder<'r> {
    /// Create a builder that resolves elements through `registry`.
    #[must_use]
    pub fn new(registry: &'r ElementRegistry, config: &'r LoaderConfig) -> Self {
        Self {
            registry,
            config,
            nodes: Vec::new(),
            stack: Vec::new(),
            phase: Phase::AwaitRoot,
        }
    }

    /// Consume every token of `source` and return the finished document.
    ///
    /// # Errors
    /// Returns `ColladaError::Malformed` for ill-formed streams and
    /// `ColladaError::DepthLimitExceeded` when nesting exceeds the limit.
    pub fn build(mut self, mut source: impl TokenSource) -> Result<Document> {
        while let Some(token) = source.next_token()? {
            self.accept(token)?;
        }
        self.finish()
    }

    /// Apply one token.
    pub fn accept(&mut self, token: Token) -> Result<()> {
        match token {
            Token::Start(name) => self.start(name),
            Token::Attribute { name, value } => self.attribute(name, value),
            Token::Text(text) => self.text(&text),
            Token::End(name) => self.end(name),
        }
    }

    /// Check that the stream ended cleanly and hand over the document.
    pub fn finish(self) -> Result<Document> {
        if !self.stack.is_empty() {
            let open = self
                .stack
                .iter()
                .map(|frame| self.nodes[frame.id.index()].name.to_string())
                .collect();
            return Err(MalformedDocumentError::UnclosedElements { open }.into());
        }

        match self.phase {
            Phase::Done(root) => {
                let document = Document::from_parts(self.nodes, root, self.config.index_sids);
                tracing::debug!(elements = document.len(), "Built document");
                Ok(document)
            }
            Phase::AwaitRoot | Phase::InRoot => Err(MalformedDocumentError::EmptyDocument.into()),
        }
    }

    fn start(&mut self, name: QName) -> Result<()> {
        if let Phase::Done(root) = self.phase {
            return Err(MalformedDocumentError::MultipleRoots {
                first: self.nodes[root.index()].name.to_string(),
                second: name.to_string(),
            }
            .into());
        }
        if self.stack.len() >= self.config.max_depth {
            return Err(ColladaError::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }

        let factory = self.registry.resolve(&name.namespace, &name.local);
        let kind = match factory {
            Some(factory) => factory.kind().clone(),
            None => {
                tracing::trace!(element = %name, "No factory registered, building generic node");
                ElementKind::Generic
            }
        };

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(ElementData {
            name,
            kind,
            fields: FieldStore::new(),
            children: Vec::new(),
            parent: self.stack.last().map(|frame| frame.id),
        });
        self.stack.push(Frame {
            id,
            factory,
            text: String::new(),
        });
        self.phase = Phase::InRoot;
        Ok(())
    }

    fn attribute(&mut self, name: String, value: String) -> Result<()> {
        match self.stack.last() {
            Some(frame) => {
                self.nodes[frame.id.index()].fields.set(name, value);
                Ok(())
            }
            None => Err(MalformedDocumentError::AttributeOutsideElement { name }.into()),
        }
    }

    fn text(&mut self, text: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(frame) => {
                frame.text.push_str(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(MalformedDocumentError::TextOutsideRoot.into()),
        }
    }

    fn end(&mut self, name: QName) -> Result<()> {
        let Some(frame) = self.stack.pop() else {
            return Err(MalformedDocumentError::UnexpectedEndTag {
                found: name.to_string(),
            }
            .into());
        };

        let element = &mut self.nodes[frame.id.index()];
        if element.name != name {
            return Err(MalformedDocumentError::MismatchedEndTag {
                expected: element.name.to_string(),
                found: name.to_string(),
            }
            .into());
        }
        if !frame.text.trim().is_empty() {
            element.fields.set(TEXT_FIELD, frame.text);
        }

        match self.stack.last() {
            Some(parent) => {
                let field = name.local;
                let multi_valued = parent
                    .factory
                    .is_some_and(|factory| factory.is_multi_valued(&field));
                let parent_element = &mut self.nodes[parent.id.index()];
                parent_element.children.push(frame.id);
                if multi_valued {
                    parent_element.fields.append_node(&field, frame.id);
                } else {
                    parent_element.fields.set(field, frame.id);
                }
            }
            None => self.phase = Phase::Done(frame.id),
        }
        Ok(())
    }
}
