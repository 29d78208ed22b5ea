//! Entry points for loading documents.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::builder::DocumentBuilder;
use crate::config::LoaderConfig;
use crate::document::Document;
use crate::error::Result;
use crate::registry::{create_collada_registry, ElementRegistry};
use crate::tokens::{DomTokenSource, TokenSource, XmlTokenSource};

/// Loads documents with an injected registry and configuration.
///
/// # Examples
/// ```
/// use collada_model::elements::NewParam;
/// use collada_model::DocumentLoader;
///
/// let loader = DocumentLoader::default();
/// let doc = loader.load_str(r#"<newparam sid="p1"><surface/></newparam>"#)?;
/// let param = doc.root().cast::<NewParam>().unwrap();
/// assert!(param.surface().is_some());
/// assert!(param.sampler_2d().is_none());
/// # Ok::<(), collada_model::ColladaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    registry: ElementRegistry,
    config: LoaderConfig,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self {
            registry: create_collada_registry(),
            config: LoaderConfig::default(),
        }
    }
}

impl DocumentLoader {
    /// Create a loader from a registry and a configuration.
    ///
    /// # Errors
    /// Returns `ColladaError::InvalidConfig` if the configuration fails
    /// validation.
    pub fn new(registry: ElementRegistry, config: LoaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// The built-in COLLADA registry with a custom configuration.
    pub fn with_config(config: LoaderConfig) -> Result<Self> {
        Self::new(create_collada_registry(), config)
    }

    #[must_use]
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Build a document from any token source.
    pub fn load_tokens(&self, source: impl TokenSource) -> Result<Document> {
        DocumentBuilder::new(&self.registry, &self.config).build(source)
    }

    /// Parse a document held in memory.
    pub fn load_str(&self, xml: &str) -> Result<Document> {
        self.config.check_size(xml.len() as u64)?;
        self.load_tokens(XmlTokenSource::new(xml.as_bytes()))
    }

    /// Parse a document from a buffered reader.
    ///
    /// The size limit is not applied here since the length is unknown; use
    /// [`DocumentLoader::load_path`] for files.
    pub fn load_reader(&self, reader: impl BufRead) -> Result<Document> {
        self.load_tokens(XmlTokenSource::new(reader))
    }

    /// Open and parse a file, streaming it from disk.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let _span = tracing::debug_span!("load_path", path = %path.display()).entered();

        let file = File::open(path)?;
        self.config.check_size(file.metadata()?.len())?;

        let document = self.load_reader(BufReader::new(file))?;
        tracing::debug!(elements = document.len(), "Loaded document");
        Ok(document.with_source(path))
    }

    /// Build a document from an already parsed DOM.
    pub fn load_dom(&self, dom: &roxmltree::Document<'_>) -> Result<Document> {
        self.load_tokens(DomTokenSource::new(dom))
    }
}
