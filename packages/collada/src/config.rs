//! Configuration constants and loader configuration.
//!
//! Host applications inject a [`LoaderConfig`] into the
//! [`DocumentLoader`](crate::loader::DocumentLoader); nothing in this crate
//! reads process-wide settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ColladaError, Result};

/// Namespace URI of COLLADA 1.4 documents.
pub const COLLADA_1_4_NAMESPACE: &str = "http://www.collada.org/2005/11/COLLADASchema";

/// Namespace URI of COLLADA 1.5 documents.
pub const COLLADA_1_5_NAMESPACE: &str = "http://www.collada.org/2008/03/COLLADASchema";

/// Field name under which an element's character data is stored.
///
/// Attributes are stored under their own names: the local name when
/// unprefixed, `{namespace}local` when prefixed. Neither form can collide
/// with this one.
pub const TEXT_FIELD: &str = "$text";

/// Default maximum element nesting depth.
///
/// Real COLLADA exports rarely nest deeper than 20 levels; scene node
/// hierarchies are the deepest part of a document.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Upper bound accepted for `max_depth`.
///
/// The builder itself is iterative, but consumers walk the graph
/// recursively, so the limit protects them.
pub const MAX_DEPTH_LIMIT: usize = 4096;

/// Default maximum document size in bytes (256 MB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 256 * 1024 * 1024;

/// Settings for a document load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Maximum element nesting depth before the parse is aborted.
    pub max_depth: usize,

    /// Maximum input size in bytes, checked for files and in-memory strings.
    pub max_document_bytes: u64,

    /// Whether `sid` attributes are added to the lookup index.
    pub index_sids: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            index_sids: true,
        }
    }
}

impl LoaderConfig {
    /// Parse a configuration from YAML. Missing keys take their defaults.
    ///
    /// # Examples
    /// ```
    /// use collada_model::config::LoaderConfig;
    ///
    /// let config = LoaderConfig::from_yaml_str("max_depth: 32").unwrap();
    /// assert_eq!(config.max_depth, 32);
    /// assert!(config.index_sids);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: LoaderConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Check that all limits are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ColladaError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ColladaError::InvalidConfig(format!(
                "max_depth {} exceeds the maximum of {MAX_DEPTH_LIMIT}",
                self.max_depth
            )));
        }
        if self.max_document_bytes == 0 {
            return Err(ColladaError::InvalidConfig(
                "max_document_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Fail if an input of `size` bytes exceeds `max_document_bytes`.
    pub fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_document_bytes {
            return Err(ColladaError::DocumentTooLarge {
                size,
                limit: self.max_document_bytes,
            });
        }
        Ok(())
    }
}
