//! Error types for the COLLADA object model.
//!
//! Uses the dual-error pattern: `ColladaError` for library consumers, with
//! the two failure kinds of the model itself (`MalformedDocumentError` and
//! `DuplicateRegistrationError`) kept as their own types so callers of the
//! builder or the registry can match on them directly.

use thiserror::Error;

use crate::registry::ElementKind;

/// The token stream is not a well-formed document.
///
/// Fatal to the parse that produced it; no partial document is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedDocumentError {
    /// An end tag does not match the element that is currently open.
    #[error("Mismatched end tag </{found}>, expected </{expected}>")]
    MismatchedEndTag { expected: String, found: String },

    /// An end tag arrived while no element was open.
    #[error("Unexpected end tag </{found}> with no open element")]
    UnexpectedEndTag { found: String },

    /// The input ended while elements were still open.
    #[error("Unexpected end of document, unclosed elements: {}", .open.join(" > "))]
    UnclosedElements { open: Vec<String> },

    /// An attribute was emitted outside of any start tag.
    #[error("Attribute '{name}' outside of an element")]
    AttributeOutsideElement { name: String },

    /// An attribute could not be read.
    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Character data appeared before the root element or after it closed.
    #[error("Text content outside of the root element")]
    TextOutsideRoot,

    /// A second top-level element started after the root closed.
    #[error("Multiple root elements: <{second}> after <{first}>")]
    MultipleRoots { first: String, second: String },

    /// The input contained no element at all.
    #[error("Document has no root element")]
    EmptyDocument,

    /// An element or attribute uses a prefix with no namespace binding.
    #[error("Undeclared namespace prefix '{0}'")]
    UndeclaredPrefix(String),

    /// An entity reference is neither predefined nor a character reference.
    #[error("Unknown entity reference '&{0};'")]
    UnknownEntity(String),

    /// A character reference names a code point XML does not allow.
    #[error("Character reference '&{0};' is not an allowed XML character")]
    InvalidCharReference(String),

    /// The tokenizer rejected the input.
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },
}

/// Two different factories were registered for the same element key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Conflicting registration for <{tag}> in namespace '{namespace}': \
     already {existing:?}, attempted {attempted:?}"
)]
pub struct DuplicateRegistrationError {
    pub namespace: String,
    pub tag: String,
    pub existing: ElementKind,
    pub attempted: ElementKind,
}

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum ColladaError {
    /// The document is not well-formed.
    #[error("Malformed document: {0}")]
    Malformed(#[from] MalformedDocumentError),

    /// The element registry was configured inconsistently.
    #[error(transparent)]
    DuplicateRegistration(#[from] DuplicateRegistrationError),

    /// Element nesting exceeded the configured depth.
    #[error("Element nesting exceeds the configured limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// The input is larger than the configured limit.
    #[error("Document is {size} bytes, limit is {limit} bytes")]
    DocumentTooLarge { size: u64, limit: u64 },

    /// Loader configuration failed validation.
    #[error("Invalid loader configuration: {0}")]
    InvalidConfig(String),

    /// Loader configuration could not be deserialized.
    #[error("Failed to parse loader configuration: {0}")]
    ConfigParse(#[from] serde_yaml_ng::Error),

    /// No element declares the requested id or sid.
    #[error("No element with id '{0}'")]
    UnresolvedReference(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, ColladaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_end_tag_display() {
        let err = MalformedDocumentError::MismatchedEndTag {
            expected: "surface".to_string(),
            found: "sampler2D".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Mismatched end tag </sampler2D>, expected </surface>"
        );
    }

    #[test]
    fn test_unclosed_elements_display() {
        let err = MalformedDocumentError::UnclosedElements {
            open: vec!["COLLADA".to_string(), "asset".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unexpected end of document, unclosed elements: COLLADA > asset"
        );
    }

    #[test]
    fn test_malformed_converts_into_collada_error() {
        let err: ColladaError = MalformedDocumentError::EmptyDocument.into();
        assert!(matches!(
            err,
            ColladaError::Malformed(MalformedDocumentError::EmptyDocument)
        ));
        assert_eq!(
            err.to_string(),
            "Malformed document: Document has no root element"
        );
    }

    #[test]
    fn test_duplicate_registration_display() {
        let err = DuplicateRegistrationError {
            namespace: String::new(),
            tag: "newparam".to_string(),
            existing: ElementKind::NewParam,
            attempted: ElementKind::Generic,
        };
        let message = err.to_string();
        assert!(message.contains("<newparam>"));
        assert!(message.contains("NewParam"));
        assert!(message.contains("Generic"));
    }
}
