//! Markup token model consumed by the document builder.
//!
//! The builder never tokenizes markup itself. It pulls [`Token`]s from a
//! [`TokenSource`]: the streaming [`XmlTokenSource`], the DOM replaying
//! [`DomTokenSource`], or a plain `Vec<Token>` for programmatic streams.

mod dom;
mod stream;

use std::fmt;

pub use dom::DomTokenSource;
pub use stream::XmlTokenSource;

use crate::error::MalformedDocumentError;

/// Namespace-qualified element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI, empty when the element has none.
    pub namespace: String,
    /// Local part of the name, without prefix.
    pub local: String,
}

impl QName {
    #[must_use]
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// A name in no namespace.
    #[must_use]
    pub fn local(local: impl Into<String>) -> Self {
        Self::new("", local)
    }
}

impl fmt::Display for QName {
    // Clark notation: {namespace}local
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

/// One markup event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An element opens. Its attributes follow as `Attribute` tokens.
    Start(QName),
    /// An attribute of the most recently opened element.
    ///
    /// Unprefixed attributes are named by their local name. Prefixed ones
    /// use Clark notation (`{namespace}local`), so `xlink:href` and `href`
    /// stay distinct.
    Attribute { name: String, value: String },
    /// A run of character data.
    Text(String),
    /// An element closes.
    End(QName),
}

/// Pull-based source of markup tokens.
pub trait TokenSource {
    /// Return the next token, or `None` at end of input.
    ///
    /// # Errors
    /// Returns `MalformedDocumentError` if the underlying input cannot be
    /// tokenized.
    fn next_token(&mut self) -> Result<Option<Token>, MalformedDocumentError>;
}

impl TokenSource for std::vec::IntoIter<Token> {
    fn next_token(&mut self) -> Result<Option<Token>, MalformedDocumentError> {
        Ok(self.next())
    }
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    fn next_token(&mut self) -> Result<Option<Token>, MalformedDocumentError> {
        (**self).next_token()
    }
}
