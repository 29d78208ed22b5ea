//! Token source that replays an already parsed roxmltree document.

use roxmltree::Node;

use super::{QName, Token, TokenSource};
use crate::error::MalformedDocumentError;

/// Replays a `roxmltree::Document` as a token stream.
///
/// Useful for hosts that already hold a DOM; roxmltree has validated
/// well-formedness, so this source never fails.
pub struct DomTokenSource {
    tokens: std::vec::IntoIter<Token>,
}

impl DomTokenSource {
    /// Flatten the document's root element into tokens.
    #[must_use]
    pub fn new(document: &roxmltree::Document<'_>) -> Self {
        let mut tokens = Vec::new();
        // (node, closing): an element is pushed again with `true` to emit its end tag
        let mut stack = vec![(document.root_element(), false)];

        while let Some((node, closing)) = stack.pop() {
            if closing {
                tokens.push(Token::End(qualified_name(node)));
            } else if node.is_element() {
                tokens.push(Token::Start(qualified_name(node)));
                for attr in node.attributes() {
                    let name = QName::new(attr.namespace().unwrap_or_default(), attr.name());
                    tokens.push(Token::Attribute {
                        name: name.to_string(),
                        value: attr.value().to_string(),
                    });
                }
                stack.push((node, true));
                stack.extend(node.children().rev().map(|child| (child, false)));
            } else if let Some(text) = node.text().filter(|_| node.is_text()) {
                tokens.push(Token::Text(text.to_string()));
            }
        }

        Self {
            tokens: tokens.into_iter(),
        }
    }
}

impl TokenSource for DomTokenSource {
    fn next_token(&mut self) -> Result<Option<Token>, MalformedDocumentError> {
        Ok(self.tokens.next())
    }
}

fn qualified_name(node: Node<'_, '_>) -> QName {
    let tag = node.tag_name();
    QName::new(tag.namespace().unwrap_or_default(), tag.name())
}
