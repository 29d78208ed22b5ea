//! Per-node field storage.
//!
//! Every element owns a [`FieldStore`] mapping field names (attribute names,
//! child tag names and [`TEXT_FIELD`](crate::config::TEXT_FIELD)) to a
//! [`FieldValue`]. Typed access goes through [`FieldCast`], which converts
//! softly: a value of the wrong shape reads as `None`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::document::NodeId;

/// A single stored field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Attribute value or character data.
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// A single child element.
    Node(NodeId),
    /// Child elements of a multi-valued field, in document order.
    Nodes(Vec<NodeId>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{text:?}"),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Node(id) => write!(f, "<node {}>", id.index()),
            FieldValue::Nodes(ids) => write!(f, "<{} nodes>", ids.len()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<NodeId> for FieldValue {
    fn from(value: NodeId) -> Self {
        FieldValue::Node(value)
    }
}

/// Soft conversion out of a [`FieldValue`].
///
/// Implementations return `None` when the stored value does not have the
/// requested shape. Numeric and boolean casts also accept text that parses
/// as the target type, since attributes always arrive as text.
pub trait FieldCast<'a>: Sized {
    fn cast(value: &'a FieldValue) -> Option<Self>;
}

impl<'a> FieldCast<'a> for &'a str {
    fn cast(value: &'a FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl FieldCast<'_> for String {
    fn cast(value: &FieldValue) -> Option<Self> {
        <&str>::cast(value).map(str::to_string)
    }
}

impl FieldCast<'_> for f64 {
    fn cast(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FieldCast<'_> for f32 {
    fn cast(value: &FieldValue) -> Option<Self> {
        f64::cast(value).map(|v| v as f32)
    }
}

impl FieldCast<'_> for i64 {
    fn cast(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Integer(v) => Some(*v),
            FieldValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FieldCast<'_> for u32 {
    fn cast(value: &FieldValue) -> Option<Self> {
        i64::cast(value).and_then(|v| u32::try_from(v).ok())
    }
}

impl FieldCast<'_> for usize {
    fn cast(value: &FieldValue) -> Option<Self> {
        i64::cast(value).and_then(|v| usize::try_from(v).ok())
    }
}

impl FieldCast<'_> for bool {
    fn cast(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(v) => Some(*v),
            // xs:boolean lexical space
            FieldValue::Text(text) => match text.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FieldCast<'_> for NodeId {
    fn cast(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Node(id) => Some(*id),
            FieldValue::Nodes(ids) => ids.last().copied(),
            _ => None,
        }
    }
}

impl<'a> FieldCast<'a> for &'a [NodeId] {
    fn cast(value: &'a FieldValue) -> Option<Self> {
        match value {
            FieldValue::Node(id) => Some(std::slice::from_ref(id)),
            FieldValue::Nodes(ids) => Some(ids.as_slice()),
            _ => None,
        }
    }
}

impl FieldCast<'_> for Vec<f64> {
    fn cast(value: &FieldValue) -> Option<Self> {
        <&str>::cast(value).and_then(parse_list)
    }
}

impl FieldCast<'_> for Vec<i64> {
    fn cast(value: &FieldValue) -> Option<Self> {
        <&str>::cast(value).and_then(parse_list)
    }
}

/// Parse a whitespace-separated list such as a COLLADA `<float_array>` or
/// `<p>` body. Returns `None` if any item fails to parse.
///
/// # Examples
/// ```
/// use collada_model::field::parse_list;
///
/// assert_eq!(parse_list::<f64>("1 2.5\n-3"), Some(vec![1.0, 2.5, -3.0]));
/// assert_eq!(parse_list::<i64>("1 x"), None);
/// assert_eq!(parse_list::<i64>("   "), Some(vec![]));
/// ```
pub fn parse_list<T: FromStr>(text: &str) -> Option<Vec<T>> {
    text.split_whitespace()
        .map(|item| item.parse().ok())
        .collect()
}

/// Mapping from field name to value, owned by one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldStore {
    fields: HashMap<String, FieldValue>,
}

impl FieldStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field, returning the previous value.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    /// Append a child to a multi-valued field.
    ///
    /// A field that currently holds something other than a node list is
    /// replaced by a fresh list.
    pub fn append_node(&mut self, name: &str, id: NodeId) {
        let slot = self
            .fields
            .entry(name.to_string())
            .or_insert_with(|| FieldValue::Nodes(Vec::new()));
        match *slot {
            FieldValue::Nodes(ref mut ids) => ids.push(id),
            FieldValue::Node(existing) => *slot = FieldValue::Nodes(vec![existing, id]),
            _ => *slot = FieldValue::Nodes(vec![id]),
        }
    }

    /// Get a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Get a field converted to `T`, or `None` if absent or of another shape.
    ///
    /// # Examples
    /// ```
    /// use collada_model::field::FieldStore;
    ///
    /// let mut store = FieldStore::new();
    /// store.set("count", "3");
    /// assert_eq!(store.get_typed::<u32>("count"), Some(3));
    /// assert_eq!(store.get_typed::<bool>("count"), None);
    /// assert_eq!(store.get_typed::<u32>("missing"), None);
    /// ```
    #[must_use]
    pub fn get_typed<'a, T: FieldCast<'a>>(&'a self, name: &str) -> Option<T> {
        self.fields.get(name).and_then(T::cast)
    }

    /// Check whether a field is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all fields in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}
