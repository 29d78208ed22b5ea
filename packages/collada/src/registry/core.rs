//! Element registry for mapping qualified tag names to factories.

use std::collections::{BTreeSet, HashMap};

use super::types::ElementFactory;
use crate::error::DuplicateRegistrationError;

/// Registry mapping `(namespace, tag)` pairs to element factories.
///
/// The registry is consulted by the builder for every start tag. Tags with
/// no registration are still parsed, as generic nodes.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    // namespace -> tag -> factory, so lookups can borrow both keys
    factories: HashMap<String, HashMap<String, ElementFactory>>,
}

impl ElementRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a tag in a namespace.
    ///
    /// Use `""` for elements without a namespace. Registering the same
    /// factory again is a no-op.
    ///
    /// # Errors
    /// Returns `DuplicateRegistrationError` if a different factory is
    /// already registered for the key.
    pub fn register(
        &mut self,
        namespace: impl Into<String>,
        tag: impl Into<String>,
        factory: ElementFactory,
    ) -> Result<(), DuplicateRegistrationError> {
        let namespace = namespace.into();
        let tag = tag.into();
        let tags = self.factories.entry(namespace.clone()).or_default();

        match tags.get(&tag) {
            Some(existing) if *existing == factory => Ok(()),
            Some(existing) => Err(DuplicateRegistrationError {
                namespace,
                tag,
                existing: existing.kind().clone(),
                attempted: factory.kind().clone(),
            }),
            None => {
                tracing::trace!(%namespace, %tag, kind = %factory.kind(), "Registered element");
                tags.insert(tag, factory);
                Ok(())
            }
        }
    }

    /// Register the same factory under several namespaces.
    ///
    /// # Errors
    /// Stops at the first conflicting registration.
    pub fn register_in(
        &mut self,
        namespaces: &[&str],
        tag: &str,
        factory: &ElementFactory,
    ) -> Result<(), DuplicateRegistrationError> {
        for namespace in namespaces {
            self.register(*namespace, tag, factory.clone())?;
        }
        Ok(())
    }

    /// Get the factory for a tag, if one is registered.
    #[must_use]
    pub fn resolve(&self, namespace: &str, tag: &str) -> Option<&ElementFactory> {
        self.factories.get(namespace)?.get(tag)
    }

    /// Check if a factory is registered for a tag.
    #[must_use]
    pub fn is_registered(&self, namespace: &str, tag: &str) -> bool {
        self.resolve(namespace, tag).is_some()
    }

    /// Return all registered tag names in a namespace.
    #[must_use]
    pub fn registered_tags(&self, namespace: &str) -> BTreeSet<&str> {
        self.factories
            .get(namespace)
            .map(|tags| tags.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of registered `(namespace, tag)` keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ElementKind;

    #[test]
    fn test_registry_register_and_resolve() {
        let mut registry = ElementRegistry::new();
        registry
            .register("", "newparam", ElementFactory::new(ElementKind::NewParam))
            .unwrap();

        let factory = registry.resolve("", "newparam").unwrap();
        assert_eq!(factory.kind(), &ElementKind::NewParam);
        assert!(registry.resolve("", "surface").is_none());
    }

    #[test]
    fn test_registry_namespaces_are_distinct() {
        let mut registry = ElementRegistry::new();
        registry
            .register("urn:a", "image", ElementFactory::new(ElementKind::Image))
            .unwrap();

        assert!(registry.is_registered("urn:a", "image"));
        assert!(!registry.is_registered("", "image"));
        assert!(!registry.is_registered("urn:b", "image"));
    }

    #[test]
    fn test_registry_identical_registration_is_idempotent() {
        let mut registry = ElementRegistry::new();
        let factory = ElementFactory::new(ElementKind::Mesh).with_multi_valued(["source"]);

        registry.register("", "mesh", factory.clone()).unwrap();
        registry.register("", "mesh", factory.clone()).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("", "mesh"), Some(&factory));
    }

    #[test]
    fn test_registry_conflicting_registration_fails() {
        let mut registry = ElementRegistry::new();
        registry
            .register("", "mesh", ElementFactory::new(ElementKind::Mesh))
            .unwrap();

        let err = registry
            .register("", "mesh", ElementFactory::new(ElementKind::Geometry))
            .unwrap_err();
        assert_eq!(err.tag, "mesh");
        assert_eq!(err.existing, ElementKind::Mesh);
        assert_eq!(err.attempted, ElementKind::Geometry);

        // The original registration is untouched
        assert_eq!(
            registry.resolve("", "mesh").map(ElementFactory::kind),
            Some(&ElementKind::Mesh)
        );
    }

    #[test]
    fn test_registry_conflict_on_multi_valued_fields() {
        let mut registry = ElementRegistry::new();
        registry
            .register("", "mesh", ElementFactory::new(ElementKind::Mesh))
            .unwrap();

        let widened = ElementFactory::new(ElementKind::Mesh).with_multi_valued(["source"]);
        assert!(registry.register("", "mesh", widened).is_err());
    }

    #[test]
    fn test_registry_register_in_and_tags() {
        let mut registry = ElementRegistry::new();
        let factory = ElementFactory::new(ElementKind::Image);
        registry
            .register_in(&["", "urn:x"], "image", &factory)
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.registered_tags("urn:x").into_iter().collect::<Vec<_>>(),
            vec!["image"]
        );
        assert!(registry.registered_tags("urn:missing").is_empty());
        assert!(!registry.is_empty());
    }
}
