//! Element registry system for extensible document parsing.
//!
//! Factories are registered for `(namespace, tag)` pairs and decide the
//! [`ElementKind`] of every node the builder creates. New kinds can be added
//! without touching the builder; unregistered tags fall back to
//! [`ElementKind::Generic`].

mod config;
mod core;
mod types;

pub use config::{
    create_collada_registry, register_collada_elements, COLLADA_NAMESPACES, SHADER_TAGS,
};
pub use core::ElementRegistry;
pub use types::{ElementFactory, ElementKind};
