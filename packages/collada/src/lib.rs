//! COLLADA Model - typed object graph for COLLADA (`.dae`) documents.
//!
//! This crate turns a stream of XML tokens into an immutable [`Document`]:
//! every element becomes a node whose attributes, text and child elements
//! live in a per-node field store. A registry maps `(namespace, tag)` pairs
//! to element kinds; unregistered tags become generic nodes so nothing in
//! the source is lost.
//!
//! # Example
//!
//! ```
//! use collada_model::elements::{Material, TypedElement};
//! use collada_model::Document;
//!
//! let doc = Document::parse_str(
//!     r##"<COLLADA>
//!           <library_effects><effect id="fx"/></library_effects>
//!           <library_materials>
//!             <material id="m"><instance_effect url="#fx"/></material>
//!           </library_materials>
//!         </COLLADA>"##,
//! )?;
//!
//! let material: Material = doc.resolve("#m").unwrap();
//! let effect = material.effect().unwrap();
//! assert_eq!(effect.node().element_id(), Some("fx"));
//! # Ok::<(), collada_model::ColladaError>(())
//! ```
//!
//! # Architecture
//!
//! - [`tokens`]: XML token sources (streaming reader and DOM replay)
//! - [`registry`]: element kinds and the tag registry
//! - [`builder`]: stack-based document construction
//! - [`document`]: the element arena, navigation and id lookup
//! - [`field`]: per-node field storage and typed casts
//! - [`elements`]: typed views such as [`elements::Effect`]
//! - [`resolve`]: following material and texture references
//! - [`loader`]: configured entry points
//! - [`config`]: constants and [`LoaderConfig`]
//! - [`error`]: error types and Result alias
//! - [`cli`]: the `collada-inspect` command-line interface

pub mod builder;
pub mod cli;
pub mod config;
pub mod document;
pub mod elements;
pub mod error;
pub mod field;
pub mod loader;
pub mod registry;
pub mod resolve;
pub mod tokens;

pub use config::LoaderConfig;
pub use document::{Document, Node, NodeId};
pub use error::{ColladaError, DuplicateRegistrationError, MalformedDocumentError, Result};
pub use field::{FieldStore, FieldValue};
pub use loader::DocumentLoader;
pub use registry::{create_collada_registry, ElementFactory, ElementKind, ElementRegistry};
pub use resolve::TextureBinding;
