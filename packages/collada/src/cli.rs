//! Command-line interface for inspecting COLLADA files.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;

use crate::config::{LoaderConfig, TEXT_FIELD};
use crate::document::{Document, Node};
use crate::elements::{Collada, Material, TypedElement};
use crate::error::{ColladaError, Result};
use crate::field::FieldValue;
use crate::loader::DocumentLoader;

/// Inspect the object graph of a COLLADA (.dae) file.
#[derive(Parser)]
#[command(name = "collada-inspect")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Loader configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the element tree with kinds and ids.
    Tree {
        /// COLLADA file to read
        file: PathBuf,

        /// Stop descending below this depth
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Show the element declaring an id or sid.
    Lookup {
        /// COLLADA file to read
        file: PathBuf,

        /// Identifier, with or without a leading '#'
        id: String,
    },

    /// List materials with their effect and diffuse texture.
    Materials {
        /// COLLADA file to read
        file: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    execute(Cli::parse())
}

/// Execute already parsed arguments.
pub fn execute(cli: Cli) -> Result<()> {
    let loader = create_loader(cli.config.as_deref())?;

    match cli.command {
        Commands::Tree { file, depth } => tree_command(&loader.load_path(file)?, depth),
        Commands::Lookup { file, id } => lookup_command(&loader.load_path(file)?, &id),
        Commands::Materials { file } => materials_command(&loader.load_path(file)?),
    }
}

fn create_loader(config: Option<&Path>) -> Result<DocumentLoader> {
    match config {
        Some(path) => DocumentLoader::with_config(LoaderConfig::from_path(path)?),
        None => Ok(DocumentLoader::default()),
    }
}

fn tree_command(document: &Document, max_depth: Option<usize>) -> Result<()> {
    let mut stack = vec![(document.root(), 0)];

    while let Some((node, depth)) = stack.pop() {
        let id = node
            .element_id()
            .or_else(|| node.sid())
            .map(|id| format!(" #{id}"))
            .unwrap_or_default();
        println!(
            "{}{} {}{}",
            "  ".repeat(depth),
            style(node.tag()).bold(),
            style(format!("[{}]", node.kind())).dim(),
            style(id).cyan()
        );

        if max_depth.is_some_and(|max| depth >= max) {
            continue;
        }
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }

    Ok(())
}

fn lookup_command(document: &Document, id: &str) -> Result<()> {
    let node = document
        .resolve_reference(id)
        .ok_or_else(|| ColladaError::UnresolvedReference(id.to_string()))?;

    println!("{} {}", style("Element:").bold(), style(node.path()).cyan());
    println!("  Kind: {}", node.kind());
    if !node.namespace().is_empty() {
        println!("  Namespace: {}", node.namespace());
    }
    let mut fields: Vec<_> = node.fields().iter().collect();
    fields.sort_unstable_by_key(|(name, _)| *name);
    for (name, value) in fields {
        println!("  {}: {}", style(name).green(), describe_field(node, name, value));
    }

    Ok(())
}

/// Render a field value, showing child elements by tag.
fn describe_field(node: Node<'_>, name: &str, value: &FieldValue) -> String {
    let document = node.document();
    let tag_of = |id| document.node(id).map_or("?", |child| child.tag());

    match value {
        FieldValue::Node(id) => format!("<{}>", tag_of(*id)),
        FieldValue::Nodes(ids) => format!("{} x <{name}>", ids.len()),
        FieldValue::Text(text) if name == TEXT_FIELD => format!("{:?}", text.trim()),
        other => other.to_string(),
    }
}

fn materials_command(document: &Document) -> Result<()> {
    let materials = document
        .root()
        .cast::<Collada>()
        .map(|collada| collada.materials())
        .unwrap_or_default();

    if materials.is_empty() {
        println!("{}", style("No materials").yellow());
        return Ok(());
    }

    for material in materials {
        print_material(material);
    }

    Ok(())
}

fn print_material(material: Material<'_>) {
    let node = material.node();
    let label = material
        .name()
        .or_else(|| node.element_id())
        .unwrap_or("(unnamed)");
    println!("{}", style(label).bold());

    let Some(effect) = material.effect() else {
        let url = material
            .instance_effect()
            .and_then(|instance| instance.url())
            .unwrap_or("none");
        println!("  Effect: {} ({url})", style("unresolved").red());
        return;
    };

    let effect_label = effect
        .name()
        .or_else(|| effect.node().element_id())
        .unwrap_or("(unnamed)");
    println!("  Effect: {}", style(effect_label).green());

    if let Some(shader) = effect.common_shader() {
        println!("  Shader: {}", shader.model());
    }
    if let Some(binding) = material.diffuse_texture() {
        println!(
            "  Diffuse texture: {}",
            style(binding.file().unwrap_or("(no file)")).cyan()
        );
    } else if let Some([r, g, b, a]) = material.diffuse_color() {
        println!("  Diffuse color: {r} {g} {b} {a}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_parse_tree() {
        let cli = Cli::parse_from(["collada-inspect", "tree", "scene.dae"]);

        let Commands::Tree { file, depth } = cli.command else {
            unreachable!("expected tree command");
        };
        assert_eq!(file, PathBuf::from("scene.dae"));
        assert!(depth.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_lookup_with_config() {
        let cli = Cli::parse_from([
            "collada-inspect",
            "lookup",
            "scene.dae",
            "#brick",
            "--config",
            "loader.yaml",
        ]);

        let Commands::Lookup { id, .. } = cli.command else {
            unreachable!("expected lookup command");
        };
        assert_eq!(id, "#brick");
        assert_eq!(cli.config, Some(PathBuf::from("loader.yaml")));
    }

    #[test]
    fn test_describe_field() {
        let doc = Document::parse_str(r#"<image id="a"><init_from> a.png </init_from></image>"#)
            .unwrap();
        let root = doc.root();
        let init = root.fields().get("init_from").unwrap();
        assert_eq!(describe_field(root, "init_from", init), "<init_from>");

        let child = root.child("init_from").unwrap();
        let text = child.fields().get(TEXT_FIELD).unwrap();
        assert_eq!(describe_field(child, TEXT_FIELD, text), "\"a.png\"");
    }

    #[test]
    fn test_create_loader_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_depth: 8").unwrap();

        let loader = create_loader(Some(file.path())).unwrap();
        assert_eq!(loader.config().max_depth, 8);
    }

    #[test]
    fn test_lookup_unknown_id() {
        let doc = Document::parse_str("<a/>").unwrap();
        assert!(matches!(
            lookup_command(&doc, "missing"),
            Err(ColladaError::UnresolvedReference(_))
        ));
    }
}
