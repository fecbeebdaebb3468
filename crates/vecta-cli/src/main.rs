use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use vecta_core::{Color, EditorConfig, Point2D};
use vecta_scene::command::{AddOwners, CreateKeyframe, NewOwner, SetProperty};
use vecta_scene::{
    Document, DocumentSnapshot, Editor, Keyframe, Knot, ObjectType, OwnerId, OwnerKind,
    PathGeometry, PropertyPath, Slot, TagType, Value,
};

#[derive(Parser)]
#[command(
    name = "vecta",
    version,
    about = "Vecta: inspect and edit vector animation documents"
)]
struct Cli {
    /// Editor configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a small demo document
    New {
        /// Output snapshot path
        #[arg()]
        output: PathBuf,
    },

    /// Print the owner tree, tracks and history-independent fingerprint
    Info {
        #[arg()]
        file: PathBuf,
    },

    /// Validate a document snapshot
    Check {
        #[arg()]
        file: PathBuf,
    },

    /// Print effective property values at a frame as JSON
    Eval {
        #[arg()]
        file: PathBuf,

        #[arg(long)]
        frame: i32,

        /// Only this owner (numeric id)
        #[arg(long)]
        owner: Option<u64>,
    },

    /// Set one property and save the document
    Set {
        #[arg()]
        file: PathBuf,

        /// Owner id, or owner name
        #[arg(long)]
        owner: String,

        #[arg(long)]
        property: String,

        /// New value as JSON (e.g. 12.5, "[1, 2]", "\"#ff0000\"")
        #[arg(long)]
        value: String,

        /// Where to write the result (default: overwrite the input)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries JSON output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => EditorConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::New { output } => cmd_new(&config, &output),
        Commands::Info { file } => cmd_info(&config, &file),
        Commands::Check { file } => cmd_check(&config, &file),
        Commands::Eval { file, frame, owner } => cmd_eval(&config, &file, frame, owner),
        Commands::Set {
            file,
            owner,
            property,
            value,
            out,
        } => cmd_set(&config, &file, &owner, &property, &value, out),
    }
}

fn load_document(config: &EditorConfig, file: &Path) -> Result<Document> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read file: {}", file.display()))?;
    let snapshot = DocumentSnapshot::from_json(&json)
        .with_context(|| format!("failed to parse snapshot: {}", file.display()))?;
    Document::from_snapshot(snapshot, config).map_err(|errors| {
        let lines: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
        anyhow::anyhow!("invalid document {}:\n{}", file.display(), lines.join("\n"))
    })
}

fn save_document(doc: &Document, file: &Path) -> Result<()> {
    let json = doc.snapshot().to_json()?;
    std::fs::write(file, json).with_context(|| format!("failed to write {}", file.display()))?;
    Ok(())
}

/// An ellipse with an animated radius, a styled rectangle and an open path.
fn demo_document(config: &EditorConfig) -> Result<Document> {
    let mut editor = Editor::new(config.clone());
    let root = editor.document().root();

    let ellipse = editor.create_owner(OwnerKind::Object(ObjectType::Ellipse));
    let rect = editor
        .create_owner(OwnerKind::Object(ObjectType::Rectangle))
        .with_value("position", Value::FloatVector(Point2D::new(300.0, 0.0)))?;
    let style = editor
        .create_owner(OwnerKind::Style)
        .with_value("brush_color", Value::Color(Color::BLUE))?;
    let tag = editor.create_owner(OwnerKind::Tag(TagType::Style));
    let path = editor
        .create_owner(OwnerKind::Object(ObjectType::Path))
        .with_geometry(PathGeometry::open(vec![
            Knot::linear(0.0, 0.0),
            Knot::smooth(Point2D::new(50.0, 80.0), Point2D::new(20.0, 0.0)),
            Knot::linear(100.0, 0.0),
        ]));
    let (e, r, s, t) = (ellipse.id(), rect.id(), style.id(), tag.id());

    let mut scope = editor.begin_macro("Create demo scene")?;
    scope.push(AddOwners::new(vec![
        NewOwner::new(ellipse, Slot::Child { parent: root, index: 0 }),
        NewOwner::new(rect, Slot::Child { parent: root, index: 1 }),
        NewOwner::new(path, Slot::Child { parent: root, index: 2 }),
        NewOwner::new(style, Slot::Style { index: 0 }),
        NewOwner::new(tag, Slot::Tag { object: r, index: 0 }),
    ]))?;
    scope.push(SetProperty::new(t, "style", Value::Reference(Some(s))))?;
    let start = config.animation.start_frame;
    let end = config.animation.end_frame;
    for (frame, radius) in [(start, 20.0), (end, 200.0)] {
        scope.push(CreateKeyframe::new(
            PropertyPath::new(e, "radius"),
            Keyframe::new(frame, Value::Float(radius)),
        ))?;
    }
    scope.finish()?;
    Ok(editor.into_document())
}

fn cmd_new(config: &EditorConfig, output: &Path) -> Result<()> {
    let doc = demo_document(config)?;
    save_document(&doc, output)?;
    tracing::info!(owners = doc.len(), "wrote {}", output.display());
    Ok(())
}

fn print_tree(doc: &Document, id: OwnerId, depth: usize) -> Result<()> {
    let owner = doc.owner(id)?;
    let indent = "  ".repeat(depth);
    println!(
        "{}{} {} \"{}\"",
        indent,
        id,
        owner.kind(),
        owner.name().unwrap_or("")
    );
    for tag in owner.tags() {
        let t = doc.owner(*tag)?;
        println!("{}  [{} {}]", indent, tag, t.kind());
    }
    if let Some(geometry) = owner.geometry() {
        println!(
            "{}  path: {} knot(s), {}",
            indent,
            geometry.len(),
            if geometry.closed { "closed" } else { "open" }
        );
    }
    for p in owner.properties() {
        if let Some(track) = p.track() {
            println!(
                "{}  track {}: {:?} at frames {:?}",
                indent,
                p.name(),
                track.interpolation(),
                track.frames()
            );
        }
    }
    for child in owner.children() {
        print_tree(doc, *child, depth + 1)?;
    }
    Ok(())
}

fn cmd_info(config: &EditorConfig, file: &Path) -> Result<()> {
    let doc = load_document(config, file)?;
    println!("Document {}", doc.id());
    println!("   Owners:      {}", doc.len());
    println!("   Styles:      {}", doc.styles().len());
    println!("   Tools:       {}", doc.tools().len());
    println!("   References:  {}", doc.references().len());
    println!("   Fingerprint: {}", doc.fingerprint()?);
    println!();
    print_tree(&doc, doc.root(), 0)?;
    for style in doc.styles() {
        println!("{} {}", style, doc.owner(*style)?.name().unwrap_or(""));
    }
    Ok(())
}

fn cmd_check(config: &EditorConfig, file: &Path) -> Result<()> {
    let doc = load_document(config, file)?;
    let unused = doc.unused_styles();
    if !unused.is_empty() {
        tracing::warn!(count = unused.len(), "document has unused styles");
    }
    println!("{}: OK ({} owners)", file.display(), doc.len());
    Ok(())
}

fn values_at(doc: &Document, id: OwnerId, frame: i32) -> Result<serde_json::Value> {
    let owner = doc.owner(id)?;
    let mut values = serde_json::Map::new();
    for p in owner.properties() {
        values.insert(p.name().to_string(), doc.value_at(id, p.name(), frame)?.to_json());
    }
    Ok(serde_json::Value::Object(values))
}

fn cmd_eval(config: &EditorConfig, file: &Path, frame: i32, owner: Option<u64>) -> Result<()> {
    let doc = load_document(config, file)?;
    let output = match owner {
        Some(id) => values_at(&doc, OwnerId(id), frame)?,
        None => {
            let mut all = BTreeMap::new();
            for id in doc.ordered_ids() {
                all.insert(id.0.to_string(), values_at(&doc, id, frame)?);
            }
            serde_json::to_value(all)?
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn resolve_owner(doc: &Document, owner: &str) -> Result<OwnerId> {
    if let Ok(id) = owner.parse::<u64>() {
        return Ok(OwnerId(id));
    }
    match doc.find_by_name(owner) {
        Some(id) => Ok(id),
        None => bail!("no owner named '{}'", owner),
    }
}

fn cmd_set(
    config: &EditorConfig,
    file: &Path,
    owner: &str,
    property: &str,
    value: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let doc = load_document(config, file)?;
    let id = resolve_owner(&doc, owner)?;
    let json: serde_json::Value =
        serde_json::from_str(value).with_context(|| format!("value is not JSON: {}", value))?;
    let mut editor = Editor::with_document(config.clone(), doc);
    let outcome = editor.set_property_json(id, property, &json)?;
    if !outcome.changed() {
        tracing::info!("{}.{} already holds that value", id, property);
    }
    let stored = editor.get_property_json(id, property)?;
    println!("{}.{} = {}", id, property, stored);
    let target = out.unwrap_or_else(|| file.to_path_buf());
    save_document(editor.document(), &target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_document_is_valid() {
        let config = EditorConfig::default();
        let doc = demo_document(&config).unwrap();
        assert!(vecta_scene::validate_document(&doc).is_ok());
        assert!(doc.find_by_name("Ellipse").is_some());
        assert!(doc.unused_styles().is_empty());
    }

    #[test]
    fn test_save_then_set_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("demo.json");
        let config = EditorConfig::default();
        cmd_new(&config, &file).unwrap();
        cmd_set(&config, &file, "Ellipse", "radius", "5000", None).unwrap();
        let doc = load_document(&config, &file).unwrap();
        let ellipse = doc.find_by_name("Ellipse").unwrap();
        let radius = doc.property(ellipse, "radius").unwrap().value().clone();
        assert_eq!(radius, Value::Float(1000.0));
    }

    #[test]
    fn test_unknown_owner_name() {
        let doc = Document::new(&EditorConfig::default());
        assert!(resolve_owner(&doc, "missing").is_err());
        assert_eq!(resolve_owner(&doc, "7").unwrap(), OwnerId(7));
    }
}
