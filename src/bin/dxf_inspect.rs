//! Print a summary of a DXF file: entity counts, tables, blocks, extent and
//! the anomalies met while reading.
//!
//! ```text
//! dxf_inspect <file.dxf> [--strict] [--rewrite <out.dxf>]
//! ```
//!
//! Set `RUST_LOG=draftdxf=debug` for reader traces.

use anyhow::{bail, Context, Result};
use draftdxf::{DxfReader, DxfReaderConfiguration, DxfWriter, Scene};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

struct Args {
    input: PathBuf,
    strict: bool,
    rewrite: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut input = None;
    let mut strict = false;
    let mut rewrite = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strict" => strict = true,
            "--rewrite" => {
                let Some(path) = args.next() else {
                    bail!("`--rewrite` needs an output path");
                };
                rewrite = Some(PathBuf::from(path));
            }
            other if other.starts_with("--") => bail!("unknown option {other}"),
            other => input = Some(PathBuf::from(other)),
        }
    }

    let Some(input) = input else {
        bail!("usage: dxf_inspect <file.dxf> [--strict] [--rewrite <out.dxf>]");
    };
    Ok(Args { input, strict, rewrite })
}

fn print_summary(scene: &Scene) {
    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for item in scene.items() {
        *kinds.entry(item.kind().name()).or_insert(0) += 1;
    }

    println!("items: {}", scene.len());
    for (kind, count) in &kinds {
        println!("  {kind:<16} {count}");
    }

    println!("layers: {}", scene.layers.len());
    for layer in scene.layers.iter() {
        let state = if layer.off { " (off)" } else { "" };
        println!("  {:<24} {}{}", layer.name, layer.color.to_hex(), state);
    }
    println!("line types: {}", scene.line_types.len());
    println!("text styles: {}", scene.text_styles.len());
    println!("dimension styles: {}", scene.dim_styles.len());
    println!("current layer: {}", scene.current_layer);

    for block in scene.blocks() {
        println!(
            "block {:<20} children {:>4}  base ({}, {})",
            block.name(),
            block.children().len(),
            block.base_point().x,
            block.base_point().y
        );
    }

    match scene.extremes() {
        Some(bbox) => println!(
            "extent: ({}, {}) - ({}, {})",
            bbox.min.x, bbox.min.y, bbox.max.x, bbox.max.y
        ),
        None => println!("extent: empty"),
    }

    println!("notifications: {}", scene.notifications.len());
    for note in scene.notifications.iter() {
        println!("  [{}] {}", note.notification_type, note.message);
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = DxfReaderConfiguration {
        strict_group_codes: args.strict,
    };
    let scene = DxfReader::from_file(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?
        .with_configuration(config)
        .read()
        .with_context(|| format!("cannot read {}", args.input.display()))?;

    print_summary(&scene);

    if let Some(output) = args.rewrite {
        DxfWriter::new(&scene)
            .write_to_file(&output)
            .with_context(|| format!("cannot write {}", output.display()))?;
        tracing::info!(path = %output.display(), "scene rewritten");
    }
    Ok(())
}
